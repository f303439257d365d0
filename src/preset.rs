use core::fmt::{self, Write};

use strum::EnumCount;
use strum_macros::{EnumCount as EnumCountMacro, EnumIter};

use crate::{
    codec::{self, FIELD_WIDTH, WIDE_CURRENT_FIELD_WIDTH},
    identity::Identity,
};

/// One (voltage, current) pair, as held by a PROM slot or the active preset register.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Preset {
    /// Output voltage in volts.
    pub voltage: f32,
    /// Output current limit in amps.
    pub current: f32,
}

impl Preset {
    pub fn new(voltage: f32, current: f32) -> Self {
        Preset { voltage, current }
    }

    /// This preset saturated to the supply's range.
    pub fn clamped(&self, identity: &Identity) -> Self {
        Preset {
            voltage: identity.clamp_voltage(self.voltage),
            current: identity.clamp_current(self.current),
        }
    }

    /// Append the `VVVIII` wire form of this preset, after saturation. The current field is as
    /// wide as the supply's, see [`Identity::current_width`].
    pub fn encode(&self, identity: &Identity, out: &mut impl Write) -> fmt::Result {
        let width = identity.current_width();
        write!(
            out,
            "{:03}{:0width$}",
            identity.encode_voltage(self.voltage),
            identity.encode_current(self.current)
        )
    }

    /// Decode a voltage and current field pair starting at `start`.
    pub fn decode_at(payload: &str, start: usize, identity: &Identity) -> Option<Self> {
        let voltage = codec::field_at(payload, start, FIELD_WIDTH)?;
        let current =
            codec::field_at(payload, start + FIELD_WIDTH, identity.current_width())?;
        Some(Preset {
            voltage: identity.decode_voltage(voltage),
            current: identity.decode_current(current),
        })
    }
}

impl From<(f32, f32)> for Preset {
    fn from((voltage, current): (f32, f32)) -> Self {
        Preset { voltage, current }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} V, {:.2} A", self.voltage, self.current)
    }
}

/// This enum represents the three PROM preset slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumCountMacro)]
#[repr(u8)]
pub enum PresetSlot {
    Slot0 = 0,
    Slot1 = 1,
    Slot2 = 2,
}

/// Slot numbers beyond the last slot saturate to the last slot.
impl From<u8> for PresetSlot {
    fn from(value: u8) -> Self {
        match value {
            0 => PresetSlot::Slot0,
            1 => PresetSlot::Slot1,
            _ => PresetSlot::Slot2,
        }
    }
}

impl From<PresetSlot> for u8 {
    fn from(value: PresetSlot) -> Self {
        value as u8
    }
}

/// Contents of all PROM slots, in slot order.
pub type Presets = [Preset; PresetSlot::COUNT];

/// Largest `PROM` argument, for supplies with widened current fields.
pub const STORE_PAYLOAD_CAPACITY: usize =
    PresetSlot::COUNT * (FIELD_WIDTH + WIDE_CURRENT_FIELD_WIDTH);

/// Width of one encoded preset.
fn pair_width(identity: &Identity) -> usize {
    FIELD_WIDTH + identity.current_width()
}

/// Build the `PROM` argument, each preset saturated independently.
pub fn encode_presets(
    presets: &Presets,
    identity: &Identity,
) -> Result<heapless::String<STORE_PAYLOAD_CAPACITY>, fmt::Error> {
    let mut payload = heapless::String::new();
    for preset in presets {
        preset.encode(identity, &mut payload)?;
    }
    Ok(payload)
}

/// Decode a `GETM` response. Slots are separated by one byte.
pub fn decode_presets(payload: &str, identity: &Identity) -> Option<Presets> {
    let stride = pair_width(identity) + 1;
    let mut presets = [Preset::default(); PresetSlot::COUNT];
    for (slot, preset) in presets.iter_mut().enumerate() {
        *preset = Preset::decode_at(payload, slot * stride, identity)?;
    }
    Some(presets)
}
