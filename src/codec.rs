//! Fixed-point ASCII conversions.
//!
//! The supply transfers every quantity as a zero-padded decimal field. Voltages are in units of
//! 0.1 V, currents in units of 1/10 A or 1/100 A depending on the model, and live readings in
//! units of 0.01 V / 0.01 A.

use crate::types::{ControlMode, Reading};

/// Voltage fields are in decivolts.
pub const VOLTAGE_FACTOR: f32 = 10.0;

/// Live reading fields (`GETD`) are in centivolts and centiamps.
pub const READING_FACTOR: f32 = 100.0;

/// Width of a voltage or current field in requests, `GMAX`, `GETS`, `GETM`, `GOVP` and `GOCP`.
pub const FIELD_WIDTH: usize = 3;

/// Width of the current fields of a supply which reports a 7 digit `GMAX`.
pub const WIDE_CURRENT_FIELD_WIDTH: usize = 4;

/// Width of the voltage and current fields of a `GETD` reading.
pub const READING_FIELD_WIDTH: usize = 4;

/// The one `GMAX` response which uses centiamps within a standard width current field.
pub const CENTIAMP_LIMITS_QUIRK: &str = "362700";

/// Fixed-point scale of current fields. It varies by model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrentScale {
    /// Current fields count 0.1 A steps.
    Deciamps,
    /// Current fields count 0.01 A steps.
    Centiamps,
}

impl CurrentScale {
    /// Steps per amp.
    pub const fn steps_per_amp(&self) -> u16 {
        match self {
            CurrentScale::Deciamps => 10,
            CurrentScale::Centiamps => 100,
        }
    }

    /// The current multiplier as a float, `10.0` or `100.0`.
    pub fn multiplier(&self) -> f32 {
        self.steps_per_amp() as f32
    }

    /// Convert a raw current field to centiamps.
    pub const fn to_centiamps(&self, raw: u16) -> u32 {
        raw as u32 * (100 / self.steps_per_amp()) as u32
    }
}

/// Convert a physical value to a fixed-point field, rounding to the nearest step.
///
/// Negative values and NaN become `0`, values too large for a `u16` saturate.
pub fn to_fixed(value: f32, factor: f32) -> u16 {
    let scaled = value * factor;
    if scaled > 0.0 {
        (scaled + 0.5) as u16
    } else {
        0
    }
}

/// Convert a fixed-point field back to a physical value.
pub fn from_fixed(raw: u16, factor: f32) -> f32 {
    raw as f32 / factor
}

/// Parse a field made only of ASCII digits.
pub fn parse_field(field: &str) -> Option<u16> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

/// Parse the field at `start..start + width` of `payload`.
pub fn field_at(payload: &str, start: usize, width: usize) -> Option<u16> {
    payload.get(start..start + width).and_then(parse_field)
}

/// Raw ceilings as reported by `GMAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum voltage in decivolts.
    pub voltage: u16,
    /// Maximum current in steps of `scale`.
    pub current: u16,
    pub scale: CurrentScale,
    /// Digits of every current field this supply sends or expects.
    pub current_width: usize,
}

impl Limits {
    /// Decode a `GMAX` payload.
    ///
    /// * `VVVIII` - current in deciamps, except for the literal [`CENTIAMP_LIMITS_QUIRK`] which
    ///   is in centiamps.
    /// * `VVVIIII` - widened current field, still in deciamps. All current fields of such a
    ///   supply are [`WIDE_CURRENT_FIELD_WIDTH`] digits wide.
    ///
    /// Any other shape is rejected.
    pub fn decode(payload: &str) -> Option<Self> {
        let voltage = field_at(payload, 0, FIELD_WIDTH)?;
        let (scale, current_width) = match payload.len() {
            6 if payload == CENTIAMP_LIMITS_QUIRK => (CurrentScale::Centiamps, FIELD_WIDTH),
            6 => (CurrentScale::Deciamps, FIELD_WIDTH),
            7 => (CurrentScale::Deciamps, WIDE_CURRENT_FIELD_WIDTH),
            _ => return None,
        };
        let current = field_at(payload, FIELD_WIDTH, current_width)?;
        Some(Limits {
            voltage,
            current,
            scale,
            current_width,
        })
    }

    pub fn max_voltage(&self) -> f32 {
        from_fixed(self.voltage, VOLTAGE_FACTOR)
    }

    pub fn max_current(&self) -> f32 {
        from_fixed(self.current, self.scale.multiplier())
    }
}

/// Decode a `GETD` payload: voltage (4 digits), current (4 digits), mode (1 digit).
pub fn decode_reading(payload: &str) -> Option<Reading> {
    let voltage = field_at(payload, 0, READING_FIELD_WIDTH)?;
    let current = field_at(payload, READING_FIELD_WIDTH, READING_FIELD_WIDTH)?;
    let mode = match payload.as_bytes().get(2 * READING_FIELD_WIDTH)? {
        b'0' => ControlMode::Cv,
        b'1'..=b'9' => ControlMode::Cc,
        _ => return None,
    };
    Some(Reading {
        voltage: from_fixed(voltage, READING_FACTOR),
        current: from_fixed(current, READING_FACTOR),
        mode,
    })
}
