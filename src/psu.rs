use core::fmt;

use crate::{
    codec::{self, FIELD_WIDTH},
    command::Command,
    error::{Error, Result},
    identity::Identity,
    model::Model,
    preset::{self, Preset, PresetSlot, Presets},
    trace::Trace,
    transport::{Response, Transport},
    types::{Reading, State},
};
use embedded_io::{Read, ReadReady, Write};

/// What to do right after the supply has been identified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Switch the output off and zero both setpoints.
    pub reset: bool,
    /// Activate this PROM slot.
    pub preset: Option<PresetSlot>,
}

impl ConnectOptions {
    pub fn with_reset(mut self, reset: bool) -> Self {
        self.reset = reset;
        self
    }

    pub fn with_preset(mut self, slot: impl Into<PresetSlot>) -> Self {
        self.preset = Some(slot.into());
        self
    }
}

/// A connected and identified Voltcraft PPS.
///
/// Setpoints are never cached: every getter asks the supply, and every setter saturates its
/// argument to the identified model's range before sending it. Values are in volts and amps.
///
/// We use "set" for writing a setpoint, "reading" for measured values and "preset" for the active
/// preset register, which is distinct from the three PROM slots.
#[derive(Debug)]
pub struct Pps<S, T = ()> {
    transport: Transport<S, T>,
    identity: Identity,
}

impl<S, T> Pps<S, T>
where
    S: Read + Write + ReadReady,
    T: Trace,
{
    /// Identify the supply on the other end of `transport`, then apply `options`.
    ///
    /// Fails with [`Error::Identification`] when the supply reports ceilings we don't know. The
    /// transport is dropped in that case.
    pub fn connect(
        mut transport: Transport<S, T>,
        options: ConnectOptions,
    ) -> Result<Self, S::Error> {
        transport.clear()?;

        let limits = transport.exchange(Command::GetMax.mnemonic())?;
        let identity = Identity::from_limits_response(&limits)?;
        log::info!(
            "Found Voltcraft {} ({:.1} V, {:.2} A, min {:.1} V)",
            identity.model(),
            identity.max_voltage(),
            identity.max_current(),
            identity.min_voltage()
        );

        let mut pps = Pps {
            transport,
            identity,
        };

        if options.reset {
            log::debug!("Resetting output and setpoints");
            pps.output(State::Off)?;
            pps.set_voltage(0.0)?;
            pps.set_current(0.0)?;
        }

        if let Some(slot) = options.preset {
            log::debug!("Activating preset {}", u8::from(slot));
            pps.use_preset(slot)?;
        }

        Ok(pps)
    }

    /// Switch the output on or off.
    pub fn output(&mut self, state: impl Into<State>) -> Result<(), S::Error> {
        // The supply's argument is inverted: 0 switches on.
        let argument = match state.into() {
            State::On => 0,
            State::Off => 1,
        };
        self.send(Command::SetOutput, format_args!("{argument}"))
    }

    /// Set the output voltage limit, saturated to the model's range.
    pub fn set_voltage(&mut self, voltage: f32) -> Result<(), S::Error> {
        let raw = self.identity.encode_voltage(voltage);
        self.send(Command::SetVoltage, format_args!("{raw:03}"))
    }

    /// Set the output current limit, saturated to `[0, max_current]`.
    pub fn set_current(&mut self, current: f32) -> Result<(), S::Error> {
        let raw = self.identity.encode_current(current);
        let width = self.identity.current_width();
        self.send(Command::SetCurrent, format_args!("{raw:0width$}"))
    }

    /// Measure the output.
    pub fn reading(&mut self) -> Result<Reading, S::Error> {
        let payload = self.query(Command::GetReading)?;
        codec::decode_reading(&payload).ok_or(Error::InvalidResponse)
    }

    /// Power currently delivered, in watts.
    pub fn power_dissipation(&mut self) -> Result<f32, S::Error> {
        Ok(self.reading()?.power())
    }

    /// Maximum voltage and current of the identified model.
    pub fn limits(&self) -> (f32, f32) {
        (self.identity.max_voltage(), self.identity.max_current())
    }

    /// Overwrite all three PROM slots in one go. Each preset is saturated on its own.
    pub fn store_presets(
        &mut self,
        slot0: impl Into<Preset>,
        slot1: impl Into<Preset>,
        slot2: impl Into<Preset>,
    ) -> Result<(), S::Error> {
        let presets: Presets = [slot0.into(), slot1.into(), slot2.into()];
        let payload =
            preset::encode_presets(&presets, &self.identity).map_err(|_| Error::BufferOverflow)?;
        self.send(Command::StorePresets, format_args!("{payload}"))
    }

    /// Read all three PROM slots, in slot order.
    pub fn load_presets(&mut self) -> Result<Presets, S::Error> {
        let payload = self.query(Command::LoadPresets)?;
        preset::decode_presets(&payload, &self.identity).ok_or(Error::InvalidResponse)
    }

    /// Activate a PROM slot. Slot numbers above 2 select slot 2.
    pub fn use_preset(&mut self, slot: impl Into<PresetSlot>) -> Result<(), S::Error> {
        let slot = u8::from(slot.into());
        self.send(Command::RunPreset, format_args!("{slot}"))
    }

    /// Read the active preset register.
    pub fn preset(&mut self) -> Result<Preset, S::Error> {
        let payload = self.query(Command::GetPreset)?;
        Preset::decode_at(&payload, 0, &self.identity).ok_or(Error::InvalidResponse)
    }

    /// Write the active preset register, voltage first.
    pub fn set_preset(&mut self, preset: impl Into<Preset>) -> Result<(), S::Error> {
        let preset = preset.into();
        self.set_preset_voltage(preset.voltage)?;
        self.set_preset_current(preset.current)
    }

    pub fn preset_voltage(&mut self) -> Result<f32, S::Error> {
        let raw = self.query_field(Command::GetPresetVoltage, FIELD_WIDTH)?;
        Ok(self.identity.decode_voltage(raw))
    }

    pub fn set_preset_voltage(&mut self, voltage: f32) -> Result<(), S::Error> {
        let raw = self.identity.encode_voltage(voltage);
        self.send(Command::SetPresetVoltage, format_args!("{raw:03}"))
    }

    pub fn preset_current(&mut self) -> Result<f32, S::Error> {
        let raw = self.query_field(Command::GetPresetCurrent, self.identity.current_width())?;
        Ok(self.identity.decode_current(raw))
    }

    pub fn set_preset_current(&mut self, current: f32) -> Result<(), S::Error> {
        let raw = self.identity.encode_current(current);
        let width = self.identity.current_width();
        self.send(Command::SetPresetCurrent, format_args!("{raw:0width$}"))
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn model(&self) -> Model {
        self.identity.model()
    }

    pub fn max_voltage(&self) -> f32 {
        self.identity.max_voltage()
    }

    pub fn max_current(&self) -> f32 {
        self.identity.max_current()
    }

    pub fn min_voltage(&self) -> f32 {
        self.identity.min_voltage()
    }

    /// `10.0` or `100.0`, see [`Identity::current_multiplier`].
    pub fn current_multiplier(&self) -> f32 {
        self.identity.current_multiplier()
    }

    /// Give back the transport, e.g. to reconnect later.
    pub fn into_transport(self) -> Transport<S, T> {
        self.transport
    }

    /// Send a command whose response carries no payload.
    fn send(&mut self, command: Command, arguments: fmt::Arguments<'_>) -> Result<(), S::Error> {
        let request = command.request(arguments).map_err(|_| Error::BufferOverflow)?;
        self.transport.exchange(&request)?;
        Ok(())
    }

    fn query(&mut self, command: Command) -> Result<Response, S::Error> {
        self.transport.exchange(command.mnemonic())
    }

    /// Query a single field of `width` digits.
    fn query_field(&mut self, command: Command, width: usize) -> Result<u16, S::Error> {
        let payload = self.query(command)?;
        codec::field_at(&payload, 0, width).ok_or(Error::InvalidResponse)
    }
}
