//! This module is used to define the commands understood by the supply.
//!
//! Every request is a four letter mnemonic, optionally followed by decimal arguments, terminated
//! by a carriage return. Every response ends with a padding byte followed by `OK\r`.

use core::fmt::{self, Write};

use strum_macros::{EnumIter, IntoStaticStr};

/// Capacity of a request line, without the terminator.
pub const REQUEST_CAPACITY: usize = 40;

/// A request line ready to be sent.
pub type Request = heapless::String<REQUEST_CAPACITY>;

#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter, IntoStaticStr)]
pub enum Command {
    /// __Q__ - Maximum voltage and current.
    ///
    /// Response `VVVIII`, or `VVVIIII` on models with a widened current field.
    #[strum(serialize = "GMAX")]
    GetMax,
    /// __W__ - Switch the output. Argument is inverted: `0` switches on, `1` switches off.
    #[strum(serialize = "SOUT")]
    SetOutput,
    /// __W__ - Voltage setting, 3 digits in decivolts.
    #[strum(serialize = "VOLT")]
    SetVoltage,
    /// __W__ - Current setting, 3 digits (4 on widened models) in current steps.
    #[strum(serialize = "CURR")]
    SetCurrent,
    /// __Q__ - Live reading.
    ///
    /// Response `VVVVIIIIM`: centivolts, centiamps, mode (`0` = CV, `1` = CC).
    #[strum(serialize = "GETD")]
    GetReading,
    /// __W__ - Store all three PROM presets, 3 × (3 digit voltage + current field).
    #[strum(serialize = "PROM")]
    StorePresets,
    /// __Q__ - Load all three PROM presets.
    ///
    /// Response `VVVIII?VVVIII?VVVIII` with a one byte separator between slots.
    #[strum(serialize = "GETM")]
    LoadPresets,
    /// __W__ - Activate a PROM preset, 1 digit slot number.
    #[strum(serialize = "RUNM")]
    RunPreset,
    /// __Q__ - Active preset register, `VVVIII`.
    #[strum(serialize = "GETS")]
    GetPreset,
    /// __Q__ - Active preset voltage, `VVV`.
    #[strum(serialize = "GOVP")]
    GetPresetVoltage,
    /// __W__ - Active preset voltage, 3 digits in decivolts.
    #[strum(serialize = "SOVP")]
    SetPresetVoltage,
    /// __Q__ - Active preset current, `III`.
    #[strum(serialize = "GOCP")]
    GetPresetCurrent,
    /// __W__ - Active preset current, 3 digits (4 on widened models) in current steps.
    #[strum(serialize = "SOCP")]
    SetPresetCurrent,
}

impl Command {
    pub fn mnemonic(&self) -> &'static str {
        self.into()
    }

    /// Build the request line for this command with the given arguments.
    pub fn request(&self, arguments: fmt::Arguments<'_>) -> Result<Request, fmt::Error> {
        let mut line = Request::new();
        line.push_str(self.mnemonic()).map_err(|_| fmt::Error)?;
        line.write_fmt(arguments)?;
        Ok(line)
    }
}
