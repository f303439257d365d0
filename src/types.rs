//! This module contains the value types exchanged with the supply.

use core::fmt;

use strum_macros::{Display, EnumIter};

/// Represents the two possible power supply control modes.
#[derive(Debug, Display, EnumIter, Clone, Copy, PartialEq, Eq)]
pub enum ControlMode {
    /// Constant voltage regulation mode.
    #[strum(serialize = "CV")]
    Cv,
    /// Constant current regulation mode.
    #[strum(serialize = "CC")]
    Cc,
}

/// Used to be less ambiguous about whether something is on or off.
#[derive(Debug, Display, Default, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Disabled.
    #[default]
    #[strum(serialize = "off")]
    Off,
    /// Enabled.
    #[strum(serialize = "on")]
    On,
}

impl From<State> for bool {
    fn from(value: State) -> Self {
        match value {
            State::Off => false,
            State::On => true,
        }
    }
}

impl From<bool> for State {
    fn from(value: bool) -> Self {
        match value {
            true => State::On,
            false => State::Off,
        }
    }
}

/// A live measurement of the output, as returned by `GETD`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Output voltage in volts.
    pub voltage: f32,
    /// Output current in amps.
    pub current: f32,
    pub mode: ControlMode,
}

impl Reading {
    /// Delivered power in watts.
    pub fn power(&self) -> f32 {
        self.voltage * self.current
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.2} V, {:.2} A, {}",
            self.voltage, self.current, self.mode
        )
    }
}
