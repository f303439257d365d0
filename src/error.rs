//! Our error types for the Voltcraft PPS.

use thiserror::Error;

use crate::model::Model;

pub type Result<T, I> = core::result::Result<T, Error<I>>;

/// Custom error type for Voltcraft PPS communications.
#[derive(Error, Debug)]
pub enum Error<I: embedded_io::Error> {
    #[error("Serial communication error")]
    SerialError(I),
    #[error("Communication timeout")]
    Timeout,
    #[error("Response or request exceeds buffer capacity")]
    BufferOverflow,
    #[error("Invalid response received")]
    InvalidResponse,
    #[error(transparent)]
    Identification(#[from] IdentificationError),
}

impl<I: embedded_io::Error> Error<I> {
    /// Whether this error was raised while identifying the connected supply.
    pub fn is_identification_failure(&self) -> bool {
        matches!(self, Error::Identification(_))
    }
}

/// Fatal failures while working out which supply is connected.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum IdentificationError {
    #[error("Malformed maximum voltage/current response")]
    MalformedLimits,
    #[error("Unknown Voltcraft PPS model with max V: {max_voltage}, I: {max_current}")]
    UnknownModel { max_voltage: f32, max_current: f32 },
    #[error("Unknown minimum voltage for Voltcraft {0}")]
    UnknownMinimumVoltage(Model),
}
