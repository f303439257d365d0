//! What the connected supply is and how its fields are scaled.
//!
//! An [`Identity`] is resolved once from the `GMAX` response and never changes afterwards. It owns
//! the saturation policy: every voltage or current sent to the supply is first clamped to the
//! model's range, never rejected.

use crate::{
    codec::{self, Limits, VOLTAGE_FACTOR},
    error::IdentificationError,
    model::Model,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Identity {
    model: Model,
    limits: Limits,
    /// Decivolts.
    min_voltage: u16,
}

impl Identity {
    /// Resolve the identity from a raw `GMAX` payload.
    pub fn from_limits_response(payload: &str) -> Result<Self, IdentificationError> {
        let limits = Limits::decode(payload).ok_or(IdentificationError::MalformedLimits)?;
        Self::from_limits(limits)
    }

    /// Resolve the identity from decoded ceilings.
    pub fn from_limits(limits: Limits) -> Result<Self, IdentificationError> {
        let model = Model::from_ceilings(limits.voltage, limits.scale.to_centiamps(limits.current))
            .ok_or(IdentificationError::UnknownModel {
                max_voltage: limits.max_voltage(),
                max_current: limits.max_current(),
            })?;
        let min_voltage = model
            .min_voltage_decivolts()
            .ok_or(IdentificationError::UnknownMinimumVoltage(model))?;
        Ok(Identity {
            model,
            limits,
            min_voltage,
        })
    }

    pub fn model(&self) -> Model {
        self.model
    }

    /// Maximum output voltage in volts.
    pub fn max_voltage(&self) -> f32 {
        self.limits.max_voltage()
    }

    /// Maximum output current in amps.
    pub fn max_current(&self) -> f32 {
        self.limits.max_current()
    }

    /// Minimum output voltage in volts.
    pub fn min_voltage(&self) -> f32 {
        codec::from_fixed(self.min_voltage, VOLTAGE_FACTOR)
    }

    /// Current multiplier, `10.0` or `100.0`.
    pub fn current_multiplier(&self) -> f32 {
        self.limits.scale.multiplier()
    }

    /// Digits of every current field, 3 or 4.
    pub fn current_width(&self) -> usize {
        self.limits.current_width
    }

    /// Saturate a voltage to `[min_voltage, max_voltage]`. NaN saturates to the minimum.
    pub fn clamp_voltage(&self, voltage: f32) -> f32 {
        voltage.max(self.min_voltage()).min(self.max_voltage())
    }

    /// Saturate a current to `[0, max_current]`. NaN saturates to zero.
    pub fn clamp_current(&self, current: f32) -> f32 {
        current.max(0.0).min(self.max_current())
    }

    /// Saturate and convert a voltage to its wire value.
    pub fn encode_voltage(&self, voltage: f32) -> u16 {
        codec::to_fixed(self.clamp_voltage(voltage), VOLTAGE_FACTOR)
            .clamp(self.min_voltage, self.limits.voltage)
    }

    /// Saturate and convert a current to its wire value.
    pub fn encode_current(&self, current: f32) -> u16 {
        codec::to_fixed(self.clamp_current(current), self.current_multiplier())
            .min(self.limits.current)
    }

    pub fn decode_voltage(&self, raw: u16) -> f32 {
        codec::from_fixed(raw, VOLTAGE_FACTOR)
    }

    pub fn decode_current(&self, raw: u16) -> f32 {
        codec::from_fixed(raw, self.current_multiplier())
    }
}
