//! Known Voltcraft supply models.
//!
//! The models do not report a name, only their maximum voltage and current. The naming scheme
//! does not follow those ceilings in any obvious way, so both are plain lookup tables.

use strum_macros::{Display, EnumIter, IntoStaticStr};

use crate::codec::{self, VOLTAGE_FACTOR};

/// This enum represents all known product models.
#[derive(Debug, Display, EnumIter, IntoStaticStr, Clone, Copy, PartialEq, Eq)]
pub enum Model {
    /// Ceilings not confirmed on hardware.
    #[strum(serialize = "PPS11810")]
    Pps11810,
    #[strum(serialize = "PPS11360")]
    Pps11360,
    /// Ceilings not confirmed on hardware.
    #[strum(serialize = "PPS11603")]
    Pps11603,
    #[strum(serialize = "PPS13610")]
    Pps13610,
    #[strum(serialize = "PPS16005")]
    Pps16005,
    /// Ceilings not confirmed on hardware.
    #[strum(serialize = "PPS11815")]
    Pps11815,
    #[strum(serialize = "DPPS3220")]
    Dpps3220,
    #[strum(serialize = "DPPS3230")]
    Dpps3230,
    #[strum(serialize = "DPPS6010")]
    Dpps6010,
    #[strum(serialize = "DPPS1640")]
    Dpps1640,
}

/// Maximum voltage (decivolts) and maximum current (centiamps) of each model.
///
/// Two ceiling pairs map to the PPS11810.
static MODELS: [(u16, u32, Model); 11] = [
    (180, 1000, Model::Pps11810),
    (362, 700, Model::Pps11360),
    (600, 250, Model::Pps11603),
    (182, 2200, Model::Pps13610),
    (362, 1200, Model::Pps16005),
    (600, 500, Model::Pps11815),
    (182, 1200, Model::Pps11810),
    (322, 2150, Model::Dpps3220),
    (322, 3150, Model::Dpps3230),
    (605, 1100, Model::Dpps6010),
    (162, 4300, Model::Dpps1640),
];

/// Lowest settable voltage of each model, in decivolts.
static MIN_VOLTAGES: [(Model, u16); 10] = [
    (Model::Pps11810, 0),
    (Model::Pps11360, 8),
    (Model::Pps11603, 0),
    (Model::Pps13610, 0),
    (Model::Pps16005, 8),
    (Model::Pps11815, 0),
    (Model::Dpps3220, 8),
    (Model::Dpps3230, 8),
    (Model::Dpps6010, 0),
    (Model::Dpps1640, 10),
];

impl Model {
    /// Identify a model from its maximum voltage and current in volts and amps.
    ///
    /// ```
    /// use voltcraft_pps::model::Model;
    ///
    /// assert_eq!(Model::identify(36.2, 7.0), Some(Model::Pps11360));
    /// assert_eq!(Model::identify(99.9, 99.9), None);
    /// ```
    pub fn identify(max_voltage: f32, max_current: f32) -> Option<Model> {
        Self::from_ceilings(
            codec::to_fixed(max_voltage, VOLTAGE_FACTOR),
            codec::to_fixed(max_current, 100.0) as u32,
        )
    }

    /// Identify a model from its ceilings in decivolts and centiamps.
    pub fn from_ceilings(decivolts: u16, centiamps: u32) -> Option<Model> {
        MODELS
            .iter()
            .find(|(v, i, _)| *v == decivolts && *i == centiamps)
            .map(|(_, _, model)| *model)
    }

    /// Lowest voltage the model can be set to, in decivolts.
    pub fn min_voltage_decivolts(&self) -> Option<u16> {
        MIN_VOLTAGES
            .iter()
            .find(|(model, _)| model == self)
            .map(|(_, decivolts)| *decivolts)
    }

    /// Lowest voltage the model can be set to, in volts.
    pub fn min_voltage(&self) -> Option<f32> {
        self.min_voltage_decivolts()
            .map(|decivolts| codec::from_fixed(decivolts, VOLTAGE_FACTOR))
    }

    /// The model number as printed on the supply.
    pub fn name(&self) -> &'static str {
        self.into()
    }
}
