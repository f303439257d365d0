use clap::{Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use humantime::Duration;
use voltcraft_pps::{
    preset::{Preset, PresetSlot},
    transport::BYTE_TIMEOUT,
};

fn default_timeout() -> Duration {
    std::time::Duration::from_millis(BYTE_TIMEOUT.to_millis().into()).into()
}

fn parse_slot(s: &str) -> Result<PresetSlot, String> {
    match s.parse::<u8>() {
        Ok(slot @ 0..=2) => Ok(PresetSlot::from(slot)),
        Ok(slot) => Err(format!("Preset slot {slot} out of range 0..=2")),
        Err(e) => Err(format!("Invalid preset slot format: {e}")),
    }
}

fn parse_value(s: &str) -> Result<f32, String> {
    let value = s
        .parse::<f32>()
        .map_err(|e| format!("Invalid number format: {e}"))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("Value {s} is not finite"))
    }
}

fn parse_preset(s: &str) -> Result<Preset, String> {
    let (voltage, current) = s
        .split_once(':')
        .ok_or_else(|| format!("Expected VOLTS:AMPS, got '{s}'"))?;
    Ok(Preset::new(parse_value(voltage)?, parse_value(current)?))
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum CliCommands {
    /// Print model, limits and a live reading (default).
    Status,

    /// Switch the output on.
    On,

    /// Switch the output off.
    Off,

    /// Read and print voltage, current and CV/CC mode.
    Read,

    /// Read and print the delivered power.
    Power,

    /// Set the output voltage limit in volts.
    /// Values outside the supply's range are clamped.
    #[clap(verbatim_doc_comment)]
    Voltage {
        #[arg(value_parser = parse_value, allow_negative_numbers = true)]
        volts: f32,
    },

    /// Set the output current limit in amps.
    /// Values outside the supply's range are clamped.
    #[clap(verbatim_doc_comment)]
    Current {
        #[arg(value_parser = parse_value, allow_negative_numbers = true)]
        amps: f32,
    },

    /// Print the three PROM presets and the active preset.
    Presets,

    /// Overwrite all three PROM presets, each given as VOLTS:AMPS.
    /// Example: "5:1" "12:0.5" "24:2.25"
    #[clap(verbatim_doc_comment)]
    StorePresets {
        #[arg(value_parser = parse_preset)]
        slot0: Preset,
        #[arg(value_parser = parse_preset)]
        slot1: Preset,
        #[arg(value_parser = parse_preset)]
        slot2: Preset,
    },

    /// Activate a PROM preset (0, 1 or 2).
    UsePreset {
        #[arg(value_parser = parse_slot)]
        slot: PresetSlot,
    },
}

const fn about_text() -> &'static str {
    "Voltcraft PPS CLI - Control Voltcraft PPS/DPPS power supplies over their USB serial port."
}

#[derive(Parser, Debug)]
#[command(name = "pps", author, version, about = about_text(), long_about = None)]
pub struct CliArgs {
    /// Configure verbosity of logging output.
    /// -v for info, -vv for debug (including a trace of every exchange), -vvv for trace.
    #[command(flatten)]
    pub verbose: Verbosity<WarnLevel>,

    /// Serial port device name.
    /// Examples: "/dev/ttyUSB0" (Linux), "COM3" (Windows).
    #[arg(verbatim_doc_comment)]
    pub port: String,

    /// Timeout for every single byte read.
    /// Examples: "1s", "500ms".
    #[arg(long, default_value_t = default_timeout(), verbatim_doc_comment)]
    pub timeout: Duration,

    /// Switch the output off and zero both setpoints after connecting.
    #[arg(long)]
    pub reset: bool,

    /// Activate a PROM preset (0, 1 or 2) after connecting.
    #[arg(long, value_parser = parse_slot)]
    pub preset: Option<PresetSlot>,

    #[command(subcommand)]
    pub command: Option<CliCommands>,
}
