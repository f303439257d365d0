//! Voltcraft PPS CLI
//!
//! A command-line interface for Voltcraft PPS/DPPS programmable power supplies connected over
//! their USB serial port.
//!
//! This tool allows users to:
//! - Print the identified model, its limits and a live reading.
//! - Switch the output on and off.
//! - Set the voltage and current limits.
//! - Read, store and activate the PROM presets.

use anyhow::{Context, Result};
use clap::Parser;
use flexi_logger::{Logger, LoggerHandle};
use log::*;
use std::panic;
use voltcraft_pps::{
    psu::{ConnectOptions, Pps},
    trace::LogTrace,
    transport::Transport,
    types::State,
};

mod commandline;
mod port;

type Supply = Pps<port::PortWrapper, LogTrace>;

fn logging_init(loglevel: LevelFilter) -> Result<LoggerHandle> {
    let log_handle = Logger::try_with_env_or_str(loglevel.as_str())
        .context("Cannot init logging")?
        .start()
        .context("Cannot start logging")?;

    panic::set_hook(Box::new(|panic_info| {
        let (filename, line, column) = panic_info
            .location()
            .map(|loc| (loc.file(), loc.line(), loc.column()))
            .unwrap_or(("<unknown_file>", 0, 0));

        let cause_str = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            *s
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.as_str()
        } else {
            "<unknown_panic_cause>"
        };

        error!(
            target: "panic",
            "Thread '{}' panicked at '{}': {}:{} - Cause: {}",
            std::thread::current().name().unwrap_or("<unnamed>"),
            filename,
            line,
            column,
            cause_str
        );
    }));
    Ok(log_handle)
}

fn print_status(pps: &mut Supply) -> Result<()> {
    let (max_voltage, max_current) = pps.limits();
    println!("MODEL={}", pps.model());
    println!("IMAX={}", pps.max_current());
    println!("VMAX={}", pps.max_voltage());
    println!("VMIN={}", pps.min_voltage());
    println!("IMULT={}", pps.current_multiplier());
    println!("limits=({max_voltage}, {max_current})");
    let reading = pps.reading().context("Cannot read output")?;
    println!("reading={reading}");
    Ok(())
}

fn print_presets(pps: &mut Supply) -> Result<()> {
    let presets = pps.load_presets().context("Cannot load presets")?;
    for (slot, preset) in presets.iter().enumerate() {
        println!("preset{slot}={preset}");
    }
    let active = pps.preset().context("Cannot read active preset")?;
    println!("active={active}");
    Ok(())
}

fn main() -> Result<()> {
    let args = commandline::CliArgs::parse();

    let _log_handle = logging_init(args.verbose.log_level_filter())?;
    info!(
        "Voltcraft PPS CLI started. Log level: {}",
        args.verbose.log_level_filter()
    );

    let port = port::open(&args.port, *args.timeout)
        .with_context(|| format!("Cannot open serial port {}", args.port))?;

    let mut options = ConnectOptions::default().with_reset(args.reset);
    if let Some(slot) = args.preset {
        options = options.with_preset(slot);
    }

    let transport = Transport::with_trace(port, LogTrace::new());
    let mut pps = match Pps::connect(transport, options) {
        Ok(pps) => pps,
        Err(e) if e.is_identification_failure() => {
            error!("{} answered, but not like a supported Voltcraft PPS", args.port);
            return Err(e).context("Cannot identify power supply");
        }
        Err(e) => {
            return Err(e)
                .with_context(|| format!("Cannot connect to power supply on {}", args.port));
        }
    };

    match args.command.unwrap_or(commandline::CliCommands::Status) {
        commandline::CliCommands::Status => print_status(&mut pps)?,
        commandline::CliCommands::On => {
            pps.output(State::On).context("Cannot switch output on")?;
        }
        commandline::CliCommands::Off => {
            pps.output(State::Off).context("Cannot switch output off")?;
        }
        commandline::CliCommands::Read => {
            let reading = pps.reading().context("Cannot read output")?;
            println!("reading={reading}");
        }
        commandline::CliCommands::Power => {
            let power = pps.power_dissipation().context("Cannot read output")?;
            println!("power={power:.2} W");
        }
        commandline::CliCommands::Voltage { volts } => {
            let applied = pps.identity().clamp_voltage(volts);
            if applied != volts {
                warn!("Voltage {volts} V is out of range, using {applied:.1} V");
            }
            pps.set_voltage(volts).context("Cannot set voltage")?;
        }
        commandline::CliCommands::Current { amps } => {
            let applied = pps.identity().clamp_current(amps);
            if applied != amps {
                warn!("Current {amps} A is out of range, using {applied:.2} A");
            }
            pps.set_current(amps).context("Cannot set current")?;
        }
        commandline::CliCommands::Presets => print_presets(&mut pps)?,
        commandline::CliCommands::StorePresets {
            slot0,
            slot1,
            slot2,
        } => {
            for (slot, preset) in [slot0, slot1, slot2].iter().enumerate() {
                let applied = preset.clamped(pps.identity());
                if applied != *preset {
                    warn!("Preset {slot} ({preset}) is out of range, using {applied}");
                }
            }
            pps.store_presets(slot0, slot1, slot2)
                .context("Cannot store presets")?;
        }
        commandline::CliCommands::UsePreset { slot } => {
            pps.use_preset(slot).context("Cannot activate preset")?;
        }
    }

    Ok(())
}
