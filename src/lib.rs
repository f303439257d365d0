//! This crate provides an interface for communicating with and controlling the Voltcraft PPS and DPPS
//! series of programmable power supplies.
//!
//! It supports `no-std` environments by use of the `no-std` feature flag.
//!
//! The supply is identified at connection time from the maximum voltage and current it reports.
//! Known models:
//!
//! | Max voltage | Max current | Model | Min voltage |
//! |---|---|---|---|
//! | 18.0 V | 10.0 A | PPS11810 | 0 V |
//! | 36.2 V | 7.0 A | PPS11360 | 0.8 V |
//! | 60.0 V | 2.5 A | PPS11603 | 0 V |
//! | 18.2 V | 22.0 A | PPS13610 | 0 V |
//! | 36.2 V | 12.0 A | PPS16005 | 0.8 V |
//! | 60.0 V | 5.0 A | PPS11815 | 0 V |
//! | 18.2 V | 12.0 A | PPS11810 | 0 V |
//! | 32.2 V | 21.5 A | DPPS3220 | 0.8 V |
//! | 32.2 V | 31.5 A | DPPS3230 | 0.8 V |
//! | 60.5 V | 11.0 A | DPPS6010 | 0 V |
//! | 16.2 V | 43.0 A | DPPS1640 | 1.0 V |
//!
//! The supply speaks a line based ASCII protocol over USB serial. Any interface implementing
//! [embedded_io::Read], [embedded_io::Write] and [embedded_io::ReadReady] can be used, as long as
//! each single byte read is bounded by [transport::BYTE_TIMEOUT].
//!
//! ```no_run
//! # fn demo<S>(port: S) -> Result<(), voltcraft_pps::error::Error<S::Error>>
//! # where S: embedded_io::Read + embedded_io::Write + embedded_io::ReadReady {
//! use voltcraft_pps::{psu::{ConnectOptions, Pps}, transport::Transport};
//!
//! let mut pps = Pps::connect(Transport::new(port), ConnectOptions::default())?;
//! pps.set_voltage(12.0)?;
//! pps.set_current(0.5)?;
//! pps.output(true)?;
//! let reading = pps.reading()?;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(feature = "no-std", no_std)]

pub mod codec;
pub mod command;
pub mod error;
pub mod identity;
pub mod model;
pub mod preset;
pub mod psu;
pub mod trace;
pub mod transport;
pub mod types;

#[cfg(test)]
mod mock_serial;
