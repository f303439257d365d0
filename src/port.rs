//! Adapts a `serialport` port to the `embedded-io` traits the driver is written against.

use std::{io, time::Duration};

use embedded_io::ErrorKind;
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};

/// The supply's fixed line settings: 9600 baud, 8N1.
pub const BAUD_RATE: u32 = 9600;

pub struct PortWrapper(Box<dyn SerialPort>);

/// Open `path` with the supply's line settings. `timeout` bounds every single read.
pub fn open(path: &str, timeout: Duration) -> serialport::Result<PortWrapper> {
    let port = serialport::new(path, BAUD_RATE)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .flow_control(FlowControl::None)
        .timeout(timeout)
        .open()?;
    Ok(PortWrapper(port))
}

/// A failed port operation. The `embedded-io` kind is decided once, when the error is raised.
#[derive(Debug, thiserror::Error)]
#[error("serial port failure ({kind:?}): {source}")]
pub struct PortError {
    kind: ErrorKind,
    #[source]
    source: io::Error,
}

impl From<io::Error> for PortError {
    fn from(source: io::Error) -> Self {
        // Some drivers report an expired read timeout as WouldBlock.
        let kind = match source.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => ErrorKind::TimedOut,
            io::ErrorKind::Interrupted => ErrorKind::Interrupted,
            io::ErrorKind::NotFound | io::ErrorKind::NotConnected | io::ErrorKind::BrokenPipe => {
                ErrorKind::NotConnected
            }
            io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
            _ => ErrorKind::Other,
        };
        PortError { kind, source }
    }
}

impl embedded_io::Error for PortError {
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl embedded_io::ErrorType for PortWrapper {
    type Error = PortError;
}

impl embedded_io::Read for PortWrapper {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        Ok(io::Read::read(&mut self.0, buf)?)
    }
}

impl embedded_io::ReadReady for PortWrapper {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        let waiting = self.0.bytes_to_read().map_err(io::Error::from)?;
        Ok(waiting > 0)
    }
}

impl embedded_io::Write for PortWrapper {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        Ok(io::Write::write(&mut self.0, buf)?)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(io::Write::flush(&mut self.0)?)
    }
}
