//! Request/response framing over a byte stream.

use embedded_io::{Error as _, ErrorKind, Read, ReadReady, Write};
use fugit::MillisDurationU32;

use crate::{
    error::{Error, Result},
    trace::Trace,
};

/// Timeout the serial interface must apply to every single byte read.
///
/// The bound is per byte, not per exchange: a response that keeps trickling in never times out.
pub const BYTE_TIMEOUT: MillisDurationU32 = MillisDurationU32::millis(1000);

/// Request line terminator.
pub const REQUEST_TERMINATOR: u8 = b'\r';

/// Every response ends with this marker.
pub const RESPONSE_TERMINATOR: &[u8] = b"OK\r";

/// Number of bytes stripped from the end of a response: one padding byte plus the marker.
pub const RESPONSE_SUFFIX_LEN: usize = RESPONSE_TERMINATOR.len() + 1;

/// Largest response accepted, including the suffix. The longest the supply sends is `GETM` with
/// four digit currents, 23 bytes of payload; anything past this limit is
/// [`Error::BufferOverflow`].
pub const RESPONSE_CAPACITY: usize = 64;

/// The payload of a response.
pub type Response = heapless::String<RESPONSE_CAPACITY>;

/// You can create a Transport using any interface which implements [embedded_io::Read],
/// [embedded_io::Write] & [embedded_io::ReadReady].
///
/// A single byte read which yields nothing, a NUL byte or a [`ErrorKind::TimedOut`] error counts
/// as a timeout.
#[derive(Debug)]
pub struct Transport<S, T = ()> {
    interface: S,
    trace: T,
}

impl<S> Transport<S> {
    /// Create a Transport without tracing.
    pub fn new(interface: S) -> Self {
        Self {
            interface,
            trace: (),
        }
    }
}

impl<S, T> Transport<S, T>
where
    S: Read + Write + ReadReady,
    T: Trace,
{
    /// Create a Transport which reports its traffic to `trace`.
    pub fn with_trace(interface: S, trace: T) -> Self {
        Self { interface, trace }
    }

    /// Flush pending output and discard any input already waiting.
    pub fn clear(&mut self) -> Result<(), S::Error> {
        self.interface.flush().map_err(Error::SerialError)?;

        let mut discarded = 0usize;
        let mut scratch = [0u8; 16];
        while self.interface.read_ready().map_err(Error::SerialError)? {
            match self.interface.read(&mut scratch) {
                Ok(0) => break,
                Ok(count) => discarded += count,
                Err(e) if e.kind() == ErrorKind::TimedOut => break,
                Err(e) => return Err(Error::SerialError(e)),
            }
        }
        if discarded > 0 {
            log::debug!("Discarded {discarded} stale bytes");
        }
        Ok(())
    }

    /// Send `command` and return the response payload.
    pub fn exchange(&mut self, command: &str) -> Result<Response, S::Error> {
        self.trace.command(command);
        self.interface
            .write_all(command.as_bytes())
            .map_err(Error::SerialError)?;
        self.interface
            .write_all(&[REQUEST_TERMINATOR])
            .map_err(Error::SerialError)?;
        self.interface.flush().map_err(Error::SerialError)?;

        let mut buff: heapless::Vec<u8, RESPONSE_CAPACITY> = heapless::Vec::new();
        loop {
            let byte = match self.read_byte() {
                Ok(byte) => byte,
                Err(e) => {
                    self.trace.response_aborted();
                    return Err(e);
                }
            };
            self.trace.response_byte(byte);
            buff.push(byte).map_err(|_| Error::BufferOverflow)?;
            if buff.ends_with(RESPONSE_TERMINATOR) {
                break;
            }
        }
        self.trace.response_end();

        let end = buff.len().saturating_sub(RESPONSE_SUFFIX_LEN);
        let text = core::str::from_utf8(&buff[..end]).map_err(|_| Error::InvalidResponse)?;
        let mut payload = Response::new();
        payload
            .push_str(text)
            .map_err(|_| Error::BufferOverflow)?;
        log::trace!("{command} -> {payload:?}");
        Ok(payload)
    }

    fn read_byte(&mut self) -> Result<u8, S::Error> {
        let mut byte = [0u8; 1];
        match self.interface.read(&mut byte) {
            Ok(0) => Err(Error::Timeout),
            Ok(_) if byte[0] == 0x00 => Err(Error::Timeout),
            Ok(_) => Ok(byte[0]),
            Err(e) if e.kind() == ErrorKind::TimedOut => Err(Error::Timeout),
            Err(e) => Err(Error::SerialError(e)),
        }
    }

    /// Give back the serial interface.
    pub fn into_inner(self) -> S {
        self.interface
    }
}
