//! Byte level tracing of exchanges.
//!
//! A [`Transport`](crate::transport::Transport) reports every command it sends and every byte it
//! receives to its trace sink. The unit type `()` discards everything; [`LogTrace`] forwards
//! complete lines to the `log` facade at debug level.

use core::fmt::{self, Write};

/// Receives a copy of the traffic of every exchange.
pub trait Trace {
    /// A command line is about to be sent, without its terminator.
    fn command(&mut self, _command: &str) {}
    /// One response byte was received.
    fn response_byte(&mut self, _byte: u8) {}
    /// The response terminator was received.
    fn response_end(&mut self) {}
    /// The exchange ended without a complete response.
    fn response_aborted(&mut self) {}
}

impl Trace for () {}

impl<T: Trace + ?Sized> Trace for &mut T {
    fn command(&mut self, command: &str) {
        (**self).command(command)
    }

    fn response_byte(&mut self, byte: u8) {
        (**self).response_byte(byte)
    }

    fn response_end(&mut self) {
        (**self).response_end()
    }

    fn response_aborted(&mut self) {
        (**self).response_aborted()
    }
}

/// Render a byte the way it shows up in a trace: `\r` as `<CR>`, other control or non ASCII
/// bytes as `<0xNN>`.
pub fn render_byte(byte: u8, out: &mut impl Write) -> fmt::Result {
    match byte {
        b'\r' => out.write_str("<CR>"),
        0x20..=0x7e => out.write_char(byte as char),
        _ => write!(out, "<0x{byte:02X}>"),
    }
}

/// Capacity of one traced response line. Longer responses are cut short with `...`.
pub const TRACE_LINE_CAPACITY: usize = 128;

/// Trace sink forwarding to `log::debug!`.
#[derive(Debug, Default)]
pub struct LogTrace {
    line: heapless::String<TRACE_LINE_CAPACITY>,
    truncated: bool,
}

impl LogTrace {
    pub fn new() -> Self {
        Self::default()
    }

    fn take_line(&mut self) -> (heapless::String<TRACE_LINE_CAPACITY>, &'static str) {
        let suffix = if self.truncated { "..." } else { "" };
        self.truncated = false;
        (core::mem::take(&mut self.line), suffix)
    }
}

impl Trace for LogTrace {
    fn command(&mut self, command: &str) {
        log::debug!("PPS <- {command}<CR>");
    }

    fn response_byte(&mut self, byte: u8) {
        if !self.truncated && render_byte(byte, &mut self.line).is_err() {
            self.truncated = true;
        }
    }

    fn response_end(&mut self) {
        let (line, suffix) = self.take_line();
        log::debug!("PPS -> {line}{suffix}");
    }

    fn response_aborted(&mut self) {
        let (line, suffix) = self.take_line();
        log::debug!("PPS -> {line}{suffix} (aborted)");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(bytes: &[u8]) -> heapless::String<64> {
        let mut out = heapless::String::new();
        for &byte in bytes {
            render_byte(byte, &mut out).unwrap();
        }
        out
    }

    #[test]
    fn carriage_return_is_spelled_out() {
        assert_eq!(render(b"362700\rOK\r").as_str(), "362700<CR>OK<CR>");
    }

    #[test]
    fn control_bytes_are_hex() {
        assert_eq!(render(&[0x00, b'A', 0xFF]).as_str(), "<0x00>A<0xFF>");
    }

    #[test]
    fn log_trace_truncates_long_lines() {
        let mut trace = LogTrace::new();
        for _ in 0..TRACE_LINE_CAPACITY + 10 {
            trace.response_byte(b'9');
        }
        assert!(trace.truncated);
        assert_eq!(trace.line.len(), TRACE_LINE_CAPACITY);

        trace.response_end();
        assert!(!trace.truncated);
        assert!(trace.line.is_empty());
    }
}
