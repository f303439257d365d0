//! We use this mocking module in unit tests to emulate the supply's serial port.
//!
//! Queued responses are released one at a time, each when a request terminator is written, the
//! way the supply only answers once a command line is complete.

/// Largest single queued response.
const CHUNK_CAPACITY: usize = 128;

/// Our mock type used to emulate a serial port.
#[derive(Debug)]
pub struct MockSerial {
    /// Buffer to store data written to the mock serial port
    write_buffer: heapless::Vec<u8, 512>,
    /// Data that can currently be read
    read_buffer: heapless::Vec<u8, 512>,
    /// Current position in the read buffer
    read_position: usize,
    /// Responses waiting for their command
    pending: heapless::Deque<heapless::Vec<u8, CHUNK_CAPACITY>, 16>,
    /// Report an empty read instead of a timeout error once data runs out
    eof_on_exhaustion: bool,
    /// Flag to simulate write errors
    should_error_on_write: bool,
    /// Flag to simulate read errors
    should_error_on_read: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub enum MockSerialError {
    /// Simulated timeout error
    Timeout,
    /// Simulated buffer overflow
    BufferOverflow,
    /// Generic simulated error for testing
    SimulatedError,
}

impl core::fmt::Display for MockSerialError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MockSerialError::Timeout => f.write_str("mock read timed out"),
            MockSerialError::BufferOverflow => f.write_str("mock buffer full"),
            MockSerialError::SimulatedError => f.write_str("simulated serial failure"),
        }
    }
}

impl core::error::Error for MockSerialError {}

impl embedded_io::Error for MockSerialError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            MockSerialError::Timeout => embedded_io::ErrorKind::TimedOut,
            MockSerialError::BufferOverflow => embedded_io::ErrorKind::OutOfMemory,
            MockSerialError::SimulatedError => embedded_io::ErrorKind::Other,
        }
    }
}

impl embedded_io::ErrorType for MockSerial {
    type Error = MockSerialError;
}

impl embedded_io::Write for MockSerial {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        if self.should_error_on_write {
            return Err(MockSerialError::SimulatedError);
        }

        self.write_buffer
            .extend_from_slice(buf)
            .map_err(|_| MockSerialError::BufferOverflow)?;

        for _ in buf.iter().filter(|&&byte| byte == b'\r') {
            if let Some(response) = self.pending.pop_front() {
                self.read_buffer
                    .extend_from_slice(&response)
                    .map_err(|_| MockSerialError::BufferOverflow)?;
            }
        }

        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        if self.should_error_on_write {
            return Err(MockSerialError::SimulatedError);
        }
        Ok(())
    }
}

impl embedded_io::Read for MockSerial {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if self.should_error_on_read {
            return Err(MockSerialError::SimulatedError);
        }

        if self.read_position >= self.read_buffer.len() {
            return if self.eof_on_exhaustion {
                Ok(0)
            } else {
                Err(MockSerialError::Timeout)
            };
        }

        let available_bytes = self.read_buffer.len() - self.read_position;
        let bytes_to_read = core::cmp::min(buf.len(), available_bytes);

        buf[..bytes_to_read].copy_from_slice(
            &self.read_buffer[self.read_position..self.read_position + bytes_to_read],
        );

        self.read_position += bytes_to_read;
        Ok(bytes_to_read)
    }
}

impl embedded_io::ReadReady for MockSerial {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        if self.should_error_on_read {
            return Err(MockSerialError::SimulatedError);
        }
        Ok(self.read_position < self.read_buffer.len())
    }
}

impl MockSerial {
    /// Create a new MockSerial instance with empty buffers
    pub fn new() -> Self {
        Self {
            write_buffer: heapless::Vec::new(),
            read_buffer: heapless::Vec::new(),
            read_position: 0,
            pending: heapless::Deque::new(),
            eof_on_exhaustion: false,
            should_error_on_write: false,
            should_error_on_read: false,
        }
    }

    /// Make `data` readable straight away, as if it was left over from earlier traffic.
    pub fn set_read_data(&mut self, data: &[u8]) -> Result<(), MockSerialError> {
        self.read_buffer.clear();
        self.read_position = 0;
        self.read_buffer
            .extend_from_slice(data)
            .map_err(|_| MockSerialError::BufferOverflow)
    }

    /// Queue raw bytes to be sent back after the next command.
    pub fn queue_raw(&mut self, data: &[u8]) -> Result<(), MockSerialError> {
        let chunk =
            heapless::Vec::from_slice(data).map_err(|_| MockSerialError::BufferOverflow)?;
        self.pending
            .push_back(chunk)
            .map_err(|_| MockSerialError::BufferOverflow)
    }

    /// Queue a well formed response carrying `payload`.
    pub fn queue_response(&mut self, payload: &[u8]) -> Result<(), MockSerialError> {
        let mut chunk: heapless::Vec<u8, CHUNK_CAPACITY> = heapless::Vec::new();
        chunk
            .extend_from_slice(payload)
            .and_then(|_| chunk.extend_from_slice(b"\rOK\r"))
            .map_err(|_| MockSerialError::BufferOverflow)?;
        self.queue_raw(&chunk)
    }

    /// Queue the acknowledgement of a command without payload.
    pub fn queue_ack(&mut self) -> Result<(), MockSerialError> {
        self.queue_response(b"")
    }

    /// Get a reference to the data that was written to this mock serial port
    pub fn written_data(&self) -> &[u8] {
        &self.write_buffer
    }

    /// Iterate over the command lines written so far, without terminators.
    pub fn written_commands(&self) -> impl Iterator<Item = &str> {
        self.write_buffer
            .split(|&byte| byte == b'\r')
            .filter(|line| !line.is_empty())
            .map(|line| core::str::from_utf8(line).unwrap_or("<invalid>"))
    }

    /// Clear the write buffer
    pub fn clear_written_data(&mut self) {
        self.write_buffer.clear();
    }

    /// Number of queued responses whose command has not been written yet.
    pub fn pending_responses(&self) -> usize {
        self.pending.len()
    }

    /// Configure whether running out of data reads as end of stream rather than a timeout
    pub fn set_eof_on_exhaustion(&mut self, eof: bool) {
        self.eof_on_exhaustion = eof;
    }

    /// Configure whether write operations should fail with an error
    pub fn set_write_error(&mut self, should_error: bool) {
        self.should_error_on_write = should_error;
    }

    /// Configure whether read operations should fail with an error
    pub fn set_read_error(&mut self, should_error: bool) {
        self.should_error_on_read = should_error;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_io::{Error, Read, ReadReady, Write};

    #[test]
    fn test_new_mock_serial() {
        let mock = MockSerial::new();
        assert_eq!(mock.written_data().len(), 0);
        assert_eq!(mock.read_position, 0);
        assert_eq!(mock.pending_responses(), 0);
        assert!(!mock.should_error_on_write);
        assert!(!mock.should_error_on_read);
    }

    #[test]
    fn test_write_data() {
        let mut mock = MockSerial::new();
        let test_data = b"GMAX\r";

        let result = mock.write(test_data);
        assert_eq!(result, Ok(test_data.len()));
        assert_eq!(mock.written_data(), test_data);
    }

    #[test]
    fn test_write_buffer_overflow() {
        let mut mock = MockSerial::new();
        let result = mock.write(&[b'0'; 600]);
        assert_eq!(result, Err(MockSerialError::BufferOverflow));
    }

    #[test]
    fn test_response_released_by_terminator() {
        let mut mock = MockSerial::new();
        mock.queue_response(b"362700").unwrap();
        let mut buffer = [0u8; 16];

        assert_eq!(mock.read_ready(), Ok(false));
        mock.write(b"GMAX").unwrap();
        assert_eq!(mock.read(&mut buffer), Err(MockSerialError::Timeout));

        mock.write(b"\r").unwrap();
        assert_eq!(mock.read_ready(), Ok(true));
        assert_eq!(mock.read(&mut buffer), Ok(10));
        assert_eq!(&buffer[..10], b"362700\rOK\r");
        assert_eq!(mock.read_ready(), Ok(false));
    }

    #[test]
    fn test_responses_released_in_order() {
        let mut mock = MockSerial::new();
        mock.queue_ack().unwrap();
        mock.queue_response(b"050").unwrap();
        assert_eq!(mock.pending_responses(), 2);

        mock.write(b"SOUT0\rGOVP\r").unwrap();
        assert_eq!(mock.pending_responses(), 0);

        let mut buffer = [0u8; 16];
        let count = mock.read(&mut buffer).unwrap();
        assert_eq!(&buffer[..count], b"\rOK\r050\rOK\r");
    }

    #[test]
    fn test_read_partial_data() {
        let mut mock = MockSerial::new();
        mock.set_read_data(b"Long response data").unwrap();

        let mut buffer = [0u8; 5];
        assert_eq!(mock.read(&mut buffer), Ok(5));
        assert_eq!(&buffer, b"Long ");
    }

    #[test]
    fn test_exhaustion_modes() {
        let mut mock = MockSerial::new();
        let mut buffer = [0u8; 4];
        assert_eq!(mock.read(&mut buffer), Err(MockSerialError::Timeout));

        mock.set_eof_on_exhaustion(true);
        assert_eq!(mock.read(&mut buffer), Ok(0));
    }

    #[test]
    fn test_written_commands() {
        let mut mock = MockSerial::new();
        mock.write(b"GMAX\rVOLT050\r").unwrap();
        {
            let commands: heapless::Vec<&str, 4> = mock.written_commands().collect();
            assert_eq!(commands.as_slice(), ["GMAX", "VOLT050"]);
        }

        mock.clear_written_data();
        assert_eq!(mock.written_commands().count(), 0);
    }

    #[test]
    fn test_error_simulation() {
        let mut mock = MockSerial::new();
        mock.set_write_error(true);
        assert_eq!(mock.write(b"GMAX\r"), Err(MockSerialError::SimulatedError));
        assert_eq!(mock.flush(), Err(MockSerialError::SimulatedError));
        assert!(mock.written_data().is_empty());

        mock.set_read_error(true);
        let mut buffer = [0u8; 4];
        assert_eq!(mock.read(&mut buffer), Err(MockSerialError::SimulatedError));
        assert_eq!(mock.read_ready(), Err(MockSerialError::SimulatedError));
    }

    #[test]
    fn test_error_kinds() {
        assert!(matches!(
            MockSerialError::Timeout.kind(),
            embedded_io::ErrorKind::TimedOut
        ));
        assert!(matches!(
            MockSerialError::BufferOverflow.kind(),
            embedded_io::ErrorKind::OutOfMemory
        ));
        assert!(matches!(
            MockSerialError::SimulatedError.kind(),
            embedded_io::ErrorKind::Other
        ));
    }
}
