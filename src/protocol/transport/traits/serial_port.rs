//! Byte-oriented serial link carrying both the rendered frame stream and the
//! interactive command line.
use crate::error::SerialError;
use embassy_time::Duration;

/// Contract for the UART (or any byte pipe) the monitor talks through.
pub trait SerialPort {
    type Error: core::fmt::Debug;
    /// `true` when at least one received byte is waiting. Must not block.
    fn byte_available(&mut self) -> bool;
    /// Read one byte, waiting at most `timeout`.
    fn read_byte(&mut self, timeout: Duration) -> Result<u8, SerialError<Self::Error>>;
    /// Write every byte of `bytes`, blocking until accepted by the transport.
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;
}
