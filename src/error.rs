//! Error definitions shared across library modules.
//! Hardware transaction failures are fatal for the monitor; everything that
//! can be recovered locally (full queue, unknown command, long line) is not
//! modelled as an error at all.
use thiserror_no_std::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Errors raised while building a [`CanId`](crate::protocol::transport::can_id::CanId)
/// or a [`CanFrame`](crate::protocol::transport::can_frame::CanFrame).
pub enum FrameBuildError {
    /// Identifier does not fit in 11 bits.
    #[error("Standard identifier out of range: {raw:#x}")]
    StandardIdOutOfRange { raw: u32 },
    /// Identifier does not fit in 29 bits.
    #[error("Extended identifier out of range: {raw:#x}")]
    ExtendedIdOutOfRange { raw: u32 },
    /// More than eight payload bytes were supplied.
    #[error("Payload too long: {len} bytes")]
    PayloadTooLong { len: usize },
    /// Remote frame data length code above eight.
    #[error("Data length code out of range: {dlc}")]
    DlcOutOfRange { dlc: usize },
}

//==================================================================================INGEST_ERROR
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Failure while draining the hardware receive FIFO.
pub enum IngestError {
    /// The controller reported something other than "FIFO empty".
    #[error("CAN receive error: {0:?}")]
    Hardware(embedded_can::ErrorKind),
}

//==================================================================================SERIAL_ERROR
#[derive(Error, Debug)]
/// Failure of a serial read.
pub enum SerialError<E: core::fmt::Debug> {
    /// No byte arrived within the bounded wait.
    #[error("Serial read timed out")]
    Timeout,
    /// The transport itself failed.
    #[error("Serial transfer error: {0:?}")]
    Transfer(E),
}

//==================================================================================MONITOR_ERROR
#[derive(Error, Debug)]
/// Fatal errors surfaced by the monitor loop. `E` is the serial port error type.
pub enum MonitorError<E: core::fmt::Debug> {
    /// The receive interrupt hit a hardware error while draining the FIFO.
    #[error("CAN receive error: {0:?}")]
    CanReceive(embedded_can::ErrorKind),
    /// Transmitting the test frame failed.
    #[error("CAN transmit error: {0:?}")]
    CanTransmit(embedded_can::ErrorKind),
    /// The driver frame type refused the test frame.
    #[error("Test frame rejected by the CAN driver")]
    TestFrameRejected,
    /// Serial read failed or timed out.
    #[error("Serial read error: {0}")]
    SerialRead(SerialError<E>),
    /// Serial write failed.
    #[error("Serial write error: {0:?}")]
    SerialWrite(E),
    /// Trigger input or status output failed.
    #[error("Digital I/O error: {0:?}")]
    Gpio(embedded_hal::digital::ErrorKind),
    /// A rendered line did not fit in its buffer.
    #[error("Render buffer overflow")]
    RenderOverflow,
}

impl<E: core::fmt::Debug> From<IngestError> for MonitorError<E> {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::Hardware(kind) => MonitorError::CanReceive(kind),
        }
    }
}
