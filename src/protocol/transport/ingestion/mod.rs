//! Receive ingestion: the interrupt-context half of the monitor.
//!
//! A "new message" interrupt may stand for several frames already waiting in
//! the controller, and the controller does not signal again for frames it
//! already holds. Each invocation therefore drains the hardware FIFO until it
//! reports empty.
//!
//! When the software queue is full the frame is still read, then
//! dropped. Reading clears the hardware FIFO entry, so the controller keeps
//! receiving and does not enter an overrun state. The queue's `head` is left
//! untouched.
//!
//! # Interrupt handler sketch
//!
//! ```rust,ignore
//! static QUEUE: MonitorQueue = MonitorQueue::new();
//! static INGESTION: Mutex<CriticalSectionRawMutex, RefCell<Option<Ingestion>>> = ...;
//!
//! #[interrupt]
//! fn FDCAN1_IT0() {
//!     INGESTION.lock(|cell| {
//!         if let Some(ingestion) = cell.borrow_mut().as_mut() {
//!             if ingestion.on_interrupt().is_err() {
//!                 // The fault is latched in QUEUE; mask this interrupt so the
//!                 // main loop gets to run and report it.
//!                 pac::NVIC::mask(pac::Interrupt::FDCAN1_IT0);
//!             }
//!         }
//!     });
//! }
//! ```
use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_can::Error as _;

use crate::error::IngestError;
use crate::infra::queue::FrameProducer;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::traits::can_bus::CanReceiver;

/// Outcome of one FIFO drain.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IngestReport {
    /// Frames read from the hardware FIFO.
    pub received: usize,
    /// Frames committed to the software queue.
    pub queued: usize,
    /// Frames read but refused because the queue was full.
    pub dropped: usize,
}

impl IngestReport {
    fn absorb(&mut self, other: &IngestReport) {
        self.received = self.received.saturating_add(other.received);
        self.queued = self.queued.saturating_add(other.queued);
        self.dropped = self.dropped.saturating_add(other.dropped);
    }
}

/// Drain the controller's receive FIFO into the queue.
///
/// Stops at the first `WouldBlock` (FIFO empty). Any other hardware error is
/// fatal and returned as-is; frames committed before it stay in the queue.
pub fn drain_receive_fifo<R, M, const N: usize>(
    rx: &mut R,
    producer: &FrameProducer<'_, M, N>,
) -> Result<IngestReport, IngestError>
where
    R: CanReceiver,
    M: RawMutex,
{
    let mut report = IngestReport::default();
    loop {
        match rx.receive() {
            Ok(hw_frame) => {
                report.received += 1;
                let frame = CanFrame::from_frame(&hw_frame);
                if producer.enqueue(frame) {
                    report.queued += 1;
                } else {
                    report.dropped += 1;
                }
            }
            Err(nb::Error::WouldBlock) => break,
            Err(nb::Error::Other(err)) => return Err(IngestError::Hardware(err.kind())),
        }
    }

    #[cfg(feature = "defmt")]
    if report.dropped > 0 {
        defmt::warn!("frame queue full, dropped {} frame(s)", report.dropped);
    }

    Ok(report)
}

/// Receiver and producer handle bundled for an interrupt handler.
pub struct ReceiveIngestion<'q, R, M, const N: usize>
where
    R: CanReceiver,
    M: RawMutex,
{
    rx: R,
    producer: FrameProducer<'q, M, N>,
    totals: IngestReport,
}

impl<'q, R, M, const N: usize> ReceiveIngestion<'q, R, M, N>
where
    R: CanReceiver,
    M: RawMutex,
{
    pub fn new(rx: R, producer: FrameProducer<'q, M, N>) -> Self {
        Self {
            rx,
            producer,
            totals: IngestReport::default(),
        }
    }

    /// Body of the "new message" interrupt.
    ///
    /// On a hardware error the fault is also latched in the queue, where the
    /// main loop picks it up and routes it to the fatal-error handler.
    pub fn on_interrupt(&mut self) -> Result<IngestReport, IngestError> {
        match drain_receive_fifo(&mut self.rx, &self.producer) {
            Ok(report) => {
                self.totals.absorb(&report);
                Ok(report)
            }
            Err(IngestError::Hardware(kind)) => {
                #[cfg(feature = "defmt")]
                defmt::error!("CAN receive error: {}", kind);
                self.producer.report_fault(kind);
                Err(IngestError::Hardware(kind))
            }
        }
    }

    /// Counters accumulated over every successful invocation.
    pub fn totals(&self) -> IngestReport {
        self.totals
    }

    /// Give the receiver back (e.g. to reconfigure the controller).
    pub fn release(self) -> R {
        self.rx
    }
}
