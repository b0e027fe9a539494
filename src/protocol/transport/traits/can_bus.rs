//! Minimal split abstraction over a non-blocking CAN controller.
//!
//! Reception runs in interrupt context and transmission in the main loop, so
//! the two directions are separate traits. Both are implemented for every
//! [`embedded_can::nb::Can`] driver, and a HAL that splits its peripheral into
//! RX/TX halves can implement them one per half.

/// Receive side of a CAN controller.
pub trait CanReceiver {
    type Frame: embedded_can::Frame;
    type Error: embedded_can::Error;
    /// Pop one frame from the hardware receive FIFO.
    ///
    /// `Err(nb::Error::WouldBlock)` means the FIFO is empty.
    fn receive(&mut self) -> nb::Result<Self::Frame, Self::Error>;
}

/// Transmit side of a CAN controller.
pub trait CanTransmitter {
    type Frame: embedded_can::Frame;
    type Error: embedded_can::Error;
    /// Queue a frame for transmission.
    ///
    /// `Err(nb::Error::WouldBlock)` means every TX mailbox is busy. On success a
    /// lower-priority pending frame may be handed back.
    fn transmit(&mut self, frame: &Self::Frame) -> nb::Result<Option<Self::Frame>, Self::Error>;
}

impl<C: embedded_can::nb::Can> CanReceiver for C {
    type Frame = C::Frame;
    type Error = C::Error;

    fn receive(&mut self) -> nb::Result<Self::Frame, Self::Error> {
        embedded_can::nb::Can::receive(self)
    }
}

impl<C: embedded_can::nb::Can> CanTransmitter for C {
    type Frame = C::Frame;
    type Error = C::Error;

    fn transmit(&mut self, frame: &Self::Frame) -> nb::Result<Option<Self::Frame>, Self::Error> {
        embedded_can::nb::Can::transmit(self, frame)
    }
}
