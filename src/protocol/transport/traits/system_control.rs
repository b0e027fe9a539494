//! Core-level control used once a fatal error has been detected.

/// Platform hooks for the fatal-error handler.
pub trait SystemControl {
    /// Mask every interrupt so nothing preempts the diagnostic output.
    fn disable_interrupts(&mut self);
    /// Stop forever (typically a `loop {}` or a debugger breakpoint).
    fn halt(&mut self) -> !;
    /// Restart the microcontroller.
    fn reset(&mut self) -> !;
}
