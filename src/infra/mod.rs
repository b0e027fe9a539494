//! Infrastructure without CAN protocol knowledge: the interrupt-safe frame
//! queue, text rendering, and the fatal-error handler.
pub mod fault;
pub mod queue;
pub mod render;
