//! The monitor itself: CAN transport plumbing and the main-loop components
//! (command line, trigger debounce, monitor loop).
pub mod monitor;
pub mod transport;
