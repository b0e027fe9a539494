//! `can-monitor` library: the hardware-independent core of a CAN bus monitor
//! firmware. Frames are pulled out of the CAN controller from interrupt
//! context, handed to the main loop through a bounded queue, and printed as
//! hex text on a serial link that also accepts a handful of text commands.
#![no_std]
//==================================================================================
/// Crate-wide constants (capacities, banner, fixed replies).
pub mod core;
/// Runtime configuration of the monitor loop.
pub mod config;
/// Hardware, frame-construction, and monitor-loop errors.
pub mod error;
/// Building blocks without protocol knowledge: frame queue, rendering,
/// and the fatal-error handler.
pub mod infra;
/// CAN transport (identifiers, frames, driver traits, receive ingestion)
/// and the monitor itself.
pub mod protocol;
//==================================================================================
