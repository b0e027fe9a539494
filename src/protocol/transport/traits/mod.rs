//! Abstraction traits for the collaborators of the monitor (CAN controller,
//! serial link, timer, and system control).
pub mod can_bus;
pub mod monitor_timer;
pub mod serial_port;
pub mod system_control;
