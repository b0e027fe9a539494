//! Main-loop side of the monitor: command line, trigger debounce, and the
//! loop that ties them to the frame queue and the serial link.
pub mod command_line;
pub mod monitor_loop;
pub mod trigger;
