//! Global fatal-error handler.
//!
//! Hardware transaction failures (CAN or serial) are never retried. They end
//! up here: interrupts are masked, a diagnostic is printed on the serial
//! link, and the system halts or resets according to [`FaultPolicy`].
use core::fmt::{Display, Write};

use heapless::String;

use crate::config::FaultPolicy;
use crate::core::FATAL_BANNER;
use crate::protocol::transport::traits::{serial_port::SerialPort, system_control::SystemControl};

/// Room for the error description line.
pub const DETAIL_CAPACITY: usize = 96;

/// Writer that keeps whole characters while they fit in `room` bytes.
struct Truncating<'a> {
    out: &'a mut String<DETAIL_CAPACITY>,
    room: usize,
}

impl Write for Truncating<'_> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        for ch in s.chars() {
            if self.out.len() + ch.len_utf8() > self.room {
                return Err(core::fmt::Error);
            }
            self.out.push(ch).map_err(|_| core::fmt::Error)?;
        }
        Ok(())
    }
}

/// Format the one-line description printed after [`FATAL_BANNER`].
///
/// Descriptions longer than the buffer are cut short.
pub fn fault_detail<E: Display>(error: &E) -> String<DETAIL_CAPACITY> {
    let mut detail: String<DETAIL_CAPACITY> = String::new();
    let mut writer = Truncating {
        out: &mut detail,
        room: DETAIL_CAPACITY - 2,
    };
    // Keep whatever fit when the description is too long.
    let _ = write!(writer, "{}", error);
    let _ = detail.push_str("\r\n");
    detail
}

/// Report `error` and never return.
///
/// Serial write failures during the report are ignored: there is nothing left
/// to escalate to.
pub fn fatal_error<S, C, E>(serial: &mut S, system: &mut C, policy: FaultPolicy, error: &E) -> !
where
    S: SerialPort,
    C: SystemControl,
    E: Display,
{
    system.disable_interrupts();

    #[cfg(feature = "defmt")]
    defmt::error!("fatal error: {}", defmt::Display2Format(error));

    let _ = serial.write_bytes(FATAL_BANNER.as_bytes());
    let _ = serial.write_bytes(fault_detail(error).as_bytes());

    match policy {
        FaultPolicy::Halt => system.halt(),
        FaultPolicy::Reset => system.reset(),
    }
}
