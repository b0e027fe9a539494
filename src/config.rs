//! Runtime configuration of the monitor loop.
//!
//! The two hardware variants of the monitor differ in a few visible details
//! (remote frame display, command matching). Those details are options here
//! rather than compile-time forks.
//!
//! # Example
//!
//! ```
//! use can_monitor::config::{CommandCase, FaultPolicy, MonitorConfig, RemoteFrameStyle};
//!
//! let config = MonitorConfig::new()
//!     .with_remote_style(RemoteFrameStyle::EmptyPayload)
//!     .with_command_case(CommandCase::Insensitive)
//!     .with_fault_policy(FaultPolicy::Reset);
//!
//! assert_eq!(config.command_case, CommandCase::Insensitive);
//! ```
use embassy_time::Duration;

use crate::core::{
    DEFAULT_POLL_INTERVAL_MS, DEFAULT_RELEASE_SETTLE_POLLS, LINE_TERMINATOR, PERFORMANCE_ID,
    SERIAL_READ_TIMEOUT_MS,
};
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::can_id::CanId;

/// How remote frames are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RemoteFrameStyle {
    /// `std[ 01 23 ]: REMOTE`
    Marker,
    /// `std[ 01 23 ]:`
    EmptyPayload,
}

/// Keyword matching mode for the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandCase {
    Sensitive,
    /// ASCII case folding only.
    Insensitive,
}

/// What the fatal-error handler does after printing its diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaultPolicy {
    Halt,
    Reset,
}

/// Frame sent by the `tx` command and the manual trigger: standard id `0x303`,
/// payload `de ad be ef`.
pub const DEFAULT_TEST_FRAME: CanFrame = CanFrame::from_parts(
    CanId::Standard(0x303),
    false,
    [0xDE, 0xAD, 0xBE, 0xEF, 0, 0, 0, 0],
    4,
);

/// Monitor loop settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Display of remote frames.
    pub remote_style: RemoteFrameStyle,
    /// Command keyword matching.
    pub command_case: CommandCase,
    /// Byte closing a command line.
    pub line_terminator: u8,
    /// Bounded wait for a byte the UART reported as available.
    pub serial_read_timeout: Duration,
    /// Trigger input reads low when pressed.
    pub trigger_active_low: bool,
    /// Released polls required before the trigger re-arms.
    pub release_settle_polls: u16,
    /// Action taken after a fatal error.
    pub fault_policy: FaultPolicy,
    /// Frame emitted by `tx` and by the trigger.
    pub test_frame: CanFrame,
    /// Reply to `reqPerfId`.
    pub performance_id: &'static str,
    /// Pause between iterations of [`Monitor::run`](crate::protocol::monitor::monitor_loop::Monitor::run).
    pub poll_interval_ms: u32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl MonitorConfig {
    /// Defaults matching the reference firmware.
    pub const fn new() -> Self {
        Self {
            remote_style: RemoteFrameStyle::Marker,
            command_case: CommandCase::Sensitive,
            line_terminator: LINE_TERMINATOR,
            serial_read_timeout: Duration::from_millis(SERIAL_READ_TIMEOUT_MS),
            trigger_active_low: true,
            release_settle_polls: DEFAULT_RELEASE_SETTLE_POLLS,
            fault_policy: FaultPolicy::Halt,
            test_frame: DEFAULT_TEST_FRAME,
            performance_id: PERFORMANCE_ID,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }

    pub const fn with_remote_style(mut self, style: RemoteFrameStyle) -> Self {
        self.remote_style = style;
        self
    }

    pub const fn with_command_case(mut self, case: CommandCase) -> Self {
        self.command_case = case;
        self
    }

    pub const fn with_line_terminator(mut self, terminator: u8) -> Self {
        self.line_terminator = terminator;
        self
    }

    pub const fn with_serial_read_timeout(mut self, timeout: Duration) -> Self {
        self.serial_read_timeout = timeout;
        self
    }

    /// Polarity of the trigger input. `false` means pressed reads high.
    pub const fn with_trigger_active_low(mut self, active_low: bool) -> Self {
        self.trigger_active_low = active_low;
        self
    }

    /// Clamped to at least one poll.
    pub const fn with_release_settle_polls(mut self, polls: u16) -> Self {
        self.release_settle_polls = if polls == 0 { 1 } else { polls };
        self
    }

    pub const fn with_fault_policy(mut self, policy: FaultPolicy) -> Self {
        self.fault_policy = policy;
        self
    }

    pub const fn with_test_frame(mut self, frame: CanFrame) -> Self {
        self.test_frame = frame;
        self
    }

    pub const fn with_performance_id(mut self, reply: &'static str) -> Self {
        self.performance_id = reply;
        self
    }

    pub const fn with_poll_interval_ms(mut self, millis: u32) -> Self {
        self.poll_interval_ms = millis;
        self
    }
}
