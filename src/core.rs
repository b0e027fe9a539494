//! Constants shared by the queue, the renderer, and the monitor loop.
//!
//! Everything here is sized for a microcontroller without a heap: the
//! capacities become array lengths and `heapless` buffer sizes.

/// Number of frames the software queue buffers between the CAN interrupt
/// and the main loop.
pub const QUEUE_CAPACITY: usize = 32;

/// Maximum number of bytes kept for one command line. Extra input is dropped.
pub const COMMAND_LINE_CAPACITY: usize = 64;

/// Payload capacity of a classic CAN frame.
pub const MAX_PAYLOAD_LEN: usize = 8;

/// Size of the text buffer used to render one frame.
///
/// Worst case is an extended data frame with eight bytes:
/// `ext[ xx xx xx xx ]:` (19) + 8 × ` xx` (24) + `\r\n` (2) = 45.
pub const RENDER_CAPACITY: usize = 48;

/// Byte that terminates a command line on the serial input.
pub const LINE_TERMINATOR: u8 = b'\r';

/// Bounded wait for a serial byte once the receiver reported one available (ms).
///
/// Expiry is a hardware fault, not a normal timeout path.
pub const SERIAL_READ_TIMEOUT_MS: u64 = 1000;

/// Consecutive released polls required before the trigger can fire again.
pub const DEFAULT_RELEASE_SETTLE_POLLS: u16 = 8;

/// Delay between two iterations of the async monitor loop (ms).
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 1;

/// Reply to the `reqPerfId` command.
pub const PERFORMANCE_ID: &str = "0x04";

/// Banner printed once when the monitor starts.
pub const BANNER: &str =
    "******************************\r\n  CAN Bus Monitor\r\n******************************\r\n";

/// First line of the diagnostic printed by the fatal-error handler.
pub const FATAL_BANNER: &str = "An error encountered!!\r\n";

/// Line printed in reply to the `help` command.
pub const HELP_TEXT: &str = "Available commands: tx, reqPerfId, help\r\n";

/// Suffix appended after an unrecognized command line.
pub const UNKNOWN_COMMAND_SUFFIX: &str = ": Unknown command\r\n";
