//! Line-oriented command interpreter fed one serial byte at a time.
//!
//! Bytes accumulate until the line terminator arrives. The completed line is
//! handed out whole and the buffer starts over empty. Bytes beyond the buffer
//! capacity are dropped silently.
use heapless::Vec;

use crate::config::CommandCase;

/// `tx`: transmit the test frame.
pub const CMD_TRANSMIT_TEST: &[u8] = b"tx";
/// `reqPerfId`: reply with the performance identifier.
pub const CMD_PERFORMANCE_ID: &[u8] = b"reqPerfId";
/// `help`: list the commands.
pub const CMD_HELP: &[u8] = b"help";

/// Result of classifying one complete line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command<'a> {
    /// Empty line.
    NoOp,
    TransmitTest,
    PerformanceId,
    Help,
    /// Anything else, carrying the line as typed.
    Unknown(&'a [u8]),
}

fn keyword_matches(line: &[u8], keyword: &[u8], case: CommandCase) -> bool {
    match case {
        CommandCase::Sensitive => line == keyword,
        CommandCase::Insensitive => line.eq_ignore_ascii_case(keyword),
    }
}

/// Map a complete line (terminator excluded) to a command.
///
/// Keywords must match the whole line.
pub fn classify(line: &[u8], case: CommandCase) -> Command<'_> {
    if line.is_empty() {
        Command::NoOp
    } else if keyword_matches(line, CMD_TRANSMIT_TEST, case) {
        Command::TransmitTest
    } else if keyword_matches(line, CMD_PERFORMANCE_ID, case) {
        Command::PerformanceId
    } else if keyword_matches(line, CMD_HELP, case) {
        Command::Help
    } else {
        Command::Unknown(line)
    }
}

/// What happened to the byte given to [`CommandLine::push`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent<const CAP: usize> {
    /// Appended; the line is still open.
    Pending,
    /// Buffer full, byte discarded.
    Dropped,
    /// Terminator seen. The accumulated line, the buffer is now empty.
    Complete(Vec<u8, CAP>),
}

/// Accumulator for the command being typed.
#[derive(Debug, Clone)]
pub struct CommandLine<const CAP: usize> {
    buffer: Vec<u8, CAP>,
    terminator: u8,
}

impl<const CAP: usize> CommandLine<CAP> {
    pub const fn new(terminator: u8) -> Self {
        Self {
            buffer: Vec::new(),
            terminator,
        }
    }

    pub fn push(&mut self, byte: u8) -> LineEvent<CAP> {
        if byte == self.terminator {
            return LineEvent::Complete(core::mem::take(&mut self.buffer));
        }
        match self.buffer.push(byte) {
            Ok(()) => LineEvent::Pending,
            Err(_) => LineEvent::Dropped,
        }
    }

    /// Bytes typed so far on the open line.
    pub fn pending(&self) -> &[u8] {
        &self.buffer
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub const fn terminator(&self) -> u8 {
        self.terminator
    }
}
