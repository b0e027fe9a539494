//! Text rendering of received frames for the serial output.
//!
//! Line format (lowercase hex, every byte preceded by one space):
//!
//! ```text
//! std[ 03 03 ]: de ad be ef
//! ext[ 18 fe f1 00 ]: 01 02
//! std[ 01 23 ]: REMOTE
//! ```
//!
//! Standard identifiers print as two bytes, extended ones as four, most
//! significant byte first. Every line ends with `\r\n`.
use core::fmt::Write;

use heapless::String;

use crate::config::RemoteFrameStyle;
use crate::core::RENDER_CAPACITY;
use crate::protocol::transport::can_frame::CanFrame;

/// One rendered frame, ready for the serial port.
pub type RenderedLine = String<RENDER_CAPACITY>;

/// Marker printed in place of the payload of a remote frame.
pub const REMOTE_MARKER: &str = " REMOTE";

/// Write the text form of `frame` (including the line ending) into `out`.
pub fn write_frame<W: Write>(
    out: &mut W,
    frame: &CanFrame,
    style: RemoteFrameStyle,
) -> core::fmt::Result {
    let tag = if frame.is_extended() { "ext[" } else { "std[" };
    out.write_str(tag)?;

    let (id_bytes, width) = frame.can_id().rendered_bytes();
    for byte in &id_bytes[..width] {
        write!(out, " {:02x}", byte)?;
    }
    out.write_str(" ]:")?;

    if frame.is_remote() {
        if style == RemoteFrameStyle::Marker {
            out.write_str(REMOTE_MARKER)?;
        }
    } else {
        for byte in frame.payload() {
            write!(out, " {:02x}", byte)?;
        }
    }
    out.write_str("\r\n")
}

/// Render `frame` into a fixed-size line buffer.
pub fn render_frame(
    frame: &CanFrame,
    style: RemoteFrameStyle,
) -> Result<RenderedLine, core::fmt::Error> {
    let mut line = RenderedLine::new();
    write_frame(&mut line, frame, style)?;
    Ok(line)
}
