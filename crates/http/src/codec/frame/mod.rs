//! Frame boundary detection.
//!
//! A frame is the complete byte span of one message. Detectors look at a connection's receive
//! buffer and decide, without consuming anything, whether a whole frame is present yet. They are
//! re-entrant: the per-connection state carries partial progress from one call to the next while
//! bytes trickle in.
//!
//! - [`RequestFramer`]: server role, validates and measures HTTP/1.x requests
//! - [`PassthroughFramer`]: client role, treats everything received so far as one frame
//! - [`FrameDecoder`]: adapts any detector to `tokio_util`'s `Decoder`, yielding raw frames

mod passthrough;
mod request_framer;
mod state;

pub use passthrough::{FrameDecoder, PassthroughFramer};
pub use request_framer::RequestFramer;
pub use state::{FrameMeta, ParseState};

use crate::protocol::ParseError;

/// Something that can find the end of the first frame in a buffer.
pub trait FrameDetector {
    /// Progress kept between calls for the frame currently being received.
    type State: Default;

    /// Inspects `buf` and advances `state`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(len))`: the first `len` bytes of `buf` are one complete frame
    /// - `Ok(None)`: need more bytes, this is not an error
    /// - `Err(_)`: the buffer can't start with a valid frame
    fn detect(&self, buf: &[u8], state: &mut Self::State) -> Result<Option<usize>, ParseError>;
}
