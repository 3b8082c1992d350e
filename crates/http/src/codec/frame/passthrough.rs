//! Client role framing and a generic frame decoder.
//!
//! The client reads whatever the server sent and drains it in one go, there is no framing
//! ambiguity to resolve because the client knows what it asked for.

use bytes::{Bytes, BytesMut};
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::codec::frame::FrameDetector;
use crate::protocol::ParseError;

/// Treats every byte received so far as a single frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughFramer;

impl FrameDetector for PassthroughFramer {
    type State = ();

    fn detect(&self, buf: &[u8], _state: &mut ()) -> Result<Option<usize>, ParseError> {
        Ok((!buf.is_empty()).then_some(buf.len()))
    }
}

/// Splits raw frames off a buffer using any [`FrameDetector`].
///
/// The detector state is reset after every frame and after every error.
#[derive(Debug, Default)]
pub struct FrameDecoder<D: FrameDetector> {
    detector: D,
    state: D::State,
}

impl<D: FrameDetector> FrameDecoder<D> {
    pub fn new(detector: D) -> Self {
        Self { detector, state: D::State::default() }
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }
}

impl<D: FrameDetector> Decoder for FrameDecoder<D> {
    type Item = Bytes;
    type Error = ParseError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let detected = self.detector.detect(src, &mut self.state);
        let frame_len = match detected {
            Ok(Some(frame_len)) => frame_len,
            Ok(None) => return Ok(None),
            Err(e) => {
                self.state = D::State::default();
                return Err(e);
            }
        };

        self.state = D::State::default();
        trace!(frame_len, remaining = src.len() - frame_len, "split frame");
        Ok(Some(src.split_to(frame_len).freeze()))
    }
}
