//! HTTP request decoder module
//!
//! This module glues the frame detector and the request builder into a `tokio_util`
//! [`Decoder`], so a connection can be read with `FramedRead` and yields one [`Request`] per
//! frame.
//!
//! # Components
//!
//! - [`RequestFramer`]: decides whether a complete request is buffered
//! - [`RequestBuilder`]: turns the frame into a [`Request`]
//! - [`ParseState`]: partial progress carried between calls, reset after each frame
//!
//! # Example
//!
//! ```no_run
//! use micro_h1::codec::RequestDecoder;
//! use tokio_util::codec::Decoder;
//! use bytes::BytesMut;
//!
//! let mut decoder = RequestDecoder::new();
//! let mut buffer = BytesMut::new();
//! // ... add request data to buffer ...
//! let result = decoder.decode(&mut buffer);
//! ```
//!
//! [`Request`]: crate::protocol::Request

use std::sync::Arc;

use bytes::BytesMut;
use tokio_util::codec::Decoder;
use tracing::debug;

use crate::codec::{FrameDetector, ParseCache, ParseState, RequestBuilder, RequestFramer};
use crate::protocol::{Limits, ParseError, SharedRequest};

/// A decoder for HTTP requests that yields only complete requests
///
/// Nothing is removed from the buffer until a whole frame (request line, headers and body) is
/// present, then exactly that frame is split off; bytes of a pipelined request stay in place
/// for the next call.
#[derive(Debug)]
pub struct RequestDecoder {
    framer: RequestFramer,
    builder: RequestBuilder,
    state: ParseState,
}

impl RequestDecoder {
    /// Creates a decoder with default limits and a cache of its own.
    pub fn new() -> Self {
        Self::with_cache(Limits::default(), Arc::new(ParseCache::new()))
    }

    /// Creates a decoder sharing `cache` with other decoders.
    pub fn with_cache(limits: Limits, cache: Arc<ParseCache>) -> Self {
        Self {
            framer: RequestFramer::new(limits, Some(Arc::clone(&cache))),
            builder: RequestBuilder::new(Some(cache)),
            state: ParseState::new(),
        }
    }

    /// Creates a decoder that parses every request from scratch.
    pub fn uncached(limits: Limits) -> Self {
        Self { framer: RequestFramer::new(limits, None), builder: RequestBuilder::new(None), state: ParseState::new() }
    }

    /// Progress on the request currently being received.
    pub fn state(&self) -> &ParseState {
        &self.state
    }
}

impl Default for RequestDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for RequestDecoder {
    type Item = SharedRequest;
    type Error = ParseError;

    /// Attempts to decode an HTTP request from the provided buffer
    ///
    /// # Returns
    ///
    /// - `Ok(Some(request))`: a complete request was split off the buffer
    /// - `Ok(None)`: Need more data to proceed
    /// - `Err(_)`: Encountered a parsing error, the connection should not be read further
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let detected = self.framer.detect(src, &mut self.state);
        let frame_len = match detected {
            Ok(Some(frame_len)) => frame_len,
            Ok(None) => return Ok(None),
            Err(e) => {
                self.state.reset();
                return Err(e);
            }
        };

        let frame = src.split_to(frame_len).freeze();
        let built = self.builder.build(frame, &self.state);
        self.state.reset();

        let request = built?;
        debug!(method = %request.method(), uri = %request.uri(), frame_len, "decoded request");
        Ok(Some(request))
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(buf)? {
            Some(request) => Ok(Some(request)),
            None if buf.is_empty() => Ok(None),
            None => {
                self.state.reset();
                Err(ParseError::bad_request(format!("connection closed with {} bytes of an incomplete request", buf.len())))
            }
        }
    }
}
