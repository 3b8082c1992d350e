//! HTTP/1.x request framing and parsing
//!
//! This module decides where each request in a connection's receive buffer ends, rejects
//! malformed or oversized input early, and turns complete frames into [`Request`] values.
//!
//! # Architecture
//!
//! - [`frame`]: the [`FrameDetector`] capability and its implementations
//!   - [`RequestFramer`]: incremental request framing for the server role
//!   - [`PassthroughFramer`]: drain-everything framing for the client role
//! - [`RequestBuilder`]: slices headers and body out of a frame
//! - [`ParseCache`]: bounded FIFO memo of parse results for short requests
//! - [`RequestDecoder`]: `tokio_util` decoder running detect, split, build and reset
//!
//! # Example
//!
//! ```no_run
//! use micro_h1::codec::RequestDecoder;
//! use tokio_util::codec::Decoder;
//! use bytes::BytesMut;
//!
//! let mut decoder = RequestDecoder::new();
//! let mut buffer = BytesMut::from(&b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n"[..]);
//! let request = decoder.decode(&mut buffer).unwrap().unwrap();
//! assert_eq!(request.uri().path(), "/");
//! ```
//!
//! [`Request`]: crate::protocol::Request

mod cache;
pub mod frame;
mod request_builder;
mod request_decoder;

pub use cache::{CACHE_CAPACITY, CACHEABLE_LEN, FifoCache, ParseCache};
pub use frame::{FrameDecoder, FrameDetector, FrameMeta, ParseState, PassthroughFramer, RequestFramer};
pub use request_builder::RequestBuilder;
pub use request_decoder::RequestDecoder;
