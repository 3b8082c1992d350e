//! HTTP connection handling module
//!
//! This module drives one TCP connection: it feeds received bytes through the
//! [`RequestDecoder`](crate::codec::RequestDecoder), hands every complete request to a
//! [`Handler`](crate::handler::Handler) in arrival order, and writes the handler's response.
//!
//! # Components
//!
//! - [`HttpConnection`]: Main connection handler that:
//!   - Reads requests, including pipelined ones, in order
//!   - Writes each response before the next request is handled
//!   - Answers a malformed or oversized request with its error status and closes

mod http_connection;

pub use http_connection::HttpConnection;
