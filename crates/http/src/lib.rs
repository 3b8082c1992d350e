//! An incremental HTTP/1.x request framing layer
//!
//! This crate sits directly on top of a TCP byte stream. Given a receive buffer that grows with
//! every non-blocking read, it decides whether a complete request is present, rejects malformed
//! or oversized input early with the right HTTP status, and turns each complete frame into an
//! immutable [`protocol::Request`].
//!
//! # Features
//!
//! - Works on arbitrary fragments, a request may arrive one byte at a time
//! - Never reads past the end of the current request into a pipelined one
//! - Early rejection of oversized request lines, header blocks and bodies
//! - Bounded FIFO memoization of short requests, shared between connections
//! - Keep-alive and pipelining through `tokio_util`'s `FramedRead`
//!
//! # Example
//!
//! ```no_run
//! use bytes::Bytes;
//! use std::io;
//! use tracing::{error, Level};
//! use tracing_subscriber::FmtSubscriber;
//! use micro_h1::handler::make_handler;
//! use micro_h1::protocol::{Limits, SharedRequest};
//! use micro_h1::server::Server;
//!
//! #[tokio::main]
//! async fn main() {
//!     // Initialize logging
//!     let subscriber = FmtSubscriber::builder()
//!         .with_max_level(Level::INFO)
//!         .finish();
//!     tracing::subscriber::set_global_default(subscriber)
//!         .expect("setting default subscriber failed");
//!
//!     let server = Server::builder()
//!         .address("127.0.0.1:8080")
//!         .limits(Limits::default().with_max_body_size(64 * 1024))
//!         .build()
//!         .expect("valid server config");
//!
//!     if let Err(e) = server.start(make_handler(hello_world)).await {
//!         error!(cause = %e, "server stopped");
//!     }
//! }
//!
//! async fn hello_world(request: SharedRequest) -> Result<Bytes, io::Error> {
//!     let body = format!("Hello {}!\r\n", request.uri().path());
//!     Ok(Bytes::from(format!("HTTP/1.1 200 OK\r\ncontent-length: {}\r\n\r\n{body}", body.len())))
//! }
//! ```
//!
//! # Architecture
//!
//! The crate is organized into several key modules:
//!
//! - [`protocol`]: Limits, the method table, the request value and error types
//! - [`codec`]: Frame detection, request building, the parse caches and the decoder
//! - [`connection`]: Drives one connection, request in, response out
//! - [`handler`]: Request handler traits and utilities
//! - [`server`]: Accept loop owning the shared parse cache
//!
//! # Framing
//!
//! [`codec::RequestFramer`] is re-entrant: it keeps partial progress in a
//! [`codec::ParseState`] and picks up where it left off on the next call. Its answer is one of
//! "need more bytes" (`Ok(None)`), "the first `n` bytes are a request" (`Ok(Some(n))`) or a
//! [`protocol::ParseError`] carrying the HTTP status to answer with.
//!
//! ## Error Handling
//!
//! The crate uses custom error types that implement `std::error::Error`:
//!
//! - [`protocol::HttpError`]: Top-level error type
//! - [`protocol::ParseError`]: Request parsing errors, see [`protocol::ParseError::status_code`]
//! - [`protocol::SendError`]: Response sending errors
//!
//! # Limitations
//!
//! - HTTP/1.0 and HTTP/1.1 only
//! - No chunked transfer encoding, a body needs `Content-Length`
//! - No TLS support (use a reverse proxy for HTTPS)
//! - Responses are written as handed over by the handler, already encoded

pub mod codec;
pub mod connection;
pub mod handler;
pub mod protocol;
pub mod server;

mod utils;
pub(crate) use utils::ensure;
