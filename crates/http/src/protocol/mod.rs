//! Core HTTP protocol abstractions.
//!
//! This module holds the value types that flow out of the parsing core and the errors that
//! flow out of it when parsing fails.
//!
//! # Architecture
//!
//! - **Limits** ([`limits`]): size limits per request line, header block and body
//!   - [`Limits`]: immutable configuration copied into every framer
//!
//! - **Method table** ([`method`]): recognized methods and protocol versions
//!   - [`RECOGNIZED_METHODS`]: matched in priority order against the buffer start
//!   - [`PROTOCOL_VERSIONS`]: accepted `HTTP/x.y` versions
//!
//! - **Request** ([`request`]): the immutable request value
//!   - [`Request`]: method, target, version, headers and body of one frame
//!   - [`Headers`]: case preserving header map, last duplicate wins
//!
//! - **Error Handling** ([`error`]): Comprehensive error types
//!   - [`HttpError`]: Top-level error type
//!   - [`ParseError`]: Request parsing errors, each mapped to an HTTP status
//!   - [`SendError`]: Response sending errors

mod error;
pub use error::HttpError;
pub use error::ParseError;
pub use error::SendError;

mod limits;
pub use limits::DEFAULT_MAX_BODY_SIZE;
pub use limits::DEFAULT_MAX_HEADER_SIZE;
pub use limits::DEFAULT_MAX_REQUEST_LINE_SIZE;
pub use limits::Limits;

mod method;
pub use method::MIN_METHOD_CHECK_LEN;
pub use method::PROTOCOL_VERSIONS;
pub use method::RECOGNIZED_METHODS;
pub use method::is_bodyless;
pub use method::parse_version;
pub use method::recognized_method;
pub use method::version_str;

mod request;
pub use request::Headers;
pub use request::Request;

/// A built request, shared between the request cache and its consumers.
pub type SharedRequest = triomphe::Arc<Request>;
