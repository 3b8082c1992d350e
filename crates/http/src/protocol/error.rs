use std::io;

use http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request error: {source}")]
    RequestError {
        #[from]
        source: ParseError,
    },

    #[error("response error: {source}")]
    ResponseError {
        #[from]
        source: SendError,
    },
}

/// Terminal outcome of a failed frame parse.
///
/// Every protocol variant maps to exactly one HTTP status through
/// [`ParseError::status_code`]; the connection layer turns it into the error
/// response. `Io` only ever comes from the transport, never from parsing.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("bad request: {reason}")]
    BadRequest { reason: String },

    #[error("http method not recognized")]
    MethodNotRecognized,

    #[error("request line too long, current: {current_size} exceed the limit {max_size}")]
    RequestLineTooLong { current_size: usize, max_size: usize },

    #[error("header size too large, current: {current_size} exceed the limit {max_size}")]
    HeaderTooLarge { current_size: usize, max_size: usize },

    #[error("body size too large, declared: {current_size} exceed the limit {max_size}")]
    BodyTooLarge { current_size: u64, max_size: usize },

    #[error("unsupported http version: {version}")]
    UnsupportedVersion { version: String },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn bad_request<S: ToString>(str: S) -> Self {
        Self::BadRequest { reason: str.to_string() }
    }

    pub fn request_line_too_long(current_size: usize, max_size: usize) -> Self {
        Self::RequestLineTooLong { current_size, max_size }
    }

    pub fn header_too_large(current_size: usize, max_size: usize) -> Self {
        Self::HeaderTooLarge { current_size, max_size }
    }

    pub fn body_too_large(current_size: u64, max_size: usize) -> Self {
        Self::BodyTooLarge { current_size, max_size }
    }

    pub fn unsupported_version<S: ToString>(str: S) -> Self {
        Self::UnsupportedVersion { version: str.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }

    /// The status code the connection layer should answer with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } | Self::Io { .. } => StatusCode::BAD_REQUEST,
            Self::MethodNotRecognized => StatusCode::METHOD_NOT_ALLOWED,
            Self::RequestLineTooLong { .. } => StatusCode::URI_TOO_LONG,
            Self::HeaderTooLarge { .. } => StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE,
            Self::BodyTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UnsupportedVersion { .. } => StatusCode::HTTP_VERSION_NOT_SUPPORTED,
        }
    }

    /// Human readable reason phrase, the `Display` output of this error.
    pub fn reason(&self) -> String {
        self.to_string()
    }

    /// Returns true if the error was raised by the transport rather than by the parser.
    #[inline]
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

#[derive(Error, Debug)]
pub enum SendError {
    #[error("handler error: {reason}")]
    Handler { reason: String },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl SendError {
    pub fn handler<S: ToString>(str: S) -> Self {
        Self::Handler { reason: str.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}
