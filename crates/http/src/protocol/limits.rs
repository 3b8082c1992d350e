//! Size limits enforced while framing a request.
//!
//! Limits are fixed per server and copied into every connection's framer, they are never
//! negotiated per request.

/// Default maximum request line size, 4KB
pub const DEFAULT_MAX_REQUEST_LINE_SIZE: usize = 4 << 10;

/// Default maximum header block size, 512KB
pub const DEFAULT_MAX_HEADER_SIZE: usize = 512 << 10;

/// Default maximum body size, 1MB
pub const DEFAULT_MAX_BODY_SIZE: usize = 1 << 20;

/// Byte limits applied to the request line, the header block and the body.
///
/// The request line limit excludes the terminating CRLF, the header limit excludes both the
/// request line and the blank line that ends the header block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Limits {
    pub max_request_line_size: usize,
    pub max_header_size: usize,
    pub max_body_size: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_request_line_size: DEFAULT_MAX_REQUEST_LINE_SIZE,
            max_header_size: DEFAULT_MAX_HEADER_SIZE,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }
}

impl Limits {
    pub fn new(max_request_line_size: usize, max_header_size: usize, max_body_size: usize) -> Self {
        Self { max_request_line_size, max_header_size, max_body_size }
    }

    #[must_use]
    pub fn with_max_request_line_size(mut self, size: usize) -> Self {
        self.max_request_line_size = size;
        self
    }

    #[must_use]
    pub fn with_max_header_size(mut self, size: usize) -> Self {
        self.max_header_size = size;
        self
    }

    #[must_use]
    pub fn with_max_body_size(mut self, size: usize) -> Self {
        self.max_body_size = size;
        self
    }

    /// Buffer length at which a missing request line terminator can no longer arrive in time.
    #[inline]
    pub(crate) fn request_line_budget(&self) -> usize {
        self.max_request_line_size.saturating_add(2)
    }

    /// Buffer length at which a missing header terminator can no longer arrive in time.
    #[inline]
    pub(crate) fn header_budget(&self, request_line_size: usize) -> usize {
        request_line_size.saturating_add(2).saturating_add(self.max_header_size).saturating_add(4)
    }
}
