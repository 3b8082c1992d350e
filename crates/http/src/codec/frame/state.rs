use http::{Method, Uri, Version};

/// Per-connection progress of the request currently being framed.
///
/// Fields are filled in order, method first, then the request line, then the header and body
/// sizes, and are not touched again until [`ParseState::reset`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParseState {
    pub(crate) method: Option<Method>,
    pub(crate) target: Option<Uri>,
    pub(crate) version: Option<Version>,
    pub(crate) request_line_size: Option<usize>,
    pub(crate) header_size: Option<usize>,
    pub(crate) body_size: Option<usize>,
    // where the next search for the end of the header block starts
    pub(crate) header_scan_from: usize,
}

impl ParseState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets everything about the current frame.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Returns true if nothing has been parsed for the current frame.
    pub fn is_empty(&self) -> bool {
        self.method.is_none()
    }

    pub fn method(&self) -> Option<&Method> {
        self.method.as_ref()
    }

    pub fn target(&self) -> Option<&Uri> {
        self.target.as_ref()
    }

    pub fn version(&self) -> Option<Version> {
        self.version
    }

    /// Length of the request line without its CRLF.
    pub fn request_line_size(&self) -> Option<usize> {
        self.request_line_size
    }

    /// Length of the header field lines between the request line and the blank line.
    pub fn header_size(&self) -> Option<usize> {
        self.header_size
    }

    pub fn body_size(&self) -> Option<usize> {
        self.body_size
    }

    /// Total frame length, known once the header block has been parsed.
    pub fn frame_len(&self) -> Option<usize> {
        let request_line_size = self.request_line_size?;
        let header_size = self.header_size?;
        Some(body_offset(request_line_size, header_size) + self.body_size?)
    }

    /// Everything known about a fully measured frame.
    pub fn frame_meta(&self) -> Option<FrameMeta> {
        Some(FrameMeta {
            method: self.method.clone()?,
            target: self.target.clone()?,
            version: self.version?,
            request_line_size: self.request_line_size?,
            header_size: self.header_size?,
            body_size: self.body_size?,
            frame_len: self.frame_len()?,
        })
    }

    /// Fills every field from a memoized parse of the same bytes.
    pub fn restore(&mut self, meta: &FrameMeta) {
        self.method = Some(meta.method.clone());
        self.target = Some(meta.target.clone());
        self.version = Some(meta.version);
        self.request_line_size = Some(meta.request_line_size);
        self.header_size = Some(meta.header_size);
        self.body_size = Some(meta.body_size);
    }
}

/// Parsed metadata of one complete frame, the value memoized by the frame cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameMeta {
    pub method: Method,
    pub target: Uri,
    pub version: Version,
    pub request_line_size: usize,
    pub header_size: usize,
    pub body_size: usize,
    pub frame_len: usize,
}

impl FrameMeta {
    /// Offset of the first header field line.
    #[inline]
    pub fn header_offset(&self) -> usize {
        self.request_line_size + 2
    }

    /// Offset of the first body byte.
    #[inline]
    pub fn body_offset(&self) -> usize {
        body_offset(self.request_line_size, self.header_size)
    }
}

// Without header lines the blank line directly follows the request line CRLF.
#[inline]
pub(crate) fn body_offset(request_line_size: usize, header_size: usize) -> usize {
    if header_size == 0 { request_line_size + 4 } else { request_line_size + 2 + header_size + 4 }
}
