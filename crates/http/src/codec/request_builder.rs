//! Turns a complete, measured frame into a [`Request`].

use std::sync::Arc;

use bytes::Bytes;
use tracing::trace;

use crate::codec::cache::is_cacheable;
use crate::codec::{FrameMeta, ParseCache, ParseState};
use crate::ensure;
use crate::protocol::{Headers, ParseError, Request, SharedRequest};
use crate::utils::split_crlf;

/// Builds requests out of frames measured by a [`RequestFramer`](crate::codec::RequestFramer).
///
/// With a cache, identical short frames share a single [`Request`].
#[derive(Debug, Clone, Default)]
pub struct RequestBuilder {
    cache: Option<Arc<ParseCache>>,
}

impl RequestBuilder {
    pub fn new(cache: Option<Arc<ParseCache>>) -> Self {
        Self { cache }
    }

    /// Builds the request held in `frame`, which must be exactly the frame `state` describes.
    pub fn build(&self, frame: Bytes, state: &ParseState) -> Result<SharedRequest, ParseError> {
        let meta = state.frame_meta().ok_or_else(|| ParseError::bad_request("request frame is not fully parsed"))?;
        ensure!(
            frame.len() == meta.frame_len,
            ParseError::bad_request(format!("frame has {} bytes, expected {}", frame.len(), meta.frame_len))
        );

        let Some(cache) = self.cache.as_deref().filter(|_| is_cacheable(frame.len())) else {
            return Ok(SharedRequest::new(build_request(&frame, meta)));
        };

        if let Some(request) = cache.request(&frame) {
            trace!(frame_len = frame.len(), "request cache hit");
            return Ok(request);
        }

        // detach from the connection buffer, cached requests outlive it
        let frame = Bytes::copy_from_slice(&frame);
        let request = SharedRequest::new(build_request(&frame, meta));
        cache.insert_request(frame, SharedRequest::clone(&request));
        Ok(request)
    }
}

fn build_request(frame: &Bytes, meta: FrameMeta) -> Request {
    let header_offset = meta.header_offset();
    let header_block = &frame[header_offset..header_offset + meta.header_size];
    let headers = parse_headers(header_block);

    let body_offset = meta.body_offset();
    let body = frame.slice(body_offset..body_offset + meta.body_size);

    Request::new(meta.method, meta.target, meta.version, headers, body)
}

/// Splits header lines at the first colon found from index 2 on, lines without one are skipped.
fn parse_headers(header_block: &[u8]) -> Headers {
    let mut headers = Headers::with_capacity(header_block.len() / 16);

    for line in split_crlf(header_block) {
        let Some(colon) = line.iter().skip(2).position(|b| *b == b':').map(|index| index + 2) else {
            continue;
        };

        let name = String::from_utf8_lossy(&line[..colon]).into_owned();
        let value = String::from_utf8_lossy(line[colon + 1..].trim_ascii_start()).into_owned();
        headers.insert(name, value);
    }

    headers
}
