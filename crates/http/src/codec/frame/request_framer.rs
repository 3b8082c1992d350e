//! Incremental framing of HTTP/1.x requests.
//!
//! # Phases
//!
//! Detection runs three phases, each skipped once it has completed for the current frame:
//!
//! 1. Method sniff: the buffer must start with a recognized method followed by `" /"`
//! 2. Request line: `<method> <target> HTTP/<major>.<minor>` terminated by CRLF
//! 3. Header block: terminated by CRLFCRLF, decides the body size
//!
//! A phase that lacks bytes returns `Ok(None)` and stops the phases after it. Because phases run
//! in order, an unrecognized method is reported before anything the request line may get wrong.
//!
//! # Limits
//!
//! Oversized input is rejected as soon as the buffer grows past the point where a terminator
//! could still arrive in time, so a client that never sends CRLF can't make us buffer forever.
//!
//! # Caching
//!
//! Short buffers (see [`CACHEABLE_LEN`](crate::codec::CACHEABLE_LEN)) that were already framed
//! once are answered from the shared [`ParseCache`] without running any phase.

use std::sync::Arc;

use http::{Method, Uri};
use tracing::trace;

use crate::codec::cache::is_cacheable;
use crate::codec::frame::state::body_offset;
use crate::codec::frame::{FrameDetector, ParseState};
use crate::codec::ParseCache;
use crate::ensure;
use crate::protocol::{Limits, MIN_METHOD_CHECK_LEN, ParseError, is_bodyless, parse_version, recognized_method};
use crate::utils::{CRLF, CRLF_CRLF, find, split_crlf};

/// Server role [`FrameDetector`] for HTTP/1.x requests.
#[derive(Debug, Clone, Default)]
pub struct RequestFramer {
    limits: Limits,
    cache: Option<Arc<ParseCache>>,
}

impl RequestFramer {
    pub fn new(limits: Limits, cache: Option<Arc<ParseCache>>) -> Self {
        Self { limits, cache }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn cache(&self) -> Option<&Arc<ParseCache>> {
        self.cache.as_ref()
    }

    fn sniff_method(&self, buf: &[u8]) -> Result<Option<Method>, ParseError> {
        if buf.len() < MIN_METHOD_CHECK_LEN {
            return Ok(None);
        }

        let (method, len) = recognized_method(buf).ok_or(ParseError::MethodNotRecognized)?;
        ensure!(&buf[len..len + 2] == b" /", ParseError::bad_request(format!("{method} must be followed by \" /\"")));

        trace!(%method, "sniffed request method");
        Ok(Some(method))
    }

    fn parse_request_line(&self, buf: &[u8], state: &mut ParseState) -> Result<Option<usize>, ParseError> {
        let max_size = self.limits.max_request_line_size;

        let Some(line_size) = find(buf, CRLF) else {
            ensure!(buf.len() < self.limits.request_line_budget(), ParseError::request_line_too_long(buf.len(), max_size));
            return Ok(None);
        };
        ensure!(line_size <= max_size, ParseError::request_line_too_long(line_size, max_size));

        let line = &buf[..line_size];
        let mut tokens = line.split(|b| *b == b' ');
        let (Some(_method), Some(target), Some(version), None) = (tokens.next(), tokens.next(), tokens.next(), tokens.next()) else {
            return Err(ParseError::bad_request("request line must have exactly 3 parts"));
        };

        let target = Uri::try_from(target).map_err(|e| ParseError::bad_request(format!("invalid request target: {e}")))?;
        let version = parse_version(version).map_err(ParseError::unsupported_version)?;

        trace!(%target, ?version, line_size, "parsed request line");
        state.target = Some(target);
        state.version = Some(version);
        state.request_line_size = Some(line_size);
        Ok(Some(line_size))
    }

    fn parse_header_block(
        &self,
        buf: &[u8],
        state: &mut ParseState,
        method: &Method,
        request_line_size: usize,
    ) -> Result<Option<(usize, usize)>, ParseError> {
        let max_size = self.limits.max_header_size;
        let header_start = request_line_size + 2;

        // the request line CRLF may be the first half of the terminator
        let scan_from = state.header_scan_from.max(request_line_size).min(buf.len());
        let Some(terminator) = find(&buf[scan_from..], CRLF_CRLF).map(|index| index + scan_from) else {
            let received = buf.len().saturating_sub(header_start);
            ensure!(buf.len() < self.limits.header_budget(request_line_size), ParseError::header_too_large(received, max_size));
            // a terminator split across reads starts at most 3 bytes back
            state.header_scan_from = buf.len().saturating_sub(3);
            return Ok(None);
        };

        let header_size = terminator.saturating_sub(header_start);
        ensure!(header_size <= max_size, ParseError::header_too_large(header_size, max_size));

        let header_block = &buf[header_start..header_start + header_size];
        let body_size = if is_bodyless(method) {
            0
        } else {
            match content_length(header_block)? {
                Some(length) => {
                    let max_body = self.limits.max_body_size;
                    usize::try_from(length)
                        .ok()
                        .filter(|length| *length <= max_body)
                        .ok_or_else(|| ParseError::body_too_large(length, max_body))?
                }
                None if *method == Method::DELETE => 0,
                None => return Err(ParseError::bad_request("missing content-length, can't determine body size")),
            }
        };

        trace!(header_size, body_size, "parsed header block");
        state.header_size = Some(header_size);
        state.body_size = Some(body_size);
        Ok(Some((header_size, body_size)))
    }
}

impl FrameDetector for RequestFramer {
    type State = ParseState;

    fn detect(&self, buf: &[u8], state: &mut ParseState) -> Result<Option<usize>, ParseError> {
        let cache = self.cache.as_deref().filter(|_| is_cacheable(buf.len()));

        if let Some(meta) = cache.and_then(|cache| cache.metadata(buf)) {
            trace!(frame_len = meta.frame_len, "frame metadata cache hit");
            state.restore(&meta);
            return Ok((buf.len() >= meta.frame_len).then_some(meta.frame_len));
        }

        let method = match state.method.clone() {
            Some(method) => method,
            None => {
                let Some(method) = self.sniff_method(buf)? else {
                    return Ok(None);
                };
                state.method = Some(method.clone());
                method
            }
        };

        let request_line_size = match state.request_line_size {
            Some(size) => size,
            None => match self.parse_request_line(buf, state)? {
                Some(size) => size,
                None => return Ok(None),
            },
        };

        let (header_size, body_size) = match (state.header_size, state.body_size) {
            (Some(header_size), Some(body_size)) => (header_size, body_size),
            _ => match self.parse_header_block(buf, state, &method, request_line_size)? {
                Some(sizes) => sizes,
                None => return Ok(None),
            },
        };

        let frame_len = body_offset(request_line_size, header_size) + body_size;
        if buf.len() < frame_len {
            return Ok(None);
        }

        if let (Some(cache), Some(meta)) = (cache, state.frame_meta()) {
            cache.insert_metadata(buf, meta);
        }

        Ok(Some(frame_len))
    }
}

/// Value of the `Content-Length` field, if the header block has one.
fn content_length(header_block: &[u8]) -> Result<Option<u64>, ParseError> {
    let mut length = None;

    for line in split_crlf(header_block) {
        let Some(colon) = line.iter().position(|b| *b == b':') else {
            continue;
        };
        if !line[..colon].eq_ignore_ascii_case(b"content-length") {
            continue;
        }

        let value = line[colon + 1..].trim_ascii();
        ensure!(
            !value.is_empty() && value.iter().all(u8::is_ascii_digit),
            ParseError::bad_request(format!("invalid content-length value {}", String::from_utf8_lossy(value)))
        );
        // all digits, so the only parse failure left is overflow
        let parsed = std::str::from_utf8(value)
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(u64::MAX);

        match length {
            Some(previous) if previous != parsed => {
                return Err(ParseError::bad_request("conflicting content-length values"));
            }
            _ => length = Some(parsed),
        }
    }

    Ok(length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Version;
    use indoc::indoc;

    fn framer() -> RequestFramer {
        RequestFramer::new(Limits::default(), None)
    }

    fn detect(framer: &RequestFramer, buf: &[u8]) -> Result<Option<usize>, ParseError> {
        framer.detect(buf, &mut ParseState::new())
    }

    #[test]
    fn short_buffer_needs_more() {
        let framer = framer();
        for len in 0..MIN_METHOD_CHECK_LEN {
            assert!(matches!(detect(&framer, &b"FOO /x HTTP/1.1\r\n\r\n"[..len]), Ok(None)));
            assert!(matches!(detect(&framer, &b"GET /x HTTP/1.1\r\n\r\n"[..len]), Ok(None)));
        }
    }

    #[test]
    fn simple_get() {
        let buf = b"GET /x HTTP/1.1\r\nHost: a\r\n\r\n";
        let mut state = ParseState::new();

        assert_eq!(framer().detect(buf, &mut state).unwrap(), Some(buf.len()));
        assert_eq!(state.method(), Some(&Method::GET));
        assert_eq!(state.target().map(Uri::path), Some("/x"));
        assert_eq!(state.version(), Some(Version::HTTP_11));
        assert_eq!(state.request_line_size(), Some(15));
        assert_eq!(state.header_size(), Some(7));
        assert_eq!(state.body_size(), Some(0));
        assert_eq!(state.frame_len(), Some(buf.len()));
    }

    #[test]
    fn no_header_lines() {
        let buf = b"GET / HTTP/1.0\r\n\r\nGET";
        let mut state = ParseState::new();

        assert_eq!(framer().detect(buf, &mut state).unwrap(), Some(18));
        assert_eq!(state.header_size(), Some(0));
        assert_eq!(state.version(), Some(Version::HTTP_10));
    }

    #[test]
    fn post_waits_for_body() {
        let framer = framer();
        let full = b"POST /x HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello";

        let mut state = ParseState::new();
        assert_eq!(framer.detect(&full[..full.len() - 2], &mut state).unwrap(), None);
        assert_eq!(state.body_size(), Some(5));

        assert_eq!(framer.detect(full, &mut state).unwrap(), Some(full.len()));
        assert_eq!(state.body_size(), Some(5));
    }

    #[test]
    fn byte_by_byte() {
        let framer = framer();
        let full = indoc! {b"
            PUT /items/1?force=true HTTP/1.1\r
            Host: 127.0.0.1:8080\r
            content-length: 11\r
            \r
            hello worldGET / HTTP/1.1\r\n\r\n"};
        let frame_len = full.len() - "GET / HTTP/1.1\r\n\r\n".len();

        let mut state = ParseState::new();
        for end in 0..frame_len {
            assert_eq!(framer.detect(&full[..end], &mut state).unwrap(), None, "prefix of {end} bytes");
        }
        assert_eq!(framer.detect(&full[..frame_len], &mut state).unwrap(), Some(frame_len));
        assert_eq!(framer.detect(full, &mut state).unwrap(), Some(frame_len));
        assert_eq!(state.method(), Some(&Method::PUT));
        assert_eq!(state.target().and_then(Uri::query), Some("force=true"));
        assert_eq!(state.body_size(), Some(11));
    }

    #[test]
    fn unknown_method() {
        let error = detect(&framer(), b"FOO /x HTTP/1.1\r\n\r\n").unwrap_err();
        assert!(matches!(error, ParseError::MethodNotRecognized));
        assert_eq!(error.status_code().as_u16(), 405);

        // lowercase is not a recognized method either, and the broken line doesn't matter
        let error = detect(&framer(), b"get /x HTTP/9\r\n\r\n").unwrap_err();
        assert!(matches!(error, ParseError::MethodNotRecognized));
    }

    #[test]
    fn method_not_followed_by_slash() {
        let error = detect(&framer(), b"GET http://a/ HTTP/1.1\r\n\r\n").unwrap_err();
        assert!(matches!(error, ParseError::BadRequest { .. }));

        let error = detect(&framer(), b"OPTIONS * HTTP/1.1\r\n\r\n").unwrap_err();
        assert_eq!(error.status_code().as_u16(), 400);
    }

    #[test]
    fn request_line_shape() {
        let framer = framer();
        for buf in [&b"GET /x\r\n\r\n"[..], b"GET /x HTTP/1.1 extra\r\n\r\n", b"GET /x  HTTP/1.1\r\n\r\n"] {
            let error = detect(&framer, buf).unwrap_err();
            assert!(matches!(error, ParseError::BadRequest { .. }), "{error}");
        }

        let error = detect(&framer, b"GET /a<b HTTP/1.1\r\n\r\n").unwrap_err();
        assert!(matches!(error, ParseError::BadRequest { .. }), "{error}");
    }

    #[test]
    fn unsupported_versions() {
        let framer = framer();
        for buf in [&b"GET /x HTTP/2.0\r\n\r\n"[..], b"GET /x HTTP/1\r\n\r\n", b"GET /x HTTPS/1.1\r\n\r\n"] {
            let error = detect(&framer, buf).unwrap_err();
            assert!(matches!(error, ParseError::UnsupportedVersion { .. }), "{error}");
            assert_eq!(error.status_code().as_u16(), 505);
        }
    }

    #[test]
    fn request_line_limit() {
        let limits = Limits::default();
        let framer = RequestFramer::new(limits, None);
        let line_for = |size: usize| {
            let mut line = b"GET /".to_vec();
            line.resize(size - " HTTP/1.1".len(), b'a');
            line.extend_from_slice(b" HTTP/1.1");
            assert_eq!(line.len(), size);
            line
        };

        let mut exact = line_for(limits.max_request_line_size);
        exact.extend_from_slice(b"\r\n\r\n");
        assert_eq!(detect(&framer, &exact).unwrap(), Some(exact.len()));

        let mut too_long = line_for(limits.max_request_line_size + 1);
        too_long.extend_from_slice(b"\r\n\r\n");
        let error = detect(&framer, &too_long).unwrap_err();
        assert!(matches!(error, ParseError::RequestLineTooLong { current_size: 4097, max_size: 4096 }));
        assert_eq!(error.status_code().as_u16(), 414);
    }

    #[test]
    fn request_line_limit_without_terminator() {
        let framer = RequestFramer::new(Limits::default().with_max_request_line_size(16), None);
        let mut state = ParseState::new();

        assert_eq!(framer.detect(b"GET /0123456789ab", &mut state).unwrap(), None);
        let error = framer.detect(b"GET /0123456789abc", &mut state).unwrap_err();
        assert!(matches!(error, ParseError::RequestLineTooLong { .. }));
    }

    #[test]
    fn header_limit() {
        let framer = RequestFramer::new(Limits::default().with_max_header_size(8), None);

        assert_eq!(detect(&framer, b"GET / HTTP/1.1\r\nHost: ab\r\n\r\n").unwrap(), Some(28));

        let error = detect(&framer, b"GET / HTTP/1.1\r\nHost: abc\r\n\r\n").unwrap_err();
        assert!(matches!(error, ParseError::HeaderTooLarge { current_size: 9, max_size: 8 }));
        assert_eq!(error.status_code().as_u16(), 431);

        // no terminator in sight: 14 + 2 + 8 + 4 bytes is where waiting stops
        let mut state = ParseState::new();
        assert_eq!(framer.detect(b"GET / HTTP/1.1\r\nHost: abcde", &mut state).unwrap(), None);
        let error = framer.detect(b"GET / HTTP/1.1\r\nHost: abcdefgh", &mut state).unwrap_err();
        assert!(matches!(error, ParseError::HeaderTooLarge { .. }));
    }

    #[test]
    fn body_size_rules() {
        let framer = framer();

        // bodyless methods ignore content-length
        let buf = b"HEAD / HTTP/1.1\r\nContent-Length: 10\r\n\r\n";
        assert_eq!(detect(&framer, buf).unwrap(), Some(buf.len()));

        let buf = b"DELETE /x HTTP/1.1\r\nHost: a\r\n\r\n";
        assert_eq!(detect(&framer, buf).unwrap(), Some(buf.len()));

        let buf = b"DELETE /x HTTP/1.1\r\ncontent-LENGTH:2\r\n\r\nok";
        assert_eq!(detect(&framer, buf).unwrap(), Some(buf.len()));

        let error = detect(&framer, b"POST /x HTTP/1.1\r\nHost: a\r\n\r\n").unwrap_err();
        assert!(matches!(error, ParseError::BadRequest { .. }));

        let error = detect(&framer, b"PATCH /x HTTP/1.1\r\nContent-Length: 1x\r\n\r\n").unwrap_err();
        assert!(matches!(error, ParseError::BadRequest { .. }));

        let error = detect(&framer, b"PUT /x HTTP/1.1\r\nContent-Length: 1\r\nContent-Length: 2\r\n\r\n").unwrap_err();
        assert!(matches!(error, ParseError::BadRequest { .. }));

        let buf = b"PUT /x HTTP/1.1\r\nContent-Length: 1\r\nContent-Length: 1\r\n\r\n!";
        assert_eq!(detect(&framer, buf).unwrap(), Some(buf.len()));
    }

    #[test]
    fn body_limit() {
        let framer = RequestFramer::new(Limits::default().with_max_body_size(4), None);

        let buf = b"POST /x HTTP/1.1\r\nContent-Length: 4\r\n\r\nabcd";
        assert_eq!(detect(&framer, buf).unwrap(), Some(buf.len()));

        let error = detect(&framer, b"POST /x HTTP/1.1\r\nContent-Length: 5\r\n\r\n").unwrap_err();
        assert!(matches!(error, ParseError::BodyTooLarge { current_size: 5, max_size: 4 }));
        assert_eq!(error.status_code().as_u16(), 413);

        let error = detect(&framer, b"POST /x HTTP/1.1\r\nContent-Length: 99999999999999999999\r\n\r\n").unwrap_err();
        assert!(matches!(error, ParseError::BodyTooLarge { current_size: u64::MAX, max_size: 4 }));
        assert_eq!(error.status_code().as_u16(), 413);
    }

    #[test]
    fn overflowing_content_length_is_too_large() {
        let error = detect(&framer(), b"POST /x HTTP/1.1\r\nContent-Length: 99999999999999999999\r\n\r\n").unwrap_err();
        assert_eq!(error.status_code().as_u16(), 413);

        let error = detect(&framer(), b"POST /x HTTP/1.1\r\nContent-Length: 12a\r\n\r\n").unwrap_err();
        assert_eq!(error.status_code().as_u16(), 400);
    }

    #[test]
    fn pipelined_frames() {
        let framer = framer();
        let buf = b"GET /a HTTP/1.1\r\n\r\nPOST /b HTTP/1.1\r\nContent-Length: 3\r\n\r\nxyz";
        let mut state = ParseState::new();

        let first = framer.detect(buf, &mut state).unwrap().unwrap();
        assert_eq!(first, 19);
        assert_eq!(state.target().map(Uri::path), Some("/a"));

        state.reset();
        let rest = &buf[first..];
        assert_eq!(framer.detect(rest, &mut state).unwrap(), Some(rest.len()));
        assert_eq!(state.method(), Some(&Method::POST));
        assert_eq!(state.target().map(Uri::path), Some("/b"));
    }

    #[test]
    fn cache_is_transparent() {
        let cache = Arc::new(ParseCache::new());
        let cached = RequestFramer::new(Limits::default(), Some(Arc::clone(&cache)));
        let buf = b"POST /x HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello";

        let mut first = ParseState::new();
        assert_eq!(cached.detect(buf, &mut first).unwrap(), Some(buf.len()));
        assert!(cache.contains_metadata(buf));

        let mut second = ParseState::new();
        assert_eq!(cached.detect(buf, &mut second).unwrap(), Some(buf.len()));

        let mut uncached = ParseState::new();
        assert_eq!(framer().detect(buf, &mut uncached).unwrap(), Some(buf.len()));

        assert_eq!(second.frame_meta(), uncached.frame_meta());
        assert_eq!(first.frame_meta(), uncached.frame_meta());
        assert_eq!(cache.metadata_len(), 1);
    }

    #[test]
    fn long_buffers_are_not_cached() {
        let cache = Arc::new(ParseCache::new());
        let framer = RequestFramer::new(Limits::default(), Some(Arc::clone(&cache)));

        let mut buf = b"GET /".to_vec();
        buf.resize(600, b'a');
        buf.extend_from_slice(b" HTTP/1.1\r\n\r\n");

        assert_eq!(detect(&framer, &buf).unwrap(), Some(buf.len()));
        assert_eq!(cache.metadata_len(), 0);
    }

    #[test]
    fn incomplete_frames_are_not_cached() {
        let cache = Arc::new(ParseCache::new());
        let framer = RequestFramer::new(Limits::default(), Some(Arc::clone(&cache)));

        assert_eq!(detect(&framer, b"POST /x HTTP/1.1\r\nContent-Length: 5\r\n\r\nhel").unwrap(), None);
        assert_eq!(cache.metadata_len(), 0);
    }

    #[test]
    fn shared_cache_across_threads() {
        let cache = Arc::new(ParseCache::with_capacity(16));
        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let framer = RequestFramer::new(Limits::default(), Some(Arc::clone(&cache)));
                std::thread::spawn(move || {
                    for i in 0..64 {
                        let buf = format!("GET /{} HTTP/1.1\r\nX-Worker: {worker}\r\n\r\n", i % 32);
                        let len = framer.detect(buf.as_bytes(), &mut ParseState::new()).unwrap();
                        assert_eq!(len, Some(buf.len()));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.metadata_len(), 16);
    }
}
