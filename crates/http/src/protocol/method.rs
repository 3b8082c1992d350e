//! The fixed table of request methods and protocol versions this server accepts.

use http::{Method, Version};

/// Recognized methods, in the order they are matched against the start of a buffer.
pub const RECOGNIZED_METHODS: [Method; 7] =
    [Method::OPTIONS, Method::HEAD, Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE];

/// Bytes needed before the method can be sniffed: the longest method plus `" /"`.
pub const MIN_METHOD_CHECK_LEN: usize = 7 + 2;

/// Accepted `HTTP/x.y` version strings.
pub const PROTOCOL_VERSIONS: [&str; 2] = ["1.0", "1.1"];

/// Returns the first recognized method whose name is a prefix of `buf`, together with its length.
pub fn recognized_method(buf: &[u8]) -> Option<(Method, usize)> {
    RECOGNIZED_METHODS.iter().find(|method| buf.starts_with(method.as_str().as_bytes())).map(|method| (method.clone(), method.as_str().len()))
}

/// Methods that never carry a body, regardless of their headers.
#[inline]
pub fn is_bodyless(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// Parses a `HTTP/<digits>.<digits>` token.
///
/// Returns `Err` with the offending text when the token is malformed or names a version outside
/// [`PROTOCOL_VERSIONS`].
pub fn parse_version(token: &[u8]) -> Result<Version, String> {
    let rejected = || String::from_utf8_lossy(token).into_owned();

    let number = token.strip_prefix(b"HTTP/").ok_or_else(rejected)?;
    let dot = number.iter().position(|b| *b == b'.').ok_or_else(rejected)?;
    let (major, minor) = (&number[..dot], &number[dot + 1..]);

    let well_formed = |part: &[u8]| !part.is_empty() && part.iter().all(u8::is_ascii_digit);
    if !well_formed(major) || !well_formed(minor) {
        return Err(rejected());
    }

    match number {
        b"1.0" => Ok(Version::HTTP_10),
        b"1.1" => Ok(Version::HTTP_11),
        _ => Err(rejected()),
    }
}

/// The accepted version string of `version`, as it appears after `HTTP/`.
pub fn version_str(version: Version) -> &'static str {
    if version == Version::HTTP_10 { PROTOCOL_VERSIONS[0] } else { PROTOCOL_VERSIONS[1] }
}
