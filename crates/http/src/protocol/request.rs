//! The immutable request value produced once per frame.
//!
//! Unlike `http::Request`, header names keep the exact case they had on the wire, so
//! [`Headers`] is our own small map. [`Request::to_http`] converts into the `http` crate's
//! types for code that wants them.

use std::collections::HashMap;
use std::collections::hash_map;

use bytes::Bytes;
use http::{Extensions, HeaderName, HeaderValue, Method, Uri, Version};

/// Header fields of a request.
///
/// Names keep their original case and are compared exactly by [`Headers::get`]. Inserting a name
/// a second time replaces the earlier value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    inner: HashMap<String, String>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self { inner: HashMap::with_capacity(capacity) }
    }

    /// Inserts a field, the last value for a name wins.
    pub(crate) fn insert(&mut self, name: String, value: String) {
        self.inner.insert(name, value);
    }

    /// Looks up a field by its exact name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner.get(name).map(String::as_str)
    }

    /// Looks up a field ignoring ASCII case.
    ///
    /// When several names differ only by case, any one of them may be returned.
    pub fn get_ignore_case(&self, name: &str) -> Option<&str> {
        self.get(name).or_else(|| self.inner.iter().find(|(key, _)| key.eq_ignore_ascii_case(name)).map(|(_, value)| value.as_str()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, String> {
        self.inner.iter()
    }
}

impl<'a> IntoIterator for &'a Headers {
    type Item = (&'a String, &'a String);
    type IntoIter = hash_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A fully received HTTP request.
///
/// Built once per frame and never mutated afterwards; shared as `triomphe::Arc<Request>` so a
/// memoized request can be handed to many consumers.
#[derive(Debug)]
pub struct Request {
    method: Method,
    uri: Uri,
    version: Version,
    headers: Headers,
    body: Bytes,
    // reserved for request attributes added by layers above the parser
    extensions: Extensions,
}

impl Request {
    pub(crate) fn new(method: Method, uri: Uri, version: Version, headers: Headers, body: Bytes) -> Self {
        Self { method, uri, version, headers, body, extensions: Extensions::new() }
    }

    /// Returns a reference to the request's HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns a reference to the request target.
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Returns the request's HTTP version.
    pub fn version(&self) -> Version {
        self.version
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// The body bytes exactly as received.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// Converts into an `http::Request`.
    ///
    /// Header names are lowercased by `http`, fields whose name or value `http` rejects are
    /// skipped.
    pub fn to_http(&self) -> http::Request<Bytes> {
        let mut request = http::Request::new(self.body.clone());
        *request.method_mut() = self.method.clone();
        *request.uri_mut() = self.uri.clone();
        *request.version_mut() = self.version;
        *request.extensions_mut() = self.extensions.clone();

        let headers = request.headers_mut();
        headers.reserve(self.headers.len());
        for (name, value) in &self.headers {
            if let (Ok(name), Ok(value)) = (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value)) {
                headers.insert(name, value);
            }
        }

        request
    }
}
