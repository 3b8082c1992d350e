//! Request handlers.
//!
//! Response serialization is not this crate's business: a handler answers with the bytes to
//! write back, already encoded.

use std::error::Error;
use std::future::Future;

use bytes::Bytes;

use crate::protocol::SharedRequest;

#[trait_variant::make(Send)]
pub trait Handler {
    type Error: Into<Box<dyn Error + Send + Sync>>;

    /// Handles one request and returns the encoded response.
    async fn call(&self, request: SharedRequest) -> Result<Bytes, Self::Error>;
}

#[derive(Debug)]
pub struct HandlerFn<F> {
    f: F,
}

impl<F, Fut, Err> Handler for HandlerFn<F>
where
    F: Fn(SharedRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Bytes, Err>> + Send,
    Err: Into<Box<dyn Error + Send + Sync>>,
{
    type Error = Err;

    fn call(&self, request: SharedRequest) -> impl Future<Output = Result<Bytes, Self::Error>> + Send {
        (self.f)(request)
    }
}

pub fn make_handler<F, Fut, Err>(f: F) -> HandlerFn<F>
where
    F: Fn(SharedRequest) -> Fut,
    Fut: Future<Output = Result<Bytes, Err>>,
    Err: Into<Box<dyn Error + Send + Sync>>,
{
    HandlerFn { f }
}
