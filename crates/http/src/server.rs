//! Accept loop sharing one parse cache between all connections.

use std::io;
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::codec::{CACHE_CAPACITY, ParseCache, RequestDecoder};
use crate::connection::HttpConnection;
use crate::handler::Handler;
use crate::protocol::Limits;

#[derive(Debug)]
pub struct ServerBuilder {
    address: Option<io::Result<Vec<SocketAddr>>>,
    limits: Limits,
    cache_capacity: usize,
}

impl ServerBuilder {
    fn new() -> Self {
        Self { address: None, limits: Limits::default(), cache_capacity: CACHE_CAPACITY }
    }

    #[must_use]
    pub fn address<A: ToSocketAddrs>(mut self, address: A) -> Self {
        self.address = Some(address.to_socket_addrs().map(Iterator::collect));
        self
    }

    #[must_use]
    pub fn limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Entries kept by each of the two parse caches, 0 disables memoization.
    #[must_use]
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub fn build(self) -> Result<Server, ServerBuildError> {
        let address = self.address.ok_or(ServerBuildError::MissingAddress)?.map_err(ServerBuildError::InvalidAddress)?;
        if address.is_empty() {
            return Err(ServerBuildError::MissingAddress);
        }
        Ok(Server { address, limits: self.limits, cache: Arc::new(ParseCache::with_capacity(self.cache_capacity)) })
    }
}

#[derive(Error, Debug)]
pub enum ServerBuildError {
    #[error("address must be set")]
    MissingAddress,
    #[error("invalid address: {0}")]
    InvalidAddress(#[source] io::Error),
}

/// An HTTP/1.x server; every connection it accepts shares the server's [`ParseCache`].
#[derive(Debug)]
pub struct Server {
    address: Vec<SocketAddr>,
    limits: Limits,
    cache: Arc<ParseCache>,
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn cache(&self) -> &Arc<ParseCache> {
        &self.cache
    }

    /// Binds the configured address and serves connections.
    ///
    /// Accept errors are logged and skipped, so this only returns when binding fails.
    pub async fn start<H>(self, handler: H) -> io::Result<()>
    where
        H: Handler + Send + Sync + 'static,
    {
        info!("start listening at {:?}", self.address);
        let tcp_listener = match TcpListener::bind(self.address.as_slice()).await {
            Ok(tcp_listener) => tcp_listener,
            Err(e) => {
                error!(cause = %e, "bind server error");
                return Err(e);
            }
        };

        self.serve(tcp_listener, handler).await
    }

    /// Serves connections accepted from an already bound listener.
    pub async fn serve<H>(self, tcp_listener: TcpListener, handler: H) -> io::Result<()>
    where
        H: Handler + Send + Sync + 'static,
    {
        let handler = Arc::new(handler);
        loop {
            let (tcp_stream, remote_addr) = match tcp_listener.accept().await {
                Ok(stream_and_addr) => stream_and_addr,
                Err(e) => {
                    warn!(cause = %e, "failed to accept");
                    continue;
                }
            };

            let handler = Arc::clone(&handler);
            let decoder = RequestDecoder::with_cache(self.limits, Arc::clone(&self.cache));

            tokio::spawn(async move {
                let (reader, writer) = tcp_stream.into_split();
                let connection = HttpConnection::with_decoder(reader, writer, decoder);
                match connection.process(handler.as_ref()).await {
                    Ok(()) => {
                        info!(%remote_addr, "finished process, connection shutdown");
                    }
                    Err(e) => {
                        error!(%remote_addr, "service has error, cause {}, connection shutdown", e);
                    }
                }
            });
        }
    }
}
