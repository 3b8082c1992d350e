use std::error::Error;

use bytes::Bytes;
use futures::StreamExt;
use http::StatusCode;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio_util::codec::FramedRead;
use tracing::{error, info, warn};

use crate::codec::RequestDecoder;
use crate::handler::Handler;
use crate::protocol::{HttpError, SendError, SharedRequest};

/// An HTTP connection that reads framed requests and writes back handler responses
///
/// `HttpConnection` owns the receive buffer (inside `FramedRead`) and the parse state (inside
/// the decoder) of one connection. Keep-alive is implicit: the loop continues until the peer
/// closes or a request fails to parse.
///
/// # Type Parameters
///
/// * `R`: The async readable stream type
/// * `W`: The async writable stream type
///
#[derive(Debug)]
pub struct HttpConnection<R, W> {
    framed_read: FramedRead<R, RequestDecoder>,
    writer: W,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self::with_decoder(reader, writer, RequestDecoder::new())
    }

    pub fn with_decoder(reader: R, writer: W, decoder: RequestDecoder) -> Self {
        Self { framed_read: FramedRead::with_capacity(reader, decoder, 8 * 1024), writer }
    }

    pub async fn process<H>(mut self, handler: &H) -> Result<(), HttpError>
    where
        H: Handler,
    {
        loop {
            match self.framed_read.next().await {
                Some(Ok(request)) => {
                    self.do_process(request, handler).await?;
                }

                Some(Err(e)) if e.is_io() => {
                    error!("can't receive next request, cause {}", e);
                    return Err(e.into());
                }

                Some(Err(e)) => {
                    let status = e.status_code();
                    warn!(%status, cause = %e, "reject request, connection will be closed");
                    self.do_send(build_error_response(status, true)).await?;
                    return Err(e.into());
                }

                None => {
                    info!("cant read more request, break this connection down");
                    return Ok(());
                }
            }
        }
    }

    async fn do_process<H>(&mut self, request: SharedRequest, handler: &H) -> Result<(), HttpError>
    where
        H: Handler,
    {
        let response = match handler.call(request).await {
            Ok(response) => response,
            Err(e) => {
                let cause: Box<dyn Error + Send + Sync> = e.into();
                error!("handle response error, cause: {}", cause);
                build_error_response(StatusCode::INTERNAL_SERVER_ERROR, false)
            }
        };

        self.do_send(response).await
    }

    async fn do_send(&mut self, response: Bytes) -> Result<(), HttpError> {
        self.writer.write_all(&response).await.map_err(SendError::io)?;
        self.writer.flush().await.map_err(SendError::io)?;
        Ok(())
    }
}

/// Minimal empty response announcing `status_code`.
fn build_error_response(status_code: StatusCode, close: bool) -> Bytes {
    let reason = status_code.canonical_reason().unwrap_or_default();
    let connection = if close { "connection: close\r\n" } else { "" };
    Bytes::from(format!("HTTP/1.1 {} {reason}\r\ncontent-length: 0\r\n{connection}\r\n", status_code.as_str()))
}
