use std::io;

use bytes::Bytes;
use micro_h1::handler::make_handler;
use micro_h1::protocol::{Limits, SharedRequest};
use micro_h1::server::Server;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::DEBUG).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let server = match Server::builder().address("127.0.0.1:8080").limits(Limits::default()).build() {
        Ok(server) => server,
        Err(e) => {
            error!(cause = %e, "invalid server config");
            return;
        }
    };

    if let Err(e) = server.start(make_handler(echo)).await {
        error!(cause = %e, "server stopped");
    }
}

async fn echo(request: SharedRequest) -> Result<Bytes, io::Error> {
    info!(method = %request.method(), path = request.uri().path(), headers = request.headers().len(), "receiving request");

    let mut response = format!("HTTP/1.1 200 OK\r\ncontent-length: {}\r\n", request.body().len());
    if let Some(content_type) = request.headers().get_ignore_case("content-type") {
        response.push_str(&format!("content-type: {content_type}\r\n"));
    }
    response.push_str("\r\n");

    let mut bytes = response.into_bytes();
    bytes.extend_from_slice(request.body());
    Ok(Bytes::from(bytes))
}
