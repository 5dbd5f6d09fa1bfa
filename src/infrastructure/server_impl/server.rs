use std::future::{self, Future};
use std::net::SocketAddr;

use eyre::WrapErr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};

use crate::infrastructure::config::{ParseErrorPolicy, ServerConfig};
use crate::infrastructure::server_impl::parser::parse_http;
use crate::infrastructure::server_impl::response::Response;
use crate::AnyResult;

/// Turns the bytes of one read into the response to send, if any.
///
/// Invalid UTF-8 is replaced rather than rejected; the parser only cares
/// about CRLF and the request line shape.
pub fn process_server_request(buffer: &[u8], policy: ParseErrorPolicy) -> Option<Response> {
    let raw = String::from_utf8_lossy(buffer);

    match parse_http(&raw) {
        Ok(request) => {
            debug!(
                method = %request.method,
                path = %request.path,
                version = %request.version,
                headers = request.headers.len(),
                body_len = request.body.len(),
                "received request"
            );
            Some(Response::hello())
        }
        Err(e) => {
            warn!(%policy, "failed to parse request; err = {e}");
            match policy {
                ParseErrorPolicy::BadRequest => Some(Response::bad_request()),
                ParseErrorPolicy::Drop => None,
            }
        }
    }
}

/// Serves one connection: a single bounded read, one parse, at most one
/// write. A request larger than the buffer is cut at the buffer size.
pub async fn handle_connection(mut socket: TcpStream, config: ServerConfig) -> AnyResult<()> {
    let mut buf = vec![0; config.read_buffer_size];

    let n = socket
        .read(&mut buf)
        .await
        .wrap_err("failed to read from socket")?;

    // socket closed
    if n == 0 {
        return Ok(());
    }

    if let Some(response) = process_server_request(&buf[..n], config.on_parse_error) {
        socket
            .write_all(&response.into_http())
            .await
            .wrap_err("failed to write to socket")?;
    }

    socket
        .shutdown()
        .await
        .wrap_err("failed to shut down socket")?;
    Ok(())
}

/// Owns the listening socket. Dropping the server, or returning from
/// [Server::run_until], closes it.
#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    config: ServerConfig,
}

impl Server {
    pub async fn bind(config: ServerConfig) -> AnyResult<Self> {
        config.validate()?;
        let listener = TcpListener::bind(config.listen_addr)
            .await
            .wrap_err_with(|| format!("failed to bind {}", config.listen_addr))?;

        Ok(Self { listener, config })
    }

    /// Adopts an already bound listener, e.g. one handed over by `listenfd`.
    /// Must be called from within a tokio runtime.
    pub fn from_std(listener: std::net::TcpListener, config: ServerConfig) -> AnyResult<Self> {
        config.validate()?;
        listener
            .set_nonblocking(true)
            .wrap_err("failed to make inherited listener non-blocking")?;
        let listener = TcpListener::from_std(listener).wrap_err("failed to adopt listener")?;

        Ok(Self { listener, config })
    }

    pub fn local_addr(&self) -> AnyResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub async fn run(self) -> AnyResult<()> {
        self.run_until(future::pending()).await
    }

    /// Accepts connections until `shutdown` completes, handling each one in
    /// its own task. Connections already accepted keep running.
    pub async fn run_until(self, shutdown: impl Future<Output = ()>) -> AnyResult<()> {
        let addr = self.local_addr()?;
        info!(%addr, "listening");

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                accepted = self.listener.accept() => match accepted {
                    Ok((socket, peer)) => {
                        let config = self.config;
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(socket, config).await {
                                error!(%peer, "connection failed; err = {e:?}");
                            }
                        });
                    }
                    Err(e) => error!("failed to accept connection; err = {e:?}"),
                },
            }
        }

        info!(%addr, "shutting down");
        Ok(())
    }
}
