//! Sequential single-client HTTP server

use std::{io, net::SocketAddr};

use embedded_hal::digital::StatefulOutputPin;
use listenfd::ListenFd;
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt},
    net::{TcpListener, TcpSocket},
};
use tracing::{debug, info, warn};

use crate::{
    core::error::{HttpError, HttpResult},
    transport::http::{handler::RequestHandler, response::Response},
};

/// Bytes read from a connection; the rest of the request is ignored
pub const REQUEST_BUFFER_SIZE: usize = 1024;

/// Pending connections queued while one is being served
pub const LISTEN_BACKLOG: u32 = 1;

/// What happened to a single connection
#[derive(Debug)]
pub enum ConnectionOutcome {
    /// A response with this status was sent
    Responded(u16),
    /// The client sent nothing; closed without a response
    Empty,
    /// Handling failed; a 500 was attempted
    Failed {
        error: HttpError,
        error_response_sent: bool,
    },
}

/// Serves one connection at a time until the process exits
pub struct HttpResponder<P: StatefulOutputPin> {
    listener: TcpListener,
    handler: RequestHandler<P>,
}

impl<P: StatefulOutputPin> HttpResponder<P> {
    /// Bind a fresh listener with `SO_REUSEADDR` and a backlog of one
    pub fn bind(addr: SocketAddr, handler: RequestHandler<P>) -> io::Result<Self> {
        let socket = if addr.is_ipv4() {
            TcpSocket::new_v4()?
        } else {
            TcpSocket::new_v6()?
        };
        socket.set_reuseaddr(true)?;
        socket.bind(addr)?;
        let listener = socket.listen(LISTEN_BACKLOG)?;

        Ok(Self { listener, handler })
    }

    /// Serve on an already listening socket
    pub fn from_listener(listener: TcpListener, handler: RequestHandler<P>) -> Self {
        Self { listener, handler }
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn handler_mut(&mut self) -> &mut RequestHandler<P> {
        &mut self.handler
    }

    /// Accept and fully serve connections forever
    pub async fn run(&mut self) {
        info!(
            "Open: http://{}:{}/",
            self.handler.ip(),
            self.local_addr().map(|a| a.port()).unwrap_or_default()
        );

        loop {
            if let Err(e) = self.serve_one().await {
                warn!("Error accepting connection: {}", e);
            }
        }
    }

    /// Accept a single connection and serve it to completion
    pub async fn serve_one(&mut self) -> io::Result<ConnectionOutcome> {
        let (stream, remote) = self.listener.accept().await?;
        debug!(%remote, "Client connected");

        let outcome = handle_connection(&mut self.handler, stream).await;
        debug!(%remote, ?outcome, "Client closed");
        Ok(outcome)
    }
}

/// Listener passed in by systemd socket activation, if any
pub fn inherited_listener() -> io::Result<Option<TcpListener>> {
    let mut fds = ListenFd::from_env();
    match fds.take_tcp_listener(0)? {
        Some(std_listener) => {
            std_listener.set_nonblocking(true)?;
            Ok(Some(TcpListener::from_std(std_listener)?))
        }
        None => Ok(None),
    }
}

/// Read one request from `stream`, answer it and close
pub async fn handle_connection<P, S>(
    handler: &mut RequestHandler<P>,
    mut stream: S,
) -> ConnectionOutcome
where
    P: StatefulOutputPin,
    S: AsyncRead + AsyncWrite + Unpin,
{
    let outcome = match respond(handler, &mut stream).await {
        Ok(Some(status)) => ConnectionOutcome::Responded(status),
        Ok(None) => ConnectionOutcome::Empty,
        Err(error) => {
            warn!("Request handling failed: {}", error);
            let error_response_sent = match stream
                .write_all(&Response::internal_error().to_bytes())
                .await
            {
                Ok(()) => true,
                Err(e) => {
                    debug!("Could not send error response: {}", e);
                    false
                }
            };
            ConnectionOutcome::Failed {
                error,
                error_response_sent,
            }
        }
    };

    if let Err(e) = stream.shutdown().await {
        debug!("Shutdown failed: {}", e);
    }
    outcome
}

async fn respond<P, S>(
    handler: &mut RequestHandler<P>,
    stream: &mut S,
) -> HttpResult<Option<u16>>
where
    P: StatefulOutputPin,
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut buf = [0u8; REQUEST_BUFFER_SIZE];
    let n = stream.read(&mut buf).await?;
    if n == 0 {
        return Ok(None);
    }

    let response = handler.try_handle(&buf[..n])?;
    stream.write_all(&response.to_bytes()).await?;
    stream.flush().await?;
    Ok(Some(response.status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        peripheral::{LedController, led::testing::FakePin},
        transport::http::template::PageTemplate,
    };
    use tokio::net::TcpStream;
    use tokio_test::io::Builder;

    fn handler() -> RequestHandler<FakePin> {
        RequestHandler::new(
            LedController::new(FakePin::default()).unwrap(),
            PageTemplate::new("<p>__IP__ __LED__</p>"),
            "127.0.0.1",
        )
    }

    async fn request(
        responder: &mut HttpResponder<FakePin>,
        raw: &[u8],
    ) -> (ConnectionOutcome, String) {
        let addr = responder.local_addr().unwrap();
        let client = async {
            let mut stream = TcpStream::connect(addr).await.unwrap();
            stream.write_all(raw).await.unwrap();
            let mut response = Vec::new();
            stream.read_to_end(&mut response).await.unwrap();
            String::from_utf8(response).unwrap()
        };

        let (outcome, response) = tokio::join!(responder.serve_one(), client);
        (outcome.unwrap(), response)
    }

    #[tokio::test]
    async fn test_connection_redirect() {
        let mut handler = handler();
        let stream = Builder::new()
            .read(b"GET /on HTTP/1.1\r\nHost: x\r\n\r\n")
            .write(b"HTTP/1.1 302 Found\r\nLocation: /\r\nConnection: close\r\n\r\n")
            .build();

        let outcome = handle_connection(&mut handler, stream).await;

        assert!(matches!(outcome, ConnectionOutcome::Responded(302)));
        assert!(handler.led_mut().is_on().unwrap());
    }

    #[tokio::test]
    async fn test_connection_empty_request() {
        let mut handler = handler();
        let stream = Builder::new().build();

        let outcome = handle_connection(&mut handler, stream).await;

        assert!(matches!(outcome, ConnectionOutcome::Empty));
    }

    #[tokio::test]
    async fn test_connection_read_error_sends_500() {
        let mut handler = handler();
        let stream = Builder::new()
            .read_error(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
            .write(b"HTTP/1.1 500 Internal Server Error\r\nConnection: close\r\n\r\n")
            .build();

        let outcome = handle_connection(&mut handler, stream).await;

        assert!(matches!(
            outcome,
            ConnectionOutcome::Failed {
                error: HttpError::Io(_),
                error_response_sent: true,
            }
        ));
    }

    #[tokio::test]
    async fn test_connection_led_failure_sends_500() {
        let mut handler = handler();
        handler.led_mut().pin_mut().broken = true;
        let stream = Builder::new()
            .read(b"GET /on HTTP/1.1\r\n\r\n")
            .write(b"HTTP/1.1 500 Internal Server Error\r\nConnection: close\r\n\r\n")
            .build();

        let outcome = handle_connection(&mut handler, stream).await;

        assert!(matches!(
            outcome,
            ConnectionOutcome::Failed {
                error: HttpError::Led(_),
                error_response_sent: true,
            }
        ));
    }

    #[tokio::test]
    async fn test_connection_failed_error_response_is_swallowed() {
        let mut handler = handler();
        let stream = Builder::new()
            .read(b"GET /favicon.ico HTTP/1.1\r\n\r\n")
            .write_error(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
            .write_error(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
            .build();

        let outcome = handle_connection(&mut handler, stream).await;

        assert!(matches!(
            outcome,
            ConnectionOutcome::Failed {
                error_response_sent: false,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_server_led_round_trip() {
        let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let mut responder = HttpResponder::bind(addr, handler()).unwrap();

        let (outcome, response) =
            request(&mut responder, b"GET /on HTTP/1.1\r\n\r\n").await;
        assert!(matches!(outcome, ConnectionOutcome::Responded(302)));
        assert!(response.starts_with("HTTP/1.1 302 Found\r\n"));
        assert!(response.contains("Location: /\r\n"));

        let (_, page) = request(&mut responder, b"GET / HTTP/1.1\r\n\r\n").await;
        assert!(page.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(page.ends_with("<p>127.0.0.1 ON</p>"));

        request(&mut responder, b"GET /off HTTP/1.1\r\n\r\n").await;
        let (_, page) = request(&mut responder, b"GET / HTTP/1.1\r\n\r\n").await;
        assert!(page.ends_with("<p>127.0.0.1 OFF</p>"));
    }

    #[tokio::test]
    async fn test_server_favicon() {
        let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let mut responder = HttpResponder::bind(addr, handler()).unwrap();

        let (outcome, response) =
            request(&mut responder, b"GET /favicon.ico HTTP/1.1\r\n\r\n").await;

        assert!(matches!(outcome, ConnectionOutcome::Responded(204)));
        assert_eq!(
            response,
            "HTTP/1.1 204 No Content\r\nConnection: close\r\n\r\n"
        );
    }

    #[tokio::test]
    async fn test_server_unknown_path_renders_bound_address() {
        let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let mut responder = HttpResponder::bind(addr, handler()).unwrap();

        let (outcome, response) =
            request(&mut responder, b"GET /what HTTP/1.1\r\n\r\n").await;

        assert!(matches!(outcome, ConnectionOutcome::Responded(200)));
        assert!(response.contains("Content-Type: text/html; charset=utf-8\r\n"));
        assert!(response.contains("Connection: close\r\n"));
        assert!(response.ends_with("<p>127.0.0.1 OFF</p>"));
    }

    #[tokio::test]
    async fn test_server_client_closes_without_data() {
        let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let mut responder = HttpResponder::bind(addr, handler()).unwrap();
        let addr = responder.local_addr().unwrap();

        let client = async {
            let stream = TcpStream::connect(addr).await.unwrap();
            drop(stream);
        };
        let (outcome, ()) = tokio::join!(responder.serve_one(), client);

        assert!(matches!(outcome.unwrap(), ConnectionOutcome::Empty));
    }
}
