//! Async HTTP server using hyper
//!
//! One tokio task per accepted connection, HTTP/1.1 connection driver. The
//! accept loop stops when the shutdown future resolves. Every connection is
//! then asked to close once its in-flight request is answered, and the
//! server waits for them up to the shutdown timeout.

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use hyper_util::server::graceful::GracefulShutdown;
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;

use super::{HttpError, Request, Router};

/// Default request body limit: 1 MiB
pub const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;

/// Default wait for in-flight connections on shutdown
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// Async HTTP server serving a router with shared state
pub struct HttpServer<S = ()> {
    router: Arc<Router<S>>,
    state: Arc<S>,
    max_body_size: usize,
    shutdown_timeout: Duration,
}

impl<S: Send + Sync + 'static> HttpServer<S> {
    /// Create a new server with a router and state
    pub fn new(router: Router<S>, state: S) -> Self {
        Self {
            router: Arc::new(router),
            state: Arc::new(state),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }

    /// Set the request body size limit in bytes
    pub fn with_max_body_size(mut self, limit: usize) -> Self {
        self.max_body_size = limit;
        self
    }

    /// Set how long shutdown waits for in-flight connections
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Bind the listening socket; port 0 picks an ephemeral port
    pub async fn bind(self, addr: &str) -> Result<BoundServer<S>, HttpError> {
        let socket: SocketAddr =
            addr.parse().map_err(|_| HttpError::InvalidAddress(addr.to_string()))?;
        let listener = TcpListener::bind(socket)
            .await
            .map_err(|source| HttpError::Bind { addr: addr.to_string(), source })?;

        Ok(BoundServer { server: self, listener })
    }
}

/// A server with a bound listener, ready to accept connections
pub struct BoundServer<S = ()> {
    server: HttpServer<S>,
    listener: TcpListener,
}

impl<S: Send + Sync + 'static> BoundServer<S> {
    /// The address actually bound
    pub fn local_addr(&self) -> Result<SocketAddr, HttpError> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until Ctrl-C
    pub async fn run(self) -> Result<(), HttpError> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
            log::info!("Shutdown signal received");
        })
        .await
    }

    /// Serve until `shutdown` resolves
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), HttpError>
    where
        F: Future<Output = ()>,
    {
        let BoundServer { server, listener } = self;
        let graceful = GracefulShutdown::new();
        tokio::pin!(shutdown);

        loop {
            let (stream, remote_addr) = tokio::select! {
                _ = &mut shutdown => break,
                accepted = listener.accept() => match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        log::warn!("Failed to accept connection: {}", e);
                        continue;
                    }
                },
            };

            let router = server.router.clone();
            let state = server.state.clone();
            let max_body_size = server.max_body_size;

            let io = TokioIo::new(stream);
            let service = service_fn(move |req| {
                let router = router.clone();
                let state = state.clone();
                async move { Ok::<_, Infallible>(handle_request(req, &router, &state, max_body_size).await) }
            });
            let conn = graceful.watch(http1::Builder::new().serve_connection(io, service));

            tokio::spawn(async move {
                if let Err(err) = conn.await {
                    log::error!("Connection error from {}: {}", remote_addr, err);
                }
            });
        }

        drop(listener);
        log::info!("Server stopped accepting connections, draining");

        tokio::select! {
            _ = graceful.shutdown() => log::info!("All connections closed"),
            _ = tokio::time::sleep(server.shutdown_timeout) => {
                log::warn!(
                    "Shutdown timed out after {:?} with connections still open",
                    server.shutdown_timeout
                );
            }
        }
        Ok(())
    }
}

async fn handle_request<S>(
    req: hyper::Request<Incoming>,
    router: &Router<S>,
    state: &S,
    max_body_size: usize,
) -> hyper::Response<Full<Bytes>> {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = match Request::from_hyper(req, max_body_size).await {
        Ok(request) => router.handle(&request, state),
        Err(error) => error.into_response(),
    };

    log::info!(
        "{} {} {} {:.2}ms",
        method,
        path,
        response.status().as_u16(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    response.into_hyper()
}
