//! HTTP server setup and connection handling.
//!
//! # Responsibilities
//! - Create Axum Router with one handler per registered solver route
//! - Wire up middleware (tracing, request ID, body limit, panic boundary)
//! - Accept connections and serve each one over HTTP/1.1
//! - Register every connection for graceful shutdown
//! - Stop accepting and drain connections when the shutdown future fires

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use hyper::server::conn::http1;
use hyper_util::{rt::TokioIo, service::TowerToHyperService};
use std::any::Any;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::schema::{GatewayConfig, SolverRoute};
use crate::error::GatewayError;
use crate::health::HttpHealthProber;
use crate::http::dispatcher::Dispatcher;
use crate::http::request::RequestContext;
use crate::lifecycle::shutdown::{GracefulShutdown, ShutdownOutcome};
use crate::net::connection::{ConnectionHandle, ConnectionId, ConnectionRegistry};
use crate::resilience::timeouts::deadline_from_secs;
use crate::upstream::{build_client, HttpForwarder};
use crate::validation::SudokuRequestValidator;

/// Pause after a failed accept (e.g. out of file descriptors).
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Error type for server operations.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("listener error: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP server for the solver gateway.
pub struct GatewayServer {
    router: Router,
    config: GatewayConfig,
    registry: ConnectionRegistry,
}

impl GatewayServer {
    /// Create a server that probes and forwards over HTTP.
    pub fn new(config: GatewayConfig) -> Self {
        let client = build_client();
        let prober = Arc::new(HttpHealthProber::new(
            client.clone(),
            deadline_from_secs(config.timeouts.probe_secs),
        ));
        let forwarder = Arc::new(HttpForwarder::new(
            client,
            deadline_from_secs(config.timeouts.forward_secs),
        ));
        let dispatcher = Dispatcher::new(
            config.routes.clone(),
            Arc::new(SudokuRequestValidator),
            prober,
            forwarder,
        );
        Self::with_dispatcher(config, dispatcher)
    }

    /// Create a server around an already assembled dispatcher.
    pub fn with_dispatcher(config: GatewayConfig, dispatcher: Dispatcher) -> Self {
        let router = Self::build_router(&config, Arc::new(dispatcher));
        Self {
            router,
            config,
            registry: ConnectionRegistry::new(),
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, dispatcher: Arc<Dispatcher>) -> Router {
        let mut router: Router<Arc<Dispatcher>> = Router::new();
        for route in dispatcher.routes() {
            tracing::debug!(route = %route, path = route.path(), "Registering solver route");
            router = router.route(route.path(), get(solve_handler));
        }

        router
            .with_state(dispatcher)
            .layer(DefaultBodyLimit::max(config.listener.max_body_bytes))
            .layer(CatchPanicLayer::custom(handle_panic))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
    }

    /// Registry of live connections.
    pub fn registry(&self) -> ConnectionRegistry {
        self.registry.clone()
    }

    /// Run the server until `shutdown` resolves, then drain connections.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<ShutdownOutcome, ServerError>
    where
        F: Future<Output = ()> + Send,
    {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = ?self.config.routes.iter().map(|d| d.route.name()).collect::<Vec<_>>(),
            "HTTP server starting"
        );

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => break,
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => self.serve_connection(stream, peer),
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to accept connection");
                        tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                    }
                },
            }
        }

        drop(listener);
        tracing::info!(
            active_connections = self.registry.len(),
            "Stopped accepting new connections"
        );

        let outcome = GracefulShutdown::new(&self.config.shutdown)
            .drain(&self.registry)
            .await;
        tracing::info!(exit_code = outcome.exit_code(), "HTTP server stopped");
        Ok(outcome)
    }

    /// Serve one accepted connection in its own task.
    fn serve_connection(&self, stream: TcpStream, peer: SocketAddr) {
        let handle = ConnectionHandle::new(peer);
        let guard = self.registry.register(handle.clone());
        let service = TowerToHyperService::new(self.router.clone());

        tokio::spawn(async move {
            let _guard = guard;
            let connection = http1::Builder::new().serve_connection(TokioIo::new(stream), service);
            tokio::pin!(connection);

            tokio::select! {
                result = connection.as_mut() => log_connection_end(handle.id(), result),
                _ = handle.closed() => {
                    connection.as_mut().graceful_shutdown();
                    tokio::select! {
                        result = connection.as_mut() => log_connection_end(handle.id(), result),
                        _ = handle.destroyed() => {
                            tracing::debug!(connection_id = %handle.id(), "Connection destroyed");
                        }
                    }
                }
                _ = handle.destroyed() => {
                    tracing::debug!(connection_id = %handle.id(), "Connection destroyed");
                }
            }
        });
    }
}

fn log_connection_end(id: ConnectionId, result: Result<(), hyper::Error>) {
    if let Err(e) = result {
        tracing::debug!(connection_id = %id, error = %e, "Connection ended with error");
    }
}

/// Handler shared by every solver route.
async fn solve_handler(
    State(dispatcher): State<Arc<Dispatcher>>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    match SolverRoute::from_path(uri.path()) {
        Some(route) => {
            dispatcher
                .dispatch(RequestContext::new(route, &uri, headers, body))
                .await
        }
        None => {
            tracing::error!(path = %uri.path(), "Handler reached for a path with no solver route");
            GatewayError::InternalFault(format!("no solver route for path {}", uri.path())).into_response()
        }
    }
}

/// Fault boundary for panics inside request handling.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    tracing::error!(panic = %detail, "Request handler panicked");
    GatewayError::InternalFault(detail).into_response()
}
