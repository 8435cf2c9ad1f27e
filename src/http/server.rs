//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the beacon handler on every path
//! - Wire up middleware (tracing, request ID)
//! - Serve the listener until the shutdown broadcast fires

use axum::{
    body::Body,
    http::Request,
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::beacon::RequestBuffer;
use crate::config::BeaconConfig;
use crate::http::handler::{beacon_handler, BeaconState};
use crate::http::request::{request_id, UuidRequestId};

/// HTTP server for the beacon.
pub struct BeaconServer {
    router: Router,
    state: BeaconState,
}

impl BeaconServer {
    /// Create a server whose buffer flushes into the configured log directory.
    pub fn new(config: &BeaconConfig) -> Self {
        let state = BeaconState::from_config(config);
        let router = Self::build_router(state.clone());
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// GET routes also answer HEAD; any other method gets 405. There is no
    /// response timeout layer: a whitelisted request is always answered
    /// with the stylesheet, and the handler bounds its own wait on the
    /// buffer.
    pub fn build_router(state: BeaconState) -> Router {
        Router::new()
            .route("/", get(beacon_handler))
            .route("/{*path}", get(beacon_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
                    .layer(TraceLayer::new_for_http().make_span_with(
                        |request: &Request<Body>| {
                            tracing::info_span!(
                                "beacon_request",
                                method = %request.method(),
                                uri = %request.uri(),
                                request_id = %request_id(request.headers())
                            )
                        },
                    ))
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Returns once `shutdown` fires and in-flight requests have finished.
    /// Buffered records are not flushed on the way out.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            queue_size = self.state.buffer.capacity(),
            whitelisted_domains = self.state.whitelist.len(),
            "HTTP server starting"
        );

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Stopping accept loop");
            })
            .await?;

        tracing::info!(
            unflushed_records = self.state.buffer.len(),
            overflow = self.state.buffer.overflow(),
            "HTTP server stopped"
        );
        Ok(())
    }

    /// The shared request buffer.
    pub fn buffer(&self) -> Arc<RequestBuffer> {
        self.state.buffer.clone()
    }
}
