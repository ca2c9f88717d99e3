//! Front door for the user admin console.
//!
//! One process, three kinds of traffic: `/api/*` is proxied to the backend
//! with the prefix stripped, files from the built client bundle are served as
//! they are, and every other `GET` receives the bundle's `index.html` so the
//! client can route deep links itself.

pub mod assets;
pub mod config;
pub mod proxy;
pub mod route;

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Router,
};
use reqwest::Url;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub use assets::ClientBundle;
pub use config::{ConfigError, GatewayConfig};
pub use proxy::{Forwarder, OutboundRequest, ProxyError};
pub use route::{classify, Route};

#[derive(Clone)]
struct AppState {
    inner: Arc<Inner>,
}

struct Inner {
    backend: Url,
    bundle: ClientBundle,
    forwarder: Forwarder,
}

/// Build the gateway service for `config`.
///
/// Fails only when the outbound HTTP client cannot be constructed.
pub fn app(config: &GatewayConfig) -> Result<Router, reqwest::Error> {
    let state = AppState {
        inner: Arc::new(Inner {
            backend: config.backend.clone(),
            bundle: ClientBundle::new(&config.static_dir),
            forwarder: Forwarder::new()?,
        }),
    };

    Ok(Router::new()
        .fallback(dispatch)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Serve `router` on `listener` until Ctrl-C or SIGTERM, then drain.
pub async fn serve(listener: TcpListener, router: Router) -> std::io::Result<()> {
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn dispatch(State(state): State<AppState>, request: Request) -> Response {
    let inner = &state.inner;

    match classify(request.method(), request.uri().path()) {
        Route::Api { upstream_path } => forward(inner, request, &upstream_path)
            .await
            .unwrap_or_else(IntoResponse::into_response),
        Route::Bundle => inner.bundle.serve(request).await,
        Route::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }
}

async fn forward(inner: &Inner, request: Request, upstream_path: &str) -> Result<Response, ProxyError> {
    let (parts, body) = request.into_parts();
    let outbound = proxy::outbound(
        parts.method,
        upstream_path,
        parts.uri.query(),
        &parts.headers,
        &inner.backend,
    );
    tracing::debug!(method = %outbound.method, url = %outbound.url, "forwarding api call");

    inner.forwarder.send(outbound, body).await
}

/// Resolves on the first Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(%error, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!(%error, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    tracing::info!("shutdown signal received, draining connections");
}
