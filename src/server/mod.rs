//! HTTP adapter: `GET /api/og` and a liveness probe.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::extract::{RawQuery, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::engine::OgEngine;
use crate::foundation::error::OgError;

/// Default `max-age` for image responses: one year.
pub const DEFAULT_CACHE_MAX_AGE: u64 = 31_536_000;

/// Listener and response settings.
#[derive(Clone, Debug)]
pub struct ServerSettings {
    /// Socket address to bind.
    pub bind: SocketAddr,
    /// `max-age` advertised in `Cache-Control`.
    pub cache_max_age: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 3000)),
            cache_max_age: DEFAULT_CACHE_MAX_AGE,
        }
    }
}

#[derive(Clone)]
struct AppState {
    engine: Arc<OgEngine>,
    cache_control: HeaderValue,
}

/// Error returned from handlers; always a `500` with a plain-text body.
#[derive(Debug)]
pub struct AppError(OgError);

impl From<OgError> for AppError {
    fn from(err: OgError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(err = %self.0, "render failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            format!("failed to generate image: {}", self.0),
        )
            .into_response()
    }
}

/// `Cache-Control` value for image responses.
pub fn cache_control_value(max_age: u64) -> String {
    format!("public, immutable, no-transform, max-age={max_age}")
}

/// Build the application router.
pub fn router(engine: Arc<OgEngine>, cache_max_age: u64) -> Router {
    let cache_control = HeaderValue::try_from(cache_control_value(cache_max_age))
        .unwrap_or_else(|_| HeaderValue::from_static("public, max-age=0"));
    let state = AppState {
        engine,
        cache_control,
    };

    Router::new()
        .route("/api/og", get(og_image))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn og_image(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Response, AppError> {
    let spec = state.engine.interpret_query(query.as_deref().unwrap_or(""));
    let png = state.engine.render_png(&spec).await?;
    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("image/png")),
            (header::CACHE_CONTROL, state.cache_control.clone()),
        ],
        png,
    )
        .into_response())
}

async fn healthz() -> &'static str {
    "ok"
}

/// Bind and serve until ctrl-c.
pub async fn serve(engine: Arc<OgEngine>, settings: ServerSettings) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(settings.bind)
        .await
        .with_context(|| format!("bind {}", settings.bind))?;
    let local = listener.local_addr().context("read local address")?;
    tracing::info!(addr = %local, "listening");

    axum::serve(listener, router(engine, settings.cache_max_age))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(%err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
