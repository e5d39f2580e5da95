use std::net::SocketAddr;

use axum::Router;
use time::Duration;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::state::AppState;
use crate::{auth, tasks};

pub fn build_app(state: AppState) -> Router {
    // The cookie carries only the session id; identity lives server-side.
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_name(state.config.session.cookie_name.clone())
        .with_secure(state.config.session.secure)
        .with_expiry(Expiry::OnInactivity(Duration::minutes(
            state.config.session.ttl_minutes,
        )));

    // The span records the path only; notice flags ride on the query string
    // and have no place in the logs.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &axum::http::Request<_>| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                path = %request.uri().path(),
            )
        })
        .on_response(
            |response: &axum::http::Response<_>,
             latency: std::time::Duration,
             _span: &tracing::Span| {
                let status = response.status();
                let elapsed_ms = latency.as_millis() as u64;
                if status.is_server_error() {
                    tracing::error!(%status, elapsed_ms, "request failed");
                } else if status.is_redirection() {
                    // Nearly every form flow ends in a redirect; keep them quiet.
                    tracing::debug!(%status, elapsed_ms, "request redirected");
                } else {
                    tracing::info!(%status, elapsed_ms, "request served");
                }
            },
        );

    Router::new()
        .merge(auth::router())
        .merge(tasks::router())
        .with_state(state)
        .layer(session_layer)
        .layer(trace_layer)
}

pub async fn serve(app: Router, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
