//! HTTP server exposing the assistant over JSON and SSE.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use futures_util::StreamExt;
use tower_http::cors::CorsLayer;
use tracing::Instrument;
use uuid::Uuid;

use crate::assist::types::{ChatRequest, ChatResponse};
use crate::assist::Assistant;
use crate::config::Config;
use crate::error::AppError;

/// Shared state for the assistant HTTP server.
#[derive(Clone)]
pub struct AppState {
    pub assistant: Assistant,
}

/// Build the router. CORS is permissive: the builder UI calls from its own
/// origin.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/assistant/chat", post(chat))
        .route("/api/assistant/stream", post(stream))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Run the HTTP server until ctrl-c or SIGTERM.
pub async fn serve(config: &Config, assistant: Assistant) -> Result<(), AppError> {
    let state = Arc::new(AppState { assistant });
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("assistant server listening on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Health check endpoint.
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok", "service": "studio-assist" }))
}

/// POST /api/assistant/chat — one request/response turn.
async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let span = tracing::info_span!("assist_chat", request_id = %Uuid::new_v4());
    async move {
        tracing::debug!(message_len = request.message.len(), "chat turn");
        state.assistant.chat(request).await.map(Json)
    }
    .instrument(span)
    .await
}

/// POST /api/assistant/stream — one turn as a `text/event-stream`.
///
/// Each event is one JSON-encoded record in a `data:` field. A client that
/// disconnects drops the stream mid-flight; no terminal event is synthesized
/// for it.
async fn stream(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<impl IntoResponse, AppError> {
    let span = tracing::info_span!("assist_stream", request_id = %Uuid::new_v4());
    let events = async {
        tracing::debug!(message_len = request.message.len(), "stream turn");
        state.assistant.stream(request).await
    }
    .instrument(span)
    .await?;

    let sse = events.map(|event| {
        let data = serde_json::to_string(&event).unwrap_or_default();
        Ok::<_, Infallible>(Event::default().data(data))
    });

    Ok(Sse::new(sse).keep_alive(KeepAlive::default()))
}

/// Resolve on ctrl-c or SIGTERM, whichever lands first.
async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("shutting down (ctrl-c)"),
        _ = terminate => tracing::info!("shutting down (SIGTERM)"),
    }
}
