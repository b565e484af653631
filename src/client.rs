//! HTTP client for the assistant service.
//!
//! Mirrors what the builder frontend does: plain JSON for chat turns,
//! incremental `data:` record decoding for streamed turns.

use std::collections::VecDeque;
use std::time::Duration;

use futures_util::stream::BoxStream;
use futures_util::StreamExt;

use crate::assist::types::{ChatRequest, ChatResponse, StreamEvent};
use crate::error::AppError;
use crate::sse::SseDecoder;

/// Convert any displayable error into `AppError::Upstream`.
fn client_err(e: impl std::fmt::Display) -> AppError {
    AppError::Upstream(e.to_string())
}

/// Client for a running assistant service.
pub struct AssistClient {
    http: reqwest::Client,
    base_url: String,
}

impl AssistClient {
    /// Create a client for the given service base URL (no trailing slash).
    ///
    /// Only a connect timeout goes on the shared client; streams stay open
    /// as long as the server keeps sending.
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .expect("failed to build reqwest client");

        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// `POST /api/assistant/chat` — one request/response turn.
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        self.http
            .post(format!("{}/api/assistant/chat", self.base_url))
            .json(request)
            .timeout(Duration::from_secs(60))
            .send()
            .await
            .map_err(client_err)?
            .error_for_status()
            .map_err(client_err)?
            .json()
            .await
            .map_err(client_err)
    }

    /// `POST /api/assistant/stream` — one turn decoded into events.
    ///
    /// Records are reassembled across read boundaries and undecodable ones
    /// skipped with a warning. The stream stops after the first terminal
    /// event; a body that ends without one just ends (the server was cut
    /// off).
    pub async fn stream(
        &self,
        request: &ChatRequest,
    ) -> Result<BoxStream<'static, StreamEvent>, AppError> {
        let resp = self
            .http
            .post(format!("{}/api/assistant/stream", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(client_err)?
            .error_for_status()
            .map_err(client_err)?;

        let source = resp.bytes_stream().boxed();
        let state = (source, SseDecoder::new(), VecDeque::<StreamEvent>::new(), false);
        let events = futures_util::stream::unfold(
            state,
            |(mut source, mut decoder, mut pending, mut finished)| async move {
                loop {
                    if let Some(event) = pending.pop_front() {
                        if event.is_terminal() {
                            // Nothing follows a terminal event.
                            pending.clear();
                            finished = true;
                        }
                        return Some((event, (source, decoder, pending, finished)));
                    }
                    if finished {
                        return None;
                    }
                    match source.next().await {
                        Some(Ok(bytes)) => {
                            for payload in decoder.feed(&bytes) {
                                if let Some(event) = decode_event(&payload) {
                                    pending.push_back(event);
                                }
                            }
                        }
                        Some(Err(e)) => {
                            // Keep already-decoded events; the missing
                            // terminal tells the consumer we were cut off.
                            tracing::warn!(error = %e, "assist stream transport error");
                            finished = true;
                        }
                        None => {
                            finished = true;
                            if let Some(payload) = decoder.finish() {
                                if let Some(event) = decode_event(&payload) {
                                    pending.push_back(event);
                                }
                            }
                        }
                    }
                }
            },
        );
        Ok(events.boxed())
    }
}

fn decode_event(payload: &str) -> Option<StreamEvent> {
    match serde_json::from_str(payload) {
        Ok(event) => Some(event),
        Err(e) => {
            tracing::warn!(error = %e, "skipping undecodable stream record");
            None
        }
    }
}
