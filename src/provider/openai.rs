//! Generator for OpenAI-compatible `/chat/completions` endpoints.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;

use crate::error::AppError;
use crate::sse::SseDecoder;

use super::{GenChunk, GenStream, TextGenerator};

/// Convert any displayable error into `AppError::Upstream`.
fn upstream_err(e: impl std::fmt::Display) -> AppError {
    AppError::Upstream(e.to_string())
}

/// Client for an OpenAI-compatible completions API.
pub struct OpenAiGenerator {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiGenerator {
    /// Create a generator for the given endpoint base (no trailing slash).
    ///
    /// Only a connect timeout is set on the client: a total timeout would
    /// cut long streaming responses off mid-answer. The non-streaming call
    /// sets its own per-request deadline.
    pub fn new(base_url: String, api_key: String, model: String) -> Self {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .expect("failed to build reqwest client");

        Self {
            http,
            base_url,
            api_key,
            model,
        }
    }

    /// Build a POST to `/chat/completions` with the shared message body.
    fn completions(&self, system: &str, user: &str, stream: bool) -> reqwest::RequestBuilder {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user},
            ],
            "stream": stream,
        });
        self.http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn complete(&self, system: &str, user: &str) -> Result<String, AppError> {
        let value: serde_json::Value = self
            .completions(system, user, false)
            .timeout(Duration::from_secs(60))
            .send()
            .await
            .map_err(upstream_err)?
            .error_for_status()
            .map_err(upstream_err)?
            .json()
            .await
            .map_err(upstream_err)?;

        value
            .pointer("/choices/0/message/content")
            .and_then(|c| c.as_str())
            .map(String::from)
            .ok_or_else(|| AppError::Upstream("completion response had no content".into()))
    }

    async fn stream(&self, system: &str, user: &str) -> Result<GenStream, AppError> {
        let resp = self
            .completions(system, user, true)
            .send()
            .await
            .map_err(upstream_err)?
            .error_for_status()
            .map_err(upstream_err)?;

        let source = resp.bytes_stream().boxed();
        let state = (source, SseDecoder::new(), VecDeque::new(), false);
        let chunks = futures_util::stream::unfold(
            state,
            |(mut source, mut decoder, mut pending, mut finished)| async move {
                loop {
                    if let Some(chunk) = pending.pop_front() {
                        return Some((Ok(chunk), (source, decoder, pending, finished)));
                    }
                    if finished {
                        return None;
                    }
                    match source.next().await {
                        Some(Ok(bytes)) => {
                            for payload in decoder.feed(&bytes) {
                                if let Some(chunk) = decode_chunk(&payload) {
                                    pending.push_back(chunk);
                                }
                            }
                        }
                        Some(Err(e)) => {
                            finished = true;
                            return Some((Err(upstream_err(e)), (source, decoder, pending, finished)));
                        }
                        None => {
                            finished = true;
                            if let Some(payload) = decoder.finish() {
                                if let Some(chunk) = decode_chunk(&payload) {
                                    pending.push_back(chunk);
                                }
                            }
                        }
                    }
                }
            },
        );
        Ok(chunks.boxed())
    }
}

/// Decode one SSE `data:` payload from a completions stream.
///
/// `[DONE]` is the end sentinel. Chunks without delta text (role preludes,
/// finish-reason frames) yield nothing. Payloads that fail to parse are
/// skipped with a warning; one mangled frame must not kill the stream.
fn decode_chunk(payload: &str) -> Option<GenChunk> {
    if payload.trim() == "[DONE]" {
        return Some(GenChunk::Done);
    }

    let value: serde_json::Value = match serde_json::from_str(payload) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "skipping undecodable completions payload");
            return None;
        }
    };

    value
        .pointer("/choices/0/delta/content")
        .and_then(|c| c.as_str())
        .filter(|s| !s.is_empty())
        .map(|s| GenChunk::Content(s.to_string()))
}
