//! Text-generation backends.
//!
//! The assistant core talks to a [`TextGenerator`]; which backend sits
//! behind it is a deployment decision. `openai` drives any
//! OpenAI-compatible completions endpoint; `echo` is deterministic and
//! key-less so the service (and its tests) run with zero external
//! dependencies.

pub mod echo;
pub mod openai;

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::stream::BoxStream;

use crate::config::Config;
use crate::error::AppError;

pub use echo::EchoGenerator;
pub use openai::OpenAiGenerator;

// =============================================================================
// GenChunk — unified streaming output
// =============================================================================

/// One unit of streamed model output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenChunk {
    /// A fragment of assistant text, in arrival order.
    Content(String),
    /// The backend's end-of-stream marker. Transport cut-offs end the
    /// stream without one.
    Done,
}

/// Chunk stream returned by [`TextGenerator::stream`].
pub type GenStream = BoxStream<'static, Result<GenChunk, AppError>>;

// =============================================================================
// ProviderKind — which backend is selected
// =============================================================================

/// Supported generation backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    Echo,
}

impl ProviderKind {
    /// Parse from the `ASSIST_PROVIDER` setting.
    pub fn from_setting(s: &str) -> Self {
        match s {
            "echo" => ProviderKind::Echo,
            _ => ProviderKind::OpenAi,
        }
    }

    /// Serialize to the setting string.
    pub fn as_setting(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Echo => "echo",
        }
    }
}

// =============================================================================
// TextGenerator trait
// =============================================================================

/// Abstraction over chat-completion backends.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// One-shot completion for the non-streaming chat path.
    async fn complete(&self, system: &str, user: &str) -> Result<String, AppError>;

    /// Streaming completion. Acquiring the stream can fail (connection,
    /// auth); once acquired, per-chunk failures travel inside the stream.
    async fn stream(&self, system: &str, user: &str) -> Result<GenStream, AppError>;
}

// =============================================================================
// Factory
// =============================================================================

/// Build the configured generator.
///
/// `openai` without an API key falls back to `echo` with a warning rather
/// than failing startup; every request would 502 otherwise.
pub fn resolve(config: &Config) -> Arc<dyn TextGenerator> {
    match (config.provider, &config.openai_api_key) {
        (ProviderKind::OpenAi, Some(key)) => {
            tracing::info!(
                model = %config.openai_model,
                base_url = %config.openai_base_url,
                "text generator: openai"
            );
            Arc::new(OpenAiGenerator::new(
                config.openai_base_url.clone(),
                key.clone(),
                config.openai_model.clone(),
            ))
        }
        (ProviderKind::OpenAi, None) => {
            tracing::warn!("OPENAI_API_KEY not set; falling back to echo generator");
            Arc::new(EchoGenerator)
        }
        (ProviderKind::Echo, _) => {
            tracing::info!("text generator: echo");
            Arc::new(EchoGenerator)
        }
    }
}
