use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::AppError;
use crate::provider::ProviderKind;

/// Default bind address when `ASSIST_BIND_ADDR` is unset.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:9430";

/// Runtime configuration, read once at startup from the environment
/// (`.env` files are loaded by the binary before this runs).
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// Which text-generation provider to use.
    pub provider: ProviderKind,
    /// OpenAI-compatible completions endpoint base (no trailing slash).
    pub openai_base_url: String,
    /// API key for the completions endpoint. Absent means the echo
    /// provider is used so the service boots without external dependencies.
    pub openai_api_key: Option<String>,
    /// Model name sent to the completions endpoint.
    pub openai_model: String,
    /// Base URL of the Studio workspace API serving table/screen metadata.
    /// Absent means an empty in-memory catalog (development mode).
    pub catalog_base_url: Option<String>,
    /// Bearer token for the workspace API.
    pub catalog_api_key: Option<String>,
    /// When set, tracing also writes daily-rolled files into this directory.
    pub log_dir: Option<PathBuf>,
    /// Emit JSON log lines instead of the human-readable format.
    pub log_json: bool,
}

impl Config {
    /// Build the configuration from environment variables, applying defaults.
    pub fn from_env() -> Result<Self, AppError> {
        let bind_addr = parse_bind_addr(
            &std::env::var("ASSIST_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.into()),
        )?;

        let openai_api_key = non_empty_var("OPENAI_API_KEY");

        // Explicit ASSIST_PROVIDER wins; otherwise the presence of an API key
        // decides between the real provider and the key-less echo fallback.
        let provider = match std::env::var("ASSIST_PROVIDER") {
            Ok(s) => ProviderKind::from_setting(&s),
            Err(_) if openai_api_key.is_some() => ProviderKind::OpenAi,
            Err(_) => ProviderKind::Echo,
        };

        Ok(Self {
            bind_addr,
            provider,
            openai_base_url: non_empty_var("OPENAI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| "https://api.openai.com/v1".into()),
            openai_api_key,
            openai_model: non_empty_var("ASSIST_MODEL").unwrap_or_else(|| "gpt-4o-mini".into()),
            catalog_base_url: non_empty_var("STUDIO_API_URL")
                .map(|url| url.trim_end_matches('/').to_string()),
            catalog_api_key: non_empty_var("STUDIO_API_KEY"),
            log_dir: non_empty_var("ASSIST_LOG_DIR").map(PathBuf::from),
            log_json: flag_var("ASSIST_LOG_JSON"),
        })
    }
}

fn parse_bind_addr(s: &str) -> Result<SocketAddr, AppError> {
    s.parse()
        .map_err(|_| AppError::Config(format!("invalid bind address '{}'", s)))
}

/// Read a variable, treating empty/whitespace values as unset.
fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn flag_var(name: &str) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
        .unwrap_or(false)
}
