//! Context-aware assistant service for the Studio app builder.
//!
//! The service answers builder questions over HTTP, computes structural
//! recommendations from the current app's tables and screens, and runs
//! short step wizards for guided flows. Two operations: a request/response
//! `chat` turn and a server-sent-event `stream` turn.

pub mod assist;
pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod provider;
pub mod server;
pub mod sse;

pub use assist::types::{ChatRequest, ChatResponse, StreamEvent};
pub use assist::Assistant;
pub use client::AssistClient;
pub use config::Config;
pub use error::AppError;

/// Load configuration, wire the collaborators, and serve until shutdown.
pub async fn run() -> Result<(), AppError> {
    let config = Config::from_env()?;
    let _log_guard = logging::init(&config);

    tracing::info!("Starting studio-assist v{}", env!("CARGO_PKG_VERSION"));

    let generator = provider::resolve(&config);
    let catalog = catalog::resolve(&config);
    let assistant = Assistant::new(catalog, generator);

    server::serve(&config, assistant).await
}
