//! System prompts for the generation backend.

use super::types::ChatContext;

/// Build the system prompt for a non-streaming chat turn.
///
/// The builder context goes in verbatim as pretty JSON; the model sees the
/// same structure the UI sent. The recommendation count is included so the
/// model can refer the user to them without restating their content.
pub fn chat_system_prompt(context: Option<&ChatContext>, recommendation_count: usize) -> String {
    let context_json = context
        .and_then(|ctx| serde_json::to_string_pretty(ctx).ok())
        .unwrap_or_else(|| "{}".to_string());

    let mut prompt = String::new();
    prompt.push_str("You are the Studio assistant, helping users build Studio applications.\n");
    prompt.push_str(&format!("Current context: {}\n", context_json));
    prompt.push_str(&format!(
        "Available recommendations: {}\n\n",
        recommendation_count
    ));
    prompt.push_str("Provide helpful, actionable advice for building better applications.\n");
    prompt.push_str("Be concise and practical.");
    prompt
}

/// System prompt for the streaming path. Short on purpose: the streamed
/// answer carries no recommendation digest, those travel as their own event.
pub fn stream_system_prompt() -> String {
    "You are the Studio assistant, providing real-time help with app building.".to_string()
}
