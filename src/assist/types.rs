use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// =============================================================================
// Recommendations
// =============================================================================

/// What a recommendation proposes to add or change in the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    Component,
    Automation,
    DataSource,
    Workflow,
}

/// A structured, ranked suggestion the builder UI renders as an actionable item.
///
/// Ids are deterministic for identical input so repeated generation passes
/// produce stable sets. Confidence values come from fixed rule tables, not
/// from a scoring model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub title: String,
    pub description: String,
    pub confidence: f64,
    /// Opaque key-value payload the UI needs to apply the suggestion.
    #[serde(default)]
    pub context: serde_json::Map<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation: Option<String>,
}

// =============================================================================
// Semi-structured interactions (wizards)
// =============================================================================

/// Which step-based wizard an interaction runs.
///
/// Unrecognized wire values map to `Freeform`, an explicit default with a
/// generic three-step script and no named slots, so a typo in `userAction`
/// degrades to a harmless generic wizard instead of failing the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    TableDesigner,
    FormBuilder,
    AutomationWizard,
    UiBuilder,
    #[serde(other)]
    Freeform,
}

impl InteractionKind {
    /// Resolve the wizard kind from the request's `userAction` hint.
    /// Absent means the table designer; unknown strings mean `Freeform`.
    pub fn from_action(action: Option<&str>) -> Self {
        match action {
            None => InteractionKind::TableDesigner,
            Some("table_designer") => InteractionKind::TableDesigner,
            Some("form_builder") => InteractionKind::FormBuilder,
            Some("automation_wizard") => InteractionKind::AutomationWizard,
            Some("ui_builder") => InteractionKind::UiBuilder,
            Some(_) => InteractionKind::Freeform,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionKind::TableDesigner => "table_designer",
            InteractionKind::FormBuilder => "form_builder",
            InteractionKind::AutomationWizard => "automation_wizard",
            InteractionKind::UiBuilder => "ui_builder",
            InteractionKind::Freeform => "freeform",
        }
    }
}

/// One in-flight wizard, as returned to the caller after every turn.
///
/// `current_step` ranges over `1..=total_steps + 1`; the value
/// `total_steps + 1` marks a completed wizard and no slot is ever written
/// past it. The service keeps no copy between requests — callers round-trip
/// the `current_step`/`data` pair on the next turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: InteractionKind,
    pub current_step: u32,
    pub total_steps: u32,
    /// Slot name → the input submitted for that step.
    pub data: BTreeMap<String, String>,
    pub suggestions: Vec<Recommendation>,
}

/// The caller-owned durable part of an interaction, supplied on each turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionState {
    #[serde(default = "first_step")]
    pub current_step: u32,
    #[serde(default)]
    pub data: BTreeMap<String, String>,
}

fn first_step() -> u32 {
    1
}

impl Default for InteractionState {
    fn default() -> Self {
        Self {
            current_step: 1,
            data: BTreeMap::new(),
        }
    }
}

// =============================================================================
// Requests and responses
// =============================================================================

/// Where in the builder the user currently is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_app: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_table: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_screen: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_action: Option<String>,
}

/// How the caller wants this turn handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionType {
    Chat,
    SemiStructured,
    Recommendation,
}

impl InteractionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionType::Chat => "chat",
            InteractionType::SemiStructured => "semi_structured",
            InteractionType::Recommendation => "recommendation",
        }
    }
}

/// One assistant turn: a free-text message plus optional structural context.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ChatContext>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interaction_type: Option<InteractionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interaction_id: Option<String>,
    /// Current wizard state from the previous turn. Absent means a fresh
    /// wizard starting at step 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interaction: Option<InteractionState>,
}

impl ChatRequest {
    /// Shorthand for a plain chat turn with no context.
    pub fn message(text: impl Into<String>) -> Self {
        Self {
            message: text.into(),
            context: None,
            interaction_type: None,
            interaction_id: None,
            interaction: None,
        }
    }
}

/// The assembled response envelope for a non-streaming turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub message: String,
    pub recommendations: Vec<Recommendation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semi_structured: Option<Interaction>,
    pub next_actions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_updates: Option<serde_json::Map<String, serde_json::Value>>,
}

// =============================================================================
// Stream events
// =============================================================================

/// One framed record on the event stream.
///
/// The stream protocol is a strict total order: one `recommendations` event,
/// zero or more `content` events, then exactly one terminal `done` or
/// `error`. Nothing follows a terminal event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum StreamEvent {
    Recommendations(Vec<Recommendation>),
    Content(String),
    Done,
    Error(String),
}

impl StreamEvent {
    /// True for the events that end a stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Done | StreamEvent::Error(_))
    }
}
