//! Assembly of the non-streaming response envelope.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Map};

use super::types::{ChatContext, ChatResponse, Interaction, InteractionType, Recommendation};

/// True when an optional context field is actually usable; empty strings
/// count as unset.
fn is_set(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|s| !s.is_empty())
}

/// Follow-up actions for the turn, from a rule table in priority order.
///
/// At most three survive, kept in firing order; the fallback trio only
/// fires when no other rule did.
pub fn next_actions(has_recommendations: bool, context: Option<&ChatContext>) -> Vec<String> {
    let mut actions: Vec<String> = Vec::new();

    if has_recommendations {
        actions.push("Review AI recommendations".into());
        actions.push("Implement suggested improvements".into());
    }

    if let Some(ctx) = context {
        if is_set(&ctx.current_table) {
            actions.push("Add CRUD screens for this table".into());
            actions.push("Create automations for data validation".into());
        }
        if is_set(&ctx.current_screen) {
            actions.push("Optimize screen layout".into());
            actions.push("Add interactive components".into());
        }
    }

    if actions.is_empty() {
        actions.push("Create a new table".into());
        actions.push("Design a screen".into());
        actions.push("Build an automation".into());
    }

    actions.truncate(3);
    actions
}

/// Build the response envelope for a completed turn.
///
/// Pure; the caller injects the timestamp. `contextUpdates` always carries
/// `lastInteraction`; `interactionType` echoes the request and is omitted
/// when the caller sent none.
pub fn assemble(
    message: String,
    recommendations: Vec<Recommendation>,
    semi_structured: Option<Interaction>,
    context: Option<&ChatContext>,
    interaction_type: Option<InteractionType>,
    now: DateTime<Utc>,
) -> ChatResponse {
    let next_actions = next_actions(!recommendations.is_empty(), context);

    let mut context_updates = Map::new();
    context_updates.insert(
        "lastInteraction".into(),
        json!(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    if let Some(kind) = interaction_type {
        context_updates.insert("interactionType".into(), json!(kind.as_str()));
    }

    ChatResponse {
        message,
        recommendations,
        semi_structured,
        next_actions,
        context_updates: Some(context_updates),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assist::types::RecommendationKind;
    use chrono::TimeZone;

    fn context(table: Option<&str>, screen: Option<&str>) -> ChatContext {
        ChatContext {
            current_app: None,
            current_table: table.map(String::from),
            current_screen: screen.map(String::from),
            user_action: None,
        }
    }

    fn rec(id: &str) -> Recommendation {
        Recommendation {
            id: id.to_string(),
            kind: RecommendationKind::Component,
            title: "t".into(),
            description: "d".into(),
            confidence: 0.9,
            context: Map::new(),
            implementation: None,
        }
    }

    #[test]
    fn test_recommendations_fire_first() {
        let actions = next_actions(true, None);
        assert_eq!(
            actions,
            vec!["Review AI recommendations", "Implement suggested improvements"]
        );
    }

    #[test]
    fn test_current_table_without_recommendations() {
        let ctx = context(Some("users"), None);
        let actions = next_actions(false, Some(&ctx));
        assert_eq!(
            actions,
            vec![
                "Add CRUD screens for this table",
                "Create automations for data validation"
            ]
        );
    }

    #[test]
    fn test_rules_stack_and_truncate_to_three() {
        let ctx = context(Some("users"), Some("home"));
        let actions = next_actions(true, Some(&ctx));
        assert_eq!(
            actions,
            vec![
                "Review AI recommendations",
                "Implement suggested improvements",
                "Add CRUD screens for this table"
            ]
        );
    }

    #[test]
    fn test_current_screen_rule() {
        let ctx = context(None, Some("home"));
        let actions = next_actions(false, Some(&ctx));
        assert_eq!(
            actions,
            vec!["Optimize screen layout", "Add interactive components"]
        );
    }

    #[test]
    fn test_fallback_fires_only_when_nothing_else_did() {
        let actions = next_actions(false, None);
        assert_eq!(
            actions,
            vec!["Create a new table", "Design a screen", "Build an automation"]
        );

        // Any earlier rule suppresses the fallback entirely.
        let ctx = context(None, Some("home"));
        let actions = next_actions(false, Some(&ctx));
        assert!(!actions.contains(&"Create a new table".to_string()));
    }

    #[test]
    fn test_empty_string_context_counts_as_unset() {
        let ctx = context(Some(""), Some(""));
        let actions = next_actions(false, Some(&ctx));
        assert_eq!(actions[0], "Create a new table");
    }

    #[test]
    fn test_assemble_envelope() {
        let now = Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap();
        let response = assemble(
            "reply text".into(),
            vec![rec("create-users-screen")],
            None,
            None,
            Some(InteractionType::Chat),
            now,
        );

        assert_eq!(response.message, "reply text");
        assert_eq!(response.recommendations.len(), 1);
        assert!(response.semi_structured.is_none());
        assert_eq!(response.next_actions[0], "Review AI recommendations");

        let updates = response.context_updates.unwrap();
        assert_eq!(updates["lastInteraction"], "2026-03-14T09:26:53.000Z");
        assert_eq!(updates["interactionType"], "chat");
    }

    #[test]
    fn test_assemble_omits_interaction_type_when_absent() {
        let now = Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap();
        let response = assemble("reply".into(), vec![], None, None, None, now);

        let updates = response.context_updates.unwrap();
        assert!(updates.contains_key("lastInteraction"));
        assert!(!updates.contains_key("interactionType"));
    }
}
