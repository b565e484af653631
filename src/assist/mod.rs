//! The assistant core.
//!
//! `Assistant` wires the workspace catalog, the recommendation rules, the
//! step wizards, and the generation backend into the two operations the
//! transport exposes: a request/response chat turn and a streamed turn.

pub mod assemble;
pub mod prompt;
pub mod recommend;
pub mod schema;
pub mod stream;
pub mod types;
pub mod wizard;

use std::sync::Arc;

use chrono::Utc;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;

use crate::catalog::WorkspaceCatalog;
use crate::error::AppError;
use crate::provider::TextGenerator;

use self::types::{
    ChatRequest, ChatResponse, Interaction, InteractionKind, InteractionType, Recommendation,
    StreamEvent,
};

/// One assistant instance, shared across requests. Holds only collaborator
/// handles; every request computes from its own snapshot.
#[derive(Clone)]
pub struct Assistant {
    catalog: Arc<dyn WorkspaceCatalog>,
    generator: Arc<dyn TextGenerator>,
}

impl Assistant {
    pub fn new(catalog: Arc<dyn WorkspaceCatalog>, generator: Arc<dyn TextGenerator>) -> Self {
        Self { catalog, generator }
    }

    /// Handle one non-streaming turn.
    pub async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, AppError> {
        validate(&request)?;

        let recommendations = self.context_recommendations(&request).await?;
        let semi_structured = wizard_turn(&request);

        let system = prompt::chat_system_prompt(request.context.as_ref(), recommendations.len());
        let message = self.generator.complete(&system, &request.message).await?;

        Ok(assemble::assemble(
            message,
            recommendations,
            semi_structured,
            request.context.as_ref(),
            request.interaction_type,
            Utc::now(),
        ))
    }

    /// Handle one streaming turn, producing the full event sequence.
    ///
    /// A catalog failure yields a single-`error` stream: once the caller
    /// asked for events, failures arrive as events. A generation
    /// acquisition failure surfaces inside the multiplexed sequence, after
    /// the recommendations it cannot invalidate.
    pub async fn stream(
        &self,
        request: ChatRequest,
    ) -> Result<BoxStream<'static, StreamEvent>, AppError> {
        validate(&request)?;

        let recommendations = match self.context_recommendations(&request).await {
            Ok(recs) => recs,
            Err(e) => {
                tracing::error!(error = %e, "catalog fetch failed, aborting stream");
                return Ok(
                    futures_util::stream::iter([StreamEvent::Error(e.to_string())]).boxed(),
                );
            }
        };

        let source = self
            .generator
            .stream(&prompt::stream_system_prompt(), &request.message)
            .await;

        Ok(stream::multiplex(recommendations, source).boxed())
    }

    /// Pipeline recommendations for the request's app context.
    ///
    /// No app in context means no catalog fetch and an empty list. An app
    /// whose catalog fails is an error, never a silently-empty list.
    async fn context_recommendations(
        &self,
        request: &ChatRequest,
    ) -> Result<Vec<Recommendation>, AppError> {
        let app_id = request
            .context
            .as_ref()
            .and_then(|ctx| ctx.current_app.as_deref())
            .filter(|id| !id.is_empty());

        let Some(app_id) = app_id else {
            return Ok(Vec::new());
        };

        let tables = self.catalog.tables(app_id).await?;
        let screens = self.catalog.screens(app_id).await?;
        Ok(recommend::pipeline_recommendations(&tables, &screens))
    }
}

/// Reject turns with no message content; everything else is permissive.
fn validate(request: &ChatRequest) -> Result<(), AppError> {
    if request.message.trim().is_empty() {
        return Err(AppError::Validation("message must not be empty".into()));
    }
    Ok(())
}

/// Run the wizard turn when the request asks for one.
///
/// Requires the semi-structured interaction type and an interaction id;
/// anything else is a plain chat turn. The kind comes from the context's
/// `userAction` (empty counts as absent and selects the table designer);
/// state comes from the round-tripped `interaction` field, defaulting to a
/// fresh step-1 wizard. The returned interaction keeps the caller's id.
fn wizard_turn(request: &ChatRequest) -> Option<Interaction> {
    if request.interaction_type != Some(InteractionType::SemiStructured) {
        return None;
    }
    let id = request.interaction_id.as_deref()?;

    let kind = InteractionKind::from_action(
        request
            .context
            .as_ref()
            .and_then(|ctx| ctx.user_action.as_deref())
            .filter(|action| !action.is_empty()),
    );
    let state = request.interaction.clone().unwrap_or_default();
    let interaction = Interaction::from_state(id, kind, state);
    Some(wizard::apply_step(&interaction, &request.message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assist::types::ChatContext;
    use crate::catalog::StaticCatalog;
    use crate::provider::EchoGenerator;
    use async_trait::async_trait;

    struct FailingCatalog;

    #[async_trait]
    impl WorkspaceCatalog for FailingCatalog {
        async fn tables(&self, _app_id: &str) -> Result<Vec<crate::catalog::TableMeta>, AppError> {
            Err(AppError::Catalog("metadata store unreachable".into()))
        }

        async fn screens(
            &self,
            _app_id: &str,
        ) -> Result<Vec<crate::catalog::ScreenMeta>, AppError> {
            Err(AppError::Catalog("metadata store unreachable".into()))
        }
    }

    fn assistant() -> Assistant {
        Assistant::new(Arc::new(StaticCatalog::new()), Arc::new(EchoGenerator))
    }

    fn failing_assistant() -> Assistant {
        Assistant::new(Arc::new(FailingCatalog), Arc::new(EchoGenerator))
    }

    #[tokio::test]
    async fn test_empty_message_is_rejected() {
        let err = assistant()
            .chat(ChatRequest::message("   "))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_chat_without_app_context_has_no_recommendations() {
        let response = assistant()
            .chat(ChatRequest::message("how do I start?"))
            .await
            .unwrap();
        assert!(response.recommendations.is_empty());
        assert_eq!(response.message, "(echo) how do I start?");
        assert!(response.semi_structured.is_none());
    }

    #[tokio::test]
    async fn test_chat_surfaces_catalog_failure() {
        let mut request = ChatRequest::message("anything to improve?");
        request.context = Some(ChatContext {
            current_app: Some("app_1".into()),
            ..Default::default()
        });

        let err = failing_assistant().chat(request).await.unwrap_err();
        assert!(matches!(err, AppError::Catalog(_)));
    }

    #[tokio::test]
    async fn test_empty_app_id_skips_catalog_entirely() {
        let mut request = ChatRequest::message("hello");
        request.context = Some(ChatContext {
            current_app: Some(String::new()),
            ..Default::default()
        });

        // The failing catalog is never consulted.
        let response = failing_assistant().chat(request).await.unwrap();
        assert!(response.recommendations.is_empty());
    }

    #[tokio::test]
    async fn test_stream_catalog_failure_is_a_single_error_event() {
        let mut request = ChatRequest::message("stream me");
        request.context = Some(ChatContext {
            current_app: Some("app_1".into()),
            ..Default::default()
        });

        let events: Vec<StreamEvent> = failing_assistant()
            .stream(request)
            .await
            .unwrap()
            .collect()
            .await;

        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], StreamEvent::Error(_)));
    }

    #[test]
    fn test_wizard_turn_requires_type_and_id() {
        let mut request = ChatRequest::message("step input");
        assert!(wizard_turn(&request).is_none());

        request.interaction_type = Some(InteractionType::SemiStructured);
        assert!(wizard_turn(&request).is_none());

        request.interaction_id = Some("int_42".into());
        let interaction = wizard_turn(&request).unwrap();
        assert_eq!(interaction.id, "int_42");
        // No userAction hint: the table designer is the default script.
        assert_eq!(interaction.kind, InteractionKind::TableDesigner);
        assert_eq!(interaction.current_step, 2);
        assert_eq!(interaction.data["tableName"], "step input");
    }

    #[test]
    fn test_wizard_turn_resumes_round_tripped_state() {
        let mut request = ChatRequest::message("name, email, phone");
        request.interaction_type = Some(InteractionType::SemiStructured);
        request.interaction_id = Some("int_42".into());
        request.interaction = Some(types::InteractionState {
            current_step: 2,
            data: [("tableName".to_string(), "customers".to_string())]
                .into_iter()
                .collect(),
        });

        let interaction = wizard_turn(&request).unwrap();
        assert_eq!(interaction.current_step, 3);
        assert_eq!(interaction.data["tableName"], "customers");
        assert_eq!(interaction.data["fields"], "name, email, phone");
    }

    #[test]
    fn test_wizard_turn_empty_user_action_selects_table_designer() {
        let mut request = ChatRequest::message("input");
        request.interaction_type = Some(InteractionType::SemiStructured);
        request.interaction_id = Some("int_1".into());
        request.context = Some(ChatContext {
            user_action: Some(String::new()),
            ..Default::default()
        });

        let interaction = wizard_turn(&request).unwrap();
        assert_eq!(interaction.kind, InteractionKind::TableDesigner);
    }

    #[test]
    fn test_wizard_turn_unknown_user_action_is_freeform() {
        let mut request = ChatRequest::message("input");
        request.interaction_type = Some(InteractionType::SemiStructured);
        request.interaction_id = Some("int_1".into());
        request.context = Some(ChatContext {
            user_action: Some("dashboard_magician".into()),
            ..Default::default()
        });

        let interaction = wizard_turn(&request).unwrap();
        assert_eq!(interaction.kind, InteractionKind::Freeform);
        assert_eq!(interaction.total_steps, 3);
        assert!(interaction.data.is_empty());
    }
}
