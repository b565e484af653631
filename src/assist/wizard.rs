//! Step wizards: fixed-script interactions that collect one input per turn.
//!
//! Each wizard kind declares a step count and (except freeform) a slot name
//! per step. A turn writes the user's input into the current slot and
//! advances; after the last step the wizard parks on `totalSteps + 1` and
//! ignores further input. The service holds no wizard state — callers
//! round-trip `currentStep` and `data` on every turn.

use super::recommend;
use super::types::{Interaction, InteractionKind, InteractionState};

// ============================================================================
// Step scripts
// ============================================================================

impl InteractionKind {
    /// Number of steps in this wizard's script.
    pub fn total_steps(&self) -> u32 {
        match self {
            InteractionKind::TableDesigner => 4,
            InteractionKind::FormBuilder => 4,
            InteractionKind::AutomationWizard => 4,
            InteractionKind::UiBuilder => 5,
            InteractionKind::Freeform => 3,
        }
    }

    /// Slot written at each step, in step order. Freeform wizards collect
    /// nothing; their turns only advance the counter.
    pub fn slot_names(&self) -> &'static [&'static str] {
        match self {
            InteractionKind::TableDesigner => {
                &["tableName", "fields", "relationships", "validation"]
            }
            InteractionKind::FormBuilder => &["layout", "fields", "validation", "styling"],
            InteractionKind::AutomationWizard => &["trigger", "conditions", "actions", "testing"],
            InteractionKind::UiBuilder => {
                &["screens", "layout", "components", "navigation", "theme"]
            }
            InteractionKind::Freeform => &[],
        }
    }
}

// ============================================================================
// Interaction construction and transition
// ============================================================================

impl Interaction {
    /// Build the turn's working interaction from caller-supplied state.
    ///
    /// `totalSteps` always comes from the kind; a caller-supplied
    /// `currentStep` outside `1..=totalSteps + 1` clamps into range rather
    /// than failing the request.
    pub fn from_state(
        id: impl Into<String>,
        kind: InteractionKind,
        state: InteractionState,
    ) -> Self {
        let total_steps = kind.total_steps();
        Self {
            id: id.into(),
            kind,
            current_step: state.current_step.clamp(1, total_steps + 1),
            total_steps,
            data: state.data,
            suggestions: Vec::new(),
        }
    }

    /// True once every step has been taken.
    pub fn is_complete(&self) -> bool {
        self.current_step > self.total_steps
    }
}

/// Advance a wizard by one turn.
///
/// Pure: the input interaction is untouched and the successor is returned.
/// Completed wizards come back unchanged. For the table designer, field
/// suggestions are recomputed from the collected `tableName` while steps
/// remain; no other kind carries suggestions.
pub fn apply_step(interaction: &Interaction, input: &str) -> Interaction {
    let mut next = interaction.clone();
    next.total_steps = next.kind.total_steps();
    next.current_step = next.current_step.clamp(1, next.total_steps + 1);

    if next.is_complete() {
        return next;
    }

    if let Some(slot) = next.kind.slot_names().get((next.current_step - 1) as usize) {
        next.data.insert((*slot).to_string(), input.to_string());
    }
    next.current_step += 1;

    if next.kind == InteractionKind::TableDesigner && !next.is_complete() {
        next.suggestions = match next.data.get("tableName") {
            Some(name) if !name.is_empty() => recommend::suggest_fields_for(name),
            _ => Vec::new(),
        };
    }

    next
}
