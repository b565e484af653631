//! Recommendation rules.
//!
//! Two deterministic modes: pipeline recommendations computed from an app
//! snapshot, and field suggestions for the table-designer wizard. Both run
//! off fixed rule tables; the confidence values are part of the contract,
//! not the output of a scoring model.

use serde_json::{json, Map, Value};

use crate::catalog::{ScreenMeta, TableMeta};

use super::schema::{table_relations, uncovered_tables};
use super::types::{Recommendation, RecommendationKind};

// ============================================================================
// Field templates
// ============================================================================

/// One suggested field in an entity template.
struct FieldTemplate {
    name: &'static str,
    field_type: &'static str,
    confidence: f64,
}

const fn ft(name: &'static str, field_type: &'static str, confidence: f64) -> FieldTemplate {
    FieldTemplate {
        name,
        field_type,
        confidence,
    }
}

/// Common-field templates, checked in declaration order. The first key the
/// entity name contains (case-insensitively) wins.
const FIELD_TEMPLATES: &[(&str, &[FieldTemplate])] = &[
    (
        "user",
        &[
            ft("email", "email", 0.95),
            ft("firstName", "text", 0.9),
            ft("lastName", "text", 0.9),
            ft("createdAt", "datetime", 0.8),
        ],
    ),
    (
        "product",
        &[
            ft("name", "text", 0.95),
            ft("price", "number", 0.9),
            ft("description", "longform", 0.8),
            ft("category", "options", 0.7),
        ],
    ),
    (
        "order",
        &[
            ft("orderNumber", "text", 0.95),
            ft("total", "number", 0.9),
            ft("status", "options", 0.9),
            ft("orderDate", "datetime", 0.8),
        ],
    ),
];

// ============================================================================
// Pipeline recommendations
// ============================================================================

/// Recommendations for an app snapshot: one create screen per uncovered
/// table, one sync automation per relation edge.
///
/// Ids derive from table and relation names, so identical snapshots always
/// produce identical sets.
pub fn pipeline_recommendations(
    tables: &[TableMeta],
    screens: &[ScreenMeta],
) -> Vec<Recommendation> {
    let mut recs = Vec::new();

    for table in uncovered_tables(tables, screens) {
        let fields: Vec<&str> = table.schema.iter().map(|f| f.name.as_str()).collect();
        let mut context = Map::new();
        context.insert("tableId".into(), json!(table.id));
        context.insert("tableName".into(), json!(table.name));

        recs.push(Recommendation {
            id: format!("create-{}-screen", table.name),
            kind: RecommendationKind::Component,
            title: format!("Create form for {}", table.name),
            description: format!(
                "Generate a create form screen for the {} table",
                table.name
            ),
            confidence: 0.9,
            context,
            implementation: Some(format!(
                "Screen: Create {}\nRoute: /create-{}\nComponents: Form with fields for {}",
                table.name,
                table.name,
                fields.join(", ")
            )),
        });
    }

    for edge in table_relations(tables) {
        let context = match serde_json::to_value(&edge) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };

        recs.push(Recommendation {
            id: format!("sync-{}-{}", edge.from, edge.to),
            kind: RecommendationKind::Automation,
            title: format!("Auto-sync {} with {}", edge.from, edge.to),
            description: "Create automation to keep related data synchronized".to_string(),
            confidence: 0.7,
            context,
            implementation: None,
        });
    }

    recs
}

// ============================================================================
// Field suggestions
// ============================================================================

/// Field suggestions for a named entity, from the template table.
///
/// Entities matching no template get an empty list; the wizard shows
/// nothing rather than guessing.
pub fn suggest_fields_for(entity_name: &str) -> Vec<Recommendation> {
    let needle = entity_name.to_lowercase();
    let Some((_, fields)) = FIELD_TEMPLATES.iter().find(|(key, _)| needle.contains(*key)) else {
        return Vec::new();
    };

    fields
        .iter()
        .enumerate()
        .map(|(index, field)| {
            let mut context = Map::new();
            context.insert("fieldType".into(), json!(field.field_type));
            context.insert("fieldName".into(), json!(field.name));

            Recommendation {
                id: format!("field-{}", index),
                kind: RecommendationKind::Component,
                title: format!("Add {} field", field.name),
                description: format!(
                    "{} field commonly used for {}",
                    field.field_type, entity_name
                ),
                confidence: field.confidence,
                context,
                implementation: None,
            }
        })
        .collect()
}
