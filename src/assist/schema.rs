//! Schema introspection over workspace metadata.
//!
//! Two read-only passes feed the recommendation rules: which tables still
//! lack a create screen, and which table pairs are linked.

use serde::Serialize;

use crate::catalog::{ScreenMeta, TableMeta};

/// A relationship between two tables, derived from a `link`-typed field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationEdge {
    pub from: String,
    pub to: String,
    pub relationship_type: String,
}

/// Tables with no screen whose route contains `create-<tableName>`.
///
/// Order follows the input table order. Screens without a route cover
/// nothing.
pub fn uncovered_tables<'a>(
    tables: &'a [TableMeta],
    screens: &[ScreenMeta],
) -> Vec<&'a TableMeta> {
    tables
        .iter()
        .filter(|table| {
            let marker = format!("create-{}", table.name);
            !screens.iter().any(|screen| {
                screen
                    .route
                    .as_deref()
                    .is_some_and(|route| route.contains(&marker))
            })
        })
        .collect()
}

/// One edge per `link` field, in table order then field order.
///
/// `from` falls back to the table id when the name is empty; `to` falls
/// back to `"unknown"` when the link has no target; the relationship kind
/// defaults to `"one-to-many"`. Bidirectional links stay as two edges.
pub fn table_relations(tables: &[TableMeta]) -> Vec<RelationEdge> {
    let mut edges = Vec::new();
    for table in tables {
        for field in table.schema.iter().filter(|f| f.field_type == "link") {
            let from = if table.name.is_empty() {
                table.id.clone()
            } else {
                table.name.clone()
            };
            let to = field
                .table_id
                .as_deref()
                .filter(|id| !id.is_empty())
                .unwrap_or("unknown")
                .to_string();
            let relationship_type = field
                .relationship_type
                .as_deref()
                .filter(|r| !r.is_empty())
                .unwrap_or("one-to-many")
                .to_string();
            edges.push(RelationEdge {
                from,
                to,
                relationship_type,
            });
        }
    }
    edges
}
