//! Workspace metadata: the tables and screens of the app being built.
//!
//! The assistant never owns this data; it fetches a snapshot per request
//! through the [`WorkspaceCatalog`] trait. Production uses [`HttpCatalog`]
//! against the builder's internal API; tests and key-less development use
//! the in-memory [`StaticCatalog`].

pub mod http;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::AppError;

pub use http::HttpCatalog;

// ============================================================================
// Metadata types
// ============================================================================

/// One column of a workspace table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMeta {
    pub name: String,
    /// Open string; `"link"` marks a relationship field.
    pub field_type: String,
    /// Target table of a `link` field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship_type: Option<String>,
}

/// A workspace table and its columns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableMeta {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub schema: Vec<FieldMeta>,
}

/// A designed screen; `route` is what the coverage check inspects.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenMeta {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
}

// ============================================================================
// WorkspaceCatalog trait
// ============================================================================

/// Read-only access to an app's metadata, keyed by app id.
#[async_trait]
pub trait WorkspaceCatalog: Send + Sync {
    async fn tables(&self, app_id: &str) -> Result<Vec<TableMeta>, AppError>;
    async fn screens(&self, app_id: &str) -> Result<Vec<ScreenMeta>, AppError>;
}

// ============================================================================
// StaticCatalog
// ============================================================================

/// In-memory catalog seeded up front. Unknown apps read as empty, which is
/// also the zero-config production fallback.
#[derive(Debug, Default)]
pub struct StaticCatalog {
    tables: HashMap<String, Vec<TableMeta>>,
    screens: HashMap<String, Vec<ScreenMeta>>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed one app's metadata (builder-style, for tests).
    pub fn with_app(
        mut self,
        app_id: &str,
        tables: Vec<TableMeta>,
        screens: Vec<ScreenMeta>,
    ) -> Self {
        self.tables.insert(app_id.to_string(), tables);
        self.screens.insert(app_id.to_string(), screens);
        self
    }
}

#[async_trait]
impl WorkspaceCatalog for StaticCatalog {
    async fn tables(&self, app_id: &str) -> Result<Vec<TableMeta>, AppError> {
        Ok(self.tables.get(app_id).cloned().unwrap_or_default())
    }

    async fn screens(&self, app_id: &str) -> Result<Vec<ScreenMeta>, AppError> {
        Ok(self.screens.get(app_id).cloned().unwrap_or_default())
    }
}

// ============================================================================
// Factory
// ============================================================================

/// Pick the catalog backend from configuration.
pub fn resolve(config: &Config) -> Arc<dyn WorkspaceCatalog> {
    match &config.catalog_base_url {
        Some(base) => {
            tracing::info!(base_url = %base, "workspace catalog: HTTP");
            Arc::new(HttpCatalog::new(
                base.clone(),
                config.catalog_api_key.clone(),
            ))
        }
        None => {
            tracing::warn!(
                "STUDIO_API_URL not set; workspace catalog is empty (no app-context recommendations)"
            );
            Arc::new(StaticCatalog::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(id: &str, name: &str) -> TableMeta {
        TableMeta {
            id: id.to_string(),
            name: name.to_string(),
            schema: vec![],
        }
    }

    #[tokio::test]
    async fn test_static_catalog_returns_seeded_app() {
        let catalog = StaticCatalog::new().with_app(
            "app_1",
            vec![table("ta_1", "users")],
            vec![ScreenMeta {
                id: "sc_1".into(),
                route: Some("/home".into()),
            }],
        );

        let tables = catalog.tables("app_1").await.unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].name, "users");
        assert_eq!(catalog.screens("app_1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_static_catalog_unknown_app_is_empty() {
        let catalog = StaticCatalog::new();
        assert!(catalog.tables("missing").await.unwrap().is_empty());
        assert!(catalog.screens("missing").await.unwrap().is_empty());
    }

    #[test]
    fn test_field_meta_wire_shape() {
        let field: FieldMeta = serde_json::from_value(serde_json::json!({
            "name": "customer",
            "fieldType": "link",
            "tableId": "ta_users",
            "relationshipType": "many-to-one"
        }))
        .unwrap();
        assert_eq!(field.field_type, "link");
        assert_eq!(field.table_id.as_deref(), Some("ta_users"));

        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["fieldType"], "link");
    }

    #[test]
    fn test_table_meta_missing_schema_defaults_empty() {
        let table: TableMeta =
            serde_json::from_value(serde_json::json!({"id": "ta_1", "name": "users"})).unwrap();
        assert!(table.schema.is_empty());
    }
}
