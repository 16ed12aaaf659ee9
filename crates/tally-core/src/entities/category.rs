use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A template category used to group templates in listings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Icon name understood by the presentation layer.
    pub icon: String,
    /// Hex color for listing chips.
    pub color: String,
    pub sort_order: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
