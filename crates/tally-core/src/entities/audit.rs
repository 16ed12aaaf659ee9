use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::AuditStatus;
use crate::value::ResponseMap;

/// One audit attempt: a template filled out at a store location.
///
/// Lifecycle is `pending → in_progress → completed`; responses accumulate
/// incrementally while editable and freeze at submission.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Audit {
    pub id: String,
    pub template_id: String,
    pub status: AuditStatus,
    /// User the audit is assigned to.
    pub assigned_to: Option<String>,
    pub location: AuditLocation,
    #[serde(default)]
    pub responses: ResponseMap,
    /// Final score, stamped at submission.
    pub score: Option<u32>,
    pub passed: Option<bool>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Where the audit takes place.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct AuditLocation {
    pub store_name: String,
    pub address: String,
    pub coordinates: Option<Coordinates>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}
