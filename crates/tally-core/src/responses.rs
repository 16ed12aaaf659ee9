//! CLI response types returned as JSON by `tly` commands.
//!
//! These structs define the shape of JSON output for commands whose result is
//! more than a bare entity, like `tly audit answer`, `tly audit submit`,
//! `tly template check`, and `tly template preview`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::Audit;
use crate::logic_check::TemplateIssue;
use crate::scoring::AuditScore;
use crate::value::ResponseMap;

/// Response from `tly audit answer`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SaveResponsesResponse {
    pub audit: Audit,
    /// Sections that `skip_to_section` rules asked to jump to, in rule order.
    pub section_jumps: Vec<String>,
}

/// Response from `tly audit submit`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SubmitResponse {
    pub audit: Audit,
    pub score: AuditScore,
}

/// Response from `tly audit score` (dry-run scoring of a draft audit).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ScoreResponse {
    pub audit_id: String,
    pub score: AuditScore,
}

/// Response from `tly template check`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CheckResponse {
    pub template_id: String,
    pub issues: Vec<TemplateIssue>,
    /// True when no blocking issue was found.
    pub publishable: bool,
}

/// Response from `tly template preview`: a visibility dry-run against
/// hypothetical answers.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct PreviewResponse {
    /// Currently visible question ids, in presentation order.
    pub visible: Vec<String>,
    /// Question ids hidden by their rules.
    pub hidden: Vec<String>,
    /// The response map after `set_value` actions were applied.
    pub responses: ResponseMap,
    pub section_jumps: Vec<String>,
}

/// Response from `tly status`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StatusResponse {
    /// Active backend: `remote` or `memory`.
    pub mode: String,
    pub healthy: bool,
    pub signed_in_as: Option<String>,
    pub role: Option<String>,
}
