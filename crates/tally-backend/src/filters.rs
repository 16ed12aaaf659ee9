//! Row filters for list queries.
//!
//! `Some` fields translate to WHERE clauses in the memory backend and to
//! query-string operators in the remote one. `None` means no constraint.

use tally_core::enums::AuditStatus;

/// Filter for `fetch_templates`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateFilter {
    pub category: Option<String>,
    pub is_published: Option<bool>,
    pub created_by: Option<String>,
    /// Include soft-deleted templates. The default lists active rows only.
    pub include_inactive: bool,
    pub limit: Option<u32>,
}

/// Filter for `fetch_audits`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditFilter {
    pub status: Option<AuditStatus>,
    pub template_id: Option<String>,
    pub assigned_to: Option<String>,
    pub limit: Option<u32>,
}
