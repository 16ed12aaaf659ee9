//! Audit update builder.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tally_core::enums::AuditStatus;
use tally_core::value::ResponseMap;

#[derive(Debug, Clone, Default, Serialize)]
pub struct AuditUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AuditStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responses: Option<ResponseMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<Option<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passed: Option<Option<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<Option<DateTime<Utc>>>,
}

pub struct AuditUpdateBuilder(AuditUpdate);

impl Default for AuditUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AuditUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(AuditUpdate::default())
    }

    #[must_use]
    pub fn status(mut self, status: AuditStatus) -> Self {
        self.0.status = Some(status);
        self
    }

    #[must_use]
    pub fn responses(mut self, responses: ResponseMap) -> Self {
        self.0.responses = Some(responses);
        self
    }

    #[must_use]
    pub fn assigned_to(mut self, assigned_to: Option<String>) -> Self {
        self.0.assigned_to = Some(assigned_to);
        self
    }

    #[must_use]
    pub fn score(mut self, score: Option<u32>) -> Self {
        self.0.score = Some(score);
        self
    }

    #[must_use]
    pub fn passed(mut self, passed: Option<bool>) -> Self {
        self.0.passed = Some(passed);
        self
    }

    #[must_use]
    pub fn submitted_at(mut self, submitted_at: Option<DateTime<Utc>>) -> Self {
        self.0.submitted_at = Some(submitted_at);
        self
    }

    #[must_use]
    pub fn build(self) -> AuditUpdate {
        self.0
    }
}
