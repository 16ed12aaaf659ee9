//! Audit scoring.
//!
//! Scores measure weighted completion over the *visible* questions of an
//! audit: hidden questions cannot be answered, so they never count against
//! the score. Each question carries its section's weight (sections without a
//! configured weight count as `1.0`), which makes the unweighted case
//! degenerate to the plain answered/total ratio.
//!
//! Critical questions are a pass gate on top of the score: a visible,
//! unanswered critical question fails the audit regardless of the number.

use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::engine::visible_questions;
use crate::entities::Template;
use crate::value::{AnswerValue, ResponseMap};

/// Result of scoring one audit attempt.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AuditScore {
    /// Weighted completion percentage, 0..=100.
    pub score: u32,
    pub passed: bool,
    /// Unweighted count of answered visible questions.
    pub answered: u32,
    /// Unweighted count of visible questions.
    pub total: u32,
    /// Visible critical questions still missing an answer.
    pub critical_unanswered: Vec<String>,
}

/// Score `responses` against `template`.
///
/// An audit with no visible questions scores 100: nothing was asked, so
/// nothing is missing.
#[must_use]
pub fn score_audit(template: &Template, responses: &ResponseMap) -> AuditScore {
    let mut answered_weight = 0.0_f64;
    let mut total_weight = 0.0_f64;
    let mut answered = 0_u32;
    let mut total = 0_u32;
    let mut visible_ids: BTreeSet<&str> = BTreeSet::new();

    for section in template.sections_in_order() {
        let weight = template.scoring_rules.weight_for(&section.id);
        for question in visible_questions(&section.questions, responses) {
            visible_ids.insert(question.id.as_str());
            total += 1;
            total_weight += weight;
            if responses.get(&question.id).is_some_and(AnswerValue::is_answered) {
                answered += 1;
                answered_weight += weight;
            }
        }
    }

    let score = if total_weight > 0.0 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            (answered_weight / total_weight * 100.0).round().clamp(0.0, 100.0) as u32
        }
    } else {
        100
    };

    let critical_unanswered: Vec<String> = template
        .scoring_rules
        .critical_questions
        .iter()
        .filter(|id| visible_ids.contains(id.as_str()))
        .filter(|id| !responses.get(*id).is_some_and(AnswerValue::is_answered))
        .cloned()
        .collect();

    let passed = score >= template.scoring_rules.threshold && critical_unanswered.is_empty();

    AuditScore {
        score,
        passed,
        answered,
        total,
        critical_unanswered,
    }
}
