//! The conditional-question engine.
//!
//! Three pure entry points drive all dynamic behavior of a running audit:
//!
//! - [`evaluate_condition`] answers "does this rule's condition hold right
//!   now" for one rule against the response map.
//! - [`visible_questions`] derives which questions are currently shown.
//! - [`process_actions`] applies rule effects (`set_value`, section jumps)
//!   after a response changes.
//!
//! The engine is total: malformed rules, dangling references, and unanswered
//! sources never error, they make the affected rule evaluate false or skip
//! its effect. Inconsistencies are logged at debug level so authors can chase
//! them without runtime noise.

use crate::entities::{ConditionalRule, Question, RuleCondition, Template};
use crate::enums::{ActionKind, ConditionOperator};
use crate::value::{AnswerValue, ResponseMap};

/// Evaluate one rule condition against the source question's current answer.
///
/// An absent or unanswered source fails every operator: a question must be
/// answered before it can gate another.
#[must_use]
pub fn evaluate_condition(condition: &RuleCondition, actual: Option<&AnswerValue>) -> bool {
    let Some(actual) = actual else { return false };
    if !actual.is_answered() {
        return false;
    }

    match condition.operator {
        ConditionOperator::Equals => *actual == condition.value,
        ConditionOperator::NotEquals => *actual != condition.value,
        ConditionOperator::LessThan => compare_numeric(actual, &condition.value, |a, b| a < b),
        ConditionOperator::LessThanOrEqual => {
            compare_numeric(actual, &condition.value, |a, b| a <= b)
        }
        ConditionOperator::GreaterThan => compare_numeric(actual, &condition.value, |a, b| a > b),
        ConditionOperator::GreaterThanOrEqual => {
            compare_numeric(actual, &condition.value, |a, b| a >= b)
        }
        ConditionOperator::Contains => contains(actual, &condition.value),
        ConditionOperator::NotContains => !contains(actual, &condition.value),
    }
}

/// Numeric comparison; either side without a numeric form fails the rule.
fn compare_numeric(
    actual: &AnswerValue,
    expected: &AnswerValue,
    cmp: impl Fn(f64, f64) -> bool,
) -> bool {
    match (actual.as_number(), expected.as_number()) {
        (Some(a), Some(b)) => cmp(a, b),
        _ => false,
    }
}

/// Containment: membership for selection lists, substring for scalars.
fn contains(actual: &AnswerValue, expected: &AnswerValue) -> bool {
    let needle = expected.as_text();
    match actual.as_selections() {
        Some(items) => items.iter().any(|item| *item == needle),
        None => actual.as_text().contains(needle.as_ref()),
    }
}

fn rule_satisfied(rule: &ConditionalRule, responses: &ResponseMap) -> bool {
    evaluate_condition(&rule.condition, responses.get(&rule.condition.question_id))
}

/// Derive the currently visible subset of `questions`, preserving order.
///
/// Non-conditional questions are always visible. A conditional question is
/// visible iff at least one of its rules evaluates true; with no rules it
/// stays hidden. Idempotent for a fixed response map.
#[must_use]
pub fn visible_questions<'a>(
    questions: &'a [Question],
    responses: &ResponseMap,
) -> Vec<&'a Question> {
    questions
        .iter()
        .filter(|q| {
            if !q.is_conditional {
                return true;
            }
            q.conditional_rules.iter().any(|r| rule_satisfied(r, responses))
        })
        .collect()
}

/// Apply rule effects after the answer to `changed_question_id` changed.
///
/// Every rule in the template whose condition reads the changed question is
/// evaluated; satisfied rules take effect:
///
/// - `set_value` writes the action payload to its target question,
/// - `skip_to_section` appends the target section id to the returned jump
///   list (navigation itself is the caller's concern),
/// - `show_question` / `hide_question` need no effect here since visibility
///   is derived by [`visible_questions`].
///
/// Rules with dangling targets or missing payloads are skipped silently.
pub fn process_actions(
    template: &Template,
    changed_question_id: &str,
    responses: &mut ResponseMap,
) -> Vec<String> {
    let mut jumps = Vec::new();

    let triggered = template
        .all_questions()
        .flat_map(|q| q.conditional_rules.iter())
        .filter(|r| r.condition.question_id == changed_question_id);

    for rule in triggered {
        if !rule_satisfied(rule, responses) {
            continue;
        }

        match rule.action.kind {
            ActionKind::ShowQuestion | ActionKind::HideQuestion => {}
            ActionKind::SetValue => match (&rule.action.target_question_id, &rule.action.value) {
                (Some(target), Some(value)) if template.question(target).is_some() => {
                    responses.insert(target.clone(), value.clone());
                }
                (Some(target), Some(_)) => {
                    tracing::debug!(rule = %rule.id, %target, "set_value target not in template, skipping");
                }
                _ => {
                    tracing::debug!(rule = %rule.id, "set_value rule without target or payload, skipping");
                }
            },
            ActionKind::SkipToSection => match &rule.action.target_section_id {
                Some(target) if template.section(target).is_some() => {
                    jumps.push(target.clone());
                }
                Some(target) => {
                    tracing::debug!(rule = %rule.id, %target, "skip_to_section target not in template, skipping");
                }
                None => {
                    tracing::debug!(rule = %rule.id, "skip_to_section rule without target, skipping");
                }
            },
        }
    }

    jumps
}
