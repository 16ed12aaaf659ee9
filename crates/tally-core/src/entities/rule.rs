use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{ActionKind, ConditionOperator};
use crate::value::AnswerValue;

/// A conditional rule: when `condition` holds, perform `action`.
///
/// Rules are attached to the question they control; their condition reads a
/// different (source) question's answer.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ConditionalRule {
    pub id: String,
    pub condition: RuleCondition,
    pub action: RuleAction,
}

/// The comparison side of a rule.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct RuleCondition {
    /// Question whose answer is compared.
    pub question_id: String,
    pub operator: ConditionOperator,
    pub value: AnswerValue,
}

/// The effect side of a rule.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct RuleAction {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    pub target_question_id: Option<String>,
    pub target_section_id: Option<String>,
    /// Payload written by `set_value` actions.
    pub value: Option<AnswerValue>,
}
