use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::ConditionalRule;
use crate::enums::QuestionType;

/// A single audit question inside a section.
///
/// Conditional questions start hidden and become visible when at least one of
/// their rules evaluates true against the current responses.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Question {
    pub id: String,
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// Choices for option-backed question types; empty otherwise.
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub validation: QuestionValidation,
    #[serde(default)]
    pub is_conditional: bool,
    /// Source question this one depends on, when conditional.
    pub parent_question_id: Option<String>,
    #[serde(default)]
    pub conditional_rules: Vec<ConditionalRule>,
}

/// Validation constraints checked at submission time.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct QuestionValidation {
    #[serde(default)]
    pub mandatory: bool,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
}
