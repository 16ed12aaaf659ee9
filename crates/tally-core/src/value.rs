//! Answer values and the per-audit response map.
//!
//! Answers are stored as a closed sum type rather than free-form JSON so the
//! engine can reason about them without re-parsing. Serialization is untagged:
//! JSON numbers, strings, string arrays, and `{"file": ...}` objects map onto
//! the variants directly, which keeps stored response maps readable.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use crate::enums::QuestionType;
use crate::errors::CoreError;

/// Responses of one audit attempt, keyed by question id.
///
/// Entries are only ever overwritten during an attempt, never removed.
pub type ResponseMap = BTreeMap<String, AnswerValue>;

/// A single recorded answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum AnswerValue {
    /// Numeric input (`numeric` questions, counts, prices).
    Number(f64),
    /// Free text, a chosen option, a date string, or a scanned barcode.
    Text(String),
    /// Chosen options of a `multiple_choice` question.
    Selections(Vec<String>),
    /// Reference to an uploaded file, stored as an opaque URI.
    FileRef { file: String },
}

impl AnswerValue {
    /// Whether this value counts as an answer.
    ///
    /// An empty text is the unanswered marker; every other value, including
    /// an empty selection list, counts as answered.
    #[must_use]
    pub fn is_answered(&self) -> bool {
        match self {
            Self::Text(s) => !s.is_empty(),
            Self::Number(_) | Self::Selections(_) | Self::FileRef { .. } => true,
        }
    }

    /// Numeric view of this value, if one exists.
    ///
    /// Text parses after trimming; selections and file references have no
    /// numeric form.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Selections(_) | Self::FileRef { .. } => None,
        }
    }

    /// Text rendering used for substring checks and display.
    ///
    /// Integral numbers render without a fractional part (`5`, not `5.0`);
    /// selections join with `", "`.
    #[must_use]
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(s) => Cow::Borrowed(s),
            Self::Number(n) => Cow::Owned(n.to_string()),
            Self::Selections(items) => Cow::Owned(items.join(", ")),
            Self::FileRef { file } => Cow::Borrowed(file),
        }
    }

    /// The selection list, when this value is one.
    #[must_use]
    pub fn as_selections(&self) -> Option<&[String]> {
        match self {
            Self::Selections(items) => Some(items),
            _ => None,
        }
    }

    /// Parse raw user input into the value shape of `question_type`.
    ///
    /// Numeric questions require a parseable number; multiple-choice input is
    /// comma-split; file uploads become opaque file references; every other
    /// type stores the text as-is.
    pub fn parse_for(question_type: QuestionType, raw: &str) -> Result<Self, CoreError> {
        match question_type {
            QuestionType::Numeric => raw
                .trim()
                .parse()
                .map(Self::Number)
                .map_err(|_| CoreError::Validation(format!("not a numeric answer: {raw:?}"))),
            QuestionType::MultipleChoice => Ok(Self::Selections(
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect(),
            )),
            QuestionType::FileUpload => Ok(Self::FileRef {
                file: raw.to_owned(),
            }),
            QuestionType::Text
            | QuestionType::SingleChoice
            | QuestionType::Dropdown
            | QuestionType::Date
            | QuestionType::Barcode => Ok(Self::Text(raw.to_owned())),
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<f64> for AnswerValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for AnswerValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for AnswerValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Vec<String>> for AnswerValue {
    fn from(items: Vec<String>) -> Self {
        Self::Selections(items)
    }
}
