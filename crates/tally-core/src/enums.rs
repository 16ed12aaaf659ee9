//! Question, rule, audit, and user enums for Tally.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! Status enums with state machines provide `allowed_next_states()` to enforce
//! valid transitions at the application layer.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// QuestionType
// ---------------------------------------------------------------------------

/// Input type of an audit question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Text,
    Numeric,
    SingleChoice,
    MultipleChoice,
    Dropdown,
    Date,
    FileUpload,
    Barcode,
}

impl QuestionType {
    /// Return the string representation used in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Numeric => "numeric",
            Self::SingleChoice => "single_choice",
            Self::MultipleChoice => "multiple_choice",
            Self::Dropdown => "dropdown",
            Self::Date => "date",
            Self::FileUpload => "file_upload",
            Self::Barcode => "barcode",
        }
    }

    /// Whether answers of this type come from a fixed option list.
    #[must_use]
    pub const fn has_options(self) -> bool {
        matches!(
            self,
            Self::SingleChoice | Self::MultipleChoice | Self::Dropdown
        )
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ConditionOperator
// ---------------------------------------------------------------------------

/// Comparison operator of a conditional rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOperator {
    Equals,
    NotEquals,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Contains,
    NotContains,
}

impl ConditionOperator {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::NotEquals => "not_equals",
            Self::LessThan => "less_than",
            Self::LessThanOrEqual => "less_than_or_equal",
            Self::GreaterThan => "greater_than",
            Self::GreaterThanOrEqual => "greater_than_or_equal",
            Self::Contains => "contains",
            Self::NotContains => "not_contains",
        }
    }

    /// Whether this operator compares both sides numerically.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::LessThan | Self::LessThanOrEqual | Self::GreaterThan | Self::GreaterThanOrEqual
        )
    }
}

impl fmt::Display for ConditionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ActionKind
// ---------------------------------------------------------------------------

/// What a conditional rule does when its condition holds.
///
/// `show_question` and `hide_question` are informational at the engine layer:
/// actual visibility is derived by the visibility resolver. `set_value` writes
/// into the response map; `skip_to_section` emits a navigation intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    ShowQuestion,
    HideQuestion,
    SkipToSection,
    SetValue,
}

impl ActionKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ShowQuestion => "show_question",
            Self::HideQuestion => "hide_question",
            Self::SkipToSection => "skip_to_section",
            Self::SetValue => "set_value",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AuditStatus
// ---------------------------------------------------------------------------

/// Status of an audit through its one-directional lifecycle.
///
/// ```text
/// pending → in_progress → completed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuditStatus {
    Pending,
    InProgress,
    Completed,
}

impl AuditStatus {
    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::InProgress],
            Self::InProgress => &[Self::Completed],
            Self::Completed => &[],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// Whether responses may still be recorded in this state.
    #[must_use]
    pub const fn is_editable(self) -> bool {
        matches!(self, Self::Pending | Self::InProgress)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// UserRole
// ---------------------------------------------------------------------------

/// Role attached to a user profile. New sign-ups default to `auditor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Supervisor,
    Auditor,
}

impl UserRole {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Supervisor => "supervisor",
            Self::Auditor => "auditor",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // --- Serde roundtrip tests ---

    macro_rules! test_serde_roundtrip {
        ($name:ident, $ty:ty, $variant:expr, $expected_str:expr) => {
            #[test]
            fn $name() {
                let val = $variant;
                let json = serde_json::to_string(&val).unwrap();
                assert_eq!(json, format!("\"{}\"", $expected_str));
                let recovered: $ty = serde_json::from_str(&json).unwrap();
                assert_eq!(recovered, val);
            }
        };
    }

    test_serde_roundtrip!(
        question_type_single_choice,
        QuestionType,
        QuestionType::SingleChoice,
        "single_choice"
    );
    test_serde_roundtrip!(
        question_type_file_upload,
        QuestionType,
        QuestionType::FileUpload,
        "file_upload"
    );
    test_serde_roundtrip!(
        question_type_barcode,
        QuestionType,
        QuestionType::Barcode,
        "barcode"
    );

    test_serde_roundtrip!(
        operator_equals,
        ConditionOperator,
        ConditionOperator::Equals,
        "equals"
    );
    test_serde_roundtrip!(
        operator_less_than_or_equal,
        ConditionOperator,
        ConditionOperator::LessThanOrEqual,
        "less_than_or_equal"
    );
    test_serde_roundtrip!(
        operator_not_contains,
        ConditionOperator,
        ConditionOperator::NotContains,
        "not_contains"
    );

    test_serde_roundtrip!(
        action_show_question,
        ActionKind,
        ActionKind::ShowQuestion,
        "show_question"
    );
    test_serde_roundtrip!(
        action_skip_to_section,
        ActionKind,
        ActionKind::SkipToSection,
        "skip_to_section"
    );
    test_serde_roundtrip!(action_set_value, ActionKind, ActionKind::SetValue, "set_value");

    test_serde_roundtrip!(
        audit_in_progress,
        AuditStatus,
        AuditStatus::InProgress,
        "in_progress"
    );
    test_serde_roundtrip!(
        audit_completed,
        AuditStatus,
        AuditStatus::Completed,
        "completed"
    );

    test_serde_roundtrip!(role_supervisor, UserRole, UserRole::Supervisor, "supervisor");
    test_serde_roundtrip!(role_auditor, UserRole, UserRole::Auditor, "auditor");

    // --- Transition tests ---

    #[test]
    fn audit_valid_transitions() {
        assert!(AuditStatus::Pending.can_transition_to(AuditStatus::InProgress));
        assert!(AuditStatus::InProgress.can_transition_to(AuditStatus::Completed));
    }

    #[test]
    fn audit_invalid_transitions() {
        assert!(!AuditStatus::Pending.can_transition_to(AuditStatus::Completed));
        assert!(!AuditStatus::Completed.can_transition_to(AuditStatus::InProgress));
        assert!(!AuditStatus::Completed.can_transition_to(AuditStatus::Pending));
        assert!(!AuditStatus::InProgress.can_transition_to(AuditStatus::Pending));
    }

    #[test]
    fn audit_completed_is_terminal() {
        assert!(AuditStatus::Completed.allowed_next_states().is_empty());
        assert!(!AuditStatus::Completed.is_editable());
    }

    #[test]
    fn audit_editable_states() {
        assert!(AuditStatus::Pending.is_editable());
        assert!(AuditStatus::InProgress.is_editable());
    }

    // --- Classifier tests ---

    #[test]
    fn option_backed_question_types() {
        assert!(QuestionType::SingleChoice.has_options());
        assert!(QuestionType::MultipleChoice.has_options());
        assert!(QuestionType::Dropdown.has_options());
        assert!(!QuestionType::Text.has_options());
        assert!(!QuestionType::Numeric.has_options());
        assert!(!QuestionType::Barcode.has_options());
    }

    #[test]
    fn numeric_operators() {
        assert!(ConditionOperator::LessThan.is_numeric());
        assert!(ConditionOperator::GreaterThanOrEqual.is_numeric());
        assert!(!ConditionOperator::Equals.is_numeric());
        assert!(!ConditionOperator::Contains.is_numeric());
    }

    // --- Display / as_str tests ---

    #[test]
    fn display_matches_as_str() {
        assert_eq!(format!("{}", QuestionType::MultipleChoice), "multiple_choice");
        assert_eq!(
            format!("{}", ConditionOperator::GreaterThanOrEqual),
            "greater_than_or_equal"
        );
        assert_eq!(format!("{}", ActionKind::SkipToSection), "skip_to_section");
        assert_eq!(format!("{}", AuditStatus::InProgress), "in_progress");
        assert_eq!(format!("{}", UserRole::Admin), "admin");
    }
}
