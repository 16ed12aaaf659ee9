//! Submission-time validation of audit responses.
//!
//! Validation runs over *visible* questions only: a hidden question can never
//! block submission. Numeric range bounds apply to `numeric` questions; the
//! text-typed answer `"5"` coerces before the bounds are checked.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::engine::visible_questions;
use crate::entities::Template;
use crate::enums::QuestionType;
use crate::value::{AnswerValue, ResponseMap};

/// One failed validation check.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Violation {
    pub question_id: String,
    pub kind: ViolationKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ViolationKind {
    /// Mandatory question left unanswered.
    MissingAnswer,
    /// Numeric question answered with something that has no numeric form.
    NotNumeric,
    BelowMin { min: f64 },
    AboveMax { max: f64 },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ViolationKind::MissingAnswer => {
                write!(f, "{}: an answer is required", self.question_id)
            }
            ViolationKind::NotNumeric => {
                write!(f, "{}: expected a numeric answer", self.question_id)
            }
            ViolationKind::BelowMin { min } => {
                write!(f, "{}: value is below the minimum of {min}", self.question_id)
            }
            ViolationKind::AboveMax { max } => {
                write!(f, "{}: value is above the maximum of {max}", self.question_id)
            }
        }
    }
}

/// Collect every violation in section/question order. Empty means the audit
/// may be submitted.
#[must_use]
pub fn validate_responses(template: &Template, responses: &ResponseMap) -> Vec<Violation> {
    let mut violations = Vec::new();

    for section in template.sections_in_order() {
        for question in visible_questions(&section.questions, responses) {
            let answer = responses.get(&question.id);
            let answered = answer.is_some_and(AnswerValue::is_answered);

            if question.validation.mandatory && !answered {
                violations.push(Violation {
                    question_id: question.id.clone(),
                    kind: ViolationKind::MissingAnswer,
                });
                continue;
            }

            if !answered || question.question_type != QuestionType::Numeric {
                continue;
            }

            let Some(answer) = answer else { continue };
            match answer.as_number() {
                None => violations.push(Violation {
                    question_id: question.id.clone(),
                    kind: ViolationKind::NotNumeric,
                }),
                Some(n) => {
                    if let Some(min) = question.validation.min_value
                        && n < min
                    {
                        violations.push(Violation {
                            question_id: question.id.clone(),
                            kind: ViolationKind::BelowMin { min },
                        });
                        continue;
                    }
                    if let Some(max) = question.validation.max_value
                        && n > max
                    {
                        violations.push(Violation {
                            question_id: question.id.clone(),
                            kind: ViolationKind::AboveMax { max },
                        });
                    }
                }
            }
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        ConditionalRule, Question, QuestionValidation, RuleAction, RuleCondition, ScoringRules,
        Section,
    };
    use crate::enums::{ActionKind, ConditionOperator};
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn question(id: &str, question_type: QuestionType, validation: QuestionValidation) -> Question {
        Question {
            id: id.into(),
            text: format!("Question {id}"),
            question_type,
            options: Vec::new(),
            validation,
            is_conditional: false,
            parent_question_id: None,
            conditional_rules: Vec::new(),
        }
    }

    fn mandatory() -> QuestionValidation {
        QuestionValidation {
            mandatory: true,
            min_value: None,
            max_value: None,
        }
    }

    fn bounded(min: f64, max: f64) -> QuestionValidation {
        QuestionValidation {
            mandatory: false,
            min_value: Some(min),
            max_value: Some(max),
        }
    }

    fn template(questions: Vec<Question>) -> Template {
        Template {
            id: "tpl-1".into(),
            name: "Validation fixtures".into(),
            description: None,
            category: "merchandising".into(),
            version: 1,
            sections: vec![Section {
                id: "s1".into(),
                title: "Only section".into(),
                description: None,
                order_index: 1,
                questions,
            }],
            scoring_rules: ScoringRules::default(),
            is_published: true,
            published_at: Some(Utc::now()),
            is_active: true,
            created_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn one_answer(id: &str, value: AnswerValue) -> ResponseMap {
        let mut m = ResponseMap::new();
        m.insert(id.into(), value);
        m
    }

    #[test]
    fn mandatory_unanswered_is_violation() {
        let tpl = template(vec![question("q1", QuestionType::Text, mandatory())]);
        let violations = validate_responses(&tpl, &ResponseMap::new());
        assert_eq!(
            violations,
            vec![Violation {
                question_id: "q1".into(),
                kind: ViolationKind::MissingAnswer,
            }]
        );
    }

    #[test]
    fn mandatory_empty_text_is_violation() {
        let tpl = template(vec![question("q1", QuestionType::Text, mandatory())]);
        let violations = validate_responses(&tpl, &one_answer("q1", "".into()));
        assert_eq!(violations[0].kind, ViolationKind::MissingAnswer);
    }

    #[test]
    fn mandatory_answered_passes() {
        let tpl = template(vec![question("q1", QuestionType::Text, mandatory())]);
        let violations = validate_responses(&tpl, &one_answer("q1", "stocked".into()));
        assert!(violations.is_empty());
    }

    #[test]
    fn hidden_mandatory_question_never_blocks() {
        let hidden = Question {
            is_conditional: true,
            parent_question_id: Some("q1".into()),
            conditional_rules: vec![ConditionalRule {
                id: "r1".into(),
                condition: RuleCondition {
                    question_id: "q1".into(),
                    operator: ConditionOperator::Equals,
                    value: "No".into(),
                },
                action: RuleAction {
                    kind: ActionKind::ShowQuestion,
                    target_question_id: Some("q2".into()),
                    target_section_id: None,
                    value: None,
                },
            }],
            ..question("q2", QuestionType::Text, mandatory())
        };
        let tpl = template(vec![
            question("q1", QuestionType::SingleChoice, mandatory()),
            hidden,
        ]);

        let violations = validate_responses(&tpl, &one_answer("q1", "Yes".into()));
        assert!(violations.is_empty());

        let violations = validate_responses(&tpl, &one_answer("q1", "No".into()));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].question_id, "q2");
    }

    #[test]
    fn numeric_question_rejects_non_numeric_answer() {
        let tpl = template(vec![question(
            "q1",
            QuestionType::Numeric,
            QuestionValidation::default(),
        )]);
        let violations = validate_responses(&tpl, &one_answer("q1", "lots".into()));
        assert_eq!(violations[0].kind, ViolationKind::NotNumeric);
    }

    #[test]
    fn numeric_text_answer_coerces() {
        let tpl = template(vec![question("q1", QuestionType::Numeric, bounded(0.0, 10.0))]);
        let violations = validate_responses(&tpl, &one_answer("q1", "7".into()));
        assert!(violations.is_empty());
    }

    #[test]
    fn bounds_are_inclusive() {
        let tpl = template(vec![question("q1", QuestionType::Numeric, bounded(0.0, 10.0))]);
        assert!(validate_responses(&tpl, &one_answer("q1", 0.0.into())).is_empty());
        assert!(validate_responses(&tpl, &one_answer("q1", 10.0.into())).is_empty());
    }

    #[test]
    fn out_of_range_values_are_flagged() {
        let tpl = template(vec![question("q1", QuestionType::Numeric, bounded(0.0, 10.0))]);

        let low = validate_responses(&tpl, &one_answer("q1", (-1.0).into()));
        assert_eq!(low[0].kind, ViolationKind::BelowMin { min: 0.0 });

        let high = validate_responses(&tpl, &one_answer("q1", 11.0.into()));
        assert_eq!(high[0].kind, ViolationKind::AboveMax { max: 10.0 });
    }

    #[test]
    fn optional_unanswered_is_fine() {
        let tpl = template(vec![question(
            "q1",
            QuestionType::Numeric,
            QuestionValidation::default(),
        )]);
        assert!(validate_responses(&tpl, &ResponseMap::new()).is_empty());
    }

    #[test]
    fn violations_come_back_in_question_order() {
        let tpl = template(vec![
            question("q1", QuestionType::Text, mandatory()),
            question("q2", QuestionType::Numeric, bounded(0.0, 5.0)),
            question("q3", QuestionType::Text, mandatory()),
        ]);
        let violations = validate_responses(&tpl, &one_answer("q2", 9.0.into()));
        let ids: Vec<&str> = violations.iter().map(|v| v.question_id.as_str()).collect();
        assert_eq!(ids, ["q1", "q2", "q3"]);
    }

    #[test]
    fn violation_display_names_the_question() {
        let v = Violation {
            question_id: "q5".into(),
            kind: ViolationKind::BelowMin { min: 1.0 },
        };
        assert_eq!(v.to_string(), "q5: value is below the minimum of 1");
    }
}
