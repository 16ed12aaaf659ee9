//! Demo data loaded into every fresh [`MemoryBackend`].
//!
//! Six template categories, two demo accounts (`demo@tally.dev` and
//! `supervisor@tally.dev`, password `demo`), one published retail execution
//! template that exercises every conditional-rule shape, and one pending
//! audit assigned to the demo auditor.

use chrono::{DateTime, Utc};
use tally_core::entities::{
    Audit, AuditLocation, Category, ConditionalRule, Coordinates, Question, QuestionValidation,
    RuleAction, RuleCondition, ScoringRules, Section, Template, UserProfile,
};
use tally_core::enums::{ActionKind, AuditStatus, ConditionOperator, QuestionType, UserRole};
use tally_core::value::{AnswerValue, ResponseMap};

use crate::backend::Backend;
use crate::error::BackendError;
use crate::memory::MemoryBackend;

impl MemoryBackend {
    pub(crate) async fn seed(&self) -> Result<(), BackendError> {
        let now = Utc::now();

        for category in demo_categories(now) {
            self.insert_category(&category).await?;
        }

        let auditor_id = self.insert_auth_user("demo@tally.dev", "demo").await?;
        self.insert_profile(&demo_profile(&auditor_id, "Demo Auditor", UserRole::Auditor, now))
            .await?;

        let supervisor_id = self
            .insert_auth_user("supervisor@tally.dev", "demo")
            .await?;
        self.insert_profile(&demo_profile(
            &supervisor_id,
            "Demo Supervisor",
            UserRole::Supervisor,
            now,
        ))
        .await?;

        let categories = self.fetch_categories().await?;
        let merchandising = categories
            .first()
            .map_or("merchandising", |c| c.id.as_str());

        let template = self
            .insert_template(&demo_template(merchandising, &supervisor_id, now))
            .await?;

        self.insert_audit(&Audit {
            id: String::new(),
            template_id: template.id,
            status: AuditStatus::Pending,
            assigned_to: Some(auditor_id),
            location: AuditLocation {
                store_name: "FreshMart Downtown".into(),
                address: "42 Market Street".into(),
                coordinates: Some(Coordinates {
                    latitude: 40.7128,
                    longitude: -74.0060,
                }),
            },
            responses: ResponseMap::new(),
            score: None,
            passed: None,
            submitted_at: None,
            created_at: now,
            updated_at: now,
        })
        .await?;

        Ok(())
    }
}

fn demo_profile(user_id: &str, name: &str, role: UserRole, now: DateTime<Utc>) -> UserProfile {
    UserProfile {
        id: String::new(),
        user_id: user_id.to_string(),
        name: name.to_string(),
        role,
        created_at: now,
        updated_at: now,
    }
}

fn demo_categories(now: DateTime<Utc>) -> Vec<Category> {
    let rows = [
        (
            "Merchandising",
            "Product placement and visibility audits",
            "package",
            "#3B82F6",
        ),
        (
            "Stock Management",
            "Inventory and stock level checks",
            "archive",
            "#10B981",
        ),
        (
            "Quality Control",
            "Product quality and compliance checks",
            "shield-check",
            "#F59E0B",
        ),
        (
            "Competitor Analysis",
            "Competitive landscape assessment",
            "users",
            "#8B5CF6",
        ),
        (
            "Pricing Compliance",
            "Price verification and compliance",
            "dollar-sign",
            "#EF4444",
        ),
        (
            "Brand Visibility",
            "Brand presence and POSM audits",
            "eye",
            "#06B6D4",
        ),
    ];
    rows.iter()
        .enumerate()
        .map(|(position, (name, description, icon, color))| Category {
            id: String::new(),
            name: (*name).to_string(),
            description: Some((*description).to_string()),
            icon: (*icon).to_string(),
            color: (*color).to_string(),
            sort_order: u32::try_from(position).unwrap_or_default() + 1,
            is_active: true,
            created_at: now,
        })
        .collect()
}

// --- question builders ---

fn question(id: &str, text: &str, question_type: QuestionType) -> Question {
    Question {
        id: id.into(),
        text: text.into(),
        question_type,
        options: Vec::new(),
        validation: QuestionValidation {
            mandatory: true,
            min_value: None,
            max_value: None,
        },
        is_conditional: false,
        parent_question_id: None,
        conditional_rules: Vec::new(),
    }
}

fn choice(id: &str, text: &str, options: &[&str]) -> Question {
    Question {
        options: options.iter().map(|s| (*s).to_string()).collect(),
        ..question(id, text, QuestionType::SingleChoice)
    }
}

fn multi_choice(id: &str, text: &str, options: &[&str]) -> Question {
    Question {
        options: options.iter().map(|s| (*s).to_string()).collect(),
        ..question(id, text, QuestionType::MultipleChoice)
    }
}

fn numeric(id: &str, text: &str, min: f64) -> Question {
    Question {
        validation: QuestionValidation {
            mandatory: true,
            min_value: Some(min),
            max_value: None,
        },
        ..question(id, text, QuestionType::Numeric)
    }
}

fn optional(mut q: Question) -> Question {
    q.validation.mandatory = false;
    q
}

/// Reveal the question carrying this rule when `source`'s answer matches.
fn show_when(
    rule_id: &str,
    source: &str,
    operator: ConditionOperator,
    value: AnswerValue,
    target: &str,
) -> ConditionalRule {
    ConditionalRule {
        id: rule_id.into(),
        condition: RuleCondition {
            question_id: source.into(),
            operator,
            value,
        },
        action: RuleAction {
            kind: ActionKind::ShowQuestion,
            target_question_id: Some(target.into()),
            target_section_id: None,
            value: None,
        },
    }
}

fn followup(mut q: Question, parent: &str, rule: ConditionalRule) -> Question {
    q.is_conditional = true;
    q.parent_question_id = Some(parent.into());
    q.conditional_rules = vec![rule];
    q
}

/// The "Sample Retail Audit" demo template: 15 questions across three
/// sections, six of them conditional.
pub(crate) fn demo_template(category: &str, created_by: &str, now: DateTime<Utc>) -> Template {
    let availability = Section {
        id: "availability".into(),
        title: "Product Availability".into(),
        description: Some("Check product availability and stock levels".into()),
        order_index: 1,
        questions: vec![
            choice("q1", "Is our product available on the shelf?", &["Yes", "No"]),
            followup(
                choice(
                    "q1_followup",
                    "Why is the product unavailable?",
                    &["No stock", "Not ordered", "Delisted", "Other"],
                ),
                "q1",
                show_when(
                    "show_unavailable_reason",
                    "q1",
                    ConditionOperator::Equals,
                    AnswerValue::from("No"),
                    "q1_followup",
                ),
            ),
            numeric("q2", "Estimate the stock quantity on display", 0.0),
            followup(
                choice(
                    "q2_followup",
                    "Did you inform store staff to replenish?",
                    &["Yes", "No", "Staff not available"],
                ),
                "q2",
                show_when(
                    "show_replenish_question",
                    "q2",
                    ConditionOperator::LessThanOrEqual,
                    AnswerValue::Number(5.0),
                    "q2_followup",
                ),
            ),
            optional(question(
                "q3",
                "Upload a photo of the product shelf",
                QuestionType::FileUpload,
            )),
        ],
    };

    let visibility = Section {
        id: "visibility".into(),
        title: "Shelf Visibility".into(),
        description: Some("Assess product placement and visibility".into()),
        order_index: 2,
        questions: vec![
            choice(
                "q4",
                "Is the product placed at eye level or in a prime location?",
                &["Eye Level", "Mid-shelf", "Bottom Shelf"],
            ),
            followup(
                choice(
                    "q4_followup",
                    "Can the product be moved to a better shelf?",
                    &["Yes", "No", "Need permission"],
                ),
                "q4",
                show_when(
                    "show_move_shelf",
                    "q4",
                    ConditionOperator::Equals,
                    AnswerValue::from("Bottom Shelf"),
                    "q4_followup",
                ),
            ),
            numeric("q5", "How many facings does our product have?", 1.0),
            choice(
                "q6",
                "Is our POSM (posters, wobblers, shelf strips) properly placed and visible?",
                &["Yes", "No", "Partially"],
            ),
        ],
    };

    let competition = Section {
        id: "competition".into(),
        title: "Competitor Analysis".into(),
        description: Some("Track competitor products and pricing".into()),
        order_index: 3,
        questions: vec![
            multi_choice(
                "q7",
                "Which competitor products are present next to ours?",
                &["Brand A", "Brand B", "Brand C", "Brand D", "None"],
            ),
            followup(
                choice(
                    "q7_followup1",
                    "Are those competitor products on promotion?",
                    &["Yes", "No", "Some of them"],
                ),
                "q7",
                show_when(
                    "show_competitor_promotion",
                    "q7",
                    ConditionOperator::NotContains,
                    AnswerValue::from("None"),
                    "q7_followup1",
                ),
            ),
            followup(
                optional(question(
                    "q7_followup2",
                    "Note competitor prices (separate multiple prices with commas)",
                    QuestionType::Text,
                )),
                "q7",
                show_when(
                    "show_competitor_prices",
                    "q7",
                    ConditionOperator::NotContains,
                    AnswerValue::from("None"),
                    "q7_followup2",
                ),
            ),
            choice(
                "q8",
                "Is the product being sold at the correct MRP?",
                &["Yes", "No - Higher", "No - Lower"],
            ),
            followup(
                numeric("q8_followup", "Enter the actual selling price displayed", 0.0),
                "q8",
                show_when(
                    "show_actual_price",
                    "q8",
                    ConditionOperator::NotEquals,
                    AnswerValue::from("Yes"),
                    "q8_followup",
                ),
            ),
            choice(
                "q9",
                "Rate the overall cleanliness of the outlet",
                &[
                    "1 - Poor",
                    "2 - Fair",
                    "3 - Good",
                    "4 - Very Good",
                    "5 - Excellent",
                ],
            ),
        ],
    };

    Template {
        id: String::new(),
        name: "Sample Retail Audit".into(),
        description: Some("A comprehensive retail execution audit template".into()),
        category: category.to_string(),
        version: 1,
        sections: vec![availability, visibility, competition],
        scoring_rules: ScoringRules::default(),
        is_published: true,
        published_at: Some(now),
        is_active: true,
        created_by: Some(created_by.to_string()),
        created_at: now,
        updated_at: now,
    }
}
