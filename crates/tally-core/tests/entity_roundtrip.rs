//! Serde roundtrip and JsonSchema validation tests for all entity types.

use chrono::Utc;
use schemars::schema_for;
use tally_core::entities::*;
use tally_core::enums::*;
use tally_core::responses::*;
use tally_core::scoring::AuditScore;
use tally_core::value::{AnswerValue, ResponseMap};

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            // Serde roundtrip
            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            // Schema validation
            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

fn sample_rule() -> ConditionalRule {
    ConditionalRule {
        id: "rule-7f2a91c3".into(),
        condition: RuleCondition {
            question_id: "q1".into(),
            operator: ConditionOperator::Equals,
            value: AnswerValue::Text("No".into()),
        },
        action: RuleAction {
            kind: ActionKind::ShowQuestion,
            target_question_id: Some("q2".into()),
            target_section_id: None,
            value: None,
        },
    }
}

fn sample_question() -> Question {
    Question {
        id: "q2".into(),
        text: "Why is the product unavailable?".into(),
        question_type: QuestionType::SingleChoice,
        options: vec!["Out of stock".into(), "Not ordered".into(), "Discontinued".into()],
        validation: QuestionValidation {
            mandatory: true,
            min_value: None,
            max_value: None,
        },
        is_conditional: true,
        parent_question_id: Some("q1".into()),
        conditional_rules: vec![sample_rule()],
    }
}

fn sample_template() -> Template {
    Template {
        id: "tpl-a3f8b2c1".into(),
        name: "Store Audit — Conditional Flow".into(),
        description: Some("Demonstrates conditional questions".into()),
        category: "merchandising".into(),
        version: 1,
        sections: vec![Section {
            id: "s1".into(),
            title: "Product Availability".into(),
            description: None,
            order_index: 1,
            questions: vec![sample_question()],
        }],
        scoring_rules: ScoringRules::default(),
        is_published: true,
        published_at: Some(Utc::now()),
        is_active: true,
        created_by: Some("usr-b7a3f9e2".into()),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn sample_audit() -> Audit {
    let mut responses = ResponseMap::new();
    responses.insert("q1".into(), AnswerValue::Text("No".into()));
    responses.insert("q5".into(), AnswerValue::Number(3.0));
    responses.insert(
        "q7".into(),
        AnswerValue::Selections(vec!["Brand A".into(), "Brand B".into()]),
    );
    responses.insert(
        "q9".into(),
        AnswerValue::FileRef {
            file: "uploads/shelf-photo.jpg".into(),
        },
    );

    Audit {
        id: "adt-c4e2d1f0".into(),
        template_id: "tpl-a3f8b2c1".into(),
        status: AuditStatus::InProgress,
        assigned_to: Some("usr-b7a3f9e2".into()),
        location: AuditLocation {
            store_name: "Galeria Centro".into(),
            address: "Av. Paulista 900, São Paulo".into(),
            coordinates: Some(Coordinates {
                latitude: -23.5614,
                longitude: -46.6559,
            }),
        },
        responses,
        score: None,
        passed: None,
        submitted_at: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

roundtrip_and_validate!(category_roundtrip, Category, Category {
    id: "cat-d2f5a8c1".into(),
    name: "Merchandising".into(),
    description: Some("Shelf placement and product presentation".into()),
    icon: "storefront".into(),
    color: "#2563eb".into(),
    sort_order: 1,
    is_active: true,
    created_at: Utc::now(),
});

roundtrip_and_validate!(profile_roundtrip, UserProfile, UserProfile {
    id: "prf-e1c4b2d3".into(),
    user_id: "usr-b7a3f9e2".into(),
    name: "Demo Auditor".into(),
    role: UserRole::Auditor,
    created_at: Utc::now(),
    updated_at: Utc::now(),
});

roundtrip_and_validate!(question_roundtrip, Question, sample_question());

roundtrip_and_validate!(rule_roundtrip, ConditionalRule, sample_rule());

roundtrip_and_validate!(set_value_rule_roundtrip, ConditionalRule, ConditionalRule {
    id: "rule-f3b7c1e4".into(),
    condition: RuleCondition {
        question_id: "q5".into(),
        operator: ConditionOperator::LessThanOrEqual,
        value: AnswerValue::Number(5.0),
    },
    action: RuleAction {
        kind: ActionKind::SetValue,
        target_question_id: Some("q6".into()),
        target_section_id: None,
        value: Some(AnswerValue::Text("Restock required".into())),
    },
});

roundtrip_and_validate!(template_roundtrip, Template, sample_template());

roundtrip_and_validate!(audit_roundtrip, Audit, sample_audit());

roundtrip_and_validate!(template_draft_roundtrip, TemplateDraft, TemplateDraft {
    name: "Quick stock check".into(),
    description: None,
    category: "stock_management".into(),
    sections: vec![SectionDraft {
        id: "s1".into(),
        title: "Stock levels".into(),
        description: None,
        order_index: None,
        questions: vec![sample_question()],
    }],
    scoring_rules: None,
});

// --- Response types ---

roundtrip_and_validate!(submit_response_roundtrip, SubmitResponse, SubmitResponse {
    audit: sample_audit(),
    score: AuditScore {
        score: 88,
        passed: true,
        answered: 7,
        total: 8,
        critical_unanswered: Vec::new(),
    },
});

roundtrip_and_validate!(
    save_responses_response_roundtrip,
    SaveResponsesResponse,
    SaveResponsesResponse {
        audit: sample_audit(),
        section_jumps: vec!["s3".into()],
    }
);

roundtrip_and_validate!(preview_response_roundtrip, PreviewResponse, PreviewResponse {
    visible: vec!["q1".into(), "q2".into()],
    hidden: vec!["q3".into()],
    responses: ResponseMap::new(),
    section_jumps: Vec::new(),
});

roundtrip_and_validate!(status_response_roundtrip, StatusResponse, StatusResponse {
    mode: "memory".into(),
    healthy: true,
    signed_in_as: Some("demo@tally.dev".into()),
    role: Some("auditor".into()),
});

// --- Wire-shape pinning ---

#[test]
fn question_type_field_serializes_as_type() {
    let json = serde_json::to_value(sample_question()).unwrap();
    assert_eq!(json["type"], "single_choice");
    assert!(json.get("question_type").is_none());
}

#[test]
fn rule_action_kind_serializes_as_type() {
    let json = serde_json::to_value(sample_rule()).unwrap();
    assert_eq!(json["action"]["type"], "show_question");
}

#[test]
fn question_defaults_apply_on_minimal_payload() {
    let minimal = serde_json::json!({
        "id": "q1",
        "text": "Is the product available?",
        "type": "single_choice",
        "parent_question_id": null
    });
    let question: Question = serde_json::from_value(minimal).unwrap();
    assert!(question.options.is_empty());
    assert!(!question.validation.mandatory);
    assert!(!question.is_conditional);
    assert!(question.conditional_rules.is_empty());
}

// --- Schema rejection tests ---

#[test]
fn schema_rejects_unknown_question_type() {
    let schema = serde_json::to_value(schema_for!(Question)).unwrap();
    let invalid = serde_json::json!({
        "id": "q1",
        "text": "Is the product available?",
        "type": "hologram",
        "parent_question_id": null
    });
    let errors = validate_against_schema(&schema, &invalid);
    assert!(!errors.is_empty(), "Should reject invalid question type");
}

#[test]
fn schema_rejects_audit_without_location() {
    let schema = serde_json::to_value(schema_for!(Audit)).unwrap();
    let invalid = serde_json::json!({
        "id": "adt-1",
        "template_id": "tpl-1",
        "status": "pending",
        "assigned_to": null,
        "score": null,
        "passed": null,
        "submitted_at": null,
        "created_at": "2026-08-01T12:00:00Z",
        "updated_at": "2026-08-01T12:00:00Z"
    });
    let errors = validate_against_schema(&schema, &invalid);
    assert!(!errors.is_empty(), "Should reject audit without 'location'");
}
