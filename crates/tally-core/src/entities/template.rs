use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Question, Section};

/// An audit template: versioned, publishable blueprint of sections and
/// questions.
///
/// Published templates are immutable; editing continues on a new version
/// created from the published one. Deactivation (`is_active = false`) is the
/// only destructive operation and is a soft delete.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub version: u32,
    pub sections: Vec<Section>,
    #[serde(default)]
    pub scoring_rules: ScoringRules,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Template {
    /// Sections sorted by `order_index`.
    #[must_use]
    pub fn sections_in_order(&self) -> Vec<&Section> {
        let mut sections: Vec<&Section> = self.sections.iter().collect();
        sections.sort_by_key(|s| s.order_index);
        sections
    }

    /// All questions in presentation order.
    pub fn all_questions(&self) -> impl Iterator<Item = &Question> {
        self.sections_in_order()
            .into_iter()
            .flat_map(|s| s.questions.iter())
    }

    /// Look up a question anywhere in the template.
    #[must_use]
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.sections
            .iter()
            .flat_map(|s| s.questions.iter())
            .find(|q| q.id == id)
    }

    /// Look up a section by id.
    #[must_use]
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }
}

/// How a template's audits are scored.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ScoringRules {
    /// Per-section weight applied to each of the section's questions.
    /// Sections without an entry weigh `1.0`.
    #[serde(default)]
    pub weights: BTreeMap<String, f64>,
    /// Minimum score for a passing audit, 0..=100.
    #[serde(default = "default_threshold")]
    pub threshold: u32,
    /// Questions that must be answered for the audit to pass at all.
    #[serde(default)]
    pub critical_questions: Vec<String>,
}

impl ScoringRules {
    /// Weight of one question in the given section.
    #[must_use]
    pub fn weight_for(&self, section_id: &str) -> f64 {
        self.weights.get(section_id).copied().unwrap_or(1.0)
    }
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            weights: BTreeMap::new(),
            threshold: default_threshold(),
            critical_questions: Vec::new(),
        }
    }
}

const fn default_threshold() -> u32 {
    80
}

/// Author-supplied template shape, as read from a `create --file` payload.
///
/// Question and section ids are authored (rules reference them); everything
/// the server mints (template id, version, publish state, timestamps) is
/// absent here and filled in on create.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct TemplateDraft {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    #[serde(default)]
    pub sections: Vec<SectionDraft>,
    pub scoring_rules: Option<ScoringRules>,
}

/// Section inside a [`TemplateDraft`]; `order_index` defaults to the
/// section's position when unset.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SectionDraft {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub order_index: Option<u32>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::QuestionType;

    fn question(id: &str) -> Question {
        Question {
            id: id.into(),
            text: format!("Question {id}"),
            question_type: QuestionType::Text,
            options: Vec::new(),
            validation: crate::entities::QuestionValidation::default(),
            is_conditional: false,
            parent_question_id: None,
            conditional_rules: Vec::new(),
        }
    }

    fn template_with_shuffled_sections() -> Template {
        Template {
            id: "tpl-1".into(),
            name: "Store audit".into(),
            description: None,
            category: "merchandising".into(),
            version: 1,
            sections: vec![
                Section {
                    id: "s2".into(),
                    title: "Second".into(),
                    description: None,
                    order_index: 2,
                    questions: vec![question("q3")],
                },
                Section {
                    id: "s1".into(),
                    title: "First".into(),
                    description: None,
                    order_index: 1,
                    questions: vec![question("q1"), question("q2")],
                },
            ],
            scoring_rules: ScoringRules::default(),
            is_published: false,
            published_at: None,
            is_active: true,
            created_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn sections_sort_by_order_index() {
        let tpl = template_with_shuffled_sections();
        let ordered: Vec<&str> = tpl.sections_in_order().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ordered, ["s1", "s2"]);
    }

    #[test]
    fn all_questions_follow_section_order() {
        let tpl = template_with_shuffled_sections();
        let ids: Vec<&str> = tpl.all_questions().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, ["q1", "q2", "q3"]);
    }

    #[test]
    fn question_lookup_spans_sections() {
        let tpl = template_with_shuffled_sections();
        assert!(tpl.question("q3").is_some());
        assert!(tpl.question("missing").is_none());
        assert!(tpl.section("s2").is_some());
        assert!(tpl.section("missing").is_none());
    }

    #[test]
    fn unlisted_section_weighs_one() {
        let mut rules = ScoringRules::default();
        rules.weights.insert("s1".into(), 2.5);
        assert_eq!(rules.weight_for("s1"), 2.5);
        assert_eq!(rules.weight_for("s2"), 1.0);
    }

    #[test]
    fn scoring_rules_default_threshold() {
        assert_eq!(ScoringRules::default().threshold, 80);
    }
}
