//! Template logic checks, run before publishing.
//!
//! Two classes of issue come back from [`check_template`]:
//!
//! - **Blocking**: rule cycles and duplicate section order indices. A
//!   template with one of these cannot be published.
//! - **Warnings**: dangling rule references. The engine skips those rules
//!   silently at runtime, so they only indicate authoring mistakes.
//!
//! The rule graph has an edge from each rule's source question to the
//! question owning the rule, and to any explicit question target. A cycle
//! means visibility can oscillate or deadlock and is rejected outright.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::Template;

/// A problem found in a template's structure or rule graph.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "issue")]
pub enum TemplateIssue {
    /// Rule dependencies form a cycle; `path` closes on the repeated node.
    RuleCycle { path: Vec<String> },
    /// Two or more sections share one `order_index`.
    DuplicateOrderIndex { order_index: u32, sections: Vec<String> },
    /// A rule condition reads a question id that is not in the template.
    DanglingRuleSource { rule_id: String, question_id: String },
    /// A rule action points at a question or section id that is not in the
    /// template.
    DanglingRuleTarget { rule_id: String, target: String },
}

impl TemplateIssue {
    /// Whether this issue prevents publishing.
    #[must_use]
    pub const fn is_blocking(&self) -> bool {
        matches!(
            self,
            Self::RuleCycle { .. } | Self::DuplicateOrderIndex { .. }
        )
    }
}

impl fmt::Display for TemplateIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RuleCycle { path } => {
                write!(f, "conditional rule cycle: {}", path.join(" -> "))
            }
            Self::DuplicateOrderIndex { order_index, sections } => {
                write!(
                    f,
                    "sections {} share order_index {order_index}",
                    sections.join(", ")
                )
            }
            Self::DanglingRuleSource { rule_id, question_id } => {
                write!(f, "rule {rule_id} reads unknown question {question_id}")
            }
            Self::DanglingRuleTarget { rule_id, target } => {
                write!(f, "rule {rule_id} targets unknown id {target}")
            }
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// Check a template's sections and rule graph.
#[must_use]
pub fn check_template(template: &Template) -> Vec<TemplateIssue> {
    let mut issues = Vec::new();

    let mut by_index: BTreeMap<u32, Vec<String>> = BTreeMap::new();
    for section in &template.sections {
        by_index
            .entry(section.order_index)
            .or_default()
            .push(section.id.clone());
    }
    for (order_index, mut sections) in by_index {
        if sections.len() > 1 {
            sections.sort();
            issues.push(TemplateIssue::DuplicateOrderIndex { order_index, sections });
        }
    }

    let question_ids: BTreeSet<&str> = template
        .sections
        .iter()
        .flat_map(|s| s.questions.iter())
        .map(|q| q.id.as_str())
        .collect();

    // Dangling references and the dependency graph in one pass. Edges only
    // connect questions that exist; dangling ends are reported instead.
    let mut adjacency: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for section in &template.sections {
        for question in &section.questions {
            for rule in &question.conditional_rules {
                let source = rule.condition.question_id.as_str();
                if question_ids.contains(source) {
                    adjacency
                        .entry(source)
                        .or_default()
                        .insert(question.id.as_str());
                } else {
                    issues.push(TemplateIssue::DanglingRuleSource {
                        rule_id: rule.id.clone(),
                        question_id: source.to_string(),
                    });
                }

                if let Some(target) = &rule.action.target_question_id {
                    if question_ids.contains(target.as_str()) {
                        if question_ids.contains(source) {
                            adjacency.entry(source).or_default().insert(target.as_str());
                        }
                    } else {
                        issues.push(TemplateIssue::DanglingRuleTarget {
                            rule_id: rule.id.clone(),
                            target: target.clone(),
                        });
                    }
                }

                if let Some(target) = &rule.action.target_section_id
                    && template.section(target).is_none()
                {
                    issues.push(TemplateIssue::DanglingRuleTarget {
                        rule_id: rule.id.clone(),
                        target: target.clone(),
                    });
                }
            }
        }
    }

    let mut color: BTreeMap<&str, Color> =
        question_ids.iter().map(|id| (*id, Color::White)).collect();
    let mut stack: Vec<&str> = Vec::new();
    let mut cycles: Vec<Vec<String>> = Vec::new();

    for id in &question_ids {
        if color.get(id) == Some(&Color::White) {
            dfs(id, &adjacency, &mut color, &mut stack, &mut cycles);
        }
    }

    for path in cycles {
        issues.push(TemplateIssue::RuleCycle { path });
    }

    issues
}

fn dfs<'a>(
    node: &'a str,
    adjacency: &BTreeMap<&'a str, BTreeSet<&'a str>>,
    color: &mut BTreeMap<&'a str, Color>,
    stack: &mut Vec<&'a str>,
    cycles: &mut Vec<Vec<String>>,
) {
    color.insert(node, Color::Gray);
    stack.push(node);

    if let Some(next) = adjacency.get(node) {
        for &neighbor in next {
            match color.get(neighbor).copied().unwrap_or(Color::White) {
                Color::White => dfs(neighbor, adjacency, color, stack, cycles),
                Color::Gray => {
                    // The neighbor is on the stack: the slice from its first
                    // occurrence closes the cycle.
                    let start = stack.iter().position(|&s| s == neighbor).unwrap_or(0);
                    let mut path: Vec<String> =
                        stack[start..].iter().map(ToString::to_string).collect();
                    path.push(neighbor.to_string());
                    cycles.push(path);
                }
                Color::Black => {}
            }
        }
    }

    stack.pop();
    color.insert(node, Color::Black);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        ConditionalRule, Question, QuestionValidation, RuleAction, RuleCondition, ScoringRules,
        Section,
    };
    use crate::enums::{ActionKind, ConditionOperator, QuestionType};
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn question(id: &str, rules: Vec<ConditionalRule>) -> Question {
        Question {
            id: id.into(),
            text: format!("Question {id}"),
            question_type: QuestionType::Text,
            options: Vec::new(),
            validation: QuestionValidation::default(),
            is_conditional: !rules.is_empty(),
            parent_question_id: None,
            conditional_rules: rules,
        }
    }

    fn show_rule(id: &str, source: &str) -> ConditionalRule {
        ConditionalRule {
            id: id.into(),
            condition: RuleCondition {
                question_id: source.into(),
                operator: ConditionOperator::Equals,
                value: "Yes".into(),
            },
            action: RuleAction {
                kind: ActionKind::ShowQuestion,
                target_question_id: None,
                target_section_id: None,
                value: None,
            },
        }
    }

    fn template(sections: Vec<Section>) -> Template {
        Template {
            id: "tpl-1".into(),
            name: "Check fixtures".into(),
            description: None,
            category: "merchandising".into(),
            version: 1,
            sections,
            scoring_rules: ScoringRules::default(),
            is_published: false,
            published_at: None,
            is_active: true,
            created_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn section(id: &str, order_index: u32, questions: Vec<Question>) -> Section {
        Section {
            id: id.into(),
            title: format!("Section {id}"),
            description: None,
            order_index,
            questions,
        }
    }

    #[test]
    fn clean_template_has_no_issues() {
        let tpl = template(vec![section(
            "s1",
            1,
            vec![
                question("q1", Vec::new()),
                question("q2", vec![show_rule("r1", "q1")]),
                question("q3", vec![show_rule("r2", "q2")]),
            ],
        )]);
        assert_eq!(check_template(&tpl), Vec::new());
    }

    #[test]
    fn two_question_cycle_is_blocking() {
        let tpl = template(vec![section(
            "s1",
            1,
            vec![
                question("q1", vec![show_rule("r1", "q2")]),
                question("q2", vec![show_rule("r2", "q1")]),
            ],
        )]);

        let issues = check_template(&tpl);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].is_blocking());
        let TemplateIssue::RuleCycle { path } = &issues[0] else {
            panic!("expected a cycle");
        };
        assert_eq!(path, &["q1", "q2", "q1"]);
    }

    #[test]
    fn self_gating_rule_is_a_cycle() {
        let tpl = template(vec![section(
            "s1",
            1,
            vec![question("q1", vec![show_rule("r1", "q1")])],
        )]);

        let issues = check_template(&tpl);
        assert_eq!(
            issues,
            vec![TemplateIssue::RuleCycle {
                path: vec!["q1".into(), "q1".into()],
            }]
        );
    }

    #[test]
    fn set_value_target_edges_participate_in_cycles() {
        let mut writer = show_rule("r1", "q2");
        writer.action = RuleAction {
            kind: ActionKind::SetValue,
            target_question_id: Some("q2".into()),
            target_section_id: None,
            value: Some("x".into()),
        };
        // q2 gates q1's rule, and that rule writes back into q2.
        let tpl = template(vec![section(
            "s1",
            1,
            vec![question("q1", vec![writer]), question("q2", Vec::new())],
        )]);

        let issues = check_template(&tpl);
        assert!(issues.iter().any(TemplateIssue::is_blocking));
    }

    #[test]
    fn duplicate_order_index_is_blocking() {
        let tpl = template(vec![
            section("s1", 1, Vec::new()),
            section("s2", 1, Vec::new()),
            section("s3", 2, Vec::new()),
        ]);

        let issues = check_template(&tpl);
        assert_eq!(
            issues,
            vec![TemplateIssue::DuplicateOrderIndex {
                order_index: 1,
                sections: vec!["s1".into(), "s2".into()],
            }]
        );
        assert!(issues[0].is_blocking());
    }

    #[test]
    fn dangling_references_warn_but_do_not_block() {
        let mut bad_target = show_rule("r2", "q1");
        bad_target.action.target_question_id = Some("q-gone".into());

        let tpl = template(vec![section(
            "s1",
            1,
            vec![
                question("q1", Vec::new()),
                question("q2", vec![show_rule("r1", "q-missing"), bad_target]),
            ],
        )]);

        let issues = check_template(&tpl);
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| !i.is_blocking()));
        assert!(issues.contains(&TemplateIssue::DanglingRuleSource {
            rule_id: "r1".into(),
            question_id: "q-missing".into(),
        }));
        assert!(issues.contains(&TemplateIssue::DanglingRuleTarget {
            rule_id: "r2".into(),
            target: "q-gone".into(),
        }));
    }

    #[test]
    fn dangling_section_target_is_flagged() {
        let mut jump = show_rule("r1", "q1");
        jump.action = RuleAction {
            kind: ActionKind::SkipToSection,
            target_question_id: None,
            target_section_id: Some("s-gone".into()),
            value: None,
        };
        let tpl = template(vec![section(
            "s1",
            1,
            vec![question("q1", Vec::new()), question("q2", vec![jump])],
        )]);

        let issues = check_template(&tpl);
        assert_eq!(
            issues,
            vec![TemplateIssue::DanglingRuleTarget {
                rule_id: "r1".into(),
                target: "s-gone".into(),
            }]
        );
    }

    #[test]
    fn chains_across_sections_are_not_cycles() {
        let tpl = template(vec![
            section("s1", 1, vec![question("q1", Vec::new())]),
            section("s2", 2, vec![question("q2", vec![show_rule("r1", "q1")])]),
            section("s3", 3, vec![question("q3", vec![show_rule("r2", "q2")])]),
        ]);
        assert!(check_template(&tpl).is_empty());
    }

    #[test]
    fn issue_display_reads_naturally() {
        let cycle = TemplateIssue::RuleCycle {
            path: vec!["q1".into(), "q2".into(), "q1".into()],
        };
        assert_eq!(cycle.to_string(), "conditional rule cycle: q1 -> q2 -> q1");

        let dup = TemplateIssue::DuplicateOrderIndex {
            order_index: 3,
            sections: vec!["s1".into(), "s4".into()],
        };
        assert_eq!(dup.to_string(), "sections s1, s4 share order_index 3");
    }
}
