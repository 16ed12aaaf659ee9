//! Template update builder.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tally_core::entities::{ScoringRules, Section};

#[derive(Debug, Clone, Default, Serialize)]
pub struct TemplateUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<Section>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scoring_rules: Option<ScoringRules>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_published: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<Option<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

pub struct TemplateUpdateBuilder(TemplateUpdate);

impl Default for TemplateUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(TemplateUpdate::default())
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.0.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: Option<String>) -> Self {
        self.0.description = Some(description);
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.0.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn sections(mut self, sections: Vec<Section>) -> Self {
        self.0.sections = Some(sections);
        self
    }

    #[must_use]
    pub fn scoring_rules(mut self, scoring_rules: ScoringRules) -> Self {
        self.0.scoring_rules = Some(scoring_rules);
        self
    }

    #[must_use]
    pub fn is_published(mut self, is_published: bool) -> Self {
        self.0.is_published = Some(is_published);
        self
    }

    #[must_use]
    pub fn published_at(mut self, published_at: Option<DateTime<Utc>>) -> Self {
        self.0.published_at = Some(published_at);
        self
    }

    #[must_use]
    pub fn is_active(mut self, is_active: bool) -> Self {
        self.0.is_active = Some(is_active);
        self
    }

    #[must_use]
    pub fn build(self) -> TemplateUpdate {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untouched_fields_are_skipped_in_json() {
        let update = TemplateUpdateBuilder::new().name("Renamed").build();
        let json = serde_json::to_value(&update).unwrap();
        let map = json.as_object().unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["name"], "Renamed");
    }

    #[test]
    fn clearing_description_serializes_as_null() {
        let update = TemplateUpdateBuilder::new().description(None).build();
        let json = serde_json::to_value(&update).unwrap();
        assert!(json.as_object().unwrap()["description"].is_null());
    }

    #[test]
    fn empty_update_serializes_to_empty_object() {
        let update = TemplateUpdateBuilder::new().build();
        let json = serde_json::to_value(&update).unwrap();
        assert!(json.as_object().unwrap().is_empty());
    }
}
