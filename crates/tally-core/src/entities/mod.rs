//! Entity structs for all Tally domain objects.
//!
//! Each entity maps to a table in the backing store. All structs derive
//! `Serialize`, `Deserialize`, and `JsonSchema` for JSON roundtrip and schema
//! export, and serialize field-for-field in the stored wire shape.

mod audit;
mod category;
mod profile;
mod question;
mod rule;
mod section;
mod template;

pub use audit::{Audit, AuditLocation, Coordinates};
pub use category::Category;
pub use profile::UserProfile;
pub use question::{Question, QuestionValidation};
pub use rule::{ConditionalRule, RuleAction, RuleCondition};
pub use section::Section;
pub use template::{ScoringRules, SectionDraft, Template, TemplateDraft};
