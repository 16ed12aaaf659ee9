use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::Question;

/// A group of questions presented together.
///
/// `order_index` drives presentation order and must be unique within a
/// template; uniqueness is enforced at publish time.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Section {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub order_index: u32,
    pub questions: Vec<Question>,
}
