use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::UserRole;

/// Profile row attached to an authenticated user.
///
/// Created at sign-up with role `auditor`; role changes are an administrative
/// operation on the backing store.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct UserProfile {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
