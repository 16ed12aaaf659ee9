//! Change feed types and snapshot diffing.
//!
//! Every backend publishes row changes on per-table `tokio::sync::broadcast`
//! channels. The memory backend emits on each mutation; the remote backend
//! emits whatever [`diff_snapshots`] finds between two polls.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tally_core::entities::{Audit, Category, Template, UserProfile};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// Watchable tables, named as the hosted service names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    TemplateCategories,
    AuditTemplates,
    Audits,
    UserProfiles,
}

impl Table {
    pub const ALL: [Self; 4] = [
        Self::TemplateCategories,
        Self::AuditTemplates,
        Self::Audits,
        Self::UserProfiles,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TemplateCategories => "template_categories",
            Self::AuditTemplates => "audit_templates",
            Self::Audits => "audits",
            Self::UserProfiles => "user_profiles",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Table {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|table| table.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "unknown table '{s}' (expected one of: template_categories, audit_templates, audits, user_profiles)"
                )
            })
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// What happened to a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

impl ChangeKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single row change on a table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub table: Table,
    pub kind: ChangeKind,
    /// The full row for insert/update; at least `{"id": ...}` for delete.
    pub record: serde_json::Value,
}

impl ChangeEvent {
    #[must_use]
    pub fn record_id(&self) -> Option<&str> {
        self.record.get("id").and_then(serde_json::Value::as_str)
    }
}

// ---------------------------------------------------------------------------
// Applying events to cached lists
// ---------------------------------------------------------------------------

/// Entities addressable by id in a cached list.
pub trait Identified {
    fn id(&self) -> &str;
}

impl Identified for Template {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for Audit {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for Category {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for UserProfile {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Apply a change event to a cached list in place.
///
/// Insert and update upsert by id, delete removes. Records that do not
/// decode as `T` are logged and skipped.
pub fn apply_change<T: Identified + DeserializeOwned>(items: &mut Vec<T>, event: &ChangeEvent) {
    match event.kind {
        ChangeKind::Delete => {
            if let Some(id) = event.record_id() {
                items.retain(|item| item.id() != id);
            }
        }
        ChangeKind::Insert | ChangeKind::Update => {
            match serde_json::from_value::<T>(event.record.clone()) {
                Ok(record) => {
                    if let Some(existing) = items.iter_mut().find(|item| item.id() == record.id())
                    {
                        *existing = record;
                    } else {
                        items.push(record);
                    }
                }
                Err(error) => {
                    tracing::warn!(%error, table = %event.table, "undecodable change record; skipping");
                }
            }
        }
    }
}

/// Diff two row snapshots by `id`, producing the changes that turn `old`
/// into `new`. Rows without a string `id` are ignored.
#[must_use]
pub fn diff_snapshots(
    old: &[serde_json::Value],
    new: &[serde_json::Value],
) -> Vec<(ChangeKind, serde_json::Value)> {
    let old_by_id: BTreeMap<&str, &serde_json::Value> = old
        .iter()
        .filter_map(|row| Some((row.get("id")?.as_str()?, row)))
        .collect();
    let new_ids: BTreeSet<&str> = new
        .iter()
        .filter_map(|row| row.get("id").and_then(serde_json::Value::as_str))
        .collect();

    let mut events = Vec::new();
    for row in new {
        let Some(id) = row.get("id").and_then(serde_json::Value::as_str) else {
            continue;
        };
        match old_by_id.get(id) {
            None => events.push((ChangeKind::Insert, row.clone())),
            Some(before) if **before != *row => events.push((ChangeKind::Update, row.clone())),
            Some(_) => {}
        }
    }
    for id in old_by_id.keys() {
        if !new_ids.contains(id) {
            events.push((ChangeKind::Delete, serde_json::json!({ "id": id })));
        }
    }
    events
}

// ---------------------------------------------------------------------------
// Channels
// ---------------------------------------------------------------------------

const CHANNEL_CAPACITY: usize = 64;

/// One broadcast channel per watchable table.
pub(crate) struct Channels {
    categories: broadcast::Sender<ChangeEvent>,
    templates: broadcast::Sender<ChangeEvent>,
    audits: broadcast::Sender<ChangeEvent>,
    profiles: broadcast::Sender<ChangeEvent>,
}

impl Channels {
    pub(crate) fn new() -> Self {
        Self {
            categories: broadcast::channel(CHANNEL_CAPACITY).0,
            templates: broadcast::channel(CHANNEL_CAPACITY).0,
            audits: broadcast::channel(CHANNEL_CAPACITY).0,
            profiles: broadcast::channel(CHANNEL_CAPACITY).0,
        }
    }

    pub(crate) const fn sender(&self, table: Table) -> &broadcast::Sender<ChangeEvent> {
        match table {
            Table::TemplateCategories => &self.categories,
            Table::AuditTemplates => &self.templates,
            Table::Audits => &self.audits,
            Table::UserProfiles => &self.profiles,
        }
    }

    pub(crate) fn subscribe(&self, table: Table) -> broadcast::Receiver<ChangeEvent> {
        self.sender(table).subscribe()
    }

    pub(crate) fn publish(&self, table: Table, kind: ChangeKind, record: serde_json::Value) {
        // send only errors when no receiver is subscribed
        let _ = self.sender(table).send(ChangeEvent {
            table,
            kind,
            record,
        });
    }
}
