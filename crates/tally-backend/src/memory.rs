//! In-memory backend: a seeded libSQL fake of the hosted service.
//!
//! Serves the full [`Backend`] surface from a `:memory:` database so every
//! flow (auth, catalog, audits, change feed) works offline. Selected at
//! startup when no remote credentials are configured or when demo mode is
//! forced. Schema lives in `migrations/`, demo rows in `seed.rs`.
//!
//! Uses the `libsql` crate (C `SQLite` fork, v0.9.29) — native in-memory
//! databases with a stable API.

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use tally_core::entities::{Audit, Category, Template, UserProfile};
use tally_core::enums::UserRole;
use tokio::sync::{Mutex, broadcast};

use crate::auth::{AuthSession, AuthUser};
use crate::backend::{Backend, BackendMode};
use crate::changes::{ChangeEvent, ChangeKind, Channels, Table};
use crate::error::BackendError;
use crate::filters::{AuditFilter, TemplateFilter};
use crate::helpers::{
    get_opt_string, parse_datetime, parse_enum, parse_json, parse_optional_datetime, to_json,
};
use crate::updates::audit::AuditUpdate;
use crate::updates::template::TemplateUpdate;

/// Lifetime of locally minted session tokens.
const SESSION_HOURS: i64 = 24;

// ---------------------------------------------------------------------------
// Row mapping
// ---------------------------------------------------------------------------

const CATEGORY_COLS: &str = "id, name, description, icon, color, sort_order, is_active, created_at";

fn row_to_category(row: &libsql::Row) -> Result<Category, BackendError> {
    Ok(Category {
        id: row.get::<String>(0)?,
        name: row.get::<String>(1)?,
        description: get_opt_string(row, 2)?,
        icon: row.get::<String>(3)?,
        color: row.get::<String>(4)?,
        sort_order: u32::try_from(row.get::<i64>(5)?).unwrap_or_default(),
        is_active: row.get::<i64>(6)? != 0,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

const TEMPLATE_COLS: &str = "id, name, description, category, version, sections, scoring_rules, \
                             is_published, published_at, is_active, created_by, created_at, updated_at";

fn row_to_template(row: &libsql::Row) -> Result<Template, BackendError> {
    Ok(Template {
        id: row.get::<String>(0)?,
        name: row.get::<String>(1)?,
        description: get_opt_string(row, 2)?,
        category: row.get::<String>(3)?,
        version: u32::try_from(row.get::<i64>(4)?).unwrap_or(1),
        sections: parse_json(&row.get::<String>(5)?, "sections")?,
        scoring_rules: parse_json(&row.get::<String>(6)?, "scoring_rules")?,
        is_published: row.get::<i64>(7)? != 0,
        published_at: parse_optional_datetime(get_opt_string(row, 8)?.as_deref())?,
        is_active: row.get::<i64>(9)? != 0,
        created_by: get_opt_string(row, 10)?,
        created_at: parse_datetime(&row.get::<String>(11)?)?,
        updated_at: parse_datetime(&row.get::<String>(12)?)?,
    })
}

const AUDIT_COLS: &str = "id, template_id, status, assigned_to, location, responses, score, \
                          passed, submitted_at, created_at, updated_at";

fn row_to_audit(row: &libsql::Row) -> Result<Audit, BackendError> {
    Ok(Audit {
        id: row.get::<String>(0)?,
        template_id: row.get::<String>(1)?,
        status: parse_enum(&row.get::<String>(2)?)?,
        assigned_to: get_opt_string(row, 3)?,
        location: parse_json(&row.get::<String>(4)?, "location")?,
        responses: parse_json(&row.get::<String>(5)?, "responses")?,
        score: row
            .get::<Option<i64>>(6)?
            .and_then(|n| u32::try_from(n).ok()),
        passed: row.get::<Option<i64>>(7)?.map(|n| n != 0),
        submitted_at: parse_optional_datetime(get_opt_string(row, 8)?.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(9)?)?,
        updated_at: parse_datetime(&row.get::<String>(10)?)?,
    })
}

const PROFILE_COLS: &str = "id, user_id, name, role, created_at, updated_at";

fn row_to_profile(row: &libsql::Row) -> Result<UserProfile, BackendError> {
    Ok(UserProfile {
        id: row.get::<String>(0)?,
        user_id: row.get::<String>(1)?,
        name: row.get::<String>(2)?,
        role: parse_enum(&row.get::<String>(3)?)?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
        updated_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

// ---------------------------------------------------------------------------
// Backend
// ---------------------------------------------------------------------------

/// The in-memory fake backend.
pub struct MemoryBackend {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
    session: Mutex<Option<AuthSession>>,
    channels: Channels,
}

impl MemoryBackend {
    /// Open a fresh in-memory database, run migrations, and seed the demo
    /// data set.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the database cannot be opened or the
    /// migrations or seed fail.
    pub async fn open() -> Result<Self, BackendError> {
        let db = libsql::Builder::new_local(":memory:").build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| BackendError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let backend = Self {
            db,
            conn,
            session: Mutex::new(None),
            channels: Channels::new(),
        };
        backend.run_migrations().await?;
        backend.seed().await?;
        Ok(backend)
    }

    pub(crate) const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"tmp-a3f8b2c1"`.
    ///
    /// Uses `randomblob(4)` in SQL to produce 8-char hex, then prepends the
    /// prefix.
    pub(crate) async fn generate_id(&self, prefix: &str) -> Result<String, BackendError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))"),
                (),
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| BackendError::Query("id generation returned no row".into()))?;
        Ok(row.get::<String>(0)?)
    }

    fn publish_record<T: Serialize>(&self, table: Table, kind: ChangeKind, record: &T) {
        match serde_json::to_value(record) {
            Ok(value) => self.channels.publish(table, kind, value),
            Err(error) => tracing::warn!(%error, table = %table, "failed to serialize change record"),
        }
    }

    async fn mint_session(
        &self,
        user_id: String,
        email: &str,
    ) -> Result<AuthSession, BackendError> {
        let token = self.generate_id("ses").await?;
        let session = AuthSession {
            access_token: token,
            expires_at: Utc::now() + chrono::TimeDelta::hours(SESSION_HOURS),
            user: AuthUser {
                id: user_id,
                email: email.to_string(),
            },
        };
        *self.session.lock().await = Some(session.clone());
        Ok(session)
    }

    /// Insert an `auth_users` row and return the minted user id.
    pub(crate) async fn insert_auth_user(
        &self,
        email: &str,
        password: &str,
    ) -> Result<String, BackendError> {
        let user_id = self.generate_id("usr").await?;
        self.conn
            .execute(
                "INSERT INTO auth_users (id, email, password, created_at) VALUES (?1, ?2, ?3, ?4)",
                libsql::params![
                    user_id.as_str(),
                    email,
                    password,
                    Utc::now().to_rfc3339()
                ],
            )
            .await?;
        Ok(user_id)
    }

    /// Seed-only: categories are read-only reference data for clients.
    pub(crate) async fn insert_category(&self, category: &Category) -> Result<(), BackendError> {
        let mut stored = category.clone();
        if stored.id.is_empty() {
            stored.id = self.generate_id("cat").await?;
        }
        self.conn
            .execute(
                &format!(
                    "INSERT INTO template_categories ({CATEGORY_COLS}) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"
                ),
                libsql::params![
                    stored.id.as_str(),
                    stored.name.as_str(),
                    stored
                        .description
                        .clone()
                        .map_or(libsql::Value::Null, Into::into),
                    stored.icon.as_str(),
                    stored.color.as_str(),
                    i64::from(stored.sort_order),
                    i64::from(stored.is_active),
                    stored.created_at.to_rfc3339()
                ],
            )
            .await?;
        self.publish_record(Table::TemplateCategories, ChangeKind::Insert, &stored);
        Ok(())
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    fn mode(&self) -> BackendMode {
        BackendMode::Memory
    }

    async fn health(&self) -> Result<(), BackendError> {
        let mut rows = self.conn.query("SELECT 1", ()).await?;
        rows.next().await?;
        Ok(())
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<AuthSession, BackendError> {
        let mut rows = self
            .conn
            .query("SELECT id FROM auth_users WHERE email = ?1", [email])
            .await?;
        if rows.next().await?.is_some() {
            // mimics the hosted auth service's response for this case
            return Err(BackendError::Api {
                status: 422,
                message: "User already registered".into(),
            });
        }

        let user_id = self.insert_auth_user(email, password).await?;
        let now = Utc::now();
        let profile = UserProfile {
            id: String::new(),
            user_id: user_id.clone(),
            name: name.to_string(),
            role: UserRole::Auditor,
            created_at: now,
            updated_at: now,
        };
        self.insert_profile(&profile).await?;

        self.mint_session(user_id, email).await
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, BackendError> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, password FROM auth_users WHERE email = ?1",
                [email],
            )
            .await?;
        let Some(row) = rows.next().await? else {
            return Err(BackendError::InvalidCredentials);
        };
        // Demo accounts only ever live in this throwaway database, so the
        // password column holds the value as given.
        if row.get::<String>(1)? != password {
            return Err(BackendError::InvalidCredentials);
        }
        self.mint_session(row.get::<String>(0)?, email).await
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        *self.session.lock().await = None;
        Ok(())
    }

    async fn session(&self) -> Option<AuthSession> {
        let guard = self.session.lock().await;
        guard.clone().filter(|session| !session.is_expired())
    }

    async fn restore_session(&self, session: AuthSession) -> Result<(), BackendError> {
        if session.is_expired() {
            return Err(BackendError::NotAuthenticated);
        }
        *self.session.lock().await = Some(session);
        Ok(())
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>, BackendError> {
        let mut rows = self
            .conn
            .query(
                &format!(
                    "SELECT {CATEGORY_COLS} FROM template_categories \
                     WHERE is_active = 1 ORDER BY sort_order ASC"
                ),
                (),
            )
            .await?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next().await? {
            categories.push(row_to_category(&row)?);
        }
        Ok(categories)
    }

    async fn fetch_templates(
        &self,
        filter: &TemplateFilter,
    ) -> Result<Vec<Template>, BackendError> {
        let mut conds: Vec<&str> = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        if !filter.include_inactive {
            conds.push("is_active = 1");
        }
        if let Some(category) = &filter.category {
            conds.push("category = ?");
            params.push(category.clone().into());
        }
        if let Some(is_published) = filter.is_published {
            conds.push("is_published = ?");
            params.push(i64::from(is_published).into());
        }
        if let Some(created_by) = &filter.created_by {
            conds.push("created_by = ?");
            params.push(created_by.clone().into());
        }

        let mut sql = format!("SELECT {TEMPLATE_COLS} FROM audit_templates");
        if !conds.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conds.join(" AND "));
        }
        sql.push_str(" ORDER BY created_at DESC");
        if let Some(limit) = filter.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        let mut rows = self.conn.query(&sql, params).await?;
        let mut templates = Vec::new();
        while let Some(row) = rows.next().await? {
            templates.push(row_to_template(&row)?);
        }
        Ok(templates)
    }

    async fn get_template(&self, id: &str) -> Result<Template, BackendError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT {TEMPLATE_COLS} FROM audit_templates WHERE id = ?1"),
                [id],
            )
            .await?;
        let Some(row) = rows.next().await? else {
            return Err(BackendError::NotFound {
                entity: "template",
                id: id.to_string(),
            });
        };
        row_to_template(&row)
    }

    async fn insert_template(&self, template: &Template) -> Result<Template, BackendError> {
        let mut stored = template.clone();
        if stored.id.is_empty() {
            stored.id = self.generate_id("tmp").await?;
        }
        let sections = to_json(&stored.sections, "sections")?;
        let scoring_rules = to_json(&stored.scoring_rules, "scoring_rules")?;
        self.conn
            .execute(
                &format!(
                    "INSERT INTO audit_templates ({TEMPLATE_COLS}) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"
                ),
                libsql::params![
                    stored.id.as_str(),
                    stored.name.as_str(),
                    stored
                        .description
                        .clone()
                        .map_or(libsql::Value::Null, Into::into),
                    stored.category.as_str(),
                    i64::from(stored.version),
                    sections.as_str(),
                    scoring_rules.as_str(),
                    i64::from(stored.is_published),
                    stored
                        .published_at
                        .map_or(libsql::Value::Null, |t| t.to_rfc3339().into()),
                    i64::from(stored.is_active),
                    stored
                        .created_by
                        .clone()
                        .map_or(libsql::Value::Null, Into::into),
                    stored.created_at.to_rfc3339(),
                    stored.updated_at.to_rfc3339()
                ],
            )
            .await?;
        self.publish_record(Table::AuditTemplates, ChangeKind::Insert, &stored);
        Ok(stored)
    }

    async fn update_template(
        &self,
        id: &str,
        update: &TemplateUpdate,
    ) -> Result<Template, BackendError> {
        let mut sets: Vec<String> = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1;

        if let Some(name) = &update.name {
            sets.push(format!("name = ?{idx}"));
            params.push(name.clone().into());
            idx += 1;
        }
        if let Some(description) = &update.description {
            sets.push(format!("description = ?{idx}"));
            params.push(description.clone().map_or(libsql::Value::Null, Into::into));
            idx += 1;
        }
        if let Some(category) = &update.category {
            sets.push(format!("category = ?{idx}"));
            params.push(category.clone().into());
            idx += 1;
        }
        if let Some(sections) = &update.sections {
            sets.push(format!("sections = ?{idx}"));
            params.push(to_json(sections, "sections")?.into());
            idx += 1;
        }
        if let Some(scoring_rules) = &update.scoring_rules {
            sets.push(format!("scoring_rules = ?{idx}"));
            params.push(to_json(scoring_rules, "scoring_rules")?.into());
            idx += 1;
        }
        if let Some(is_published) = update.is_published {
            sets.push(format!("is_published = ?{idx}"));
            params.push(i64::from(is_published).into());
            idx += 1;
        }
        if let Some(published_at) = &update.published_at {
            sets.push(format!("published_at = ?{idx}"));
            params.push(published_at.map_or(libsql::Value::Null, |t| t.to_rfc3339().into()));
            idx += 1;
        }
        if let Some(is_active) = update.is_active {
            sets.push(format!("is_active = ?{idx}"));
            params.push(i64::from(is_active).into());
            idx += 1;
        }

        if sets.is_empty() {
            return self.get_template(id).await;
        }

        sets.push(format!("updated_at = ?{idx}"));
        params.push(Utc::now().to_rfc3339().into());
        idx += 1;

        params.push(id.into());
        let sql = format!(
            "UPDATE audit_templates SET {} WHERE id = ?{idx}",
            sets.join(", ")
        );
        let affected = self.conn.execute(&sql, params).await?;
        if affected == 0 {
            return Err(BackendError::NotFound {
                entity: "template",
                id: id.to_string(),
            });
        }

        let stored = self.get_template(id).await?;
        self.publish_record(Table::AuditTemplates, ChangeKind::Update, &stored);
        Ok(stored)
    }

    async fn fetch_audits(&self, filter: &AuditFilter) -> Result<Vec<Audit>, BackendError> {
        let mut conds: Vec<&str> = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        if let Some(status) = filter.status {
            conds.push("status = ?");
            params.push(status.as_str().into());
        }
        if let Some(template_id) = &filter.template_id {
            conds.push("template_id = ?");
            params.push(template_id.clone().into());
        }
        if let Some(assigned_to) = &filter.assigned_to {
            conds.push("assigned_to = ?");
            params.push(assigned_to.clone().into());
        }

        let mut sql = format!("SELECT {AUDIT_COLS} FROM audits");
        if !conds.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conds.join(" AND "));
        }
        sql.push_str(" ORDER BY created_at DESC");
        if let Some(limit) = filter.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        let mut rows = self.conn.query(&sql, params).await?;
        let mut audits = Vec::new();
        while let Some(row) = rows.next().await? {
            audits.push(row_to_audit(&row)?);
        }
        Ok(audits)
    }

    async fn get_audit(&self, id: &str) -> Result<Audit, BackendError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT {AUDIT_COLS} FROM audits WHERE id = ?1"),
                [id],
            )
            .await?;
        let Some(row) = rows.next().await? else {
            return Err(BackendError::NotFound {
                entity: "audit",
                id: id.to_string(),
            });
        };
        row_to_audit(&row)
    }

    async fn insert_audit(&self, audit: &Audit) -> Result<Audit, BackendError> {
        let mut stored = audit.clone();
        if stored.id.is_empty() {
            stored.id = self.generate_id("aud").await?;
        }
        let location = to_json(&stored.location, "location")?;
        let responses = to_json(&stored.responses, "responses")?;
        self.conn
            .execute(
                &format!(
                    "INSERT INTO audits ({AUDIT_COLS}) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
                ),
                libsql::params![
                    stored.id.as_str(),
                    stored.template_id.as_str(),
                    stored.status.as_str(),
                    stored
                        .assigned_to
                        .clone()
                        .map_or(libsql::Value::Null, Into::into),
                    location.as_str(),
                    responses.as_str(),
                    stored
                        .score
                        .map_or(libsql::Value::Null, |n| i64::from(n).into()),
                    stored
                        .passed
                        .map_or(libsql::Value::Null, |b| i64::from(b).into()),
                    stored
                        .submitted_at
                        .map_or(libsql::Value::Null, |t| t.to_rfc3339().into()),
                    stored.created_at.to_rfc3339(),
                    stored.updated_at.to_rfc3339()
                ],
            )
            .await?;
        self.publish_record(Table::Audits, ChangeKind::Insert, &stored);
        Ok(stored)
    }

    async fn update_audit(
        &self,
        id: &str,
        update: &AuditUpdate,
    ) -> Result<Audit, BackendError> {
        let mut sets: Vec<String> = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1;

        if let Some(status) = update.status {
            sets.push(format!("status = ?{idx}"));
            params.push(status.as_str().into());
            idx += 1;
        }
        if let Some(responses) = &update.responses {
            sets.push(format!("responses = ?{idx}"));
            params.push(to_json(responses, "responses")?.into());
            idx += 1;
        }
        if let Some(assigned_to) = &update.assigned_to {
            sets.push(format!("assigned_to = ?{idx}"));
            params.push(assigned_to.clone().map_or(libsql::Value::Null, Into::into));
            idx += 1;
        }
        if let Some(score) = &update.score {
            sets.push(format!("score = ?{idx}"));
            params.push(score.map_or(libsql::Value::Null, |n| i64::from(n).into()));
            idx += 1;
        }
        if let Some(passed) = &update.passed {
            sets.push(format!("passed = ?{idx}"));
            params.push(passed.map_or(libsql::Value::Null, |b| i64::from(b).into()));
            idx += 1;
        }
        if let Some(submitted_at) = &update.submitted_at {
            sets.push(format!("submitted_at = ?{idx}"));
            params.push(submitted_at.map_or(libsql::Value::Null, |t| t.to_rfc3339().into()));
            idx += 1;
        }

        if sets.is_empty() {
            return self.get_audit(id).await;
        }

        sets.push(format!("updated_at = ?{idx}"));
        params.push(Utc::now().to_rfc3339().into());
        idx += 1;

        params.push(id.into());
        let sql = format!("UPDATE audits SET {} WHERE id = ?{idx}", sets.join(", "));
        let affected = self.conn.execute(&sql, params).await?;
        if affected == 0 {
            return Err(BackendError::NotFound {
                entity: "audit",
                id: id.to_string(),
            });
        }

        let stored = self.get_audit(id).await?;
        self.publish_record(Table::Audits, ChangeKind::Update, &stored);
        Ok(stored)
    }

    async fn get_profile(&self, user_id: &str) -> Result<UserProfile, BackendError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT {PROFILE_COLS} FROM user_profiles WHERE user_id = ?1"),
                [user_id],
            )
            .await?;
        let Some(row) = rows.next().await? else {
            return Err(BackendError::NotFound {
                entity: "user profile",
                id: user_id.to_string(),
            });
        };
        row_to_profile(&row)
    }

    async fn insert_profile(&self, profile: &UserProfile) -> Result<UserProfile, BackendError> {
        let mut stored = profile.clone();
        if stored.id.is_empty() {
            stored.id = self.generate_id("prf").await?;
        }
        self.conn
            .execute(
                &format!(
                    "INSERT INTO user_profiles ({PROFILE_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"
                ),
                libsql::params![
                    stored.id.as_str(),
                    stored.user_id.as_str(),
                    stored.name.as_str(),
                    stored.role.as_str(),
                    stored.created_at.to_rfc3339(),
                    stored.updated_at.to_rfc3339()
                ],
            )
            .await?;
        self.publish_record(Table::UserProfiles, ChangeKind::Insert, &stored);
        Ok(stored)
    }

    async fn subscribe(&self, table: Table) -> broadcast::Receiver<ChangeEvent> {
        self.channels.subscribe(table)
    }
}
