//! Remote backend over the hosted REST service.
//!
//! Speaks the PostgREST-style row API (`rest/v1/{table}`) and the GoTrue
//! auth endpoints (`auth/v1/*`). Every request carries the project `apikey`
//! header plus a bearer token: the session's access token when signed in,
//! the anon key otherwise. Change feeds are emulated by polling row
//! snapshots per table and diffing them; failed polls are logged and the
//! next tick retries, nothing is retried eagerly.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tally_config::BackendConfig;
use tally_core::entities::{Audit, Category, Template, UserProfile};
use tally_core::enums::UserRole;
use tokio::sync::{Mutex, broadcast};

use crate::auth::{AuthSession, AuthUser};
use crate::backend::{Backend, BackendMode};
use crate::changes::{ChangeEvent, Channels, Table, diff_snapshots};
use crate::error::BackendError;
use crate::filters::{AuditFilter, TemplateFilter};
use crate::http::check_response;
use crate::updates::audit::AuditUpdate;
use crate::updates::template::TemplateUpdate;

const USER_AGENT: &str = "tally/0.1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const CATEGORY_QUERY: &str = "select=*&is_active=eq.true&order=sort_order.asc";

/// The hosted-service backend.
pub struct RemoteBackend {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    poll_interval: Duration,
    session: Arc<Mutex<Option<AuthSession>>>,
    channels: Arc<Channels>,
    /// Tables with a running poll task.
    pollers: Mutex<HashSet<Table>>,
}

impl RemoteBackend {
    /// Build a client for the configured project.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Http` if the HTTP client cannot be constructed.
    pub fn connect(config: &BackendConfig) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            poll_interval: Duration::from_secs(config.sync_interval_secs),
            session: Arc::new(Mutex::new(None)),
            channels: Arc::new(Channels::new()),
            pollers: Mutex::new(HashSet::new()),
        })
    }

    fn rest_url(&self, table: Table) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.base_url)
    }

    async fn bearer(&self) -> String {
        let guard = self.session.lock().await;
        guard
            .as_ref()
            .map_or_else(|| self.anon_key.clone(), |s| s.access_token.clone())
    }

    async fn get_rows<T: DeserializeOwned>(
        &self,
        table: Table,
        query: &str,
    ) -> Result<Vec<T>, BackendError> {
        let url = format!("{}?{query}", self.rest_url(table));
        let resp = self
            .http
            .get(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer().await)
            .send()
            .await?;
        Ok(check_response(resp).await?.json().await?)
    }

    async fn get_row<T: DeserializeOwned>(
        &self,
        table: Table,
        entity: &'static str,
        id: &str,
    ) -> Result<T, BackendError> {
        let query = format!("id=eq.{}&select=*", urlencoding::encode(id));
        let mut rows: Vec<T> = self.get_rows(table, &query).await?;
        if rows.is_empty() {
            return Err(BackendError::NotFound {
                entity,
                id: id.to_string(),
            });
        }
        Ok(rows.remove(0))
    }

    async fn insert_row<T>(&self, table: Table, record: &T) -> Result<T, BackendError>
    where
        T: Serialize + DeserializeOwned,
    {
        let mut body = serde_json::to_value(record)
            .map_err(|e| BackendError::Query(format!("Failed to serialize {table} row: {e}")))?;
        // an empty id means "let the server mint one"
        if body.get("id").and_then(serde_json::Value::as_str) == Some("") {
            if let Some(map) = body.as_object_mut() {
                map.remove("id");
            }
        }

        let resp = self
            .http
            .post(self.rest_url(table))
            .header("apikey", &self.anon_key)
            .header("Prefer", "return=representation")
            .bearer_auth(self.bearer().await)
            .json(&body)
            .send()
            .await?;
        let mut rows: Vec<T> = check_response(resp).await?.json().await?;
        rows.pop().ok_or_else(|| {
            BackendError::Query(format!("insert into {table} returned no representation"))
        })
    }

    async fn update_row<T, U>(
        &self,
        table: Table,
        entity: &'static str,
        id: &str,
        update: &U,
    ) -> Result<T, BackendError>
    where
        T: DeserializeOwned,
        U: Serialize,
    {
        let mut body = serde_json::to_value(update)
            .map_err(|e| BackendError::Query(format!("Failed to serialize {table} update: {e}")))?;
        let Some(map) = body.as_object_mut() else {
            return Err(BackendError::Query(format!(
                "update body for {table} is not an object"
            )));
        };
        if map.is_empty() {
            return self.get_row(table, entity, id).await;
        }
        map.insert(
            "updated_at".to_string(),
            serde_json::Value::String(Utc::now().to_rfc3339()),
        );

        let url = format!("{}?id=eq.{}", self.rest_url(table), urlencoding::encode(id));
        let resp = self
            .http
            .patch(&url)
            .header("apikey", &self.anon_key)
            .header("Prefer", "return=representation")
            .bearer_auth(self.bearer().await)
            .json(&body)
            .send()
            .await?;
        let mut rows: Vec<T> = check_response(resp).await?.json().await?;
        rows.pop().ok_or_else(|| BackendError::NotFound {
            entity,
            id: id.to_string(),
        })
    }

    fn spawn_poller(&self, table: Table) {
        let http = self.http.clone();
        let url = format!("{}?select=*", self.rest_url(table));
        let anon_key = self.anon_key.clone();
        let session = Arc::clone(&self.session);
        let channels = Arc::clone(&self.channels);
        let interval = self.poll_interval;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            let mut snapshot: Option<Vec<serde_json::Value>> = None;
            loop {
                ticker.tick().await;
                let bearer = {
                    let guard = session.lock().await;
                    guard
                        .as_ref()
                        .map_or_else(|| anon_key.clone(), |s| s.access_token.clone())
                };
                let result = async {
                    let resp = http
                        .get(&url)
                        .header("apikey", &anon_key)
                        .bearer_auth(bearer)
                        .send()
                        .await?;
                    let rows: Vec<serde_json::Value> = check_response(resp).await?.json().await?;
                    Ok::<_, BackendError>(rows)
                }
                .await;

                match result {
                    Ok(rows) => {
                        if let Some(previous) = &snapshot {
                            for (kind, record) in diff_snapshots(previous, &rows) {
                                channels.publish(table, kind, record);
                            }
                        }
                        // first successful poll primes the snapshot silently
                        snapshot = Some(rows);
                    }
                    Err(error) => {
                        tracing::warn!(%error, table = %table, "change feed poll failed");
                    }
                }
            }
        });
    }
}

#[async_trait]
impl Backend for RemoteBackend {
    fn mode(&self) -> BackendMode {
        BackendMode::Remote
    }

    async fn health(&self) -> Result<(), BackendError> {
        let url = format!(
            "{}?select=id&limit=1",
            self.rest_url(Table::TemplateCategories)
        );
        let resp = self
            .http
            .get(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer().await)
            .send()
            .await?;
        check_response(resp).await?;
        Ok(())
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<AuthSession, BackendError> {
        let resp = self
            .http
            .post(self.auth_url("signup"))
            .header("apikey", &self.anon_key)
            .json(&json!({
                "email": email,
                "password": password,
                "data": { "name": name },
            }))
            .send()
            .await?;
        let body = check_response(resp).await?.text().await?;

        // With email confirmation enabled the service returns the bare user
        // instead of a session.
        let Ok(token) = serde_json::from_str::<TokenResponse>(&body) else {
            return Err(BackendError::Api {
                status: 200,
                message: "sign-up accepted but no session returned; confirm the email address and sign in"
                    .into(),
            });
        };
        let session = session_from_token(token);
        *self.session.lock().await = Some(session.clone());

        // profile insert is best-effort
        let now = Utc::now();
        let profile = UserProfile {
            id: String::new(),
            user_id: session.user.id.clone(),
            name: name.to_string(),
            role: UserRole::Auditor,
            created_at: now,
            updated_at: now,
        };
        if let Err(error) = self.insert_profile(&profile).await {
            tracing::warn!(%error, "profile creation failed after sign-up");
        }

        Ok(session)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, BackendError> {
        let resp = self
            .http
            .post(format!(
                "{}?grant_type=password",
                self.auth_url("token")
            ))
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        if matches!(resp.status().as_u16(), 400 | 401) {
            return Err(BackendError::InvalidCredentials);
        }
        let token: TokenResponse = check_response(resp).await?.json().await?;
        let session = session_from_token(token);
        *self.session.lock().await = Some(session.clone());
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        let Some(session) = self.session.lock().await.take() else {
            return Ok(());
        };
        // server-side revocation is best-effort; the local session is gone
        let result = self
            .http
            .post(self.auth_url("logout"))
            .header("apikey", &self.anon_key)
            .bearer_auth(&session.access_token)
            .send()
            .await;
        if let Err(error) = result {
            tracing::debug!(%error, "logout request failed");
        }
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
        self.get_rows(Table::TemplateCategories, CATEGORY_QUERY)
            .await
    }

    async fn fetch_templates(
        &self,
        filter: &TemplateFilter,
    ) -> Result<Vec<Template>, BackendError> {
        self.get_rows(Table::AuditTemplates, &template_query(filter))
            .await
    }

    async fn get_template(&self, id: &str) -> Result<Template, BackendError> {
        self.get_row(Table::AuditTemplates, "template", id).await
    }

    async fn insert_template(&self, template: &Template) -> Result<Template, BackendError> {
        self.insert_row(Table::AuditTemplates, template).await
    }

    async fn update_template(
        &self,
        id: &str,
        update: &TemplateUpdate,
    ) -> Result<Template, BackendError> {
        self.update_row(Table::AuditTemplates, "template", id, update)
            .await
    }

    async fn fetch_audits(&self, filter: &AuditFilter) -> Result<Vec<Audit>, BackendError> {
        self.get_rows(Table::Audits, &audit_query(filter)).await
    }

    async fn get_audit(&self, id: &str) -> Result<Audit, BackendError> {
        self.get_row(Table::Audits, "audit", id).await
    }

    async fn insert_audit(&self, audit: &Audit) -> Result<Audit, BackendError> {
        self.insert_row(Table::Audits, audit).await
    }

    async fn update_audit(&self, id: &str, update: &AuditUpdate) -> Result<Audit, BackendError> {
        self.update_row(Table::Audits, "audit", id, update).await
    }

    async fn get_profile(&self, user_id: &str) -> Result<UserProfile, BackendError> {
        let query = format!("user_id=eq.{}&select=*", urlencoding::encode(user_id));
        let mut rows: Vec<UserProfile> = self.get_rows(Table::UserProfiles, &query).await?;
        if rows.is_empty() {
            return Err(BackendError::NotFound {
                entity: "user profile",
                id: user_id.to_string(),
            });
        }
        Ok(rows.remove(0))
    }

    async fn insert_profile(&self, profile: &UserProfile) -> Result<UserProfile, BackendError> {
        self.insert_row(Table::UserProfiles, profile).await
    }

    async fn subscribe(&self, table: Table) -> broadcast::Receiver<ChangeEvent> {
        let mut pollers = self.pollers.lock().await;
        if pollers.insert(table) {
            self.spawn_poller(table);
        }
        self.channels.subscribe(table)
    }
}

// ---------------------------------------------------------------------------
// Queries and tokens
// ---------------------------------------------------------------------------

fn template_query(filter: &TemplateFilter) -> String {
    let mut parts = vec!["select=*".to_string()];
    if !filter.include_inactive {
        parts.push("is_active=eq.true".to_string());
    }
    if let Some(category) = &filter.category {
        parts.push(format!("category=eq.{}", urlencoding::encode(category)));
    }
    if let Some(is_published) = filter.is_published {
        parts.push(format!("is_published=eq.{is_published}"));
    }
    if let Some(created_by) = &filter.created_by {
        parts.push(format!("created_by=eq.{}", urlencoding::encode(created_by)));
    }
    parts.push("order=created_at.desc".to_string());
    if let Some(limit) = filter.limit {
        parts.push(format!("limit={limit}"));
    }
    parts.join("&")
}

fn audit_query(filter: &AuditFilter) -> String {
    let mut parts = vec!["select=*".to_string()];
    if let Some(status) = filter.status {
        parts.push(format!("status=eq.{}", status.as_str()));
    }
    if let Some(template_id) = &filter.template_id {
        parts.push(format!(
            "template_id=eq.{}",
            urlencoding::encode(template_id)
        ));
    }
    if let Some(assigned_to) = &filter.assigned_to {
        parts.push(format!(
            "assigned_to=eq.{}",
            urlencoding::encode(assigned_to)
        ));
    }
    parts.push("order=created_at.desc".to_string());
    if let Some(limit) = filter.limit {
        parts.push(format!("limit={limit}"));
    }
    parts.join("&")
}

/// A GoTrue token grant.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    user: RemoteUser,
}

#[derive(Debug, Deserialize)]
struct RemoteUser {
    id: String,
    #[serde(default)]
    email: String,
}

fn session_from_token(token: TokenResponse) -> AuthSession {
    let expires_at = decode_expiry(&token.access_token).unwrap_or_else(|| {
        Utc::now() + chrono::TimeDelta::seconds(token.expires_in.unwrap_or(3600))
    });
    AuthSession {
        access_token: token.access_token,
        expires_at,
        user: AuthUser {
            id: token.user.id,
            email: token.user.email,
        },
    }
}

/// Read the `exp` claim out of a JWT without verifying the signature. The
/// server still enforces expiry; this only drives the local "session
/// expired" check.
fn decode_expiry(token: &str) -> Option<DateTime<Utc>> {
    let payload = token.split('.').nth(1)?;
    let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(payload)
        .ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    DateTime::from_timestamp(claims.get("exp")?.as_i64()?, 0)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tally_core::enums::AuditStatus;

    use super::*;

    const TOKEN_FIXTURE: &str = r#"{
        "access_token": "opaque-token-abc123",
        "token_type": "bearer",
        "expires_in": 3600,
        "refresh_token": "refresh-xyz",
        "user": {
            "id": "7f3c9b52-0000-4000-8000-000000000000",
            "aud": "authenticated",
            "email": "demo@tally.dev"
        }
    }"#;

    fn config() -> BackendConfig {
        BackendConfig {
            url: "https://abc.example.co/".into(),
            anon_key: "anon-key-123".into(),
            sync_interval_secs: 60,
        }
    }

    #[test]
    fn urls_drop_the_trailing_slash() {
        let backend = RemoteBackend::connect(&config()).unwrap();
        assert_eq!(
            backend.rest_url(Table::Audits),
            "https://abc.example.co/rest/v1/audits"
        );
        assert_eq!(
            backend.auth_url("signup"),
            "https://abc.example.co/auth/v1/signup"
        );
    }

    #[test]
    fn default_template_query_hides_inactive() {
        let query = template_query(&TemplateFilter::default());
        assert_eq!(query, "select=*&is_active=eq.true&order=created_at.desc");
    }

    #[test]
    fn template_query_carries_every_filter() {
        let filter = TemplateFilter {
            category: Some("cat office".into()),
            is_published: Some(true),
            created_by: Some("usr-1".into()),
            include_inactive: true,
            limit: Some(5),
        };
        let query = template_query(&filter);
        assert_eq!(
            query,
            "select=*&category=eq.cat%20office&is_published=eq.true&created_by=eq.usr-1&order=created_at.desc&limit=5"
        );
    }

    #[test]
    fn audit_query_uses_wire_status_names() {
        let filter = AuditFilter {
            status: Some(AuditStatus::InProgress),
            template_id: Some("tmp-1".into()),
            assigned_to: None,
            limit: Some(10),
        };
        let query = audit_query(&filter);
        assert_eq!(
            query,
            "select=*&status=eq.in_progress&template_id=eq.tmp-1&order=created_at.desc&limit=10"
        );
    }

    #[test]
    fn token_fixture_parses() {
        let token: TokenResponse = serde_json::from_str(TOKEN_FIXTURE).unwrap();
        assert_eq!(token.access_token, "opaque-token-abc123");
        assert_eq!(token.expires_in, Some(3600));
        assert_eq!(token.user.email, "demo@tally.dev");
    }

    #[test]
    fn jwt_expiry_comes_from_the_exp_claim() {
        let claims = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .encode(r#"{"sub":"usr-1","exp":4102444800}"#);
        let token = format!("header.{claims}.signature");

        let expiry = decode_expiry(&token).unwrap();
        assert_eq!(expiry.timestamp(), 4_102_444_800);
    }

    #[test]
    fn opaque_token_falls_back_to_expires_in() {
        let token: TokenResponse = serde_json::from_str(TOKEN_FIXTURE).unwrap();
        let before = Utc::now();
        let session = session_from_token(token);

        assert!(session.expires_at >= before + chrono::TimeDelta::seconds(3595));
        assert!(session.expires_at <= Utc::now() + chrono::TimeDelta::seconds(3605));
        assert_eq!(session.user.email, "demo@tally.dev");
    }

    #[test]
    fn garbage_jwt_decodes_to_none() {
        assert_eq!(decode_expiry("single-segment"), None);
        assert_eq!(decode_expiry("a.not-base64!.c"), None);
        let claims = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode("{}");
        assert_eq!(decode_expiry(&format!("a.{claims}.c")), None);
    }
}
