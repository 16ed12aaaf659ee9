//! Service layer orchestrating audit workflows over a [`Backend`].
//!
//! `AuditService` owns backend selection and the business rules that sit
//! above raw row access: session persistence, template lifecycle gates
//! (publish checks, immutability, versioning), and the response pipeline
//! (rule actions on save, validation and scoring on submit). The CLI talks
//! only to this type.

use std::sync::Arc;

use chrono::Utc;
use tally_config::TallyConfig;
use tally_core::entities::{
    Audit, AuditLocation, Category, Section, Template, TemplateDraft, UserProfile,
};
use tally_core::enums::AuditStatus;
use tally_core::logic_check::{self, TemplateIssue};
use tally_core::responses::{
    CheckResponse, PreviewResponse, SaveResponsesResponse, ScoreResponse, StatusResponse,
    SubmitResponse,
};
use tally_core::value::{AnswerValue, ResponseMap};
use tally_core::{engine, scoring, validate};
use tokio::sync::broadcast;

use crate::auth::AuthSession;
use crate::backend::{Backend, BackendMode};
use crate::changes::{ChangeEvent, Table};
use crate::error::BackendError;
use crate::filters::{AuditFilter, TemplateFilter};
use crate::memory::MemoryBackend;
use crate::remote::RemoteBackend;
use crate::session_store;
use crate::updates::audit::AuditUpdateBuilder;
use crate::updates::template::{TemplateUpdate, TemplateUpdateBuilder};

/// Orchestrates audit workflows over the selected backend.
pub struct AuditService {
    backend: Arc<dyn Backend>,
}

impl AuditService {
    /// Select a backend from config and restore any stored session.
    ///
    /// Remote when `backend.url` and `backend.anon_key` are configured,
    /// in-memory otherwise. `general.demo = true` forces in-memory even with
    /// remote credentials present.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the selected backend cannot be constructed.
    pub async fn connect(config: &TallyConfig) -> Result<Self, BackendError> {
        let backend: Arc<dyn Backend> = if config.general.demo {
            tracing::info!("demo mode forced; using the in-memory backend");
            Arc::new(MemoryBackend::open().await?)
        } else if config.backend.is_configured() {
            Arc::new(RemoteBackend::connect(&config.backend)?)
        } else {
            tracing::warn!("backend url/anon key not configured; using the in-memory backend");
            Arc::new(MemoryBackend::open().await?)
        };

        let service = Self { backend };
        service.restore_stored_session().await;
        Ok(service)
    }

    /// Wrap an existing backend (for testing).
    #[must_use]
    pub fn with_backend(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Access the underlying backend handle.
    #[must_use]
    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    #[must_use]
    pub fn mode(&self) -> BackendMode {
        self.backend.mode()
    }

    async fn restore_stored_session(&self) {
        let Some(session) = session_store::load() else {
            return;
        };
        match self.backend.restore_session(session).await {
            Ok(()) => tracing::debug!("restored stored session"),
            Err(error) => tracing::debug!(%error, "stored session not restored"),
        }
    }

    // --- Auth ---

    /// Register a new account and persist the returned session.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Api` if the account already exists or the
    /// service requires email confirmation before a session is issued.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<AuthSession, BackendError> {
        let session = self.backend.sign_up(email, password, name).await?;
        persist_session(&session);
        Ok(session)
    }

    /// Sign in and persist the returned session.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::InvalidCredentials` for a wrong email or
    /// password.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, BackendError> {
        let session = self.backend.sign_in(email, password).await?;
        persist_session(&session);
        Ok(session)
    }

    /// Sign out and delete the stored session.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the stored session cannot be deleted.
    pub async fn sign_out(&self) -> Result<(), BackendError> {
        if let Err(error) = self.backend.sign_out().await {
            tracing::warn!(%error, "backend sign-out failed; clearing local session anyway");
        }
        session_store::delete()
    }

    pub async fn session(&self) -> Option<AuthSession> {
        self.backend.session().await
    }

    /// Backend mode, health, and session at a glance.
    pub async fn status(&self) -> StatusResponse {
        let healthy = match self.backend.health().await {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(%error, "health check failed");
                false
            }
        };
        let session = self.backend.session().await;
        let role = match &session {
            Some(session) => self
                .backend
                .get_profile(&session.user.id)
                .await
                .ok()
                .map(|profile| profile.role.as_str().to_string()),
            None => None,
        };
        StatusResponse {
            mode: self.backend.mode().to_string(),
            healthy,
            signed_in_as: session.map(|s| s.user.email),
            role,
        }
    }

    /// Profile of the given user.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` when no profile row exists.
    pub async fn get_profile(&self, user_id: &str) -> Result<UserProfile, BackendError> {
        self.backend.get_profile(user_id).await
    }

    // --- Catalog ---

    /// Active categories in sort order.
    pub async fn list_categories(&self) -> Result<Vec<Category>, BackendError> {
        self.backend.fetch_categories().await
    }

    pub async fn list_templates(
        &self,
        filter: &TemplateFilter,
    ) -> Result<Vec<Template>, BackendError> {
        self.backend.fetch_templates(filter).await
    }

    pub async fn get_template(&self, id: &str) -> Result<Template, BackendError> {
        self.backend.get_template(id).await
    }

    /// Create a template from an authored draft.
    ///
    /// Fills in everything the author does not control: version 1,
    /// unpublished, active, `created_by` from the current session, and
    /// positional `order_index` for sections that omit one.
    pub async fn create_template(&self, draft: TemplateDraft) -> Result<Template, BackendError> {
        let created_by = self.backend.session().await.map(|s| s.user.id);
        let now = Utc::now();
        let sections = draft
            .sections
            .into_iter()
            .zip(1u32..)
            .map(|(section, position)| Section {
                id: section.id,
                title: section.title,
                description: section.description,
                order_index: section.order_index.unwrap_or(position),
                questions: section.questions,
            })
            .collect();
        let template = Template {
            id: String::new(),
            name: draft.name,
            description: draft.description,
            category: draft.category,
            version: 1,
            sections,
            scoring_rules: draft.scoring_rules.unwrap_or_default(),
            is_published: false,
            published_at: None,
            is_active: true,
            created_by,
            created_at: now,
            updated_at: now,
        };
        self.backend.insert_template(&template).await
    }

    /// Apply an update to an unpublished template.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::PublishedImmutable` once the template is
    /// published; edits continue on a new version.
    pub async fn update_template(
        &self,
        id: &str,
        update: &TemplateUpdate,
    ) -> Result<Template, BackendError> {
        let current = self.backend.get_template(id).await?;
        if current.is_published {
            return Err(BackendError::PublishedImmutable { id: id.to_string() });
        }
        self.backend.update_template(id, update).await
    }

    /// Run logic checks without publishing.
    pub async fn check_template(&self, id: &str) -> Result<CheckResponse, BackendError> {
        let template = self.backend.get_template(id).await?;
        let issues = logic_check::check_template(&template);
        let publishable = !issues.iter().any(TemplateIssue::is_blocking);
        Ok(CheckResponse {
            template_id: template.id,
            issues,
            publishable,
        })
    }

    /// Publish a template after its logic checks pass.
    ///
    /// Publishing an already-published template is a no-op returning the
    /// current row. Non-blocking issues (dangling rule references) are logged
    /// and do not stop publication.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Unpublishable` when a rule cycle or duplicate
    /// section order index is found.
    pub async fn publish_template(&self, id: &str) -> Result<Template, BackendError> {
        let template = self.backend.get_template(id).await?;
        if template.is_published {
            return Ok(template);
        }

        let issues = logic_check::check_template(&template);
        let blocking: Vec<String> = issues
            .iter()
            .filter(|issue| issue.is_blocking())
            .map(ToString::to_string)
            .collect();
        if !blocking.is_empty() {
            return Err(BackendError::Unpublishable(blocking.join("; ")));
        }
        for warning in issues.iter().filter(|issue| !issue.is_blocking()) {
            tracing::warn!(template = id, issue = %warning, "publishing with dangling rule reference");
        }

        let update = TemplateUpdateBuilder::new()
            .is_published(true)
            .published_at(Some(Utc::now()))
            .build();
        self.backend.update_template(id, &update).await
    }

    /// Copy a template into the next unpublished version.
    ///
    /// `created_by` is stamped from the current session, falling back to the
    /// source template's author.
    pub async fn new_template_version(&self, id: &str) -> Result<Template, BackendError> {
        let source = self.backend.get_template(id).await?;
        let created_by = match self.backend.session().await {
            Some(session) => Some(session.user.id),
            None => source.created_by.clone(),
        };
        let now = Utc::now();
        let next = Template {
            id: String::new(),
            version: source.version + 1,
            is_published: false,
            published_at: None,
            is_active: true,
            created_by,
            created_at: now,
            updated_at: now,
            ..source
        };
        self.backend.insert_template(&next).await
    }

    /// Soft-delete a template. Allowed even when published.
    pub async fn deactivate_template(&self, id: &str) -> Result<Template, BackendError> {
        let update = TemplateUpdateBuilder::new().is_active(false).build();
        self.backend.update_template(id, &update).await
    }

    /// Visibility dry-run: replay hypothetical answers through the rule
    /// engine without touching any audit.
    pub async fn preview(
        &self,
        template_id: &str,
        entries: &[(String, AnswerValue)],
    ) -> Result<PreviewResponse, BackendError> {
        let template = self.backend.get_template(template_id).await?;

        let mut responses = ResponseMap::new();
        let mut section_jumps = Vec::new();
        for (question_id, value) in entries {
            responses.insert(question_id.clone(), value.clone());
            section_jumps.extend(engine::process_actions(
                &template,
                question_id,
                &mut responses,
            ));
        }

        let mut visible = Vec::new();
        for section in template.sections_in_order() {
            for question in engine::visible_questions(&section.questions, &responses) {
                visible.push(question.id.clone());
            }
        }
        let hidden: Vec<String> = template
            .all_questions()
            .map(|q| q.id.clone())
            .filter(|id| !visible.contains(id))
            .collect();

        Ok(PreviewResponse {
            visible,
            hidden,
            responses,
            section_jumps,
        })
    }

    // --- Audits ---

    pub async fn list_audits(&self, filter: &AuditFilter) -> Result<Vec<Audit>, BackendError> {
        self.backend.fetch_audits(filter).await
    }

    /// Audits assigned to the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotAuthenticated` without a session.
    pub async fn my_audits(&self, limit: Option<u32>) -> Result<Vec<Audit>, BackendError> {
        let session = self
            .backend
            .session()
            .await
            .ok_or(BackendError::NotAuthenticated)?;
        let filter = AuditFilter {
            assigned_to: Some(session.user.id),
            limit,
            ..AuditFilter::default()
        };
        self.backend.fetch_audits(&filter).await
    }

    pub async fn get_audit(&self, id: &str) -> Result<Audit, BackendError> {
        self.backend.get_audit(id).await
    }

    /// Start a new audit in `pending`, assigned to `assigned_to` or the
    /// signed-in user.
    pub async fn create_audit(
        &self,
        template_id: &str,
        location: AuditLocation,
        assigned_to: Option<String>,
    ) -> Result<Audit, BackendError> {
        // template must exist; unpublished drafts are fair game for trial runs
        let template = self.backend.get_template(template_id).await?;
        let assigned_to = match assigned_to {
            Some(user) => Some(user),
            None => self.backend.session().await.map(|s| s.user.id),
        };
        let now = Utc::now();
        let audit = Audit {
            id: String::new(),
            template_id: template.id,
            status: AuditStatus::Pending,
            assigned_to,
            location,
            responses: ResponseMap::new(),
            score: None,
            passed: None,
            submitted_at: None,
            created_at: now,
            updated_at: now,
        };
        self.backend.insert_audit(&audit).await
    }

    /// Record answers on an editable audit.
    ///
    /// Entries merge into the existing response map in order, each one
    /// triggering the rule engine (`set_value` writes, section jumps). A
    /// pending audit moves to `in_progress` on its first save. Saving never
    /// validates; partial and even invalid intermediate states are expected
    /// while an audit is underway.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::InvalidTransition` once the audit is completed.
    pub async fn save_responses(
        &self,
        audit_id: &str,
        entries: &[(String, AnswerValue)],
    ) -> Result<SaveResponsesResponse, BackendError> {
        let audit = self.backend.get_audit(audit_id).await?;
        if !audit.status.is_editable() {
            return Err(BackendError::InvalidTransition {
                id: audit.id,
                from: audit.status,
                to: AuditStatus::InProgress,
            });
        }
        let template = self.backend.get_template(&audit.template_id).await?;

        let mut responses = audit.responses.clone();
        let mut section_jumps = Vec::new();
        for (question_id, value) in entries {
            responses.insert(question_id.clone(), value.clone());
            section_jumps.extend(engine::process_actions(
                &template,
                question_id,
                &mut responses,
            ));
        }

        let mut update = AuditUpdateBuilder::new().responses(responses);
        if audit.status == AuditStatus::Pending {
            update = update.status(AuditStatus::InProgress);
        }
        let audit = self.backend.update_audit(audit_id, &update.build()).await?;
        Ok(SaveResponsesResponse {
            audit,
            section_jumps,
        })
    }

    /// Submit an audit: validate, score, and freeze it as `completed`.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::InvalidTransition` unless the audit is
    /// `in_progress`, and `BackendError::Validation` with every violation
    /// when the visible responses do not validate.
    pub async fn submit_audit(&self, audit_id: &str) -> Result<SubmitResponse, BackendError> {
        let audit = self.backend.get_audit(audit_id).await?;
        if !audit.status.can_transition_to(AuditStatus::Completed) {
            return Err(BackendError::InvalidTransition {
                id: audit.id,
                from: audit.status,
                to: AuditStatus::Completed,
            });
        }
        let template = self.backend.get_template(&audit.template_id).await?;

        let violations = validate::validate_responses(&template, &audit.responses);
        if !violations.is_empty() {
            return Err(BackendError::Validation(violations));
        }

        let score = scoring::score_audit(&template, &audit.responses);
        let update = AuditUpdateBuilder::new()
            .status(AuditStatus::Completed)
            .score(Some(score.score))
            .passed(Some(score.passed))
            .submitted_at(Some(Utc::now()))
            .build();
        let audit = self.backend.update_audit(audit_id, &update).await?;
        Ok(SubmitResponse { audit, score })
    }

    /// Score an audit's current responses without changing it.
    pub async fn score_audit(&self, audit_id: &str) -> Result<ScoreResponse, BackendError> {
        let audit = self.backend.get_audit(audit_id).await?;
        let template = self.backend.get_template(&audit.template_id).await?;
        let score = scoring::score_audit(&template, &audit.responses);
        Ok(ScoreResponse {
            audit_id: audit.id,
            score,
        })
    }

    // --- Change feed ---

    pub async fn subscribe(&self, table: Table) -> broadcast::Receiver<ChangeEvent> {
        self.backend.subscribe(table).await
    }

    /// Probe the backend.
    pub async fn health(&self) -> Result<(), BackendError> {
        self.backend.health().await
    }
}

fn persist_session(session: &AuthSession) {
    if let Err(error) = session_store::store(session) {
        tracing::warn!(%error, "failed to persist session; sign-in valid for this run only");
    }
}
