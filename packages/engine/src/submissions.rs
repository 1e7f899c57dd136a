use std::sync::Arc;

use common::SubmissionStatus;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::WorkflowError;
use crate::models::{Actor, NewProject, Project, ProjectPatch, Submission};
use crate::phase::require_phase;
use crate::store::{DemodayStore, StoreError};

/// Project registration and submission entry points for participants.
#[derive(Clone)]
pub struct SubmissionService {
    store: Arc<dyn DemodayStore>,
    clock: Arc<dyn Clock>,
}

impl SubmissionService {
    pub fn new(store: Arc<dyn DemodayStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Register a project owned by the caller. Registration is independent
    /// of any event; entering one is `submit_project`.
    #[instrument(skip(self, actor, input), fields(owner = %actor.id))]
    pub async fn register_project(
        &self,
        actor: &Actor,
        input: NewProject,
    ) -> Result<Project, WorkflowError> {
        if input.title.trim().is_empty() {
            return Err(WorkflowError::validation("project title must not be empty"));
        }
        if !input.contact_email.contains('@') {
            return Err(WorkflowError::validation(format!(
                "'{}' is not a usable contact email",
                input.contact_email
            )));
        }
        let now = self.clock.now();
        let project = Project {
            id: Uuid::new_v4(),
            owner_id: actor.id,
            title: input.title,
            description: input.description,
            kind: input.kind,
            category_id: input.category_id,
            contact_email: input.contact_email,
            created_at: now,
            updated_at: now,
        };
        self.store.insert_project(project.clone()).await?;
        info!(project_id = %project.id, "Registered project");
        Ok(project)
    }

    /// Patch a project's details.
    ///
    /// Only the owner (or an admin) may edit. Once any of the project's
    /// submissions has passed screening, owner edits are locked outside the
    /// submission window, so an approved pitch cannot be rewritten under
    /// the reviewers. Admins edit at any time.
    #[instrument(skip(self, actor, patch), fields(actor_role = %actor.role))]
    pub async fn update_project(
        &self,
        actor: &Actor,
        project_id: Uuid,
        patch: ProjectPatch,
    ) -> Result<Project, WorkflowError> {
        let now = self.clock.now();
        let mut project = self
            .store
            .project(project_id)
            .await?
            .ok_or_else(|| WorkflowError::not_found("project"))?;

        if !actor.is_admin() {
            if project.owner_id != actor.id {
                return Err(WorkflowError::Forbidden);
            }
            for submission in self.store.submissions_for_project(project_id).await? {
                if matches!(
                    submission.status,
                    SubmissionStatus::Approved
                        | SubmissionStatus::Finalist
                        | SubmissionStatus::Winner
                ) {
                    let phases = self.store.phases(submission.event_id).await?;
                    require_phase(&phases, 1, now)?;
                }
            }
        }

        if let Some(title) = patch.title {
            if title.trim().is_empty() {
                return Err(WorkflowError::validation("project title must not be empty"));
            }
            project.title = title;
        }
        if let Some(description) = patch.description {
            project.description = description;
        }
        if let Some(kind) = patch.kind {
            project.kind = kind;
        }
        match patch.category_id {
            Some(Some(category_id)) => {
                let category = self
                    .store
                    .category(category_id)
                    .await?
                    .ok_or_else(|| WorkflowError::not_found("category"))?;
                for submission in self.store.submissions_for_project(project_id).await? {
                    if submission.event_id != category.event_id {
                        return Err(WorkflowError::validation(
                            "project category belongs to a different event",
                        ));
                    }
                }
                project.category_id = Some(category_id);
            }
            Some(None) => project.category_id = None,
            None => {}
        }
        if let Some(email) = patch.contact_email {
            if !email.contains('@') {
                return Err(WorkflowError::validation(format!(
                    "'{email}' is not a usable contact email"
                )));
            }
            project.contact_email = email;
        }

        project.updated_at = now;
        self.store.update_project(project.clone()).await?;
        info!(project_id = %project.id, "Updated project");
        Ok(project)
    }

    /// Enter a project into an event. Allowed only while the event's
    /// submission phase is open, for every role including admins; a project
    /// enters each event at most once.
    #[instrument(skip(self, actor))]
    pub async fn submit_project(
        &self,
        actor: &Actor,
        project_id: Uuid,
        event_id: Uuid,
    ) -> Result<Submission, WorkflowError> {
        let now = self.clock.now();
        let project = self
            .store
            .project(project_id)
            .await?
            .ok_or_else(|| WorkflowError::not_found("project"))?;
        if !actor.is_admin() && project.owner_id != actor.id {
            return Err(WorkflowError::Forbidden);
        }
        let event = self
            .store
            .event(event_id)
            .await?
            .ok_or_else(|| WorkflowError::not_found("event"))?;
        if !event.active {
            return Err(WorkflowError::validation(
                "submissions are only accepted for the active event",
            ));
        }
        if let Some(category_id) = project.category_id {
            let category = self
                .store
                .category(category_id)
                .await?
                .ok_or_else(|| WorkflowError::not_found("category"))?;
            if category.event_id != event_id {
                return Err(WorkflowError::validation(
                    "project category belongs to a different event",
                ));
            }
        }

        let phases = self.store.phases(event_id).await?;
        require_phase(&phases, 1, now)?;

        let submission = Submission {
            id: Uuid::new_v4(),
            project_id,
            event_id,
            status: SubmissionStatus::Submitted,
            created_at: now,
            updated_at: now,
        };
        match self.store.insert_submission(submission.clone()).await {
            Ok(()) => {}
            Err(StoreError::Conflict(_)) => {
                return Err(WorkflowError::AlreadyExists(
                    "submission for this project and event".into(),
                ));
            }
            Err(e) => return Err(e.into()),
        }

        info!(submission_id = %submission.id, event_id = %event_id, "Submitted project");
        Ok(submission)
    }

    /// Withdraw a submission. Owners may withdraw only while the submission
    /// phase is still open; admins may withdraw at any time.
    #[instrument(skip(self, actor), fields(actor_role = %actor.role))]
    pub async fn withdraw_submission(
        &self,
        actor: &Actor,
        submission_id: Uuid,
    ) -> Result<(), WorkflowError> {
        let now = self.clock.now();
        let submission = self
            .store
            .submission(submission_id)
            .await?
            .ok_or_else(|| WorkflowError::not_found("submission"))?;

        if !actor.is_admin() {
            let project = self
                .store
                .project(submission.project_id)
                .await?
                .ok_or_else(|| WorkflowError::not_found("project"))?;
            if project.owner_id != actor.id {
                return Err(WorkflowError::Forbidden);
            }
            let phases = self.store.phases(submission.event_id).await?;
            require_phase(&phases, 1, now)?;
        }

        if !self.store.delete_submission(submission_id).await? {
            return Err(WorkflowError::not_found("submission"));
        }
        info!(submission_id = %submission_id, "Withdrew submission");
        Ok(())
    }
}

impl std::fmt::Debug for SubmissionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionService").finish_non_exhaustive()
    }
}
