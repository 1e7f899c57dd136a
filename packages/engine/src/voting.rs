use std::sync::Arc;

use common::VotePhase;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::WorkflowError;
use crate::models::{Actor, Vote};
use crate::phase::require_phase;
use crate::store::{DemodayStore, StoreError};

/// Records and removes votes, enforcing the per-phase uniqueness rules,
/// and tallies weight sums per project.
#[derive(Clone)]
pub struct VoteLedger {
    store: Arc<dyn DemodayStore>,
    clock: Arc<dyn Clock>,
}

impl VoteLedger {
    pub fn new(store: Arc<dyn DemodayStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Cast one vote for a project in the given ballot.
    ///
    /// Preconditions, in order: the project exists; it has a submission in
    /// this event whose status is votable for the ballot (popular accepts
    /// Approved and Finalist, final accepts Finalist only); the ballot's
    /// phase is the event's current phase. Duplicates are rejected by the
    /// store's uniqueness constraint, so a race between two identical casts
    /// still yields exactly one vote.
    #[instrument(skip(self, actor), fields(voter = %actor.id, phase = %phase))]
    pub async fn cast_vote(
        &self,
        actor: &Actor,
        project_id: Uuid,
        event_id: Uuid,
        phase: VotePhase,
    ) -> Result<Vote, WorkflowError> {
        let now = self.clock.now();

        let project = self
            .store
            .project(project_id)
            .await?
            .ok_or_else(|| WorkflowError::not_found("project"))?;

        let submission = self
            .store
            .submission_for_project(event_id, project.id)
            .await?
            .ok_or_else(|| WorkflowError::not_found("submission"))?;

        let votable = match phase {
            VotePhase::Popular => submission.status.accepts_popular_votes(),
            VotePhase::Final => submission.status.accepts_final_votes(),
        };
        if !votable {
            return Err(WorkflowError::validation(format!(
                "submission with status {} is not open to {phase} voting",
                submission.status
            )));
        }

        let phases = self.store.phases(event_id).await?;
        require_phase(&phases, phase.phase_number(), now)?;

        let vote = Vote {
            id: Uuid::new_v4(),
            voter_id: actor.id,
            voter_role: actor.role,
            project_id,
            event_id,
            phase,
            weight: 1,
            cast_at: now,
        };

        match self.store.insert_vote(vote.clone()).await {
            Ok(()) => {}
            Err(StoreError::Conflict(_)) => return Err(WorkflowError::DuplicateVote),
            Err(e) => return Err(e.into()),
        }

        info!(project_id = %project_id, "Vote cast");
        Ok(vote)
    }

    /// Remove the caller's vote for a project in the given ballot.
    ///
    /// Removal is not window-restricted; re-casting afterwards is legal
    /// under the normal uniqueness rules.
    #[instrument(skip(self, actor), fields(voter = %actor.id, phase = %phase))]
    pub async fn remove_vote(
        &self,
        actor: &Actor,
        project_id: Uuid,
        event_id: Uuid,
        phase: VotePhase,
    ) -> Result<(), WorkflowError> {
        let removed = self
            .store
            .delete_vote(actor.id, project_id, event_id, phase)
            .await?;
        if !removed {
            return Err(WorkflowError::not_found("vote"));
        }
        info!(project_id = %project_id, "Vote removed");
        Ok(())
    }

    /// Weight sum of a project's votes in one ballot (a plain count while
    /// every vote carries weight 1).
    pub async fn count_votes(
        &self,
        project_id: Uuid,
        event_id: Uuid,
        phase: VotePhase,
    ) -> Result<u32, WorkflowError> {
        Ok(self.store.count_votes(project_id, event_id, phase).await?)
    }
}

impl std::fmt::Debug for VoteLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoteLedger").finish_non_exhaustive()
    }
}
