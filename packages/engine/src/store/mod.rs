use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{SubmissionStatus, VotePhase};
use uuid::Uuid;

use crate::models::{Category, Evaluation, Event, Phase, Project, Submission, Vote};

pub mod memory;

pub use memory::MemoryStore;

/// Errors that can occur at the persistence boundary.
#[derive(Debug)]
pub enum StoreError {
    /// The addressed record was not found.
    NotFound(String),
    /// A uniqueness constraint was violated.
    Conflict(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(what) => write!(f, "record not found: {what}"),
            Self::Conflict(what) => write!(f, "uniqueness violation: {what}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Abstract repository for all engine entities.
///
/// The engine issues reads and writes against this trait only; persistence
/// technology is a deployment concern. Compound methods
/// (`activate_exclusively`, `replace_phases`, `record_evaluation`,
/// `replace_finalists`) are the genuine atomicity boundaries of the system
/// and MUST be implemented as a single transaction each. Vote uniqueness is
/// likewise a storage-level constraint so that concurrent casts of the same
/// vote resolve in the store, not in an application pre-check.
#[async_trait]
pub trait DemodayStore: Send + Sync {
    // --- events ---------------------------------------------------------

    async fn insert_event(&self, event: Event) -> Result<(), StoreError>;

    async fn event(&self, id: Uuid) -> Result<Option<Event>, StoreError>;

    /// The single active event, if any.
    async fn active_event(&self) -> Result<Option<Event>, StoreError>;

    async fn update_event(&self, event: Event) -> Result<(), StoreError>;

    /// Delete an event and everything hanging off it (phases, categories,
    /// submissions, votes, evaluations).
    ///
    /// Returns `true` if the event existed.
    async fn delete_event(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Atomically deactivate every other event and activate this one,
    /// preserving the ≤1-active-event invariant.
    async fn activate_exclusively(&self, id: Uuid, now: DateTime<Utc>) -> Result<Event, StoreError>;

    // --- phases ---------------------------------------------------------

    /// Phases of an event in ascending `number` order.
    async fn phases(&self, event_id: Uuid) -> Result<Vec<Phase>, StoreError>;

    /// Atomic delete-all-then-reinsert of an event's phases.
    async fn replace_phases(&self, event_id: Uuid, phases: Vec<Phase>) -> Result<(), StoreError>;

    // --- categories -----------------------------------------------------

    async fn insert_category(&self, category: Category) -> Result<(), StoreError>;

    async fn category(&self, id: Uuid) -> Result<Option<Category>, StoreError>;

    async fn categories(&self, event_id: Uuid) -> Result<Vec<Category>, StoreError>;

    // --- projects -------------------------------------------------------

    async fn insert_project(&self, project: Project) -> Result<(), StoreError>;

    async fn project(&self, id: Uuid) -> Result<Option<Project>, StoreError>;

    async fn update_project(&self, project: Project) -> Result<(), StoreError>;

    // --- submissions ----------------------------------------------------

    /// Insert a submission; `Conflict` if one already exists for the same
    /// (project, event) pair.
    async fn insert_submission(&self, submission: Submission) -> Result<(), StoreError>;

    async fn submission(&self, id: Uuid) -> Result<Option<Submission>, StoreError>;

    async fn submission_for_project(
        &self,
        event_id: Uuid,
        project_id: Uuid,
    ) -> Result<Option<Submission>, StoreError>;

    async fn submissions_for_event(&self, event_id: Uuid) -> Result<Vec<Submission>, StoreError>;

    async fn submissions_for_project(&self, project_id: Uuid)
    -> Result<Vec<Submission>, StoreError>;

    async fn update_submission(&self, submission: Submission) -> Result<(), StoreError>;

    /// Returns `true` if the submission existed.
    async fn delete_submission(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Atomic reset-then-reselect: demote every current finalist of the
    /// event back to `Approved`, then mark exactly `finalists` as
    /// `Finalist`. Repeated runs converge on the same set.
    async fn replace_finalists(
        &self,
        event_id: Uuid,
        finalists: &[Uuid],
        now: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    // --- votes ----------------------------------------------------------

    /// Insert a vote, enforcing both uniqueness invariants as a constraint:
    /// popular votes are unique per (voter, project, event); final votes
    /// are unique per (voter, event) across all projects.
    async fn insert_vote(&self, vote: Vote) -> Result<(), StoreError>;

    /// Delete the matching vote. Returns `true` if one existed.
    async fn delete_vote(
        &self,
        voter_id: Uuid,
        project_id: Uuid,
        event_id: Uuid,
        phase: VotePhase,
    ) -> Result<bool, StoreError>;

    /// Weight sum of votes for a project in one ballot.
    async fn count_votes(
        &self,
        project_id: Uuid,
        event_id: Uuid,
        phase: VotePhase,
    ) -> Result<u32, StoreError>;

    async fn votes_for_event(&self, event_id: Uuid) -> Result<Vec<Vote>, StoreError>;

    // --- evaluations ----------------------------------------------------

    async fn has_evaluation(
        &self,
        submission_id: Uuid,
        reviewer_id: Uuid,
    ) -> Result<bool, StoreError>;

    /// Atomically persist an evaluation and apply the status it derived to
    /// the submission. `Conflict` if the (submission, reviewer) pair was
    /// already evaluated; returns the updated submission.
    async fn record_evaluation(
        &self,
        evaluation: Evaluation,
        resulting_status: SubmissionStatus,
        now: DateTime<Utc>,
    ) -> Result<Submission, StoreError>;
}
