use common::SubmissionStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One selected finalist, in rank order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalistEntry {
    pub submission_id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub popular_votes: u32,
}

/// Audit trail of one finalist-selection bucket (a category, or the
/// uncategorized bucket when `category_id` is `None`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionResult {
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub max_finalists: u32,
    /// Number actually selected; less than the cap when there were fewer
    /// eligible submissions.
    pub selected: usize,
    pub finalists: Vec<FinalistEntry>,
}

/// One row of the final ranked results view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectStanding {
    pub submission_id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub status: SubmissionStatus,
    pub popular_votes: u32,
    pub final_score: u32,
}

/// Event-wide aggregate statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventStats {
    pub submissions: usize,
    /// Distinct participating users, counted by project owner.
    pub participants: usize,
    /// Weight sum of all popular-phase votes.
    pub popular_votes: u32,
    /// Weight sum of all final-phase votes (as cast, before role scaling).
    pub final_votes: u32,
}

/// The public results artifact for one event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventResults {
    pub event_id: Uuid,
    /// Ranked by `final_score` descending, ties by `popular_votes`
    /// descending, then submission age and project id.
    pub standings: Vec<ProjectStanding>,
    pub stats: EventStats,
}
