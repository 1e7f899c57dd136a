use chrono::{DateTime, Utc};
use common::SubmissionStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The join of a project to an event for one event cycle.
///
/// Unique per (project, event); the uniqueness is a storage-level
/// constraint, not an application pre-check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub project_id: Uuid,
    pub event_id: Uuid,
    pub status: SubmissionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
