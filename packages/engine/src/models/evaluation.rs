use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Submission;

/// A single approve/reject mark for one screening criterion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriterionMark {
    pub criterion: String,
    pub approved: bool,
}

/// A screening-phase assessment of one submission by one reviewer.
///
/// Unique per (submission, reviewer); the uniqueness is a storage-level
/// constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    pub id: Uuid,
    pub submission_id: Uuid,
    pub reviewer_id: Uuid,
    pub marks: Vec<CriterionMark>,
    /// `round(100 * approved / total)`, 0-100.
    pub approval_percentage: u8,
    pub created_at: DateTime<Utc>,
}

/// Result of submitting an evaluation: the stored evaluation plus the
/// submission with its derived status applied.
#[derive(Debug, Clone)]
pub struct EvaluationOutcome {
    pub evaluation: Evaluation,
    pub submission: Submission,
}

/// Percentage of approved marks, rounded to the nearest integer.
pub fn approval_percentage(marks: &[CriterionMark]) -> u8 {
    if marks.is_empty() {
        return 0;
    }
    let approved = marks.iter().filter(|m| m.approved).count() as f64;
    let total = marks.len() as f64;
    (100.0 * approved / total).round() as u8
}
