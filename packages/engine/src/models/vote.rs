use chrono::{DateTime, Utc};
use common::{Role, VotePhase};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One vote by one user for one project.
///
/// `weight` is always 1 in the current ruleset; the field exists for
/// extensibility. `voter_role` is recorded at cast time because final-phase
/// weighting is applied at aggregation time from the role the voter held
/// when the vote was cast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    pub id: Uuid,
    pub voter_id: Uuid,
    pub voter_role: Role,
    pub project_id: Uuid,
    pub event_id: Uuid,
    pub phase: VotePhase,
    pub weight: u32,
    pub cast_at: DateTime<Utc>,
}
