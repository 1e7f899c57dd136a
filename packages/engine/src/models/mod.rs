pub mod evaluation;
pub mod event;
pub mod project;
pub mod results;
pub mod submission;
pub mod vote;

pub use evaluation::{CriterionMark, Evaluation, EvaluationOutcome};
pub use event::{Category, Event, NewCategory, NewEvent, Phase, PhaseSpec};
pub use project::{NewProject, Project, ProjectPatch};
pub use results::{EventResults, EventStats, FinalistEntry, ProjectStanding, SelectionResult};
pub use submission::Submission;
pub use vote::Vote;

use common::Role;
use uuid::Uuid;

/// Caller identity as supplied by the external identity provider.
///
/// The engine never authenticates anyone; it only consumes the (id, role)
/// pair attached to each gated call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }

    /// Internal actor used when the engine itself applies a transition,
    /// e.g. persisting the computed winner.
    pub fn system() -> Self {
        Self {
            id: Uuid::nil(),
            role: Role::Admin,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
