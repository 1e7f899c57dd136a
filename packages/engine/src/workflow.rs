use std::sync::Arc;

use common::{Role, SubmissionStatus};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::clock::Clock;
use crate::config::ScoringConfig;
use crate::error::WorkflowError;
use crate::models::evaluation::approval_percentage;
use crate::models::{Actor, CriterionMark, Evaluation, EvaluationOutcome, Submission};
use crate::phase::check_phase_gate;
use crate::store::{DemodayStore, StoreError};

/// Declarative transition rule: who may move a submission to `target`, from
/// which states, while which numbered phase is current.
struct TransitionRule {
    target: SubmissionStatus,
    from: &'static [SubmissionStatus],
    roles: &'static [Role],
    required_phase: Option<u8>,
}

/// The single rule table every call site consults. Admins bypass it
/// entirely (see `transition`).
const RULES: &[TransitionRule] = &[
    TransitionRule {
        target: SubmissionStatus::Approved,
        from: &[SubmissionStatus::Submitted],
        roles: &[Role::Admin, Role::Professor],
        required_phase: Some(2),
    },
    TransitionRule {
        target: SubmissionStatus::Rejected,
        from: &[SubmissionStatus::Submitted],
        roles: &[Role::Admin, Role::Professor],
        required_phase: Some(2),
    },
    TransitionRule {
        target: SubmissionStatus::Finalist,
        from: &[SubmissionStatus::Approved],
        roles: &[Role::Admin],
        required_phase: Some(3),
    },
    TransitionRule {
        target: SubmissionStatus::Winner,
        from: &[SubmissionStatus::Finalist],
        roles: &[Role::Admin],
        required_phase: Some(4),
    },
];

/// Validates and applies status transitions on submissions, gated by the
/// event's current phase and the actor's role.
#[derive(Clone)]
pub struct SubmissionWorkflow {
    store: Arc<dyn DemodayStore>,
    clock: Arc<dyn Clock>,
    scoring: ScoringConfig,
}

impl SubmissionWorkflow {
    pub fn new(store: Arc<dyn DemodayStore>, clock: Arc<dyn Clock>, scoring: ScoringConfig) -> Self {
        Self {
            store,
            clock,
            scoring,
        }
    }

    /// Move a submission to `target`.
    ///
    /// Non-admins follow the rule table: the target must be reachable from
    /// the current status, the actor's role must be allowed, and the mapped
    /// phase must be current (an unconfigured phase number disables that
    /// gate). Admins bypass gating and reachability — the explicit escape
    /// hatch, which also covers demotions such as Winner back to Finalist —
    /// with one exception: a direct Submitted to Winner jump is never
    /// legal.
    #[instrument(skip(self, actor), fields(actor_role = %actor.role, target = %target))]
    pub async fn transition(
        &self,
        submission_id: Uuid,
        target: SubmissionStatus,
        actor: &Actor,
    ) -> Result<Submission, WorkflowError> {
        let now = self.clock.now();
        let mut submission = self
            .store
            .submission(submission_id)
            .await?
            .ok_or_else(|| WorkflowError::not_found("submission"))?;
        let from = submission.status;

        if target == from {
            return Err(WorkflowError::InvalidTransition { from, to: target });
        }

        if actor.is_admin() {
            if from == SubmissionStatus::Submitted && target == SubmissionStatus::Winner {
                return Err(WorkflowError::InvalidTransition { from, to: target });
            }
        } else {
            let rule = RULES
                .iter()
                .find(|r| r.target == target)
                .ok_or(WorkflowError::InvalidTransition { from, to: target })?;
            if !rule.from.contains(&from) {
                return Err(WorkflowError::InvalidTransition { from, to: target });
            }
            if !rule.roles.contains(&actor.role) {
                return Err(WorkflowError::Forbidden);
            }
            if let Some(required) = rule.required_phase {
                let phases = self.store.phases(submission.event_id).await?;
                check_phase_gate(&phases, required, now)?;
            }
        }

        submission.status = target;
        submission.updated_at = now;
        self.store.update_submission(submission.clone()).await?;

        info!(
            submission_id = %submission.id,
            from = %from,
            to = %target,
            "Applied submission transition"
        );
        Ok(submission)
    }

    /// Screen a submission: persist the reviewer's per-criterion marks and
    /// immediately derive the submission status from the approval
    /// percentage against the configured threshold.
    ///
    /// Evaluation insert and status update happen in one store transaction.
    /// A reviewer gets exactly one evaluation per submission; repeats fail
    /// with `AlreadyEvaluated` even under concurrent submission, because
    /// the uniqueness lives in the store.
    #[instrument(skip(self, actor, marks), fields(reviewer = %actor.id))]
    pub async fn submit_evaluation(
        &self,
        submission_id: Uuid,
        actor: &Actor,
        marks: Vec<CriterionMark>,
    ) -> Result<EvaluationOutcome, WorkflowError> {
        let now = self.clock.now();
        if marks.is_empty() {
            return Err(WorkflowError::validation(
                "an evaluation needs at least one criterion mark",
            ));
        }
        if !actor.role.is_staff() {
            return Err(WorkflowError::Forbidden);
        }

        let submission = self
            .store
            .submission(submission_id)
            .await?
            .ok_or_else(|| WorkflowError::not_found("submission"))?;

        // Finalists and winners are past screening.
        if matches!(
            submission.status,
            SubmissionStatus::Finalist | SubmissionStatus::Winner
        ) {
            return Err(WorkflowError::InvalidTransition {
                from: submission.status,
                to: SubmissionStatus::Approved,
            });
        }

        if self
            .store
            .has_evaluation(submission_id, actor.id)
            .await?
        {
            return Err(WorkflowError::AlreadyEvaluated);
        }

        if !actor.is_admin() {
            let phases = self.store.phases(submission.event_id).await?;
            check_phase_gate(&phases, 2, now)?;
        }

        let percentage = approval_percentage(&marks);
        let resulting_status = if percentage >= self.scoring.approval_threshold {
            SubmissionStatus::Approved
        } else {
            SubmissionStatus::Rejected
        };

        let evaluation = Evaluation {
            id: Uuid::new_v4(),
            submission_id,
            reviewer_id: actor.id,
            marks,
            approval_percentage: percentage,
            created_at: now,
        };

        let submission = match self
            .store
            .record_evaluation(evaluation.clone(), resulting_status, now)
            .await
        {
            Ok(submission) => submission,
            Err(StoreError::Conflict(_)) => return Err(WorkflowError::AlreadyEvaluated),
            Err(e) => return Err(e.into()),
        };

        info!(
            submission_id = %submission_id,
            approval_percentage = percentage,
            status = %resulting_status,
            "Recorded screening evaluation"
        );
        Ok(EvaluationOutcome {
            evaluation,
            submission,
        })
    }
}

impl std::fmt::Debug for SubmissionWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionWorkflow").finish_non_exhaustive()
    }
}
