use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use common::{SubmissionStatus, VotePhase};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::config::ScoringConfig;
use crate::error::WorkflowError;
use crate::models::{Actor, EventResults, EventStats, ProjectStanding, Vote};
use crate::store::DemodayStore;
use crate::workflow::SubmissionWorkflow;

/// Per-project tallies accumulated from the raw vote list.
#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    popular: u32,
    final_weighted: u32,
}

fn tally_votes(votes: &[Vote], scoring: &ScoringConfig) -> HashMap<Uuid, Tally> {
    let mut tallies: HashMap<Uuid, Tally> = HashMap::new();
    for vote in votes {
        let tally = tallies.entry(vote.project_id).or_default();
        match vote.phase {
            VotePhase::Popular => tally.popular += vote.weight,
            VotePhase::Final => {
                tally.final_weighted += vote.weight * scoring.final_weight(vote.voter_role);
            }
        }
    }
    tallies
}

/// Computes the ranked results view of an event and, once a ranking
/// exists, crowns the winner.
#[derive(Clone)]
pub struct ResultsAggregator {
    store: Arc<dyn DemodayStore>,
    workflow: SubmissionWorkflow,
    scoring: ScoringConfig,
}

impl ResultsAggregator {
    pub fn new(
        store: Arc<dyn DemodayStore>,
        workflow: SubmissionWorkflow,
        scoring: ScoringConfig,
    ) -> Self {
        Self {
            store,
            workflow,
            scoring,
        }
    }

    /// Build the full ranked standings of an event.
    ///
    /// A project's score is its popular tally plus its final-phase weight
    /// sum with per-role multipliers applied. If no winner exists yet, the
    /// highest-ranked finalist is promoted to winner through the regular
    /// transition path, so the crowning shows up in the submission's
    /// history like any other status change.
    #[instrument(skip(self))]
    pub async fn compute_results(&self, event_id: Uuid) -> Result<EventResults, WorkflowError> {
        self.store
            .event(event_id)
            .await?
            .ok_or_else(|| WorkflowError::not_found("event"))?;

        let submissions = self.store.submissions_for_event(event_id).await?;
        let votes = self.store.votes_for_event(event_id).await?;
        let tallies = tally_votes(&votes, &self.scoring);

        let mut participants: HashSet<Uuid> = HashSet::new();
        let mut standings = Vec::with_capacity(submissions.len());
        let mut sort_keys: HashMap<Uuid, chrono::DateTime<chrono::Utc>> = HashMap::new();

        for submission in &submissions {
            let project = self
                .store
                .project(submission.project_id)
                .await?
                .ok_or_else(|| WorkflowError::not_found("project"))?;
            participants.insert(project.owner_id);

            let tally = tallies.get(&project.id).copied().unwrap_or_default();
            let final_score = tally.popular + tally.final_weighted;

            sort_keys.insert(submission.id, submission.created_at);
            standings.push(ProjectStanding {
                submission_id: submission.id,
                project_id: project.id,
                title: project.title,
                status: submission.status,
                popular_votes: tally.popular,
                final_score,
            });
        }

        standings.sort_by(|a, b| {
            b.final_score
                .cmp(&a.final_score)
                .then(b.popular_votes.cmp(&a.popular_votes))
                .then(sort_keys[&a.submission_id].cmp(&sort_keys[&b.submission_id]))
                .then(a.project_id.cmp(&b.project_id))
        });

        self.crown_winner(&mut standings, &submissions).await?;

        let stats = EventStats {
            submissions: submissions.len(),
            participants: participants.len(),
            popular_votes: votes
                .iter()
                .filter(|v| v.phase == VotePhase::Popular)
                .map(|v| v.weight)
                .sum(),
            final_votes: votes
                .iter()
                .filter(|v| v.phase == VotePhase::Final)
                .map(|v| v.weight)
                .sum(),
        };

        Ok(EventResults {
            event_id,
            standings,
            stats,
        })
    }

    async fn crown_winner(
        &self,
        standings: &mut [ProjectStanding],
        submissions: &[crate::models::Submission],
    ) -> Result<(), WorkflowError> {
        if submissions
            .iter()
            .any(|s| s.status == SubmissionStatus::Winner)
        {
            return Ok(());
        }
        // The crown goes to the best-ranked finalist, which is not
        // necessarily the top standing overall: an approved project can
        // outscore every finalist on popular votes alone.
        let Some(top) = standings
            .iter_mut()
            .find(|s| s.status == SubmissionStatus::Finalist)
        else {
            return Ok(());
        };
        self.workflow
            .transition(top.submission_id, SubmissionStatus::Winner, &Actor::system())
            .await?;
        top.status = SubmissionStatus::Winner;
        info!(submission_id = %top.submission_id, "Crowned event winner");
        Ok(())
    }
}

impl std::fmt::Debug for ResultsAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultsAggregator").finish_non_exhaustive()
    }
}
