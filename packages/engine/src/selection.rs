use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::{SubmissionStatus, VotePhase};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::WorkflowError;
use crate::models::{Actor, Category, FinalistEntry, SelectionResult};
use crate::store::DemodayStore;

/// One submission eligible for selection within a bucket.
#[derive(Debug, Clone)]
struct Candidate {
    submission_id: Uuid,
    project_id: Uuid,
    title: String,
    submitted_at: DateTime<Utc>,
    popular_votes: u32,
}

/// Order candidates by popular votes descending; ties break by submission
/// age (older first) and then project id, so re-runs over unchanged data
/// always produce the same list regardless of input order.
fn rank(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates.sort_by(|a, b| {
        b.popular_votes
            .cmp(&a.popular_votes)
            .then(a.submitted_at.cmp(&b.submitted_at))
            .then(a.project_id.cmp(&b.project_id))
    });
    candidates
}

/// Deterministic top-N selection of finalists per category, driven by
/// popular-vote tallies.
#[derive(Clone)]
pub struct FinalistSelector {
    store: Arc<dyn DemodayStore>,
    clock: Arc<dyn Clock>,
}

impl FinalistSelector {
    pub fn new(store: Arc<dyn DemodayStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Select the top finalists of every category (and the uncategorized
    /// bucket, capped by the event's own `max_finalists`).
    ///
    /// Idempotent: the full finalist set is recomputed from current
    /// tallies and applied through one atomic reset-then-reselect store
    /// operation, so stale finalists are demoted instead of accumulating
    /// past the cap. Previously selected finalists are therefore
    /// candidates again on every run.
    #[instrument(skip(self, actor))]
    pub async fn select_finalists(
        &self,
        actor: &Actor,
        event_id: Uuid,
    ) -> Result<Vec<SelectionResult>, WorkflowError> {
        if !actor.is_admin() {
            return Err(WorkflowError::Forbidden);
        }
        let now = self.clock.now();
        let event = self
            .store
            .event(event_id)
            .await?
            .ok_or_else(|| WorkflowError::not_found("event"))?;

        let categories = self.store.categories(event_id).await?;
        let submissions = self.store.submissions_for_event(event_id).await?;

        // Bucket candidates by the owning project's category.
        let mut buckets: HashMap<Option<Uuid>, Vec<Candidate>> = HashMap::new();
        for submission in submissions {
            if !matches!(
                submission.status,
                SubmissionStatus::Approved | SubmissionStatus::Finalist
            ) {
                continue;
            }
            let project = self
                .store
                .project(submission.project_id)
                .await?
                .ok_or_else(|| WorkflowError::not_found("project"))?;
            let popular_votes = self
                .store
                .count_votes(project.id, event_id, VotePhase::Popular)
                .await?;
            buckets
                .entry(project.category_id)
                .or_default()
                .push(Candidate {
                    submission_id: submission.id,
                    project_id: project.id,
                    title: project.title,
                    submitted_at: submission.created_at,
                    popular_votes,
                });
        }

        let mut results = Vec::with_capacity(categories.len() + 1);
        let mut selected_ids: Vec<Uuid> = Vec::new();

        let bucket_result = |category: Option<&Category>,
                             candidates: Vec<Candidate>,
                             selected_ids: &mut Vec<Uuid>| {
            let cap = category.map_or(event.max_finalists, |c| c.max_finalists);
            let ranked = rank(candidates);
            let finalists: Vec<FinalistEntry> = ranked
                .into_iter()
                .take(cap as usize)
                .map(|c| FinalistEntry {
                    submission_id: c.submission_id,
                    project_id: c.project_id,
                    title: c.title,
                    popular_votes: c.popular_votes,
                })
                .collect();
            selected_ids.extend(finalists.iter().map(|f| f.submission_id));
            SelectionResult {
                category_id: category.map(|c| c.id),
                category_name: category.map(|c| c.name.clone()),
                max_finalists: cap,
                selected: finalists.len(),
                finalists,
            }
        };

        for category in &categories {
            let candidates = buckets.remove(&Some(category.id)).unwrap_or_default();
            results.push(bucket_result(Some(category), candidates, &mut selected_ids));
        }
        let uncategorized = buckets.remove(&None).unwrap_or_default();
        results.push(bucket_result(None, uncategorized, &mut selected_ids));

        self.store
            .replace_finalists(event_id, &selected_ids, now)
            .await?;

        info!(
            event_id = %event_id,
            finalists = selected_ids.len(),
            buckets = results.len(),
            "Replaced finalist set"
        );
        Ok(results)
    }
}

impl std::fmt::Debug for FinalistSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinalistSelector").finish_non_exhaustive()
    }
}
