use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{EventStatus, SubmissionStatus, VotePhase};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{DemodayStore, StoreError};
use crate::models::{Category, Evaluation, Event, Phase, Project, Submission, Vote};

#[derive(Default)]
struct State {
    events: HashMap<Uuid, Event>,
    /// event_id -> phases, kept sorted by number.
    phases: HashMap<Uuid, Vec<Phase>>,
    categories: HashMap<Uuid, Category>,
    projects: HashMap<Uuid, Project>,
    submissions: HashMap<Uuid, Submission>,
    votes: Vec<Vote>,
    evaluations: Vec<Evaluation>,
}

/// In-memory reference store.
///
/// Every trait method runs under a single write or read guard, which gives
/// each compound operation the same atomicity a transactional backend
/// would.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn vote_conflicts(existing: &Vote, candidate: &Vote) -> bool {
    if existing.event_id != candidate.event_id
        || existing.phase != candidate.phase
        || existing.voter_id != candidate.voter_id
    {
        return false;
    }
    match candidate.phase {
        // One popular vote per (voter, project).
        VotePhase::Popular => existing.project_id == candidate.project_id,
        // One final vote per voter, for any project.
        VotePhase::Final => true,
    }
}

#[async_trait]
impl DemodayStore for MemoryStore {
    async fn insert_event(&self, event: Event) -> Result<(), StoreError> {
        let mut state = self.inner.write().await;
        if state.events.contains_key(&event.id) {
            return Err(StoreError::Conflict(format!("event {}", event.id)));
        }
        state.events.insert(event.id, event);
        Ok(())
    }

    async fn event(&self, id: Uuid) -> Result<Option<Event>, StoreError> {
        Ok(self.inner.read().await.events.get(&id).cloned())
    }

    async fn active_event(&self) -> Result<Option<Event>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .events
            .values()
            .find(|e| e.active)
            .cloned())
    }

    async fn update_event(&self, event: Event) -> Result<(), StoreError> {
        let mut state = self.inner.write().await;
        match state.events.get_mut(&event.id) {
            Some(slot) => {
                *slot = event;
                Ok(())
            }
            None => Err(StoreError::NotFound(format!("event {}", event.id))),
        }
    }

    async fn delete_event(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut state = self.inner.write().await;
        if state.events.remove(&id).is_none() {
            return Ok(false);
        }
        state.phases.remove(&id);
        state.categories.retain(|_, c| c.event_id != id);
        let removed: Vec<Uuid> = state
            .submissions
            .values()
            .filter(|s| s.event_id == id)
            .map(|s| s.id)
            .collect();
        state.submissions.retain(|_, s| s.event_id != id);
        state.votes.retain(|v| v.event_id != id);
        state
            .evaluations
            .retain(|e| !removed.contains(&e.submission_id));
        Ok(true)
    }

    async fn activate_exclusively(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Event, StoreError> {
        let mut state = self.inner.write().await;
        if !state.events.contains_key(&id) {
            return Err(StoreError::NotFound(format!("event {id}")));
        }
        let mut activated = None;
        for event in state.events.values_mut() {
            if event.id == id {
                event.active = true;
                event.status = EventStatus::Active;
                event.updated_at = now;
                activated = Some(event.clone());
            } else if event.active {
                event.active = false;
                event.updated_at = now;
            }
        }
        activated.ok_or_else(|| StoreError::NotFound(format!("event {id}")))
    }

    async fn phases(&self, event_id: Uuid) -> Result<Vec<Phase>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .phases
            .get(&event_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn replace_phases(&self, event_id: Uuid, phases: Vec<Phase>) -> Result<(), StoreError> {
        let mut state = self.inner.write().await;
        if !state.events.contains_key(&event_id) {
            return Err(StoreError::NotFound(format!("event {event_id}")));
        }
        let mut phases = phases;
        phases.sort_by_key(|p| p.number);
        state.phases.insert(event_id, phases);
        Ok(())
    }

    async fn insert_category(&self, category: Category) -> Result<(), StoreError> {
        let mut state = self.inner.write().await;
        if state.categories.contains_key(&category.id) {
            return Err(StoreError::Conflict(format!("category {}", category.id)));
        }
        state.categories.insert(category.id, category);
        Ok(())
    }

    async fn category(&self, id: Uuid) -> Result<Option<Category>, StoreError> {
        Ok(self.inner.read().await.categories.get(&id).cloned())
    }

    async fn categories(&self, event_id: Uuid) -> Result<Vec<Category>, StoreError> {
        let state = self.inner.read().await;
        let mut out: Vec<Category> = state
            .categories
            .values()
            .filter(|c| c.event_id == event_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }

    async fn insert_project(&self, project: Project) -> Result<(), StoreError> {
        let mut state = self.inner.write().await;
        if state.projects.contains_key(&project.id) {
            return Err(StoreError::Conflict(format!("project {}", project.id)));
        }
        state.projects.insert(project.id, project);
        Ok(())
    }

    async fn project(&self, id: Uuid) -> Result<Option<Project>, StoreError> {
        Ok(self.inner.read().await.projects.get(&id).cloned())
    }

    async fn update_project(&self, project: Project) -> Result<(), StoreError> {
        let mut state = self.inner.write().await;
        match state.projects.get_mut(&project.id) {
            Some(slot) => {
                *slot = project;
                Ok(())
            }
            None => Err(StoreError::NotFound(format!("project {}", project.id))),
        }
    }

    async fn insert_submission(&self, submission: Submission) -> Result<(), StoreError> {
        let mut state = self.inner.write().await;
        let duplicate = state.submissions.values().any(|s| {
            s.project_id == submission.project_id && s.event_id == submission.event_id
        });
        if duplicate {
            return Err(StoreError::Conflict(format!(
                "submission for project {} in event {}",
                submission.project_id, submission.event_id
            )));
        }
        state.submissions.insert(submission.id, submission);
        Ok(())
    }

    async fn submission(&self, id: Uuid) -> Result<Option<Submission>, StoreError> {
        Ok(self.inner.read().await.submissions.get(&id).cloned())
    }

    async fn submission_for_project(
        &self,
        event_id: Uuid,
        project_id: Uuid,
    ) -> Result<Option<Submission>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .submissions
            .values()
            .find(|s| s.event_id == event_id && s.project_id == project_id)
            .cloned())
    }

    async fn submissions_for_event(&self, event_id: Uuid) -> Result<Vec<Submission>, StoreError> {
        let state = self.inner.read().await;
        let mut out: Vec<Submission> = state
            .submissions
            .values()
            .filter(|s| s.event_id == event_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(out)
    }

    async fn submissions_for_project(
        &self,
        project_id: Uuid,
    ) -> Result<Vec<Submission>, StoreError> {
        let state = self.inner.read().await;
        let mut out: Vec<Submission> = state
            .submissions
            .values()
            .filter(|s| s.project_id == project_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(out)
    }

    async fn update_submission(&self, submission: Submission) -> Result<(), StoreError> {
        let mut state = self.inner.write().await;
        match state.submissions.get_mut(&submission.id) {
            Some(slot) => {
                *slot = submission;
                Ok(())
            }
            None => Err(StoreError::NotFound(format!(
                "submission {}",
                submission.id
            ))),
        }
    }

    async fn delete_submission(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut state = self.inner.write().await;
        if state.submissions.remove(&id).is_none() {
            return Ok(false);
        }
        state.evaluations.retain(|e| e.submission_id != id);
        Ok(true)
    }

    async fn replace_finalists(
        &self,
        event_id: Uuid,
        finalists: &[Uuid],
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut state = self.inner.write().await;
        for submission in state.submissions.values_mut() {
            if submission.event_id != event_id {
                continue;
            }
            let should_be_finalist = finalists.contains(&submission.id);
            if submission.status == SubmissionStatus::Finalist && !should_be_finalist {
                submission.status = SubmissionStatus::Approved;
                submission.updated_at = now;
            } else if should_be_finalist && submission.status != SubmissionStatus::Finalist {
                submission.status = SubmissionStatus::Finalist;
                submission.updated_at = now;
            }
        }
        Ok(())
    }

    async fn insert_vote(&self, vote: Vote) -> Result<(), StoreError> {
        let mut state = self.inner.write().await;
        if state.votes.iter().any(|v| vote_conflicts(v, &vote)) {
            return Err(StoreError::Conflict(format!(
                "{} vote by {}",
                vote.phase, vote.voter_id
            )));
        }
        state.votes.push(vote);
        Ok(())
    }

    async fn delete_vote(
        &self,
        voter_id: Uuid,
        project_id: Uuid,
        event_id: Uuid,
        phase: VotePhase,
    ) -> Result<bool, StoreError> {
        let mut state = self.inner.write().await;
        let before = state.votes.len();
        state.votes.retain(|v| {
            !(v.voter_id == voter_id
                && v.project_id == project_id
                && v.event_id == event_id
                && v.phase == phase)
        });
        Ok(state.votes.len() < before)
    }

    async fn count_votes(
        &self,
        project_id: Uuid,
        event_id: Uuid,
        phase: VotePhase,
    ) -> Result<u32, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .votes
            .iter()
            .filter(|v| v.project_id == project_id && v.event_id == event_id && v.phase == phase)
            .map(|v| v.weight)
            .sum())
    }

    async fn votes_for_event(&self, event_id: Uuid) -> Result<Vec<Vote>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .votes
            .iter()
            .filter(|v| v.event_id == event_id)
            .cloned()
            .collect())
    }

    async fn has_evaluation(
        &self,
        submission_id: Uuid,
        reviewer_id: Uuid,
    ) -> Result<bool, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .evaluations
            .iter()
            .any(|e| e.submission_id == submission_id && e.reviewer_id == reviewer_id))
    }

    async fn record_evaluation(
        &self,
        evaluation: Evaluation,
        resulting_status: SubmissionStatus,
        now: DateTime<Utc>,
    ) -> Result<Submission, StoreError> {
        let mut state = self.inner.write().await;
        let duplicate = state.evaluations.iter().any(|e| {
            e.submission_id == evaluation.submission_id && e.reviewer_id == evaluation.reviewer_id
        });
        if duplicate {
            return Err(StoreError::Conflict(format!(
                "evaluation of {} by {}",
                evaluation.submission_id, evaluation.reviewer_id
            )));
        }
        let submission = state
            .submissions
            .get_mut(&evaluation.submission_id)
            .ok_or_else(|| {
                StoreError::NotFound(format!("submission {}", evaluation.submission_id))
            })?;
        submission.status = resulting_status;
        submission.updated_at = now;
        let updated = submission.clone();
        state.evaluations.push(evaluation);
        Ok(updated)
    }
}
