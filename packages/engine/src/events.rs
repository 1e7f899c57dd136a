use std::collections::HashSet;
use std::sync::Arc;

use common::EventStatus;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::WorkflowError;
use crate::models::{Actor, Category, Event, NewCategory, NewEvent, Phase, PhaseSpec};
use crate::store::DemodayStore;

/// Event lifecycle administration: creation, activation, phase calendar
/// edits, categories, and teardown. Every operation is admin-only.
#[derive(Clone)]
pub struct EventAdmin {
    store: Arc<dyn DemodayStore>,
    clock: Arc<dyn Clock>,
}

impl EventAdmin {
    pub fn new(store: Arc<dyn DemodayStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Create an event. New events start inactive; activation is a separate
    /// explicit step so the phase calendar can be configured first.
    #[instrument(skip(self, actor, input), fields(name = %input.name))]
    pub async fn create_event(&self, actor: &Actor, input: NewEvent) -> Result<Event, WorkflowError> {
        require_admin(actor)?;
        if input.name.trim().is_empty() {
            return Err(WorkflowError::validation("event name must not be empty"));
        }
        let now = self.clock.now();
        let event = Event {
            id: Uuid::new_v4(),
            name: input.name,
            active: false,
            status: EventStatus::Active,
            max_finalists: input.max_finalists,
            created_at: now,
            updated_at: now,
        };
        self.store.insert_event(event.clone()).await?;
        info!(event_id = %event.id, "Created event");
        Ok(event)
    }

    /// Make this event the active one, deactivating any other.
    #[instrument(skip(self, actor))]
    pub async fn activate_event(&self, actor: &Actor, event_id: Uuid) -> Result<Event, WorkflowError> {
        require_admin(actor)?;
        let event = self
            .store
            .event(event_id)
            .await?
            .ok_or_else(|| WorkflowError::not_found("event"))?;
        if event.status != EventStatus::Active {
            return Err(WorkflowError::validation(format!(
                "cannot activate an event with status {}",
                event.status
            )));
        }
        let event = self
            .store
            .activate_exclusively(event_id, self.clock.now())
            .await?;
        info!(event_id = %event.id, "Activated event");
        Ok(event)
    }

    /// Close out a completed event. Its data stays queryable for results.
    #[instrument(skip(self, actor))]
    pub async fn finish_event(&self, actor: &Actor, event_id: Uuid) -> Result<Event, WorkflowError> {
        require_admin(actor)?;
        let mut event = self
            .store
            .event(event_id)
            .await?
            .ok_or_else(|| WorkflowError::not_found("event"))?;
        event.status = EventStatus::Finished;
        event.active = false;
        event.updated_at = self.clock.now();
        self.store.update_event(event.clone()).await?;
        info!(event_id = %event.id, "Finished event");
        Ok(event)
    }

    /// Cancel an event and delete everything hanging off it. Irreversible.
    #[instrument(skip(self, actor))]
    pub async fn cancel_event(&self, actor: &Actor, event_id: Uuid) -> Result<(), WorkflowError> {
        require_admin(actor)?;
        if !self.store.delete_event(event_id).await? {
            return Err(WorkflowError::not_found("event"));
        }
        info!(event_id = %event_id, "Canceled event");
        Ok(())
    }

    /// Replace the event's phase calendar wholesale.
    ///
    /// Each window must be well-formed (`starts_at <= ends_at`), numbers
    /// must be unique and in 1..=4. Windows may still overlap or leave
    /// gaps; the resolver handles both.
    #[instrument(skip(self, actor, specs))]
    pub async fn set_phases(
        &self,
        actor: &Actor,
        event_id: Uuid,
        specs: Vec<PhaseSpec>,
    ) -> Result<Vec<Phase>, WorkflowError> {
        require_admin(actor)?;
        self.store
            .event(event_id)
            .await?
            .ok_or_else(|| WorkflowError::not_found("event"))?;

        let mut seen = HashSet::new();
        for spec in &specs {
            if !(1..=4).contains(&spec.number) {
                return Err(WorkflowError::validation(format!(
                    "phase number {} is outside 1..=4",
                    spec.number
                )));
            }
            if !seen.insert(spec.number) {
                return Err(WorkflowError::validation(format!(
                    "duplicate phase number {}",
                    spec.number
                )));
            }
            if spec.starts_at > spec.ends_at {
                return Err(WorkflowError::validation(format!(
                    "phase {} starts after it ends",
                    spec.number
                )));
            }
        }

        let phases: Vec<Phase> = specs
            .into_iter()
            .map(|spec| Phase {
                id: Uuid::new_v4(),
                event_id,
                number: spec.number,
                name: spec.name,
                description: spec.description,
                starts_at: spec.starts_at,
                ends_at: spec.ends_at,
            })
            .collect();

        self.store.replace_phases(event_id, phases.clone()).await?;
        info!(event_id = %event_id, count = phases.len(), "Replaced phase calendar");
        Ok(phases)
    }

    /// Add a category with its own finalist cap.
    #[instrument(skip(self, actor, input), fields(name = %input.name))]
    pub async fn add_category(
        &self,
        actor: &Actor,
        event_id: Uuid,
        input: NewCategory,
    ) -> Result<Category, WorkflowError> {
        require_admin(actor)?;
        self.store
            .event(event_id)
            .await?
            .ok_or_else(|| WorkflowError::not_found("event"))?;
        if input.name.trim().is_empty() {
            return Err(WorkflowError::validation("category name must not be empty"));
        }
        let category = Category {
            id: Uuid::new_v4(),
            event_id,
            name: input.name,
            max_finalists: input.max_finalists,
        };
        self.store.insert_category(category.clone()).await?;
        info!(category_id = %category.id, "Added category");
        Ok(category)
    }
}

fn require_admin(actor: &Actor) -> Result<(), WorkflowError> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(WorkflowError::Forbidden)
    }
}

impl std::fmt::Debug for EventAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventAdmin").finish_non_exhaustive()
    }
}
