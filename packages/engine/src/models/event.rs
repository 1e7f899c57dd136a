use chrono::{DateTime, Utc};
use common::EventStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One showcase instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    /// At most one event is active system-wide; enforced by
    /// `DemodayStore::activate_exclusively`.
    pub active: bool,
    pub status: EventStatus,
    /// Finalist cap for projects without a category.
    pub max_finalists: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A time-bounded phase of an event. Window bounds are inclusive.
///
/// Phases are replaced wholesale when edited; the resolver tolerates gaps
/// and overlaps between windows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Phase {
    pub id: Uuid,
    pub event_id: Uuid,
    /// 1 = submission, 2 = screening, 3 = popular vote, 4 = final vote.
    pub number: u8,
    pub name: String,
    pub description: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

impl Phase {
    /// Returns true if the inclusive window contains `now`.
    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        self.starts_at <= now && now <= self.ends_at
    }
}

/// Optional grouping of projects within an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    /// Overrides the event-level finalist cap for this category.
    pub max_finalists: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewEvent {
    pub name: String,
    pub max_finalists: u32,
}

/// Input for the wholesale phase replacement.
#[derive(Debug, Clone, Deserialize)]
pub struct PhaseSpec {
    pub number: u8,
    pub name: String,
    pub description: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub max_finalists: u32,
}
