//! Core engine of the Demoday showcase platform.
//!
//! Everything here is plain domain logic behind the [`store::DemodayStore`]
//! trait: event lifecycle and phase calendars, project submission,
//! screening evaluations, the phase-gated status workflow, the vote ledger,
//! finalist selection, and results aggregation. Authentication and
//! transport live outside; callers pass an already-identified
//! [`models::Actor`] into each gated operation.

pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod models;
pub mod phase;
pub mod results;
pub mod selection;
pub mod store;
pub mod submissions;
pub mod voting;
pub mod workflow;

pub use clock::{Clock, SystemClock};
pub use config::ScoringConfig;
pub use error::WorkflowError;
pub use events::EventAdmin;
pub use results::ResultsAggregator;
pub use selection::FinalistSelector;
pub use submissions::SubmissionService;
pub use voting::VoteLedger;
pub use workflow::SubmissionWorkflow;
