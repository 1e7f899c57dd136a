pub mod event_status;
pub mod role;
pub mod submission_status;
pub mod vote_phase;

pub use event_status::EventStatus;
pub use role::Role;
pub use submission_status::SubmissionStatus;
pub use vote_phase::VotePhase;
