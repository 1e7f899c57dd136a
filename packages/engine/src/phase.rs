use chrono::{DateTime, Utc};

use crate::models::Phase;

/// Resolve the phase whose inclusive window contains `now`.
///
/// Phases are scanned in ascending `number` order and the first match wins,
/// so a misconfigured event with overlapping windows still resolves
/// deterministically. Gaps between windows resolve to `None`.
pub fn current_phase(phases: &[Phase], now: DateTime<Utc>) -> Option<&Phase> {
    let mut ordered: Vec<&Phase> = phases.iter().collect();
    ordered.sort_by_key(|p| p.number);
    ordered.into_iter().find(|p| p.contains(now))
}

/// Check that `required` is the current phase number.
///
/// An event that never configured a phase with that number is ungated for
/// it; once the number exists, the resolved current phase must be it.
pub fn check_phase_gate(
    phases: &[Phase],
    required: u8,
    now: DateTime<Utc>,
) -> Result<(), crate::error::WorkflowError> {
    if !phases.iter().any(|p| p.number == required) {
        return Ok(());
    }
    match current_phase(phases, now) {
        Some(p) if p.number == required => Ok(()),
        _ => Err(crate::error::WorkflowError::OutOfPhaseWindow { required }),
    }
}

/// Strict variant: `required` must be configured AND current.
pub fn require_phase(
    phases: &[Phase],
    required: u8,
    now: DateTime<Utc>,
) -> Result<(), crate::error::WorkflowError> {
    match current_phase(phases, now) {
        Some(p) if p.number == required => Ok(()),
        _ => Err(crate::error::WorkflowError::OutOfPhaseWindow { required }),
    }
}
