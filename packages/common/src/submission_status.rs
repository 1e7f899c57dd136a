use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status of a project submission during an event cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum SubmissionStatus {
    /// Submitted during phase 1, waiting for screening.
    Submitted,
    /// Passed screening; eligible for popular voting and finalist selection.
    Approved,
    /// Failed screening. Terminal under normal flow.
    Rejected,
    /// Selected for the final round.
    Finalist,
    /// Won the event. Terminal under normal flow.
    Winner,
}

impl SubmissionStatus {
    /// Returns true if no further non-admin transition leaves this status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Winner)
    }

    /// Returns true if the submission may receive popular-phase votes.
    ///
    /// Finalists stay votable so that running finalist selection mid-phase
    /// does not close the popular ballot for the projects it promoted.
    pub fn accepts_popular_votes(&self) -> bool {
        matches!(self, Self::Approved | Self::Finalist)
    }

    /// Returns true if the submission may receive final-phase votes.
    pub fn accepts_final_votes(&self) -> bool {
        matches!(self, Self::Finalist)
    }

    /// All possible status values.
    pub const ALL: &'static [SubmissionStatus] = &[
        Self::Submitted,
        Self::Approved,
        Self::Rejected,
        Self::Finalist,
        Self::Winner,
    ];

    /// Returns the string representation (PascalCase).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submitted => "Submitted",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::Finalist => "Finalist",
            Self::Winner => "Winner",
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for SubmissionStatus {
    fn default() -> Self {
        Self::Submitted
    }
}

/// Error when parsing an invalid status string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStatusError {
    invalid: String,
}

impl fmt::Display for ParseStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid status '{}'. Valid values: {}",
            self.invalid,
            SubmissionStatus::ALL
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl std::error::Error for ParseStatusError {}

impl FromStr for SubmissionStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Submitted" => Ok(Self::Submitted),
            "Approved" => Ok(Self::Approved),
            "Rejected" => Ok(Self::Rejected),
            "Finalist" => Ok(Self::Finalist),
            "Winner" => Ok(Self::Winner),
            _ => Err(ParseStatusError {
                invalid: s.to_string(),
            }),
        }
    }
}
