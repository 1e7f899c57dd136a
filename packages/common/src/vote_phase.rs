use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which ballot a vote belongs to.
///
/// Each ballot is bound to one numbered event phase: popular voting runs in
/// phase 3, final voting in phase 4.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VotePhase {
    Popular,
    Final,
}

impl VotePhase {
    /// The event phase number during which this ballot is open.
    pub fn phase_number(&self) -> u8 {
        match self {
            Self::Popular => 3,
            Self::Final => 4,
        }
    }

    /// All possible vote phases.
    pub const ALL: &'static [VotePhase] = &[Self::Popular, Self::Final];

    /// Returns the string representation (snake_case).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Popular => "popular",
            Self::Final => "final",
        }
    }
}

impl fmt::Display for VotePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an invalid vote phase string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseVotePhaseError {
    invalid: String,
}

impl fmt::Display for ParseVotePhaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid vote phase '{}'. Valid values: popular, final",
            self.invalid
        )
    }
}

impl std::error::Error for ParseVotePhaseError {}

impl FromStr for VotePhase {
    type Err = ParseVotePhaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "popular" => Ok(Self::Popular),
            "final" => Ok(Self::Final),
            _ => Err(ParseVotePhaseError {
                invalid: s.to_string(),
            }),
        }
    }
}
