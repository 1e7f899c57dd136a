use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a showcase event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    /// Running. At most one event is active system-wide.
    Active,
    /// Concluded normally. Terminal.
    Finished,
    /// Aborted; a canceled event is deleted outright.
    Canceled,
}

impl EventStatus {
    /// All possible event statuses.
    pub const ALL: &'static [EventStatus] = &[Self::Active, Self::Finished, Self::Canceled];

    /// Returns the string representation (snake_case).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Finished => "finished",
            Self::Canceled => "canceled",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an invalid event status string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEventStatusError {
    invalid: String,
}

impl fmt::Display for ParseEventStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid event status '{}'. Valid values: active, finished, canceled",
            self.invalid
        )
    }
}

impl std::error::Error for ParseEventStatusError {}

impl FromStr for EventStatus {
    type Err = ParseEventStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "finished" => Ok(Self::Finished),
            "canceled" => Ok(Self::Canceled),
            _ => Err(ParseEventStatusError {
                invalid: s.to_string(),
            }),
        }
    }
}
