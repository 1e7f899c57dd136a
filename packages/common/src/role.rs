use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of an actor, as supplied by the external identity provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Professor,
    StudentUfba,
    StudentExternal,
}

impl Role {
    /// Returns true for roles that screen submissions.
    pub fn is_staff(&self) -> bool {
        matches!(self, Self::Admin | Self::Professor)
    }

    /// All possible role values.
    pub const ALL: &'static [Role] = &[
        Self::Admin,
        Self::Professor,
        Self::StudentUfba,
        Self::StudentExternal,
    ];

    /// Returns the string representation (snake_case).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Professor => "professor",
            Self::StudentUfba => "student_ufba",
            Self::StudentExternal => "student_external",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an invalid role string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRoleError {
    invalid: String,
}

impl fmt::Display for ParseRoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid role '{}'. Valid values: {}",
            self.invalid,
            Role::ALL
                .iter()
                .map(|r| r.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl std::error::Error for ParseRoleError {}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "professor" => Ok(Self::Professor),
            "student_ufba" => Ok(Self::StudentUfba),
            "student_external" => Ok(Self::StudentExternal),
            _ => Err(ParseRoleError {
                invalid: s.to_string(),
            }),
        }
    }
}
