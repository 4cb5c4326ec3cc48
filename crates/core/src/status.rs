//! Subject status - completion state and its point value.

use serde::{Deserialize, Serialize};

/// Completion state of a subject.
///
/// Persisted with the vocabulary used by the front end (`"Pas fait"`,
/// `"En cours"`, `"Done"`). Strings that match neither vocabulary are kept
/// verbatim in [`SubjectStatus::Other`] so that hand-edited files survive a
/// round trip; they score zero points.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SubjectStatus {
    /// Not started yet
    NotStarted,
    /// Being worked on
    InProgress,
    /// Completed
    Done,
    /// Free-form label outside the known vocabulary
    Other(String),
}

impl SubjectStatus {
    /// Parse one of the known status names.
    ///
    /// Accepts both the persisted names and the kebab-case API names,
    /// ignoring case and surrounding whitespace.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pas fait" | "not-started" | "not started" => Some(Self::NotStarted),
            "en cours" | "in-progress" | "in progress" => Some(Self::InProgress),
            "done" => Some(Self::Done),
            _ => None,
        }
    }

    /// Persisted name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::NotStarted => "Pas fait",
            Self::InProgress => "En cours",
            Self::Done => "Done",
            Self::Other(s) => s,
        }
    }

    /// Points this status contributes to a module's daily total.
    pub fn points(&self) -> u32 {
        match self {
            Self::Done => 2,
            Self::InProgress => 1,
            Self::NotStarted | Self::Other(_) => 0,
        }
    }

    /// Whether this is one of the three known states.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl Default for SubjectStatus {
    fn default() -> Self {
        Self::NotStarted
    }
}

impl std::fmt::Display for SubjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for SubjectStatus {
    fn from(s: String) -> Self {
        Self::parse(&s).unwrap_or(Self::Other(s))
    }
}

impl From<SubjectStatus> for String {
    fn from(status: SubjectStatus) -> Self {
        match status {
            SubjectStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}
