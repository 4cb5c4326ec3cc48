//! Module model - a named topic grouping subjects.

use serde::{Deserialize, Serialize};
use crate::status::SubjectStatus;

/// A named learning item with a status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Subject name, unique within its module
    pub name: String,

    /// Completion state
    pub status: SubjectStatus,
}

impl Subject {
    /// Create a subject.
    pub fn new(name: impl Into<String>, status: SubjectStatus) -> Self {
        Self {
            name: name.into(),
            status,
        }
    }
}

/// A module holds an ordered list of subjects.
///
/// The module name is the key of the enclosing map, not a field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    /// Subjects in insertion order
    #[serde(default)]
    pub subjects: Vec<Subject>,
}

impl Module {
    /// Build a module whose subjects all start at the given status.
    pub fn with_subjects<I, S>(names: I, status: SubjectStatus) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            subjects: names
                .into_iter()
                .map(|n| Subject::new(n, status.clone()))
                .collect(),
        }
    }

    /// Look up a subject by exact name.
    pub fn subject(&self, name: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.name == name)
    }

    /// Set a subject's status, appending the subject if it is missing.
    ///
    /// Returns `true` when the subject was created.
    pub fn upsert_subject(&mut self, name: &str, status: SubjectStatus) -> bool {
        match self.subjects.iter_mut().find(|s| s.name == name) {
            Some(subject) => {
                subject.status = status;
                false
            }
            None => {
                self.subjects.push(Subject::new(name, status));
                true
            }
        }
    }

    /// Remove a subject by exact name.
    pub fn remove_subject(&mut self, name: &str) -> Option<Subject> {
        let index = self.subjects.iter().position(|s| s.name == name)?;
        Some(self.subjects.remove(index))
    }

    /// Sum of the points of every subject.
    pub fn points(&self) -> u32 {
        self.subjects.iter().map(|s| s.status.points()).sum()
    }

    /// Reset every subject to not started. Returns how many changed.
    pub fn reset_statuses(&mut self) -> usize {
        let mut changed = 0;
        for subject in &mut self.subjects {
            if subject.status != SubjectStatus::NotStarted {
                subject.status = SubjectStatus::NotStarted;
                changed += 1;
            }
        }
        changed
    }
}
