//! Read models handed out by the progress store.

use serde::{Deserialize, Serialize};
use crate::document::HistoricalBucket;
use crate::module::Module;
use crate::status::SubjectStatus;

/// One module together with its point history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleView {
    /// Module name
    pub name: String,

    /// Current subjects
    pub current: Module,

    /// Daily point totals, empty if none were recorded
    pub historical: HistoricalBucket,
}

/// Status counts and today's points for one module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSummary {
    /// Module name
    pub name: String,

    /// Number of subjects
    pub total: usize,

    /// Subjects not started (unknown statuses included)
    pub not_started: usize,

    /// Subjects in progress
    pub in_progress: usize,

    /// Subjects done
    pub done: usize,

    /// Current point total
    pub points: u32,

    /// Highest reachable point total
    pub max_points: u32,
}

impl ModuleSummary {
    /// Summarize a module.
    pub fn of(name: &str, module: &Module) -> Self {
        let mut summary = Self {
            name: name.to_string(),
            total: module.subjects.len(),
            points: module.points(),
            max_points: SubjectStatus::Done.points() * module.subjects.len() as u32,
            ..Default::default()
        };
        for subject in &module.subjects {
            match subject.status {
                SubjectStatus::Done => summary.done += 1,
                SubjectStatus::InProgress => summary.in_progress += 1,
                SubjectStatus::NotStarted | SubjectStatus::Other(_) => summary.not_started += 1,
            }
        }
        summary
    }

    /// Percentage of the reachable points earned.
    pub fn percentage(&self) -> f32 {
        if self.max_points > 0 {
            (self.points as f32 / self.max_points as f32) * 100.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts() {
        let mut module = Module::with_subjects(["a", "b", "c", "d"], SubjectStatus::NotStarted);
        module.upsert_subject("a", SubjectStatus::Done);
        module.upsert_subject("b", SubjectStatus::InProgress);
        module.upsert_subject("c", SubjectStatus::Other("?".into()));

        let summary = ModuleSummary::of("Math", &module);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.done, 1);
        assert_eq!(summary.in_progress, 1);
        assert_eq!(summary.not_started, 2);
        assert_eq!(summary.points, 3);
        assert_eq!(summary.max_points, 8);
        assert!((summary.percentage() - 37.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_empty_module_percentage() {
        let summary = ModuleSummary::of("Empty", &Module::default());
        assert_eq!(summary.percentage(), 0.0);
    }
}
