//! Persisted documents - current progress and point history.

use std::collections::BTreeMap;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::module::Module;
use crate::status::SubjectStatus;

/// Per-module point totals keyed by ISO date (`YYYY-MM-DD`).
pub type HistoricalBucket = BTreeMap<String, u32>;

/// The current-progress document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressDocument {
    /// Modules keyed by name
    #[serde(default)]
    pub modules: BTreeMap<String, Module>,

    /// Date the daily reset last ran
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reset: Option<String>,
}

impl ProgressDocument {
    /// Default document written when no file exists yet.
    pub fn seeded(today: NaiveDate) -> Self {
        let seed = [
            ("Math", ["Algebra", "Analysis"]),
            ("Programming", ["Python", "C++"]),
            ("Law", ["Civil Law", "Criminal Law"]),
        ];

        let modules = seed
            .into_iter()
            .map(|(name, subjects)| {
                (
                    name.to_string(),
                    Module::with_subjects(subjects, SubjectStatus::NotStarted),
                )
            })
            .collect();

        Self {
            modules,
            last_reset: Some(format_date(today)),
        }
    }

    /// Parsed reset marker, `None` if missing or malformed.
    pub fn last_reset_date(&self) -> Option<NaiveDate> {
        self.last_reset.as_deref().and_then(parse_date)
    }
}

/// The historical document: module name to daily point totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryDocument {
    /// Buckets keyed by module name
    pub buckets: BTreeMap<String, HistoricalBucket>,
}

impl HistoryDocument {
    /// Bucket for a module, if any.
    pub fn bucket(&self, module: &str) -> Option<&HistoricalBucket> {
        self.buckets.get(module)
    }

    /// Record a module's total for a day, replacing any earlier value.
    pub fn record(&mut self, module: &str, date: NaiveDate, points: u32) {
        self.buckets
            .entry(module.to_string())
            .or_default()
            .insert(format_date(date), points);
    }

    /// Drop a module's bucket.
    pub fn remove(&mut self, module: &str) -> Option<HistoricalBucket> {
        self.buckets.remove(module)
    }

    /// Move a bucket to a new module name.
    ///
    /// The destination is always replaced: when the source has no bucket the
    /// destination's stale bucket is dropped as well.
    pub fn rename(&mut self, old: &str, new: &str) {
        match self.buckets.remove(old) {
            Some(bucket) => {
                self.buckets.insert(new.to_string(), bucket);
            }
            None => {
                self.buckets.remove(new);
            }
        }
    }
}

/// Format a date the way both documents store it.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse an ISO `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}
