//! StudyTrack core data models.
//!
//! Modules, subjects and their statuses, the two persisted documents, and
//! the clock used to date point history.

#![warn(missing_docs)]

mod clock;
mod document;
mod module;
mod status;
mod view;

pub use clock::{Clock, FixedClock, SystemClock};
pub use document::{format_date, parse_date, HistoricalBucket, HistoryDocument, ProgressDocument};
pub use module::{Module, Subject};
pub use status::SubjectStatus;
pub use view::{ModuleSummary, ModuleView};
