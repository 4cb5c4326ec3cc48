//! Progress Store
//!
//! Status updates, deletions, renames and the daily rollover over the two
//! StudyTrack documents.

#![warn(missing_docs)]

pub mod store;

pub use store::{ProgressError, ProgressStore, Result};
