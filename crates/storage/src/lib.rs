//! Storage abstraction and implementations for StudyTrack.
//!
//! This crate provides a trait-based storage interface for the two
//! StudyTrack documents, with a JSON file reference implementation and an
//! in-memory backend for tests.

#![warn(missing_docs)]

pub mod trait_;
pub mod json_storage;
pub mod memory;

pub use trait_::{DocumentStore, StorageError, Result};
pub use json_storage::JsonFileStore;
pub use memory::MemoryStore;
