//! StudyTrack HTTP server
//!
//! JSON API over the progress store plus the static front end.

pub mod config;
pub mod error;
pub mod routes;
pub mod server;

pub use config::{ConfigError, ServerConfig};
pub use error::ApiError;
pub use server::{router, run, AppState};
