//! Repository implementations module.
//!
//! - `local`: In-memory implementation for tests, local development and
//!   snapshot files
pub mod local;

pub use local::{LocalRepository, Snapshot};
