//! Shared types for the FieldOps workspace
//!
//! Data models, common types and utility helpers used by the store crate
//! and by any frontend consuming its state.

pub mod models;
pub mod types;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
