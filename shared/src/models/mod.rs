//! Data models
//!
//! Shared between the store crate and frontend consumers. All IDs are
//! `String` (UUID v4), all timestamps Unix milliseconds.

pub mod backup;
pub mod customer;
pub mod material;
pub mod settings;
pub mod technician;
pub mod work_order;

// Re-exports
pub use backup::*;
pub use customer::*;
pub use material::*;
pub use settings::*;
pub use technician::*;
pub use work_order::*;
