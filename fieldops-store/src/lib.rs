//! FieldOps data core
//!
//! Client-side state container for a telecom field-service operation:
//! a redb-backed key-value store, the entity store (customers, technicians,
//! work orders, materials) with cross-collection referential rules, the
//! settings store, pure derived-view computations for the kanban and report
//! screens, CSV export, and JSON backup import/export.
//!
//! Every persisted value is one JSON document per key, written as a whole
//! on each mutation; the UI layer subscribes to [`store::StoreEvent`]
//! notifications instead of re-reading storage.

pub mod backup;
pub mod export;
pub mod settings;
pub mod storage;
pub mod store;
pub mod views;

// Re-exports
pub use settings::{SettingsStore, ThemeSink};
pub use storage::{KvStore, StorageError};
pub use store::{Collection, EntityStore, StoreError, StoreEvent, StoreResult};
