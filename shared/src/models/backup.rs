//! Backup Model
//!
//! JSON file produced by backup export and consumed by import. Collections
//! absent from `data` are left untouched on import (partial backups are
//! legal), so every `data` field is optional.

use crate::models::{Customer, Material, Settings, Technician, WorkOrder};
use serde::{Deserialize, Serialize};

/// Identifies the producing application in backup files
pub const BACKUP_APP: &str = "fieldops";
/// Backup format version
pub const BACKUP_VERSION: u32 = 1;

/// Backup file metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupMeta {
    pub app: String,
    pub version: u32,
    /// ISO-8601 export timestamp
    pub exported_at: String,
}

/// Backup data payload: one optional array per collection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackupData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customers: Option<Vec<Customer>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technicians: Option<Vec<Technician>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orders: Option<Vec<WorkOrder>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub materials: Option<Vec<Material>>,
}

/// Full backup file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupFile {
    pub meta: BackupMeta,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,
    #[serde(default)]
    pub data: BackupData,
}
