//! JSON backup export and import
//!
//! One file carries everything: metadata, settings and the four
//! collections. Import parses first and only then touches the stores, so
//! a malformed file leaves all state exactly as it was. Collections absent
//! from the payload are skipped (partial backups are legal); settings, when
//! present, overwrite and re-apply the theme.

use crate::settings::SettingsStore;
use crate::store::{EntityStore, StoreError, StoreResult};
use shared::models::{BACKUP_APP, BACKUP_VERSION, BackupData, BackupFile, BackupMeta};

/// Suggested file name for a backup written today
pub fn backup_file_name() -> String {
    format!(
        "{}-backup-{}.json",
        BACKUP_APP,
        chrono::Local::now().format("%Y-%m-%d")
    )
}

/// Snapshot the stores into a backup file value
pub fn export_backup(entities: &EntityStore, settings: &SettingsStore) -> BackupFile {
    BackupFile {
        meta: BackupMeta {
            app: BACKUP_APP.to_string(),
            version: BACKUP_VERSION,
            exported_at: chrono::Utc::now().to_rfc3339(),
        },
        settings: Some(settings.settings()),
        data: BackupData {
            customers: Some(entities.customers()),
            technicians: Some(entities.technicians()),
            orders: Some(entities.orders()),
            materials: Some(entities.materials()),
        },
    }
}

/// Backup serialized for download (pretty-printed, like a hand-editable
/// config file)
pub fn export_backup_json(entities: &EntityStore, settings: &SettingsStore) -> StoreResult<String> {
    serde_json::to_string_pretty(&export_backup(entities, settings))
        .map_err(|e| StoreError::InvalidBackup(e.to_string()))
}

/// Restore from backup text.
///
/// Parse failure reports [`StoreError::InvalidBackup`] and changes nothing.
/// On success, each collection present in `data` is replaced in one storage
/// transaction, then settings (if present) are saved and the theme
/// re-applied.
pub fn import_backup(
    entities: &EntityStore,
    settings: &SettingsStore,
    json: &str,
) -> StoreResult<()> {
    let backup: BackupFile =
        serde_json::from_str(json).map_err(|e| StoreError::InvalidBackup(e.to_string()))?;

    entities.replace_collections(&backup.data)?;
    if let Some(imported) = backup.settings {
        settings.save(imported)?;
        settings.apply_theme();
    }
    tracing::debug!(app = %backup.meta.app, version = backup.meta.version, "backup imported");
    Ok(())
}
