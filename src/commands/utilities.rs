use std::path::{Path, PathBuf};

use crate::backup;
use crate::error::{PosError, Result};
use crate::models::BackupData;
use crate::state::PosState;

pub fn export_backup(state: &PosState) -> BackupData {
    backup::export_all(state)
}

/// Writes a manual backup file into the configured backup directory.
pub fn download_backup(state: &PosState) -> Result<PathBuf> {
    let dir = state
        .config
        .backup_dir
        .as_deref()
        .ok_or_else(|| PosError::Validation("No backup directory configured.".to_string()))?;
    backup::write_backup_file(state, dir, false)
}

pub fn restore_backup(state: &PosState, data: BackupData) -> Result<()> {
    backup::restore(state, data)
}

pub fn restore_backup_json(state: &PosState, json: &str) -> Result<()> {
    backup::restore_from_json(state, json)
}

pub fn restore_backup_file(state: &PosState, path: &Path) -> Result<()> {
    let data = backup::read_backup_file(path)?;
    backup::restore(state, data)
}

pub fn reset_system(state: &PosState) {
    backup::reset(state);
}
