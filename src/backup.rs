use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde_json::Value;
use tracing::{error, info};

use crate::business_day::parse_day;
use crate::error::{PosError, Result};
use crate::models::BackupData;
use crate::state::PosState;

const COLLECTION_FIELDS: [&str; 4] = ["menuItems", "sales", "deletedItemLogs", "deals"];
const BUSINESS_DAY_FIELD: &str = "currentBusinessDay";

pub fn export_all(state: &PosState) -> BackupData {
    BackupData {
        menu_items: state.menu_items.list(),
        sales: state.sales.list(),
        deleted_item_logs: state.deleted_items.list(),
        deals: state.deals.list(),
        current_business_day: state.business_day.get(),
    }
}

/// Checks the raw document shape: four arrays and a valid business day.
pub fn validate_backup_value(value: &Value) -> Result<()> {
    let object = value
        .as_object()
        .ok_or_else(|| PosError::InvalidBackup("backup must be a JSON object".to_string()))?;

    for field in COLLECTION_FIELDS {
        match object.get(field) {
            Some(Value::Array(_)) => {}
            Some(_) => {
                return Err(PosError::InvalidBackup(format!("{} must be an array", field)))
            }
            None => return Err(PosError::InvalidBackup(format!("missing {}", field))),
        }
    }

    match object.get(BUSINESS_DAY_FIELD) {
        Some(Value::String(day)) => validate_business_day(day),
        Some(_) => Err(PosError::InvalidBackup(format!(
            "{} must be a string",
            BUSINESS_DAY_FIELD
        ))),
        None => Err(PosError::InvalidBackup(format!(
            "missing {}",
            BUSINESS_DAY_FIELD
        ))),
    }
}

fn validate_business_day(day: &str) -> Result<()> {
    if day.trim().is_empty() {
        return Err(PosError::InvalidBackup("business day is empty".to_string()));
    }
    if parse_day(day).is_none() {
        return Err(PosError::InvalidBackup(format!(
            "business day {} is not a valid date",
            day
        )));
    }
    Ok(())
}

pub fn parse_backup(json: &str) -> Result<BackupData> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| PosError::InvalidBackup(format!("not valid JSON: {}", e)))?;
    validate_backup_value(&value)?;
    serde_json::from_value(value).map_err(|e| PosError::InvalidBackup(e.to_string()))
}

/// Replaces every collection and the business day with the backup's contents.
/// Nothing changes unless the whole backup is valid.
pub fn restore(state: &PosState, backup: BackupData) -> Result<()> {
    if let Err(e) = validate_business_day(&backup.current_business_day) {
        error!(error = %e, "rejected backup");
        return Err(e);
    }

    let counts = (
        backup.menu_items.len(),
        backup.sales.len(),
        backup.deleted_item_logs.len(),
        backup.deals.len(),
    );

    state.menu_items.collection().replace_all(backup.menu_items);
    state.sales.collection().replace_all(backup.sales);
    state.deleted_items.collection().replace_all(backup.deleted_item_logs);
    state.deals.collection().replace_all(backup.deals);
    state.business_day.replace(backup.current_business_day.clone());

    state.menu_items.collection().persist();
    state.sales.collection().persist();
    state.deleted_items.collection().persist();
    state.deals.collection().persist();
    state.business_day.persist();

    info!(
        menu_items = counts.0,
        sales = counts.1,
        deleted_item_logs = counts.2,
        deals = counts.3,
        business_day = %backup.current_business_day,
        "data restored from backup"
    );
    Ok(())
}

pub fn restore_from_json(state: &PosState, json: &str) -> Result<()> {
    let backup = parse_backup(json).inspect_err(|e| error!(error = %e, "rejected backup"))?;
    restore(state, backup)
}

/// Empties every collection and sets the business day to today.
pub fn reset(state: &PosState) {
    state.menu_items.collection().replace_all(Vec::new());
    state.sales.collection().replace_all(Vec::new());
    state.deleted_items.collection().replace_all(Vec::new());
    state.deals.collection().replace_all(Vec::new());

    state.menu_items.collection().persist();
    state.sales.collection().persist();
    state.deleted_items.collection().persist();
    state.deals.collection().persist();
    let day = state.business_day.reset_to_today();

    info!(business_day = %day, "all data reset");
}

pub fn backup_file_name(at: DateTime<Local>, auto: bool) -> String {
    let prefix = if auto {
        "alshawaya_backup_auto_"
    } else {
        "alshawaya_backup_"
    };
    format!("{}{}.json", prefix, at.format("%Y-%m-%d_%H%M%S"))
}

pub fn write_backup_file(state: &PosState, dir: &Path, auto: bool) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let backup = export_all(state);
    let json = serde_json::to_string_pretty(&backup)?;
    let path = dir.join(backup_file_name(Local::now(), auto));
    fs::write(&path, json)?;
    info!(path = %path.display(), auto, "backup written");
    Ok(path)
}

pub fn read_backup_file(path: &Path) -> Result<BackupData> {
    let json = fs::read_to_string(path)?;
    parse_backup(&json)
}
