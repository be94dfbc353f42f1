use crate::models::DeletedItemLogEntry;
use crate::state::PosState;

/// Every removal logged at the till, newest first.
pub fn get_deleted_item_logs(state: &PosState) -> Vec<DeletedItemLogEntry> {
    let mut logs = state.deleted_items.list();
    logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    logs
}
