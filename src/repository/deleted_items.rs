use crate::models::DeletedItemLogEntry;
use crate::repository::Collection;
use crate::store::{Store, DELETED_ITEMS_KEY};

/// Audit trail of lines taken off bills. Append-only.
pub struct DeletedItemLogRepository {
    logs: Collection<DeletedItemLogEntry>,
}

impl DeletedItemLogRepository {
    pub fn new(store: Store) -> Self {
        DeletedItemLogRepository {
            logs: Collection::new(DELETED_ITEMS_KEY, store),
        }
    }

    pub fn refresh(&self) {
        self.logs.refresh();
    }

    pub fn list(&self) -> Vec<DeletedItemLogEntry> {
        self.logs.list()
    }

    pub fn append(&self, entry: DeletedItemLogEntry) -> DeletedItemLogEntry {
        self.logs.add(entry)
    }

    pub(crate) fn collection(&self) -> &Collection<DeletedItemLogEntry> {
        &self.logs
    }
}
