pub mod deals;
pub mod deleted_items;
pub mod menu_items;
pub mod sales;

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::models::Entity;
use crate::store::Store;

pub use deals::DealRepository;
pub use deleted_items::DeletedItemLogRepository;
pub use menu_items::MenuItemRepository;
pub use sales::SalesRepository;

/// Cached copy of one slot. Mutations persist the whole slot; reads re-sync first.
pub struct Collection<T: Entity> {
    key: &'static str,
    store: Store,
    items: Mutex<Vec<T>>,
}

impl<T: Entity> Collection<T> {
    pub fn new(key: &'static str, store: Store) -> Self {
        let items = store.load_collection(key);
        Collection {
            key,
            store,
            items: Mutex::new(items),
        }
    }

    pub fn refresh(&self) {
        if !self.store.is_available() {
            return;
        }
        let fresh: Vec<T> = self.store.load_collection(self.key);
        *self.lock() = fresh;
    }

    /// Owned copy of the collection, re-read from the store when one is attached.
    pub fn list(&self) -> Vec<T> {
        self.refresh();
        self.lock().clone()
    }

    pub fn find(&self, id: &str) -> Option<T> {
        self.refresh();
        self.lock().iter().find(|item| item.id() == id).cloned()
    }

    pub fn add(&self, entity: T) -> T {
        let mut items = self.lock();
        items.push(entity.clone());
        self.store.save(self.key, &*items);
        entity
    }

    /// Replaces the entity with the same id. Unknown ids leave the collection untouched.
    pub fn update(&self, entity: T) -> Option<T> {
        let mut items = self.lock();
        let index = items.iter().position(|item| item.id() == entity.id())?;
        items[index] = entity.clone();
        self.store.save(self.key, &*items);
        Some(entity)
    }

    pub fn remove(&self, id: &str) -> Option<T> {
        let mut items = self.lock();
        let index = items.iter().position(|item| item.id() == id)?;
        let removed = items.remove(index);
        self.store.save(self.key, &*items);
        Some(removed)
    }

    pub fn clear(&self) {
        let mut items = self.lock();
        items.clear();
        self.store.save(self.key, &*items);
    }

    /// Swaps the cached contents without persisting. Callers follow up with
    /// [`Collection::persist`] once every collection has been swapped.
    pub fn replace_all(&self, items: Vec<T>) {
        *self.lock() = items;
    }

    pub fn persist(&self) {
        let items = self.lock();
        self.store.save(self.key, &*items);
    }

    /// Runs `f` against the cached items while holding the lock. Used for
    /// checks that must see the same state as the mutation that follows.
    pub(crate) fn with_items<R>(&self, f: impl FnOnce(&mut Vec<T>) -> R) -> R {
        let mut items = self.lock();
        f(&mut items)
    }

    pub(crate) fn save_locked(&self, items: &[T]) {
        self.store.save(self.key, items);
    }

    fn lock(&self) -> MutexGuard<'_, Vec<T>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
