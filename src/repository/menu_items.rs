use crate::models::{MenuItem, UNKNOWN_ITEM_LABEL};
use crate::repository::Collection;
use crate::store::{Store, MENU_ITEMS_KEY};

pub struct MenuItemRepository {
    items: Collection<MenuItem>,
}

impl MenuItemRepository {
    pub fn new(store: Store) -> Self {
        MenuItemRepository {
            items: Collection::new(MENU_ITEMS_KEY, store),
        }
    }

    pub fn refresh(&self) {
        self.items.refresh();
    }

    pub fn list(&self) -> Vec<MenuItem> {
        self.items.list()
    }

    pub fn find(&self, id: &str) -> Option<MenuItem> {
        self.items.find(id)
    }

    /// Display name for a soft reference; deleted items fall back to a fixed label.
    pub fn display_name(&self, id: &str) -> String {
        self.find(id)
            .map(|item| item.name)
            .unwrap_or_else(|| UNKNOWN_ITEM_LABEL.to_string())
    }

    pub fn add(&self, item: MenuItem) -> MenuItem {
        self.items.add(item)
    }

    pub fn update(&self, item: MenuItem) -> Option<MenuItem> {
        self.items.update(item)
    }

    /// Deals and past bills keep their references; nothing cascades.
    pub fn remove(&self, id: &str) -> Option<MenuItem> {
        self.items.remove(id)
    }

    pub(crate) fn collection(&self) -> &Collection<MenuItem> {
        &self.items
    }
}
