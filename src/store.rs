use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{error, warn};

use crate::db::Database;

pub const MENU_ITEMS_KEY: &str = "alshawaya_menu_items";
pub const SALES_KEY: &str = "alshawaya_sales";
pub const DELETED_ITEMS_KEY: &str = "alshawaya_deleted_items_log";
pub const DEALS_KEY: &str = "alshawaya_deals";
pub const CURRENT_BUSINESS_DAY_KEY: &str = "alshawaya_current_business_day";

/// JSON documents under named slots. Reads never fail and writes log their errors.
#[derive(Clone)]
pub struct Store {
    db: Option<Arc<Database>>,
}

impl Store {
    pub fn new(db: Arc<Database>) -> Self {
        Store { db: Some(db) }
    }

    /// A store with no durable layer behind it: loads hand back the default,
    /// saves are dropped.
    pub fn detached() -> Self {
        Store { db: None }
    }

    pub fn is_available(&self) -> bool {
        self.db.is_some()
    }

    pub fn load<T>(&self, key: &str, default: &T) -> T
    where
        T: Serialize + DeserializeOwned + Clone,
    {
        let Some(db) = &self.db else {
            return default.clone();
        };

        let raw = match db.get_value(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                self.save(key, default);
                return default.clone();
            }
            Err(e) => {
                error!(key, error = %e, "failed to read stored value, resetting to default");
                self.save(key, default);
                return default.clone();
            }
        };

        match serde_json::from_str::<T>(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "stored value is corrupt or has the wrong shape, resetting to default");
                self.save(key, default);
                default.clone()
            }
        }
    }

    /// Loads a stored array one element at a time. Elements that don't decode
    /// are skipped; only a value that isn't an array resets the slot to `[]`.
    pub fn load_collection<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let elements: Vec<Value> = self.load(key, &Vec::new());
        elements
            .into_iter()
            .enumerate()
            .filter_map(|(index, element)| match serde_json::from_value(element) {
                Ok(item) => Some(item),
                Err(e) => {
                    warn!(key, index, error = %e, "skipping malformed stored element");
                    None
                }
            })
            .collect()
    }

    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let Some(db) = &self.db else {
            return;
        };

        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                error!(key, error = %e, "failed to serialize value");
                return;
            }
        };

        if let Err(e) = db.set_value(key, &json) {
            error!(key, error = %e, "failed to persist value");
        }
    }

    /// Raw stored document, bypassing the typed recovery in `load`.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.db.as_ref()?.get_value(key).ok().flatten()
    }

    /// Writes a raw document as-is. Used to seed or repair slots.
    pub fn save_raw(&self, key: &str, json: &str) {
        if let Some(db) = &self.db {
            if let Err(e) = db.set_value(key, json) {
                error!(key, error = %e, "failed to persist value");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MenuItem;

    fn setup_store() -> Store {
        let db = Database::open_in_memory().expect("Failed to create in-memory database");
        db.initialize().expect("Failed to initialize database");
        Store::new(Arc::new(db))
    }

    #[test]
    fn test_missing_key_persists_default() {
        let store = setup_store();
        let items: Vec<MenuItem> = store.load(MENU_ITEMS_KEY, &Vec::new());
        assert!(items.is_empty());
        assert_eq!(store.raw(MENU_ITEMS_KEY), Some("[]".to_string()));
    }

    #[test]
    fn test_unparseable_value_resets_to_default() {
        let store = setup_store();
        store.save_raw(SALES_KEY, "{not json");

        let sales: Vec<crate::models::Bill> = store.load(SALES_KEY, &Vec::new());
        assert!(sales.is_empty());
        assert_eq!(store.raw(SALES_KEY), Some("[]".to_string()));
    }

    #[test]
    fn test_non_array_collection_resets_to_default() {
        let store = setup_store();
        store.save_raw(MENU_ITEMS_KEY, r#"{"id":"item1"}"#);

        let items: Vec<MenuItem> = store.load(MENU_ITEMS_KEY, &Vec::new());
        assert!(items.is_empty());
        assert_eq!(store.raw(MENU_ITEMS_KEY), Some("[]".to_string()));
    }

    #[test]
    fn test_malformed_element_is_skipped_not_erased() {
        let store = setup_store();
        store.save_raw(
            MENU_ITEMS_KEY,
            r#"[{"id":"item1","code":"SH01","name":"Chicken Shawarma","price":450.0},{"id":"item2","code":"SH02"}]"#,
        );

        let items: Vec<MenuItem> = store.load_collection(MENU_ITEMS_KEY);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "item1");
        assert!(store.raw(MENU_ITEMS_KEY).unwrap().contains("item2"));
    }

    #[test]
    fn test_load_collection_resets_non_array() {
        let store = setup_store();
        store.save_raw(SALES_KEY, "42");

        let sales: Vec<crate::models::Bill> = store.load_collection(SALES_KEY);
        assert!(sales.is_empty());
        assert_eq!(store.raw(SALES_KEY), Some("[]".to_string()));
    }

    #[test]
    fn test_round_trip_value() {
        let store = setup_store();
        let item = MenuItem {
            id: "item1".to_string(),
            code: "SH01".to_string(),
            name: "Chicken Shawarma".to_string(),
            price: 450.0,
            category: Some("Wraps".to_string()),
        };
        store.save(MENU_ITEMS_KEY, &vec![item.clone()]);

        let loaded: Vec<MenuItem> = store.load(MENU_ITEMS_KEY, &Vec::new());
        assert_eq!(loaded, vec![item]);
    }

    #[test]
    fn test_detached_store_returns_default_without_io() {
        let store = Store::detached();
        assert!(!store.is_available());

        store.save(CURRENT_BUSINESS_DAY_KEY, "2024-01-01");
        let day: String = store.load(CURRENT_BUSINESS_DAY_KEY, &"2030-12-31".to_string());
        assert_eq!(day, "2030-12-31");
        assert_eq!(store.raw(CURRENT_BUSINESS_DAY_KEY), None);
    }
}
