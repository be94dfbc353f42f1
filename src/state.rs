use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use crate::business_day::BusinessDayClock;
use crate::config::AppConfig;
use crate::db::Database;
use crate::error::Result;
use crate::repository::{
    DealRepository, DeletedItemLogRepository, MenuItemRepository, SalesRepository,
};
use crate::store::Store;

/// Everything the commands work against. Built once at startup and shared by reference.
pub struct PosState {
    pub config: AppConfig,
    pub store: Store,
    pub menu_items: MenuItemRepository,
    pub sales: SalesRepository,
    pub deleted_items: DeletedItemLogRepository,
    pub deals: DealRepository,
    pub business_day: BusinessDayClock,
}

impl PosState {
    /// Opens (or creates) the database file named by `config`.
    pub fn open(config: AppConfig) -> Result<Self> {
        let path = config.database_path();
        let db = Database::new(&path)?;
        db.initialize()?;
        info!(path = %path.display(), "database ready");
        Ok(Self::with_store(config, Store::new(Arc::new(db))))
    }

    pub fn in_memory(config: AppConfig) -> Result<Self> {
        let db = Database::open_in_memory()?;
        db.initialize()?;
        Ok(Self::with_store(config, Store::new(Arc::new(db))))
    }

    /// State with no durable storage; nothing survives the process.
    pub fn detached(config: AppConfig) -> Self {
        Self::with_store(config, Store::detached())
    }

    pub fn with_store(config: AppConfig, store: Store) -> Self {
        let business_day = BusinessDayClock::new(store.clone());
        Self::assemble(config, store, business_day)
    }

    /// Like [`PosState::with_store`] with a fixed source for the system date.
    pub fn with_store_and_today(config: AppConfig, store: Store, today: fn() -> NaiveDate) -> Self {
        let business_day = BusinessDayClock::with_today(store.clone(), today);
        Self::assemble(config, store, business_day)
    }

    fn assemble(config: AppConfig, store: Store, business_day: BusinessDayClock) -> Self {
        PosState {
            menu_items: MenuItemRepository::new(store.clone()),
            sales: SalesRepository::new(store.clone()),
            deleted_items: DeletedItemLogRepository::new(store.clone()),
            deals: DealRepository::new(store.clone()),
            business_day,
            store,
            config,
        }
    }

    /// Re-reads every collection from the store.
    pub fn refresh(&self) {
        self.menu_items.refresh();
        self.sales.refresh();
        self.deleted_items.refresh();
        self.deals.refresh();
    }
}
