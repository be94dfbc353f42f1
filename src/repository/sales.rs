use crate::models::SaleEntry;
use crate::repository::Collection;
use crate::store::{Store, SALES_KEY};

/// The sales ledger. Entries are appended once at invoice time and only ever
/// leave through a return (`remove`) or a full `clear`.
pub struct SalesRepository {
    sales: Collection<SaleEntry>,
}

impl SalesRepository {
    pub fn new(store: Store) -> Self {
        SalesRepository {
            sales: Collection::new(SALES_KEY, store),
        }
    }

    pub fn refresh(&self) {
        self.sales.refresh();
    }

    pub fn list(&self) -> Vec<SaleEntry> {
        self.sales.list()
    }

    pub fn find(&self, id: &str) -> Option<SaleEntry> {
        self.sales.find(id)
    }

    pub fn add(&self, sale: SaleEntry) -> SaleEntry {
        self.sales.add(sale)
    }

    pub fn remove(&self, id: &str) -> Option<SaleEntry> {
        self.sales.remove(id)
    }

    pub fn clear(&self) {
        self.sales.clear();
    }

    pub(crate) fn collection(&self) -> &Collection<SaleEntry> {
        &self.sales
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use chrono::Utc;
    use std::sync::Arc;

    fn sale(id: &str, total: f64) -> SaleEntry {
        SaleEntry {
            id: id.to_string(),
            table_number: Some("4".to_string()),
            customer_name: None,
            waiter_name: None,
            items: Vec::new(),
            subtotal: total,
            tax: None,
            discount: None,
            total_amount: total,
            created_at: Utc::now(),
            cashier_id: "ca1".to_string(),
        }
    }

    fn setup_repo() -> SalesRepository {
        let db = Database::open_in_memory().unwrap();
        db.initialize().unwrap();
        SalesRepository::new(Store::new(Arc::new(db)))
    }

    #[test]
    fn test_return_removes_sale_once() {
        let repo = setup_repo();
        let bill = repo.add(sale("bill1", 900.0));
        repo.add(sale("bill2", 300.0));

        assert_eq!(repo.remove("bill1"), Some(bill));
        assert!(repo.list().iter().all(|s| s.id != "bill1"));
        assert_eq!(repo.remove("bill1"), None);
        assert_eq!(repo.list().len(), 1);
    }

    #[test]
    fn test_clear_empties_ledger() {
        let repo = setup_repo();
        repo.add(sale("bill1", 900.0));
        repo.add(sale("bill2", 300.0));

        repo.clear();
        assert!(repo.list().is_empty());
    }
}
