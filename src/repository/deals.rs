use tracing::warn;

use crate::models::Deal;
use crate::repository::Collection;
use crate::store::{Store, DEALS_KEY};

pub struct DealRepository {
    deals: Collection<Deal>,
}

impl DealRepository {
    pub fn new(store: Store) -> Self {
        DealRepository {
            deals: Collection::new(DEALS_KEY, store),
        }
    }

    pub fn refresh(&self) {
        self.deals.refresh();
    }

    pub fn list(&self) -> Vec<Deal> {
        self.deals.list()
    }

    pub fn list_active(&self) -> Vec<Deal> {
        self.list().into_iter().filter(|d| d.is_active).collect()
    }

    pub fn find(&self, id: &str) -> Option<Deal> {
        self.deals.find(id)
    }

    /// Returns `None` when the deal number is already taken.
    pub fn add(&self, deal: Deal) -> Option<Deal> {
        self.deals.with_items(|deals| {
            if deals.iter().any(|d| d.deal_number == deal.deal_number) {
                warn!(deal_number = %deal.deal_number, "deal number already exists");
                return None;
            }
            deals.push(deal.clone());
            self.deals.save_locked(deals);
            Some(deal)
        })
    }

    /// Returns `None` when the id is unknown or the deal number belongs to another deal.
    pub fn update(&self, deal: Deal) -> Option<Deal> {
        self.deals.with_items(|deals| {
            let index = deals.iter().position(|d| d.id == deal.id)?;
            if deals
                .iter()
                .any(|d| d.deal_number == deal.deal_number && d.id != deal.id)
            {
                warn!(deal_number = %deal.deal_number, "deal number already exists for another deal");
                return None;
            }
            deals[index] = deal.clone();
            self.deals.save_locked(deals);
            Some(deal)
        })
    }

    pub fn remove(&self, id: &str) -> Option<Deal> {
        self.deals.remove(id)
    }

    pub(crate) fn collection(&self) -> &Collection<Deal> {
        &self.deals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::DealItem;
    use std::sync::Arc;

    fn deal(id: &str, number: &str) -> Deal {
        Deal {
            id: id.to_string(),
            deal_number: number.to_string(),
            name: format!("Deal {}", number),
            description: None,
            items: vec![DealItem {
                menu_item_id: "item1".to_string(),
                name: "Chicken Shawarma".to_string(),
                quantity: 2,
                deal_price_per_item: 400.0,
                original_price_per_item: 450.0,
            }],
            calculated_total_deal_price: 800.0,
            is_active: true,
        }
    }

    fn setup_repo() -> DealRepository {
        let db = Database::open_in_memory().unwrap();
        db.initialize().unwrap();
        DealRepository::new(Store::new(Arc::new(db)))
    }

    #[test]
    fn test_duplicate_deal_number_rejected() {
        let repo = setup_repo();
        assert!(repo.add(deal("deal1", "D1")).is_some());
        assert!(repo.add(deal("deal2", "D1")).is_none());
        assert_eq!(repo.list().len(), 1);
    }

    #[test]
    fn test_update_keeps_own_number() {
        let repo = setup_repo();
        repo.add(deal("deal1", "D1"));

        let mut renamed = deal("deal1", "D1");
        renamed.name = "Family Platter".to_string();
        assert!(repo.update(renamed).is_some());
        assert_eq!(repo.find("deal1").unwrap().name, "Family Platter");
    }

    #[test]
    fn test_update_rejects_number_of_other_deal() {
        let repo = setup_repo();
        repo.add(deal("deal1", "D1"));
        repo.add(deal("deal2", "D2"));

        assert!(repo.update(deal("deal2", "D1")).is_none());
        assert_eq!(repo.find("deal2").unwrap().deal_number, "D2");
    }

    #[test]
    fn test_update_unknown_deal() {
        let repo = setup_repo();
        assert!(repo.update(deal("missing", "D9")).is_none());
        assert!(repo.list().is_empty());
    }

    #[test]
    fn test_list_active_filters_disabled() {
        let repo = setup_repo();
        repo.add(deal("deal1", "D1"));
        let mut off = deal("deal2", "D2");
        off.is_active = false;
        repo.add(off);

        let active: Vec<String> = repo.list_active().into_iter().map(|d| d.id).collect();
        assert_eq!(active, vec!["deal1"]);
    }
}
