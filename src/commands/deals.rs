use tracing::{info, warn};

use crate::billing::{deal_total, new_id};
use crate::error::{PosError, Result};
use crate::models::{CreateDeal, Deal, DealItem, MenuItem};
use crate::state::PosState;

pub fn get_deals(state: &PosState) -> Vec<Deal> {
    state.deals.list()
}

/// Deals offered at the till.
pub fn get_active_deals(state: &PosState) -> Vec<Deal> {
    state.deals.list_active()
}

/// Resolves authored lines against the menu, snapshotting each item's name and
/// current price. A menu item listed twice keeps its first position with the
/// last quantity and price given.
///
/// `stored` holds the lines of the deal being edited. A line submitted with the
/// same quantity and price keeps its stored snapshot, and a line whose menu item
/// has since been deleted keeps its stored name and original price.
fn build_deal_items(
    deal: &CreateDeal,
    menu: &[MenuItem],
    stored: &[DealItem],
) -> Result<Vec<DealItem>> {
    let mut items: Vec<DealItem> = Vec::new();

    for line in &deal.items {
        if line.quantity == 0 {
            return Err(PosError::Validation(
                "Quantity must be a positive number.".to_string(),
            ));
        }
        if !line.deal_price_per_item.is_finite() || line.deal_price_per_item < 0.0 {
            return Err(PosError::Validation(
                "Deal price must be a non-negative number.".to_string(),
            ));
        }

        let previous = stored.iter().find(|i| i.menu_item_id == line.menu_item_id);
        let menu_item = menu.iter().find(|m| m.id == line.menu_item_id);

        let item = match (previous, menu_item) {
            (Some(previous), _)
                if previous.quantity == line.quantity
                    && previous.deal_price_per_item == line.deal_price_per_item =>
            {
                previous.clone()
            }
            (_, Some(menu_item)) => DealItem {
                menu_item_id: menu_item.id.clone(),
                name: menu_item.name.clone(),
                quantity: line.quantity,
                deal_price_per_item: line.deal_price_per_item,
                original_price_per_item: menu_item.price,
            },
            (Some(previous), None) => {
                warn!(menu_item_id = %line.menu_item_id, "deal line references a deleted menu item, keeping stored snapshot");
                DealItem {
                    quantity: line.quantity,
                    deal_price_per_item: line.deal_price_per_item,
                    ..previous.clone()
                }
            }
            (None, None) => {
                return Err(PosError::not_found("Menu item", line.menu_item_id.clone()))
            }
        };

        match items.iter_mut().find(|i| i.menu_item_id == item.menu_item_id) {
            Some(existing) => *existing = item,
            None => items.push(item),
        }
    }

    Ok(items)
}

fn build_deal(state: &PosState, id: String, deal: CreateDeal, stored: &[DealItem]) -> Result<Deal> {
    if deal.deal_number.trim().is_empty() || deal.name.trim().is_empty() || deal.items.is_empty()
    {
        return Err(PosError::Validation(
            "Deal Number, Name, and at least one item are required.".to_string(),
        ));
    }

    let items = build_deal_items(&deal, &state.menu_items.list(), stored)?;

    Ok(Deal {
        id,
        deal_number: deal.deal_number.trim().to_string(),
        name: deal.name.trim().to_string(),
        description: deal
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
        calculated_total_deal_price: deal_total(&items),
        items,
        is_active: deal.is_active,
    })
}

pub fn create_deal(state: &PosState, deal: CreateDeal) -> Result<Deal> {
    let deal = build_deal(state, new_id("deal"), deal, &[])?;
    let number = deal.deal_number.clone();

    let deal = state
        .deals
        .add(deal)
        .ok_or(PosError::DuplicateDealNumber(number))?;

    info!(id = %deal.id, deal_number = %deal.deal_number, total = deal.calculated_total_deal_price, "deal added");
    Ok(deal)
}

/// Rebuilds the deal from the submitted form, recomputing its total price.
/// Unchanged lines keep the snapshot taken when they were first added.
pub fn update_deal(state: &PosState, id: &str, deal: CreateDeal) -> Result<Deal> {
    let existing = state
        .deals
        .find(id)
        .ok_or_else(|| PosError::not_found("Deal", id))?;

    let deal = build_deal(state, id.to_string(), deal, &existing.items)?;
    let number = deal.deal_number.clone();

    state
        .deals
        .update(deal)
        .ok_or(PosError::DuplicateDealNumber(number))
}

pub fn delete_deal(state: &PosState, id: &str) -> Result<Deal> {
    let removed = state
        .deals
        .remove(id)
        .ok_or_else(|| PosError::not_found("Deal", id))?;
    info!(id = %removed.id, "deal deleted");
    Ok(removed)
}
