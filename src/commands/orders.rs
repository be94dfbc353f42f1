use tracing::info;

use crate::billing::{BillDraft, QuantityUpdate};
use crate::error::{PosError, Result};
use crate::models::{Bill, BillItem, DeletedItemLogEntry};
use crate::state::PosState;

pub fn add_item_to_bill(state: &PosState, draft: &mut BillDraft, menu_item_id: &str) -> Result<BillItem> {
    let item = state
        .menu_items
        .find(menu_item_id)
        .ok_or_else(|| PosError::not_found("Menu item", menu_item_id))?;
    Ok(draft.add_menu_item(&item).clone())
}

/// Adds every line of an active deal. Lines whose menu item has been deleted
/// are skipped; their warnings are returned for display.
pub fn add_deal_to_bill(state: &PosState, draft: &mut BillDraft, deal_id: &str) -> Result<Vec<String>> {
    let deal = state
        .deals
        .find(deal_id)
        .ok_or_else(|| PosError::not_found("Deal", deal_id))?;

    if !deal.is_active {
        return Err(PosError::Validation(format!(
            "Deal \"{}\" is not active.",
            deal.name
        )));
    }

    Ok(draft.add_deal(&deal, &state.menu_items.list()))
}

/// Changes a line's quantity; zero removes it and records the removal.
pub fn update_bill_item_quantity(
    state: &PosState,
    draft: &mut BillDraft,
    bill_item_id: &str,
    quantity: u32,
    cashier_id: &str,
) -> Result<QuantityUpdate> {
    let update = draft
        .update_quantity(bill_item_id, quantity, cashier_id)
        .ok_or_else(|| PosError::not_found("Bill item", bill_item_id))?;

    if let QuantityUpdate::Removed(log) = &update {
        state.deleted_items.append(log.clone());
    }
    Ok(update)
}

pub fn remove_bill_item(
    state: &PosState,
    draft: &mut BillDraft,
    bill_item_id: &str,
    cashier_id: &str,
) -> Result<DeletedItemLogEntry> {
    let log = draft
        .remove_item(bill_item_id, cashier_id)
        .ok_or_else(|| PosError::not_found("Bill item", bill_item_id))?;
    Ok(state.deleted_items.append(log))
}

/// Commits the draft to the sales ledger and leaves an empty draft behind.
pub fn generate_invoice(state: &PosState, draft: &mut BillDraft, cashier_id: &str) -> Result<Bill> {
    let bill = draft.finalize(cashier_id)?;
    let bill = state.sales.add(bill);
    info!(bill_id = %bill.id, cashier_id = %bill.cashier_id, total = bill.total_amount, "invoice generated");
    Ok(bill)
}
