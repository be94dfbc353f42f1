use tracing::info;

use crate::error::{PosError, Result};
use crate::models::SaleEntry;
use crate::state::PosState;

/// All sales, newest first.
pub fn get_sales(state: &PosState) -> Vec<SaleEntry> {
    let mut sales = state.sales.list();
    sales.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sales
}

/// Returns a bill: its sales record is removed from the ledger entirely.
pub fn return_bill(state: &PosState, bill_id: &str) -> Result<SaleEntry> {
    let bill_id = bill_id.trim();
    if bill_id.is_empty() {
        return Err(PosError::Validation(
            "Please enter a Bill ID to return.".to_string(),
        ));
    }

    let returned = state
        .sales
        .remove(bill_id)
        .ok_or_else(|| PosError::not_found("Bill", bill_id))?;

    info!(bill_id = %returned.id, amount = returned.total_amount, "bill returned");
    Ok(returned)
}

pub fn clear_sales(state: &PosState) {
    state.sales.clear();
    info!("all sales records cleared");
}
