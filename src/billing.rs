use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use crate::error::{PosError, Result};
use crate::models::{
    Bill, BillDetails, BillItem, Deal, DealContext, DealItem, DeletedItemLogEntry, MenuItem,
};

pub const REASON_QUANTITY_ZERO: &str = "Quantity reduced to zero";
pub const REASON_REMOVED: &str = "Removed by cashier";

pub fn new_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}

pub fn line_total(unit_price: f64, quantity: u32) -> f64 {
    unit_price * quantity as f64
}

pub fn bill_subtotal(items: &[BillItem]) -> f64 {
    items.iter().map(|item| item.total_price).sum()
}

/// Σ(quantity × deal price) over a deal's items.
pub fn deal_total(items: &[DealItem]) -> f64 {
    items
        .iter()
        .map(|item| line_total(item.deal_price_per_item, item.quantity))
        .sum()
}

#[derive(Debug, Clone, Default)]
pub struct DealExpansion {
    pub items: Vec<BillItem>,
    /// One message per deal item whose menu item no longer exists.
    pub warnings: Vec<String>,
}

/// One bill line per deal item, at the deal's quantity and price.
pub fn expand_deal(deal: &Deal, menu: &[MenuItem]) -> DealExpansion {
    let mut expansion = DealExpansion::default();

    for deal_item in &deal.items {
        let Some(base) = menu.iter().find(|m| m.id == deal_item.menu_item_id) else {
            warn!(deal_id = %deal.id, menu_item_id = %deal_item.menu_item_id, "deal references a missing menu item, skipping");
            expansion.warnings.push(format!(
                "Menu item {} in deal not found. Skipping.",
                deal_item.name
            ));
            continue;
        };

        expansion.items.push(BillItem {
            bill_item_id: new_id("line"),
            menu_item_id: base.id.clone(),
            code: base.code.clone(),
            name: base.name.clone(),
            price: deal_item.deal_price_per_item,
            quantity: deal_item.quantity,
            total_price: line_total(deal_item.deal_price_per_item, deal_item.quantity),
            category: base.category.clone(),
            deal_context: Some(DealContext {
                deal_id: deal.id.clone(),
                deal_name: deal.name.clone(),
                original_price_per_item: Some(deal_item.original_price_per_item),
            }),
        });
    }

    expansion
}

#[derive(Debug, Clone, PartialEq)]
pub enum QuantityUpdate {
    Updated(BillItem),
    Removed(DeletedItemLogEntry),
}

/// A bill being composed at the till.
#[derive(Debug, Clone)]
pub struct BillDraft {
    id: String,
    items: Vec<BillItem>,
    pub details: BillDetails,
}

impl Default for BillDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl BillDraft {
    pub fn new() -> Self {
        BillDraft {
            id: new_id("bill"),
            items: Vec::new(),
            details: BillDetails::default(),
        }
    }

    /// Id the bill will carry once invoiced; also stamped on removal logs.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn items(&self) -> &[BillItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn subtotal(&self) -> f64 {
        bill_subtotal(&self.items)
    }

    /// Adds one unit, merging into an existing plain line at the same price.
    pub fn add_menu_item(&mut self, item: &MenuItem) -> &BillItem {
        let existing = self.items.iter().position(|line| {
            line.menu_item_id == item.id && line.price == item.price && !line.is_deal_item()
        });

        let index = match existing {
            Some(index) => {
                let line = &mut self.items[index];
                line.quantity += 1;
                line.total_price = line_total(line.price, line.quantity);
                index
            }
            None => {
                self.items.push(BillItem {
                    bill_item_id: new_id("line"),
                    menu_item_id: item.id.clone(),
                    code: item.code.clone(),
                    name: item.name.clone(),
                    price: item.price,
                    quantity: 1,
                    total_price: item.price,
                    category: item.category.clone(),
                    deal_context: None,
                });
                self.items.len() - 1
            }
        };

        &self.items[index]
    }

    /// Appends the deal's lines. Returns warnings for skipped items.
    pub fn add_deal(&mut self, deal: &Deal, menu: &[MenuItem]) -> Vec<String> {
        let expansion = expand_deal(deal, menu);
        self.items.extend(expansion.items);
        expansion.warnings
    }

    /// Sets a line's quantity. Anything below one removes the line and yields
    /// the audit entry for it. `None` if the line does not exist.
    pub fn update_quantity(
        &mut self,
        bill_item_id: &str,
        quantity: u32,
        cashier_id: &str,
    ) -> Option<QuantityUpdate> {
        let index = self
            .items
            .iter()
            .position(|line| line.bill_item_id == bill_item_id)?;

        if quantity < 1 {
            let removed = self.items.remove(index);
            return Some(QuantityUpdate::Removed(self.removal_log(
                &removed,
                cashier_id,
                REASON_QUANTITY_ZERO,
            )));
        }

        let line = &mut self.items[index];
        line.quantity = quantity;
        line.total_price = line_total(line.price, quantity);
        Some(QuantityUpdate::Updated(line.clone()))
    }

    pub fn remove_item(
        &mut self,
        bill_item_id: &str,
        cashier_id: &str,
    ) -> Option<DeletedItemLogEntry> {
        let index = self
            .items
            .iter()
            .position(|line| line.bill_item_id == bill_item_id)?;
        let removed = self.items.remove(index);
        Some(self.removal_log(&removed, cashier_id, REASON_REMOVED))
    }

    /// Turns the draft into a bill and starts a fresh, empty draft.
    pub fn finalize(&mut self, cashier_id: &str) -> Result<Bill> {
        if cashier_id.trim().is_empty() {
            return Err(PosError::Validation(
                "Cashier ID not found. Please re-login.".to_string(),
            ));
        }
        if self.items.is_empty() {
            return Err(PosError::EmptyBill);
        }

        let finished = std::mem::take(self);
        let subtotal = finished.subtotal();

        Ok(Bill {
            id: finished.id,
            table_number: non_blank(finished.details.table_number),
            customer_name: non_blank(finished.details.customer_name),
            waiter_name: non_blank(finished.details.waiter_name),
            items: finished.items,
            subtotal,
            tax: None,
            discount: None,
            total_amount: subtotal,
            created_at: Utc::now(),
            cashier_id: cashier_id.to_string(),
        })
    }

    fn removal_log(&self, line: &BillItem, cashier_id: &str, reason: &str) -> DeletedItemLogEntry {
        let cashier = if cashier_id.trim().is_empty() {
            "unknown_cashier"
        } else {
            cashier_id
        };

        DeletedItemLogEntry {
            id: new_id("del"),
            menu_item_id: line.menu_item_id.clone(),
            item_name: line.name.clone(),
            item_code: line.code.clone(),
            quantity_removed: line.quantity,
            price_per_item: line.price,
            removed_by_cashier_id: cashier.to_string(),
            timestamp: Utc::now(),
            bill_id: Some(self.id.clone()),
            reason: Some(reason.to_string()),
            is_deal_item: Some(line.is_deal_item()),
            deal_name: line.deal_context.as_ref().map(|ctx| ctx.deal_name.clone()),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
