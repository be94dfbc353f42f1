use tracing::info;

use crate::billing::new_id;
use crate::error::{PosError, Result};
use crate::models::{CreateMenuItem, MenuItem};
use crate::state::PosState;

pub fn get_menu_items(state: &PosState) -> Vec<MenuItem> {
    state.menu_items.list()
}

fn validate(code: &str, name: &str, price: f64) -> Result<()> {
    if name.trim().is_empty() || code.trim().is_empty() {
        return Err(PosError::Validation(
            "Name, Code, and Price are required.".to_string(),
        ));
    }
    if !price.is_finite() || price < 0.0 {
        return Err(PosError::Validation("Invalid price.".to_string()));
    }
    Ok(())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn create_menu_item(state: &PosState, item: CreateMenuItem) -> Result<MenuItem> {
    validate(&item.code, &item.name, item.price)?;

    let item = state.menu_items.add(MenuItem {
        id: new_id("item"),
        code: item.code.trim().to_string(),
        name: item.name.trim().to_string(),
        price: item.price,
        category: non_blank(item.category),
    });

    info!(id = %item.id, code = %item.code, "menu item added");
    Ok(item)
}

pub fn update_menu_item(state: &PosState, item: MenuItem) -> Result<MenuItem> {
    validate(&item.code, &item.name, item.price)?;

    let id = item.id.clone();
    let item = MenuItem {
        code: item.code.trim().to_string(),
        name: item.name.trim().to_string(),
        category: non_blank(item.category),
        ..item
    };

    state
        .menu_items
        .update(item)
        .ok_or_else(|| PosError::not_found("Menu item", id))
}

/// Deals and past sales that point at the item are left alone.
pub fn delete_menu_item(state: &PosState, id: &str) -> Result<MenuItem> {
    let removed = state
        .menu_items
        .remove(id)
        .ok_or_else(|| PosError::not_found("Menu item", id))?;
    info!(id = %removed.id, "menu item deleted");
    Ok(removed)
}
