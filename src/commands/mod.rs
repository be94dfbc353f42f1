pub mod deals;
pub mod deleted_items;
pub mod menu_items;
pub mod orders;
pub mod reports;
pub mod sales;
pub mod utilities;
