use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Label shown for a soft reference whose menu item no longer exists.
pub const UNKNOWN_ITEM_LABEL: &str = "Unknown Item";

/// Anything kept in a collection repository, identified by a string id.
pub trait Entity: Clone + Serialize + for<'de> Deserialize<'de> {
    fn id(&self) -> &str;
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    pub code: String,
    pub name: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateMenuItem {
    pub code: String,
    pub name: String,
    pub price: f64,
    pub category: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DealItem {
    pub menu_item_id: String,
    pub name: String,
    pub quantity: u32,
    pub deal_price_per_item: f64,
    pub original_price_per_item: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    pub id: String,
    pub deal_number: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub items: Vec<DealItem>,
    /// Snapshot taken at save time; not refreshed when menu prices move.
    pub calculated_total_deal_price: f64,
    pub is_active: bool,
}

/// One line of a deal being authored: which menu item, how many, at what price.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateDealItem {
    pub menu_item_id: String,
    pub quantity: u32,
    pub deal_price_per_item: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeal {
    pub deal_number: String,
    pub name: String,
    pub description: Option<String>,
    pub items: Vec<CreateDealItem>,
    pub is_active: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DealContext {
    pub deal_id: String,
    pub deal_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price_per_item: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BillItem {
    pub bill_item_id: String,
    pub menu_item_id: String,
    pub code: String,
    pub name: String,
    /// Effective unit price charged (menu price or deal price).
    pub price: f64,
    pub quantity: u32,
    pub total_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deal_context: Option<DealContext>,
}

impl BillItem {
    pub fn is_deal_item(&self) -> bool {
        self.deal_context.is_some()
    }
}

/// A committed bill. The same shape is used for an invoice and a sales record.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waiter_name: Option<String>,
    pub items: Vec<BillItem>,
    pub subtotal: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<f64>,
    pub total_amount: f64,
    pub created_at: DateTime<Utc>,
    pub cashier_id: String,
}

pub type SaleEntry = Bill;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeletedItemLogEntry {
    pub id: String,
    pub menu_item_id: String,
    pub item_name: String,
    pub item_code: String,
    pub quantity_removed: u32,
    pub price_per_item: f64,
    pub removed_by_cashier_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bill_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_deal_item: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deal_name: Option<String>,
}

/// Header fields typed at the till before an invoice is generated.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct BillDetails {
    pub table_number: Option<String>,
    pub customer_name: Option<String>,
    pub waiter_name: Option<String>,
}

/// The full data set, used both for export and as the only accepted import shape.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BackupData {
    pub menu_items: Vec<MenuItem>,
    pub sales: Vec<SaleEntry>,
    pub deleted_item_logs: Vec<DeletedItemLogEntry>,
    pub deals: Vec<Deal>,
    pub current_business_day: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClosingSubmission {
    pub cash: f64,
    pub expenses: f64,
    pub other: f64,
    pub returns: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClosingStatus {
    Balanced,
    Shortage,
    Overage,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ClosingReport {
    pub cashier_id: String,
    pub date: String,
    pub sales_count: usize,
    pub system_total: f64,
    pub submitted_total: f64,
    pub difference: f64,
    pub status: ClosingStatus,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RecentSale {
    pub id: String,
    pub total_amount: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub business_day: String,
    pub total_sales_amount: f64,
    pub sales_count: usize,
    pub menu_item_count: usize,
    pub deleted_log_count: usize,
    pub recent_sales: Vec<RecentSale>,
}

impl Entity for MenuItem {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Deal {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Bill {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for DeletedItemLogEntry {
    fn id(&self) -> &str {
        &self.id
    }
}
