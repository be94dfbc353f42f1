use std::path::PathBuf;

use serde::Serialize;
use tracing::{error, info};

use crate::backup;
use crate::business_day::parse_day;
use crate::closing;
use crate::error::{PosError, Result};
use crate::models::{ClosingReport, ClosingSubmission, DashboardSummary, RecentSale};
use crate::state::PosState;

const RECENT_SALES_LIMIT: usize = 5;

pub fn get_business_day(state: &PosState) -> String {
    state.business_day.get()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayAdvance {
    pub business_day: String,
    pub backup_path: Option<PathBuf>,
    pub backup_error: Option<String>,
}

/// Ends the business day. When configured, an automatic backup is written
/// afterwards; a failed backup is reported but the day stays advanced.
pub fn advance_business_day(state: &PosState) -> DayAdvance {
    let business_day = state.business_day.advance();

    let mut outcome = DayAdvance {
        business_day,
        backup_path: None,
        backup_error: None,
    };

    if !state.config.auto_backup_on_advance {
        return outcome;
    }

    if let Some(dir) = &state.config.backup_dir {
        match backup::write_backup_file(state, dir, true) {
            Ok(path) => outcome.backup_path = Some(path),
            Err(e) => {
                error!(error = %e, "automatic backup failed");
                outcome.backup_error = Some(e.to_string());
            }
        }
    }

    outcome
}

/// Reconciles a cashier's submitted amounts against recorded sales.
/// `date` defaults to the current business day.
pub fn calculate_closing(
    state: &PosState,
    cashier_id: &str,
    date: Option<&str>,
    submission: ClosingSubmission,
) -> Result<ClosingReport> {
    let date = match date {
        Some(value) => parse_day(value)
            .ok_or_else(|| PosError::Validation(format!("Invalid date {}", value)))?,
        None => state.business_day.get_date(),
    };

    let sales = state.sales.list();
    let report = closing::reconcile(&sales, cashier_id, date, &submission)?;

    info!(
        cashier_id = %report.cashier_id,
        date = %report.date,
        system_total = report.system_total,
        submitted_total = report.submitted_total,
        difference = report.difference,
        "closing calculated"
    );
    Ok(report)
}

pub fn get_dashboard_summary(state: &PosState) -> DashboardSummary {
    state.refresh();

    let mut sales = state.sales.list();
    let total_sales_amount: f64 = sales.iter().map(|s| s.total_amount).sum();
    let sales_count = sales.len();

    sales.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let recent_sales = sales
        .into_iter()
        .take(RECENT_SALES_LIMIT)
        .map(|s| RecentSale {
            id: s.id,
            total_amount: s.total_amount,
            created_at: s.created_at,
        })
        .collect();

    DashboardSummary {
        business_day: state.business_day.get(),
        total_sales_amount,
        sales_count,
        menu_item_count: state.menu_items.list().len(),
        deleted_log_count: state.deleted_items.list().len(),
        recent_sales,
    }
}
