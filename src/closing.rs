use chrono::NaiveDate;

use crate::business_day::format_day;
use crate::error::{PosError, Result};
use crate::models::{ClosingReport, ClosingStatus, ClosingSubmission, SaleEntry};

/// Sales recorded by `cashier_id` whose timestamp falls on `date` (UTC calendar day).
pub fn sales_for_cashier_on<'a>(
    sales: &'a [SaleEntry],
    cashier_id: &'a str,
    date: NaiveDate,
) -> impl Iterator<Item = &'a SaleEntry> + 'a {
    sales
        .iter()
        .filter(move |sale| sale.cashier_id == cashier_id && sale.created_at.date_naive() == date)
}

pub fn system_total(sales: &[SaleEntry], cashier_id: &str, date: NaiveDate) -> f64 {
    sales_for_cashier_on(sales, cashier_id, date)
        .map(|sale| sale.total_amount)
        .sum()
}

impl ClosingSubmission {
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("Cash", self.cash),
            ("Expenses", self.expenses),
            ("Other", self.other),
            ("Returns", self.returns),
        ];
        for (field, amount) in fields {
            if amount.is_nan() || amount < 0.0 {
                return Err(PosError::NegativeAmount { field });
            }
        }
        Ok(())
    }

    pub fn total(&self) -> f64 {
        self.cash + self.expenses + self.other + self.returns
    }
}

pub fn classify(difference: f64) -> ClosingStatus {
    if difference == 0.0 {
        ClosingStatus::Balanced
    } else if difference > 0.0 {
        ClosingStatus::Shortage
    } else {
        ClosingStatus::Overage
    }
}

fn closing_message(status: ClosingStatus, difference: f64) -> String {
    match status {
        ClosingStatus::Balanced => "Submitted amount matches system sales.".to_string(),
        ClosingStatus::Shortage => format!(
            "System has PKR {:.2} more sales recorded than submitted (Shortage).",
            difference
        ),
        ClosingStatus::Overage => format!(
            "Submitted amount is PKR {:.2} more than system sales (Overage). Please verify.",
            difference.abs()
        ),
    }
}

/// Compares what the ledger says a cashier took on `date` with what they handed in.
/// Nothing is stored; call again after every change to the submission.
pub fn reconcile(
    sales: &[SaleEntry],
    cashier_id: &str,
    date: NaiveDate,
    submission: &ClosingSubmission,
) -> Result<ClosingReport> {
    if cashier_id.trim().is_empty() {
        return Err(PosError::Validation(
            "Please select a cashier to calculate closing.".to_string(),
        ));
    }
    submission.validate()?;

    let matched: Vec<&SaleEntry> = sales_for_cashier_on(sales, cashier_id, date).collect();
    let system_total: f64 = matched.iter().map(|sale| sale.total_amount).sum();
    let submitted_total = submission.total();
    let difference = system_total - submitted_total;
    let status = classify(difference);

    Ok(ClosingReport {
        cashier_id: cashier_id.to_string(),
        date: format_day(date),
        sales_count: matched.len(),
        system_total,
        submitted_total,
        difference,
        status,
        message: closing_message(status, difference),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sale(id: &str, cashier: &str, day: u32, hour: u32, total: f64) -> SaleEntry {
        SaleEntry {
            id: id.to_string(),
            table_number: None,
            customer_name: None,
            waiter_name: None,
            items: Vec::new(),
            subtotal: total,
            tax: None,
            discount: None,
            total_amount: total,
            created_at: Utc.with_ymd_and_hms(2024, 5, day, hour, 30, 0).unwrap(),
            cashier_id: cashier.to_string(),
        }
    }

    fn ledger() -> Vec<SaleEntry> {
        vec![
            sale("b1", "ca1", 10, 0, 600.0),
            sale("b2", "ca1", 10, 23, 400.0),
            sale("b3", "ca2", 10, 12, 999.0),
            sale("b4", "ca1", 11, 9, 50.0),
        ]
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
    }

    fn submit(cash: f64, expenses: f64, other: f64, returns: f64) -> ClosingSubmission {
        ClosingSubmission {
            cash,
            expenses,
            other,
            returns,
        }
    }

    #[test]
    fn test_system_total_filters_cashier_and_day() {
        assert_eq!(system_total(&ledger(), "ca1", day()), 1000.0);
        assert_eq!(system_total(&ledger(), "ca2", day()), 999.0);
        assert_eq!(system_total(&ledger(), "ca3", day()), 0.0);
    }

    #[test]
    fn test_balanced() {
        let report = reconcile(&ledger(), "ca1", day(), &submit(700.0, 200.0, 50.0, 50.0)).unwrap();
        assert_eq!(report.status, ClosingStatus::Balanced);
        assert_eq!(report.difference, 0.0);
        assert_eq!(report.sales_count, 2);
        assert_eq!(report.date, "2024-05-10");
    }

    #[test]
    fn test_shortage() {
        let report = reconcile(&ledger(), "ca1", day(), &submit(800.0, 0.0, 0.0, 0.0)).unwrap();
        assert_eq!(report.status, ClosingStatus::Shortage);
        assert_eq!(report.difference, 200.0);
        assert!(report.message.contains("PKR 200.00"));
    }

    #[test]
    fn test_overage() {
        let report = reconcile(&ledger(), "ca1", day(), &submit(1000.0, 100.0, 100.0, 0.0)).unwrap();
        assert_eq!(report.status, ClosingStatus::Overage);
        assert_eq!(report.difference, -200.0);
        assert!(report.message.contains("PKR 200.00"));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let result = reconcile(&ledger(), "ca1", day(), &submit(1000.0, -1.0, 0.0, 0.0));
        assert!(matches!(
            result,
            Err(PosError::NegativeAmount { field: "Expenses" })
        ));
    }

    #[test]
    fn test_missing_cashier_rejected() {
        let result = reconcile(&ledger(), " ", day(), &submit(0.0, 0.0, 0.0, 0.0));
        assert!(matches!(result, Err(PosError::Validation(_))));
    }

    #[test]
    fn test_no_sales_with_zero_submission_is_balanced() {
        let report = reconcile(&[], "ca1", day(), &ClosingSubmission::default()).unwrap();
        assert_eq!(report.status, ClosingStatus::Balanced);
        assert_eq!(report.sales_count, 0);
    }
}
