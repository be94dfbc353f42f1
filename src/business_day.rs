use std::sync::{Mutex, PoisonError};

use chrono::{Days, Local, NaiveDate};
use serde_json::Value;
use tracing::{info, warn};

use crate::store::{Store, CURRENT_BUSINESS_DAY_KEY};

pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Fallback used when there is no durable storage to read from.
const DETACHED_DEFAULT_DAY: &str = "2024-01-01";

pub fn parse_day(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, DAY_FORMAT).ok()
}

pub fn format_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

fn system_today() -> NaiveDate {
    Local::now().date_naive()
}

/// The current business day. A malformed stored value is replaced by today.
pub struct BusinessDayClock {
    store: Store,
    today: fn() -> NaiveDate,
    current: Mutex<String>,
}

impl BusinessDayClock {
    pub fn new(store: Store) -> Self {
        Self::with_today(store, system_today)
    }

    /// Same as [`BusinessDayClock::new`] with a custom source for "today".
    pub fn with_today(store: Store, today: fn() -> NaiveDate) -> Self {
        let initial = if store.is_available() {
            format_day(today())
        } else {
            DETACHED_DEFAULT_DAY.to_string()
        };
        let clock = BusinessDayClock {
            store,
            today,
            current: Mutex::new(initial),
        };
        clock.get();
        clock
    }

    pub fn today(&self) -> NaiveDate {
        (self.today)()
    }

    pub fn get(&self) -> String {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.store.is_available() {
            return current.clone();
        }

        let fallback = Value::String(current.clone());
        let stored: Value = self.store.load(CURRENT_BUSINESS_DAY_KEY, &fallback);
        match stored.as_str().filter(|day| parse_day(day).is_some()) {
            Some(day) => *current = day.to_string(),
            None => {
                let today = format_day(self.today());
                warn!(stored = %stored, today = %today, "stored business day is invalid, resetting to system date");
                self.store.save(CURRENT_BUSINESS_DAY_KEY, &today);
                *current = today;
            }
        }
        current.clone()
    }

    pub fn get_date(&self) -> NaiveDate {
        parse_day(&self.get()).unwrap_or_else(|| self.today())
    }

    pub fn advance(&self) -> String {
        let day = self.get_date();
        let next = format_day(day.checked_add_days(Days::new(1)).unwrap_or(day));
        self.set(next.clone());
        info!(business_day = %next, "business day advanced");
        next
    }

    /// Overwrites the business day. The value must already be validated.
    pub(crate) fn set(&self, day: String) {
        self.replace(day);
        self.persist();
    }

    /// In-memory only; pair with [`BusinessDayClock::persist`].
    pub(crate) fn replace(&self, day: String) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = day;
    }

    pub(crate) fn persist(&self) {
        let current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        self.store.save(CURRENT_BUSINESS_DAY_KEY, &*current);
    }

    pub(crate) fn reset_to_today(&self) -> String {
        let today = format_day(self.today());
        self.set(today.clone());
        today
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use std::sync::Arc;

    fn fixed_today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
    }

    fn setup_store() -> Store {
        let db = Database::open_in_memory().unwrap();
        db.initialize().unwrap();
        Store::new(Arc::new(db))
    }

    #[test]
    fn test_fresh_store_starts_today() {
        let store = setup_store();
        let clock = BusinessDayClock::with_today(store.clone(), fixed_today);
        assert_eq!(clock.get(), "2024-05-10");
        assert_eq!(
            store.raw(CURRENT_BUSINESS_DAY_KEY),
            Some("\"2024-05-10\"".to_string())
        );
    }

    #[test]
    fn test_invalid_day_self_heals() {
        let store = setup_store();
        let clock = BusinessDayClock::with_today(store.clone(), fixed_today);

        store.save(CURRENT_BUSINESS_DAY_KEY, "not-a-date");
        assert_eq!(clock.get(), "2024-05-10");
        assert_eq!(
            store.raw(CURRENT_BUSINESS_DAY_KEY),
            Some("\"2024-05-10\"".to_string())
        );
    }

    #[test]
    fn test_impossible_calendar_date_self_heals() {
        let store = setup_store();
        let clock = BusinessDayClock::with_today(store.clone(), fixed_today);

        store.save(CURRENT_BUSINESS_DAY_KEY, "2024-02-30");
        assert_eq!(clock.get(), "2024-05-10");
    }

    #[test]
    fn test_non_string_day_self_heals() {
        let store = setup_store();
        let clock = BusinessDayClock::with_today(store.clone(), fixed_today);

        store.save_raw(CURRENT_BUSINESS_DAY_KEY, "42");
        assert_eq!(clock.get(), "2024-05-10");
    }

    #[test]
    fn test_future_day_is_kept() {
        let store = setup_store();
        let clock = BusinessDayClock::with_today(store.clone(), fixed_today);

        store.save(CURRENT_BUSINESS_DAY_KEY, "2031-01-01");
        assert_eq!(clock.get(), "2031-01-01");
    }

    #[test]
    fn test_advance_one_and_two_days() {
        let store = setup_store();
        let clock = BusinessDayClock::with_today(store.clone(), fixed_today);
        store.save(CURRENT_BUSINESS_DAY_KEY, "2024-02-28");

        assert_eq!(clock.advance(), "2024-02-29");
        assert_eq!(clock.advance(), "2024-03-01");
        assert_eq!(clock.get(), "2024-03-01");
    }

    #[test]
    fn test_advance_across_year_end() {
        let store = setup_store();
        let clock = BusinessDayClock::with_today(store.clone(), fixed_today);
        store.save(CURRENT_BUSINESS_DAY_KEY, "2024-12-31");

        assert_eq!(clock.advance(), "2025-01-01");
    }

    #[test]
    fn test_advance_from_invalid_day_uses_today() {
        let store = setup_store();
        let clock = BusinessDayClock::with_today(store.clone(), fixed_today);
        store.save(CURRENT_BUSINESS_DAY_KEY, "garbage");

        assert_eq!(clock.advance(), "2024-05-11");
    }

    #[test]
    fn test_detached_clock_uses_fixed_day() {
        let clock = BusinessDayClock::with_today(Store::detached(), fixed_today);
        assert_eq!(clock.get(), "2024-01-01");
        assert_eq!(clock.advance(), "2024-01-02");
        assert_eq!(clock.get(), "2024-01-02");
    }
}
