//! Policy-by-date resolution.
//!
//! RULE: A resolved policy is an Arc snapshot. Publishing a new policy
//! replaces the entry for its year; callers holding the old Arc keep
//! calculating against the old figures.

use crate::{
    config::PolicyConfig,
    error::{RehabError, RehabResult},
};
use chrono::{Datelike, NaiveDate};
use std::{collections::BTreeMap, sync::Arc};

/// Resolves the policy in force on a date.
///
/// Year selection: the date's own year if present, else the newest year
/// before it, else the earliest year on record.
pub trait PolicyResolver {
    fn policy_for_date(&self, date: NaiveDate) -> RehabResult<Arc<PolicyConfig>>;
}

/// Last year the builtin 2026 tables are carried forward to.
pub const DEFAULT_HORIZON_YEAR: i32 = 2035;

#[derive(Debug, Clone, Default)]
pub struct PolicyBook {
    by_year: BTreeMap<i32, Arc<PolicyConfig>>,
}

impl PolicyBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// The builtin 2026 tables, in force from 2026 through 2035.
    pub fn with_defaults() -> Self {
        let base = PolicyConfig::default_2026();
        let mut book = Self::new();
        for year in base.base_year..=DEFAULT_HORIZON_YEAR {
            book.by_year.insert(year, Arc::new(base.for_year(year)));
        }
        book
    }

    /// Validate and install a policy for its base year.
    pub fn publish(&mut self, policy: PolicyConfig) -> RehabResult<()> {
        policy.validate()?;
        log::info!("policy book: published {}", policy.base_year);
        self.by_year.insert(policy.base_year, Arc::new(policy));
        Ok(())
    }

    pub fn years(&self) -> Vec<i32> {
        self.by_year.keys().copied().collect()
    }
}

impl PolicyResolver for PolicyBook {
    fn policy_for_date(&self, date: NaiveDate) -> RehabResult<Arc<PolicyConfig>> {
        let year = date.year();
        let found = self
            .by_year
            .range(..=year)
            .next_back()
            .or_else(|| self.by_year.iter().next());
        match found {
            Some((&resolved, policy)) => {
                if resolved != year {
                    log::warn!("policy book: no {year} policy, using {resolved}");
                }
                Ok(Arc::clone(policy))
            }
            None => Err(RehabError::PolicyNotFound { date }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn defaults_cover_through_horizon_and_beyond() {
        let book = PolicyBook::with_defaults();
        assert_eq!(book.policy_for_date(date(2030, 6, 1)).unwrap().base_year, 2030);
        assert_eq!(book.policy_for_date(date(2040, 1, 1)).unwrap().base_year, 2035);
        assert_eq!(book.policy_for_date(date(2024, 1, 1)).unwrap().base_year, 2026);
    }

    #[test]
    fn empty_book_reports_not_found() {
        let err = PolicyBook::new().policy_for_date(date(2026, 1, 1)).unwrap_err();
        assert!(matches!(err, RehabError::PolicyNotFound { .. }));
    }

    #[test]
    fn held_snapshot_survives_republish() {
        let mut book = PolicyBook::with_defaults();
        let held = book.policy_for_date(date(2027, 3, 1)).unwrap();

        let mut revised = PolicyConfig::default_2026().for_year(2027);
        revised.rules.min_disposable_income = 200_000;
        book.publish(revised).unwrap();

        assert_eq!(held.rules.min_disposable_income, 100_000);
        let fresh = book.policy_for_date(date(2027, 3, 1)).unwrap();
        assert_eq!(fresh.rules.min_disposable_income, 200_000);
    }
}
