//! High-income adjuster.
//!
//! Runs after the base allowance and supplements are summed and before
//! the feasibility search. The order matters: the caps here decide which
//! living cost the search starts from.

use crate::{
    config::PolicyConfig,
    format::format_won,
    types::{HouseholdSize, Won},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeCap {
    /// Living cost capped at a share of median income.
    MedianIncome,
    /// Living cost cut so a minimum share of debt is repaid over 36 months.
    MinimumRepayment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighIncomeAdjustment {
    pub triggered:     bool,
    pub median_income: Won,
    pub unadjusted:    Won,
    pub adjusted:      Won,
    /// The cap that lowered the living cost, if any did.
    pub binding_cap:   Option<IncomeCap>,
}

impl HighIncomeAdjustment {
    pub fn advisory(&self) -> Option<String> {
        let cap = self.binding_cap?;
        Some(match cap {
            IncomeCap::MedianIncome => format!(
                "High income: recognized living cost capped at {} (median income limit).",
                format_won(self.adjusted)
            ),
            IncomeCap::MinimumRepayment => format!(
                "High income: recognized living cost reduced to {} to meet the minimum repayment ratio.",
                format_won(self.adjusted)
            ),
        })
    }
}

pub fn adjust(
    income:      Won,
    total_debt:  Won,
    size:        HouseholdSize,
    living_cost: Won,
    policy:      &PolicyConfig,
) -> HighIncomeAdjustment {
    let rule = policy.high_income;
    let median_income = policy.median_income(size);
    let threshold = median_income as f64 * rule.threshold_rate;

    let mut adjustment = HighIncomeAdjustment {
        triggered: false,
        median_income,
        unadjusted: living_cost,
        adjusted: living_cost,
        binding_cap: None,
    };
    if (income as f64) <= threshold {
        return adjustment;
    }
    adjustment.triggered = true;

    let median_cap = (median_income as f64 * rule.max_living_cost_rate).floor() as Won;
    let min_monthly_repayment = (total_debt as f64 * rule.min_repayment_rate / 36.0).ceil() as Won;
    let repayment_cap = (income - min_monthly_repayment).max(0);

    let (cap, kind) = if repayment_cap < median_cap {
        (repayment_cap, IncomeCap::MinimumRepayment)
    } else {
        (median_cap, IncomeCap::MedianIncome)
    };
    if cap < living_cost {
        adjustment.adjusted = cap;
        adjustment.binding_cap = Some(kind);
    }

    log::debug!(
        "high income: income={income} threshold={threshold:.0} median_cap={median_cap} \
         repayment_cap={repayment_cap} adjusted={}",
        adjustment.adjusted
    );
    adjustment
}
