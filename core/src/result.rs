//! Result composer: final status, aggregates and advisories.
//!
//! RULE: A CalculationResult is built once per calculation and never
//! mutated afterwards. Debt reduction figures are always derived from
//! total debt and total repayment in one place (`Totals::new`).

use crate::{
    config::{EngineRules, RegionClass},
    input::RiskFactor,
    living_cost::AllowanceBreakdown,
    types::{percent_rounded, HouseholdSize, Months, Won},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Possible,
    Difficult,
    Impossible,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub status:        Status,
    pub status_reason: String,

    pub monthly_payment:      Won,
    pub repayment_months:     Months,
    pub total_repayment:      Won,
    pub total_debt_reduction: Won,
    /// Percent of total debt forgiven, rounded.
    pub debt_reduction_rate:  i64,

    pub base_living_cost:       Won,
    pub additional_living_cost: Won,
    pub recognized_living_cost: Won,
    pub disposable_income:      Won,
    pub liquidation_value:      Won,
    pub exempt_deposit:         Won,
    pub household_size:         HouseholdSize,
    pub living_cost_reduction_pct: Option<i64>,

    pub court_name:        String,
    pub region_class:      RegionClass,
    pub court_description: String,
    pub processing_months: f64,
    pub policy_year:       i32,

    pub advisories:    Vec<String>,
    pub risk_warnings: Vec<String>,
    pub unemployed_notice: Option<String>,

    pub housing_breakdown:   Option<AllowanceBreakdown>,
    pub medical_breakdown:   Option<AllowanceBreakdown>,
    pub education_breakdown: Option<AllowanceBreakdown>,
}

/// Repayment aggregates with the reduction figures derived from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub monthly_payment:      Won,
    pub repayment_months:     Months,
    pub total_repayment:      Won,
    pub total_debt_reduction: Won,
    pub debt_reduction_rate:  i64,
}

impl Totals {
    /// `total_debt` must be positive; input validation guarantees it.
    pub fn new(monthly_payment: Won, repayment_months: Months, total_debt: Won) -> Self {
        let total_repayment = monthly_payment * repayment_months as Won;
        let total_debt_reduction = total_debt - total_repayment;
        let debt_reduction_rate = percent_rounded(total_debt_reduction, total_debt);
        Self {
            monthly_payment,
            repayment_months,
            total_repayment,
            total_debt_reduction,
            debt_reduction_rate,
        }
    }

    pub fn none(total_debt: Won) -> Self {
        Self::new(0, 0, total_debt)
    }
}

#[derive(Debug, Clone)]
pub struct ClassificationContext<'a> {
    pub liquidation_value: Won,
    pub total_debt:        Won,
    pub monthly_payment:   Won,
    pub monthly_income:    Won,
    pub reduction_rate:    i64,
    pub rules:             &'a EngineRules,
}

type ClassificationRule = fn(&ClassificationContext) -> Option<(Status, &'static str)>;

/// Evaluated in order; the first match decides the status.
const CLASSIFICATION_RULES: &[(&str, ClassificationRule)] = &[
    ("assets_exceed_debt", assets_exceed_debt),
    ("payment_burden", payment_burden),
    ("repayment_exceeds_principal", repayment_exceeds_principal),
    ("low_reduction", low_reduction),
    ("possible", possible),
];

fn assets_exceed_debt(c: &ClassificationContext) -> Option<(Status, &'static str)> {
    (c.liquidation_value >= c.total_debt)
        .then_some((Status::Impossible, "Assets exceed debt; rehabilitation is not available."))
}

fn payment_burden(c: &ClassificationContext) -> Option<(Status, &'static str)> {
    (c.monthly_payment as f64 > c.monthly_income as f64 * c.rules.payment_burden_rate)
        .then_some((Status::Difficult, "Monthly payment burden is too high relative to income."))
}

fn repayment_exceeds_principal(c: &ClassificationContext) -> Option<(Status, &'static str)> {
    (c.reduction_rate < 0).then_some((Status::Impossible, "Total repayment exceeds the principal."))
}

fn low_reduction(c: &ClassificationContext) -> Option<(Status, &'static str)> {
    (c.reduction_rate < c.rules.low_reduction_rate_pct)
        .then_some((Status::Difficult, "Low reduction rate; the benefit is limited."))
}

fn possible(_: &ClassificationContext) -> Option<(Status, &'static str)> {
    Some((Status::Possible, "Rehabilitation is possible."))
}

pub fn classify(ctx: &ClassificationContext) -> (Status, String) {
    for (name, rule) in CLASSIFICATION_RULES {
        if let Some((status, reason)) = rule(ctx) {
            log::debug!("classify: rule '{name}' -> {status:?}");
            return (status, reason.to_string());
        }
    }
    (Status::Possible, "Rehabilitation is possible.".to_string())
}

/// Warnings that depend only on the declared cause of the debt.
pub fn risk_warnings(risk: RiskFactor) -> Vec<String> {
    let warnings: &[&str] = match risk {
        RiskFactor::Gambling => &[
            "Gambling debts face strict court review.",
            "Gambling may be grounds to deny discharge; consult a professional.",
        ],
        RiskFactor::Investment => &[
            "Some courts add stock or crypto trading losses to the liquidation value.",
        ],
        RiskFactor::RecentLoan => &[
            "Heavy borrowing within the last year may require additional explanation.",
        ],
        RiskFactor::None => &[],
    };
    warnings.iter().map(|w| w.to_string()).collect()
}

/// Advisories about how much debt the plan forgives.
pub fn reduction_advisory(rate: i64) -> Option<String> {
    if rate >= 80 {
        Some(format!("Up to {rate}% of the debt is expected to be forgiven. Very favourable."))
    } else if rate >= 50 {
        Some(format!("About {rate}% of the debt is expected to be forgiven."))
    } else {
        None
    }
}

pub const INFEASIBLE_ADVICE: [&str; 3] = [
    "Consider combining spouse income into the household budget.",
    "Additional income, such as part-time work, would help make a plan feasible.",
    "Bankruptcy may be a better alternative at this income level.",
];

pub const INFEASIBLE_WARNING: &str =
    "At the current income a rehabilitation plan is not realistically possible.";
