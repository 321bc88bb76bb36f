//! Repayment period selector.
//!
//! The plan must repay at least the liquidation value. Period rules are
//! evaluated in order and the first one that returns a decision wins:
//!
//!   1. shortened_term: eligible applicants whose disposable income
//!      covers the liquidation value within the shortened term.
//!   2. income_driven: disposable income over the standard period
//!      covers the liquidation value.
//!   3. asset_driven: the shortest candidate period whose required
//!      payment stays within the sustainable maximum.
//!   4. unaffordable: no candidate works; longest period for reference.

use crate::{
    config::EngineRules,
    format::{format_monthly, format_won},
    types::{Months, Won},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodBranch {
    ShortenedTerm,
    IncomeDriven,
    AssetDriven,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeriodDecision {
    Selected {
        months:          Months,
        monthly_payment: Won,
        branch:          PeriodBranch,
        advisories:      Vec<String>,
    },
    /// Terminal. Figures are for the longest candidate period.
    Unaffordable {
        months:          Months,
        monthly_payment: Won,
    },
}

impl PeriodDecision {
    pub fn months(&self) -> Months {
        match self {
            PeriodDecision::Selected { months, .. } | PeriodDecision::Unaffordable { months, .. } => *months,
        }
    }

    pub fn monthly_payment(&self) -> Won {
        match self {
            PeriodDecision::Selected { monthly_payment, .. }
            | PeriodDecision::Unaffordable { monthly_payment, .. } => *monthly_payment,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PeriodContext<'a> {
    pub disposable:        Won,
    pub liquidation_value: Won,
    pub max_sustainable:   Won,
    pub shortened_term_eligible: bool,
    pub rules:             &'a EngineRules,
}

type PeriodRule = fn(&PeriodContext) -> Option<PeriodDecision>;

const PERIOD_RULES: &[(&str, PeriodRule)] = &[
    ("shortened_term", shortened_term),
    ("income_driven", income_driven),
    ("asset_driven", asset_driven),
    ("unaffordable", unaffordable),
];

/// Income minus the part of the base living cost that is never given up.
pub fn max_sustainable_payment(income: Won, base_living_cost: Won, rules: &EngineRules) -> Won {
    income - (base_living_cost as f64 * rules.affordability_floor_rate).floor() as Won
}

/// Deterministic: the same context always yields the same decision.
pub fn select_period(ctx: &PeriodContext) -> PeriodDecision {
    for (name, rule) in PERIOD_RULES {
        if let Some(decision) = rule(ctx) {
            log::debug!(
                "period: rule '{name}' chose {} months at {}",
                decision.months(),
                decision.monthly_payment()
            );
            return decision;
        }
    }
    unaffordable_figures(ctx)
}

fn ceil_div(amount: Won, months: Months) -> Won {
    let months = months as Won;
    (amount + months - 1) / months
}

fn income_payment(ctx: &PeriodContext) -> Won {
    ctx.disposable.max(ctx.rules.min_disposable_income)
}

fn shortened_term(ctx: &PeriodContext) -> Option<PeriodDecision> {
    let term = ctx.rules.shortened_term;
    if !ctx.shortened_term_eligible || ctx.disposable * (term as Won) < ctx.liquidation_value {
        return None;
    }
    Some(PeriodDecision::Selected {
        months: term,
        monthly_payment: income_payment(ctx),
        branch: PeriodBranch::ShortenedTerm,
        advisories: vec![format!("The court's {term}-month shortened term applies.")],
    })
}

fn income_driven(ctx: &PeriodContext) -> Option<PeriodDecision> {
    let months = ctx.rules.standard_period();
    if ctx.disposable * (months as Won) < ctx.liquidation_value {
        return None;
    }
    let mut advisories = Vec::new();
    if ctx.shortened_term_eligible {
        let term = ctx.rules.shortened_term;
        advisories.push(format!(
            "The term was extended to {months} months to cover the liquidation value. \
             Keeping {term} months would need {}.",
            format_monthly(ceil_div(ctx.liquidation_value, term))
        ));
    }
    Some(PeriodDecision::Selected {
        months,
        monthly_payment: income_payment(ctx),
        branch: PeriodBranch::IncomeDriven,
        advisories,
    })
}

fn asset_driven(ctx: &PeriodContext) -> Option<PeriodDecision> {
    let (months, required) = ctx
        .rules
        .candidate_periods
        .iter()
        .map(|&p| (p, ceil_div(ctx.liquidation_value, p)))
        .find(|&(_, required)| required <= ctx.max_sustainable)?;

    let mut advisories = vec![format!(
        "Liquidation value {} requires {} over {months} months.",
        format_won(ctx.liquidation_value),
        format_monthly(required)
    )];
    if ctx.shortened_term_eligible {
        advisories.push(format!(
            "The {}-month shortened term does not apply because assets require a longer plan.",
            ctx.rules.shortened_term
        ));
    }
    // Never below disposable income. When a high-income cap pushed living
    // cost under the affordability floor this can exceed max_sustainable.
    Some(PeriodDecision::Selected {
        months,
        monthly_payment: required.max(ctx.disposable),
        branch: PeriodBranch::AssetDriven,
        advisories,
    })
}

fn unaffordable(ctx: &PeriodContext) -> Option<PeriodDecision> {
    Some(unaffordable_figures(ctx))
}

fn unaffordable_figures(ctx: &PeriodContext) -> PeriodDecision {
    let months = ctx.rules.longest_period();
    PeriodDecision::Unaffordable {
        months,
        monthly_payment: ceil_div(ctx.liquidation_value, months),
    }
}
