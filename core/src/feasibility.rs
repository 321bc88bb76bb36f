//! Feasibility search: find a household size and living cost that leave
//! at least the minimum disposable income.
//!
//! ORDER (fixed, stops at the first success):
//!   1. The applicant's household size with the recognized living cost.
//!   2. Household size reduced half a person at a time down to one,
//!      each step using the base allowance for that size.
//!   3. The living cost cut to leave exactly the minimum, never below the
//!      one-person base allowance less the policy's maximum reduction rate.
//!
//! RULES:
//!   - Household size and living cost never increase between attempts.
//!   - At most (size - 1) * 2 + 2 attempts are made.

use crate::{
    config::PolicyConfig,
    types::{percent_rounded, HouseholdSize, Won},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attempt {
    pub household_size: HouseholdSize,
    pub living_cost:    Won,
    pub disposable:     Won,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeasiblePlan {
    pub household_size: HouseholdSize,
    pub living_cost:    Won,
    pub disposable:     Won,
    /// Set when the one-person living cost had to be cut.
    pub reduction_pct:  Option<i64>,
    pub attempts:       Vec<Attempt>,
}

impl FeasiblePlan {
    pub fn household_reduced(&self, requested: HouseholdSize) -> bool {
        self.household_size < requested
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeasibilityOutcome {
    Feasible(FeasiblePlan),
    Infeasible {
        attempts: Vec<Attempt>,
        /// The lowest living cost the policy allows at one person.
        min_allowed_living_cost: Won,
    },
}

pub fn search(
    income:      Won,
    size:        HouseholdSize,
    living_cost: Won,
    policy:      &PolicyConfig,
) -> FeasibilityOutcome {
    let floor = policy.rules.min_disposable_income;
    let mut attempts = Vec::new();
    let mut size = size;
    let mut cost = living_cost;

    loop {
        let disposable = income - cost;
        attempts.push(Attempt { household_size: size, living_cost: cost, disposable });
        log::debug!("feasibility: size={size} living_cost={cost} disposable={disposable}");

        if disposable >= floor {
            return FeasibilityOutcome::Feasible(FeasiblePlan {
                household_size: size,
                living_cost: cost,
                disposable,
                reduction_pct: None,
                attempts,
            });
        }
        match size.step_down() {
            Some(next) => {
                size = next;
                cost = cost.min(policy.base_living_cost(next));
            }
            None => break,
        }
    }

    // One person and still short: cut the living cost, bounded against the
    // one-person base allowance. target < cost always holds here.
    let unreduced = policy.base_living_cost(HouseholdSize::ONE);
    let min_allowed =
        (unreduced as f64 * (1.0 - policy.rules.max_living_cost_reduction_rate)).floor() as Won;
    let target = income - floor;

    if target >= min_allowed && unreduced > 0 {
        // Zero when only supplements had to go.
        let reduction_pct = percent_rounded(unreduced - target, unreduced).max(0);
        attempts.push(Attempt { household_size: size, living_cost: target, disposable: floor });
        log::debug!("feasibility: living cost cut {reduction_pct}% to {target}");
        return FeasibilityOutcome::Feasible(FeasiblePlan {
            household_size: size,
            living_cost: target,
            disposable: floor,
            reduction_pct: Some(reduction_pct),
            attempts,
        });
    }

    log::info!(
        "feasibility: infeasible, income={income} needs living cost {target} below minimum {min_allowed}"
    );
    FeasibilityOutcome::Infeasible { attempts, min_allowed_living_cost: min_allowed }
}
