//! Living-cost evaluator: base household allowance plus itemized
//! housing, medical and education supplements.
//!
//! Each supplement carries a one-line derivation of its arithmetic.
//! The derivation is part of the result, not a log line.

use crate::{
    config::{PolicyConfig, RegionClass},
    format::group_thousands as g,
    input::{HousingType, UserInput},
    types::{HouseholdSize, Won},
};
use serde::{Deserialize, Serialize};

/// How one supplement was derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceBreakdown {
    /// What the applicant actually spends per month.
    pub raw_cost:    Won,
    /// The part already covered by the base allowance.
    pub included:    Won,
    /// The supplement recognized on top of the base allowance.
    pub allowed:     Won,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LivingCostAssessment {
    pub base:      Won,
    pub housing:   Option<AllowanceBreakdown>,
    pub medical:   Option<AllowanceBreakdown>,
    pub education: Option<AllowanceBreakdown>,
}

impl LivingCostAssessment {
    pub fn additional(&self) -> Won {
        [&self.housing, &self.medical, &self.education]
            .into_iter()
            .flatten()
            .map(|b| b.allowed)
            .sum()
    }

    pub fn total(&self) -> Won {
        self.base + self.additional()
    }
}

pub fn assess(input: &UserInput, class: RegionClass, policy: &PolicyConfig) -> LivingCostAssessment {
    let size = input.household_size;
    let base = policy.base_living_cost(size);

    let housing = if input.housing == HousingType::Owned {
        None
    } else {
        housing_supplement(input.rent, class, size, policy)
    };
    let medical = medical_supplement(input.medical_cost, size, policy);
    let education = education_supplement(
        input.education_cost,
        input.minor_children,
        input.special_education,
        policy,
    );

    let assessment = LivingCostAssessment { base, housing, medical, education };
    log::debug!(
        "living cost: size={size} base={base} additional={} total={}",
        assessment.additional(),
        assessment.total()
    );
    assessment
}

/// Rent above the included share, capped per region class and household size.
pub fn housing_supplement(
    rent:   Won,
    class:  RegionClass,
    size:   HouseholdSize,
    policy: &PolicyConfig,
) -> Option<AllowanceBreakdown> {
    if rent <= 0 {
        return None;
    }
    let Some(row) = policy.housing_allowance(class, size) else {
        return Some(AllowanceBreakdown {
            raw_cost: rent,
            included: 0,
            allowed: 0,
            explanation: format!(
                "rent {} not recognized: no housing allowance for {} at size {size}",
                g(rent),
                class.label()
            ),
        });
    };

    let excess = (rent - row.included).max(0);
    let allowed = excess.min(row.limit);
    Some(AllowanceBreakdown {
        raw_cost: rent,
        included: row.included,
        allowed,
        explanation: format!(
            "rent {} - included {} = {}, capped at {} -> {}",
            g(rent), g(row.included), g(excess), g(row.limit), g(allowed)
        ),
    })
}

/// Medical cost above the included share. No cap.
pub fn medical_supplement(cost: Won, size: HouseholdSize, policy: &PolicyConfig) -> Option<AllowanceBreakdown> {
    if cost <= 0 {
        return None;
    }
    let included = policy.medical_included(size);
    let allowed = (cost - included).max(0);
    Some(AllowanceBreakdown {
        raw_cost: cost,
        included,
        allowed,
        explanation: format!(
            "medical {} - included {} = {} (uncapped)",
            g(cost), g(included), g(allowed)
        ),
    })
}

/// Education cost per minor child, capped per child, minus the included share.
pub fn education_supplement(
    total_cost: Won,
    children:   u32,
    special:    bool,
    policy:     &PolicyConfig,
) -> Option<AllowanceBreakdown> {
    if children == 0 || total_cost <= 0 {
        return None;
    }
    let criteria = policy.education;
    let per_child = total_cost / children as Won;
    let cap = if special { criteria.special_limit } else { criteria.limit };
    let per_child_allowed = (per_child.min(cap) - criteria.included).max(0);
    let allowed = per_child_allowed * children as Won;
    let cap_label = if special { "special cap" } else { "cap" };
    Some(AllowanceBreakdown {
        raw_cost: total_cost,
        included: criteria.included * children as Won,
        allowed,
        explanation: format!(
            "per child {} ({} / {children}), {cap_label} {}, minus included {} = {} x {children} = {}",
            g(per_child), g(total_cost), g(cap), g(criteria.included),
            g(per_child_allowed), g(allowed)
        ),
    })
}
