use rehab_core::{
    config::PolicyConfig,
    feasibility::{search, FeasibilityOutcome},
    high_income::{adjust, IncomeCap},
    types::HouseholdSize,
};

fn policy_with_one_person_cost(cost: i64) -> PolicyConfig {
    let mut policy = PolicyConfig::default_2026();
    policy.living_cost.insert(1, cost);
    policy
}

fn attempts_of(outcome: &FeasibilityOutcome) -> &[rehab_core::feasibility::Attempt] {
    match outcome {
        FeasibilityOutcome::Feasible(plan) => plan.attempts.as_slice(),
        FeasibilityOutcome::Infeasible { attempts, .. } => attempts.as_slice(),
    }
}

#[test]
fn sufficient_income_is_accepted_at_the_requested_size() {
    let policy = PolicyConfig::default_2026();
    let size = HouseholdSize::persons(2);
    let outcome = search(4_000_000, size, policy.base_living_cost(size), &policy);

    let FeasibilityOutcome::Feasible(plan) = outcome else {
        panic!("expected a feasible plan");
    };
    assert_eq!(plan.household_size, size);
    assert_eq!(plan.disposable, 4_000_000 - 2_519_575);
    assert_eq!(plan.reduction_pct, None);
    assert_eq!(plan.attempts.len(), 1);
    assert!(!plan.household_reduced(size));
}

#[test]
fn household_shrinks_in_half_steps_until_feasible() {
    let policy = PolicyConfig::default_2026();
    let size = HouseholdSize::persons(3);
    let outcome = search(2_000_000, size, policy.base_living_cost(size), &policy);

    let FeasibilityOutcome::Feasible(plan) = &outcome else {
        panic!("expected a feasible plan");
    };
    assert_eq!(plan.household_size, HouseholdSize::ONE);
    assert_eq!(plan.living_cost, 1_538_543);
    assert_eq!(plan.disposable, 461_457);
    assert!(plan.household_reduced(size));

    let sizes: Vec<u32> = plan.attempts.iter().map(|a| a.household_size.halves()).collect();
    assert_eq!(sizes, vec![6, 5, 4, 3, 2]);
}

#[test]
fn attempts_never_increase_size_or_cost() {
    let policy = PolicyConfig::default_2026();
    for persons in 1..=6 {
        let size = HouseholdSize::persons(persons);
        // Start above the table value, as supplements would.
        let start = policy.base_living_cost(size) + 400_000;
        for income in [0, 900_000, 1_500_000, 2_200_000, 3_500_000, 6_000_000] {
            let outcome = search(income, size, start, &policy);
            let attempts = attempts_of(&outcome);
            for pair in attempts.windows(2) {
                assert!(pair[1].household_size <= pair[0].household_size);
                assert!(pair[1].living_cost <= pair[0].living_cost);
            }
            let bound = (persons as usize - 1) * 2 + 2;
            assert!(attempts.len() <= bound, "{} attempts for {persons} persons", attempts.len());
        }
    }
}

#[test]
fn one_person_living_cost_cut_is_reported_as_a_percentage() {
    let policy = policy_with_one_person_cost(1_050_000);
    let outcome = search(1_000_000, HouseholdSize::ONE, 1_050_000, &policy);

    let FeasibilityOutcome::Feasible(plan) = outcome else {
        panic!("expected the living cost cut to succeed");
    };
    assert_eq!(plan.living_cost, 900_000);
    assert_eq!(plan.disposable, 100_000);
    assert_eq!(plan.reduction_pct, Some(14));
    assert_eq!(plan.attempts.len(), 2);
}

#[test]
fn supplements_do_not_move_the_cut_limit() {
    let policy = PolicyConfig::default_2026();
    // One person with rent: start well above the base allowance.
    let outcome = search(1_400_000, HouseholdSize::ONE, 1_964_682, &policy);

    let FeasibilityOutcome::Feasible(plan) = outcome else {
        panic!("expected the cut to be measured against the base allowance");
    };
    assert_eq!(plan.living_cost, 1_300_000);
    assert_eq!(plan.reduction_pct, Some(16));
}

#[test]
fn dropping_only_supplements_reports_no_cut() {
    let policy = PolicyConfig::default_2026();
    let outcome = search(1_700_000, HouseholdSize::ONE, 1_964_682, &policy);

    let FeasibilityOutcome::Feasible(plan) = outcome else {
        panic!("expected a feasible plan");
    };
    assert_eq!(plan.living_cost, 1_600_000);
    assert_eq!(plan.reduction_pct, Some(0));
}

#[test]
fn cut_deeper_than_twenty_percent_is_infeasible() {
    let policy = PolicyConfig::default_2026();
    let outcome = search(800_000, HouseholdSize::ONE, 1_538_543, &policy);

    match outcome {
        FeasibilityOutcome::Infeasible { attempts, min_allowed_living_cost } => {
            assert_eq!(attempts.len(), 1);
            assert_eq!(min_allowed_living_cost, 1_230_834);
        }
        FeasibilityOutcome::Feasible(plan) => panic!("unexpected plan {plan:?}"),
    }
}

// ── High-income adjustment ─────────────────────────────────────

#[test]
fn income_below_threshold_is_untouched() {
    let policy = PolicyConfig::default_2026();
    let a = adjust(3_000_000, 50_000_000, HouseholdSize::ONE, 2_000_000, &policy);
    assert!(!a.triggered);
    assert_eq!(a.adjusted, 2_000_000);
    assert!(a.advisory().is_none());
}

#[test]
fn median_income_cap_binds_for_moderate_debt() {
    let policy = PolicyConfig::default_2026();
    let a = adjust(10_000_000, 100_000_000, HouseholdSize::ONE, 3_000_000, &policy);
    assert!(a.triggered);
    assert_eq!(a.binding_cap, Some(IncomeCap::MedianIncome));
    assert_eq!(a.adjusted, 2_564_238);
    assert!(a.advisory().is_some());
}

#[test]
fn minimum_repayment_cap_binds_for_large_debt() {
    let policy = PolicyConfig::default_2026();
    // 36-month floor: ceil(1,000,000,000 * 0.4 / 36) = 11,111,112 > income.
    let a = adjust(10_000_000, 1_000_000_000, HouseholdSize::ONE, 3_000_000, &policy);
    assert_eq!(a.binding_cap, Some(IncomeCap::MinimumRepayment));
    assert_eq!(a.adjusted, 0);
}

#[test]
fn triggered_without_binding_cap_keeps_living_cost() {
    let policy = PolicyConfig::default_2026();
    let a = adjust(10_000_000, 100_000_000, HouseholdSize::ONE, 2_000_000, &policy);
    assert!(a.triggered);
    assert_eq!(a.binding_cap, None);
    assert_eq!(a.adjusted, 2_000_000);
}
