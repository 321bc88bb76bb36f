//! The calculation engine.
//!
//! EXECUTION ORDER (fixed, never reordered):
//!   1. Input validation
//!   2. Region resolver        -> court trait, region class
//!   3. Living-cost evaluator  -> base + supplements
//!   4. High-income adjuster   -> capped living cost
//!   5. Feasibility search     -> terminal IMPOSSIBLE if infeasible
//!   6. Liquidation valuator
//!   7. Period selector        -> terminal IMPOSSIBLE if unaffordable
//!   8. Result composer
//!
//! RULES:
//!   - The engine never mutates its policy. One call, one fresh result.
//!   - Advisories are appended stage by stage, never overwritten.
//!   - Risk warnings are attached on every outcome, terminal or not.

use crate::{
    config::PolicyConfig,
    error::RehabResult,
    feasibility::{self, FeasibilityOutcome, FeasiblePlan},
    format::{format_monthly, format_won},
    high_income,
    input::UserInput,
    liquidation::{self, LiquidationAssessment},
    living_cost::{self, LivingCostAssessment},
    policy_book::{PolicyBook, PolicyResolver},
    region::{Jurisdiction, RegionResolver},
    repayment::{self, PeriodContext, PeriodDecision},
    result::{
        self, CalculationResult, ClassificationContext, Status, Totals, INFEASIBLE_ADVICE,
        INFEASIBLE_WARNING,
    },
    types::{HouseholdSize, Won},
};
use chrono::{Local, NaiveDate};

const UNEMPLOYED_NOTICE: &str =
    "Without regular income a rehabilitation plan is hard to approve. \
     Secure income first, or consider bankruptcy instead.";

/// A policy bound to its compiled region patterns. Cheap to reuse across
/// many calculations against the same policy.
pub struct RehabEngine<'p> {
    policy:  &'p PolicyConfig,
    regions: RegionResolver,
}

/// What every outcome reports, gathered before the terminal branch.
struct Stages {
    income:       Won,
    jurisdiction: Jurisdiction,
    living:       LivingCostAssessment,
    living_cost:  Won,
    advisories:   Vec<String>,
}

impl<'p> RehabEngine<'p> {
    pub fn new(policy: &'p PolicyConfig) -> RehabResult<Self> {
        Ok(Self { policy, regions: RegionResolver::for_policy(policy)? })
    }

    pub fn policy(&self) -> &PolicyConfig {
        self.policy
    }

    /// Run the full pipeline for one applicant.
    pub fn calculate(&self, input: &UserInput) -> RehabResult<CalculationResult> {
        input.validate()?;
        let policy = self.policy;
        let income = input.effective_income();

        let jurisdiction = self.regions.resolve(&input.address, policy);
        let living = living_cost::assess(input, jurisdiction.region_class, policy);

        let mut advisories = Vec::new();
        let adjustment = high_income::adjust(
            income,
            input.total_debt,
            input.household_size,
            living.total(),
            policy,
        );
        advisories.extend(adjustment.advisory());

        let stages = Stages {
            income,
            jurisdiction,
            living_cost: adjustment.adjusted,
            living,
            advisories,
        };

        match feasibility::search(income, input.household_size, stages.living_cost, policy) {
            FeasibilityOutcome::Infeasible { .. } => Ok(self.infeasible(input, stages)),
            FeasibilityOutcome::Feasible(plan) => Ok(self.plan(input, stages, plan)),
        }
    }

    fn infeasible(&self, input: &UserInput, mut stages: Stages) -> CalculationResult {
        log::info!("engine: infeasible at income {}", stages.income);
        stages.advisories.extend(INFEASIBLE_ADVICE.iter().map(|a| a.to_string()));

        let mut warnings = vec![INFEASIBLE_WARNING.to_string()];
        warnings.extend(result::risk_warnings(input.risk_factor));

        let totals = Totals::none(input.total_debt);
        let living_cost = stages.living_cost;
        let disposable = stages.income - living_cost;
        self.compose(
            input,
            stages,
            Outcome {
                status: Status::Impossible,
                reason: "Income does not cover the minimum living cost plus the minimum payment."
                    .to_string(),
                totals,
                household_size: input.household_size,
                living_cost_reduction_pct: None,
                recognized_living_cost: living_cost,
                disposable,
                liquidation: None,
                risk_warnings: warnings,
            },
        )
    }

    fn plan(&self, input: &UserInput, mut stages: Stages, plan: FeasiblePlan) -> CalculationResult {
        let policy = self.policy;
        let court = &stages.jurisdiction.court;

        if plan.household_reduced(input.household_size) {
            stages.advisories.push(format!(
                "Household size was reduced from {} to {} to leave the minimum payment.",
                input.household_size, plan.household_size
            ));
        }
        if let Some(pct) = plan.reduction_pct.filter(|pct| *pct > 0) {
            stages.advisories.push(format!(
                "The recognized living cost was cut by {pct}% to {}.",
                format_won(plan.living_cost)
            ));
        }

        let rule = policy.deposit_rule(stages.jurisdiction.region_class);
        let liquidation = liquidation::assess(input, rule, court);
        if liquidation.investment_loss > 0 {
            stages.advisories.push(format!(
                "{} adds investment losses of {} to the liquidation value.",
                court.name,
                format_won(liquidation.investment_loss)
            ));
        }
        if input.is_married() && court.spouse_asset_rate == 0.0 {
            stages.advisories.push(format!(
                "{} excludes spouse assets from the liquidation value.",
                court.name
            ));
        }

        let max_sustainable = repayment::max_sustainable_payment(
            stages.income,
            policy.base_living_cost(plan.household_size),
            &policy.rules,
        );
        let eligible = court.allow_shortened_term
            && input.age.is_some_and(|age| age < policy.rules.shortened_term_age_limit);
        let decision = repayment::select_period(&PeriodContext {
            disposable: plan.disposable,
            liquidation_value: liquidation.value,
            max_sustainable,
            shortened_term_eligible: eligible,
            rules: &policy.rules,
        });

        let mut warnings = result::risk_warnings(input.risk_factor);
        let (totals, status, reason) = match decision {
            PeriodDecision::Unaffordable { months, monthly_payment } => {
                log::info!(
                    "engine: liquidation value {} unaffordable, {months} months needs {monthly_payment}",
                    liquidation.value
                );
                warnings.insert(
                    0,
                    format!(
                        "Even over {months} months the liquidation value needs {}, above the sustainable {}.",
                        format_monthly(monthly_payment),
                        format_monthly(max_sustainable.max(0))
                    ),
                );
                (
                    Totals::new(monthly_payment, months, input.total_debt),
                    Status::Impossible,
                    "The liquidation value cannot be repaid within the longest plan.".to_string(),
                )
            }
            PeriodDecision::Selected { months, monthly_payment, advisories, .. } => {
                stages.advisories.extend(advisories);
                let totals = Totals::new(monthly_payment, months, input.total_debt);
                let (status, reason) = result::classify(&ClassificationContext {
                    liquidation_value: liquidation.value,
                    total_debt: input.total_debt,
                    monthly_payment,
                    monthly_income: stages.income,
                    reduction_rate: totals.debt_reduction_rate,
                    rules: &policy.rules,
                });
                stages.advisories.extend(result::reduction_advisory(totals.debt_reduction_rate));
                (totals, status, reason)
            }
        };

        if let Some(priority) = input.priority_debt.filter(|p| *p > totals.total_repayment) {
            stages.advisories.push(format!(
                "Priority claims of {} exceed the planned repayment and must be repaid in full.",
                format_won(priority)
            ));
        }
        stages.advisories.push(format!(
            "{} takes about {} months to decide.",
            court.name, court.processing_months
        ));

        log::info!(
            "engine: {status:?} {} x {} months, reduction {}%",
            totals.monthly_payment,
            totals.repayment_months,
            totals.debt_reduction_rate
        );
        self.compose(
            input,
            stages,
            Outcome {
                status,
                reason,
                totals,
                household_size: plan.household_size,
                living_cost_reduction_pct: plan.reduction_pct,
                recognized_living_cost: plan.living_cost,
                disposable: plan.disposable,
                liquidation: Some(liquidation),
                risk_warnings: warnings,
            },
        )
    }

    fn compose(&self, input: &UserInput, stages: Stages, outcome: Outcome) -> CalculationResult {
        let Stages { jurisdiction, living, advisories, .. } = stages;
        let (liquidation_value, exempt_deposit) = outcome
            .liquidation
            .map(|l| (l.value, l.exempt_deposit))
            .unwrap_or((0, 0));

        CalculationResult {
            status: outcome.status,
            status_reason: outcome.reason,
            monthly_payment: outcome.totals.monthly_payment,
            repayment_months: outcome.totals.repayment_months,
            total_repayment: outcome.totals.total_repayment,
            total_debt_reduction: outcome.totals.total_debt_reduction,
            debt_reduction_rate: outcome.totals.debt_reduction_rate,
            base_living_cost: living.base,
            additional_living_cost: living.additional(),
            recognized_living_cost: outcome.recognized_living_cost,
            disposable_income: outcome.disposable,
            liquidation_value,
            exempt_deposit,
            household_size: outcome.household_size,
            living_cost_reduction_pct: outcome.living_cost_reduction_pct,
            court_name: jurisdiction.court.name,
            region_class: jurisdiction.region_class,
            court_description: jurisdiction.court.description,
            processing_months: jurisdiction.court.processing_months,
            policy_year: self.policy.base_year,
            advisories,
            risk_warnings: outcome.risk_warnings,
            unemployed_notice: input.is_unemployed().then(|| UNEMPLOYED_NOTICE.to_string()),
            housing_breakdown: living.housing,
            medical_breakdown: living.medical,
            education_breakdown: living.education,
        }
    }
}

/// Terminal figures for one outcome.
struct Outcome {
    status:         Status,
    reason:         String,
    totals:         Totals,
    household_size: HouseholdSize,
    living_cost_reduction_pct: Option<i64>,
    recognized_living_cost:    Won,
    disposable:     Won,
    /// None when the pipeline stopped before liquidation was assessed.
    liquidation:    Option<LiquidationAssessment>,
    risk_warnings:  Vec<String>,
}

// ── Entry points ───────────────────────────────────────────────

/// Calculate against `policy`, or against the policy in force today when
/// none is given.
pub fn calculate(input: &UserInput, policy: Option<&PolicyConfig>) -> RehabResult<CalculationResult> {
    match policy {
        Some(policy) => calculate_with(input, policy),
        None => calculate_with_active_policy(input, &PolicyBook::with_defaults()),
    }
}

/// Calculate against the policy `resolver` holds for `date`.
pub fn calculate_as_of(
    input:    &UserInput,
    resolver: &dyn PolicyResolver,
    date:     NaiveDate,
) -> RehabResult<CalculationResult> {
    let policy = resolver.policy_for_date(date)?;
    calculate_with(input, &policy)
}

pub fn calculate_with_active_policy(
    input:    &UserInput,
    resolver: &dyn PolicyResolver,
) -> RehabResult<CalculationResult> {
    calculate_as_of(input, resolver, Local::now().date_naive())
}

fn calculate_with(input: &UserInput, policy: &PolicyConfig) -> RehabResult<CalculationResult> {
    RehabEngine::new(policy)?.calculate(input)
}
