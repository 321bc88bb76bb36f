//! Liquidation valuator: what a bankruptcy would yield to creditors.

use crate::{
    config::{CourtTrait, DepositExemption},
    input::{HousingType, UserInput},
    types::Won,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidationAssessment {
    /// Own assets plus property equity, less any deposit loan.
    pub asset_base:      Won,
    pub exempt_deposit:  Won,
    pub own_share:       Won,
    pub spouse_share:    Won,
    pub investment_loss: Won,
    pub value:           Won,
}

/// All or nothing: deposits above the class limit get no exemption.
pub fn exempt_deposit(deposit: Won, rule: DepositExemption) -> Won {
    if deposit <= rule.limit {
        deposit.min(rule.deduct)
    } else {
        0
    }
}

pub fn assess(input: &UserInput, rule: DepositExemption, court: &CourtTrait) -> LiquidationAssessment {
    let equity = if input.housing == HousingType::Owned {
        (input.property_value - input.mortgage).max(0)
    } else {
        0
    };
    let asset_base = (input.assets + equity - input.deposit_loan.min(input.deposit)).max(0);

    let exempt = exempt_deposit(input.deposit, rule);
    let own_share = (asset_base - exempt).max(0);

    let spouse_share = if input.is_married() {
        (input.spouse_assets as f64 * court.spouse_asset_rate).round() as Won
    } else {
        0
    };
    let investment_loss = if court.include_investment_loss {
        input.speculative_loss
    } else {
        0
    };

    let value = own_share + spouse_share + investment_loss;
    log::debug!(
        "liquidation: base={asset_base} exempt={exempt} spouse={spouse_share} \
         investment_loss={investment_loss} value={value}"
    );
    LiquidationAssessment {
        asset_base,
        exempt_deposit: exempt,
        own_share,
        spouse_share,
        investment_loss,
        value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::PolicyConfig, input::MaritalStatus};

    const RULE: DepositExemption = DepositExemption { limit: 75_000_000, deduct: 25_000_000 };

    #[test]
    fn exemption_is_all_or_nothing() {
        assert_eq!(exempt_deposit(10_000_000, RULE), 10_000_000);
        assert_eq!(exempt_deposit(75_000_000, RULE), 25_000_000);
        assert_eq!(exempt_deposit(75_000_001, RULE), 0);
    }

    #[test]
    fn owned_equity_and_deposit_loan_shape_the_asset_base() {
        let court = PolicyConfig::default_2026().default_court;
        let owner = UserInput {
            housing: HousingType::Owned,
            property_value: 300_000_000,
            mortgage: 280_000_000,
            assets: 5_000_000,
            ..UserInput::default()
        };
        assert_eq!(assess(&owner, RULE, &court).asset_base, 25_000_000);

        let underwater = UserInput { mortgage: 400_000_000, ..owner };
        assert_eq!(assess(&underwater, RULE, &court).asset_base, 5_000_000);

        let tenant = UserInput {
            housing: HousingType::Jeonse,
            deposit: 100_000_000,
            deposit_loan: 80_000_000,
            assets: 100_000_000,
            ..UserInput::default()
        };
        let a = assess(&tenant, RULE, &court);
        assert_eq!(a.asset_base, 20_000_000);
        assert_eq!(a.exempt_deposit, 0);
        assert_eq!(a.value, 20_000_000);
    }

    #[test]
    fn spouse_share_only_for_married_applicants() {
        let court = PolicyConfig::default_2026().default_court;
        let single = UserInput { spouse_assets: 40_000_000, ..UserInput::default() };
        assert_eq!(assess(&single, RULE, &court).spouse_share, 0);

        let married = UserInput { marital_status: MaritalStatus::Married, ..single };
        assert_eq!(assess(&married, RULE, &court).spouse_share, 20_000_000);
    }
}
