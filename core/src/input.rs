//! The applicant's financial profile, one per calculation.
//!
//! RULE: Every UserInput passes validate() before any stage reads it.
//! Stages may then assume non-negative amounts and a positive total debt.

use crate::{
    error::{RehabError, RehabResult},
    types::{HouseholdSize, Won},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    Salary,
    Business,
    Freelancer,
    Both,
    #[serde(rename = "none")]
    Unemployed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaritalStatus {
    #[default]
    Single,
    Married,
    Divorced,
    Widowed,
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HousingType {
    /// Monthly rent, usually with a smaller deposit.
    #[default]
    Rent,
    /// Lump-sum lease deposit without monthly rent.
    Jeonse,
    Owned,
    Free,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    #[default]
    None,
    RecentLoan,
    Investment,
    Gambling,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserInput {
    pub address: String,
    pub age: Option<u32>,

    pub employment: Option<EmploymentType>,
    /// Net monthly income after tax.
    pub monthly_income:  Won,
    pub salary_income:   Option<Won>,
    pub business_income: Option<Won>,

    pub marital_status: MaritalStatus,
    /// Including the applicant. Minor children may count as halves.
    pub household_size: HouseholdSize,
    pub minor_children: u32,
    pub spouse_income:  Won,
    pub spouse_assets:  Won,

    pub housing:        HousingType,
    pub rent:           Won,
    pub deposit:        Won,
    pub deposit_loan:   Won,
    pub property_value: Won,
    pub mortgage:       Won,

    pub medical_cost:      Won,
    pub education_cost:    Won,
    pub special_education: bool,

    /// Total own assets, including any lease deposit.
    pub assets:           Won,
    pub total_debt:       Won,
    pub credit_card_debt: Option<Won>,
    /// Taxes and other claims that must be repaid in full.
    pub priority_debt:    Option<Won>,
    /// Stock or crypto trading losses.
    pub speculative_loss: Won,
    pub risk_factor:      RiskFactor,

    pub name:  Option<String>,
    pub phone: Option<String>,
}

impl UserInput {
    /// Reject structurally malformed input before any calculation stage.
    pub fn validate(&self) -> RehabResult<()> {
        let amounts = [
            ("monthly_income", Some(self.monthly_income)),
            ("salary_income", self.salary_income),
            ("business_income", self.business_income),
            ("spouse_income", Some(self.spouse_income)),
            ("spouse_assets", Some(self.spouse_assets)),
            ("rent", Some(self.rent)),
            ("deposit", Some(self.deposit)),
            ("deposit_loan", Some(self.deposit_loan)),
            ("property_value", Some(self.property_value)),
            ("mortgage", Some(self.mortgage)),
            ("medical_cost", Some(self.medical_cost)),
            ("education_cost", Some(self.education_cost)),
            ("assets", Some(self.assets)),
            ("total_debt", Some(self.total_debt)),
            ("credit_card_debt", self.credit_card_debt),
            ("priority_debt", self.priority_debt),
            ("speculative_loss", Some(self.speculative_loss)),
        ];
        for (field, amount) in amounts {
            if let Some(amount) = amount {
                if amount < 0 {
                    return Err(RehabError::invalid_input(field, format!("{amount} is negative")));
                }
            }
        }

        if self.total_debt == 0 {
            return Err(RehabError::invalid_input("total_debt", "must be greater than zero"));
        }
        if self.household_size > HouseholdSize::MAX {
            return Err(RehabError::invalid_input(
                "household_size",
                format!("{} is above the {} person limit", self.household_size, HouseholdSize::MAX),
            ));
        }
        if self.household_size < HouseholdSize::ONE {
            return Err(RehabError::invalid_input(
                "household_size",
                format!("{} is below one person", self.household_size),
            ));
        }
        if u64::from(self.minor_children) * 2 > u64::from(self.household_size.halves()) {
            return Err(RehabError::invalid_input(
                "minor_children",
                format!("{} children exceed household size {}", self.minor_children, self.household_size),
            ));
        }
        for (field, part) in [("credit_card_debt", self.credit_card_debt), ("priority_debt", self.priority_debt)] {
            if part.is_some_and(|p| p > self.total_debt) {
                return Err(RehabError::invalid_input(field, "exceeds total_debt"));
            }
        }
        Ok(())
    }

    /// Monthly income, falling back to the sum of the salary and business
    /// components when only those were given.
    pub fn effective_income(&self) -> Won {
        if self.monthly_income > 0 {
            return self.monthly_income;
        }
        self.salary_income.unwrap_or(0) + self.business_income.unwrap_or(0)
    }

    pub fn is_married(&self) -> bool {
        self.marital_status == MaritalStatus::Married
    }

    pub fn is_unemployed(&self) -> bool {
        self.employment == Some(EmploymentType::Unemployed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_input() -> UserInput {
        UserInput {
            monthly_income: 2_000_000,
            total_debt: 50_000_000,
            ..Default::default()
        }
    }

    #[test]
    fn accepts_minimal_input() {
        base_input().validate().expect("minimal input is valid");
    }

    #[test]
    fn rejects_zero_debt() {
        let input = UserInput { total_debt: 0, ..base_input() };
        assert!(matches!(
            input.validate(),
            Err(RehabError::InvalidInput { field: "total_debt", .. })
        ));
    }

    #[test]
    fn rejects_negative_amounts() {
        let input = UserInput { assets: -1, ..base_input() };
        assert!(matches!(
            input.validate(),
            Err(RehabError::InvalidInput { field: "assets", .. })
        ));
    }

    #[test]
    fn rejects_more_children_than_household() {
        let input = UserInput {
            household_size: HouseholdSize::persons(2),
            minor_children: 3,
            ..base_input()
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn huge_child_count_is_rejected_without_overflow() {
        let input = UserInput { minor_children: 3_000_000_000, ..base_input() };
        assert!(matches!(
            input.validate(),
            Err(RehabError::InvalidInput { field: "minor_children", .. })
        ));
    }

    #[test]
    fn implausible_household_size_is_rejected() {
        let input: UserInput =
            serde_json::from_str(r#"{"household_size":1e9,"total_debt":1}"#).expect("parses");
        assert!(matches!(
            input.validate(),
            Err(RehabError::InvalidInput { field: "household_size", .. })
        ));
        let largest = UserInput { household_size: HouseholdSize::MAX, ..base_input() };
        largest.validate().expect("limit itself is accepted");
    }

    #[test]
    fn income_falls_back_to_components() {
        let input = UserInput {
            monthly_income: 0,
            salary_income: Some(1_500_000),
            business_income: Some(700_000),
            ..base_input()
        };
        assert_eq!(input.effective_income(), 2_200_000);
    }

    #[test]
    fn deserializes_unemployed_as_none() {
        let input: UserInput =
            serde_json::from_str(r#"{"employment":"none","household_size":1.5,"total_debt":1}"#)
                .expect("parses");
        assert!(input.is_unemployed());
        assert_eq!(input.household_size.halves(), 3);
    }
}
