use rehab_core::{
    config::{HousingAllowance, PolicyConfig, RegionClass},
    input::{HousingType, UserInput},
    living_cost::{assess, education_supplement, housing_supplement, medical_supplement},
    types::HouseholdSize,
};

fn others_policy(included: i64, limit: i64) -> PolicyConfig {
    let mut policy = PolicyConfig::default_2026();
    policy
        .housing_allowances
        .entry(RegionClass::Others)
        .or_default()
        .insert(1, HousingAllowance { included, limit });
    policy
}

#[test]
fn housing_supplement_table() {
    let policy = others_policy(300_000, 200_000);
    let one = HouseholdSize::ONE;

    // (rent, expected supplement)
    let cases = [
        (400_000, 100_000),
        (300_000, 0),
        (250_000, 0),
        (500_000, 200_000),
        (900_000, 200_000),
    ];
    for (rent, expected) in cases {
        let b = housing_supplement(rent, RegionClass::Others, one, &policy).expect("rent given");
        assert_eq!(b.allowed, expected, "rent {rent}");
        assert_eq!(b.raw_cost, rent);
        assert_eq!(b.included, 300_000);
        assert!(!b.explanation.is_empty());
    }
}

#[test]
fn housing_explanation_shows_the_arithmetic() {
    let policy = others_policy(300_000, 200_000);
    let b = housing_supplement(400_000, RegionClass::Others, HouseholdSize::ONE, &policy).unwrap();
    assert!(b.explanation.contains("400,000"));
    assert!(b.explanation.contains("300,000"));
    assert!(b.explanation.contains("100,000"));
}

#[test]
fn no_rent_means_no_housing_breakdown() {
    let policy = PolicyConfig::default_2026();
    assert!(housing_supplement(0, RegionClass::Seoul, HouseholdSize::ONE, &policy).is_none());
}

#[test]
fn large_households_use_the_largest_housing_row() {
    let policy = PolicyConfig::default_2026();
    let four = housing_supplement(5_000_000, RegionClass::Seoul, HouseholdSize::persons(4), &policy).unwrap();
    let six = housing_supplement(5_000_000, RegionClass::Seoul, HouseholdSize::persons(6), &policy).unwrap();
    assert_eq!(four.allowed, six.allowed);
    assert_eq!(six.allowed, 1_510_789);
}

#[test]
fn missing_housing_row_recognizes_nothing() {
    let mut policy = PolicyConfig::default_2026();
    policy.housing_allowances.remove(&RegionClass::Metro);
    let b = housing_supplement(800_000, RegionClass::Metro, HouseholdSize::ONE, &policy).unwrap();
    assert_eq!(b.allowed, 0);
}

#[test]
fn medical_supplement_table() {
    let policy = PolicyConfig::default_2026();
    let cases = [
        (HouseholdSize::ONE, 100_000, 35_381),
        (HouseholdSize::ONE, 50_000, 0),
        (HouseholdSize::persons(2), 1_105_822, 1_000_000),
        // Past the table: nearest smaller entry (6 persons).
        (HouseholdSize::persons(8), 320_905, 100_000),
    ];
    for (size, cost, expected) in cases {
        let b = medical_supplement(cost, size, &policy).expect("cost given");
        assert_eq!(b.allowed, expected, "size {size} cost {cost}");
    }
}

#[test]
fn education_supplement_table() {
    let policy = PolicyConfig::default_2026();
    // (total cost, children, special, expected)
    let cases = [
        (600_000, 2, false, 220_746),
        (600_000, 2, true, 420_746),
        (150_000, 1, false, 60_373),
        (80_000, 1, false, 0),
    ];
    for (cost, children, special, expected) in cases {
        let b = education_supplement(cost, children, special, &policy).expect("children given");
        assert_eq!(b.allowed, expected, "cost {cost} children {children} special {special}");
    }
    assert!(education_supplement(600_000, 0, false, &policy).is_none());
    assert!(education_supplement(0, 2, false, &policy).is_none());
}

#[test]
fn owned_housing_gets_no_rent_supplement() {
    let policy = PolicyConfig::default_2026();
    let input = UserInput {
        housing: HousingType::Owned,
        rent: 700_000,
        medical_cost: 100_000,
        total_debt: 10_000_000,
        ..UserInput::default()
    };
    let a = assess(&input, RegionClass::Seoul, &policy);
    assert!(a.housing.is_none());
    assert_eq!(a.additional(), 35_381);
    assert_eq!(a.total(), 1_538_543 + 35_381);
}
