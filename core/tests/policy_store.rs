use chrono::NaiveDate;
use rehab_core::{
    config::PolicyConfig,
    engine::calculate_as_of,
    error::RehabError,
    input::UserInput,
    policy_book::{PolicyBook, PolicyResolver},
    policy_store::PolicyStore,
};

fn build_store() -> PolicyStore {
    let store = PolicyStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn policy_for(year: i32, floor: i64) -> PolicyConfig {
    let mut policy = PolicyConfig::default_2026().for_year(year);
    policy.rules.min_disposable_income = floor;
    policy
}

#[test]
fn published_policy_round_trips() {
    let store = build_store();
    let policy = PolicyConfig::default_2026();
    let id = store.publish(&policy).expect("publish");
    assert!(!id.is_empty());

    let loaded = store.policy_for_year(2026).unwrap().expect("stored");
    assert_eq!(loaded, policy);
    assert_eq!(store.years().unwrap(), vec![2026]);
}

#[test]
fn republishing_adds_a_snapshot_and_newest_wins() {
    let store = build_store();
    let first = store.publish(&policy_for(2027, 100_000)).unwrap();
    let second = store.publish(&policy_for(2027, 150_000)).unwrap();
    assert_ne!(first, second);

    assert_eq!(store.snapshot_count(2027).unwrap(), 2);
    let current = store.policy_for_year(2027).unwrap().unwrap();
    assert_eq!(current.rules.min_disposable_income, 150_000);
}

#[test]
fn date_lookup_falls_back_to_nearest_earlier_year() {
    let store = build_store();
    store.publish(&policy_for(2026, 100_000)).unwrap();
    store.publish(&policy_for(2028, 120_000)).unwrap();

    let year_of = |d: NaiveDate| store.policy_for_date(d).unwrap().base_year;
    assert_eq!(year_of(date(2026, 5, 1)), 2026);
    assert_eq!(year_of(date(2027, 12, 31)), 2026);
    assert_eq!(year_of(date(2028, 1, 1)), 2028);
    assert_eq!(year_of(date(2031, 7, 1)), 2028);
    // Before every stored year: the earliest one.
    assert_eq!(year_of(date(2020, 1, 1)), 2026);
}

#[test]
fn empty_store_has_no_policy() {
    let store = build_store();
    assert!(store.policy_for_year(2026).unwrap().is_none());
    let err = store.policy_for_date(date(2026, 1, 1)).unwrap_err();
    assert!(matches!(err, RehabError::PolicyNotFound { .. }));
}

#[test]
fn invalid_policy_is_not_published() {
    let store = build_store();
    let mut policy = PolicyConfig::default_2026();
    policy.rules.candidate_periods = vec![60, 36];
    let err = store.publish(&policy).unwrap_err();
    assert!(matches!(err, RehabError::InvalidPolicy { .. }));
    assert_eq!(store.snapshot_count(2026).unwrap(), 0);
}

#[test]
fn in_flight_policy_is_unaffected_by_a_later_publish() {
    let store = build_store();
    store.publish(&policy_for(2026, 100_000)).unwrap();
    let held = store.policy_for_date(date(2026, 6, 1)).unwrap();

    store.publish(&policy_for(2026, 300_000)).unwrap();
    assert_eq!(held.rules.min_disposable_income, 100_000);
    assert_eq!(
        store.policy_for_date(date(2026, 6, 1)).unwrap().rules.min_disposable_income,
        300_000
    );
}

#[test]
fn calculation_uses_the_policy_for_the_lookup_date() {
    let store = build_store();
    store.publish(&policy_for(2026, 100_000)).unwrap();
    let mut later = policy_for(2027, 100_000);
    later.living_cost.insert(1, 1_200_000);
    store.publish(&later).unwrap();

    let input = UserInput { monthly_income: 2_500_000, total_debt: 50_000_000, ..UserInput::default() };

    let r2026 = calculate_as_of(&input, &store, date(2026, 3, 1)).unwrap();
    let r2027 = calculate_as_of(&input, &store, date(2027, 3, 1)).unwrap();
    assert_eq!(r2026.policy_year, 2026);
    assert_eq!(r2027.policy_year, 2027);
    assert_eq!(r2026.base_living_cost, 1_538_543);
    assert_eq!(r2027.base_living_cost, 1_200_000);
    assert_eq!(r2027.monthly_payment, 1_300_000);
}

#[test]
fn store_and_book_resolve_years_alike() {
    let store = build_store();
    let mut book = PolicyBook::new();
    for year in [2026, 2029] {
        store.publish(&policy_for(year, 100_000)).unwrap();
        book.publish(policy_for(year, 100_000)).unwrap();
    }
    let resolvers: [&dyn PolicyResolver; 2] = [&store, &book];
    for d in [date(2025, 1, 1), date(2026, 1, 1), date(2028, 1, 1), date(2033, 1, 1)] {
        let years: Vec<i32> = resolvers
            .iter()
            .map(|r| r.policy_for_date(d).unwrap().base_year)
            .collect();
        assert_eq!(years[0], years[1], "resolution for {d}");
    }
}
