//! Policy configuration: one immutable table set per effective year.
//!
//! RULE: The engine never mutates a PolicyConfig. New figures arrive as a
//! new value (see policy_store.rs and policy_book.rs), never as an
//! in-place edit.

use crate::{
    error::{RehabError, RehabResult},
    types::{HouseholdSize, Months, Won},
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Coarse geographic tier used for deposit exemptions and housing allowances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RegionClass {
    Seoul,
    Overcrowded,
    Metro,
    Others,
}

impl RegionClass {
    pub const ALL: [RegionClass; 4] = [
        RegionClass::Seoul,
        RegionClass::Overcrowded,
        RegionClass::Metro,
        RegionClass::Others,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RegionClass::Seoul       => "서울특별시",
            RegionClass::Overcrowded => "과밀억제권역",
            RegionClass::Metro       => "광역시",
            RegionClass::Others      => "그외",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositExemption {
    /// Deposits above this amount receive no exemption at all.
    pub limit:  Won,
    pub deduct: Won,
}

/// One deposit rule per region class. Every class is always covered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositExemptions {
    pub seoul:       DepositExemption,
    pub overcrowded: DepositExemption,
    pub metro:       DepositExemption,
    pub others:      DepositExemption,
}

impl DepositExemptions {
    pub fn get(&self, class: RegionClass) -> DepositExemption {
        match class {
            RegionClass::Seoul       => self.seoul,
            RegionClass::Overcrowded => self.overcrowded,
            RegionClass::Metro       => self.metro,
            RegionClass::Others      => self.others,
        }
    }
}

/// Per-court leniency settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourtTrait {
    pub name: String,
    pub allow_shortened_term: bool,
    /// Share of spouse assets counted toward liquidation value, 0.0..=1.0.
    pub spouse_asset_rate: f64,
    pub include_investment_loss: bool,
    /// Months from filing to the commencement decision.
    pub processing_months: f64,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HousingAllowance {
    /// Housing cost already covered by the base allowance.
    pub included: Won,
    /// Maximum supplement on top of the base allowance.
    pub limit:    Won,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationCriteria {
    pub included:      Won,
    pub limit:         Won,
    pub special_limit: Won,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HighIncomeRule {
    /// Applies when income exceeds median income times this rate.
    pub threshold_rate:       f64,
    /// Recognized living cost may not exceed median income times this rate.
    pub max_living_cost_rate: f64,
    /// Share of total debt that must be repaid over a 36-month plan.
    pub min_repayment_rate:   f64,
}

/// Engine constants that courts express as policy rather than law.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineRules {
    pub min_disposable_income:          Won,
    /// How far the one-person living cost may be cut to reach the floor.
    pub max_living_cost_reduction_rate: f64,
    /// Share of base living cost always kept when bounding affordability.
    pub affordability_floor_rate:       f64,
    /// Ascending. The first entry is the standard plan length.
    pub candidate_periods:              Vec<Months>,
    pub shortened_term:                 Months,
    /// Applicants strictly younger than this may get the shortened term.
    pub shortened_term_age_limit:       u32,
    pub payment_burden_rate:            f64,
    pub low_reduction_rate_pct:         i64,
}

impl Default for EngineRules {
    fn default() -> Self {
        Self {
            min_disposable_income:          100_000,
            max_living_cost_reduction_rate: 0.2,
            affordability_floor_rate:       0.8,
            candidate_periods:              vec![36, 48, 60],
            shortened_term:                 24,
            shortened_term_age_limit:       30,
            payment_burden_rate:            0.8,
            low_reduction_rate_pct:         30,
        }
    }
}

impl EngineRules {
    pub fn standard_period(&self) -> Months {
        self.candidate_periods.first().copied().unwrap_or(36)
    }

    pub fn longest_period(&self) -> Months {
        self.candidate_periods.last().copied().unwrap_or(60)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
    pub base_year: i32,
    /// Median income by whole household size.
    pub median_income: BTreeMap<u32, Won>,
    /// Added per person beyond the largest median income entry.
    pub median_income_increment: Won,
    /// Recognized base living cost by whole household size.
    pub living_cost: BTreeMap<u32, Won>,
    pub deposit_exemptions: DepositExemptions,
    pub housing_allowances: BTreeMap<RegionClass, BTreeMap<u32, HousingAllowance>>,
    pub medical_included: BTreeMap<u32, Won>,
    pub education: EducationCriteria,
    pub high_income: HighIncomeRule,
    pub courts: BTreeMap<String, CourtTrait>,
    /// Fallback for regions without a court, or courts without a trait.
    pub default_court: CourtTrait,
    /// Ordered; the first pattern that matches an address wins.
    pub region_patterns: Vec<String>,
    pub region_courts: BTreeMap<String, String>,
    pub region_classes: BTreeMap<String, RegionClass>,
    #[serde(default)]
    pub rules: EngineRules,
}

impl PolicyConfig {
    /// Load a policy document from a JSON file and validate it.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let policy: PolicyConfig = serde_json::from_str(&content)?;
        policy.validate()?;
        Ok(policy)
    }

    /// Check the invariants every calculation relies on.
    pub fn validate(&self) -> RehabResult<()> {
        if !self.living_cost.contains_key(&1) {
            return Err(RehabError::invalid_policy("living cost table has no one-person entry"));
        }
        if !self.median_income.contains_key(&1) {
            return Err(RehabError::invalid_policy("median income table has no one-person entry"));
        }

        let rates = [
            ("default court spouse asset rate", self.default_court.spouse_asset_rate),
            ("max living cost reduction rate", self.rules.max_living_cost_reduction_rate),
            ("affordability floor rate", self.rules.affordability_floor_rate),
            ("payment burden rate", self.rules.payment_burden_rate),
            ("minimum repayment rate", self.high_income.min_repayment_rate),
        ];
        for (label, rate) in rates {
            if !(0.0..=1.0).contains(&rate) {
                return Err(RehabError::invalid_policy(format!("{label} {rate} outside 0.0..=1.0")));
            }
        }
        for (key, court) in &self.courts {
            if !(0.0..=1.0).contains(&court.spouse_asset_rate) {
                return Err(RehabError::invalid_policy(format!(
                    "court '{key}' spouse asset rate {} outside 0.0..=1.0",
                    court.spouse_asset_rate
                )));
            }
        }

        let periods = &self.rules.candidate_periods;
        if periods.is_empty() || periods.contains(&0) || periods.windows(2).any(|w| w[0] >= w[1]) {
            return Err(RehabError::invalid_policy(format!(
                "candidate periods {periods:?} must be non-empty, positive and ascending"
            )));
        }

        for (region, court) in &self.region_courts {
            if !self.courts.contains_key(court) {
                log::warn!("policy {}: region '{region}' maps to unknown court '{court}'", self.base_year);
            }
        }

        for pattern in &self.region_patterns {
            Regex::new(pattern)?;
        }
        Ok(())
    }

    /// Median income for a household, extrapolating past the table with
    /// the configured per-person increment.
    pub fn median_income(&self, size: HouseholdSize) -> Won {
        interpolate(&self.median_income, size, Some(self.median_income_increment))
    }

    /// Recognized base living cost for a household. Half-person sizes sit
    /// halfway between the neighbouring whole sizes.
    pub fn base_living_cost(&self, size: HouseholdSize) -> Won {
        interpolate(&self.living_cost, size, None)
    }

    /// Medical cost already covered by the base allowance. Sizes missing
    /// from the table use the nearest smaller entry.
    pub fn medical_included(&self, size: HouseholdSize) -> Won {
        self.medical_included
            .range(..=size.whole().max(1))
            .next_back()
            .or_else(|| self.medical_included.iter().next())
            .map(|(_, v)| *v)
            .unwrap_or(0)
    }

    /// Housing allowance row for a region class. Sizes beyond the table
    /// use its largest row.
    pub fn housing_allowance(&self, class: RegionClass, size: HouseholdSize) -> Option<HousingAllowance> {
        self.housing_allowances
            .get(&class)?
            .range(..=size.whole().max(1))
            .next_back()
            .map(|(_, v)| *v)
    }

    pub fn deposit_rule(&self, class: RegionClass) -> DepositExemption {
        self.deposit_exemptions.get(class)
    }

    /// The 2026 tables as published for the Korean rehabilitation courts.
    pub fn default_2026() -> Self {
        let median_income: BTreeMap<u32, Won> = [
            (1, 2_564_238), (2, 4_199_292), (3, 5_359_036),
            (4, 6_494_738), (5, 7_556_719), (6, 8_555_952),
        ].into();

        let living_cost: BTreeMap<u32, Won> = [
            (1, 1_538_543), (2, 2_519_575), (3, 3_215_422),
            (4, 3_896_843), (5, 4_534_031), (6, 5_133_571),
        ].into();

        let included = [273_861, 448_484, 572_345, 693_638];
        let housing_row = |limits: [Won; 4]| -> BTreeMap<u32, HousingAllowance> {
            (0..4)
                .map(|i| (i as u32 + 1, HousingAllowance { included: included[i], limit: limits[i] }))
                .collect()
        };
        let housing_allowances: BTreeMap<RegionClass, BTreeMap<u32, HousingAllowance>> = [
            (RegionClass::Seoul,       housing_row([589_208, 982_013, 1_253_955, 1_510_789])),
            (RegionClass::Overcrowded, housing_row([430_122, 716_869, 915_387, 1_102_876])),
            (RegionClass::Metro,       housing_row([229_791, 382_985, 489_042, 589_208])),
            (RegionClass::Others,      housing_row([176_762, 294_604, 376_186, 453_237])),
        ].into();

        let medical_included: BTreeMap<u32, Won> = [
            (1, 64_619), (2, 105_822), (3, 135_048),
            (4, 163_667), (5, 192_286), (6, 220_905),
        ].into();

        let court = |name: &str, shortened: bool, spouse: f64, invest: bool, months: f64, desc: &str| {
            CourtTrait {
                name: name.into(),
                allow_shortened_term: shortened,
                spouse_asset_rate: spouse,
                include_investment_loss: invest,
                processing_months: months,
                description: desc.into(),
            }
        };
        let courts: BTreeMap<String, CourtTrait> = [
            court("Seoul Rehabilitation Court", true, 0.0, false, 5.0,
                "24-month term available; spouse assets and investment losses excluded"),
            court("Suwon Rehabilitation Court", false, 0.0, true, 4.8,
                "Spouse assets excluded; investment losses included"),
            court("Incheon Rehabilitation Court", false, 0.0, true, 3.3,
                "Spouse assets excluded; investment losses included"),
            court("Daejeon Rehabilitation Court", false, 0.0, false, 6.3,
                "Spouse assets excluded (opened 2026)"),
            court("Daegu Rehabilitation Court", false, 0.0, false, 5.5,
                "Spouse assets excluded (opened 2026)"),
            court("Busan Rehabilitation Court", false, 0.0, false, 5.4,
                "Spouse assets and investment losses excluded"),
            court("Gwangju Rehabilitation Court", false, 0.0, false, 4.5,
                "Spouse assets excluded (opened 2026)"),
            court("Chuncheon District Court", false, 0.5, false, 3.0,
                "District court with a fast commencement decision"),
            court("Ulsan District Court", false, 0.5, false, 4.8, "District court"),
            court("Cheongju District Court", false, 0.5, false, 5.7, "District court"),
            court("Changwon District Court", false, 0.5, false, 5.7, "District court"),
            court("Jeonju District Court", false, 0.5, false, 6.7, "District court"),
            court("Gangneung District Court", false, 0.5, false, 6.0, "District court"),
            court("Jeju District Court", false, 0.5, false, 6.0, "District court"),
            court("Uijeongbu District Court", false, 0.5, false, 7.0,
                "District court with the longest commencement wait"),
        ]
        .into_iter()
        .map(|c| (c.name.clone(), c))
        .collect();

        let default_court = court("Other Court", false, 0.5, true, 5.5,
            "36-month standard term, conservative review");

        let region_patterns: Vec<String> = [
            "서울특별시|서울",
            "부산광역시|부산",
            "대구광역시|대구",
            "인천광역시|인천",
            "광주광역시",
            "대전광역시|대전",
            "울산광역시|울산",
            "세종특별자치시|세종",
            "고양|성남|용인|수원|화성|안산|안양|평택|시흥|김포|광명|군포|오산|이천|안성|하남|의왕|여주|양평|과천|부천",
            "의정부|남양주|파주|구리|양주|포천|동두천|가평|연천",
            "창원|김해|양산|진주|거제|통영",
            "천안|청주|충주|제천",
            "전주|익산|군산|목포|여수|순천",
            "포항|구미|경주|안동|경산",
        ]
        .iter()
        .map(|p| p.to_string())
        .collect();

        let seoul = "Seoul Rehabilitation Court";
        let suwon = "Suwon Rehabilitation Court";
        let incheon = "Incheon Rehabilitation Court";
        let daejeon = "Daejeon Rehabilitation Court";
        let daegu = "Daegu Rehabilitation Court";
        let busan = "Busan Rehabilitation Court";
        let gwangju = "Gwangju Rehabilitation Court";
        let court_regions: [(&str, &[&str]); 7] = [
            (seoul, &["서울", "서울특별시", "고양", "의정부", "남양주", "파주", "구리", "양주",
                      "포천", "동두천", "가평", "연천"]),
            (suwon, &["수원", "성남", "용인", "화성", "안양", "안산", "평택", "시흥", "김포",
                      "광주시", "광명", "군포", "오산", "이천", "안성", "하남", "의왕", "여주",
                      "양평", "과천"]),
            (incheon, &["인천", "인천광역시", "부천"]),
            (daejeon, &["대전", "대전광역시", "세종", "세종특별자치시", "천안", "청주", "충주", "제천"]),
            (daegu, &["대구", "대구광역시", "경산", "포항", "구미", "경주", "안동"]),
            (busan, &["부산", "부산광역시", "울산", "울산광역시", "창원", "김해", "양산", "진주",
                      "거제", "통영"]),
            (gwangju, &["광주", "광주광역시", "전주", "익산", "군산", "목포", "여수", "순천"]),
        ];
        let region_courts: BTreeMap<String, String> = court_regions
            .iter()
            .flat_map(|(court, regions)| regions.iter().map(move |r| (r.to_string(), court.to_string())))
            .collect();

        let class_regions: [(RegionClass, &[&str]); 3] = [
            (RegionClass::Seoul, &["서울", "서울특별시"]),
            (RegionClass::Overcrowded, &["고양", "성남", "부천", "안양", "수원", "의정부", "남양주",
                                         "구리", "하남", "인천"]),
            (RegionClass::Metro, &["부산", "부산광역시", "대구", "대구광역시", "인천광역시", "광주",
                                   "광주광역시", "대전", "대전광역시", "울산", "울산광역시", "세종",
                                   "세종특별자치시"]),
        ];
        let region_classes: BTreeMap<String, RegionClass> = class_regions
            .iter()
            .flat_map(|(class, regions)| regions.iter().map(move |r| (r.to_string(), *class)))
            .collect();

        Self {
            base_year: 2026,
            median_income,
            median_income_increment: 999_233,
            living_cost,
            deposit_exemptions: DepositExemptions {
                seoul:       DepositExemption { limit: 165_000_000, deduct: 55_000_000 },
                overcrowded: DepositExemption { limit: 145_000_000, deduct: 48_000_000 },
                metro:       DepositExemption { limit: 85_000_000,  deduct: 28_000_000 },
                others:      DepositExemption { limit: 75_000_000,  deduct: 25_000_000 },
            },
            housing_allowances,
            medical_included,
            education: EducationCriteria {
                included:      89_627,
                limit:         200_000,
                special_limit: 500_000,
            },
            high_income: HighIncomeRule {
                threshold_rate:       1.5,
                max_living_cost_rate: 1.0,
                min_repayment_rate:   0.4,
            },
            courts,
            default_court,
            region_patterns,
            region_courts,
            region_classes,
            rules: EngineRules::default(),
        }
    }

    /// A copy of this policy re-labelled for another effective year.
    pub fn for_year(&self, year: i32) -> Self {
        Self { base_year: year, ..self.clone() }
    }
}

/// Table lookup by household size. Whole sizes past the largest key grow
/// by `increment`, or by the gap between the last two entries when no
/// increment is configured. Half sizes take the rounded midpoint.
fn interpolate(table: &BTreeMap<u32, Won>, size: HouseholdSize, increment: Option<Won>) -> Won {
    let at = |persons: u32| -> Won {
        if let Some(v) = table.get(&persons) {
            return *v;
        }
        let mut tail = table.iter().rev();
        let Some((&max_key, &max_val)) = tail.next() else {
            return 0;
        };
        if persons < max_key {
            // Gap inside the table: nearest smaller entry, else the smallest.
            return table
                .range(..persons)
                .next_back()
                .or_else(|| table.iter().next())
                .map(|(_, v)| *v)
                .unwrap_or(0);
        }
        let step = increment.unwrap_or_else(|| {
            tail.next().map(|(_, prev)| max_val - prev).unwrap_or(0)
        });
        max_val + (persons - max_key) as Won * step
    };

    let lower = size.whole().max(1);
    if size.is_whole() || size.whole() == 0 {
        return at(lower);
    }
    let (lo, hi) = (at(lower), at(lower + 1));
    ((lo + hi) as f64 / 2.0).round() as Won
}
