//! Region resolution: free-text address -> region token -> court and class.
//!
//! RULE: Resolution never fails. Unmatched addresses resolve to the
//! unclassified token, unmapped regions to the default court and the
//! Others class.

use crate::{
    config::{CourtTrait, PolicyConfig, RegionClass},
    error::RehabResult,
};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Region token for addresses no pattern recognises.
pub const UNCLASSIFIED_REGION: &str = "unclassified";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Jurisdiction {
    pub region:       String,
    pub court:        CourtTrait,
    pub region_class: RegionClass,
    /// True when the court came from the default trait.
    pub court_defaulted: bool,
}

pub struct RegionResolver {
    patterns: Vec<Regex>,
}

impl RegionResolver {
    pub fn new(patterns: &[String]) -> RehabResult<Self> {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn for_policy(policy: &PolicyConfig) -> RehabResult<Self> {
        Self::new(&policy.region_patterns)
    }

    /// First pattern match in the address, in table order.
    pub fn extract_region(&self, address: &str) -> String {
        self.patterns
            .iter()
            .find_map(|p| p.find(address))
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| UNCLASSIFIED_REGION.to_string())
    }

    pub fn resolve(&self, address: &str, policy: &PolicyConfig) -> Jurisdiction {
        let region = self.extract_region(address);
        if region == UNCLASSIFIED_REGION {
            log::warn!("region: no pattern matched address, using defaults");
        }
        let (court, court_defaulted) = match court_for_region(&region, policy) {
            Some(court) => (court.clone(), false),
            None => (policy.default_court.clone(), true),
        };
        let region_class = region_class_for(&region, policy);
        log::debug!(
            "region: '{region}' -> court='{}' class={region_class:?}",
            court.name
        );
        Jurisdiction { region, court, region_class, court_defaulted }
    }
}

/// The court trait for a region, or None when the region is unmapped or
/// maps to a court the registry does not know.
pub fn court_for_region<'p>(region: &str, policy: &'p PolicyConfig) -> Option<&'p CourtTrait> {
    let name = policy.region_courts.get(region)?;
    let court = policy.courts.get(name);
    if court.is_none() {
        log::warn!("region: court '{name}' for '{region}' has no trait, using default");
    }
    court
}

/// Total: unmapped regions fall into the Others class.
pub fn region_class_for(region: &str, policy: &PolicyConfig) -> RegionClass {
    policy
        .region_classes
        .get(region)
        .copied()
        .unwrap_or(RegionClass::Others)
}
