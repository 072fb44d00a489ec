//! Typed solver configuration.
//!
//! The persisted configuration is a JSON map; it is parsed once at the
//! boundary into [`SchedulingConstraints`], with every missing key replaced
//! by its default and unknown keys ignored. The engine only ever sees the
//! fully-populated value.

use serde::{Deserialize, Serialize};

use crate::calendar::DayClass;

/// Required per-day counts for one day class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageRequirements {
    pub ob_oc: u32,
    pub ob_l3: u32,
    pub ob_l4: u32,
    pub ob_day_min: u32,
    pub ob_day_max: u32,
}

impl CoverageRequirements {
    pub fn weekday() -> Self {
        Self {
            ob_oc: 2,
            ob_l3: 1,
            ob_l4: 0,
            ob_day_min: 2,
            ob_day_max: 4,
        }
    }

    pub fn friday() -> Self {
        Self {
            ob_oc: 2,
            ob_l3: 0,
            ob_l4: 1,
            ob_day_min: 2,
            ob_day_max: 4,
        }
    }

    pub fn weekend_or_holiday() -> Self {
        Self {
            ob_oc: 2,
            ob_l3: 0,
            ob_l4: 1,
            ob_day_min: 0,
            ob_day_max: 0,
        }
    }
}

/// Day-class → coverage requirement table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoveragePolicy {
    #[serde(default = "CoverageRequirements::weekday")]
    pub weekday: CoverageRequirements,
    #[serde(default = "CoverageRequirements::friday")]
    pub friday: CoverageRequirements,
    #[serde(default = "CoverageRequirements::weekend_or_holiday")]
    pub weekend_or_holiday: CoverageRequirements,
}

impl Default for CoveragePolicy {
    fn default() -> Self {
        Self {
            weekday: CoverageRequirements::weekday(),
            friday: CoverageRequirements::friday(),
            weekend_or_holiday: CoverageRequirements::weekend_or_holiday(),
        }
    }
}

impl CoveragePolicy {
    pub fn for_class(&self, class: DayClass) -> &CoverageRequirements {
        match class {
            DayClass::Weekday => &self.weekday,
            DayClass::Friday => &self.friday,
            DayClass::WeekendOrHoliday => &self.weekend_or_holiday,
        }
    }
}

/// Month-days on which residents with zero completed OB months take no call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier0CallProhibition {
    #[serde(default = "Tier0CallProhibition::default_days")]
    pub days: Vec<u32>,
}

impl Tier0CallProhibition {
    fn default_days() -> Vec<u32> {
        vec![1, 2, 3]
    }

    pub fn restricts(&self, month_day: u32) -> bool {
        self.days.contains(&month_day)
    }
}

impl Default for Tier0CallProhibition {
    fn default() -> Self {
        Self {
            days: Self::default_days(),
        }
    }
}

/// An inclusive on-call count band; persisted as a `[low, high]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(u32, u32)", into = "(u32, u32)")]
pub struct CallBand {
    pub low: u32,
    pub high: u32,
}

impl From<(u32, u32)> for CallBand {
    fn from((low, high): (u32, u32)) -> Self {
        Self { low, high }
    }
}

impl From<CallBand> for (u32, u32) {
    fn from(band: CallBand) -> Self {
        (band.low, band.high)
    }
}

/// Per-tier call-count bands; `null` disables the band penalty for a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallTargets {
    #[serde(default = "CallTargets::default_tier0")]
    pub tier0: Option<CallBand>,
    #[serde(default = "CallTargets::default_tier1")]
    pub tier1: Option<CallBand>,
    #[serde(default = "CallTargets::default_tier2")]
    pub tier2: Option<CallBand>,
    #[serde(default)]
    pub tier3: Option<CallBand>,
}

impl CallTargets {
    fn default_tier0() -> Option<CallBand> {
        Some(CallBand { low: 6, high: 7 })
    }

    fn default_tier1() -> Option<CallBand> {
        Some(CallBand { low: 6, high: 7 })
    }

    fn default_tier2() -> Option<CallBand> {
        Some(CallBand { low: 5, high: 6 })
    }

    pub fn band_for_tier(&self, tier: u8) -> Option<CallBand> {
        match tier {
            0 => self.tier0,
            1 => self.tier1,
            2 => self.tier2,
            3 => self.tier3,
            _ => None,
        }
    }
}

impl Default for CallTargets {
    fn default() -> Self {
        Self {
            tier0: Self::default_tier0(),
            tier1: Self::default_tier1(),
            tier2: Self::default_tier2(),
            tier3: None,
        }
    }
}

/// Nonnegative weights of the minimized objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectiveWeights {
    #[serde(default = "ObjectiveWeights::default_understaff")]
    pub understaff: u32,
    #[serde(default = "ObjectiveWeights::default_call")]
    pub call: u32,
    #[serde(default = "ObjectiveWeights::default_weekend")]
    pub weekend: u32,
    #[serde(default = "ObjectiveWeights::default_request")]
    pub request: u32,
}

impl ObjectiveWeights {
    fn default_understaff() -> u32 {
        1000
    }

    fn default_call() -> u32 {
        20
    }

    fn default_weekend() -> u32 {
        5
    }

    fn default_request() -> u32 {
        10
    }
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self {
            understaff: Self::default_understaff(),
            call: Self::default_call(),
            weekend: Self::default_weekend(),
            request: Self::default_request(),
        }
    }
}

/// The full constraint configuration one solve runs under.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchedulingConstraints {
    #[serde(default)]
    pub coverage: CoveragePolicy,
    #[serde(default)]
    pub tier0_call_prohibition: Tier0CallProhibition,
    #[serde(default)]
    pub call_targets: CallTargets,
    #[serde(default)]
    pub weights: ObjectiveWeights,
}

impl SchedulingConstraints {
    /// Parses a persisted configuration blob, substituting defaults for
    /// missing keys.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_the_documented_table() {
        let cfg = SchedulingConstraints::default();
        assert_eq!(cfg.coverage.weekday.ob_oc, 2);
        assert_eq!(cfg.coverage.weekday.ob_l3, 1);
        assert_eq!(cfg.coverage.friday.ob_l4, 1);
        assert_eq!(cfg.coverage.weekend_or_holiday.ob_day_max, 0);
        assert_eq!(cfg.tier0_call_prohibition.days, vec![1, 2, 3]);
        assert_eq!(
            cfg.call_targets.band_for_tier(2),
            Some(CallBand { low: 5, high: 6 })
        );
        assert_eq!(cfg.call_targets.band_for_tier(3), None);
        assert_eq!(cfg.weights.understaff, 1000);
    }

    #[test]
    fn test_partial_json_falls_back_field_by_field() {
        let cfg = SchedulingConstraints::from_json(
            r#"{"weights": {"call": 50}, "tier0_call_prohibition": {"days": [1]}}"#,
        )
        .unwrap();
        assert_eq!(cfg.weights.call, 50);
        assert_eq!(cfg.weights.understaff, 1000, "missing weight keeps default");
        assert_eq!(cfg.tier0_call_prohibition.days, vec![1]);
        assert_eq!(cfg.coverage, CoveragePolicy::default());
    }

    #[test]
    fn test_null_call_target_disables_a_band() {
        let cfg =
            SchedulingConstraints::from_json(r#"{"call_targets": {"tier1": null}}"#).unwrap();
        assert_eq!(cfg.call_targets.band_for_tier(1), None);
        assert_eq!(
            cfg.call_targets.band_for_tier(0),
            Some(CallBand { low: 6, high: 7 }),
            "missing tier key keeps its default band"
        );
    }

    #[test]
    fn test_call_band_wire_shape_is_a_pair() {
        let band: CallBand = serde_json::from_str("[5, 6]").unwrap();
        assert_eq!(band, CallBand { low: 5, high: 6 });
        assert_eq!(serde_json::to_string(&band).unwrap(), "[5,6]");
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let cfg = SchedulingConstraints::from_json(r#"{"legacy_flag": true}"#).unwrap();
        assert_eq!(cfg, SchedulingConstraints::default());
    }

    #[test]
    fn test_band_lookup_out_of_range_tier() {
        assert_eq!(CallTargets::default().band_for_tier(7), None);
    }
}
