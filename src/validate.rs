//! Post-hoc validation of a realized assignment set.
//!
//! Schedules drift after generation (manual edits land through the outer
//! service), so the safety rules are re-checkable without re-solving. Hard
//! rule breaches come back as violations; understaffing comes back as the
//! same alerts the generator would emit.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calendar::Calendar;
use crate::config::SchedulingConstraints;
use crate::domain::{Alert, Assignment, Resident, ShiftType};

/// A broken hard rule. `resident_id` is absent for day-level breaches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardViolation {
    pub resident_id: Option<i64>,
    pub date: NaiveDate,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub hard_violations: Vec<HardViolation>,
    pub alerts: Vec<Alert>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.hard_violations.is_empty()
    }
}

/// Checks `assignments` against the coverage and safety rules for
/// `[start_date, end_date]`.
pub fn validate_assignments(
    start_date: NaiveDate,
    end_date: NaiveDate,
    residents: &[Resident],
    holidays: &[NaiveDate],
    cfg: &SchedulingConstraints,
    assignments: &[Assignment],
) -> ValidationReport {
    let mut violations = Vec::new();
    let mut alerts = Vec::new();

    let roster: BTreeMap<i64, &Resident> = residents
        .iter()
        .map(|resident| (resident.id, resident))
        .collect();

    let mut by_key: BTreeMap<(i64, NaiveDate), Vec<&Assignment>> = BTreeMap::new();
    for assignment in assignments {
        by_key
            .entry((assignment.resident_id, assignment.date))
            .or_default()
            .push(assignment);
    }

    let has_shift = |resident_id: i64, date: NaiveDate, shift: ShiftType| {
        by_key
            .get(&(resident_id, date))
            .is_some_and(|day| day.iter().any(|a| a.shift_type == shift))
    };

    for ((resident_id, date), day_assignments) in &by_key {
        if day_assignments.len() > 1 {
            violations.push(HardViolation {
                resident_id: Some(*resident_id),
                date: *date,
                message: "More than one assignment for resident on this date.".into(),
            });
        }

        let tier0 = roster
            .get(resident_id)
            .is_some_and(|resident| resident.ob_months_completed == 0);
        if tier0
            && cfg.tier0_call_prohibition.restricts(date.day())
            && day_assignments
                .iter()
                .any(|a| a.shift_type != ShiftType::ObDay)
        {
            violations.push(HardViolation {
                resident_id: Some(*resident_id),
                date: *date,
                message: "Tier0 resident restricted to OB_DAY on days 1-3.".into(),
            });
        }

        let next = date.checked_add_days(Days::new(1));
        if day_assignments.iter().any(|a| a.shift_type == ShiftType::ObL3)
            && !next.is_some_and(|next| {
                next <= end_date && has_shift(*resident_id, next, ShiftType::ObOc)
            })
        {
            violations.push(HardViolation {
                resident_id: Some(*resident_id),
                date: *date,
                message: "OB_L3 requires OB_OC on the following day.".into(),
            });
        }

        if day_assignments.iter().any(|a| a.shift_type.is_call()) {
            if let Some(next) = next {
                if next <= end_date && !has_shift(*resident_id, next, ShiftType::ObPostcall) {
                    violations.push(HardViolation {
                        resident_id: Some(*resident_id),
                        date: next,
                        message: "Missing OB_POSTCALL after OB_OC/OB_L4.".into(),
                    });
                }
            }
        }

        if day_assignments
            .iter()
            .any(|a| a.shift_type == ShiftType::ObPostcall)
        {
            let justified = date.checked_sub_days(Days::new(1)).is_some_and(|prev| {
                prev >= start_date
                    && (has_shift(*resident_id, prev, ShiftType::ObOc)
                        || has_shift(*resident_id, prev, ShiftType::ObL4))
            });
            if !justified {
                violations.push(HardViolation {
                    resident_id: Some(*resident_id),
                    date: *date,
                    message: "OB_POSTCALL without OB_OC or OB_L4 on the previous day.".into(),
                });
            }
        }
    }

    let calendar = Calendar::new(start_date, end_date, holidays);
    for d in 0..calendar.len() {
        let date = calendar.date(d);
        let req = cfg.coverage.for_class(calendar.class(d));

        let count = |shift: ShiftType| {
            assignments
                .iter()
                .filter(|a| a.date == date && a.shift_type == shift)
                .count() as u32
        };

        if count(ShiftType::ObOc) < req.ob_oc {
            alerts.push(Alert::high(date, "Understaffed OB_OC coverage."));
        }
        if req.ob_l3 > 0 && count(ShiftType::ObL3) < req.ob_l3 {
            alerts.push(Alert::high(date, "Understaffed OB_L3 coverage."));
        }
        if req.ob_l4 > 0 && count(ShiftType::ObL4) < req.ob_l4 {
            alerts.push(Alert::high(date, "Understaffed OB_L4 coverage."));
        }
        if req.ob_day_min > 0 && count(ShiftType::ObDay) < req.ob_day_min {
            alerts.push(Alert::high(date, "Understaffed OB_DAY coverage."));
        }
        if req.ob_day_max > 0 && count(ShiftType::ObDay) > req.ob_day_max {
            violations.push(HardViolation {
                resident_id: None,
                date,
                message: "OB_DAY coverage exceeds maximum.".into(),
            });
        }
    }

    ValidationReport {
        hard_violations: violations,
        alerts,
    }
}
