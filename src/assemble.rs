//! Post-solve assembly: assignments, alerts, fairness, request ledger.
//!
//! Coverage is recounted from the extracted variables rather than read back
//! from the slack variables, so a rounding quirk in the solver cannot
//! silence an understaffing alert.

use chrono::NaiveDate;
use tracing::info;

use std::collections::BTreeMap;

use crate::calendar::Calendar;
use crate::config::SchedulingConstraints;
use crate::domain::{
    Alert, Assignment, FairnessReport, GenerationOutput, Request, RequestOutcome, RequestType,
    Resident, ShiftType,
};
use crate::model::slot;
use crate::solver::SolvedAssignments;

/// Output for a solve that produced nothing usable: no assignments (queued
/// time-off passthroughs included), one alert, empty reports.
pub fn no_solution_output(start_date: NaiveDate) -> GenerationOutput {
    GenerationOutput {
        assignments: Vec::new(),
        alerts: vec![Alert::high(start_date, "Solver infeasible")],
        fairness: FairnessReport::default(),
        unmet_requests: Vec::new(),
    }
}

pub fn assemble(
    solved: &SolvedAssignments,
    residents: &[Resident],
    requests: &[Request],
    calendar: &Calendar,
    cfg: &SchedulingConstraints,
    passthroughs: Vec<Assignment>,
    mut alerts: Vec<Alert>,
) -> GenerationOutput {
    let num_days = calendar.len();
    let mut assignments = passthroughs;

    let mut ob_oc_counts: BTreeMap<i64, u32> =
        residents.iter().map(|resident| (resident.id, 0)).collect();

    for (r, resident) in residents.iter().enumerate() {
        for d in 0..num_days {
            for (s, shift) in ShiftType::SCHEDULED.iter().enumerate() {
                if solved.is_assigned(r, d, s) {
                    assignments.push(Assignment::new(resident.id, calendar.date(d), *shift));
                    if s == slot::OB_OC {
                        *ob_oc_counts.entry(resident.id).or_insert(0) += 1;
                    }
                }
            }
        }
    }

    let weekend_ob_oc_spread = weekend_spread(solved, residents.len(), calendar);

    for d in 0..num_days {
        let req = cfg.coverage.for_class(calendar.class(d));
        let date = calendar.date(d);

        let count = |slot: usize| {
            (0..residents.len())
                .filter(|r| solved.is_assigned(*r, d, slot))
                .count() as u32
        };

        if count(slot::OB_OC) < req.ob_oc {
            alerts.push(Alert::high(date, "Understaffed OB_OC coverage."));
        }
        if req.ob_l3 > 0 && count(slot::OB_L3) < req.ob_l3 {
            alerts.push(Alert::high(date, "Understaffed OB_L3 coverage."));
        }
        if req.ob_l4 > 0 && count(slot::OB_L4) < req.ob_l4 {
            alerts.push(Alert::high(date, "Understaffed OB_L4 coverage."));
        }
        if req.ob_day_min > 0 && count(slot::OB_DAY) < req.ob_day_min {
            alerts.push(Alert::high(date, "Understaffed OB_DAY coverage."));
        }
    }

    let unmet_requests = requests
        .iter()
        .map(|request| {
            let calls_in_window = assignments
                .iter()
                .filter(|assignment| {
                    assignment.resident_id == request.resident_id
                        && assignment.shift_type == ShiftType::ObOc
                        && request.contains(assignment.date)
                })
                .count();
            let met = match request.request_type {
                RequestType::PreferCall => calls_in_window >= 1,
                RequestType::AvoidCall | RequestType::WeekendOff => calls_in_window == 0,
            };
            RequestOutcome {
                resident_id: request.resident_id,
                request_type: request.request_type,
                start_date: request.start_date,
                end_date: request.end_date,
                met,
            }
        })
        .collect();

    info!(
        assignments = assignments.len(),
        alerts = alerts.len(),
        "assembled schedule"
    );

    GenerationOutput {
        assignments,
        alerts,
        fairness: FairnessReport {
            ob_oc_counts,
            weekend_ob_oc_spread,
        },
        unmet_requests,
    }
}

/// Realized max-minus-min of per-resident on-call counts over strict
/// weekend days. Holidays do not count; a period without weekend days
/// yields zero.
fn weekend_spread(solved: &SolvedAssignments, num_residents: usize, calendar: &Calendar) -> u32 {
    let weekend_days: Vec<usize> = (0..calendar.len())
        .filter(|d| calendar.is_weekend(*d))
        .collect();
    if weekend_days.is_empty() || num_residents == 0 {
        return 0;
    }

    let counts = (0..num_residents).map(|r| {
        weekend_days
            .iter()
            .filter(|d| solved.is_assigned(r, **d, slot::OB_OC))
            .count() as u32
    });
    let (min, max) = counts.fold((u32::MAX, 0), |(min, max), count| {
        (min.min(count), max.max(count))
    });
    max - min
}
