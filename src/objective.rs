//! Soft penalties and the weighted objective.
//!
//! Everything the CP formulation expressed with max/min equalities is
//! linearized here through bounded auxiliary integers; under any positive
//! weight the auxiliaries settle on the exact max/min values, and the
//! realized reports never read them back.

use good_lp::{constraint, variable, Expression, Variable};
use tracing::debug;

use crate::calendar::Calendar;
use crate::config::SchedulingConstraints;
use crate::domain::{Request, RequestType, Resident};
use crate::model::{slot, sum, ScheduleModel};

/// Extends `model` with the soft-penalty auxiliaries and returns the
/// expression to minimize.
pub fn build(
    model: &mut ScheduleModel,
    residents: &[Resident],
    requests: &[Request],
    calendar: &Calendar,
    cfg: &SchedulingConstraints,
) -> Expression {
    let num_days = calendar.len();
    let weights = &cfg.weights;

    // =========================================================================
    // Understaffing: every coverage slack, heavily priced
    // =========================================================================
    let mut slack_vars: Vec<Variable> = Vec::new();
    for day_slack in &model.slack {
        slack_vars.push(day_slack.ob_oc);
        slack_vars.extend(
            [day_slack.ob_l3, day_slack.ob_l4, day_slack.ob_day]
                .into_iter()
                .flatten(),
        );
    }
    let mut objective = f64::from(weights.understaff) * sum(slack_vars);

    // =========================================================================
    // Call-count bands per tier: deviation below `low` or above `high`
    // =========================================================================
    let mut band_penalties: Vec<Variable> = Vec::new();
    for (r, resident) in residents.iter().enumerate() {
        let Some(band) = cfg.call_targets.band_for_tier(resident.tier) else {
            continue;
        };
        let calls = sum((0..num_days).map(|d| model.table.get(r, d, slot::OB_OC)));
        let under = model
            .pb
            .add(variable().integer().min(0.0).max(f64::from(band.low)));
        let over = model
            .pb
            .add(variable().integer().min(0.0).max(num_days as f64));
        model
            .constraints
            .push(constraint!(calls.clone() + under >= f64::from(band.low)));
        model
            .constraints
            .push(constraint!(calls - over <= f64::from(band.high)));
        band_penalties.push(under);
        band_penalties.push(over);
    }
    if !band_penalties.is_empty() {
        objective = objective + f64::from(weights.call) * sum(band_penalties);
    }

    // =========================================================================
    // Weekend on-call spread (max − min across residents)
    // =========================================================================
    let weekend_days: Vec<usize> = (0..num_days).filter(|d| calendar.is_weekend(*d)).collect();
    if !weekend_days.is_empty() {
        let bound = weekend_days.len() as f64;
        let weekend_max = model.pb.add(variable().integer().min(0.0).max(bound));
        let weekend_min = model.pb.add(variable().integer().min(0.0).max(bound));
        for r in 0..residents.len() {
            let count = sum(
                weekend_days
                    .iter()
                    .map(|d| model.table.get(r, *d, slot::OB_OC)),
            );
            model
                .constraints
                .push(constraint!(count.clone() - weekend_max <= 0.0));
            model
                .constraints
                .push(constraint!(count - weekend_min >= 0.0));
        }
        objective = objective + f64::from(weights.weekend) * (weekend_max - weekend_min);
    }

    // =========================================================================
    // Request fit: one binary penalty per request with an in-period window
    // =========================================================================
    let mut request_penalties: Vec<Variable> = Vec::new();
    for request in requests {
        let Some(r) = residents
            .iter()
            .position(|resident| resident.id == request.resident_id)
        else {
            continue;
        };
        let window: Vec<usize> = (0..num_days)
            .filter(|d| request.contains(calendar.date(*d)))
            .collect();
        if window.is_empty() {
            continue;
        }

        let penalty = model.pb.add(variable().binary());
        match request.request_type {
            // Penalized when the window sees no on-call at all.
            RequestType::PreferCall => {
                let in_window = sum(window.iter().map(|d| model.table.get(r, *d, slot::OB_OC)));
                model
                    .constraints
                    .push(constraint!(in_window + penalty >= 1.0));
            }
            // Penalized when the window sees any on-call.
            RequestType::AvoidCall | RequestType::WeekendOff => {
                for d in &window {
                    model.constraints.push(constraint!(
                        model.table.get(r, *d, slot::OB_OC) - penalty <= 0.0
                    ));
                }
            }
        }
        request_penalties.push(penalty);
    }
    let penalized = request_penalties.len();
    if !request_penalties.is_empty() {
        objective = objective + f64::from(weights.request) * sum(request_penalties);
    }

    debug!(
        requests = requests.len(),
        penalized,
        weekend_days = weekend_days.len(),
        "built objective"
    );

    objective
}
