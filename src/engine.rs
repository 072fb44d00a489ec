//! Schedule generation entry point.
//!
//! A pure function of its input: validate, normalize, build the model,
//! solve, assemble. No state survives a call and nothing global is shared
//! between calls.

use std::collections::BTreeSet;

use tracing::info;

use crate::assemble;
use crate::calendar::Calendar;
use crate::domain::{Alert, GenerationOutput, ScheduleInput};
use crate::eligibility::EligibilityGrid;
use crate::error::ScheduleError;
use crate::model::ScheduleModel;
use crate::objective;
use crate::solver::{self, SolveOutcome, SolverConfig};

/// Generates a schedule under the default solver budget.
pub fn generate_schedule(input: &ScheduleInput) -> Result<GenerationOutput, ScheduleError> {
    generate_schedule_with(input, &SolverConfig::default())
}

/// Generates a schedule with an explicit solver configuration.
pub fn generate_schedule_with(
    input: &ScheduleInput,
    solver_config: &SolverConfig,
) -> Result<GenerationOutput, ScheduleError> {
    if input.start_date > input.end_date {
        return Err(ScheduleError::InvalidPeriod {
            start: input.start_date,
            end: input.end_date,
        });
    }

    let calendar = Calendar::new(input.start_date, input.end_date, &input.holidays);

    if input.residents.is_empty() {
        let alerts = calendar
            .days()
            .iter()
            .map(|date| Alert::high(*date, "No residents available for coverage."))
            .collect();
        return Ok(GenerationOutput {
            alerts,
            ..Default::default()
        });
    }

    let mut roster_ids = BTreeSet::new();
    let mut duplicate = None;
    for resident in &input.residents {
        if !roster_ids.insert(resident.id) && duplicate.is_none() {
            duplicate = Some(resident.id);
        }
    }
    for request in &input.requests {
        if !roster_ids.contains(&request.resident_id) {
            return Err(ScheduleError::UnknownRequestResident {
                resident_id: request.resident_id,
            });
        }
    }
    for block in &input.time_off {
        if !roster_ids.contains(&block.resident_id) {
            return Err(ScheduleError::UnknownTimeOffResident {
                resident_id: block.resident_id,
            });
        }
    }
    if let Some(resident_id) = duplicate {
        return Err(ScheduleError::DuplicateResident { resident_id });
    }

    info!(
        residents = input.residents.len(),
        days = calendar.len(),
        requests = input.requests.len(),
        time_off = input.time_off.len(),
        "generating schedule"
    );

    let cfg = &input.constraints;
    let grid = EligibilityGrid::build(&input.residents, &input.time_off, &calendar, cfg);
    let mut model = ScheduleModel::build(input.residents.len(), &calendar, &grid, cfg);
    let objective = objective::build(&mut model, &input.residents, &input.requests, &calendar, cfg);
    let (passthroughs, alerts) = grid.into_parts();

    match solver::solve(model, objective, solver_config) {
        SolveOutcome::Solved(solved) => Ok(assemble::assemble(
            &solved,
            &input.residents,
            &input.requests,
            &calendar,
            cfg,
            passthroughs,
            alerts,
        )),
        SolveOutcome::NoSolution => Ok(assemble::no_solution_output(input.start_date)),
    }
}
