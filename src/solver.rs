//! MILP driver.
//!
//! Every call builds one fresh problem and one fresh solver instance, so
//! concurrent solves on independent inputs cannot interfere. The solve runs
//! on a worker thread; the driver waits up to the wall-clock budget. The
//! backend has no cancellation hook, so a worker that outlives its budget is
//! abandoned: it keeps its model alive until the branch-and-bound finishes,
//! then logs the late finish and exits. `max_decision_vars` bounds how much
//! an abandoned worker can hold — oversized models are refused before any
//! thread is spawned.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use good_lp::{default_solver, Expression, Solution, SolverModel};
use tracing::{info, warn};

use crate::model::{slot, ScheduleModel};

/// Solver invocation knobs.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Wall-clock budget for one solve.
    pub time_budget: Duration,
    /// Largest accepted shift-variable count; a monthly roster needs a few
    /// thousand. Models above the cap are refused and come back as
    /// no-solution.
    pub max_decision_vars: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_budget: Duration::from_secs(10),
            max_decision_vars: 50_000,
        }
    }
}

/// Extracted 0/1 values of the shift variables, indexed like the variable
/// table they came from.
#[derive(Debug)]
pub struct SolvedAssignments {
    values: Vec<bool>,
    num_days: usize,
}

impl SolvedAssignments {
    pub(crate) fn is_assigned(&self, resident_idx: usize, day_idx: usize, slot: usize) -> bool {
        self.values[(resident_idx * self.num_days + day_idx) * slot::COUNT + slot]
    }
}

pub enum SolveOutcome {
    Solved(SolvedAssignments),
    /// Infeasible, solver failure, refused model, or budget exhausted with
    /// nothing found.
    NoSolution,
}

pub fn solve(model: ScheduleModel, objective: Expression, config: &SolverConfig) -> SolveOutcome {
    let num_days = model.table.num_days();
    let decision_vars = model.table.all().len();
    if decision_vars > config.max_decision_vars {
        warn!(
            decision_vars,
            cap = config.max_decision_vars,
            "model exceeds the decision-variable cap, refusing to solve"
        );
        return SolveOutcome::NoSolution;
    }

    let ScheduleModel {
        pb,
        constraints,
        table,
        ..
    } = model;

    let (sender, receiver) = mpsc::channel();
    let worker = thread::Builder::new()
        .name("schedule-solve".into())
        .spawn(move || {
            let mut problem = pb.minimise(objective).using(default_solver);
            for constraint in constraints {
                problem = problem.with(constraint);
            }
            let result = problem.solve().map(|solution| {
                table
                    .all()
                    .iter()
                    .map(|var| solution.value(*var) > 0.5)
                    .collect::<Vec<bool>>()
            });
            if sender.send(result).is_err() {
                warn!("abandoned solve finished after its budget expired");
            }
        });
    let worker = match worker {
        Ok(worker) => worker,
        Err(err) => {
            warn!(%err, "failed to spawn solver worker");
            return SolveOutcome::NoSolution;
        }
    };

    match receiver.recv_timeout(config.time_budget) {
        Ok(Ok(values)) => {
            let _ = worker.join();
            info!(
                assigned = values.iter().filter(|assigned| **assigned).count(),
                "solver found a schedule"
            );
            SolveOutcome::Solved(SolvedAssignments { values, num_days })
        }
        Ok(Err(err)) => {
            let _ = worker.join();
            warn!(%err, "solver returned no solution");
            SolveOutcome::NoSolution
        }
        Err(_) => {
            // Not joined: the backend cannot be interrupted mid-solve. The
            // worker runs out its (size-capped) solve and logs when done.
            warn!(budget = ?config.time_budget, "solver budget exhausted without a solution");
            SolveOutcome::NoSolution
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::Calendar;
    use crate::config::SchedulingConstraints;
    use crate::domain::Resident;
    use crate::eligibility::EligibilityGrid;
    use crate::objective;
    use chrono::NaiveDate;

    #[test]
    fn test_default_config() {
        let config = SolverConfig::default();
        assert_eq!(config.time_budget, Duration::from_secs(10));
        assert_eq!(config.max_decision_vars, 50_000);
    }

    #[test]
    fn test_oversized_model_is_refused_without_solving() {
        let cfg = SchedulingConstraints::default();
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let residents = [Resident::new(1, 1, 2)];
        let calendar = Calendar::new(date, date, &[]);
        let grid = EligibilityGrid::build(&residents, &[], &calendar, &cfg);
        let mut model = ScheduleModel::build(residents.len(), &calendar, &grid, &cfg);
        let objective = objective::build(&mut model, &residents, &[], &calendar, &cfg);

        let config = SolverConfig {
            max_decision_vars: 0,
            ..SolverConfig::default()
        };
        assert!(matches!(
            solve(model, objective, &config),
            SolveOutcome::NoSolution
        ));
    }
}
