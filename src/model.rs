//! Decision variables and hard constraints.
//!
//! One boolean per (resident, day, scheduled kind), plus bounded integer
//! slack absorbing unmet coverage. Slack keeps the model feasible on thin
//! rosters; the objective prices it, and post-solve recounting turns it into
//! understaffing alerts.

use good_lp::{constraint, variable, Constraint, Expression, ProblemVariables, Variable};
use tracing::debug;

use crate::calendar::Calendar;
use crate::config::SchedulingConstraints;
use crate::eligibility::{Availability, EligibilityGrid};

/// Variable slots, in [`crate::domain::ShiftType::SCHEDULED`] order.
pub(crate) mod slot {
    pub const OB_DAY: usize = 0;
    pub const OB_L3: usize = 1;
    pub const OB_OC: usize = 2;
    pub const OB_L4: usize = 3;
    pub const OB_POSTCALL: usize = 4;
    pub const COUNT: usize = 5;
}

/// Dense `x[r, d, s]` lookup, resident-major.
#[derive(Debug)]
pub(crate) struct ShiftVarTable {
    vars: Vec<Variable>,
    num_days: usize,
}

impl ShiftVarTable {
    pub(crate) fn get(&self, resident_idx: usize, day_idx: usize, slot: usize) -> Variable {
        self.vars[(resident_idx * self.num_days + day_idx) * slot::COUNT + slot]
    }

    pub(crate) fn all(&self) -> &[Variable] {
        &self.vars
    }

    pub(crate) fn num_days(&self) -> usize {
        self.num_days
    }
}

/// Coverage slack for one day; a kind with a zero requirement gets a `== 0`
/// post instead of a slack variable.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DaySlack {
    pub ob_oc: Variable,
    pub ob_l3: Option<Variable>,
    pub ob_l4: Option<Variable>,
    pub ob_day: Option<Variable>,
}

/// The assembled hard-constraint system, ready for an objective.
pub struct ScheduleModel {
    pub(crate) pb: ProblemVariables,
    pub(crate) constraints: Vec<Constraint>,
    pub(crate) table: ShiftVarTable,
    pub(crate) slack: Vec<DaySlack>,
}

pub(crate) fn sum(vars: impl IntoIterator<Item = Variable>) -> Expression {
    vars.into_iter().map(Expression::from).sum()
}

impl ScheduleModel {
    pub fn build(
        num_residents: usize,
        calendar: &Calendar,
        grid: &EligibilityGrid,
        cfg: &SchedulingConstraints,
    ) -> Self {
        let num_days = calendar.len();
        let mut pb = ProblemVariables::new();
        let mut constraints = Vec::new();

        let mut vars = Vec::with_capacity(num_residents * num_days * slot::COUNT);
        for _ in 0..num_residents * num_days * slot::COUNT {
            vars.push(pb.add(variable().binary()));
        }
        let table = ShiftVarTable { vars, num_days };

        // =====================================================================
        // Per-resident structure: one shift per day, L3→next-day-OC pairing,
        // postcall linkage, availability exclusions
        // =====================================================================
        for r in 0..num_residents {
            for d in 0..num_days {
                let day_vars = (0..slot::COUNT).map(|s| table.get(r, d, s));
                constraints.push(constraint!(sum(day_vars) <= 1.0));

                // OB_L3 is the evening before an OB_OC shift; on the last day
                // there is no next day to pair with.
                if d + 1 < num_days {
                    constraints.push(constraint!(
                        table.get(r, d, slot::OB_L3) <= table.get(r, d + 1, slot::OB_OC)
                    ));
                    constraints.push(constraint!(
                        table.get(r, d + 1, slot::OB_POSTCALL)
                            == table.get(r, d, slot::OB_OC) + table.get(r, d, slot::OB_L4)
                    ));
                } else {
                    constraints.push(constraint!(table.get(r, d, slot::OB_L3) == 0.0));
                }

                // No prior day can justify a postcall on the first day.
                if d == 0 {
                    constraints.push(constraint!(table.get(r, d, slot::OB_POSTCALL) == 0.0));
                }

                match grid.availability(r, d) {
                    Availability::TimeOff(_) | Availability::Tier0Conflict => {
                        let day_vars = (0..slot::COUNT).map(|s| table.get(r, d, s));
                        constraints.push(constraint!(sum(day_vars) == 0.0));
                    }
                    Availability::Free { tier0_restricted: true } => {
                        for s in [slot::OB_L3, slot::OB_OC, slot::OB_L4, slot::OB_POSTCALL] {
                            constraints.push(constraint!(table.get(r, d, s) == 0.0));
                        }
                    }
                    Availability::Free { tier0_restricted: false } => {}
                }
            }
        }

        // =====================================================================
        // Coverage with understaffing slack
        // =====================================================================
        let mut slack = Vec::with_capacity(num_days);
        for d in 0..num_days {
            let req = cfg.coverage.for_class(calendar.class(d));

            let oc_total = sum((0..num_residents).map(|r| table.get(r, d, slot::OB_OC)));
            let slack_oc = pb.add(variable().integer().min(0.0).max(f64::from(req.ob_oc)));
            constraints.push(constraint!(oc_total + slack_oc == f64::from(req.ob_oc)));

            let l3_total = sum((0..num_residents).map(|r| table.get(r, d, slot::OB_L3)));
            let slack_l3 = if req.ob_l3 > 0 {
                let s = pb.add(variable().integer().min(0.0).max(f64::from(req.ob_l3)));
                constraints.push(constraint!(l3_total + s == f64::from(req.ob_l3)));
                Some(s)
            } else {
                constraints.push(constraint!(l3_total == 0.0));
                None
            };

            let l4_total = sum((0..num_residents).map(|r| table.get(r, d, slot::OB_L4)));
            let slack_l4 = if req.ob_l4 > 0 {
                let s = pb.add(variable().integer().min(0.0).max(f64::from(req.ob_l4)));
                constraints.push(constraint!(l4_total + s == f64::from(req.ob_l4)));
                Some(s)
            } else {
                constraints.push(constraint!(l4_total == 0.0));
                None
            };

            let day_total = sum((0..num_residents).map(|r| table.get(r, d, slot::OB_DAY)));
            let slack_day = if req.ob_day_min > 0 {
                let s = pb.add(variable().integer().min(0.0).max(f64::from(req.ob_day_min)));
                constraints.push(constraint!(day_total.clone() + s == f64::from(req.ob_day_min)));
                constraints.push(constraint!(day_total <= f64::from(req.ob_day_max)));
                Some(s)
            } else {
                constraints.push(constraint!(day_total == 0.0));
                None
            };

            slack.push(DaySlack {
                ob_oc: slack_oc,
                ob_l3: slack_l3,
                ob_l4: slack_l4,
                ob_day: slack_day,
            });
        }

        debug!(
            residents = num_residents,
            days = num_days,
            shift_vars = table.all().len(),
            constraints = constraints.len(),
            "built hard-constraint model"
        );

        Self {
            pb,
            constraints,
            table,
            slack,
        }
    }
}
