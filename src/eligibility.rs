//! Per-(resident, day) availability.
//!
//! Approved time-off days pass straight through to the output as the block's
//! own kind; residents with zero completed OB months lose the four call
//! kinds on restricted month-days. A time-off day that collides with the
//! tier-0 restriction produces an alert instead of a passthrough, and the
//! resident stays unassignable that day.

use tracing::warn;

use crate::calendar::Calendar;
use crate::config::SchedulingConstraints;
use crate::domain::{Alert, Assignment, Resident, ShiftType, TimeOff};

/// What the solver may do with one resident on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    /// Schedulable; with `tier0_restricted` set, only `OB_DAY` is open.
    Free { tier0_restricted: bool },
    /// Covered by an approved time-off block of the given kind.
    TimeOff(ShiftType),
    /// Time off collides with the tier-0 restriction: no assignment at all.
    Tier0Conflict,
}

/// Dense availability grid, resident-major, plus the passthrough
/// assignments and alerts produced while building it.
#[derive(Debug)]
pub struct EligibilityGrid {
    grid: Vec<Availability>,
    num_days: usize,
    passthroughs: Vec<Assignment>,
    alerts: Vec<Alert>,
}

impl EligibilityGrid {
    pub fn build(
        residents: &[Resident],
        time_off: &[TimeOff],
        calendar: &Calendar,
        constraints: &SchedulingConstraints,
    ) -> Self {
        let num_days = calendar.len();
        let mut grid = Vec::with_capacity(residents.len() * num_days);
        let mut passthroughs = Vec::new();
        let mut alerts = Vec::new();

        for resident in residents {
            let blocks: Vec<&TimeOff> = time_off
                .iter()
                .filter(|block| block.resident_id == resident.id)
                .collect();

            for day_idx in 0..num_days {
                let date = calendar.date(day_idx);
                let restricted = resident.ob_months_completed == 0
                    && constraints
                        .tier0_call_prohibition
                        .restricts(chrono::Datelike::day(&date));
                let block_type = blocks
                    .iter()
                    .find(|block| block.contains(date))
                    .map(|block| block.block_type);

                let availability = match block_type {
                    Some(_) if restricted => {
                        warn!(resident_id = resident.id, %date, "tier-0 time-off conflict");
                        alerts.push(Alert::high(
                            date,
                            "Tier0 resident cannot be assigned BT shifts on days 1-3.",
                        ));
                        Availability::Tier0Conflict
                    }
                    Some(block_type) => {
                        passthroughs.push(Assignment::new(resident.id, date, block_type));
                        Availability::TimeOff(block_type)
                    }
                    None => Availability::Free {
                        tier0_restricted: restricted,
                    },
                };
                grid.push(availability);
            }
        }

        Self {
            grid,
            num_days,
            passthroughs,
            alerts,
        }
    }

    pub fn availability(&self, resident_idx: usize, day_idx: usize) -> Availability {
        self.grid[resident_idx * self.num_days + day_idx]
    }

    pub fn passthroughs(&self) -> &[Assignment] {
        &self.passthroughs
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    /// Consumes the grid's side products in build order.
    pub fn into_parts(self) -> (Vec<Assignment>, Vec<Alert>) {
        (self.passthroughs, self.alerts)
    }
}
