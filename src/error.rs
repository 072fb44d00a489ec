//! Input-shape errors.
//!
//! Only malformed inputs are errors; every domain-level problem
//! (understaffing, infeasibility, tier-0 conflicts) is reported as an alert
//! on the generation output instead.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("schedule period starts {start} after it ends {end}")]
    InvalidPeriod { start: NaiveDate, end: NaiveDate },

    #[error("roster contains resident id {resident_id} more than once")]
    DuplicateResident { resident_id: i64 },

    #[error("request references resident {resident_id}, which is not in the roster")]
    UnknownRequestResident { resident_id: i64 },

    #[error("time-off block references resident {resident_id}, which is not in the roster")]
    UnknownTimeOffResident { resident_id: i64 },
}
