//! On-call schedule generation for obstetrics residency cohorts.
//!
//! Given a date range, a roster, approved preference requests and time-off
//! blocks, and the hospital holiday list, [`generate_schedule`] produces one
//! assignment per resident per day from a fixed shift vocabulary. Hard
//! coverage and safety rules are enforced in a 0/1 integer program (with
//! slack so thin rosters stay solvable); fairness and preference fit are
//! optimized as weighted soft objectives; understaffing and rule conflicts
//! come back as alerts on the output.

pub mod assemble;
pub mod calendar;
pub mod config;
pub mod domain;
pub mod eligibility;
pub mod engine;
pub mod error;
pub mod model;
pub mod objective;
pub mod solver;
pub mod validate;

pub use config::SchedulingConstraints;
pub use domain::{
    Alert, Assignment, FairnessReport, GenerationOutput, Request, RequestOutcome, RequestType,
    Resident, ScheduleInput, Severity, ShiftType, TimeOff,
};
pub use engine::{generate_schedule, generate_schedule_with};
pub use error::ScheduleError;
pub use solver::SolverConfig;
pub use validate::{validate_assignments, HardViolation, ValidationReport};
