#![allow(dead_code)]

use chrono::NaiveDate;
use ob_scheduler::{GenerationOutput, Resident, ShiftType};

/// Routes engine logs through `RUST_LOG` when a test run wants them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Roster of `n` residents with ids `1..=n`, all on the same tier with the
/// same experience.
pub fn roster(n: i64, tier: u8, ob_months_completed: u32) -> Vec<Resident> {
    (1..=n)
        .map(|id| Resident::new(id, tier, ob_months_completed))
        .collect()
}

pub fn residents_holding(
    output: &GenerationOutput,
    date: NaiveDate,
    shift: ShiftType,
) -> Vec<i64> {
    output
        .assignments
        .iter()
        .filter(|a| a.date == date && a.shift_type == shift)
        .map(|a| a.resident_id)
        .collect()
}

pub fn count_shifts(output: &GenerationOutput, date: NaiveDate, shift: ShiftType) -> usize {
    residents_holding(output, date, shift).len()
}

pub fn has_alert(output: &GenerationOutput, date: NaiveDate, message: &str) -> bool {
    output
        .alerts
        .iter()
        .any(|alert| alert.date == date && alert.message == message)
}
