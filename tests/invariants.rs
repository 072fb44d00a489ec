//! Randomized invariant checks over the generation pipeline.
//!
//! Inputs are generated from a seeded RNG so every run exercises the same
//! cases; each output is checked against the full set of structural
//! invariants and cross-checked through the standalone validator.

mod common;

use std::collections::HashSet;

use chrono::{Datelike, Duration, NaiveDate};
use common::day;
use ob_scheduler::{
    generate_schedule, validate_assignments, GenerationOutput, Request, RequestType, Resident,
    ScheduleInput, ShiftType, TimeOff,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_input(rng: &mut StdRng) -> ScheduleInput {
    let num_residents = rng.gen_range(3..=14);
    let num_days = rng.gen_range(1..=28i64);
    let start = day(2024, 1, 1) + Duration::days(rng.gen_range(0..60));
    let end = start + Duration::days(num_days - 1);

    let residents: Vec<Resident> = (1..=num_residents)
        .map(|id| {
            let months = if rng.gen_bool(0.25) {
                0
            } else {
                rng.gen_range(1..=24)
            };
            Resident::new(id, rng.gen_range(0..=3), months)
        })
        .collect();

    let holidays: Vec<NaiveDate> = (0..rng.gen_range(0..=2))
        .map(|_| start + Duration::days(rng.gen_range(0..num_days)))
        .collect();

    let time_off: Vec<TimeOff> = (0..rng.gen_range(0..=3))
        .map(|_| {
            let block_start = start + Duration::days(rng.gen_range(0..num_days));
            let block_end = block_start + Duration::days(rng.gen_range(0..4));
            TimeOff::new(
                rng.gen_range(1..=num_residents),
                block_start,
                block_end,
                ShiftType::BtDay,
            )
        })
        .collect();

    let requests: Vec<Request> = (0..rng.gen_range(0..=4))
        .map(|_| {
            let offset = rng.gen_range(-3..num_days + 3);
            let window_start = start + Duration::days(offset);
            let window_end = window_start + Duration::days(rng.gen_range(0..5));
            let kind = match rng.gen_range(0..3) {
                0 => RequestType::PreferCall,
                1 => RequestType::AvoidCall,
                _ => RequestType::WeekendOff,
            };
            Request::new(rng.gen_range(1..=num_residents), kind, window_start, window_end)
        })
        .collect();

    ScheduleInput::new(start, end, residents)
        .with_requests(requests)
        .with_time_off(time_off)
        .with_holidays(holidays)
}

fn holds(output: &GenerationOutput, resident_id: i64, date: NaiveDate, shift: ShiftType) -> bool {
    output
        .assignments
        .iter()
        .any(|a| a.resident_id == resident_id && a.date == date && a.shift_type == shift)
}

fn solver_gave_up(output: &GenerationOutput) -> bool {
    output
        .alerts
        .iter()
        .any(|alert| alert.message == "Solver infeasible")
}

fn check_invariants(input: &ScheduleInput, output: &GenerationOutput) {
    // 1. At most one assignment per (resident, date).
    let mut seen = HashSet::new();
    for assignment in &output.assignments {
        assert!(
            seen.insert((assignment.resident_id, assignment.date)),
            "double booking: {assignment:?}"
        );
    }

    for assignment in &output.assignments {
        let next = assignment.date + Duration::days(1);
        let prev = assignment.date - Duration::days(1);
        match assignment.shift_type {
            // 2. L3 pairs with next-day OC.
            ShiftType::ObL3 => {
                assert!(next <= input.end_date, "L3 on the last day: {assignment:?}");
                assert!(
                    holds(output, assignment.resident_id, next, ShiftType::ObOc),
                    "L3 without next-day OC: {assignment:?}"
                );
            }
            // 3. Call forces next-day postcall.
            ShiftType::ObOc | ShiftType::ObL4 => {
                if next <= input.end_date {
                    assert!(
                        holds(output, assignment.resident_id, next, ShiftType::ObPostcall),
                        "call without next-day postcall: {assignment:?}"
                    );
                }
            }
            // 4. Postcall only after a call.
            ShiftType::ObPostcall => {
                assert!(
                    prev >= input.start_date
                        && (holds(output, assignment.resident_id, prev, ShiftType::ObOc)
                            || holds(output, assignment.resident_id, prev, ShiftType::ObL4)),
                    "postcall without prior call: {assignment:?}"
                );
            }
            ShiftType::ObDay | ShiftType::BtDay => {}
        }
    }

    // 5. Tier-0 prohibition on restricted month-days.
    for assignment in &output.assignments {
        let resident = input
            .residents
            .iter()
            .find(|r| r.id == assignment.resident_id)
            .expect("assignment for unknown resident");
        if resident.ob_months_completed == 0
            && input
                .constraints
                .tier0_call_prohibition
                .restricts(assignment.date.day())
        {
            assert!(
                matches!(assignment.shift_type, ShiftType::ObDay | ShiftType::BtDay),
                "restricted tier-0 resident on call: {assignment:?}"
            );
        }
    }

    // 6. Time-off passthrough (or conflict alert on restricted days).
    for resident in &input.residents {
        let mut date = input.start_date;
        while date <= input.end_date {
            let block = input
                .time_off
                .iter()
                .find(|b| b.resident_id == resident.id && b.contains(date));
            if let Some(block) = block {
                let day_assignments: Vec<_> = output
                    .assignments
                    .iter()
                    .filter(|a| a.resident_id == resident.id && a.date == date)
                    .collect();
                let conflicted = resident.ob_months_completed == 0
                    && input.constraints.tier0_call_prohibition.restricts(date.day());
                if conflicted {
                    assert!(
                        day_assignments.is_empty(),
                        "conflicted time-off day still assigned: {day_assignments:?}"
                    );
                    assert!(
                        output.alerts.iter().any(|alert| alert.date == date
                            && alert.message
                                == "Tier0 resident cannot be assigned BT shifts on days 1-3."),
                        "missing tier-0 conflict alert on {date}"
                    );
                } else {
                    assert_eq!(
                        day_assignments.len(),
                        1,
                        "time-off day must hold exactly the block assignment"
                    );
                    assert_eq!(day_assignments[0].shift_type, block.block_type);
                }
            }
            date += Duration::days(1);
        }
    }

    // 7. Understaffing alerts match a recount of realized coverage.
    let holiday_set: HashSet<NaiveDate> = input.holidays.iter().copied().collect();
    let mut date = input.start_date;
    while date <= input.end_date {
        let weekend = matches!(date.weekday(), chrono::Weekday::Sat | chrono::Weekday::Sun);
        let req = if weekend || holiday_set.contains(&date) {
            input.constraints.coverage.weekend_or_holiday
        } else if date.weekday() == chrono::Weekday::Fri {
            input.constraints.coverage.friday
        } else {
            input.constraints.coverage.weekday
        };

        let count = |shift: ShiftType| {
            output
                .assignments
                .iter()
                .filter(|a| a.date == date && a.shift_type == shift)
                .count() as u32
        };
        let shortage_alerts = |message: &str| {
            output
                .alerts
                .iter()
                .filter(|alert| alert.date == date && alert.message == message)
                .count()
        };

        let expectations = [
            (ShiftType::ObOc, req.ob_oc, true, "Understaffed OB_OC coverage."),
            (ShiftType::ObL3, req.ob_l3, req.ob_l3 > 0, "Understaffed OB_L3 coverage."),
            (ShiftType::ObL4, req.ob_l4, req.ob_l4 > 0, "Understaffed OB_L4 coverage."),
            (ShiftType::ObDay, req.ob_day_min, req.ob_day_min > 0, "Understaffed OB_DAY coverage."),
        ];
        for (shift, required, gated_in, message) in expectations {
            let expected = usize::from(gated_in && count(shift) < required);
            assert_eq!(
                shortage_alerts(message),
                expected,
                "alert mismatch for {shift:?} on {date}"
            );
        }
        date += Duration::days(1);
    }

    // 8. Fairness counters agree with realized assignments.
    assert_eq!(output.fairness.ob_oc_counts.len(), input.residents.len());
    for resident in &input.residents {
        let realized = output
            .assignments
            .iter()
            .filter(|a| a.resident_id == resident.id && a.shift_type == ShiftType::ObOc)
            .count() as u32;
        assert_eq!(output.fairness.ob_oc_counts[&resident.id], realized);
    }

    // 9. Request ledger agrees with the realized predicate.
    assert_eq!(output.unmet_requests.len(), input.requests.len());
    for (request, outcome) in input.requests.iter().zip(&output.unmet_requests) {
        let calls = output
            .assignments
            .iter()
            .filter(|a| {
                a.resident_id == request.resident_id
                    && a.shift_type == ShiftType::ObOc
                    && request.contains(a.date)
            })
            .count();
        let expected = match request.request_type {
            RequestType::PreferCall => calls >= 1,
            RequestType::AvoidCall | RequestType::WeekendOff => calls == 0,
        };
        assert_eq!(outcome.met, expected, "ledger mismatch for {request:?}");
    }

    // Cross-check: the generator's output passes the standalone validator.
    let report = validate_assignments(
        input.start_date,
        input.end_date,
        &input.residents,
        &input.holidays,
        &input.constraints,
        &output.assignments,
    );
    assert!(
        report.is_clean(),
        "validator found hard violations: {:?}",
        report.hard_violations
    );
}

#[test]
fn test_random_schedules_satisfy_all_invariants() {
    common::init_tracing();
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..16 {
        let input = random_input(&mut rng);
        let output = generate_schedule(&input).unwrap();
        if solver_gave_up(&output) {
            assert!(output.assignments.is_empty());
            continue;
        }
        check_invariants(&input, &output);
    }
}

#[test]
fn test_full_month_roster_satisfies_all_invariants() {
    let start = day(2024, 1, 1);
    let end = day(2024, 1, 31);
    let residents: Vec<Resident> = (1..=16)
        .map(|id| Resident::new(id, (id % 4) as u8, if id % 5 == 0 { 0 } else { 3 }))
        .collect();
    let input = ScheduleInput::new(start, end, residents)
        .with_holidays(vec![day(2024, 1, 1), day(2024, 1, 15)])
        .with_time_off(vec![
            TimeOff::new(3, day(2024, 1, 8), day(2024, 1, 12), ShiftType::BtDay),
            TimeOff::new(11, day(2024, 1, 20), day(2024, 1, 21), ShiftType::BtDay),
        ])
        .with_requests(vec![
            Request::new(2, RequestType::PreferCall, day(2024, 1, 2), day(2024, 1, 9)),
            Request::new(7, RequestType::WeekendOff, day(2024, 1, 13), day(2024, 1, 14)),
            Request::new(9, RequestType::AvoidCall, day(2024, 1, 22), day(2024, 1, 26)),
        ]);

    let output = generate_schedule(&input).unwrap();
    if !solver_gave_up(&output) {
        check_invariants(&input, &output);
    }
}

#[test]
fn test_deterministic_under_fixed_seed() {
    let mut rng = StdRng::seed_from_u64(42);
    let input = random_input(&mut rng);
    let first = generate_schedule(&input).unwrap();
    let second = generate_schedule(&input).unwrap();
    assert_eq!(first, second, "identical inputs must solve identically");
}
