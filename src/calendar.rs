//! Day enumeration and classification for one scheduling period.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, Weekday};

/// Coverage class of a single day. Hospital holidays count as weekends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayClass {
    Weekday,
    Friday,
    WeekendOrHoliday,
}

/// The enumerated, classified days of an inclusive period.
#[derive(Debug, Clone)]
pub struct Calendar {
    days: Vec<NaiveDate>,
    classes: Vec<DayClass>,
    weekend: Vec<bool>,
}

impl Calendar {
    /// Builds the calendar for `[start, end]`. The caller guarantees
    /// `start <= end`.
    pub fn new(start: NaiveDate, end: NaiveDate, holidays: &[NaiveDate]) -> Self {
        let holiday_set: HashSet<NaiveDate> = holidays.iter().copied().collect();

        let days: Vec<NaiveDate> = start
            .iter_days()
            .take_while(|day| *day <= end)
            .collect();
        let weekend: Vec<bool> = days.iter().map(|day| is_weekend(*day)).collect();
        let classes: Vec<DayClass> = days
            .iter()
            .zip(&weekend)
            .map(|(day, weekend)| {
                if *weekend || holiday_set.contains(day) {
                    DayClass::WeekendOrHoliday
                } else if day.weekday() == Weekday::Fri {
                    DayClass::Friday
                } else {
                    DayClass::Weekday
                }
            })
            .collect();

        Self {
            days,
            classes,
            weekend,
        }
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn days(&self) -> &[NaiveDate] {
        &self.days
    }

    pub fn date(&self, day_idx: usize) -> NaiveDate {
        self.days[day_idx]
    }

    pub fn class(&self, day_idx: usize) -> DayClass {
        self.classes[day_idx]
    }

    /// Strict Saturday/Sunday, independent of holidays; the fairness spread
    /// counts only these.
    pub fn is_weekend(&self, day_idx: usize) -> bool {
        self.weekend[day_idx]
    }

    /// Index of `date` within the period, if it falls inside.
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        let offset = (date - self.days[0]).num_days();
        if (0..self.days.len() as i64).contains(&offset) {
            Some(offset as usize)
        } else {
            None
        }
    }
}

fn is_weekend(day: NaiveDate) -> bool {
    matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
}
