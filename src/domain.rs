//! Domain model for OB resident on-call scheduling.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::SchedulingConstraints;

/// A shift kind. The first five are *scheduled* kinds the solver may hand
/// out; `BtDay` is a block kind that only ever appears as the passthrough of
/// an approved time-off block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShiftType {
    ObDay,
    ObL3,
    ObOc,
    ObL4,
    ObPostcall,
    BtDay,
}

impl ShiftType {
    /// The scheduled kinds, in the order the solver enumerates them.
    pub const SCHEDULED: [ShiftType; 5] = [
        ShiftType::ObDay,
        ShiftType::ObL3,
        ShiftType::ObOc,
        ShiftType::ObL4,
        ShiftType::ObPostcall,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftType::ObDay => "OB_DAY",
            ShiftType::ObL3 => "OB_L3",
            ShiftType::ObOc => "OB_OC",
            ShiftType::ObL4 => "OB_L4",
            ShiftType::ObPostcall => "OB_POSTCALL",
            ShiftType::BtDay => "BT_DAY",
        }
    }

    /// Position of a scheduled kind in [`ShiftType::SCHEDULED`], `None` for
    /// the block kind.
    pub fn scheduled_slot(&self) -> Option<usize> {
        ShiftType::SCHEDULED.iter().position(|s| s == self)
    }

    /// Kinds that count as overnight call (trigger postcall the next day).
    pub fn is_call(&self) -> bool {
        matches!(self, ShiftType::ObOc | ShiftType::ObL4)
    }
}

/// A resident preference over a date window. `AvoidCall` and `WeekendOff`
/// carry different labels but identical semantics: both penalize any on-call
/// assignment inside the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestType {
    PreferCall,
    AvoidCall,
    WeekendOff,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::PreferCall => "PREFER_CALL",
            RequestType::AvoidCall => "AVOID_CALL",
            RequestType::WeekendOff => "WEEKEND_OFF",
        }
    }
}

/// A trainee being scheduled. Immutable for the duration of one solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resident {
    pub id: i64,
    /// Training seniority bucket, 0..=3.
    pub tier: u8,
    /// Completed months of OB rotation; zero marks the early-month call
    /// prohibition.
    pub ob_months_completed: u32,
}

impl Resident {
    pub fn new(id: i64, tier: u8, ob_months_completed: u32) -> Self {
        Self {
            id,
            tier,
            ob_months_completed,
        }
    }
}

/// An approved preference request over an inclusive date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub resident_id: i64,
    pub request_type: RequestType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Request {
    pub fn new(
        resident_id: i64,
        request_type: RequestType,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            resident_id,
            request_type,
            start_date,
            end_date,
        }
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start_date <= day && day <= self.end_date
    }
}

/// An approved time-off block. Days inside the block are passed through to
/// the output verbatim as the block's own kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOff {
    pub resident_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub block_type: ShiftType,
}

impl TimeOff {
    pub fn new(
        resident_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        block_type: ShiftType,
    ) -> Self {
        Self {
            resident_id,
            start_date,
            end_date,
            block_type,
        }
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start_date <= day && day <= self.end_date
    }
}

/// Everything one solve consumes. Requests and time-off blocks are approved
/// ones only; holidays are hospital-flagged dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleInput {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub residents: Vec<Resident>,
    #[serde(default)]
    pub requests: Vec<Request>,
    #[serde(default)]
    pub time_off: Vec<TimeOff>,
    #[serde(default)]
    pub holidays: Vec<NaiveDate>,
    #[serde(default)]
    pub constraints: SchedulingConstraints,
}

impl ScheduleInput {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate, residents: Vec<Resident>) -> Self {
        Self {
            start_date,
            end_date,
            residents,
            requests: Vec::new(),
            time_off: Vec::new(),
            holidays: Vec::new(),
            constraints: SchedulingConstraints::default(),
        }
    }

    pub fn with_requests(mut self, requests: Vec<Request>) -> Self {
        self.requests = requests;
        self
    }

    pub fn with_time_off(mut self, time_off: Vec<TimeOff>) -> Self {
        self.time_off = time_off;
        self
    }

    pub fn with_holidays(mut self, holidays: Vec<NaiveDate>) -> Self {
        self.holidays = holidays;
        self
    }

    pub fn with_constraints(mut self, constraints: SchedulingConstraints) -> Self {
        self.constraints = constraints;
        self
    }
}

/// The output atom: one resident, one day, one shift kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub resident_id: i64,
    pub date: NaiveDate,
    pub shift_type: ShiftType,
}

impl Assignment {
    pub fn new(resident_id: i64, date: NaiveDate, shift_type: ShiftType) -> Self {
        Self {
            resident_id,
            date,
            shift_type,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    High,
    Medium,
    Low,
}

/// A dated problem report attached to the output. The engine itself only
/// emits `HIGH`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub date: NaiveDate,
    pub message: String,
    pub severity: Severity,
}

impl Alert {
    pub fn high(date: NaiveDate, message: impl Into<String>) -> Self {
        Self {
            date,
            message: message.into(),
            severity: Severity::High,
        }
    }
}

/// Per-resident on-call totals and the weekend spread, persisted verbatim on
/// the schedule version record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FairnessReport {
    pub ob_oc_counts: BTreeMap<i64, u32>,
    pub weekend_ob_oc_spread: u32,
}

/// Ledger entry for one input request: whether the realized schedule met it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestOutcome {
    pub resident_id: i64,
    pub request_type: RequestType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub met: bool,
}

/// Everything one solve produces. Assignment order is deterministic but not
/// semantically significant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationOutput {
    pub assignments: Vec<Assignment>,
    pub alerts: Vec<Alert>,
    pub fairness: FairnessReport,
    pub unmet_requests: Vec<RequestOutcome>,
}
