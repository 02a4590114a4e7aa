use crate::model::{AssignmentId, ShiftAssignment};
use chrono::NaiveDate;
use thiserror::Error;

/// Paramètres d'une exécution d'auto-planification (jamais persistés).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulingConfig {
    pub shifts_per_day: u32,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    /// `None` : dérivé de l'effectif (moins de personnes que de créneaux).
    pub allow_double_booking: Option<bool>,
}

impl SchedulingConfig {
    pub fn new(shifts_per_day: u32, period_start: NaiveDate, period_end: NaiveDate) -> Self {
        Self {
            shifts_per_day,
            period_start,
            period_end,
            allow_double_booking: None,
        }
    }

    /// Période couvrant un mois calendaire complet.
    pub fn month(year: i32, month: u32, shifts_per_day: u32) -> Result<Self, SchedError> {
        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or(SchedError::InvalidMonth {
            year,
            month,
        })?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        };
        let end = next
            .and_then(|d| d.pred_opt())
            .ok_or(SchedError::InvalidMonth { year, month })?;
        Ok(Self::new(shifts_per_day, start, end))
    }

    pub fn with_double_booking(mut self, allow: bool) -> Self {
        self.allow_double_booking = Some(allow);
        self
    }

    pub fn allows_double_booking(&self, staff_count: usize) -> bool {
        self.allow_double_booking
            .unwrap_or(staff_count < self.shifts_per_day as usize)
    }

    pub fn validate(&self) -> Result<(), SchedError> {
        if self.period_end < self.period_start {
            return Err(SchedError::InvalidPeriod {
                start: self.period_start,
                end: self.period_end,
            });
        }
        if self.shifts_per_day == 0 {
            return Err(SchedError::InvalidCapacity);
        }
        Ok(())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.period_start <= date && date <= self.period_end
    }
}

/// Résultat d'une passe gloutonne.
#[derive(Debug, Clone, Default)]
pub struct ScheduleOutcome {
    /// Nouvelles affectations, triées par date puis créneau.
    pub assignments: Vec<ShiftAssignment>,
    pub filled_count: usize,
    /// Créneaux vides pour lesquels aucun candidat n'était admissible.
    pub unfilled: Vec<(NaiveDate, u32)>,
}

impl ScheduleOutcome {
    pub fn is_complete(&self) -> bool {
        self.unfilled.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    SlotCollision,
    DoubleBooking,
    SlotOutOfRange,
    UnknownStaff,
}

#[derive(Debug, Clone)]
pub struct Conflict {
    pub date: NaiveDate,
    pub kind: ConflictKind,
    pub first: AssignmentId,
    pub second: Option<AssignmentId>,
}

#[derive(Error, Debug)]
pub enum SchedError {
    #[error("no staff available to schedule")]
    NoStaffAvailable,
    #[error("invalid period: end {end} is before start {start}")]
    InvalidPeriod { start: NaiveDate, end: NaiveDate },
    #[error("invalid month: {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },
    #[error("shifts per day must be at least 1")]
    InvalidCapacity,
    #[error("unknown staff: {0}")]
    UnknownStaff(String),
    #[error("slot {slot} out of range (shifts per day: {shifts_per_day})")]
    SlotOutOfRange { slot: u32, shifts_per_day: u32 },
}
