mod assignment;
mod conflicts;
mod mutate;
mod random;
mod score;
mod stats;
mod types;
mod util;

pub use assignment::auto_schedule;
pub use random::{NoJitter, RandomSource, RngSource, ScriptedJitter, JITTER_SPAN};
pub use score::{FEASIBILITY_FLOOR, NO_HISTORY_DAYS, REJECTED};
pub use types::{Conflict, ConflictKind, SchedError, ScheduleOutcome, SchedulingConfig};

use crate::model::{AssignmentId, Roster, ShiftAssignment, Staff, StaffId};
use chrono::NaiveDate;

/// Scheduler : encapsule le Roster de référence.
///
/// Toute mutation passe par `&mut self` : une seule planification à la fois
/// sur un même roster.
#[derive(Debug, Default)]
pub struct Scheduler {
    roster: Roster,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            roster: Roster::default(),
        }
    }

    pub fn from_roster(roster: Roster) -> Self {
        Self { roster }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }
    pub fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    pub fn add_staff(&mut self, staff: Vec<Staff>) {
        self.roster.staff.extend(staff);
    }

    /// Calcule puis fusionne les affectations des créneaux vides.
    pub fn auto_fill<R: RandomSource + ?Sized>(
        &mut self,
        config: &SchedulingConfig,
        rng: &mut R,
    ) -> Result<ScheduleOutcome, SchedError> {
        let outcome = auto_schedule(
            &self.roster.staff,
            &self.roster.assignments,
            &self.roster.holidays,
            config,
            rng,
        )?;
        self.roster.merge(outcome.assignments.clone());
        Ok(outcome)
    }

    pub fn assign_slot(
        &mut self,
        date: NaiveDate,
        slot: u32,
        staff: &StaffId,
    ) -> Result<AssignmentId, SchedError> {
        let shifts_per_day = self.roster.settings.shifts_per_day;
        mutate::assign_slot(self, date, slot, staff, shifts_per_day)
    }

    pub fn clear_slot(&mut self, date: NaiveDate, slot: u32) -> Option<ShiftAssignment> {
        mutate::clear_slot(self, date, slot)
    }

    pub fn detect_conflicts(&self, shifts_per_day: u32) -> Vec<Conflict> {
        conflicts::detect_conflicts(self, shifts_per_day)
    }
}
