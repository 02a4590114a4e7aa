use crate::model::{ShiftAssignment, StaffId};
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};

/// Index des créneaux occupés et des personnes déjà en poste, par jour.
#[derive(Debug, Default)]
pub(super) struct Occupancy {
    slots: HashSet<(NaiveDate, u32)>,
    working: HashMap<NaiveDate, HashSet<StaffId>>,
}

impl Occupancy {
    pub(super) fn from_existing(existing: &[ShiftAssignment]) -> Self {
        let mut index = Self::default();
        for assignment in existing {
            index.occupy(assignment.date, assignment.slot_index, &assignment.staff_id);
        }
        index
    }

    pub(super) fn is_taken(&self, date: NaiveDate, slot: u32) -> bool {
        self.slots.contains(&(date, slot))
    }

    pub(super) fn is_working(&self, date: NaiveDate, staff: &StaffId) -> bool {
        self.working
            .get(&date)
            .is_some_and(|people| people.contains(staff))
    }

    pub(super) fn occupy(&mut self, date: NaiveDate, slot: u32, staff: &StaffId) {
        self.slots.insert((date, slot));
        self.working.entry(date).or_default().insert(staff.clone());
    }
}

/// Jours inclus de `[start, end]`, dans l'ordre.
pub(super) fn days_in(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |d| *d <= end)
}

pub(super) fn days_between(earlier: NaiveDate, later: NaiveDate) -> i64 {
    later.signed_duration_since(earlier).num_days()
}
