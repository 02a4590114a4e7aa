use super::SchedulingConfig;
use crate::model::{ShiftAssignment, Staff, StaffId};
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};

/// État courant d'une personne pendant la passe ; jeté à la fin.
#[derive(Debug, Default, Clone)]
pub(super) struct StaffRunningStats {
    pub(super) assigned_in_period: u32,
    /// Tous les jours travaillés connus, y compris avant la période.
    worked: BTreeSet<NaiveDate>,
}

impl StaffRunningStats {
    /// Dernier jour travaillé strictement avant `date`.
    pub(super) fn last_before(&self, date: NaiveDate) -> Option<NaiveDate> {
        self.worked.range(..date).next_back().copied()
    }

    pub(super) fn record(&mut self, date: NaiveDate) {
        self.assigned_in_period += 1;
        self.worked.insert(date);
    }
}

pub(super) fn seed(
    staff: &[Staff],
    existing: &[ShiftAssignment],
    config: &SchedulingConfig,
) -> HashMap<StaffId, StaffRunningStats> {
    let mut stats: HashMap<StaffId, StaffRunningStats> = staff
        .iter()
        .map(|s| (s.id.clone(), StaffRunningStats::default()))
        .collect();

    for assignment in existing {
        let Some(entry) = stats.get_mut(&assignment.staff_id) else {
            continue;
        };
        if config.contains(assignment.date) {
            entry.assigned_in_period += 1;
        }
        entry.worked.insert(assignment.date);
    }

    stats
}
