use super::{SchedError, Scheduler};
use crate::model::{AssignmentId, ShiftAssignment, StaffId};
use chrono::NaiveDate;
use tracing::warn;

/// Pose `staff` sur `(date, slot)` en remplaçant l'occupant éventuel.
pub(super) fn assign_slot(
    scheduler: &mut Scheduler,
    date: NaiveDate,
    slot: u32,
    staff: &StaffId,
    shifts_per_day: u32,
) -> Result<AssignmentId, SchedError> {
    if slot >= shifts_per_day {
        return Err(SchedError::SlotOutOfRange {
            slot,
            shifts_per_day,
        });
    }
    if scheduler.roster.find_staff_by_id(staff).is_none() {
        return Err(SchedError::UnknownStaff(staff.as_str().to_string()));
    }

    let roster = &mut scheduler.roster;
    roster
        .assignments
        .retain(|a| !(a.date == date && a.slot_index == slot));

    let busy = roster
        .assignments
        .iter()
        .any(|a| a.date == date && &a.staff_id == staff);
    if busy {
        warn!(%date, slot, staff = staff.as_str(), "staff already on duty that day");
    }

    let assignment = ShiftAssignment::new(date, slot, staff.clone());
    let id = assignment.id.clone();
    roster.merge(vec![assignment]);
    Ok(id)
}

pub(super) fn clear_slot(
    scheduler: &mut Scheduler,
    date: NaiveDate,
    slot: u32,
) -> Option<ShiftAssignment> {
    let assignments = &mut scheduler.roster.assignments;
    let pos = assignments
        .iter()
        .position(|a| a.date == date && a.slot_index == slot)?;
    Some(assignments.remove(pos))
}
