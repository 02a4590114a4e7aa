use super::{Conflict, ConflictKind, Scheduler};
use crate::model::{ShiftAssignment, StaffId};
use chrono::NaiveDate;
use std::collections::HashMap;

pub(super) fn detect_conflicts(scheduler: &Scheduler, shifts_per_day: u32) -> Vec<Conflict> {
    let roster = &scheduler.roster;
    let mut out = Vec::new();

    let mut by_slot: HashMap<(NaiveDate, u32), &ShiftAssignment> = HashMap::new();
    let mut by_staff_day: HashMap<(NaiveDate, &StaffId), &ShiftAssignment> = HashMap::new();

    let mut ordered: Vec<&ShiftAssignment> = roster.assignments.iter().collect();
    ordered.sort_by_key(|a| (a.date, a.slot_index));

    for assignment in ordered {
        if assignment.slot_index >= shifts_per_day {
            out.push(single(assignment, ConflictKind::SlotOutOfRange));
        }
        if roster.find_staff_by_id(&assignment.staff_id).is_none() {
            out.push(single(assignment, ConflictKind::UnknownStaff));
        }

        if let Some(first) = by_slot.insert(assignment.slot(), assignment) {
            out.push(pair(first, assignment, ConflictKind::SlotCollision));
        }
        if let Some(first) =
            by_staff_day.insert((assignment.date, &assignment.staff_id), assignment)
        {
            out.push(pair(first, assignment, ConflictKind::DoubleBooking));
        }
    }

    out
}

fn single(assignment: &ShiftAssignment, kind: ConflictKind) -> Conflict {
    Conflict {
        date: assignment.date,
        kind,
        first: assignment.id.clone(),
        second: None,
    }
}

fn pair(first: &ShiftAssignment, second: &ShiftAssignment, kind: ConflictKind) -> Conflict {
    Conflict {
        date: second.date,
        kind,
        first: first.id.clone(),
        second: Some(second.id.clone()),
    }
}
