use crate::model::{Roster, StaffId};
use anyhow::bail;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;

/// Charge d'une personne sur la période.
#[derive(Debug, Clone, Serialize)]
pub struct StaffLoad {
    pub staff_id: StaffId,
    pub name: String,
    pub department: String,
    pub target: u32,
    pub assigned: u32,
    /// `target - assigned` ; négatif au-delà du quota.
    pub deficit: i64,
    pub holiday_shifts: u32,
    pub dates: Vec<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PeriodSummary {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub total_assignments: usize,
    pub unfilled_slots: usize,
    pub staff: Vec<StaffLoad>,
}

/// Statistiques de la période `[start, end]` (les jours fériés ne servent qu'ici).
pub fn period_summary(
    roster: &Roster,
    start: NaiveDate,
    end: NaiveDate,
    shifts_per_day: u32,
) -> anyhow::Result<PeriodSummary> {
    if end < start {
        bail!("end date must be after start date");
    }

    let in_period: Vec<_> = roster
        .assignments
        .iter()
        .filter(|a| start <= a.date && a.date <= end)
        .collect();
    let holidays: HashSet<NaiveDate> = roster.holidays.iter().map(|h| h.date).collect();

    let staff = roster
        .staff
        .iter()
        .map(|person| {
            let mut dates: Vec<NaiveDate> = in_period
                .iter()
                .filter(|a| a.staff_id == person.id)
                .map(|a| a.date)
                .collect();
            dates.sort();
            let assigned = dates.len() as u32;
            let holiday_shifts = dates.iter().filter(|d| holidays.contains(*d)).count() as u32;
            StaffLoad {
                staff_id: person.id.clone(),
                name: person.name.clone(),
                department: person.department.clone(),
                target: person.target_shifts,
                assigned,
                deficit: i64::from(person.target_shifts) - i64::from(assigned),
                holiday_shifts,
                dates,
            }
        })
        .collect();

    let occupied: HashSet<(NaiveDate, u32)> = in_period
        .iter()
        .filter(|a| a.slot_index < shifts_per_day)
        .map(|a| a.slot())
        .collect();
    let days = end.signed_duration_since(start).num_days() as usize + 1;
    let capacity = days * shifts_per_day as usize;

    Ok(PeriodSummary {
        start,
        end,
        total_assignments: in_period.len(),
        unfilled_slots: capacity.saturating_sub(occupied.len()),
        staff,
    })
}
