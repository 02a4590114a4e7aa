use super::random::RandomSource;
use super::score::{self, Candidate, FEASIBILITY_FLOOR, NO_HISTORY_DAYS, REJECTED};
use super::stats::{self, StaffRunningStats};
use super::types::{SchedError, ScheduleOutcome, SchedulingConfig};
use super::util::{self, Occupancy};
use crate::model::{Holiday, ShiftAssignment, Staff, StaffId};
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::{debug, info};

/// Remplit les créneaux vides de la période, jour par jour puis créneau par créneau.
///
/// Fonction pure de ses entrées (hors `rng`) : `existing` n'est jamais modifié et
/// seules les nouvelles affectations sont renvoyées, à fusionner par l'appelant.
/// Les jours fériés sont acceptés mais ne contraignent pas le placement.
pub fn auto_schedule<R: RandomSource + ?Sized>(
    staff: &[Staff],
    existing: &[ShiftAssignment],
    _holidays: &[Holiday],
    config: &SchedulingConfig,
    rng: &mut R,
) -> Result<ScheduleOutcome, SchedError> {
    if staff.is_empty() {
        return Err(SchedError::NoStaffAvailable);
    }
    config.validate()?;

    let allow_double_booking = config.allows_double_booking(staff.len());
    let mut stats = stats::seed(staff, existing, config);
    let mut occupancy = Occupancy::from_existing(existing);
    let mut outcome = ScheduleOutcome::default();

    for date in util::days_in(config.period_start, config.period_end) {
        for slot in 0..config.shifts_per_day {
            if occupancy.is_taken(date, slot) {
                continue;
            }

            let best = best_candidate(staff, &stats, &occupancy, date, allow_double_booking, rng);
            let Some((chosen, best_score)) = best.filter(|(_, s)| *s > FEASIBILITY_FLOOR) else {
                debug!(%date, slot, "no eligible staff, slot left empty");
                outcome.unfilled.push((date, slot));
                continue;
            };

            let person = &staff[chosen];
            let assignment = ShiftAssignment {
                id: rng.next_id(),
                date,
                slot_index: slot,
                staff_id: person.id.clone(),
            };
            debug!(
                %date,
                slot,
                staff = person.id.as_str(),
                score = best_score,
                "slot filled"
            );

            if let Some(entry) = stats.get_mut(&person.id) {
                entry.record(date);
            }
            occupancy.occupy(date, slot, &person.id);
            outcome.assignments.push(assignment);
            outcome.filled_count += 1;
        }
    }

    info!(
        start = %config.period_start,
        end = %config.period_end,
        shifts_per_day = config.shifts_per_day,
        allow_double_booking,
        filled = outcome.filled_count,
        unfilled = outcome.unfilled.len(),
        "auto-schedule finished"
    );

    Ok(outcome)
}

/// Indice et score du meilleur candidat ; à égalité, le premier dans l'ordre du roster.
fn best_candidate<R: RandomSource + ?Sized>(
    staff: &[Staff],
    stats: &HashMap<StaffId, StaffRunningStats>,
    occupancy: &Occupancy,
    date: NaiveDate,
    allow_double_booking: bool,
    rng: &mut R,
) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;

    for (idx, person) in staff.iter().enumerate() {
        let running = stats.get(&person.id);
        let assigned = running.map_or(0, |s| s.assigned_in_period);
        let days_since_last = running
            .and_then(|s| s.last_before(date))
            .map_or(NO_HISTORY_DAYS, |last| util::days_between(last, date));

        let candidate = Candidate {
            target: person.target_shifts,
            assigned,
            days_since_last,
            working_today: occupancy.is_working(date, &person.id),
        };

        // Un tirage par personne et par créneau, rejet ou non.
        let jitter = rng.jitter();
        let total = score::base_score(&candidate, allow_double_booking)
            .map_or(REJECTED, |base| base + jitter);

        if best.map_or(true, |(_, s)| total > s) {
            best = Some((idx, total));
        }
    }

    best
}
