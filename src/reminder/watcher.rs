use super::{Milestone, ReminderEvent, ReminderRenderer, ReminderSettings, TextReminder};
use crate::model::{AssignmentId, ShiftAssignment, Staff};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Détecte les jalons atteints et garantit au plus un rappel par
/// `(affectation, jalon)` pour la durée de vie du watcher.
#[derive(Debug)]
pub struct ReminderWatcher<R = TextReminder> {
    settings: ReminderSettings,
    renderer: R,
    /// Clés déjà notifiées, avec la date de garde pour la purge.
    sent: HashMap<(AssignmentId, Milestone), NaiveDate>,
}

impl ReminderWatcher<TextReminder> {
    pub fn new(settings: ReminderSettings) -> Self {
        Self::with_renderer(settings, TextReminder)
    }
}

impl<R: ReminderRenderer> ReminderWatcher<R> {
    pub fn with_renderer(settings: ReminderSettings, renderer: R) -> Self {
        Self {
            settings,
            renderer,
            sent: HashMap::new(),
        }
    }

    pub fn settings(&self) -> &ReminderSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: ReminderSettings) {
        self.settings = settings;
    }

    pub fn sent_count(&self) -> usize {
        self.sent.len()
    }

    pub fn already_sent(&self, assignment: &AssignmentId, milestone: Milestone) -> bool {
        self.sent.contains_key(&(assignment.clone(), milestone))
    }

    /// Un passage : renvoie les rappels à diffuser pour `now`.
    ///
    /// La prise de poste est `date` à `shift_start`, dans le fuseau de `now`.
    /// Une affectation dont la personne est introuvable est ignorée sans
    /// interrompre le passage.
    pub fn tick<Tz: TimeZone>(
        &mut self,
        staff: &[Staff],
        assignments: &[ShiftAssignment],
        now: &DateTime<Tz>,
    ) -> Vec<ReminderEvent> {
        let mut out = Vec::new();
        if !self.settings.enabled {
            return out;
        }
        if self.settings.evict_past {
            self.evict_before(now.date_naive());
        }

        let tz = now.timezone();
        let sent_at = now.with_timezone(&Utc);

        for assignment in assignments {
            let local_start = assignment.date.and_time(self.settings.shift_start);
            let Some(shift_start) = tz.from_local_datetime(&local_start).earliest() else {
                debug!(date = %assignment.date, "shift start does not exist in local time");
                continue;
            };
            let minutes_until_start = shift_start.signed_duration_since(now).num_minutes();

            for milestone in Milestone::ALL {
                if !self.settings.milestone_enabled(milestone)
                    || !milestone.matches(minutes_until_start)
                {
                    continue;
                }
                let key = (assignment.id.clone(), milestone);
                if self.sent.contains_key(&key) {
                    continue;
                }
                let Some(person) = staff.iter().find(|s| s.id == assignment.staff_id) else {
                    warn!(
                        assignment = assignment.id.as_str(),
                        staff = assignment.staff_id.as_str(),
                        %milestone,
                        "reminder skipped: unknown staff"
                    );
                    continue;
                };

                let message = self.renderer.render(person, assignment, milestone);
                debug!(
                    assignment = assignment.id.as_str(),
                    %milestone,
                    minutes_until_start,
                    "reminder due"
                );
                out.push(ReminderEvent {
                    assignment_id: assignment.id.clone(),
                    recipient_name: person.name.clone(),
                    shift_date: assignment.date,
                    milestone,
                    message,
                    sent_at,
                });
                self.sent.insert(key, assignment.date);
            }
        }

        out
    }

    /// Oublie les clés des gardes antérieures à `date` ; renvoie le nombre retiré.
    pub fn evict_before(&mut self, date: NaiveDate) -> usize {
        let before = self.sent.len();
        self.sent.retain(|_, shift_date| *shift_date >= date);
        before - self.sent.len()
    }
}
