//! Rappels avant prise de poste.
//!
//! Le watcher est interrogé périodiquement ; chaque jalon (24h, 1h) est détecté
//! dans une fenêtre de tolérance puis dédupliqué pour la durée du processus.

mod runner;
mod sink;
mod watcher;

pub use runner::run_watch_loop;
pub use sink::{JsonLinesSink, LogSink, ReminderSink};
pub use watcher::ReminderWatcher;

use crate::model::{AssignmentId, ShiftAssignment, Staff};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Heure de prise de poste par défaut (heure locale).
pub const DEFAULT_SHIFT_START: NaiveTime = match NaiveTime::from_hms_opt(7, 0, 0) {
    Some(t) => t,
    None => panic!("invalid default shift start"),
};

/// Demi-largeur de la fenêtre de détection autour d'un jalon, en minutes.
pub const WINDOW_HALF_WIDTH_MINUTES: i64 = 5;

/// Jalon de rappel avant le début d'une garde.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Milestone {
    #[serde(rename = "24h")]
    DayBefore,
    #[serde(rename = "1h")]
    HourBefore,
}

impl Milestone {
    pub const ALL: [Milestone; 2] = [Milestone::DayBefore, Milestone::HourBefore];

    pub fn lead_minutes(self) -> i64 {
        match self {
            Milestone::DayBefore => 24 * 60,
            Milestone::HourBefore => 60,
        }
    }

    /// Bornes exclusives : se déclenche si `low < minutes < high`.
    pub fn window(self) -> (i64, i64) {
        let lead = self.lead_minutes();
        (lead - WINDOW_HALF_WIDTH_MINUTES, lead + WINDOW_HALF_WIDTH_MINUTES)
    }

    pub fn matches(self, minutes_until_start: i64) -> bool {
        let (low, high) = self.window();
        low < minutes_until_start && minutes_until_start < high
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Milestone::DayBefore => "24h",
            Milestone::HourBefore => "1h",
        }
    }
}

impl fmt::Display for Milestone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Réglages des rappels, persistés avec le roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderSettings {
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default = "enabled_by_default")]
    pub notify_24h: bool,
    #[serde(default = "enabled_by_default")]
    pub notify_1h: bool,
    #[serde(default = "default_shift_start")]
    pub shift_start: NaiveTime,
    /// Purge les clés de déduplication des gardes passées à chaque passage.
    #[serde(default)]
    pub evict_past: bool,
}

fn enabled_by_default() -> bool {
    true
}

fn default_shift_start() -> NaiveTime {
    DEFAULT_SHIFT_START
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            notify_24h: true,
            notify_1h: true,
            shift_start: DEFAULT_SHIFT_START,
            evict_past: false,
        }
    }
}

impl ReminderSettings {
    pub fn milestone_enabled(&self, milestone: Milestone) -> bool {
        match milestone {
            Milestone::DayBefore => self.notify_24h,
            Milestone::HourBefore => self.notify_1h,
        }
    }
}

/// Rappel émis vers le collaborateur de diffusion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderEvent {
    pub assignment_id: AssignmentId,
    pub recipient_name: String,
    pub shift_date: NaiveDate,
    pub milestone: Milestone,
    pub message: String,
    pub sent_at: DateTime<Utc>,
}

/// Permet de customiser le rendu du message (texte, SMS, etc.).
pub trait ReminderRenderer {
    fn render(&self, staff: &Staff, assignment: &ShiftAssignment, milestone: Milestone) -> String;
}

/// Gabarit texte court, adapté à une notification push.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextReminder;

impl ReminderRenderer for TextReminder {
    fn render(&self, staff: &Staff, assignment: &ShiftAssignment, milestone: Milestone) -> String {
        let slot = assignment.slot_index + 1;
        match milestone {
            Milestone::DayBefore => format!(
                "Rappel : {name}, tu es de garde demain ({date}, poste {slot}).",
                name = staff.name,
                date = assignment.date,
            ),
            Milestone::HourBefore => format!(
                "Rappel : {name}, ta garde (poste {slot}) commence dans 1 heure.",
                name = staff.name,
            ),
        }
    }
}
