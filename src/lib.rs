#![forbid(unsafe_code)]
//! Duty roster — remplissage automatique d'un planning de garde et rappels.
//!
//! - Passe gloutonne explicable : quota, espacement, équilibrage, bruit de départage.
//! - Seuls les créneaux vides sont remplis ; l'existant n'est jamais modifié.
//! - Rappels 24h / 1h par scrutation, au plus une fois par jalon.
//! - Stockage fichier JSON, hors du cœur.

pub mod model;
pub mod reminder;
pub mod report;
pub mod scheduler;
pub mod storage;

pub use model::{
    AssignmentId, Holiday, HolidayId, Roster, RosterSettings, ShiftAssignment, Staff, StaffId,
};
pub use reminder::{
    run_watch_loop, JsonLinesSink, LogSink, Milestone, ReminderEvent, ReminderRenderer,
    ReminderSettings, ReminderSink, ReminderWatcher, TextReminder,
};
pub use report::{period_summary, PeriodSummary, StaffLoad};
pub use scheduler::{
    auto_schedule, Conflict, ConflictKind, NoJitter, RandomSource, RngSource, SchedError,
    ScheduleOutcome, Scheduler, SchedulingConfig, ScriptedJitter,
};
pub use storage::{JsonStorage, Storage, StorageLock};
