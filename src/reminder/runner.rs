use super::{ReminderRenderer, ReminderSink, ReminderWatcher};
use crate::storage::Storage;
use chrono::{DateTime, TimeZone};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

/// Boucle de scrutation jusqu'à l'arrêt.
///
/// Chaque passage relit le roster (affectations, personnel, réglages de rappel)
/// puis diffuse les rappels dus. Un passage en retard est sauté, jamais
/// superposé au précédent. Renvoie le watcher pour inspection.
pub async fn run_watch_loop<R, S, K, C, Tz>(
    mut watcher: ReminderWatcher<R>,
    storage: S,
    mut sink: K,
    mut clock: C,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> anyhow::Result<ReminderWatcher<R>>
where
    R: ReminderRenderer,
    S: Storage,
    K: ReminderSink,
    C: FnMut() -> DateTime<Tz>,
    Tz: TimeZone,
{
    info!(interval_secs = period.as_secs(), "starting reminder watcher");

    let mut timer = tokio::time::interval(period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = timer.tick() => {
                let roster = match storage.load() {
                    Ok(roster) => roster,
                    Err(e) => {
                        warn!(error = %e, "roster unavailable, tick skipped");
                        continue;
                    }
                };
                watcher.set_settings(roster.settings.reminders.clone());

                let now = clock();
                for event in watcher.tick(&roster.staff, &roster.assignments, &now) {
                    if let Err(e) = sink.deliver(&event) {
                        warn!(
                            error = %e,
                            recipient = %event.recipient_name,
                            milestone = %event.milestone,
                            "reminder delivery failed"
                        );
                    }
                }
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    info!(sent = watcher.sent_count(), "reminder watcher stopped");
                    break;
                }
            }
        }
    }

    Ok(watcher)
}
