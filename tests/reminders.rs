#![forbid(unsafe_code)]
use chrono::{DateTime, Duration as ChronoDuration, FixedOffset, NaiveDate, TimeZone, Utc};
use duty_roster::{
    model::{Roster, ShiftAssignment, Staff},
    reminder::{
        run_watch_loop, JsonLinesSink, LogSink, Milestone, ReminderEvent, ReminderSettings,
        ReminderSink, ReminderWatcher,
    },
    storage::{JsonStorage, Storage},
};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tempfile::tempdir;
use tokio::sync::watch;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn utc(y: i32, m: u32, day: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, day, h, min, 0).unwrap()
}

fn sample() -> (Vec<Staff>, Vec<ShiftAssignment>) {
    let alice = Staff::new("Alice", "Réanimation");
    let shift = ShiftAssignment::new(d(2024, 3, 10), 0, alice.id.clone());
    (vec![alice], vec![shift])
}

#[test]
fn day_before_fires_at_exactly_1440_minutes() {
    let (staff, shifts) = sample();
    let mut watcher = ReminderWatcher::new(ReminderSettings::default());

    let events = watcher.tick(&staff, &shifts, &utc(2024, 3, 9, 7, 0));

    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert_eq!(event.milestone, Milestone::DayBefore);
    assert_eq!(event.recipient_name, "Alice");
    assert_eq!(event.shift_date, d(2024, 3, 10));
    assert_eq!(event.sent_at, utc(2024, 3, 9, 7, 0));
    insta::assert_snapshot!(&event.message, @"Rappel : Alice, tu es de garde demain (2024-03-10, poste 1).");
}

#[test]
fn nothing_fires_outside_the_windows() {
    let (staff, shifts) = sample();
    let mut watcher = ReminderWatcher::new(ReminderSettings::default());

    // 1500 minutes avant
    assert!(watcher.tick(&staff, &shifts, &utc(2024, 3, 9, 6, 0)).is_empty());
    // bornes exclusives : 1445 et 1435
    assert!(watcher.tick(&staff, &shifts, &utc(2024, 3, 9, 6, 55)).is_empty());
    assert!(watcher.tick(&staff, &shifts, &utc(2024, 3, 9, 7, 5)).is_empty());
    // 2 heures avant
    assert!(watcher.tick(&staff, &shifts, &utc(2024, 3, 10, 5, 0)).is_empty());
    assert_eq!(watcher.sent_count(), 0);
}

#[test]
fn each_milestone_fires_at_most_once() {
    let (staff, shifts) = sample();
    let mut watcher = ReminderWatcher::new(ReminderSettings::default());

    let mut emitted = Vec::new();
    let mut now = utc(2024, 3, 9, 6, 56);
    while now <= utc(2024, 3, 9, 7, 4) {
        emitted.extend(watcher.tick(&staff, &shifts, &now));
        now += ChronoDuration::seconds(30);
    }
    let mut now = utc(2024, 3, 10, 5, 56);
    while now <= utc(2024, 3, 10, 6, 4) {
        emitted.extend(watcher.tick(&staff, &shifts, &now));
        now += ChronoDuration::seconds(30);
    }

    let milestones: Vec<Milestone> = emitted.iter().map(|e| e.milestone).collect();
    assert_eq!(milestones, vec![Milestone::DayBefore, Milestone::HourBefore]);
    assert!(watcher.already_sent(&shifts[0].id, Milestone::HourBefore));
    insta::assert_snapshot!(&emitted[1].message, @"Rappel : Alice, ta garde (poste 1) commence dans 1 heure.");
}

#[test]
fn milestones_follow_settings() {
    let (staff, shifts) = sample();
    let settings = ReminderSettings {
        notify_24h: false,
        ..ReminderSettings::default()
    };
    let mut watcher = ReminderWatcher::new(settings);
    assert!(watcher.tick(&staff, &shifts, &utc(2024, 3, 9, 7, 0)).is_empty());
    assert_eq!(watcher.tick(&staff, &shifts, &utc(2024, 3, 10, 6, 0)).len(), 1);

    let mut disabled = ReminderWatcher::new(ReminderSettings {
        enabled: false,
        ..ReminderSettings::default()
    });
    assert!(disabled.tick(&staff, &shifts, &utc(2024, 3, 10, 6, 0)).is_empty());
}

#[test]
fn unknown_staff_is_skipped_without_aborting_the_scan() {
    let (staff, mut shifts) = sample();
    let ghost = Staff::new("Fantôme", "?");
    shifts.insert(0, ShiftAssignment::new(d(2024, 3, 10), 1, ghost.id));
    let mut watcher = ReminderWatcher::new(ReminderSettings::default());

    let events = watcher.tick(&staff, &shifts, &utc(2024, 3, 10, 6, 0));

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].assignment_id, shifts[1].id);
    assert!(!watcher.already_sent(&shifts[0].id, Milestone::HourBefore));
}

#[test]
fn shift_start_is_read_in_the_clock_time_zone() {
    let (staff, shifts) = sample();
    let mut watcher = ReminderWatcher::new(ReminderSettings::default());
    let paris = FixedOffset::east_opt(3600).unwrap();

    // 06:00 à Paris = 05:00 UTC, une heure avant 07:00 locale
    let now = paris.with_ymd_and_hms(2024, 3, 10, 6, 0, 0).unwrap();
    let events = watcher.tick(&staff, &shifts, &now);

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].milestone, Milestone::HourBefore);
    assert_eq!(events[0].sent_at, utc(2024, 3, 10, 5, 0));
}

#[test]
fn past_shifts_can_be_evicted() {
    let (staff, shifts) = sample();
    let mut watcher = ReminderWatcher::new(ReminderSettings::default());
    watcher.tick(&staff, &shifts, &utc(2024, 3, 9, 7, 0));
    assert_eq!(watcher.sent_count(), 1);

    assert_eq!(watcher.evict_before(d(2024, 3, 10)), 0);
    assert_eq!(watcher.evict_before(d(2024, 3, 11)), 1);
    assert_eq!(watcher.sent_count(), 0);
}

#[test]
fn evict_past_purges_keys_on_tick() {
    let (staff, shifts) = sample();
    let mut watcher = ReminderWatcher::new(ReminderSettings {
        evict_past: true,
        ..ReminderSettings::default()
    });

    assert_eq!(watcher.tick(&staff, &shifts, &utc(2024, 3, 9, 7, 0)).len(), 1);
    assert_eq!(watcher.sent_count(), 1);
    // la veille de la garde, la clé est conservée
    assert!(watcher.tick(&staff, &shifts, &utc(2024, 3, 9, 7, 3)).is_empty());
    assert_eq!(watcher.sent_count(), 1);

    assert!(watcher.tick(&staff, &shifts, &utc(2024, 3, 11, 7, 0)).is_empty());
    assert_eq!(watcher.sent_count(), 0);
}

#[test]
fn log_sink_accepts_every_event() {
    let (staff, shifts) = sample();
    let mut watcher = ReminderWatcher::new(ReminderSettings::default());
    let mut sink = LogSink;

    let events = watcher.tick(&staff, &shifts, &utc(2024, 3, 10, 6, 0));
    assert_eq!(events.len(), 1);
    for event in &events {
        sink.deliver(event).unwrap();
    }
}

#[test]
fn json_lines_sink_appends_events() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("notifications.jsonl");
    let (staff, shifts) = sample();
    let mut watcher = ReminderWatcher::new(ReminderSettings::default());
    let mut sink = JsonLinesSink::new(&path);

    for now in [utc(2024, 3, 9, 7, 0), utc(2024, 3, 10, 6, 0)] {
        for event in watcher.tick(&staff, &shifts, &now) {
            sink.deliver(&event).unwrap();
        }
    }

    let raw = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<ReminderEvent> = raw
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].milestone, Milestone::DayBefore);
    assert!(raw.contains("\"milestone\":\"1h\""));
}

#[derive(Clone, Default)]
struct SharedSink(Rc<RefCell<Vec<ReminderEvent>>>);

impl ReminderSink for SharedSink {
    fn deliver(&mut self, event: &ReminderEvent) -> anyhow::Result<()> {
        self.0.borrow_mut().push(event.clone());
        Ok(())
    }
}

#[tokio::test(start_paused = true)]
async fn watch_loop_polls_until_shutdown() {
    let dir = tempdir().unwrap();
    let storage = JsonStorage::open(dir.path().join("roster.json")).unwrap();
    let (staff, shifts) = sample();
    let roster = Roster {
        staff,
        assignments: shifts,
        ..Roster::default()
    };
    storage.save(&roster).unwrap();

    let sink = SharedSink::default();
    let (tx, rx) = watch::channel(false);
    let fixed_now = utc(2024, 3, 9, 7, 0);

    let run = run_watch_loop(
        ReminderWatcher::new(ReminderSettings::default()),
        storage,
        sink.clone(),
        move || fixed_now,
        Duration::from_secs(30),
        rx,
    );
    let stop = async {
        tokio::time::sleep(Duration::from_secs(95)).await;
        tx.send(true).unwrap();
    };
    let (result, ()) = tokio::join!(run, stop);

    let watcher = result.unwrap();
    assert_eq!(watcher.sent_count(), 1);
    assert_eq!(sink.0.borrow().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn watch_loop_survives_missing_roster() {
    let dir = tempdir().unwrap();
    let storage = JsonStorage::open(dir.path().join("absent.json")).unwrap();
    let (tx, rx) = watch::channel(false);

    let run = run_watch_loop(
        ReminderWatcher::new(ReminderSettings::default()),
        storage,
        Vec::new(),
        Utc::now,
        Duration::from_secs(30),
        rx,
    );
    let stop = async {
        tokio::time::sleep(Duration::from_secs(65)).await;
        tx.send(true).unwrap();
    };
    let (result, ()) = tokio::join!(run, stop);

    assert_eq!(result.unwrap().sent_count(), 0);
}
