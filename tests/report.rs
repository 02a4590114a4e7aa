#![forbid(unsafe_code)]
use chrono::NaiveDate;
use duty_roster::{
    model::{Holiday, Roster, ShiftAssignment, Staff},
    period_summary,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn summary_counts_load_holidays_and_gaps() {
    let alice = Staff::new("Alice", "Urgences").with_target(3);
    let bob = Staff::new("Bob", "Bloc").with_target(1);
    let mut roster = Roster::default();
    roster.holidays.push(Holiday::new(d(2024, 5, 1), "Fête du travail"));
    roster.assignments = vec![
        ShiftAssignment::new(d(2024, 5, 1), 0, alice.id.clone()),
        ShiftAssignment::new(d(2024, 5, 3), 1, alice.id.clone()),
        ShiftAssignment::new(d(2024, 5, 2), 0, bob.id.clone()),
        ShiftAssignment::new(d(2024, 5, 2), 1, bob.id.clone()),
        // hors période
        ShiftAssignment::new(d(2024, 4, 30), 0, bob.id.clone()),
    ];
    roster.staff = vec![alice, bob];

    let summary = period_summary(&roster, d(2024, 5, 1), d(2024, 5, 3), 2).unwrap();

    assert_eq!(summary.total_assignments, 4);
    assert_eq!(summary.unfilled_slots, 2);
    let alice = &summary.staff[0];
    assert_eq!(alice.assigned, 2);
    assert_eq!(alice.deficit, 1);
    assert_eq!(alice.holiday_shifts, 1);
    assert_eq!(alice.dates, vec![d(2024, 5, 1), d(2024, 5, 3)]);
    let bob = &summary.staff[1];
    assert_eq!(bob.assigned, 2);
    assert_eq!(bob.deficit, -1);
    assert_eq!(bob.holiday_shifts, 0);
}

#[test]
fn summary_rejects_reversed_period() {
    let roster = Roster::default();
    assert!(period_summary(&roster, d(2024, 5, 3), d(2024, 5, 1), 1).is_err());
}
