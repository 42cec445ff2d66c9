use absence_core::db::open_db;
use absence_core::{
    AbsenceTracker, CalendarDay, FixedClock, MemoryPort, PersistencePort, SqliteKvPort,
    RECORDS_KEY,
};
use chrono::{Local, SecondsFormat, TimeZone, Utc};

fn jan_first_2024() -> CalendarDay {
    CalendarDay::from_ymd(2024, 1, 1).unwrap()
}

#[test]
fn mark_find_and_clear_a_day() {
    let mut tracker = AbsenceTracker::open(MemoryPort::new()).unwrap();
    assert_eq!(tracker.registry().list().len(), 5);
    assert!(tracker.store().is_empty());

    tracker.store_mut().upsert(jan_first_2024(), "מחלה").unwrap();
    assert_eq!(tracker.status(jan_first_2024()).unwrap().reason, "מחלה");

    tracker.store_mut().remove(jan_first_2024()).unwrap();
    assert!(tracker.status(jan_first_2024()).is_none());
}

#[test]
fn record_selected_uses_newly_added_category() {
    let mut tracker = AbsenceTracker::open(MemoryPort::new()).unwrap();
    tracker.registry_mut().add("Course").unwrap();

    tracker.record_selected(jan_first_2024()).unwrap();

    assert_eq!(tracker.status(jan_first_2024()).unwrap().reason, "Course");
}

#[test]
fn summary_for_current_year_uses_clock() {
    let mut tracker = AbsenceTracker::open(MemoryPort::new()).unwrap();
    tracker.record(jan_first_2024(), "חופש").unwrap();
    tracker
        .record(CalendarDay::from_ymd(2023, 3, 3).unwrap(), "מחלה")
        .unwrap();

    let clock = FixedClock::new(Local.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap());
    let summary = tracker.summary_for_current_year(&clock);

    assert_eq!(summary.year, 2024);
    assert_eq!(summary.total_days, 2);
    assert_eq!(summary.monthly_counts[0], 1);
    assert_eq!(summary.monthly_counts.iter().sum::<usize>(), 1);
}

#[test]
fn state_survives_reopening_sqlite_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tracker.sqlite3");

    {
        let conn = open_db(&path).unwrap();
        let mut tracker = AbsenceTracker::open(SqliteKvPort::new(&conn)).unwrap();
        tracker.registry_mut().add("Course").unwrap();
        tracker.record_selected(jan_first_2024()).unwrap();
        tracker.clear(CalendarDay::from_ymd(2024, 1, 2).unwrap()).unwrap();
    }

    let conn = open_db(&path).unwrap();
    let tracker = AbsenceTracker::open(SqliteKvPort::new(&conn)).unwrap();
    assert_eq!(tracker.registry().current(), Some("Course"));
    assert_eq!(tracker.store().len(), 1);
    assert_eq!(tracker.status(jan_first_2024()).unwrap().reason, "Course");
}

fn utc_stamp_of_local(y: i32, m: u32, d: u32, h: u32) -> String {
    Local
        .with_ymd_and_hms(y, m, d, h, 0, 0)
        .unwrap()
        .with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[test]
fn legacy_blob_with_iso_timestamps_loads() {
    let port = MemoryPort::new();
    let blob = serde_json::json!([
        {"date": utc_stamp_of_local(2024, 1, 1, 8), "reason": "מחלה", "month": 0, "year": 2024},
        {"date": utc_stamp_of_local(2024, 2, 10, 10), "reason": "אחר", "month": 1, "year": 2024},
    ]);
    port.set(RECORDS_KEY, &blob.to_string()).unwrap();

    let tracker = AbsenceTracker::open(port).unwrap();
    assert_eq!(tracker.store().len(), 2);
    assert_eq!(tracker.status(jan_first_2024()).unwrap().reason, "מחלה");

    let summary = tracker.summary(2024);
    assert_eq!(summary.monthly_counts[0], 1);
    assert_eq!(summary.monthly_counts[1], 1);
}

#[test]
fn legacy_local_midnight_is_found_and_counted_on_its_day() {
    let port = MemoryPort::new();
    let blob = serde_json::json!([
        {"date": utc_stamp_of_local(2024, 1, 1, 0), "reason": "מחלה", "month": 0, "year": 2024},
    ]);
    port.set(RECORDS_KEY, &blob.to_string()).unwrap();

    let tracker = AbsenceTracker::open(port).unwrap();

    assert_eq!(tracker.status(jan_first_2024()).unwrap().reason, "מחלה");
    assert!(tracker
        .status(CalendarDay::from_ymd(2023, 12, 31).unwrap())
        .is_none());
    assert_eq!(
        tracker.summary(2024).monthly_counts,
        [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]
    );
    assert_eq!(tracker.summary(2023).monthly_counts, [0; 12]);
}
