use chrono::{DateTime, Duration, TimeZone, Utc};
use tempfile::tempdir;
use weekplan::persistence::file::{load_schedule_from_json, save_schedule_to_json};
use weekplan::{
    Day, FlexibleTask, JsonFileStore, MandatoryTask, MasterSchedule, PersistenceError,
    SaveOutcome, ScheduleStore, ScheduleViolation, TaskDuration, TimeOfDay, save_if_changed,
};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 7, 7, 0, 0).unwrap()
}

fn sample() -> MasterSchedule {
    MasterSchedule::new("Semester", t0())
        .with_time_zone("Europe/Berlin")
        .with_active_days(vec![Day::Monday, Day::Wednesday, Day::Friday, Day::Saturday])
        .with_task_added(
            FlexibleTask::new()
                .with_summary("Flashcards")
                .with_duration(TaskDuration::new(0, 30))
                .with_preferred_time(Some(TimeOfDay::Morning))
                .with_weekends(true)
                .with_frequency(4),
        )
        .with_mandatory_task_added(
            MandatoryTask::new()
                .with_summary("Lab")
                .with_times("13:00", "15:30")
                .with_days(Day::Friday, Day::Monday)
                .with_location(Some("B-204".into())),
        )
}

#[test]
fn json_file_round_trip_preserves_schedule() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("schedule.json");
    let schedule = sample();
    save_schedule_to_json(&schedule, &path).unwrap();
    let loaded = load_schedule_from_json(&path).unwrap();
    assert_eq!(loaded, schedule);
}

#[test]
fn json_store_missing_file_loads_none() {
    let dir = tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("nested").join("absent.json"));
    assert!(store.load_schedule().unwrap().is_none());
}

#[test]
fn json_store_creates_parent_directories() {
    let dir = tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("a").join("b").join("plan.json"));
    let schedule = sample();
    store.save_schedule(&schedule).unwrap();
    assert_eq!(store.load_schedule().unwrap(), Some(schedule));
}

#[test]
fn store_rejects_invalid_schedule_with_all_violations() {
    let dir = tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("plan.json"));
    let invalid = MasterSchedule::new("", t0()).with_active_days(Vec::new());
    match store.save_schedule(&invalid) {
        Err(PersistenceError::InvalidSchedule(violations)) => assert_eq!(
            violations,
            vec![
                ScheduleViolation::MissingName,
                ScheduleViolation::NoActiveDays,
                ScheduleViolation::NoTasks,
            ]
        ),
        other => panic!("expected InvalidSchedule, got {other:?}"),
    }
    assert!(!store.path().exists());
}

#[test]
fn store_rejects_broken_task_invariants() {
    let dir = tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("plan.json"));
    let schedule = sample().with_task_added(FlexibleTask::new().with_frequency(7));
    assert!(matches!(
        store.save_schedule(&schedule),
        Err(PersistenceError::InvalidData(_))
    ));
}

#[test]
fn corrupt_json_is_a_serialization_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("plan.json");
    std::fs::write(&path, "{ not json").unwrap();
    let store = JsonFileStore::new(&path);
    assert!(matches!(
        store.load_schedule(),
        Err(PersistenceError::Serialization(_))
    ));
}

#[test]
fn save_if_changed_skips_identical_snapshot() {
    let dir = tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("plan.json"));
    let schedule = sample();

    let first = save_if_changed(&store, None, &schedule, t0() + Duration::minutes(5)).unwrap();
    let SaveOutcome::Saved(saved) = first else {
        panic!("first save must write");
    };
    assert_eq!(saved.updated_at, t0() + Duration::minutes(5));

    // only bookkeeping differs
    let same = schedule.clone().with_time_zone("Asia/Tokyo");
    let second = save_if_changed(&store, Some(&saved), &same, t0() + Duration::minutes(9)).unwrap();
    assert_eq!(second, SaveOutcome::Unchanged);
    assert_eq!(store.load_schedule().unwrap().unwrap().updated_at, saved.updated_at);
}

#[test]
fn save_if_changed_writes_and_stamps_real_changes() {
    let dir = tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("plan.json"));
    let schedule = sample();
    let later = t0() + Duration::days(1);

    let renamed = schedule.clone().with_name("Summer");
    match save_if_changed(&store, Some(&schedule), &renamed, later).unwrap() {
        SaveOutcome::Saved(saved) => {
            assert_eq!(saved.name, "Summer");
            assert_eq!(saved.updated_at, later);
        }
        SaveOutcome::Unchanged => panic!("rename must be saved"),
    }
    assert_eq!(store.load_schedule().unwrap().unwrap().name, "Summer");
}

#[test]
fn save_if_changed_validates_before_comparing() {
    let dir = tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("plan.json"));
    let invalid = sample().with_daily_window("17:00", "09:00");
    let err = save_if_changed(&store, Some(&invalid), &invalid, t0()).unwrap_err();
    assert!(matches!(err, PersistenceError::InvalidSchedule(_)));
}

#[cfg(feature = "sqlite")]
mod sqlite {
    use super::*;
    use weekplan::SqliteScheduleStore;

    #[test]
    fn sqlite_store_round_trip_and_overwrite() {
        let dir = tempdir().unwrap();
        let store = SqliteScheduleStore::new(dir.path().join("plan.db")).unwrap();
        assert!(store.load_schedule().unwrap().is_none());

        let schedule = sample();
        store.save_schedule(&schedule).unwrap();
        assert_eq!(store.load_schedule().unwrap(), Some(schedule.clone()));

        let renamed = schedule.with_name("Renamed");
        store.save_schedule(&renamed).unwrap();
        assert_eq!(store.load_schedule().unwrap().unwrap().name, "Renamed");
    }

    #[test]
    fn sqlite_store_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plan.sqlite");
        let schedule = sample();
        SqliteScheduleStore::new(&path)
            .unwrap()
            .save_schedule(&schedule)
            .unwrap();
        let reopened = SqliteScheduleStore::new(&path).unwrap();
        assert_eq!(reopened.load_schedule().unwrap(), Some(schedule));
    }

    #[test]
    fn sqlite_store_rejects_invalid_schedule() {
        let store = SqliteScheduleStore::in_memory().unwrap();
        let invalid = MasterSchedule::new("", t0());
        assert!(matches!(
            store.save_schedule(&invalid),
            Err(PersistenceError::InvalidSchedule(_))
        ));
        assert!(store.load_schedule().unwrap().is_none());
    }

    #[test]
    fn config_opens_sqlite_for_db_extension() {
        let dir = tempdir().unwrap();
        let store = weekplan::config::open_store_at(&dir.path().join("plan.db")).unwrap();
        store.save_schedule(&sample()).unwrap();
        let reopened = SqliteScheduleStore::new(dir.path().join("plan.db")).unwrap();
        assert!(reopened.load_schedule().unwrap().is_some());
    }
}
