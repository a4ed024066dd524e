use chrono::{DateTime, Duration, TimeZone, Utc};
use weekplan::{
    Day, FlexibleTask, FlexibleTaskPatch, MandatoryTask, MasterSchedule, ScheduleField,
    changed_fields, is_same,
};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap()
}

fn base() -> MasterSchedule {
    MasterSchedule::new("Base", t0())
        .with_task_added(FlexibleTask::new().with_summary("one"))
        .with_task_added(FlexibleTask::new().with_summary("two"))
        .with_mandatory_task_added(MandatoryTask::new().with_summary("class"))
}

#[test]
fn equality_is_reflexive_and_symmetric() {
    let a = base();
    let b = a.clone().with_name("Renamed");
    assert!(is_same(&a, &a));
    assert!(is_same(&b, &b));
    assert_eq!(is_same(&a, &b), is_same(&b, &a));
    assert!(!is_same(&a, &b));
}

#[test]
fn bookkeeping_fields_are_ignored() {
    let a = base();
    let b = a
        .clone()
        .touched(t0() + Duration::hours(3))
        .with_time_zone("America/New_York");
    assert!(is_same(&a, &b));
}

#[test]
fn active_days_compare_as_sets() {
    let a = base().with_active_days(vec![Day::Monday, Day::Wednesday, Day::Friday]);
    let b = a
        .clone()
        .with_active_days(vec![Day::Friday, Day::Monday, Day::Wednesday]);
    assert!(is_same(&a, &b));

    let c = a.clone().with_day_toggled(Day::Saturday, true);
    assert_eq!(changed_fields(&a, &c), vec![ScheduleField::ActiveDays]);
}

#[test]
fn task_reordering_counts_as_a_change() {
    let a = base();
    let mut b = a.clone();
    b.tasks.reverse();
    assert_eq!(changed_fields(&a, &b), vec![ScheduleField::Tasks]);
}

#[test]
fn any_task_field_counts_as_a_change() {
    let a = base();
    let id = a.tasks[0].id;
    let patch = FlexibleTaskPatch {
        include_on_weekends: Some(true),
        ..Default::default()
    };
    let b = a.clone().with_task_updated(id, &patch).unwrap();
    assert!(!is_same(&a, &b));

    let mut c = a.clone();
    c.mandatory_tasks[0].location = Some("Room 4".into());
    assert_eq!(changed_fields(&a, &c), vec![ScheduleField::MandatoryTasks]);
}

#[test]
fn lists_every_changed_field() {
    let a = base();
    let b = a
        .clone()
        .with_name("Other")
        .with_daily_window("08:00", "18:00")
        .with_task_added(FlexibleTask::new());
    assert_eq!(
        changed_fields(&a, &b),
        vec![
            ScheduleField::Name,
            ScheduleField::StartTime,
            ScheduleField::EndTime,
            ScheduleField::Tasks,
        ]
    );
}

#[test]
fn different_schedules_are_never_the_same() {
    let a = MasterSchedule::new("Same name", t0());
    let b = MasterSchedule::new("Same name", t0());
    assert_eq!(changed_fields(&a, &b), vec![ScheduleField::Id]);
}
