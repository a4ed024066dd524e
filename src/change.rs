use crate::calendar::Day;
use crate::schedule::MasterSchedule;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A persisted field of [`MasterSchedule`] that takes part in change detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScheduleField {
    Id,
    Name,
    StartTime,
    EndTime,
    ActiveDays,
    Tasks,
    MandatoryTasks,
    CreatedAt,
}

impl fmt::Display for ScheduleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScheduleField::Id => "id",
            ScheduleField::Name => "name",
            ScheduleField::StartTime => "startTime",
            ScheduleField::EndTime => "endTime",
            ScheduleField::ActiveDays => "activeDays",
            ScheduleField::Tasks => "tasks",
            ScheduleField::MandatoryTasks => "mandatoryTasks",
            ScheduleField::CreatedAt => "createdAt",
        };
        f.write_str(name)
    }
}

fn day_set(days: &[Day]) -> BTreeSet<Day> {
    days.iter().copied().collect()
}

/// Fields that differ between two snapshots.
///
/// `updated_at` and `time_zone` are bookkeeping and never reported. Active days
/// compare as sets; task collections compare in order, so reordering tasks
/// counts as a change.
pub fn changed_fields(a: &MasterSchedule, b: &MasterSchedule) -> Vec<ScheduleField> {
    let mut changed = Vec::new();
    if a.id != b.id {
        changed.push(ScheduleField::Id);
    }
    if a.name != b.name {
        changed.push(ScheduleField::Name);
    }
    if a.start_time != b.start_time {
        changed.push(ScheduleField::StartTime);
    }
    if a.end_time != b.end_time {
        changed.push(ScheduleField::EndTime);
    }
    if day_set(&a.active_days) != day_set(&b.active_days) {
        changed.push(ScheduleField::ActiveDays);
    }
    if a.tasks != b.tasks {
        changed.push(ScheduleField::Tasks);
    }
    if a.mandatory_tasks != b.mandatory_tasks {
        changed.push(ScheduleField::MandatoryTasks);
    }
    if a.created_at != b.created_at {
        changed.push(ScheduleField::CreatedAt);
    }
    changed
}

/// True when saving `b` over `a` would change nothing meaningful.
pub fn is_same(a: &MasterSchedule, b: &MasterSchedule) -> bool {
    changed_fields(a, b).is_empty()
}
