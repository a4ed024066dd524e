use crate::calendar::{Day, DaySelection};
use crate::task::{
    FlexibleTask, FlexibleTaskPatch, MandatoryTask, MandatoryTaskPatch, ScheduleItem, TaskId,
};
use crate::time::ClockTime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub const DEFAULT_TIME_ZONE: &str = "UTC";

fn default_time_zone() -> String {
    DEFAULT_TIME_ZONE.to_string()
}

/// The single persisted weekly-recurrence definition a user edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterSchedule {
    pub id: Uuid,
    pub name: String,
    /// IANA zone the schedule is interpreted in.
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    /// Daily window start, `HH:MM`.
    #[serde(alias = "start_time")]
    pub start_time: String,
    #[serde(alias = "end_time")]
    pub end_time: String,
    #[serde(alias = "active_days")]
    pub active_days: Vec<Day>,
    #[serde(default)]
    pub tasks: Vec<FlexibleTask>,
    #[serde(default, alias = "mandatory_tasks")]
    pub mandatory_tasks: Vec<MandatoryTask>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One day's effective schedule, derived from a [`MasterSchedule`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySchedule {
    pub day: Day,
    pub start_time: String,
    pub end_time: String,
    pub tasks: Vec<FlexibleTask>,
    pub mandatory_tasks: Vec<MandatoryTask>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleEditError {
    #[error("task {0} not found")]
    TaskNotFound(TaskId),
    #[error("weekly frequency {frequency} must be between 1 and {max} (the number of active days)")]
    FrequencyOutOfRange { frequency: u32, max: u32 },
    #[error("invalid clock time {0:?} (expected HH:MM)")]
    InvalidClockTime(String),
    #[error("mandatory task start time {start} must be before end time {end}")]
    MandatoryTimeOrder { start: String, end: String },
}

impl MasterSchedule {
    /// An empty schedule covering Monday to Friday, 09:00 to 17:00.
    pub fn new(name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            time_zone: default_time_zone(),
            start_time: "09:00".to_string(),
            end_time: "17:00".to_string(),
            active_days: vec![
                Day::Monday,
                Day::Tuesday,
                Day::Wednesday,
                Day::Thursday,
                Day::Friday,
            ],
            tasks: Vec::new(),
            mandatory_tasks: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active_on(&self, day: Day) -> bool {
        self.active_days.contains(&day)
    }

    /// Upper bound for any flexible task's weekly frequency.
    pub fn max_weekly_frequency(&self) -> u32 {
        DaySelection::from_days(&self.active_days).count() as u32
    }

    pub fn task(&self, id: TaskId) -> Option<&FlexibleTask> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn mandatory_task(&self, id: TaskId) -> Option<&MandatoryTask> {
        self.mandatory_tasks.iter().find(|task| task.id == id)
    }

    /// The effective schedule for `day`, or `None` when the day is not active.
    pub fn day_schedule(&self, day: Day) -> Option<DaySchedule> {
        project(self, day)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = time_zone.into();
        self
    }

    pub fn with_daily_window(
        mut self,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        self.start_time = start_time.into();
        self.end_time = end_time.into();
        self
    }

    pub fn with_active_days(mut self, active_days: Vec<Day>) -> Self {
        self.active_days = active_days;
        self
    }

    /// Selects or deselects one day; selecting an active day is a no-op.
    pub fn with_day_toggled(mut self, day: Day, selected: bool) -> Self {
        if selected {
            if !self.active_days.contains(&day) {
                self.active_days.push(day);
            }
        } else {
            self.active_days.retain(|d| *d != day);
        }
        self
    }

    pub fn with_task_added(mut self, task: FlexibleTask) -> Self {
        self.tasks.push(task);
        self
    }

    pub fn with_task_updated(
        mut self,
        id: TaskId,
        patch: &FlexibleTaskPatch,
    ) -> Result<Self, ScheduleEditError> {
        let max = self.max_weekly_frequency();
        let slot = self
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or(ScheduleEditError::TaskNotFound(id))?;
        // only a frequency edit is held to the active-day bound
        if let Some(frequency) = patch.weekly_frequency {
            if frequency == 0 || frequency > max {
                return Err(ScheduleEditError::FrequencyOutOfRange { frequency, max });
            }
        }
        let updated = slot.apply(patch);
        *slot = updated;
        Ok(self)
    }

    pub fn with_task_removed(mut self, id: TaskId) -> Result<Self, ScheduleEditError> {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        if self.tasks.len() == before {
            return Err(ScheduleEditError::TaskNotFound(id));
        }
        Ok(self)
    }

    pub fn with_mandatory_task_added(mut self, task: MandatoryTask) -> Self {
        self.mandatory_tasks.push(task);
        self
    }

    pub fn with_mandatory_task_updated(
        mut self,
        id: TaskId,
        patch: &MandatoryTaskPatch,
    ) -> Result<Self, ScheduleEditError> {
        let slot = self
            .mandatory_tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or(ScheduleEditError::TaskNotFound(id))?;
        let updated = slot.apply(patch);
        check_mandatory_times(&updated)?;
        *slot = updated;
        Ok(self)
    }

    pub fn with_mandatory_task_removed(mut self, id: TaskId) -> Result<Self, ScheduleEditError> {
        let before = self.mandatory_tasks.len();
        self.mandatory_tasks.retain(|task| task.id != id);
        if self.mandatory_tasks.len() == before {
            return Err(ScheduleEditError::TaskNotFound(id));
        }
        Ok(self)
    }

    pub fn touched(mut self, now: DateTime<Utc>) -> Self {
        self.updated_at = now;
        self
    }
}

pub(crate) fn check_mandatory_times(task: &MandatoryTask) -> Result<(), ScheduleEditError> {
    let start = ClockTime::parse(&task.start_time)
        .map_err(|_| ScheduleEditError::InvalidClockTime(task.start_time.clone()))?;
    let end = ClockTime::parse(&task.end_time)
        .map_err(|_| ScheduleEditError::InvalidClockTime(task.end_time.clone()))?;
    if start >= end {
        return Err(ScheduleEditError::MandatoryTimeOrder {
            start: task.start_time.clone(),
            end: task.end_time.clone(),
        });
    }
    Ok(())
}

/// Projects the master schedule onto a single day.
///
/// Returns `None` when `day` is not one of the schedule's active days. Flexible
/// tasks appear on every active weekday and on weekend days only when they opt
/// in; mandatory tasks appear when `day` falls inside their day range.
/// Weekly frequency plays no part here.
pub fn project(schedule: &MasterSchedule, day: Day) -> Option<DaySchedule> {
    if !schedule.is_active_on(day) {
        return None;
    }

    let tasks = schedule
        .tasks
        .iter()
        .filter(|task| task.applies_on(day))
        .cloned()
        .collect();
    let mandatory_tasks = schedule
        .mandatory_tasks
        .iter()
        .filter(|task| task.applies_on(day))
        .cloned()
        .collect();

    Some(DaySchedule {
        day,
        start_time: schedule.start_time.clone(),
        end_time: schedule.end_time.clone(),
        tasks,
        mandatory_tasks,
    })
}

/// Projections for all seven days in calendar order.
pub fn week_view(schedule: &MasterSchedule) -> Vec<(Day, Option<DaySchedule>)> {
    Day::ALL
        .into_iter()
        .map(|day| (day, project(schedule, day)))
        .collect()
}

impl DaySchedule {
    /// Mandatory tasks first, then flexible tasks, each in schedule order.
    pub fn items(&self) -> impl Iterator<Item = ScheduleItem<'_>> {
        self.mandatory_tasks
            .iter()
            .map(ScheduleItem::Mandatory)
            .chain(self.tasks.iter().map(ScheduleItem::Flexible))
    }

    pub fn item_count(&self) -> usize {
        self.tasks.len() + self.mandatory_tasks.len()
    }

    pub fn total_task_minutes(&self) -> u32 {
        self.tasks.iter().map(|task| task.duration.total_minutes()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }
}
