use crate::schedule::{self, MasterSchedule};
use crate::time::is_time_range_valid;
use serde::{Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// A rule the master schedule breaks. `Display` yields the user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScheduleViolation {
    MissingName,
    InvalidTimeRange,
    NoActiveDays,
    NoTasks,
}

impl ScheduleViolation {
    pub fn message(&self) -> &'static str {
        match self {
            ScheduleViolation::MissingName => "Schedule name is required",
            ScheduleViolation::InvalidTimeRange => "End time must be after start time",
            ScheduleViolation::NoActiveDays => "At least one day must be selected",
            ScheduleViolation::NoTasks => "Schedule must have at least one task or mandatory task",
        }
    }
}

impl fmt::Display for ScheduleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl Serialize for ScheduleViolation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.message())
    }
}

/// Checks the master schedule before it is saved.
///
/// Every rule is evaluated; the result lists all violations in rule order and
/// is empty for a valid schedule. Malformed daily times are reported as
/// [`ScheduleViolation::InvalidTimeRange`].
pub fn validate(schedule: &MasterSchedule) -> Vec<ScheduleViolation> {
    let mut violations = Vec::new();

    if schedule.name.trim().is_empty() {
        violations.push(ScheduleViolation::MissingName);
    }
    if !is_time_range_valid(&schedule.start_time, &schedule.end_time) {
        violations.push(ScheduleViolation::InvalidTimeRange);
    }
    if schedule.active_days.is_empty() {
        violations.push(ScheduleViolation::NoActiveDays);
    }
    if schedule.tasks.is_empty() && schedule.mandatory_tasks.is_empty() {
        violations.push(ScheduleViolation::NoTasks);
    }

    violations
}

pub fn violation_messages(schedule: &MasterSchedule) -> Vec<String> {
    validate(schedule).iter().map(ToString::to_string).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TaskValidationError {
    message: String,
}

impl TaskValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Per-task invariants normally enforced while editing, re-checked on a whole snapshot.
pub fn check_task_invariants(schedule: &MasterSchedule) -> Result<(), TaskValidationError> {
    let mut seen_ids = HashSet::with_capacity(schedule.tasks.len() + schedule.mandatory_tasks.len());
    let ids = schedule
        .tasks
        .iter()
        .map(|task| task.id)
        .chain(schedule.mandatory_tasks.iter().map(|task| task.id));
    for id in ids {
        if !seen_ids.insert(id) {
            return Err(TaskValidationError::new(format!("duplicate task id {id}")));
        }
    }

    let max = schedule.max_weekly_frequency();
    for task in &schedule.tasks {
        if task.weekly_frequency == 0 || task.weekly_frequency > max {
            return Err(TaskValidationError::new(format!(
                "task {} has weekly frequency {} (must be between 1 and {})",
                task.id, task.weekly_frequency, max
            )));
        }
    }

    for task in &schedule.mandatory_tasks {
        schedule::check_mandatory_times(task).map_err(|err| {
            TaskValidationError::new(format!("mandatory task {}: {}", task.id, err))
        })?;
    }

    Ok(())
}
