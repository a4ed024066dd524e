use crate::calendar::Day;
use crate::time::TaskDuration;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub type TaskId = Uuid;

pub const DEFAULT_TASK_COLOR: &str = "#3B82F6";
pub const DEFAULT_MANDATORY_COLOR: &str = "#EF4444";

/// Display palette offered when picking a task colour.
pub const DEFAULT_COLORS: [&str; 8] = [
    "#3B82F6", // blue
    "#EF4444", // red
    "#10B981", // green
    "#F59E0B", // yellow
    "#8B5CF6", // purple
    "#F97316", // orange
    "#06B6D4", // cyan
    "#84CC16", // lime
];

pub fn random_color() -> &'static str {
    let idx = rand::rng().random_range(0..DEFAULT_COLORS.len());
    DEFAULT_COLORS[idx]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl TimeOfDay {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::Afternoon => "afternoon",
            TimeOfDay::Evening => "evening",
            TimeOfDay::Night => "night",
        }
    }
}

impl FromStr for TimeOfDay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "morning" => Ok(TimeOfDay::Morning),
            "afternoon" => Ok(TimeOfDay::Afternoon),
            "evening" => Ok(TimeOfDay::Evening),
            "night" => Ok(TimeOfDay::Night),
            other => Err(format!("unknown time of day '{other}'")),
        }
    }
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!("unknown priority '{other}'")),
        }
    }
}

/// A recurring task with a weekly target but no fixed time slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlexibleTask {
    pub id: TaskId,
    pub summary: String,
    pub duration: TaskDuration,
    #[serde(rename = "onWeekends", alias = "includeOnWeekends")]
    pub include_on_weekends: bool,
    #[serde(
        rename = "preferredTime",
        alias = "preferredTimeOfDay",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub preferred_time: Option<TimeOfDay>,
    /// Target occurrences per week; at most the owning schedule's active day count.
    #[serde(rename = "frequency", alias = "weeklyFrequency")]
    pub weekly_frequency: u32,
    #[serde(alias = "colorTag", default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl FlexibleTask {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            summary: String::new(),
            duration: TaskDuration::default(),
            include_on_weekends: false,
            preferred_time: None,
            weekly_frequency: 1,
            color: Some(DEFAULT_TASK_COLOR.to_string()),
            priority: Some(Priority::Medium),
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_duration(mut self, duration: TaskDuration) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_weekends(mut self, include_on_weekends: bool) -> Self {
        self.include_on_weekends = include_on_weekends;
        self
    }

    pub fn with_preferred_time(mut self, preferred_time: Option<TimeOfDay>) -> Self {
        self.preferred_time = preferred_time;
        self
    }

    pub fn with_frequency(mut self, weekly_frequency: u32) -> Self {
        self.weekly_frequency = weekly_frequency;
        self
    }

    pub fn with_color(mut self, color: Option<String>) -> Self {
        self.color = color;
        self
    }

    pub fn with_priority(mut self, priority: Option<Priority>) -> Self {
        self.priority = priority;
        self
    }

    /// Whether the task is shown on `day` in a day projection.
    pub fn applies_on(&self, day: Day) -> bool {
        !day.is_weekend() || self.include_on_weekends
    }

    pub fn apply(&self, patch: &FlexibleTaskPatch) -> Self {
        let mut next = self.clone();
        if let Some(summary) = &patch.summary {
            next.summary = summary.clone();
        }
        if let Some(duration) = patch.duration {
            next.duration = duration;
        }
        if let Some(on_weekends) = patch.include_on_weekends {
            next.include_on_weekends = on_weekends;
        }
        if let Some(preferred) = patch.preferred_time {
            next.preferred_time = preferred;
        }
        if let Some(frequency) = patch.weekly_frequency {
            next.weekly_frequency = frequency;
        }
        if let Some(color) = &patch.color {
            next.color = color.clone();
        }
        if let Some(priority) = patch.priority {
            next.priority = priority;
        }
        next
    }
}

impl Default for FlexibleTask {
    fn default() -> Self {
        Self::new()
    }
}

pub fn new_flexible_task() -> FlexibleTask {
    FlexibleTask::new()
}

/// Partial update for a [`FlexibleTask`]. Absent fields are left untouched;
/// nested `Option`s distinguish "clear" (`Some(None)`) from "keep" (`None`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlexibleTaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<TaskDuration>,
    #[serde(
        rename = "onWeekends",
        alias = "includeOnWeekends",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub include_on_weekends: Option<bool>,
    #[serde(
        rename = "preferredTime",
        alias = "preferredTimeOfDay",
        default,
        with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub preferred_time: Option<Option<TimeOfDay>>,
    #[serde(
        rename = "frequency",
        alias = "weeklyFrequency",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub weekly_frequency: Option<u32>,
    #[serde(
        alias = "colorTag",
        default,
        with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub color: Option<Option<String>>,
    #[serde(default, with = "double_option", skip_serializing_if = "Option::is_none")]
    pub priority: Option<Option<Priority>>,
}

/// A fixed-time commitment recurring over an inclusive, possibly wrapping, day range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MandatoryTask {
    pub id: TaskId,
    pub summary: String,
    /// `HH:MM`, strictly before `end_time`.
    pub start_time: String,
    pub end_time: String,
    pub start_day: Day,
    pub end_day: Day,
    #[serde(alias = "colorTag", default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl MandatoryTask {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            summary: String::new(),
            start_time: "09:00".to_string(),
            end_time: "17:00".to_string(),
            start_day: Day::Monday,
            end_day: Day::Friday,
            color: Some(DEFAULT_MANDATORY_COLOR.to_string()),
            location: None,
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_times(mut self, start_time: impl Into<String>, end_time: impl Into<String>) -> Self {
        self.start_time = start_time.into();
        self.end_time = end_time.into();
        self
    }

    pub fn with_days(mut self, start_day: Day, end_day: Day) -> Self {
        self.start_day = start_day;
        self.end_day = end_day;
        self
    }

    pub fn with_color(mut self, color: Option<String>) -> Self {
        self.color = color;
        self
    }

    pub fn with_location(mut self, location: Option<String>) -> Self {
        self.location = location;
        self
    }

    pub fn applies_on(&self, day: Day) -> bool {
        day.in_range(self.start_day, self.end_day)
    }

    pub fn apply(&self, patch: &MandatoryTaskPatch) -> Self {
        let mut next = self.clone();
        if let Some(summary) = &patch.summary {
            next.summary = summary.clone();
        }
        if let Some(start_time) = &patch.start_time {
            next.start_time = start_time.clone();
        }
        if let Some(end_time) = &patch.end_time {
            next.end_time = end_time.clone();
        }
        if let Some(start_day) = patch.start_day {
            next.start_day = start_day;
        }
        if let Some(end_day) = patch.end_day {
            next.end_day = end_day;
        }
        if let Some(color) = &patch.color {
            next.color = color.clone();
        }
        if let Some(location) = &patch.location {
            next.location = location.clone();
        }
        next
    }
}

impl Default for MandatoryTask {
    fn default() -> Self {
        Self::new()
    }
}

pub fn new_mandatory_task() -> MandatoryTask {
    MandatoryTask::new()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MandatoryTaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_day: Option<Day>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_day: Option<Day>,
    #[serde(default, with = "double_option", skip_serializing_if = "Option::is_none")]
    pub color: Option<Option<String>>,
    #[serde(default, with = "double_option", skip_serializing_if = "Option::is_none")]
    pub location: Option<Option<String>>,
}

/// Either kind of task, for consumers that render both side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleItem<'a> {
    Flexible(&'a FlexibleTask),
    Mandatory(&'a MandatoryTask),
}

impl<'a> ScheduleItem<'a> {
    pub fn id(&self) -> TaskId {
        match self {
            ScheduleItem::Flexible(task) => task.id,
            ScheduleItem::Mandatory(task) => task.id,
        }
    }

    pub fn summary(&self) -> &'a str {
        match self {
            ScheduleItem::Flexible(task) => &task.summary,
            ScheduleItem::Mandatory(task) => &task.summary,
        }
    }

    pub fn color(&self) -> Option<&'a str> {
        match self {
            ScheduleItem::Flexible(task) => task.color.as_deref(),
            ScheduleItem::Mandatory(task) => task.color.as_deref(),
        }
    }

    pub fn is_mandatory(&self) -> bool {
        matches!(self, ScheduleItem::Mandatory(_))
    }
}

impl fmt::Display for ScheduleItem<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleItem::Flexible(task) => {
                write!(f, "{} ({}", task.summary, task.duration)?;
                if let Some(preferred) = task.preferred_time {
                    write!(f, ", {}", preferred.as_str())?;
                }
                if let Some(priority) = task.priority {
                    write!(f, ", {} priority", priority.as_str())?;
                }
                write!(f, ", {}x/week)", task.weekly_frequency)
            }
            ScheduleItem::Mandatory(task) => {
                write!(f, "{} {}-{}", task.summary, task.start_time, task.end_time)?;
                if let Some(location) = &task.location {
                    write!(f, " @ {location}")?;
                }
                Ok(())
            }
        }
    }
}

/// Serde helper keeping `null` distinct from an absent field in patches.
mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<T, S>(value: &Option<Option<T>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}
