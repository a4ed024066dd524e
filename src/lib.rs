pub mod calendar;
pub mod change;
pub mod config;
pub mod events;
#[cfg(feature = "http_api")]
pub mod http_api;
#[cfg(any(feature = "cli", feature = "http_api"))]
pub mod logging;
pub mod persistence;
pub mod schedule;
pub mod task;
pub mod time;
pub mod validation;

pub use calendar::{Day, DayParseError, DaySelection, describe_active_days, is_day_in_range, is_weekend};
pub use change::{ScheduleField, changed_fields, is_same};
pub use config::AppConfig;
pub use events::{CalendarEvent, EventTime, group_events_by_date};
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteScheduleStore;
pub use persistence::{
    JsonFileStore, PersistenceError, PersistenceResult, SaveOutcome, ScheduleStore,
    save_if_changed,
};
pub use schedule::{DaySchedule, MasterSchedule, ScheduleEditError, project, week_view};
pub use task::{
    FlexibleTask, FlexibleTaskPatch, MandatoryTask, MandatoryTaskPatch, Priority, ScheduleItem,
    TaskId, TimeOfDay, new_flexible_task, new_mandatory_task,
};
pub use time::{ClockTime, TaskDuration, TimeParseError};
pub use validation::{
    ScheduleViolation, TaskValidationError, check_task_invariants, validate, violation_messages,
};
