use crate::change;
use crate::schedule::MasterSchedule;
use crate::validation::{self, ScheduleViolation};
use chrono::{DateTime, Utc};
use serde_json::Error as SerdeJsonError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] SerdeJsonError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("schedule is invalid: {}", join_violations(.0))]
    InvalidSchedule(Vec<ScheduleViolation>),
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("store lock poisoned by a panicked writer")]
    LockPoisoned,
}

fn join_violations(violations: &[ScheduleViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

pub trait ScheduleStore {
    fn save_schedule(&self, schedule: &MasterSchedule) -> PersistenceResult<()>;
    fn load_schedule(&self) -> PersistenceResult<Option<MasterSchedule>>;
}

/// Refuses snapshots that fail validation or break a task invariant.
pub fn ensure_savable(schedule: &MasterSchedule) -> PersistenceResult<()> {
    let violations = validation::validate(schedule);
    if !violations.is_empty() {
        return Err(PersistenceError::InvalidSchedule(violations));
    }
    validation::check_task_invariants(schedule)
        .map_err(|err| PersistenceError::InvalidData(err.to_string()))
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// Nothing meaningful changed; the store was not touched.
    Unchanged,
    /// The stamped snapshot that was written.
    Saved(MasterSchedule),
}

/// Saves `schedule` unless it matches `previous`, stamping `updated_at` with `now`.
pub fn save_if_changed<S>(
    store: &S,
    previous: Option<&MasterSchedule>,
    schedule: &MasterSchedule,
    now: DateTime<Utc>,
) -> PersistenceResult<SaveOutcome>
where
    S: ScheduleStore + ?Sized,
{
    ensure_savable(schedule)?;
    if let Some(previous) = previous {
        let changed = change::changed_fields(previous, schedule);
        if changed.is_empty() {
            tracing::debug!(schedule_id = %schedule.id, "schedule unchanged, skipping save");
            return Ok(SaveOutcome::Unchanged);
        }
        tracing::debug!(schedule_id = %schedule.id, ?changed, "schedule changed");
    }
    let stamped = schedule.clone().touched(now);
    store.save_schedule(&stamped)?;
    tracing::info!(schedule_id = %stamped.id, name = %stamped.name, "schedule saved");
    Ok(SaveOutcome::Saved(stamped))
}

pub mod file;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::JsonFileStore;
