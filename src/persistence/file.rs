use super::{PersistenceResult, ScheduleStore};
use crate::schedule::MasterSchedule;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

/// Keeps the master schedule as a pretty-printed JSON document.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScheduleStore for JsonFileStore {
    fn save_schedule(&self, schedule: &MasterSchedule) -> PersistenceResult<()> {
        super::ensure_savable(schedule)?;
        save_schedule_to_json(schedule, &self.path)
    }

    fn load_schedule(&self) -> PersistenceResult<Option<MasterSchedule>> {
        match load_schedule_from_json(&self.path) {
            Ok(schedule) => Ok(Some(schedule)),
            Err(super::PersistenceError::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}

pub fn save_schedule_to_json<P: AsRef<Path>>(
    schedule: &MasterSchedule,
    path: P,
) -> PersistenceResult<()> {
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, schedule)?;
    Ok(())
}

pub fn load_schedule_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<MasterSchedule> {
    let file = File::open(path.as_ref())?;
    let schedule: MasterSchedule = serde_json::from_reader(file)?;
    tracing::debug!(path = %path.as_ref().display(), schedule_id = %schedule.id, "schedule loaded");
    Ok(schedule)
}
