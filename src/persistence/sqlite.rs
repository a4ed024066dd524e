use super::{PersistenceError, PersistenceResult, ScheduleStore};
use crate::schedule::MasterSchedule;
use rusqlite::{Connection, OptionalExtension, params};
use std::sync::Mutex;

/// Stores the master schedule as a single JSON row.
pub struct SqliteScheduleStore {
    connection: Mutex<Connection>,
}

impl SqliteScheduleStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> PersistenceResult<Self> {
        let connection = Connection::open(path)?;
        Self::from_connection(connection)
    }

    pub fn in_memory() -> PersistenceResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(connection: Connection) -> PersistenceResult<Self> {
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS master_schedule (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                schedule_id TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                schedule_json TEXT NOT NULL
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    fn lock(&self) -> PersistenceResult<std::sync::MutexGuard<'_, Connection>> {
        self.connection
            .lock()
            .map_err(|_| PersistenceError::LockPoisoned)
    }
}

impl ScheduleStore for SqliteScheduleStore {
    fn save_schedule(&self, schedule: &MasterSchedule) -> PersistenceResult<()> {
        super::ensure_savable(schedule)?;
        let json = serde_json::to_string(schedule)?;
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM master_schedule", [])?;
        tx.execute(
            "INSERT INTO master_schedule (id, schedule_id, updated_at, schedule_json) VALUES (1, ?1, ?2, ?3)",
            params![
                schedule.id.to_string(),
                schedule.updated_at.to_rfc3339(),
                json
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn load_schedule(&self) -> PersistenceResult<Option<MasterSchedule>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT schedule_json FROM master_schedule WHERE id = 1")?;
        let json: Option<String> = stmt.query_row([], |row| row.get(0)).optional()?;

        let Some(json) = json else {
            return Ok(None);
        };
        let schedule: MasterSchedule = serde_json::from_str(&json)?;
        Ok(Some(schedule))
    }
}
