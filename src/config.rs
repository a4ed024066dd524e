use crate::persistence::{JsonFileStore, PersistenceResult, ScheduleStore};
use std::env;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Runtime settings for the binaries.
///
/// Reads `WEEKPLAN_HTTP_ADDR`, `WEEKPLAN_STORE` and `WEEKPLAN_LOG` from the
/// environment, falling back to the defaults below when unset.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP API binds to.
    pub http_addr: String,
    /// Where the master schedule is persisted, if anywhere.
    pub store_path: Option<PathBuf>,
    /// `tracing_subscriber::EnvFilter` directive.
    pub log_filter: String,
}

impl AppConfig {
    pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:3000";
    pub const DEFAULT_LOG_FILTER: &str = "info";

    pub fn from_env() -> Self {
        let http_addr =
            env::var("WEEKPLAN_HTTP_ADDR").unwrap_or_else(|_| Self::DEFAULT_HTTP_ADDR.to_owned());
        let store_path = env::var_os("WEEKPLAN_STORE")
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        let log_filter =
            env::var("WEEKPLAN_LOG").unwrap_or_else(|_| Self::DEFAULT_LOG_FILTER.to_owned());
        Self {
            http_addr,
            store_path,
            log_filter,
        }
    }

    pub fn new(http_addr: impl Into<String>, store_path: Option<PathBuf>) -> Self {
        Self {
            http_addr: http_addr.into(),
            store_path,
            log_filter: Self::DEFAULT_LOG_FILTER.to_owned(),
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.http_addr.parse()
    }

    /// Opens the configured store. `.db`/`.sqlite` paths use SQLite when the
    /// `sqlite` feature is on; everything else is a JSON file.
    pub fn open_store(&self) -> PersistenceResult<Option<Box<dyn ScheduleStore + Send + Sync>>> {
        let Some(path) = &self.store_path else {
            return Ok(None);
        };
        open_store_at(path).map(Some)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

fn is_sqlite_path(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("db" | "sqlite" | "sqlite3")
    )
}

pub fn open_store_at(path: &Path) -> PersistenceResult<Box<dyn ScheduleStore + Send + Sync>> {
    if is_sqlite_path(path) {
        return open_sqlite_store(path);
    }
    Ok(Box::new(JsonFileStore::new(path)))
}

#[cfg(feature = "sqlite")]
fn open_sqlite_store(path: &Path) -> PersistenceResult<Box<dyn ScheduleStore + Send + Sync>> {
    let store = crate::persistence::sqlite::SqliteScheduleStore::new(path)?;
    Ok(Box::new(store))
}

#[cfg(not(feature = "sqlite"))]
fn open_sqlite_store(path: &Path) -> PersistenceResult<Box<dyn ScheduleStore + Send + Sync>> {
    tracing::warn!(path = %path.display(), "sqlite feature disabled, storing as JSON");
    Ok(Box::new(JsonFileStore::new(path)))
}
