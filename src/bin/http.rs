#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::sync::Arc;

    use chrono::Utc;
    use weekplan::{AppConfig, MasterSchedule, http_api, logging};

    let config = AppConfig::from_env();
    logging::init_tracing(&config.log_filter);
    let addr = config.socket_addr()?;

    let state = match config.open_store()? {
        Some(store) => {
            let saved = store.load_schedule()?;
            let working = saved
                .clone()
                .unwrap_or_else(|| MasterSchedule::new("My Schedule", Utc::now()));
            tracing::info!(
                store = ?config.store_path,
                loaded = saved.is_some(),
                "using schedule store"
            );
            http_api::AppState::with_store(working, saved, Arc::from(store))
        }
        None => {
            tracing::warn!("WEEKPLAN_STORE not set, schedule will not be persisted");
            http_api::AppState::new(MasterSchedule::new("My Schedule", Utc::now()))
        }
    };

    http_api::serve(addr, state).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
