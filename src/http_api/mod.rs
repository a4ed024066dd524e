use std::{collections::BTreeMap, net::SocketAddr, str::FromStr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use chrono::Utc;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    CalendarEvent, Day, DaySchedule, FlexibleTask, FlexibleTaskPatch, MandatoryTask,
    MandatoryTaskPatch, MasterSchedule, PersistenceError, SaveOutcome, ScheduleEditError,
    ScheduleStore, ScheduleViolation, TaskId, change, group_events_by_date,
    persistence::{self, ensure_savable},
    validate,
};

pub type SharedStore = Arc<dyn ScheduleStore + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    working: Arc<RwLock<MasterSchedule>>,
    saved: Arc<RwLock<Option<MasterSchedule>>>,
    store: Option<SharedStore>,
}

impl AppState {
    /// State for a schedule that has not been persisted yet.
    pub fn new(schedule: MasterSchedule) -> Self {
        Self {
            working: Arc::new(RwLock::new(schedule)),
            saved: Arc::new(RwLock::new(None)),
            store: None,
        }
    }

    /// State backed by a store; `saved` is what the store currently holds.
    pub fn with_store(schedule: MasterSchedule, saved: Option<MasterSchedule>, store: SharedStore) -> Self {
        Self {
            working: Arc::new(RwLock::new(schedule)),
            saved: Arc::new(RwLock::new(saved)),
            store: Some(store),
        }
    }

    pub fn schedule(&self) -> MasterSchedule {
        self.working.read().clone()
    }

    fn edit<F>(&self, mutator: F) -> Result<MasterSchedule, ScheduleEditError>
    where
        F: FnOnce(MasterSchedule) -> Result<MasterSchedule, ScheduleEditError>,
    {
        let mut guard = self.working.write();
        let next = mutator(guard.clone())?;
        *guard = next.clone();
        Ok(next)
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Invalid(String),
    Unprocessable(Vec<ScheduleViolation>),
    Internal(String),
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }

    fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }
}

impl From<ScheduleEditError> for ApiError {
    fn from(value: ScheduleEditError) -> Self {
        match value {
            ScheduleEditError::TaskNotFound(_) => ApiError::not_found(value.to_string()),
            other => ApiError::invalid(other.to_string()),
        }
    }
}

impl From<PersistenceError> for ApiError {
    fn from(value: PersistenceError) -> Self {
        match value {
            PersistenceError::InvalidSchedule(violations) => ApiError::Unprocessable(violations),
            PersistenceError::InvalidData(message) => ApiError::invalid(message),
            other => ApiError::internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::Unprocessable(violations) => {
                let body = Json(json!({
                    "error": "invalid_schedule",
                    "violations": violations,
                }));
                return (StatusCode::UNPROCESSABLE_ENTITY, body).into_response();
            }
            ApiError::Internal(message) => {
                tracing::error!(%message, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SaveResponse {
    Unchanged,
    Saved { schedule: MasterSchedule },
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DayResponse {
    pub day: Day,
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<DaySchedule>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidationResponse {
    pub violations: Vec<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/schedule", get(get_schedule))
        .route("/schedule/save", post(save_schedule))
        .route("/schedule/validate", get(validate_schedule))
        .route("/schedule/days/:day", get(get_day))
        .route("/schedule/tasks", post(create_task))
        .route("/schedule/tasks/:id", patch(update_task).delete(delete_task))
        .route("/schedule/mandatory-tasks", post(create_mandatory_task))
        .route(
            "/schedule/mandatory-tasks/:id",
            patch(update_mandatory_task).delete(delete_mandatory_task),
        )
        .route("/events/grouped", post(group_events))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "weekplan HTTP API listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn get_schedule(State(state): State<AppState>) -> Json<MasterSchedule> {
    Json(state.schedule())
}

async fn save_schedule(
    State(state): State<AppState>,
    Json(schedule): Json<MasterSchedule>,
) -> Result<Json<SaveResponse>, ApiError> {
    let previous = state.saved.read().clone();
    let now = Utc::now();
    let outcome = match &state.store {
        Some(store) => persistence::save_if_changed(store.as_ref(), previous.as_ref(), &schedule, now)?,
        None => {
            ensure_savable(&schedule)?;
            match &previous {
                Some(previous) if change::is_same(previous, &schedule) => SaveOutcome::Unchanged,
                _ => SaveOutcome::Saved(schedule.clone().touched(now)),
            }
        }
    };

    match outcome {
        SaveOutcome::Unchanged => Ok(Json(SaveResponse::Unchanged)),
        SaveOutcome::Saved(stamped) => {
            *state.working.write() = stamped.clone();
            *state.saved.write() = Some(stamped.clone());
            Ok(Json(SaveResponse::Saved { schedule: stamped }))
        }
    }
}

async fn validate_schedule(State(state): State<AppState>) -> Json<ValidationResponse> {
    let violations = validate(&state.schedule())
        .iter()
        .map(ToString::to_string)
        .collect();
    Json(ValidationResponse { violations })
}

async fn get_day(
    State(state): State<AppState>,
    Path(day): Path<String>,
) -> Result<Json<DayResponse>, ApiError> {
    let day = Day::from_str(&day).map_err(|err| ApiError::invalid(err.to_string()))?;
    let schedule = state.schedule().day_schedule(day);
    Ok(Json(DayResponse {
        day,
        active: schedule.is_some(),
        schedule,
    }))
}

fn parse_task_id(raw: &str) -> Result<TaskId, ApiError> {
    TaskId::from_str(raw).map_err(|_| ApiError::invalid(format!("invalid task id '{raw}'")))
}

async fn create_task(
    State(state): State<AppState>,
    Json(patch): Json<FlexibleTaskPatch>,
) -> Result<(StatusCode, Json<FlexibleTask>), ApiError> {
    let task = FlexibleTask::new();
    let id = task.id;
    let schedule = state.edit(|schedule| {
        let schedule = schedule.with_task_added(task);
        if patch == FlexibleTaskPatch::default() {
            return Ok(schedule);
        }
        schedule.with_task_updated(id, &patch)
    })?;
    let created = schedule
        .task(id)
        .cloned()
        .ok_or_else(|| ApiError::internal("task not found after creation"))?;
    tracing::info!(task_id = %id, "flexible task created");
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_task(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Json(patch): Json<FlexibleTaskPatch>,
) -> Result<Json<FlexibleTask>, ApiError> {
    let id = parse_task_id(&raw_id)?;
    let schedule = state.edit(|schedule| schedule.with_task_updated(id, &patch))?;
    let updated = schedule
        .task(id)
        .cloned()
        .ok_or_else(|| ApiError::internal("task not found after update"))?;
    Ok(Json(updated))
}

async fn delete_task(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_task_id(&raw_id)?;
    state.edit(|schedule| schedule.with_task_removed(id))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn create_mandatory_task(
    State(state): State<AppState>,
    Json(patch): Json<MandatoryTaskPatch>,
) -> Result<(StatusCode, Json<MandatoryTask>), ApiError> {
    let task = MandatoryTask::new();
    let id = task.id;
    let schedule = state.edit(|schedule| {
        schedule
            .with_mandatory_task_added(task)
            .with_mandatory_task_updated(id, &patch)
    })?;
    let created = schedule
        .mandatory_task(id)
        .cloned()
        .ok_or_else(|| ApiError::internal("mandatory task not found after creation"))?;
    tracing::info!(task_id = %id, "mandatory task created");
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_mandatory_task(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Json(patch): Json<MandatoryTaskPatch>,
) -> Result<Json<MandatoryTask>, ApiError> {
    let id = parse_task_id(&raw_id)?;
    let schedule = state.edit(|schedule| schedule.with_mandatory_task_updated(id, &patch))?;
    let updated = schedule
        .mandatory_task(id)
        .cloned()
        .ok_or_else(|| ApiError::internal("mandatory task not found after update"))?;
    Ok(Json(updated))
}

async fn delete_mandatory_task(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_task_id(&raw_id)?;
    state.edit(|schedule| schedule.with_mandatory_task_removed(id))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn group_events(
    Json(events): Json<Vec<CalendarEvent>>,
) -> Json<BTreeMap<String, Vec<CalendarEvent>>> {
    Json(group_events_by_date(&events))
}
