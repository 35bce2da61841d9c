use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use taller_core::objective::{
    self, NewObjective, Objective, ObjectiveFilter, ObjectiveUpdate,
};
use taller_core::types::Period;

use crate::error::AppError;
use crate::state::AppState;

fn objective_json(objective: &Objective) -> serde_json::Value {
    serde_json::json!({
        "id": objective.id,
        "service": objective.service,
        "target_value": objective.target_value,
        "target_numeric": objective.target_numeric,
        "period": objective.period.to_string(),
        "current_progress": objective.current_progress,
        // Derived on every read, never stored.
        "percent": objective.progress_percent(),
        "active": objective.active,
        "business_line": objective.business_line,
        "location": objective.location,
        "created_at": objective.created_at,
    })
}

// ---------------------------------------------------------------------------
// List / create
// ---------------------------------------------------------------------------

#[derive(serde::Deserialize)]
pub struct ListObjectivesQuery {
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub period: Option<String>,
    #[serde(default)]
    pub q: Option<String>,
}

/// GET /api/objectives — filtered objective list, newest first.
pub async fn list_objectives(
    State(app): State<AppState>,
    Query(query): Query<ListObjectivesQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let filter = ObjectiveFilter {
        active: query.active,
        period: query.period.as_deref().map(str::parse).transpose()?,
        search: query.q,
    };

    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let objectives = Objective::list(&root, &filter)?;
        let list: Vec<serde_json::Value> = objectives.iter().map(objective_json).collect();
        Ok::<_, taller_core::TallerError>(serde_json::json!(list))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct CreateObjectiveBody {
    pub service: String,
    #[serde(default)]
    pub target_value: Option<String>,
    #[serde(default)]
    pub target_numeric: Option<i64>,
    #[serde(default)]
    pub period: Option<String>,
    #[serde(default)]
    pub business_line: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

/// POST /api/objectives — create an objective with progress 0.
pub async fn create_objective(
    State(app): State<AppState>,
    Json(body): Json<CreateObjectiveBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let period: Option<Period> = body.period.as_deref().map(str::parse).transpose()?;

    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let objective = Objective::create(
            &root,
            NewObjective {
                service: body.service,
                target_value: body.target_value.unwrap_or_default(),
                target_numeric: body.target_numeric,
                period,
                business_line: body.business_line,
                location: body.location,
            },
        )?;
        Ok::<_, taller_core::TallerError>(objective_json(&objective))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

// ---------------------------------------------------------------------------
// Update / delete / bulk
// ---------------------------------------------------------------------------

#[derive(serde::Deserialize)]
pub struct UpdateObjectiveBody {
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub target_value: Option<String>,
    #[serde(default, deserialize_with = "taller_core::types::patch_field")]
    pub target_numeric: Option<Option<i64>>,
    #[serde(default)]
    pub period: Option<String>,
    #[serde(default)]
    pub current_progress: Option<i64>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default, deserialize_with = "taller_core::types::patch_field")]
    pub business_line: Option<Option<String>>,
    #[serde(default, deserialize_with = "taller_core::types::patch_field")]
    pub location: Option<Option<String>>,
}

/// PATCH /api/objectives/:id — update any subset of fields; progress is a
/// direct numeric entry.
pub async fn update_objective(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateObjectiveBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let period: Option<Period> = body.period.as_deref().map(str::parse).transpose()?;
    let patch = ObjectiveUpdate {
        service: body.service,
        target_value: body.target_value,
        target_numeric: body.target_numeric,
        period,
        current_progress: body.current_progress,
        active: body.active,
        business_line: body.business_line,
        location: body.location,
    };

    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let objective = Objective::update(&root, &id, patch)?;
        Ok::<_, taller_core::TallerError>(objective_json(&objective))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// DELETE /api/objectives/:id
pub async fn delete_objective(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let root = app.root.clone();
    tokio::task::spawn_blocking(move || Objective::delete(&root, &id))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(StatusCode::NO_CONTENT)
}

#[derive(serde::Deserialize)]
pub struct BulkActiveBody {
    pub ids: Vec<String>,
    pub active: bool,
}

/// POST /api/objectives/bulk/active — toggle the active flag row by row.
pub async fn bulk_active(
    State(app): State<AppState>,
    Json(body): Json<BulkActiveBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let updated = tokio::task::spawn_blocking(move || {
        objective::bulk_set_active(&root, &body.ids, body.active)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))?;

    Ok(Json(serde_json::json!({ "updated": updated })))
}

#[derive(serde::Deserialize)]
pub struct BulkIdsBody {
    pub ids: Vec<String>,
}

/// POST /api/objectives/bulk/delete
pub async fn bulk_delete(
    State(app): State<AppState>,
    Json(body): Json<BulkIdsBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let deleted = tokio::task::spawn_blocking(move || objective::bulk_delete(&root, &body.ids))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))?;

    Ok(Json(serde_json::json!({ "deleted": deleted })))
}
