use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;

use taller_core::directory::Directory;
use taller_core::task::{self, AssigneeFilter, NewTask, Task, TaskFilter, TaskUpdate};
use taller_core::types::{Priority, TaskStatus};

use crate::error::AppError;
use crate::state::AppState;

fn task_json(task: &Task, directory: &Directory) -> serde_json::Value {
    let assignee = directory.resolve(task.assigned_to.as_deref());
    serde_json::json!({
        "id": task.id,
        "title": task.title,
        "description": task.description,
        "status": task.status.to_string(),
        "priority": task.priority.to_string(),
        "assigned_to": task.assigned_to,
        "assignee": assignee,
        "due_date": task.due_date,
        "created_at": task.created_at,
    })
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[derive(serde::Deserialize)]
pub struct ListTasksQuery {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    /// User id, or the literal `sin_asignar` for unassigned tasks.
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub q: Option<String>,
}

/// GET /api/tasks — filtered task list, newest first.
pub async fn list_tasks(
    State(app): State<AppState>,
    Query(query): Query<ListTasksQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let filter = TaskFilter {
        status: query.status.as_deref().map(str::parse).transpose()?,
        priority: query.priority.as_deref().map(str::parse).transpose()?,
        assignee: query.assignee.as_deref().map(AssigneeFilter::parse),
        search: query.q,
    };

    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let directory = Directory::load(&root)?;
        let tasks = Task::list(&root, &filter)?;
        let list: Vec<serde_json::Value> =
            tasks.iter().map(|t| task_json(t, &directory)).collect();
        Ok::<_, taller_core::TallerError>(serde_json::json!(list))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[derive(serde::Deserialize)]
pub struct CreateTaskBody {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

/// POST /api/tasks — create a task; status starts at `pendiente`.
pub async fn create_task(
    State(app): State<AppState>,
    Json(body): Json<CreateTaskBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let priority: Option<Priority> = body.priority.as_deref().map(str::parse).transpose()?;

    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let task = Task::create(
            &root,
            NewTask {
                title: body.title,
                description: body.description,
                priority,
                assigned_to: body.assigned_to,
                due_date: body.due_date,
            },
        )?;
        let directory = Directory::load(&root)?;
        Ok::<_, taller_core::TallerError>(task_json(&task, &directory))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[derive(serde::Deserialize)]
pub struct UpdateTaskBody {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "taller_core::types::patch_field")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "taller_core::types::patch_field")]
    pub assigned_to: Option<Option<String>>,
    #[serde(default, deserialize_with = "taller_core::types::patch_field")]
    pub due_date: Option<Option<NaiveDate>>,
}

/// PATCH /api/tasks/:id — update any subset of fields. Absent fields are
/// left unchanged; explicit nulls clear the nullable fields.
pub async fn update_task(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateTaskBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let status: Option<TaskStatus> = body.status.as_deref().map(str::parse).transpose()?;
    let priority: Option<Priority> = body.priority.as_deref().map(str::parse).transpose()?;
    let patch = TaskUpdate {
        title: body.title,
        description: body.description,
        status,
        priority,
        assigned_to: body.assigned_to,
        due_date: body.due_date,
    };

    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let task = Task::update(&root, &id, patch)?;
        let directory = Directory::load(&root)?;
        Ok::<_, taller_core::TallerError>(task_json(&task, &directory))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

// ---------------------------------------------------------------------------
// Delete / bulk
// ---------------------------------------------------------------------------

/// DELETE /api/tasks/:id — hard delete.
pub async fn delete_task(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let root = app.root.clone();
    tokio::task::spawn_blocking(move || Task::delete(&root, &id))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(StatusCode::NO_CONTENT)
}

#[derive(serde::Deserialize)]
pub struct BulkStatusBody {
    pub ids: Vec<String>,
    pub status: String,
}

/// POST /api/tasks/bulk/status — independent per-row updates; responds
/// with the success count only.
pub async fn bulk_status(
    State(app): State<AppState>,
    Json(body): Json<BulkStatusBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let status: TaskStatus = body.status.parse()?;

    let root = app.root.clone();
    let updated =
        tokio::task::spawn_blocking(move || task::bulk_update_status(&root, &body.ids, status))
            .await
            .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))?;

    Ok(Json(serde_json::json!({ "updated": updated })))
}

#[derive(serde::Deserialize)]
pub struct BulkIdsBody {
    pub ids: Vec<String>,
}

/// POST /api/tasks/bulk/delete — independent per-row deletes.
pub async fn bulk_delete(
    State(app): State<AppState>,
    Json(body): Json<BulkIdsBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let deleted = tokio::task::spawn_blocking(move || task::bulk_delete(&root, &body.ids))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))?;

    Ok(Json(serde_json::json!({ "deleted": deleted })))
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// GET /api/tasks/stats — total and per-status counts.
pub async fn task_stats(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let stats = tokio::task::spawn_blocking(move || taller_core::stats::task_stats(&root))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::to_value(stats)?))
}
