use axum::extract::{Path, State};
use axum::Json;

use taller_core::checklist::{self, ChecklistItem, ChecklistUpdate, NewChecklistItem};
use taller_core::types::WorkStatus;

use crate::error::AppError;
use crate::state::AppState;

fn item_json(item: &ChecklistItem) -> serde_json::Value {
    serde_json::json!({
        "id": item.id,
        "area": item.area,
        "item": item.item,
        "status": item.status.to_string(),
        "created_at": item.created_at,
    })
}

/// GET /api/checklist — items grouped by area label.
pub async fn list_checklist(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let groups = checklist::group_by_area(ChecklistItem::list(&root)?);
        let list: Vec<serde_json::Value> = groups
            .iter()
            .map(|(area, items)| {
                serde_json::json!({
                    "area": area,
                    "items": items.iter().map(item_json).collect::<Vec<_>>(),
                })
            })
            .collect();
        Ok::<_, taller_core::TallerError>(serde_json::json!(list))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct CreateChecklistBody {
    pub area: String,
    pub item: String,
}

/// POST /api/checklist — a new area label spontaneously creates a group.
pub async fn create_checklist_item(
    State(app): State<AppState>,
    Json(body): Json<CreateChecklistBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let item = ChecklistItem::create(
            &root,
            NewChecklistItem {
                area: body.area,
                item: body.item,
            },
        )?;
        Ok::<_, taller_core::TallerError>(item_json(&item))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct UpdateChecklistBody {
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub item: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// PATCH /api/checklist/:id
pub async fn update_checklist_item(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateChecklistBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let status: Option<WorkStatus> = body.status.as_deref().map(str::parse).transpose()?;
    let patch = ChecklistUpdate {
        area: body.area,
        item: body.item,
        status,
    };

    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let item = ChecklistItem::update(&root, &id, patch)?;
        Ok::<_, taller_core::TallerError>(item_json(&item))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
