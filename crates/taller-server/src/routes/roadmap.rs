use axum::extract::{Path, Query, State};
use axum::Json;

use taller_core::roadmap::{
    self, DeliverableUpdate, NewDeliverable, NewStage, RoadmapDeliverable, RoadmapStage,
};
use taller_core::types::WorkStatus;

use crate::error::AppError;
use crate::state::AppState;

fn deliverable_json(deliverable: &RoadmapDeliverable) -> serde_json::Value {
    serde_json::json!({
        "id": deliverable.id,
        "stage_id": deliverable.stage_id,
        "name": deliverable.name,
        "description": deliverable.description,
        "status": deliverable.status.to_string(),
        "sort_order": deliverable.sort_order,
        "created_at": deliverable.created_at,
    })
}

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

/// GET /api/roadmap/stages — stages in board order with derived completion.
pub async fn list_stages(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let stages = RoadmapStage::list(&root)?;
        let deliverables = RoadmapDeliverable::list(&root, None)?;
        let list: Vec<serde_json::Value> = stages
            .iter()
            .map(|s| {
                let owned: Vec<RoadmapDeliverable> = deliverables
                    .iter()
                    .filter(|d| d.stage_id == s.id)
                    .cloned()
                    .collect();
                serde_json::json!({
                    "id": s.id,
                    "name": s.name,
                    "description": s.description,
                    "color": s.color,
                    "sort_order": s.sort_order,
                    "deliverable_count": owned.len(),
                    "percent": roadmap::stage_progress(&owned),
                    "created_at": s.created_at,
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
pub struct CreateStageBody {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub sort_order: Option<i32>,
}

/// POST /api/roadmap/stages
pub async fn create_stage(
    State(app): State<AppState>,
    Json(body): Json<CreateStageBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let stage = RoadmapStage::create(
            &root,
            NewStage {
                name: body.name,
                description: body.description,
                color: body.color,
                sort_order: body.sort_order,
            },
        )?;
        Ok::<_, taller_core::TallerError>(serde_json::json!({
            "id": stage.id,
            "name": stage.name,
            "color": stage.color,
            "sort_order": stage.sort_order,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// DELETE /api/roadmap/stages/:id — cascades to the stage's deliverables.
pub async fn delete_stage(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let removed = tokio::task::spawn_blocking(move || RoadmapStage::delete(&root, &id))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::json!({ "deliverables_removed": removed })))
}

// ---------------------------------------------------------------------------
// Deliverables
// ---------------------------------------------------------------------------

#[derive(serde::Deserialize)]
pub struct ListDeliverablesQuery {
    #[serde(default)]
    pub stage_id: Option<String>,
}

/// GET /api/roadmap/deliverables — optionally restricted to one stage.
pub async fn list_deliverables(
    State(app): State<AppState>,
    Query(query): Query<ListDeliverablesQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let deliverables = RoadmapDeliverable::list(&root, query.stage_id.as_deref())?;
        let list: Vec<serde_json::Value> = deliverables.iter().map(deliverable_json).collect();
        Ok::<_, taller_core::TallerError>(serde_json::json!(list))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct CreateDeliverableBody {
    pub stage_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sort_order: Option<i32>,
}

/// POST /api/roadmap/deliverables — fails with 404 if the stage is gone.
pub async fn create_deliverable(
    State(app): State<AppState>,
    Json(body): Json<CreateDeliverableBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let deliverable = RoadmapDeliverable::create(
            &root,
            NewDeliverable {
                stage_id: body.stage_id,
                name: body.name,
                description: body.description,
                sort_order: body.sort_order,
            },
        )?;
        Ok::<_, taller_core::TallerError>(deliverable_json(&deliverable))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct UpdateDeliverableBody {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "taller_core::types::patch_field")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub sort_order: Option<i32>,
}

/// PATCH /api/roadmap/deliverables/:id — status changes by direct
/// selection (deliverables are never dragged).
pub async fn update_deliverable(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateDeliverableBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let status: Option<WorkStatus> = body.status.as_deref().map(str::parse).transpose()?;
    let patch = DeliverableUpdate {
        name: body.name,
        description: body.description,
        status,
        sort_order: body.sort_order,
    };

    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let deliverable = RoadmapDeliverable::update(&root, &id, patch)?;
        Ok::<_, taller_core::TallerError>(deliverable_json(&deliverable))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
