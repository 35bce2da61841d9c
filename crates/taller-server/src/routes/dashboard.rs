use axum::extract::{Query, State};
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct DashboardQuery {
    /// Cap for the attention and recent lists.
    #[serde(default)]
    pub limit: Option<usize>,
}

const DEFAULT_LIMIT: usize = 5;

/// GET /api/dashboard — full recomputation over the record store; nothing
/// here is cached between calls.
pub async fn get_dashboard(
    State(app): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);

    let root = app.root.clone();
    let stats = tokio::task::spawn_blocking(move || taller_core::stats::compute(&root, limit))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::to_value(stats)?))
}
