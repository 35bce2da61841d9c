use axum::extract::State;
use axum::{Extension, Json};

use taller_core::prefs::SessionPrefs;

use crate::auth::AdminUser;
use crate::error::AppError;
use crate::state::AppState;

/// GET /api/prefs — the caller's UI preferences, defaults if never saved.
pub async fn get_prefs(
    State(app): State<AppState>,
    Extension(AdminUser(user_id)): Extension<AdminUser>,
) -> Result<Json<SessionPrefs>, AppError> {
    let root = app.root.clone();
    let prefs = tokio::task::spawn_blocking(move || SessionPrefs::load(&root, &user_id))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(prefs))
}

/// PUT /api/prefs — persist the caller's UI preferences.
pub async fn put_prefs(
    State(app): State<AppState>,
    Extension(AdminUser(user_id)): Extension<AdminUser>,
    Json(prefs): Json<SessionPrefs>,
) -> Result<Json<SessionPrefs>, AppError> {
    let root = app.root.clone();
    let prefs = tokio::task::spawn_blocking(move || {
        prefs.save(&root, &user_id)?;
        Ok::<_, taller_core::TallerError>(prefs)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(prefs))
}
