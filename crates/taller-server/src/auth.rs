//! Admin-identity gate. Sessions and credentials are owned by the auth
//! layer in front of this service; by the time a request reaches us it
//! carries the caller's user id in `x-user-id`. This middleware only
//! checks that the id resolves to an admin in the user directory — the
//! core below it never sees a non-admin call.

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::state::AppState;

pub const USER_HEADER: &str = "x-user-id";

/// Identity of the authenticated admin, inserted as a request extension
/// for handlers that need the caller (e.g. per-user preferences).
#[derive(Debug, Clone)]
pub struct AdminUser(pub String);

/// Auth flow (evaluated in order):
/// 1. No `x-user-id` header → 401
/// 2. Id not in the directory, or not an admin → 403
/// 3. Otherwise → insert `AdminUser` and pass through
pub async fn admin_gate(State(app): State<AppState>, mut req: Request, next: Next) -> Response {
    let Some(user_id) = req
        .headers()
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
    else {
        return error_response(StatusCode::UNAUTHORIZED, "missing admin identity");
    };

    let root = app.root.clone();
    let lookup = {
        let user_id = user_id.clone();
        tokio::task::spawn_blocking(move || {
            taller_core::directory::Directory::load(&root).map(|d| d.is_admin(&user_id))
        })
        .await
    };

    match lookup {
        Ok(Ok(true)) => {
            req.extensions_mut().insert(AdminUser(user_id));
            next.run(req).await
        }
        Ok(Ok(false)) => error_response(StatusCode::FORBIDDEN, "admin role required"),
        Ok(Err(e)) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
        Err(e) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            &format!("task join error: {e}"),
        ),
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    let body = serde_json::json!({ "error": message });
    (status, axum::Json(body)).into_response()
}
