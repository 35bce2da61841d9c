use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use taller_core::TallerError;

// ---------------------------------------------------------------------------
// AppError — unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if let Some(e) = self.0.downcast_ref::<TallerError>() {
            match e {
                TallerError::TaskNotFound(_)
                | TallerError::ObjectiveNotFound(_)
                | TallerError::StageNotFound(_)
                | TallerError::DeliverableNotFound(_)
                | TallerError::ChecklistItemNotFound(_) => StatusCode::NOT_FOUND,
                TallerError::Validation(_)
                | TallerError::InvalidStatus(_)
                | TallerError::InvalidPriority(_)
                | TallerError::InvalidPeriod(_)
                | TallerError::InvalidId(_) => StatusCode::BAD_REQUEST,
                TallerError::Io(_) | TallerError::Yaml(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
