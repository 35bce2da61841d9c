pub mod auth;
pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{delete, get, patch, post, put};
use axum::Router;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(root: PathBuf) -> Router {
    let app_state = state::AppState::new(root);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Tasks
        .route("/api/tasks", get(routes::tasks::list_tasks))
        .route("/api/tasks", post(routes::tasks::create_task))
        .route("/api/tasks/stats", get(routes::tasks::task_stats))
        .route("/api/tasks/bulk/status", post(routes::tasks::bulk_status))
        .route("/api/tasks/bulk/delete", post(routes::tasks::bulk_delete))
        .route("/api/tasks/{id}", patch(routes::tasks::update_task))
        .route("/api/tasks/{id}", delete(routes::tasks::delete_task))
        // Objectives
        .route("/api/objectives", get(routes::objectives::list_objectives))
        .route("/api/objectives", post(routes::objectives::create_objective))
        .route(
            "/api/objectives/bulk/active",
            post(routes::objectives::bulk_active),
        )
        .route(
            "/api/objectives/bulk/delete",
            post(routes::objectives::bulk_delete),
        )
        .route(
            "/api/objectives/{id}",
            patch(routes::objectives::update_objective),
        )
        .route(
            "/api/objectives/{id}",
            delete(routes::objectives::delete_objective),
        )
        // Roadmap
        .route("/api/roadmap/stages", get(routes::roadmap::list_stages))
        .route("/api/roadmap/stages", post(routes::roadmap::create_stage))
        .route(
            "/api/roadmap/stages/{id}",
            delete(routes::roadmap::delete_stage),
        )
        .route(
            "/api/roadmap/deliverables",
            get(routes::roadmap::list_deliverables),
        )
        .route(
            "/api/roadmap/deliverables",
            post(routes::roadmap::create_deliverable),
        )
        .route(
            "/api/roadmap/deliverables/{id}",
            patch(routes::roadmap::update_deliverable),
        )
        // Checklist
        .route("/api/checklist", get(routes::checklist::list_checklist))
        .route(
            "/api/checklist",
            post(routes::checklist::create_checklist_item),
        )
        .route(
            "/api/checklist/{id}",
            patch(routes::checklist::update_checklist_item),
        )
        // Dashboard
        .route("/api/dashboard", get(routes::dashboard::get_dashboard))
        // Per-session UI preferences
        .route("/api/prefs", get(routes::prefs::get_prefs))
        .route("/api/prefs", put(routes::prefs::put_prefs))
        .layer(axum::middleware::from_fn_with_state(
            app_state.clone(),
            auth::admin_gate,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Start the admin console API server.
pub async fn serve(root: PathBuf, port: u16) -> anyhow::Result<()> {
    let app = build_router(root);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("taller admin API listening on http://localhost:{port}");

    axum::serve(listener, app).await?;
    Ok(())
}
