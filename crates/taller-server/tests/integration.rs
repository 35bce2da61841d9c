use axum::http::StatusCode;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use taller_core::directory::{Directory, Role, User};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const ADMIN: &str = "u-maria";
const STAFF: &str = "u-carlos";

/// Seed the user directory with one admin and one staff user.
fn seed_directory(dir: &TempDir) {
    let directory = Directory {
        users: vec![
            User {
                id: ADMIN.into(),
                name: "María González".into(),
                email: "maria@tallerpro.mx".into(),
                role: Role::Admin,
            },
            User {
                id: STAFF.into(),
                name: "Carlos Rivera".into(),
                email: "carlos@tallerpro.mx".into(),
                role: Role::Staff,
            },
        ],
    };
    directory.save(dir.path()).unwrap();
}

fn router(dir: &TempDir) -> axum::Router {
    taller_server::build_router(dir.path().to_path_buf())
}

async fn send(
    app: axum::Router,
    method: &str,
    uri: &str,
    user: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = axum::http::Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header("x-user-id", user);
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(axum::body::Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(axum::body::Body::empty()).unwrap(),
    };
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(app, "GET", uri, Some(ADMIN), None).await
}

async fn post(
    app: axum::Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, "POST", uri, Some(ADMIN), Some(body)).await
}

async fn patch(
    app: axum::Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, "PATCH", uri, Some(ADMIN), Some(body)).await
}

async fn delete(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(app, "DELETE", uri, Some(ADMIN), None).await
}

async fn create_task(dir: &TempDir, body: serde_json::Value) -> serde_json::Value {
    let (status, json) = post(router(dir), "/api/tasks", body).await;
    assert_eq!(status, StatusCode::OK);
    json
}

// ---------------------------------------------------------------------------
// Auth boundary
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_identity_is_unauthorized() {
    let dir = TempDir::new().unwrap();
    seed_directory(&dir);

    let (status, json) = send(router(&dir), "GET", "/api/tasks", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn non_admin_is_forbidden() {
    let dir = TempDir::new().unwrap();
    seed_directory(&dir);

    let (status, _) = send(router(&dir), "GET", "/api/tasks", Some(STAFF), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(router(&dir), "GET", "/api/tasks", Some("u-ghost"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[tokio::test]
async fn created_task_starts_pending_and_counts() {
    let dir = TempDir::new().unwrap();
    seed_directory(&dir);

    let task = create_task(
        &dir,
        serde_json::json!({ "title": "Revisar frenos", "priority": "alta" }),
    )
    .await;
    assert_eq!(task["status"], "pendiente");
    assert_eq!(task["priority"], "alta");

    let (status, stats) = get(router(&dir), "/api/tasks/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total"], 1);
    assert_eq!(stats["pendiente"], 1);
    assert_eq!(stats["completado"], 0);
}

#[tokio::test]
async fn empty_title_is_rejected() {
    let dir = TempDir::new().unwrap();
    seed_directory(&dir);

    let (status, json) = post(router(&dir), "/api/tasks", serde_json::json!({ "title": "  " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("title"));
}

#[tokio::test]
async fn unknown_status_is_rejected_before_persisting() {
    let dir = TempDir::new().unwrap();
    seed_directory(&dir);

    let task = create_task(&dir, serde_json::json!({ "title": "Cambiar aceite" })).await;
    let id = task["id"].as_str().unwrap();

    let (status, _) = patch(
        router(&dir),
        &format!("/api/tasks/{id}"),
        serde_json::json!({ "status": "archivado" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // The stored record is untouched.
    let (_, tasks) = get(router(&dir), "/api/tasks").await;
    assert_eq!(tasks[0]["status"], "pendiente");
}

#[tokio::test]
async fn any_status_is_reachable_in_one_update() {
    let dir = TempDir::new().unwrap();
    seed_directory(&dir);

    let task = create_task(&dir, serde_json::json!({ "title": "Diagnóstico" })).await;
    let id = task["id"].as_str().unwrap();

    // Straight from pendiente to completado; no intermediate statuses.
    let (status, json) = patch(
        router(&dir),
        &format!("/api/tasks/{id}"),
        serde_json::json!({ "status": "completado" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "completado");
}

#[tokio::test]
async fn update_missing_task_is_404() {
    let dir = TempDir::new().unwrap();
    seed_directory(&dir);

    let (status, _) = patch(
        router(&dir),
        "/api/tasks/t-missing",
        serde_json::json!({ "status": "completado" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_is_hard_and_idempotence_free() {
    let dir = TempDir::new().unwrap();
    seed_directory(&dir);

    let task = create_task(&dir, serde_json::json!({ "title": "Pintura" })).await;
    let id = task["id"].as_str().unwrap();

    let (status, _) = delete(router(&dir), &format!("/api/tasks/{id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = delete(router(&dir), &format!("/api/tasks/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn assignee_resolution_and_unassigned_filter() {
    let dir = TempDir::new().unwrap();
    seed_directory(&dir);

    create_task(
        &dir,
        serde_json::json!({ "title": "Asignada", "assigned_to": STAFF }),
    )
    .await;
    create_task(&dir, serde_json::json!({ "title": "Libre" })).await;
    // A reference to a user no longer in the directory resolves to the
    // unassigned sentinel but is not an unassigned task.
    create_task(
        &dir,
        serde_json::json!({ "title": "Huérfana", "assigned_to": "u-removed" }),
    )
    .await;

    let (_, all) = get(router(&dir), "/api/tasks").await;
    let assigned = all
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["title"] == "Asignada")
        .unwrap();
    assert_eq!(assigned["assignee"]["name"], "Carlos Rivera");
    assert_eq!(assigned["assignee"]["initial"], "C");
    let orphan = all
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["title"] == "Huérfana")
        .unwrap();
    assert_eq!(orphan["assignee"]["name"], "Sin asignar");

    let (_, unassigned) = get(router(&dir), "/api/tasks?assignee=sin_asignar").await;
    let unassigned = unassigned.as_array().unwrap();
    assert_eq!(unassigned.len(), 1);
    assert_eq!(unassigned[0]["title"], "Libre");

    let (_, carlos) = get(router(&dir), &format!("/api/tasks?assignee={STAFF}")).await;
    assert_eq!(carlos.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn search_filters_by_substring() {
    let dir = TempDir::new().unwrap();
    seed_directory(&dir);

    create_task(&dir, serde_json::json!({ "title": "Revisar frenos" })).await;
    create_task(&dir, serde_json::json!({ "title": "Cambiar llantas" })).await;

    let (_, hits) = get(router(&dir), "/api/tasks?q=FRENOS").await;
    assert_eq!(hits.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn bulk_delete_reports_success_count_only() {
    let dir = TempDir::new().unwrap();
    seed_directory(&dir);

    let a = create_task(&dir, serde_json::json!({ "title": "uno" })).await;
    let b = create_task(&dir, serde_json::json!({ "title": "dos" })).await;

    let (status, json) = post(
        router(&dir),
        "/api/tasks/bulk/delete",
        serde_json::json!({ "ids": [a["id"], "t-missing", b["id"]] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["deleted"], 2);

    let (_, tasks) = get(router(&dir), "/api/tasks").await;
    assert!(tasks.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn bulk_status_updates_row_by_row() {
    let dir = TempDir::new().unwrap();
    seed_directory(&dir);

    let a = create_task(&dir, serde_json::json!({ "title": "uno" })).await;
    let b = create_task(&dir, serde_json::json!({ "title": "dos" })).await;

    let (status, json) = post(
        router(&dir),
        "/api/tasks/bulk/status",
        serde_json::json!({ "ids": [a["id"], b["id"], "t-missing"], "status": "en_progreso" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["updated"], 2);
}

// ---------------------------------------------------------------------------
// Objectives
// ---------------------------------------------------------------------------

#[tokio::test]
async fn objective_percentage_is_derived_and_capped() {
    let dir = TempDir::new().unwrap();
    seed_directory(&dir);

    let (status, objective) = post(
        router(&dir),
        "/api/objectives",
        serde_json::json!({
            "service": "Cambio de aceite",
            "target_value": "150/mes",
            "target_numeric": 150,
            "period": "mensual",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(objective["percent"], 0);
    let id = objective["id"].as_str().unwrap();

    let (_, objective) = patch(
        router(&dir),
        &format!("/api/objectives/{id}"),
        serde_json::json!({ "current_progress": 75 }),
    )
    .await;
    assert_eq!(objective["percent"], 50);

    let (_, objective) = patch(
        router(&dir),
        &format!("/api/objectives/{id}"),
        serde_json::json!({ "current_progress": 200 }),
    )
    .await;
    assert_eq!(objective["percent"], 100);
}

#[tokio::test]
async fn objective_unknown_period_is_rejected() {
    let dir = TempDir::new().unwrap();
    seed_directory(&dir);

    let (status, _) = post(
        router(&dir),
        "/api/objectives",
        serde_json::json!({ "service": "Frenos", "period": "bimestral" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn objective_bulk_active_counts_successes() {
    let dir = TempDir::new().unwrap();
    seed_directory(&dir);

    let (_, a) = post(
        router(&dir),
        "/api/objectives",
        serde_json::json!({ "service": "A" }),
    )
    .await;
    let (_, b) = post(
        router(&dir),
        "/api/objectives",
        serde_json::json!({ "service": "B" }),
    )
    .await;

    let (_, json) = post(
        router(&dir),
        "/api/objectives/bulk/active",
        serde_json::json!({ "ids": [a["id"], b["id"], "o-missing"], "active": false }),
    )
    .await;
    assert_eq!(json["updated"], 2);

    let (_, inactive) = get(router(&dir), "/api/objectives?active=false").await;
    assert_eq!(inactive.as_array().unwrap().len(), 2);
}

// ---------------------------------------------------------------------------
// Roadmap
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stage_percentage_counts_completed_deliverables() {
    let dir = TempDir::new().unwrap();
    seed_directory(&dir);

    let (_, stage) = post(
        router(&dir),
        "/api/roadmap/stages",
        serde_json::json!({ "name": "Lanzamiento" }),
    )
    .await;
    let stage_id = stage["id"].as_str().unwrap();

    let mut first = None;
    for name in ["Dominio", "Hosting", "Página"] {
        let (_, d) = post(
            router(&dir),
            "/api/roadmap/deliverables",
            serde_json::json!({ "stage_id": stage_id, "name": name }),
        )
        .await;
        first.get_or_insert(d["id"].as_str().unwrap().to_string());
    }

    let (_, d) = patch(
        router(&dir),
        &format!("/api/roadmap/deliverables/{}", first.unwrap()),
        serde_json::json!({ "status": "completado" }),
    )
    .await;
    assert_eq!(d["status"], "completado");

    let (_, stages) = get(router(&dir), "/api/roadmap/stages").await;
    assert_eq!(stages[0]["deliverable_count"], 3);
    assert_eq!(stages[0]["percent"], 33);
}

#[tokio::test]
async fn deleting_a_stage_cascades() {
    let dir = TempDir::new().unwrap();
    seed_directory(&dir);

    let (_, stage) = post(
        router(&dir),
        "/api/roadmap/stages",
        serde_json::json!({ "name": "Fase 1" }),
    )
    .await;
    let stage_id = stage["id"].as_str().unwrap();
    for name in ["uno", "dos"] {
        post(
            router(&dir),
            "/api/roadmap/deliverables",
            serde_json::json!({ "stage_id": stage_id, "name": name }),
        )
        .await;
    }

    let (status, json) = delete(router(&dir), &format!("/api/roadmap/stages/{stage_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["deliverables_removed"], 2);

    let (_, deliverables) = get(router(&dir), "/api/roadmap/deliverables").await;
    assert!(deliverables.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn deliverable_requires_existing_stage() {
    let dir = TempDir::new().unwrap();
    seed_directory(&dir);

    let (status, _) = post(
        router(&dir),
        "/api/roadmap/deliverables",
        serde_json::json!({ "stage_id": "s-missing", "name": "Dominio" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Checklist
// ---------------------------------------------------------------------------

#[tokio::test]
async fn checklist_groups_by_area_label() {
    let dir = TempDir::new().unwrap();
    seed_directory(&dir);

    for (area, item) in [
        ("Taller", "Extintores vigentes"),
        ("Taller", "Herramienta calibrada"),
        ("Oficina", "Facturas al día"),
    ] {
        let (status, _) = post(
            router(&dir),
            "/api/checklist",
            serde_json::json!({ "area": area, "item": item }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, groups) = get(router(&dir), "/api/checklist").await;
    let groups = groups.as_array().unwrap();
    assert_eq!(groups.len(), 2);
    // Areas come back alphabetically.
    assert_eq!(groups[0]["area"], "Oficina");
    assert_eq!(groups[1]["area"], "Taller");
    assert_eq!(groups[1]["items"].as_array().unwrap().len(), 2);
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[tokio::test]
async fn dashboard_counts_sum_to_total() {
    let dir = TempDir::new().unwrap();
    seed_directory(&dir);

    create_task(&dir, serde_json::json!({ "title": "a" })).await;
    create_task(&dir, serde_json::json!({ "title": "b", "priority": "alta" })).await;
    let c = create_task(&dir, serde_json::json!({ "title": "c" })).await;
    patch(
        router(&dir),
        &format!("/api/tasks/{}", c["id"].as_str().unwrap()),
        serde_json::json!({ "status": "completado" }),
    )
    .await;

    let (status, stats) = get(router(&dir), "/api/dashboard").await;
    assert_eq!(status, StatusCode::OK);
    let tasks = &stats["tasks"];
    let sum = tasks["pendiente"].as_u64().unwrap()
        + tasks["en_progreso"].as_u64().unwrap()
        + tasks["esperando_respuesta"].as_u64().unwrap()
        + tasks["completado"].as_u64().unwrap();
    assert_eq!(sum, tasks["total"].as_u64().unwrap());
    assert_eq!(stats["attention"].as_array().unwrap().len(), 1);
    assert_eq!(stats["subscribers"], 0);
}

#[tokio::test]
async fn dashboard_limit_caps_lists() {
    let dir = TempDir::new().unwrap();
    seed_directory(&dir);

    for i in 0..4 {
        create_task(
            &dir,
            serde_json::json!({ "title": format!("t{i}"), "priority": "alta" }),
        )
        .await;
    }

    let (_, stats) = get(router(&dir), "/api/dashboard?limit=2").await;
    assert_eq!(stats["attention"].as_array().unwrap().len(), 2);
    assert_eq!(stats["recent"].as_array().unwrap().len(), 2);
}

// ---------------------------------------------------------------------------
// Preferences
// ---------------------------------------------------------------------------

#[tokio::test]
async fn prefs_default_then_roundtrip() {
    let dir = TempDir::new().unwrap();
    seed_directory(&dir);

    let (status, prefs) = get(router(&dir), "/api/prefs").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(prefs["sidebar_width"], 280);
    assert_eq!(prefs["sidebar_collapsed"], false);

    let (status, saved) = send(
        router(&dir),
        "PUT",
        "/api/prefs",
        Some(ADMIN),
        Some(serde_json::json!({ "sidebar_width": 96, "sidebar_collapsed": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["sidebar_width"], 96);

    let (_, prefs) = get(router(&dir), "/api/prefs").await;
    assert_eq!(prefs["sidebar_collapsed"], true);
}
