//! HTTP-level tests for `/api/v1/portfolio/projects`.
//!
//! Technologies are created through their own endpoint so each test drives
//! the API the way a client would.

mod common;

use axum::http::StatusCode;
use axum::Router;
use common::{body_json, delete, get, mock_app, patch_json, post_json, put_json};
use serde_json::{json, Value};

const BASE: &str = "/api/v1/portfolio/projects";
const TECHS: &str = "/api/v1/portfolio/techs";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create_technology(app: &Router, name: &str) -> i64 {
    let response = post_json(app.clone(), TECHS, json!({ "name": name })).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

async fn create_project(app: &Router, body: Value) -> i64 {
    let response = post_json(app.clone(), BASE, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

fn project(title: &str, technology_ids: &[i64]) -> Value {
    json!({
        "title": title,
        "version": "1.0.0",
        "description": format!("{title} description"),
        "is_active": true,
        "links": [format!("https://example.com/{title}")],
        "technology_ids": technology_ids,
    })
}

fn titles(json: &Value) -> Vec<&str> {
    json.as_array()
        .expect("list response should be an array")
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect()
}

fn technology_names(project: &Value) -> Vec<&str> {
    project["technologies"]
        .as_array()
        .expect("project should carry a technologies array")
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect()
}

// ---------------------------------------------------------------------------
// Test: create with technologies, then get
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_with_technologies_then_get() {
    let (app, _) = mock_app();
    let rust = create_technology(&app, "Rust").await;
    let go = create_technology(&app, "Go").await;

    let id = create_project(&app, project("Site", &[rust, go])).await;

    let response = get(app, &format!("{BASE}/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["title"], "Site");
    assert_eq!(json["version"], "1.0.0");
    assert_eq!(json["description"], "Site description");
    assert_eq!(json["is_active"], true);
    assert_eq!(json["is_archived"], Value::Null);
    assert_eq!(json["links"], json!(["https://example.com/Site"]));
    assert_eq!(technology_names(&json), vec!["Go", "Rust"]);
}

#[tokio::test]
async fn legacy_tech_id_field_is_accepted() {
    let (app, _) = mock_app();
    let rust = create_technology(&app, "Rust").await;

    let id = create_project(
        &app,
        json!({
            "title": "Legacy",
            "version": "0.1",
            "description": "d",
            "tech_id": [rust],
        }),
    )
    .await;

    let json = body_json(get(app, &format!("{BASE}/{id}")).await).await;
    assert_eq!(technology_names(&json), vec!["Rust"]);
    assert_eq!(json["links"], json!([]));
}

#[tokio::test]
async fn get_missing_returns_404() {
    let (app, _) = mock_app();
    let response = get(app, &format!("{BASE}/9")).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Project with id 9 not found");
}

#[tokio::test]
async fn create_with_empty_title_is_rejected() {
    let (app, repo) = mock_app();
    let mut body = project("x", &[]);
    body["title"] = json!("");

    let response = post_json(app, BASE, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    assert_eq!(repo.project_count(), 0);
}

// ---------------------------------------------------------------------------
// Test: list filtering, sorting and pagination
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_sort_title_desc_limit_two() {
    let (app, _) = mock_app();
    for title in ["A", "B", "C"] {
        create_project(&app, project(title, &[])).await;
    }

    let response = get(app, &format!("{BASE}?sort_field=title&sort_order=desc&limit=2")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(titles(&body_json(response).await), vec!["C", "B"]);
}

#[tokio::test]
async fn list_pages_without_overlap() {
    let (app, _) = mock_app();
    for title in ["A", "B", "C", "D", "E"] {
        create_project(&app, project(title, &[])).await;
    }

    let mut seen = Vec::new();
    for offset in [0, 2, 4] {
        let json = body_json(get(app.clone(), &format!("{BASE}?limit=2&offset={offset}")).await).await;
        seen.extend(titles(&json).into_iter().map(str::to_string));
    }
    assert_eq!(seen, vec!["A", "B", "C", "D", "E"]);
}

#[tokio::test]
async fn list_filters_by_flag_and_technology() {
    let (app, _) = mock_app();
    let rust = create_technology(&app, "Rust").await;
    let go = create_technology(&app, "Go").await;

    create_project(&app, project("Both", &[rust, go])).await;
    let mut archived = project("Old", &[go]);
    archived["is_active"] = json!(false);
    create_project(&app, archived).await;

    let json = body_json(get(app.clone(), &format!("{BASE}?is_active=true")).await).await;
    assert_eq!(titles(&json), vec!["Both"]);

    let json = body_json(get(app.clone(), &format!("{BASE}?tech_id={rust}")).await).await;
    assert_eq!(titles(&json), vec!["Both"]);
    assert_eq!(technology_names(&json[0]), vec!["Go", "Rust"]);

    let json = body_json(get(app, &format!("{BASE}?tech_id={go}")).await).await;
    assert_eq!(titles(&json), vec!["Both", "Old"]);
}

#[tokio::test]
async fn list_rejects_bad_parameters() {
    let (app, _) = mock_app();

    let response = get(app.clone(), &format!("{BASE}?sort_field=name")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(app.clone(), &format!("{BASE}?sort_order=sideways")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(app.clone(), &format!("{BASE}?limit=-1")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(app, &format!("{BASE}?is_active=maybe")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: PATCH
// ---------------------------------------------------------------------------

#[tokio::test]
async fn patch_updates_fields_and_replaces_technologies() {
    let (app, _) = mock_app();
    let rust = create_technology(&app, "Rust").await;
    let elm = create_technology(&app, "Elm").await;
    let id = create_project(&app, project("Site", &[rust])).await;

    let response = patch_json(
        app.clone(),
        &format!("{BASE}/{id}"),
        json!({ "version": "2.0", "title": "", "technology_ids": [elm] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["title"], "Site");
    assert_eq!(json["version"], "2.0");
    assert_eq!(technology_names(&json), vec!["Elm"]);

    // Omitting technology_ids keeps the association set.
    let response = patch_json(
        app.clone(),
        &format!("{BASE}/{id}"),
        json!({ "is_archived": true }),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["is_archived"], true);
    assert_eq!(technology_names(&json), vec!["Elm"]);

    // An empty list clears it.
    let response = patch_json(app, &format!("{BASE}/{id}"), json!({ "technology_ids": [] })).await;
    let json = body_json(response).await;
    assert!(technology_names(&json).is_empty());
}

#[tokio::test]
async fn patch_missing_returns_404() {
    let (app, _) = mock_app();
    let response = patch_json(app, &format!("{BASE}/3"), json!({ "title": "X" })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: PUT
// ---------------------------------------------------------------------------

#[tokio::test]
async fn put_replaces_fields_and_technologies() {
    let (app, _) = mock_app();
    let rust = create_technology(&app, "Rust").await;
    let elm = create_technology(&app, "Elm").await;
    let go = create_technology(&app, "Go").await;
    let id = create_project(&app, project("Site", &[rust, elm])).await;

    let response = put_json(
        app.clone(),
        &format!("{BASE}/{id}"),
        json!({
            "title": "Blog",
            "version": "2.0",
            "description": "Rewritten",
            "technology_ids": [go, go],
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["id"], id);
    assert_eq!(json["title"], "Blog");
    assert!(json["is_active"].is_null());
    assert_eq!(json["links"], json!([]));
    assert_eq!(technology_names(&json), vec!["Go"]);

    let json = body_json(get(app, &format!("{BASE}/{id}")).await).await;
    assert_eq!(json["description"], "Rewritten");
    assert_eq!(technology_names(&json), vec!["Go"]);
}

#[tokio::test]
async fn put_with_empty_title_is_rejected() {
    let (app, _) = mock_app();
    let id = create_project(&app, project("Site", &[])).await;

    let response = put_json(app, &format!("{BASE}/{id}"), project("", &[])).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn put_missing_returns_404() {
    let (app, _) = mock_app();
    let response = put_json(app, &format!("{BASE}/3"), project("Site", &[])).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: DELETE
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_project_keeps_technologies() {
    let (app, _) = mock_app();
    let rust = create_technology(&app, "Rust").await;
    let id = create_project(&app, project("Site", &[rust])).await;

    let response = delete(app.clone(), &format!("{BASE}/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(app.clone(), &format!("{BASE}/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(app, &format!("{TECHS}/{rust}")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn deleting_technology_detaches_it() {
    let (app, _) = mock_app();
    let rust = create_technology(&app, "Rust").await;
    let go = create_technology(&app, "Go").await;
    let id = create_project(&app, project("Site", &[rust, go])).await;

    let response = delete(app.clone(), &format!("{TECHS}/{go}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let json = body_json(get(app, &format!("{BASE}/{id}")).await).await;
    assert_eq!(technology_names(&json), vec!["Rust"]);
}
