use axum::http::StatusCode;
use http_body_util::BodyExt;
use llm_client::Endpoints;
use serde_json::json;
use tempfile::TempDir;
use tower::ServiceExt;
use vibeplan_server::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Router over a fresh data directory. Vendor calls go to `vendor_base` when
/// given.
fn app(dir: &TempDir, vendor_base: Option<String>) -> axum::Router {
    let mut state = AppState::new(dir.path().to_path_buf()).unwrap();
    if let Some(base) = vendor_base {
        state = state.with_endpoints(Endpoints::all_at(base));
    }
    vibeplan_server::build_router(state)
}

/// Send a request via `oneshot` and return (status, raw body).
async fn send_raw(
    app: axum::Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, Vec<u8>) {
    let builder = axum::http::Request::builder().method(method).uri(uri);
    let req = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(axum::body::Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(axum::body::Body::empty()).unwrap(),
    };
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

/// Send a request and return (status, parsed JSON body).
async fn send(
    app: axum::Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let (status, body) = send_raw(app, method, uri, body).await;
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(app, "GET", uri, None).await
}

async fn post_json(
    app: axum::Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, "POST", uri, Some(body)).await
}

async fn create_project(app: &axum::Router, name: &str) -> String {
    let (status, body) = post_json(
        app.clone(),
        "/api/projects",
        json!({ "name": name, "description": "Track daily habits", "appType": "web" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["uid"].as_str().unwrap().to_string()
}

fn openai_reply(content: &str) -> String {
    json!({ "choices": [{ "message": { "content": content } }] }).to_string()
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[tokio::test]
async fn project_lifecycle() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir, None);
    let uid = create_project(&app, "Habit tracker").await;

    let (status, body) = get(app.clone(), "/api/projects").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(
        app.clone(),
        "PATCH",
        &format!("/api/projects/{uid}"),
        Some(json!({ "name": "Habit coach" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Habit coach");
    assert_eq!(body["description"], "Track daily habits");

    let (status, body) = get(app.clone(), &format!("/api/projects/{uid}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["project"]["uid"], uid.as_str());
    assert_eq!(body["progress"]["total"], 0);
    assert_eq!(body["progress"]["percentage"], 0);
}

#[tokio::test]
async fn create_project_requires_name() {
    let dir = TempDir::new().unwrap();
    let (status, body) = post_json(app(&dir, None), "/api/projects", json!({ "name": " " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "name is required");
}

#[tokio::test]
async fn unknown_project_is_404() {
    let dir = TempDir::new().unwrap();
    let (status, body) = get(app(&dir, None), "/api/projects/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "project not found: nope");
}

#[tokio::test]
async fn delete_project_needs_confirmation_and_cascades() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir, None);
    let uid = create_project(&app, "Doomed").await;
    post_json(
        app.clone(),
        &format!("/api/projects/{uid}/todos"),
        json!([{ "title": "a" }, { "title": "b" }]),
    )
    .await;
    post_json(
        app.clone(),
        &format!("/api/projects/{uid}/documents"),
        json!({ "type": "prd", "content": "# PRD" }),
    )
    .await;

    let (status, _) = send(app.clone(), "DELETE", &format!("/api/projects/{uid}"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        app.clone(),
        "DELETE",
        &format!("/api/projects/{uid}?confirm=true"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"]["todos"], 2);
    assert_eq!(body["deleted"]["documents"], 1);

    let (status, _) = get(app, &format!("/api/projects/{uid}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn export_project_as_markdown() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir, None);
    let uid = create_project(&app, "Habit tracker").await;
    post_json(
        app.clone(),
        &format!("/api/projects/{uid}/documents"),
        json!({ "type": "prd", "content": "Goals go here." }),
    )
    .await;
    post_json(
        app.clone(),
        &format!("/api/projects/{uid}/todos"),
        json!({ "title": "Login", "category": "auth" }),
    )
    .await;

    let (status, body) = send_raw(app, "GET", &format!("/api/projects/{uid}/export"), None).await;
    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(body).unwrap();
    assert!(text.starts_with("# Habit tracker"));
    assert!(text.contains("## PRD"));
    assert!(text.contains("Goals go here."));
    assert!(text.contains("- [ ] Login (auth)"));
}

// ---------------------------------------------------------------------------
// Todos
// ---------------------------------------------------------------------------

#[tokio::test]
async fn todo_board_flow_updates_progress() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir, None);
    let uid = create_project(&app, "Board").await;

    let (status, body) = post_json(
        app.clone(),
        &format!("/api/projects/{uid}/todos"),
        json!({ "todos": [{ "title": "one" }, { "title": "two" }, { "title": "three" }] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_i64().unwrap())
        .collect();
    let orders: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["order"].as_i64().unwrap())
        .collect();
    assert_eq!(orders, vec![1, 2, 3]);

    let (status, body) = post_json(
        app.clone(),
        &format!("/api/todos/{}/move", ids[0]),
        json!({ "status": "done" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "done");
    assert!(body["completedAt"].is_string());

    let (_, body) = get(app.clone(), &format!("/api/projects/{uid}/progress")).await;
    assert_eq!(body["completed"], 1);
    assert_eq!(body["total"], 3);
    assert_eq!(body["percentage"], 33);

    let (_, body) = get(app.clone(), &format!("/api/projects/{uid}/todos?status=done")).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(app.clone(), "DELETE", &format!("/api/todos/{}", ids[1]), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["progress"]["percentage"], 50);
}

#[tokio::test]
async fn update_todo_edits_fields() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir, None);
    let uid = create_project(&app, "Edits").await;
    let (_, body) = post_json(
        app.clone(),
        &format!("/api/projects/{uid}/todos"),
        json!({ "title": "draft" }),
    )
    .await;
    let id = body[0]["id"].as_i64().unwrap();

    let (status, body) = send(
        app,
        "PATCH",
        &format!("/api/todos/{id}"),
        Some(json!({ "title": "final", "priority": "high" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "final");
    assert_eq!(body["priority"], "high");
}

#[tokio::test]
async fn reorder_requires_the_whole_column() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir, None);
    let uid = create_project(&app, "Order").await;
    let (_, body) = post_json(
        app.clone(),
        &format!("/api/projects/{uid}/todos"),
        json!([{ "title": "a" }, { "title": "b" }]),
    )
    .await;
    let a = body[0]["id"].as_i64().unwrap();
    let b = body[1]["id"].as_i64().unwrap();

    let (status, _) = post_json(
        app.clone(),
        &format!("/api/projects/{uid}/todos/reorder"),
        json!({ "status": "backlog", "ids": [b] }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = post_json(
        app,
        &format!("/api/projects/{uid}/todos/reorder"),
        json!({ "status": "backlog", "ids": [b, a] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["id"], b);
    assert_eq!(body[0]["order"], 1);
}

#[tokio::test]
async fn invalid_status_filter_is_400() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir, None);
    let uid = create_project(&app, "Filter").await;
    let (status, _) = get(app, &format!("/api/projects/{uid}/todos?status=someday")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn move_with_unknown_status_is_400_with_error_body() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir, None);
    let uid = create_project(&app, "Board").await;
    let (_, todo) = post_json(
        app.clone(),
        &format!("/api/projects/{uid}/todos"),
        json!({ "title": "setup" }),
    )
    .await;
    let id = todo[0]["id"].as_i64().unwrap();

    let (status, body) = post_json(
        app,
        &format!("/api/todos/{id}/move"),
        json!({ "status": "later" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("later"));
}

#[tokio::test]
async fn wrongly_typed_body_is_400_with_error_body() {
    let dir = TempDir::new().unwrap();
    let (status, body) = post_json(app(&dir, None), "/api/crawl-page", json!({ "url": 5 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn malformed_body_is_400_with_error_body() {
    let dir = TempDir::new().unwrap();
    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/api/projects")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{\"name\": "))
        .unwrap();
    let response = app(&dir, None).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn bad_query_and_path_values_are_400() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir, None);
    let uid = create_project(&app, "Params").await;

    let (status, body) = send(
        app.clone(),
        "DELETE",
        &format!("/api/projects/{uid}?confirm=maybe"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = get(app, "/api/documents/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn apply_analysis_marks_confident_results_done() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir, None);
    let uid = create_project(&app, "Analysis").await;
    let (_, body) = post_json(
        app.clone(),
        &format!("/api/projects/{uid}/todos"),
        json!([{ "title": "a" }, { "title": "b" }]),
    )
    .await;
    let a = body[0]["id"].as_i64().unwrap();
    let b = body[1]["id"].as_i64().unwrap();

    let (status, body) = post_json(
        app,
        &format!("/api/projects/{uid}/todos/apply-analysis"),
        json!({ "results": [
            { "todoId": a.to_string(), "isCompleted": true, "confidence": 0.9, "reason": "found" },
            { "todoId": b, "isCompleted": true, "confidence": 0.4, "reason": "maybe" },
        ]}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"].as_array().unwrap().len(), 1);
    assert_eq!(body["updated"][0]["id"], a);
    assert_eq!(body["progress"]["percentage"], 50);
}

// ---------------------------------------------------------------------------
// Documents, features, themes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn document_crud_and_export() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir, None);
    let uid = create_project(&app, "Docs").await;

    let (status, body) = post_json(
        app.clone(),
        &format!("/api/projects/{uid}/documents"),
        json!({ "type": "trd", "content": "Stack: Rust" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "TRD");
    let id = body["id"].as_i64().unwrap();

    let (status, body) = send(
        app.clone(),
        "PUT",
        &format!("/api/documents/{id}"),
        Some(json!({ "content": "Stack: Rust + SQLite" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"], "Stack: Rust + SQLite");

    let (_, body) = send_raw(app.clone(), "GET", &format!("/api/documents/{id}/export"), None).await;
    let text = String::from_utf8(body).unwrap();
    assert!(text.starts_with("# TRD"));
    assert!(text.contains("> Type: TRD"));

    let (status, _) = send(app.clone(), "DELETE", &format!("/api/documents/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = get(app, &format!("/api/documents/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_document_type_is_rejected() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir, None);
    let uid = create_project(&app, "Docs").await;
    let (status, _) = post_json(
        app,
        &format!("/api/projects/{uid}/documents"),
        json!({ "type": "memo", "content": "x" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn feature_with_documents() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir, None);
    let uid = create_project(&app, "Features").await;

    let (status, body) = post_json(
        app.clone(),
        &format!("/api/projects/{uid}/features"),
        json!({
            "featureName": "Export",
            "featureDescription": "CSV export",
            "documents": { "prd": "# Export PRD", "todo": "- [ ] csv" },
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["documents"].as_array().unwrap().len(), 2);
    let id = body["id"].as_i64().unwrap();

    let (_, body) = get(app.clone(), &format!("/api/projects/{uid}/features")).await;
    assert_eq!(body[0]["name"], "Export");

    let (status, _) = send(app.clone(), "DELETE", &format!("/api/features/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = get(app, &format!("/api/projects/{uid}/features")).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn saved_themes() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir, None);

    let (status, body) = post_json(
        app.clone(),
        "/api/themes",
        json!({
            "name": "Acme",
            "source": "url",
            "sourceUrl": "https://acme.test",
            "tokens": { "colors": [{ "hex": "#FFFFFF" }] },
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = body["id"].as_i64().unwrap();
    assert_eq!(body["tokens"]["colors"][0]["hex"], "#FFFFFF");

    let (_, body) = get(app.clone(), "/api/themes").await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = send(app.clone(), "DELETE", &format!("/api/themes/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(app, "DELETE", &format!("/api/themes/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ai_config_redacts_key() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir, None);

    let (_, body) = get(app.clone(), "/api/ai-config").await;
    assert_eq!(body["provider"], "google");
    assert_eq!(body["configured"], false);

    let (status, body) = send(
        app.clone(),
        "PUT",
        "/api/ai-config",
        Some(json!({ "provider": "claude", "apiKey": "sk-ant-secret-1234" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["provider"], "claude");
    assert_eq!(body["configured"], true);
    assert_eq!(body["apiKeyHint"], "…1234");
    assert!(!body.to_string().contains("secret"));

    let (_, body) = send(app.clone(), "DELETE", "/api/ai-config", None).await;
    assert_eq!(body["cleared"], true);
    let (_, body) = get(app, "/api/ai-config").await;
    assert_eq!(body["configured"], false);
}

#[tokio::test]
async fn ai_config_rejects_unknown_provider() {
    let dir = TempDir::new().unwrap();
    let (status, _) = send(
        app(&dir, None),
        "PUT",
        "/api/ai-config",
        Some(json!({ "provider": "mistral" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn wizard_draft_round_trip_drops_key() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir, None);

    let (_, body) = get(app.clone(), "/api/wizard").await;
    assert_eq!(body["step"], 1);
    assert_eq!(body["canProceed"], false);

    let (status, body) = send(
        app.clone(),
        "PUT",
        "/api/wizard",
        Some(json!({ "step": 1, "appType": "mobile", "apiKey": "sk-secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["canProceed"], true);
    assert!(body.get("apiKey").is_none());

    let saved = std::fs::read_to_string(vibeplan_core::paths::wizard_path(dir.path())).unwrap();
    assert!(!saved.contains("sk-secret"));

    let (_, body) = send(app.clone(), "DELETE", "/api/wizard", None).await;
    assert_eq!(body["reset"], true);
    let (_, body) = get(app, "/api/wizard").await;
    assert_eq!(body["appType"], "");
}

// ---------------------------------------------------------------------------
// Forwarding endpoints
// ---------------------------------------------------------------------------

#[tokio::test]
async fn crawl_page_extracts_tokens() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/site")
        .with_status(200)
        .with_body(
            r#"<html><head><style>
                body { color: #1a1a1a; background: #ffffff; font-family: "Roboto", sans-serif; }
                a { color: #1A1A1A; }
            </style></head></html>"#,
        )
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let url = format!("{}/site", server.url());
    let (status, body) = post_json(app(&dir, None), "/api/crawl-page", json!({ "url": url })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url"], url.as_str());
    assert_eq!(body["colors"][0]["hex"], "#1A1A1A");
    assert_eq!(body["colors"][0]["count"], 2);
    assert_eq!(body["fonts"][0]["fontFamily"], "Roboto");
    assert!(body["tailwindConfig"].is_string());
    assert!(body["cssVariables"].as_str().unwrap().contains(":root"));
}

#[tokio::test]
async fn crawl_page_rejects_bad_url() {
    let dir = TempDir::new().unwrap();
    let (status, _) = post_json(
        app(&dir, None),
        "/api/crawl-page",
        json!({ "url": "file:///etc/passwd" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = post_json(app(&dir, None), "/api/crawl-page", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "url is required");
}

#[tokio::test]
async fn analyze_progress_returns_results() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(openai_reply(
            "Here you go:\n```json\n[{\"todoId\": 7, \"todoTitle\": \"Login\", \"isCompleted\": true, \"confidence\": 0.92, \"reason\": \"auth module exists\"}]\n```",
        ))
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let (status, body) = post_json(
        app(&dir, Some(server.url())),
        "/api/analyze-progress",
        json!({
            "aiProvider": "openai",
            "apiKey": "sk-test",
            "codebaseInfo": "src/auth.rs implements login",
            "todos": [{ "id": 7, "title": "Login", "category": "auth" }],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"][0]["todoId"], 7);
    assert_eq!(body["results"][0]["isCompleted"], true);
}

#[tokio::test]
async fn analyze_progress_unparseable_reply_carries_raw() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(openai_reply("I could not tell."))
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let (status, body) = post_json(
        app(&dir, Some(server.url())),
        "/api/analyze-progress",
        json!({ "aiProvider": "openai", "apiKey": "sk-test", "codebaseInfo": "", "todos": [] }),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["raw"], "I could not tell.");
}

#[tokio::test]
async fn forwarding_requires_api_key() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir, None);
    for uri in [
        "/api/analyze-progress",
        "/api/generate-docs",
        "/api/generate-feature",
        "/api/analyze-screenshot",
    ] {
        let (status, body) = post_json(app.clone(), uri, json!({ "aiProvider": "openai" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["error"], "apiKey is required", "{uri}");
    }
}

#[tokio::test]
async fn screenshot_requires_an_image() {
    let dir = TempDir::new().unwrap();
    let (status, body) = post_json(
        app(&dir, None),
        "/api/analyze-screenshot",
        json!({ "apiKey": "sk-test" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "imageBase64 or imageUrl is required");
}

#[tokio::test]
async fn screenshot_returns_model_object() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(openai_reply(r##"{"colors": [{"hex": "#112233"}], "fonts": []}"##))
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let (status, body) = post_json(
        app(&dir, Some(server.url())),
        "/api/analyze-screenshot",
        json!({ "apiKey": "sk-test", "imageUrl": "https://img.test/a.png" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["colors"][0]["hex"], "#112233");
}

#[tokio::test]
async fn generate_docs_returns_content() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/messages")
        .with_status(200)
        .with_body(json!({ "content": [{ "type": "text", "text": "# PRD\n\nGoals" }] }).to_string())
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let (status, body) = post_json(
        app(&dir, Some(server.url())),
        "/api/generate-docs",
        json!({
            "aiProvider": "claude",
            "apiKey": "sk-ant",
            "appName": "Shelf",
            "coreFeatures": ["log books"],
            "userLevel": "intermediate",
            "documentType": "prd",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"], "# PRD\n\nGoals");
    assert_eq!(body["documentType"], "prd");
}

#[tokio::test]
async fn generate_docs_rejects_unknown_type_and_vendor() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir, None);
    let (status, _) = post_json(
        app.clone(),
        "/api/generate-docs",
        json!({ "aiProvider": "openai", "apiKey": "k", "documentType": "memo" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_json(
        app,
        "/api/generate-docs",
        json!({ "aiProvider": "mistral", "apiKey": "k", "documentType": "prd" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn generate_docs_surfaces_vendor_failure() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_body(r#"{"error":{"message":"bad key"}}"#)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let (status, body) = post_json(
        app(&dir, Some(server.url())),
        "/api/generate-docs",
        json!({ "aiProvider": "openai", "apiKey": "k", "documentType": "prd" }),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("bad key"));
}

#[tokio::test]
async fn generate_feature_saves_when_project_given() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(openai_reply("# Feature doc"))
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let app = app(&dir, Some(server.url()));
    let uid = create_project(&app, "Shelf").await;

    let (status, body) = post_json(
        app.clone(),
        "/api/generate-feature",
        json!({
            "aiProvider": "openai",
            "apiKey": "sk-test",
            "projectContext": "A reading log",
            "featureName": "Goodreads import",
            "featureDescription": "Import shelves",
            "documentTypes": ["prd", "bogus", "todo"],
            "projectUid": uid,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["featureName"], "Goodreads import");
    assert_eq!(body["documents"]["prd"], "# Feature doc");
    assert_eq!(body["documents"]["todo"], "# Feature doc");
    assert!(body["errors"]["bogus"].is_string());
    assert!(body["featureId"].is_i64());

    let (_, features) = get(app, &format!("/api/projects/{uid}/features")).await;
    assert_eq!(features[0]["documents"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn project_generate_saves_documents() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(openai_reply("generated"))
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let app = app(&dir, Some(server.url()));
    let uid = create_project(&app, "Shelf").await;

    let (status, body) = post_json(
        app.clone(),
        &format!("/api/projects/{uid}/generate"),
        json!({
            "aiProvider": "openai",
            "apiKey": "sk-test",
            "documentTypes": ["prd", "tdd"],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["documents"]["prd"], "generated");
    assert!(body["errors"].as_object().unwrap().is_empty());

    let (_, docs) = get(app, &format!("/api/projects/{uid}/documents")).await;
    let types: Vec<&str> = docs
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["type"].as_str().unwrap())
        .collect();
    assert_eq!(types, vec!["prd", "tdd"]);
}

#[tokio::test]
async fn project_generate_without_key_is_400() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir, None);
    let uid = create_project(&app, "Keyless").await;
    let (status, _) = post_json(
        app,
        &format!("/api/projects/{uid}/generate"),
        json!({ "documentTypes": ["prd"] }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
