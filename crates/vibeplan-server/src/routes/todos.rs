use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use vibeplan_core::todo::{NewTodo, TodoAnalysis, TodoUpdate, DEFAULT_COMPLETION_THRESHOLD};
use vibeplan_core::types::TodoStatus;

use crate::error::AppError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListParams {
    pub status: Option<String>,
}

/// GET /api/projects/{uid}/todos[?status=...]
pub async fn list_todos(
    State(app): State<AppState>,
    ApiPath(uid): ApiPath<String>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let status = params
        .status
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.trim().parse::<TodoStatus>())
        .transpose()?;
    let todos = app.with_store(move |s| s.list_todos(&uid, status)).await?;
    Ok(Json(serde_json::to_value(todos)?))
}

/// Accepted bodies for adding todos: a bare array, `{"todos": [...]}`, or a
/// single todo object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AddTodos {
    Many(Vec<NewTodo>),
    Batch { todos: Vec<NewTodo> },
    One(NewTodo),
}

/// POST /api/projects/{uid}/todos — new todos land at the end of the
/// backlog.
pub async fn add_todos(
    State(app): State<AppState>,
    ApiPath(uid): ApiPath<String>,
    ApiJson(body): ApiJson<AddTodos>,
) -> Result<Json<serde_json::Value>, AppError> {
    let todos = match body {
        AddTodos::Many(todos) | AddTodos::Batch { todos } => todos,
        AddTodos::One(todo) => vec![todo],
    };
    let created = app.with_store(move |s| s.add_todos(&uid, &todos)).await?;
    Ok(Json(serde_json::to_value(created)?))
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub status: TodoStatus,
    pub ids: Vec<i64>,
}

/// POST /api/projects/{uid}/todos/reorder — `ids` must list every todo in
/// the column, in the new order.
pub async fn reorder_todos(
    State(app): State<AppState>,
    ApiPath(uid): ApiPath<String>,
    ApiJson(req): ApiJson<ReorderRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let todos = app
        .with_store(move |s| s.reorder_todos(&uid, req.status, &req.ids))
        .await?;
    Ok(Json(serde_json::to_value(todos)?))
}

#[derive(Debug, Deserialize)]
pub struct ApplyAnalysisRequest {
    pub results: Vec<TodoAnalysis>,
    #[serde(default)]
    pub threshold: Option<f64>,
}

/// POST /api/projects/{uid}/todos/apply-analysis
pub async fn apply_analysis(
    State(app): State<AppState>,
    ApiPath(uid): ApiPath<String>,
    ApiJson(req): ApiJson<ApplyAnalysisRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let threshold = req.threshold.unwrap_or(DEFAULT_COMPLETION_THRESHOLD);
    let (updated, progress) = app
        .with_store(move |s| {
            let updated = s.apply_analysis(&uid, &req.results, threshold)?;
            Ok((updated, s.progress(&uid)?))
        })
        .await?;
    tracing::info!(updated = updated.len(), "applied progress analysis");
    Ok(Json(serde_json::json!({
        "updated": updated,
        "progress": progress,
    })))
}

/// PATCH /api/todos/{id}
pub async fn update_todo(
    State(app): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(body): ApiJson<TodoUpdate>,
) -> Result<Json<serde_json::Value>, AppError> {
    let todo = app.with_store(move |s| s.update_todo(id, &body)).await?;
    Ok(Json(serde_json::to_value(todo)?))
}

/// DELETE /api/todos/{id} — returns the project's progress afterwards.
pub async fn delete_todo(
    State(app): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let progress = app.with_store(move |s| s.delete_todo(id)).await?;
    Ok(Json(serde_json::json!({
        "deleted": id,
        "progress": progress,
    })))
}

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub status: TodoStatus,
    #[serde(default)]
    pub order: Option<i64>,
}

/// POST /api/todos/{id}/move
pub async fn move_todo(
    State(app): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<MoveRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let todo = app
        .with_store(move |s| s.move_todo(id, req.status, req.order))
        .await?;
    Ok(Json(serde_json::to_value(todo)?))
}
