use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use vibeplan_core::document::{DocumentUpdate, NewDocument};
use vibeplan_core::markdown;

use crate::error::AppError;
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;

pub async fn list_documents(
    State(app): State<AppState>,
    ApiPath(uid): ApiPath<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let documents = app.with_store(move |s| s.list_documents(&uid)).await?;
    Ok(Json(serde_json::to_value(documents)?))
}

pub async fn create_document(
    State(app): State<AppState>,
    ApiPath(uid): ApiPath<String>,
    ApiJson(body): ApiJson<NewDocument>,
) -> Result<Json<serde_json::Value>, AppError> {
    let document = app.with_store(move |s| s.add_document(&uid, &body)).await?;
    Ok(Json(serde_json::to_value(document)?))
}

pub async fn get_document(
    State(app): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let document = app.with_store(move |s| s.get_document(id)).await?;
    Ok(Json(serde_json::to_value(document)?))
}

pub async fn update_document(
    State(app): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(body): ApiJson<DocumentUpdate>,
) -> Result<Json<serde_json::Value>, AppError> {
    let document = app
        .with_store(move |s| s.update_document(id, &body))
        .await?;
    Ok(Json(serde_json::to_value(document)?))
}

pub async fn delete_document(
    State(app): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    app.with_store(move |s| s.delete_document(id)).await?;
    Ok(Json(serde_json::json!({ "deleted": id })))
}

/// GET /api/documents/{id}/export
pub async fn export_document(
    State(app): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    let document = app.with_store(move |s| s.get_document(id)).await?;
    Ok((
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        markdown::document_to_markdown(&document),
    ))
}
