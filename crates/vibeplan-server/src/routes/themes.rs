use axum::extract::State;
use axum::Json;
use vibeplan_core::saved_theme::NewSavedTheme;

use crate::error::AppError;
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;

pub async fn list_themes(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let themes = app.with_store(|s| s.list_themes()).await?;
    Ok(Json(serde_json::to_value(themes)?))
}

/// POST /api/themes — keep a crawl or screenshot result under a name.
pub async fn save_theme(
    State(app): State<AppState>,
    ApiJson(body): ApiJson<NewSavedTheme>,
) -> Result<Json<serde_json::Value>, AppError> {
    let theme = app.with_store(move |s| s.save_theme(&body)).await?;
    Ok(Json(serde_json::to_value(theme)?))
}

pub async fn delete_theme(
    State(app): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    app.with_store(move |s| s.delete_theme(id)).await?;
    Ok(Json(serde_json::json!({ "deleted": id })))
}
