use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use super::require;
use crate::error::AppError;
use crate::extract::ApiJson;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CrawlRequest {
    pub url: String,
}

/// POST /api/crawl-page — extract colors and fonts from a live page.
pub async fn crawl_page(
    State(app): State<AppState>,
    ApiJson(req): ApiJson<CrawlRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    require(&req.url, "url")?;
    let result = crate::crawl::crawl_page(&app.http, &req.url, app.fetch).await?;
    Ok(Json(serde_json::to_value(result)?))
}
