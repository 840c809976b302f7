use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use vibeplan_core::extract;
use vibeplan_core::prompt::{self, TodoRef};

use super::{require, vendor};
use crate::error::AppError;
use crate::extract::ApiJson;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyzeProgressRequest {
    pub ai_provider: String,
    pub api_key: String,
    pub codebase_info: String,
    pub todos: Vec<TodoRef>,
}

/// POST /api/analyze-progress — ask the model which todos the described
/// codebase already completes.
pub async fn analyze_progress(
    State(app): State<AppState>,
    ApiJson(req): ApiJson<AnalyzeProgressRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    require(&req.api_key, "apiKey")?;
    let client = app.llm(vendor(&req.ai_provider)?, &req.api_key)?;

    let user = prompt::progress_user_prompt(&req.codebase_info, &req.todos);
    let text = client
        .generate(prompt::PROGRESS_SYSTEM_PROMPT, &user, &prompt::progress_options())
        .await?;
    let results = extract::extract_json_array(&text)?;
    tracing::info!(todos = req.todos.len(), results = results.len(), "analyzed progress");
    Ok(Json(serde_json::json!({ "results": results })))
}
