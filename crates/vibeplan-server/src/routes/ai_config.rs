use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use vibeplan_core::config::AiConfig;

use super::vendor;
use crate::error::AppError;
use crate::extract::ApiJson;
use crate::state::AppState;

/// GET /api/ai-config — the key is redacted to a short hint.
pub async fn get_ai_config(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let config = app.blocking(|dir| AiConfig::load(&dir)).await?;
    Ok(Json(serde_json::to_value(config.view())?))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AiConfigPatch {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
}

/// PUT /api/ai-config — merge the given fields into the stored config.
pub async fn put_ai_config(
    State(app): State<AppState>,
    ApiJson(patch): ApiJson<AiConfigPatch>,
) -> Result<Json<serde_json::Value>, AppError> {
    let provider = patch.provider.as_deref().map(vendor).transpose()?;
    let config = app
        .blocking(move |dir| {
            let mut config = AiConfig::load(&dir)?;
            if let Some(provider) = provider {
                config.set_provider(provider);
            }
            if let Some(model) = patch.model {
                let model = model.trim().to_string();
                config.model = (!model.is_empty()).then_some(model);
            }
            if let Some(key) = patch.api_key {
                config.api_key = key.trim().to_string();
            }
            config.save(&dir)?;
            Ok(config)
        })
        .await?;
    tracing::info!(provider = %config.provider, "ai config saved");
    Ok(Json(serde_json::to_value(config.view())?))
}

pub async fn clear_ai_config(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let cleared = app.blocking(|dir| AiConfig::clear(&dir)).await?;
    Ok(Json(serde_json::json!({ "cleared": cleared })))
}
