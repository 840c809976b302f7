use axum::extract::State;
use axum::Json;
use llm_client::{ImageInput, Vendor};
use serde::Deserialize;
use vibeplan_core::error::VibeError;
use vibeplan_core::{extract, prompt};

use super::require;
use crate::error::AppError;
use crate::extract::ApiJson;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScreenshotRequest {
    pub api_key: String,
    pub image_base64: Option<String>,
    pub image_url: Option<String>,
}

impl ScreenshotRequest {
    /// Inline data wins over a URL when both are given.
    fn image(&self) -> Option<ImageInput> {
        let present = |s: &Option<String>| {
            s.as_deref()
                .filter(|v| !v.trim().is_empty())
                .map(str::to_string)
        };
        present(&self.image_base64)
            .map(ImageInput::Base64)
            .or_else(|| present(&self.image_url).map(ImageInput::Url))
    }
}

/// POST /api/analyze-screenshot — ask a vision model for the design tokens
/// of a screenshot. Returns the model's JSON object as-is.
pub async fn analyze_screenshot(
    State(app): State<AppState>,
    ApiJson(req): ApiJson<ScreenshotRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    require(&req.api_key, "apiKey")?;
    let image = req
        .image()
        .ok_or(VibeError::MissingInput("imageBase64 or imageUrl"))?;

    let client = app.llm(Vendor::OpenAi, &req.api_key)?;
    let text = client
        .describe_image(
            prompt::SCREENSHOT_SYSTEM_PROMPT,
            prompt::SCREENSHOT_INSTRUCTION,
            &image,
            &prompt::screenshot_options(),
        )
        .await?;
    let tokens = extract::extract_json_object(&text)?;
    Ok(Json(serde_json::Value::Object(tokens)))
}
