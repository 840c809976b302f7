use axum::extract::State;
use axum::Json;
use vibeplan_core::wizard::WizardDraft;

use crate::error::AppError;
use crate::extract::ApiJson;
use crate::state::AppState;

fn with_gate(draft: &WizardDraft) -> Result<serde_json::Value, AppError> {
    let mut value = serde_json::to_value(draft)?;
    value["canProceed"] = serde_json::Value::Bool(draft.can_proceed(draft.step));
    Ok(value)
}

/// GET /api/wizard — the saved draft, or a fresh one at step 1.
pub async fn get_wizard(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let draft = app.blocking(|dir| WizardDraft::load(&dir)).await?;
    Ok(Json(with_gate(&draft)?))
}

/// PUT /api/wizard — replace the draft. Any `apiKey` in the body is dropped.
pub async fn put_wizard(
    State(app): State<AppState>,
    ApiJson(draft): ApiJson<WizardDraft>,
) -> Result<Json<serde_json::Value>, AppError> {
    let draft = app
        .blocking(move |dir| {
            draft.save(&dir)?;
            Ok(draft)
        })
        .await?;
    Ok(Json(with_gate(&draft)?))
}

pub async fn reset_wizard(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let reset = app.blocking(|dir| WizardDraft::reset(&dir)).await?;
    Ok(Json(serde_json::json!({ "reset": reset })))
}
