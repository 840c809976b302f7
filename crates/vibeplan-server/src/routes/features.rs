use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use std::collections::BTreeMap;
use vibeplan_core::types::DocumentType;

use crate::error::AppError;
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;

/// GET /api/projects/{uid}/features — newest first, with their documents.
pub async fn list_features(
    State(app): State<AppState>,
    ApiPath(uid): ApiPath<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let features = app.with_store(move |s| s.list_features(&uid)).await?;
    Ok(Json(serde_json::to_value(features)?))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewFeatureRequest {
    pub feature_name: String,
    pub feature_description: String,
    /// Already generated documents to store with the feature.
    pub documents: BTreeMap<DocumentType, String>,
}

/// POST /api/projects/{uid}/features — store a feature along with any
/// documents already generated for it.
pub async fn create_feature(
    State(app): State<AppState>,
    ApiPath(uid): ApiPath<String>,
    ApiJson(req): ApiJson<NewFeatureRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let feature = app
        .with_store(move |s| {
            let feature = s.add_feature(&uid, &req.feature_name, &req.feature_description)?;
            for (doc_type, content) in &req.documents {
                s.add_feature_document(feature.id, *doc_type, content)?;
            }
            s.get_feature(feature.id)
        })
        .await?;
    Ok(Json(serde_json::to_value(feature)?))
}

pub async fn delete_feature(
    State(app): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    app.with_store(move |s| s.delete_feature(id)).await?;
    Ok(Json(serde_json::json!({ "deleted": id })))
}
