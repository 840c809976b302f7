use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use vibeplan_core::prompt::{self, ProjectBrief};
use vibeplan_core::types::DocumentType;

use super::{require, user_level, vendor};
use crate::error::AppError;
use crate::extract::ApiJson;
use crate::generate::{generate_each, Subject};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateDocsRequest {
    pub ai_provider: String,
    pub api_key: String,
    pub app_type: String,
    pub app_name: String,
    pub short_description: String,
    pub detailed_description: String,
    pub core_features: Vec<String>,
    pub target_users: String,
    pub reference_apps: String,
    pub user_level: String,
    pub document_type: String,
}

impl GenerateDocsRequest {
    fn brief(&self) -> ProjectBrief {
        ProjectBrief {
            app_type: self.app_type.clone(),
            app_name: self.app_name.clone(),
            short_description: self.short_description.clone(),
            detailed_description: self.detailed_description.clone(),
            core_features: self.core_features.clone(),
            target_users: self.target_users.clone(),
            reference_apps: self.reference_apps.clone(),
            user_level: user_level(&self.user_level),
        }
    }
}

/// POST /api/generate-docs — generate one planning document.
pub async fn generate_docs(
    State(app): State<AppState>,
    ApiJson(req): ApiJson<GenerateDocsRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    require(&req.api_key, "apiKey")?;
    let client = app.llm(vendor(&req.ai_provider)?, &req.api_key)?;
    let doc_type: DocumentType = req.document_type.trim().parse()?;

    let brief = req.brief();
    tracing::info!(vendor = %client.vendor(), %doc_type, "generating document");
    let content = client
        .generate(
            &prompt::system_prompt(brief.user_level, doc_type),
            &prompt::user_prompt(&brief),
            &prompt::document_options(),
        )
        .await?;

    Ok(Json(serde_json::json!({
        "content": content,
        "documentType": doc_type,
    })))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateFeatureRequest {
    pub ai_provider: String,
    pub api_key: String,
    pub project_context: String,
    pub feature_name: String,
    pub feature_description: String,
    pub user_level: String,
    pub document_types: Vec<String>,
    /// When set, the feature and each generated document are stored under
    /// this project as they are produced.
    pub project_uid: Option<String>,
}

/// POST /api/generate-feature — generate documents for an added feature,
/// one type at a time.
pub async fn generate_feature(
    State(app): State<AppState>,
    ApiJson(req): ApiJson<GenerateFeatureRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    require(&req.api_key, "apiKey")?;
    require(&req.feature_name, "featureName")?;
    let client = app.llm(vendor(&req.ai_provider)?, &req.api_key)?;

    let feature_id = match req.project_uid.as_deref().map(str::trim) {
        Some(uid) if !uid.is_empty() => {
            let (uid, name, description) = (
                uid.to_string(),
                req.feature_name.clone(),
                req.feature_description.clone(),
            );
            let feature = app
                .with_store(move |s| s.add_feature(&uid, &name, &description))
                .await?;
            Some(feature.id)
        }
        _ => None,
    };

    let subject = Subject::Feature {
        level: user_level(&req.user_level),
        project_context: &req.project_context,
        name: &req.feature_name,
        description: &req.feature_description,
    };
    let report = generate_each(
        &client,
        &subject,
        &req.document_types,
        &prompt::feature_options(),
        |doc_type, content| {
            let app = app.clone();
            async move {
                if let Some(id) = feature_id {
                    app.with_store(move |s| s.add_feature_document(id, doc_type, &content))
                        .await?;
                }
                Ok::<(), AppError>(())
            }
        },
    )
    .await;

    Ok(Json(serde_json::json!({
        "documents": report.documents,
        "errors": report.errors,
        "featureName": req.feature_name,
        "featureId": feature_id,
    })))
}
