use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use vibeplan_core::config::AiConfig;
use vibeplan_core::document::NewDocument;
use vibeplan_core::markdown;
use vibeplan_core::project::{NewProject, ProjectUpdate};
use vibeplan_core::prompt::{self, ProjectBrief};

use super::{user_level, vendor};
use crate::error::AppError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::generate::{generate_each, Subject};
use crate::state::AppState;

/// GET /api/projects — newest first.
pub async fn list_projects(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let projects = app.with_store(|s| s.list_projects()).await?;
    Ok(Json(serde_json::to_value(projects)?))
}

/// POST /api/projects
pub async fn create_project(
    State(app): State<AppState>,
    ApiJson(body): ApiJson<NewProject>,
) -> Result<Json<serde_json::Value>, AppError> {
    let project = app.with_store(move |s| s.create_project(&body)).await?;
    Ok(Json(serde_json::to_value(project)?))
}

/// GET /api/projects/{uid} — the project plus its live progress counts.
pub async fn get_project(
    State(app): State<AppState>,
    ApiPath(uid): ApiPath<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let (project, progress) = app
        .with_store(move |s| Ok((s.get_project(&uid)?, s.progress(&uid)?)))
        .await?;
    Ok(Json(serde_json::json!({
        "project": project,
        "progress": progress,
    })))
}

/// PATCH /api/projects/{uid}
pub async fn update_project(
    State(app): State<AppState>,
    ApiPath(uid): ApiPath<String>,
    ApiJson(body): ApiJson<ProjectUpdate>,
) -> Result<Json<serde_json::Value>, AppError> {
    let project = app
        .with_store(move |s| s.update_project(&uid, &body))
        .await?;
    Ok(Json(serde_json::to_value(project)?))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeleteParams {
    pub confirm: bool,
}

/// DELETE /api/projects/{uid}?confirm=true — removes the project and
/// everything under it.
pub async fn delete_project(
    State(app): State<AppState>,
    ApiPath(uid): ApiPath<String>,
    ApiQuery(params): ApiQuery<DeleteParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !params.confirm {
        return Err(AppError::bad_request(
            "deleting a project removes all of its data; pass confirm=true",
        ));
    }
    let deleted = app.with_store(move |s| s.delete_project(&uid)).await?;
    tracing::info!(?deleted, "project deleted");
    Ok(Json(serde_json::json!({ "deleted": deleted })))
}

/// GET /api/projects/{uid}/progress
pub async fn project_progress(
    State(app): State<AppState>,
    ApiPath(uid): ApiPath<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let progress = app.with_store(move |s| s.progress(&uid)).await?;
    Ok(Json(serde_json::to_value(progress)?))
}

/// GET /api/projects/{uid}/export — the whole project as one markdown file.
pub async fn export_project(
    State(app): State<AppState>,
    ApiPath(uid): ApiPath<String>,
) -> Result<impl IntoResponse, AppError> {
    let body = app
        .with_store(move |s| {
            let project = s.get_project(&uid)?;
            let documents = s.list_documents(&uid)?;
            let todos = s.list_todos(&uid, None)?;
            Ok(markdown::project_to_markdown(&project, &documents, &todos))
        })
        .await?;
    Ok(([(header::CONTENT_TYPE, "text/markdown; charset=utf-8")], body))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateProjectDocsRequest {
    /// Overrides the stored AI config for this call.
    pub ai_provider: Option<String>,
    pub api_key: Option<String>,
    pub user_level: String,
    pub core_features: Vec<String>,
    pub target_users: String,
    pub reference_apps: String,
    pub document_types: Vec<String>,
}

/// POST /api/projects/{uid}/generate — generate the requested document types
/// one after another, saving each to the project as soon as it arrives.
pub async fn generate_project_docs(
    State(app): State<AppState>,
    ApiPath(uid): ApiPath<String>,
    ApiJson(req): ApiJson<GenerateProjectDocsRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let lookup = uid.clone();
    let project = app.with_store(move |s| s.get_project(&lookup)).await?;

    let mut config = app.blocking(|dir| AiConfig::load(&dir)).await?;
    if let Some(raw) = req.ai_provider.as_deref().filter(|p| !p.trim().is_empty()) {
        config.set_provider(vendor(raw)?);
    }
    if let Some(key) = req.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
        config.api_key = key.to_string();
    }
    let client = app.llm(config.provider, &config.api_key)?;

    let brief = ProjectBrief {
        app_type: project.app_type.clone(),
        app_name: project.name.clone(),
        short_description: project.description.clone(),
        detailed_description: project.description.clone(),
        core_features: req.core_features.clone(),
        target_users: req.target_users.clone(),
        reference_apps: req.reference_apps.clone(),
        user_level: user_level(&req.user_level),
    };
    let report = generate_each(
        &client,
        &Subject::Project(&brief),
        &req.document_types,
        &config.options(prompt::document_options()),
        |doc_type, content| {
            let app = app.clone();
            let uid = uid.clone();
            async move {
                app.with_store(move |s| s.add_document(&uid, &NewDocument::new(doc_type, content)))
                    .await?;
                Ok::<(), AppError>(())
            }
        },
    )
    .await;

    Ok(Json(serde_json::to_value(report)?))
}
