//! Sequential multi-document generation.
//!
//! Each requested type is generated in turn and handed to the caller's sink
//! as soon as it arrives, so a late failure never discards earlier work. A
//! failing type is recorded in `errors` and the loop moves on.

use llm_client::{GenerateOptions, LlmClient};
use serde::Serialize;
use std::collections::BTreeMap;
use vibeplan_core::prompt::{self, ProjectBrief};
use vibeplan_core::types::{DocumentType, UserLevel};

use crate::error::AppError;

#[derive(Debug, Default, Serialize)]
pub struct GenerationReport {
    /// Generated markdown keyed by document type.
    pub documents: BTreeMap<String, String>,
    /// Failure message keyed by the requested type string.
    pub errors: BTreeMap<String, String>,
}

/// What a document is being generated for.
pub enum Subject<'a> {
    Project(&'a ProjectBrief),
    Feature {
        level: UserLevel,
        project_context: &'a str,
        name: &'a str,
        description: &'a str,
    },
}

impl Subject<'_> {
    fn prompts(&self, doc_type: DocumentType) -> (String, String) {
        match self {
            Subject::Project(brief) => (
                prompt::system_prompt(brief.user_level, doc_type),
                prompt::user_prompt(brief),
            ),
            Subject::Feature {
                level,
                project_context,
                name,
                description,
            } => (
                prompt::feature_system_prompt(*level, doc_type),
                prompt::feature_user_prompt(project_context, name, description, doc_type),
            ),
        }
    }
}

/// Generate every type in `requested`, in order, calling `save` after each
/// success. Unknown type strings and save failures land in `errors` too.
pub async fn generate_each<S, Fut>(
    client: &LlmClient,
    subject: &Subject<'_>,
    requested: &[String],
    opts: &GenerateOptions,
    mut save: S,
) -> GenerationReport
where
    S: FnMut(DocumentType, String) -> Fut,
    Fut: std::future::Future<Output = Result<(), AppError>>,
{
    let mut report = GenerationReport::default();
    for raw in requested {
        let doc_type = match raw.parse::<DocumentType>() {
            Ok(t) => t,
            Err(e) => {
                report.errors.insert(raw.clone(), e.to_string());
                continue;
            }
        };
        tracing::info!(vendor = %client.vendor(), %doc_type, "generating document");
        let (system, user) = subject.prompts(doc_type);
        let content = match client.generate(&system, &user, opts).await {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(%doc_type, error = %e, "document generation failed");
                report.errors.insert(raw.clone(), e.to_string());
                continue;
            }
        };
        if let Err(e) = save(doc_type, content.clone()).await {
            tracing::warn!(%doc_type, error = %e.0, "saving generated document failed");
            report.errors.insert(raw.clone(), e.0.to_string());
            continue;
        }
        report.documents.insert(doc_type.as_str().to_string(), content);
    }
    report
}
