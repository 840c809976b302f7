use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use llm_client::LlmError;
use vibeplan_core::error::VibeError;

use crate::crawl::CrawlError;

// ---------------------------------------------------------------------------
// Internal sentinel for explicit 400 Bad Request errors
// ---------------------------------------------------------------------------

/// Carries an explicit HTTP 400 through the `anyhow::Error` chain for input
/// problems that have no `VibeError` variant.
#[derive(Debug)]
struct BadRequestError(String);

impl std::fmt::Display for BadRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for BadRequestError {}

// ---------------------------------------------------------------------------
// AppError: unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses. Always renders `{"error": ...}`;
/// AI response-shape failures add `"raw"` with the model's text.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(BadRequestError(msg.into()).into())
    }

    pub fn join(e: tokio::task::JoinError) -> Self {
        Self(anyhow::anyhow!("task join error: {e}"))
    }
}

fn vibe_status(e: &VibeError) -> StatusCode {
    match e {
        VibeError::ProjectNotFound(_)
        | VibeError::DocumentNotFound(_)
        | VibeError::TodoNotFound(_)
        | VibeError::FeatureNotFound(_)
        | VibeError::ThemeNotFound(_) => StatusCode::NOT_FOUND,
        VibeError::InvalidDocumentType(_)
        | VibeError::InvalidTodoStatus(_)
        | VibeError::InvalidPriority(_)
        | VibeError::InvalidUserLevel(_)
        | VibeError::InvalidThemeSource(_)
        | VibeError::MissingInput(_)
        | VibeError::InvalidTodoOrder(_) => StatusCode::BAD_REQUEST,
        VibeError::ResponseShape { .. }
        | VibeError::Db(_)
        | VibeError::Io(_)
        | VibeError::Yaml(_)
        | VibeError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Extractor rejections carry axum's own description of what was wrong.
fn rejection_text(e: &anyhow::Error) -> Option<String> {
    if let Some(r) = e.downcast_ref::<JsonRejection>() {
        Some(r.body_text())
    } else if let Some(r) = e.downcast_ref::<QueryRejection>() {
        Some(r.body_text())
    } else {
        e.downcast_ref::<PathRejection>().map(|r| r.body_text())
    }
}

fn llm_status(e: &LlmError) -> StatusCode {
    match e {
        LlmError::MissingApiKey | LlmError::UnknownVendor(_) | LlmError::Unsupported { .. } => {
            StatusCode::BAD_REQUEST
        }
        LlmError::Network(_) | LlmError::Api { .. } | LlmError::Decode { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(b) = self.0.downcast_ref::<BadRequestError>() {
            let body = serde_json::json!({ "error": b.0.clone() });
            return (StatusCode::BAD_REQUEST, axum::Json(body)).into_response();
        }

        if let Some(text) = rejection_text(&self.0) {
            let body = serde_json::json!({ "error": text });
            return (StatusCode::BAD_REQUEST, axum::Json(body)).into_response();
        }

        if let Some(VibeError::ResponseShape { reason, raw }) = self.0.downcast_ref::<VibeError>() {
            tracing::warn!(%reason, "unparseable AI response");
            let body = serde_json::json!({
                "error": format!("failed to parse AI response: {reason}"),
                "raw": raw,
            });
            return (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response();
        }

        let status = if let Some(e) = self.0.downcast_ref::<VibeError>() {
            vibe_status(e)
        } else if let Some(e) = self.0.downcast_ref::<LlmError>() {
            llm_status(e)
        } else if let Some(e) = self.0.downcast_ref::<CrawlError>() {
            match e {
                CrawlError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
                CrawlError::Fetch { .. } | CrawlError::Status { .. } => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        if status.is_server_error() {
            tracing::error!(error = %format!("{:#}", self.0), "request failed");
        }
        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use llm_client::Vendor;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn project_not_found_maps_to_404() {
        let err = AppError(VibeError::ProjectNotFound("p".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn todo_not_found_maps_to_404() {
        let err = AppError(VibeError::TodoNotFound(3).into());
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn missing_input_maps_to_400() {
        let err = AppError(VibeError::MissingInput("apiKey").into());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn invalid_status_maps_to_400() {
        let err = AppError(VibeError::InvalidTodoStatus("later".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unknown_vendor_maps_to_400() {
        let err = AppError(LlmError::UnknownVendor("mistral".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn vendor_api_failure_maps_to_500() {
        let err = AppError(
            LlmError::Api {
                vendor: Vendor::OpenAi,
                status: 429,
                message: "rate limited".into(),
            }
            .into(),
        );
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn invalid_url_maps_to_400() {
        let err = AppError(CrawlError::InvalidUrl("nope".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn bad_request_constructor_maps_to_400() {
        let err = AppError::bad_request("confirm=true is required");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn plain_anyhow_maps_to_500() {
        let err = AppError(anyhow::anyhow!("something unexpected"));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn response_shape_carries_raw_text() {
        let err = AppError(
            VibeError::ResponseShape {
                reason: "no JSON array found in response".into(),
                raw: "sorry, no idea".into(),
            }
            .into(),
        );
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["raw"], "sorry, no idea");
        assert!(body["error"].as_str().unwrap().contains("failed to parse"));
    }

    #[tokio::test]
    async fn json_rejection_maps_to_400_with_error_body() {
        let rejection = axum::Json::<serde_json::Value>::from_bytes(b"{not json")
            .err()
            .unwrap();
        let response = AppError::from(rejection).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("JSON"));
    }

    #[tokio::test]
    async fn body_has_error_field() {
        let body = body_json(AppError(VibeError::ThemeNotFound(9).into()).into_response()).await;
        assert_eq!(body["error"], "saved theme not found: 9");
    }
}
