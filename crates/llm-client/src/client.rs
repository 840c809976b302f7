use crate::types::{Endpoints, GenerateOptions, ImageInput, Vendor};
use crate::{anthropic, google, openai, LlmError, Result};

/// A vendor-tagged text-generation client.
///
/// Holds the caller-supplied API key for the lifetime of one request flow.
/// Nothing here persists the key.
#[derive(Debug, Clone)]
pub struct LlmClient {
    vendor: Vendor,
    api_key: String,
    http: reqwest::Client,
    endpoints: Endpoints,
}

impl LlmClient {
    /// Build a client for `vendor`. Fails with [`LlmError::MissingApiKey`]
    /// when the key is blank.
    pub fn new(vendor: Vendor, api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::MissingApiKey);
        }
        Ok(Self {
            vendor,
            api_key,
            http: reqwest::Client::new(),
            endpoints: Endpoints::default(),
        })
    }

    /// Reuse an existing connection pool.
    pub fn with_http(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn vendor(&self) -> Vendor {
        self.vendor
    }

    /// Send one system + user prompt pair and return the raw response text.
    ///
    /// An empty string is returned when the vendor answers successfully but
    /// without any text content.
    pub async fn generate(
        &self,
        system: &str,
        user: &str,
        opts: &GenerateOptions,
    ) -> Result<String> {
        tracing::debug!(
            vendor = %self.vendor,
            max_tokens = opts.max_tokens,
            "sending text generation request"
        );
        match self.vendor {
            Vendor::OpenAi => {
                let body = openai::chat_body(system, user, opts);
                openai::complete(&self.http, &self.endpoints.openai, &self.api_key, &body).await
            }
            Vendor::Claude => {
                let body = anthropic::messages_body(system, user, opts);
                anthropic::complete(&self.http, &self.endpoints.anthropic, &self.api_key, &body)
                    .await
            }
            Vendor::Google => {
                let body = google::generate_body(system, user, opts);
                let model = opts.model_for(Vendor::Google);
                google::complete(
                    &self.http,
                    &self.endpoints.google,
                    &self.api_key,
                    &model,
                    &body,
                )
                .await
            }
        }
    }

    /// Ask a vision-capable model about an image. Only OpenAI is wired up.
    pub async fn describe_image(
        &self,
        system: &str,
        instruction: &str,
        image: &ImageInput,
        opts: &GenerateOptions,
    ) -> Result<String> {
        match self.vendor {
            Vendor::OpenAi => {
                let body = openai::vision_body(system, instruction, image, opts);
                openai::complete(&self.http, &self.endpoints.openai, &self.api_key, &body).await
            }
            other => Err(LlmError::Unsupported {
                vendor: other,
                operation: "image analysis",
            }),
        }
    }
}

/// Return the response body when the status is 2xx, otherwise an
/// [`LlmError::Api`] carrying the vendor's own error message if it sent one.
pub(crate) async fn read_success(vendor: Vendor, resp: reqwest::Response) -> Result<String> {
    let status = resp.status();
    let body = resp.text().await?;
    if status.is_success() {
        return Ok(body);
    }
    Err(LlmError::Api {
        vendor,
        status: status.as_u16(),
        message: error_message(&body),
    })
}

/// All three vendors nest the message as `{"error": {"message": "..."}}`.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_key_is_rejected() {
        let err = LlmClient::new(Vendor::OpenAi, "  ").unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey));
    }

    #[test]
    fn error_message_prefers_nested_message() {
        let msg = error_message(r#"{"error":{"message":"invalid x-api-key","type":"auth"}}"#);
        assert_eq!(msg, "invalid x-api-key");
    }

    #[test]
    fn error_message_falls_back_to_body() {
        assert_eq!(error_message("  Bad Gateway \n"), "Bad Gateway");
    }
}
