//! Anthropic Messages API adapter.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::client::read_success;
use crate::types::{GenerateOptions, Vendor};
use crate::{LlmError, Result};

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: Option<String>,
}

pub(crate) fn messages_body(system: &str, user: &str, opts: &GenerateOptions) -> Value {
    let mut body = json!({
        "model": opts.model_for(Vendor::Claude),
        "max_tokens": opts.max_tokens,
        "system": system,
        "messages": [{ "role": "user", "content": user }],
    });
    if let Some(temp) = opts.temperature {
        body["temperature"] = json!(temp);
    }
    body
}

pub(crate) async fn complete(
    http: &reqwest::Client,
    base: &str,
    api_key: &str,
    body: &Value,
) -> Result<String> {
    let resp = http
        .post(format!("{base}/messages"))
        .header("x-api-key", api_key)
        .header("anthropic-version", ANTHROPIC_VERSION)
        .json(body)
        .send()
        .await?;
    let text = read_success(Vendor::Claude, resp).await?;
    let parsed: MessagesResponse =
        serde_json::from_str(&text).map_err(|source| LlmError::Decode {
            vendor: Vendor::Claude,
            source,
        })?;
    // First text block only; tool_use and thinking blocks are skipped.
    Ok(parsed
        .content
        .into_iter()
        .find(|b| b.block_type == "text")
        .and_then(|b| b.text)
        .unwrap_or_default())
}
