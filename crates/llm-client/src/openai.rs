//! OpenAI chat-completions adapter.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::client::read_success;
use crate::types::{GenerateOptions, ImageInput, Vendor};
use crate::{LlmError, Result};

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

pub(crate) fn chat_body(system: &str, user: &str, opts: &GenerateOptions) -> Value {
    let mut body = json!({
        "model": opts.model_for(Vendor::OpenAi),
        "messages": [
            { "role": "system", "content": system },
            { "role": "user", "content": user },
        ],
        "max_tokens": opts.max_tokens,
    });
    if let Some(temp) = opts.temperature {
        body["temperature"] = json!(temp);
    }
    body
}

pub(crate) fn vision_body(
    system: &str,
    instruction: &str,
    image: &ImageInput,
    opts: &GenerateOptions,
) -> Value {
    let mut body = json!({
        "model": opts.model_for(Vendor::OpenAi),
        "messages": [
            { "role": "system", "content": system },
            {
                "role": "user",
                "content": [
                    { "type": "text", "text": instruction },
                    { "type": "image_url", "image_url": { "url": image.to_url() } },
                ],
            },
        ],
        "max_tokens": opts.max_tokens,
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
        .post(format!("{base}/chat/completions"))
        .bearer_auth(api_key)
        .json(body)
        .send()
        .await?;
    let text = read_success(Vendor::OpenAi, resp).await?;
    let parsed: ChatResponse = serde_json::from_str(&text).map_err(|source| LlmError::Decode {
        vendor: Vendor::OpenAi,
        source,
    })?;
    Ok(parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .unwrap_or_default())
}
