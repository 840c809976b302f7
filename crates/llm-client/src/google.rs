//! Google Gemini `generateContent` adapter.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::client::read_success;
use crate::types::{GenerateOptions, Vendor};
use crate::{LlmError, Result};

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

pub(crate) fn generate_body(system: &str, user: &str, opts: &GenerateOptions) -> Value {
    let mut gen_config = json!({ "maxOutputTokens": opts.max_tokens });
    if let Some(temp) = opts.temperature {
        gen_config["temperature"] = json!(temp);
    }
    json!({
        "systemInstruction": { "parts": [{ "text": system }] },
        "contents": [{ "role": "user", "parts": [{ "text": user }] }],
        "generationConfig": gen_config,
    })
}

pub(crate) async fn complete(
    http: &reqwest::Client,
    base: &str,
    api_key: &str,
    model: &str,
    body: &Value,
) -> Result<String> {
    let resp = http
        .post(format!("{base}/models/{model}:generateContent"))
        .query(&[("key", api_key)])
        .json(body)
        .send()
        .await?;
    let text = read_success(Vendor::Google, resp).await?;
    let parsed: GenerateResponse =
        serde_json::from_str(&text).map_err(|source| LlmError::Decode {
            vendor: Vendor::Google,
            source,
        })?;
    let joined = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| {
            c.parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();
    Ok(joined)
}
