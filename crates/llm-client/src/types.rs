use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::LlmError;

// ─── Vendor ───────────────────────────────────────────────────────────────

/// The three supported model vendors. Serialized as `openai | claude | google`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Vendor {
    #[serde(rename = "openai")]
    OpenAi,
    #[serde(rename = "claude")]
    Claude,
    #[default]
    #[serde(rename = "google")]
    Google,
}

impl Vendor {
    pub fn all() -> &'static [Vendor] {
        &[Vendor::OpenAi, Vendor::Claude, Vendor::Google]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Vendor::OpenAi => "openai",
            Vendor::Claude => "claude",
            Vendor::Google => "google",
        }
    }

    /// Model used when the caller does not name one.
    pub fn default_model(self) -> &'static str {
        match self {
            Vendor::OpenAi => "gpt-4o",
            Vendor::Claude => "claude-sonnet-4-20250514",
            Vendor::Google => "gemini-1.5-pro",
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Vendor {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "openai" => Ok(Vendor::OpenAi),
            "claude" | "anthropic" => Ok(Vendor::Claude),
            "google" | "gemini" => Ok(Vendor::Google),
            _ => Err(LlmError::UnknownVendor(s.to_string())),
        }
    }
}

// ─── GenerateOptions ──────────────────────────────────────────────────────

/// Per-request sampling knobs. Every vendor receives the same values; only
/// the field names differ on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateOptions {
    /// Overrides [`Vendor::default_model`] when set.
    pub model: Option<String>,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            model: None,
            max_tokens: 4000,
            temperature: Some(0.7),
        }
    }
}

impl GenerateOptions {
    pub fn new(max_tokens: u32) -> Self {
        Self {
            model: None,
            max_tokens,
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model.filter(|m| !m.trim().is_empty());
        self
    }

    pub(crate) fn model_for(&self, vendor: Vendor) -> String {
        self.model
            .clone()
            .unwrap_or_else(|| vendor.default_model().to_string())
    }
}

// ─── ImageInput ───────────────────────────────────────────────────────────

/// An image attached to a vision request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageInput {
    /// Raw base64 PNG payload (no `data:` prefix).
    Base64(String),
    Url(String),
}

impl ImageInput {
    pub fn to_url(&self) -> String {
        match self {
            ImageInput::Base64(data) => format!("data:image/png;base64,{data}"),
            ImageInput::Url(url) => url.clone(),
        }
    }
}

// ─── Endpoints ────────────────────────────────────────────────────────────

/// Base URLs for each vendor API, without trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub openai: String,
    pub anthropic: String,
    pub google: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            openai: "https://api.openai.com/v1".to_string(),
            anthropic: "https://api.anthropic.com/v1".to_string(),
            google: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        }
    }
}

impl Endpoints {
    /// Point every vendor at the same base URL. Used by tests.
    pub fn all_at(base: impl Into<String>) -> Self {
        let base = base.into();
        let base = base.trim_end_matches('/').to_string();
        Self {
            openai: base.clone(),
            anthropic: base.clone(),
            google: base,
        }
    }
}
