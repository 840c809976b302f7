use crate::error::Result;
use crate::{io, paths};
use llm_client::{GenerateOptions, LlmClient, Vendor};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Which vendor and key to use for locally triggered generation.
///
/// Lives in `<data-dir>/ai-config.yaml`. A missing file loads as the default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiConfig {
    #[serde(default)]
    pub provider: Vendor,
    /// Model override; `None` uses the vendor's default model.
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub api_key: String,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: Vendor::Google,
            model: Some(DEFAULT_MODEL.to_string()),
            api_key: String::new(),
        }
    }
}

/// What `GET /api/ai-config` and `config show` expose. The key itself never
/// leaves the data directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiConfigView {
    pub provider: Vendor,
    pub model: String,
    pub configured: bool,
    pub api_key_hint: Option<String>,
}

impl AiConfig {
    pub fn load(data_dir: &Path) -> Result<Self> {
        match io::read_optional(&paths::ai_config_path(data_dir))? {
            Some(data) => Ok(serde_yaml::from_str(&data)?),
            None => Ok(Self::default()),
        }
    }

    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        io::atomic_write(&paths::ai_config_path(data_dir), data.as_bytes())
    }

    /// Delete the stored config. Returns false if there was none.
    pub fn clear(data_dir: &Path) -> Result<bool> {
        io::remove_if_exists(&paths::ai_config_path(data_dir))
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Switch vendor. A model override chosen for another vendor is dropped.
    pub fn set_provider(&mut self, provider: Vendor) {
        if provider != self.provider {
            self.model = None;
        }
        self.provider = provider;
    }

    pub fn effective_model(&self) -> &str {
        self.model
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(self.provider.default_model())
    }

    /// Apply the model override to a request preset.
    pub fn options(&self, base: GenerateOptions) -> GenerateOptions {
        base.with_model(self.model.clone())
    }

    pub fn client(&self) -> llm_client::Result<LlmClient> {
        LlmClient::new(self.provider, self.api_key.clone())
    }

    pub fn view(&self) -> AiConfigView {
        let key = self.api_key.trim();
        let api_key_hint = (!key.is_empty()).then(|| {
            let tail: String = key
                .chars()
                .rev()
                .take(4)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            format!("…{tail}")
        });
        AiConfigView {
            provider: self.provider,
            model: self.effective_model().to_string(),
            configured: self.is_configured(),
            api_key_hint,
        }
    }
}
