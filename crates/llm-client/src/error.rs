use thiserror::Error;

use crate::types::Vendor;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API key is required")]
    MissingApiKey,

    #[error("unsupported AI provider: {0}")]
    UnknownVendor(String),

    #[error("{vendor} does not support {operation}")]
    Unsupported {
        vendor: Vendor,
        operation: &'static str,
    },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{vendor} API error ({status}): {message}")]
    Api {
        vendor: Vendor,
        status: u16,
        message: String,
    },

    #[error("failed to decode {vendor} response: {source}")]
    Decode {
        vendor: Vendor,
        #[source]
        source: serde_json::Error,
    },
}
