pub mod ai_config;
pub mod crawl;
pub mod documents;
pub mod features;
pub mod generate;
pub mod progress;
pub mod projects;
pub mod screenshot;
pub mod themes;
pub mod todos;
pub mod wizard;

use crate::error::AppError;
use llm_client::Vendor;
use vibeplan_core::error::VibeError;
use vibeplan_core::types::UserLevel;

// ---------------------------------------------------------------------------
// Shared request validation
// ---------------------------------------------------------------------------

/// Fail with a 400 naming `field` when `value` is blank.
pub(crate) fn require(value: &str, field: &'static str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(VibeError::MissingInput(field).into());
    }
    Ok(())
}

pub(crate) fn vendor(raw: &str) -> Result<Vendor, AppError> {
    Ok(raw.trim().parse::<Vendor>()?)
}

/// Unknown or missing levels fall back to beginner.
pub(crate) fn user_level(raw: &str) -> UserLevel {
    raw.trim().parse().unwrap_or_default()
}
