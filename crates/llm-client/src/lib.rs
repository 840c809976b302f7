//! `llm-client`: one text-generation interface over three vendor HTTP APIs.
//!
//! Every caller in the workspace talks to a large-language model through
//! [`LlmClient::generate`]. The concrete request shape (message roles, token
//! ceiling field names, auth headers) is chosen by the [`Vendor`] tag the
//! client was built with:
//!
//! ```text
//! LlmClient { vendor, api_key }
//!     │
//!     ├── Vendor::OpenAi  → POST {openai}/chat/completions        (Bearer)
//!     ├── Vendor::Claude  → POST {anthropic}/messages             (x-api-key)
//!     └── Vendor::Google  → POST {google}/models/{m}:generateContent?key=…
//! ```
//!
//! # Quick start
//!
//! ```rust,ignore
//! use llm_client::{GenerateOptions, LlmClient, Vendor};
//!
//! let client = LlmClient::new(Vendor::Claude, api_key)?;
//! let text = client
//!     .generate("You write PRDs.", "App: todo list", &GenerateOptions::default())
//!     .await?;
//! ```
//!
//! Base URLs are overridable through [`Endpoints`] so tests can point the
//! client at a local mock server.

mod anthropic;
pub mod client;
pub mod error;
mod google;
mod openai;
pub mod types;


pub use client::LlmClient;
pub use error::LlmError;
pub use types::{Endpoints, GenerateOptions, ImageInput, Vendor};

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, LlmError>;
