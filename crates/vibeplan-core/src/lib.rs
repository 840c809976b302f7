//! Domain model, storage and text processing for vibeplan.
//!
//! Everything here is synchronous. Callers that live on an async runtime
//! wrap [`Store`] calls in `spawn_blocking`.

pub mod config;
pub mod document;
pub mod error;
pub mod extract;
pub mod feature;
pub mod io;
pub mod markdown;
pub mod paths;
pub mod progress;
pub mod project;
pub mod prompt;
pub mod saved_theme;
pub mod store;
pub mod theme;
pub mod todo;
pub mod types;
pub mod wizard;

pub use error::{Result, VibeError};
pub use store::Store;
