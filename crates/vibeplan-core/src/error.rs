use thiserror::Error;

#[derive(Debug, Error)]
pub enum VibeError {
    #[error("project not found: {0}")]
    ProjectNotFound(String),

    #[error("document not found: {0}")]
    DocumentNotFound(i64),

    #[error("todo not found: {0}")]
    TodoNotFound(i64),

    #[error("feature not found: {0}")]
    FeatureNotFound(i64),

    #[error("saved theme not found: {0}")]
    ThemeNotFound(i64),

    #[error("invalid document type: {0}")]
    InvalidDocumentType(String),

    #[error("invalid todo status: {0}")]
    InvalidTodoStatus(String),

    #[error("invalid priority: {0}")]
    InvalidPriority(String),

    #[error("invalid user level: {0}")]
    InvalidUserLevel(String),

    #[error("invalid theme source: {0}")]
    InvalidThemeSource(String),

    #[error("{0} is required")]
    MissingInput(&'static str),

    #[error("invalid todo order: {0}")]
    InvalidTodoOrder(String),

    /// The model answered, but no parseable JSON was found in its text.
    #[error("failed to parse AI response: {reason}")]
    ResponseShape { reason: String, raw: String },

    #[error(transparent)]
    Db(#[from] rusqlite::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, VibeError>;
