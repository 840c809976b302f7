use crate::error::VibeError;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Store a string-tagged enum as its `as_str()` text column.
macro_rules! text_column {
    ($ty:ty) => {
        impl ToSql for $ty {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $ty {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                value
                    .as_str()?
                    .parse()
                    .map_err(|e: VibeError| FromSqlError::Other(Box::new(e)))
            }
        }
    };
}

// ---------------------------------------------------------------------------
// DocumentType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Planning,
    Prd,
    Trd,
    Tdd,
    Todo,
}

impl DocumentType {
    pub fn all() -> &'static [DocumentType] {
        &[
            DocumentType::Planning,
            DocumentType::Prd,
            DocumentType::Trd,
            DocumentType::Tdd,
            DocumentType::Todo,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DocumentType::Planning => "planning",
            DocumentType::Prd => "prd",
            DocumentType::Trd => "trd",
            DocumentType::Tdd => "tdd",
            DocumentType::Todo => "todo",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            DocumentType::Planning => "Planning Document",
            DocumentType::Prd => "PRD",
            DocumentType::Trd => "TRD",
            DocumentType::Tdd => "Test Plan",
            DocumentType::Todo => "TODO List",
        }
    }

    pub fn summary(self) -> &'static str {
        match self {
            DocumentType::Planning => "project overview, goals, schedule",
            DocumentType::Prd => "product requirements, feature specification",
            DocumentType::Trd => "technical requirements, architecture",
            DocumentType::Tdd => "test strategy, test cases",
            DocumentType::Todo => "development task list",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DocumentType {
    type Err = VibeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "planning" => Ok(DocumentType::Planning),
            "prd" => Ok(DocumentType::Prd),
            "trd" => Ok(DocumentType::Trd),
            "tdd" => Ok(DocumentType::Tdd),
            "todo" => Ok(DocumentType::Todo),
            _ => Err(VibeError::InvalidDocumentType(s.to_string())),
        }
    }
}

text_column!(DocumentType);

// ---------------------------------------------------------------------------
// TodoStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoStatus {
    Backlog,
    InProgress,
    Review,
    Done,
}

impl TodoStatus {
    pub fn all() -> &'static [TodoStatus] {
        &[
            TodoStatus::Backlog,
            TodoStatus::InProgress,
            TodoStatus::Review,
            TodoStatus::Done,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TodoStatus::Backlog => "backlog",
            TodoStatus::InProgress => "in_progress",
            TodoStatus::Review => "review",
            TodoStatus::Done => "done",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TodoStatus::Backlog => "Backlog",
            TodoStatus::InProgress => "In progress",
            TodoStatus::Review => "Review",
            TodoStatus::Done => "Done",
        }
    }
}

impl fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TodoStatus {
    type Err = VibeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "backlog" => Ok(TodoStatus::Backlog),
            "in_progress" | "in-progress" => Ok(TodoStatus::InProgress),
            "review" => Ok(TodoStatus::Review),
            "done" => Ok(TodoStatus::Done),
            _ => Err(VibeError::InvalidTodoStatus(s.to_string())),
        }
    }
}

text_column!(TodoStatus);

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = VibeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(VibeError::InvalidPriority(s.to_string())),
        }
    }
}

text_column!(Priority);

// ---------------------------------------------------------------------------
// UserLevel
// ---------------------------------------------------------------------------

/// How much technical background the reader of generated documents has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl UserLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            UserLevel::Beginner => "beginner",
            UserLevel::Intermediate => "intermediate",
            UserLevel::Advanced => "advanced",
        }
    }
}

impl fmt::Display for UserLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserLevel {
    type Err = VibeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(UserLevel::Beginner),
            "intermediate" => Ok(UserLevel::Intermediate),
            "advanced" => Ok(UserLevel::Advanced),
            _ => Err(VibeError::InvalidUserLevel(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// ThemeSource
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeSource {
    Url,
    Screenshot,
}

impl ThemeSource {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeSource::Url => "url",
            ThemeSource::Screenshot => "screenshot",
        }
    }
}

impl fmt::Display for ThemeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ThemeSource {
    type Err = VibeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "url" => Ok(ThemeSource::Url),
            "screenshot" => Ok(ThemeSource::Screenshot),
            _ => Err(VibeError::InvalidThemeSource(s.to_string())),
        }
    }
}

text_column!(ThemeSource);
