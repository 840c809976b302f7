//! Deterministic prompt construction for every model call.
//!
//! Prompts are plain functions of their inputs. The same brief always yields
//! the same system and user text, which keeps generation reproducible and
//! testable without a vendor.

use crate::types::{DocumentType, UserLevel};
use llm_client::GenerateOptions;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Everything the wizard collects about the app being planned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectBrief {
    pub app_type: String,
    pub app_name: String,
    pub short_description: String,
    pub detailed_description: String,
    pub core_features: Vec<String>,
    pub target_users: String,
    pub reference_apps: String,
    pub user_level: UserLevel,
}

/// A todo as presented to the progress analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoRef {
    #[serde(deserialize_with = "crate::todo::id_string")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: String,
}

// ---------------------------------------------------------------------------
// Request presets
// ---------------------------------------------------------------------------

pub fn document_options() -> GenerateOptions {
    GenerateOptions::new(4000).with_temperature(0.7)
}

pub fn feature_options() -> GenerateOptions {
    GenerateOptions::new(3000).with_temperature(0.7)
}

pub fn progress_options() -> GenerateOptions {
    GenerateOptions::new(2000).with_temperature(0.3)
}

/// Vision requests carry no temperature.
pub fn screenshot_options() -> GenerateOptions {
    GenerateOptions::new(2000)
}

// ---------------------------------------------------------------------------
// Project documents
// ---------------------------------------------------------------------------

fn level_guide(level: UserLevel) -> &'static str {
    match level {
        UserLevel::Beginner => {
            "Explain things simply and in detail so a beginner can follow. \
             Briefly unpack any technical term you use."
        }
        UserLevel::Intermediate => {
            "Write for an intermediate developer. Basic terminology can be used \
             without explanation."
        }
        UserLevel::Advanced => "Write concisely and stick to the essentials for an experienced developer.",
    }
}

fn sections(doc_type: DocumentType) -> (&'static str, &'static [&'static str]) {
    match doc_type {
        DocumentType::Planning => (
            "Write a planning document. Include these sections:",
            &[
                "Project overview",
                "Goals and scope",
                "Key features summary",
                "Target users",
                "Success metrics",
                "Estimated schedule",
                "Risks and mitigations",
            ],
        ),
        DocumentType::Prd => (
            "Write a PRD (product requirements document). Include these sections:",
            &[
                "Product overview",
                "User personas",
                "User stories (in user-story format)",
                "Functional requirements (in detail)",
                "Non-functional requirements",
                "Priorities and milestones",
                "Constraints and assumptions",
            ],
        ),
        DocumentType::Trd => (
            "Write a TRD (technical requirements document). Include these sections:",
            &[
                "Technical overview",
                "System architecture",
                "Recommended tech stack",
                "API design",
                "Data model",
                "Security requirements",
                "Performance requirements",
                "Deployment strategy",
            ],
        ),
        DocumentType::Tdd => (
            "Write a TDD test plan. Include these sections:",
            &[
                "Test strategy overview",
                "Test environment setup",
                "Test cases per feature (as a table)",
                "End-to-end tests based on user scenarios",
                "Example test code",
                "Coverage goals",
                "Red-green-refactor workflow guide",
            ],
        ),
        DocumentType::Todo => (
            "Write a TODO list in this format:",
            &[
                "Group items by phase (setup, UI, features, testing, deployment)",
                "Mark each item's priority (high/medium/low)",
                "Include an estimated duration",
                "Note dependencies",
                "Use checklist format",
            ],
        ),
    }
}

fn numbered(items: &[&str]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{}. {s}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

fn base_prompt(level: UserLevel) -> String {
    format!(
        "You are an expert at writing software development documents.\n\
         {}\n\
         Write the document in Markdown.",
        level_guide(level)
    )
}

pub fn system_prompt(level: UserLevel, doc_type: DocumentType) -> String {
    let (lead, items) = sections(doc_type);
    format!("{}\n\n{lead}\n{}", base_prompt(level), numbered(items))
}

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

pub fn user_prompt(brief: &ProjectBrief) -> String {
    let features = brief
        .core_features
        .iter()
        .map(|f| format!("- {f}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Write a document for the following app:\n\n\
         ## App info\n\
         - App type: {}\n\
         - App name: {}\n\
         - One-line description: {}\n\n\
         ## Detailed description\n\
         {}\n\n\
         ## Core features\n\
         {features}\n\n\
         ## Target users\n\
         {}\n\n\
         ## Reference apps\n\
         {}\n\n\
         Use the information above to write a thorough, complete document.",
        brief.app_type,
        brief.app_name,
        brief.short_description,
        brief.detailed_description,
        or_default(&brief.target_users, "general users"),
        or_default(&brief.reference_apps, "none"),
    )
}

// ---------------------------------------------------------------------------
// Feature documents
// ---------------------------------------------------------------------------

fn feature_sections(doc_type: DocumentType) -> (&'static str, &'static [&'static str]) {
    match doc_type {
        DocumentType::Prd => (
            "Write a feature PRD for the added feature:",
            &[
                "Feature overview",
                "User stories",
                "Detailed functional requirements",
                "Relation to existing features",
                "Priority",
            ],
        ),
        DocumentType::Trd => (
            "Write a feature TRD for the added feature:",
            &[
                "Technical overview",
                "Implementation approach",
                "Required APIs and components",
                "Data structure changes",
                "Caveats",
            ],
        ),
        DocumentType::Tdd => (
            "Write test cases for the added feature:",
            &[
                "Test scenarios",
                "Unit test cases",
                "Integration test cases",
                "Example test code",
            ],
        ),
        DocumentType::Todo => (
            "Write TODO items for implementing the added feature:",
            &[
                "Checklist format",
                "Mark priority (high/medium/low)",
                "Include an estimated duration",
                "Keep items mergeable into the existing TODO list",
            ],
        ),
        DocumentType::Planning => sections(DocumentType::Planning),
    }
}

pub fn feature_system_prompt(level: UserLevel, doc_type: DocumentType) -> String {
    let (lead, items) = feature_sections(doc_type);
    format!(
        "{}\nYou are documenting a feature being added to an existing project.\n\n{lead}\n{}",
        base_prompt(level),
        numbered(items)
    )
}

pub fn feature_user_prompt(
    project_context: &str,
    feature_name: &str,
    feature_description: &str,
    doc_type: DocumentType,
) -> String {
    format!(
        "## Existing project\n\
         {project_context}\n\n\
         ## Feature to add\n\
         - Feature name: {feature_name}\n\
         - Feature description: {feature_description}\n\n\
         Using the information above, write a {} document for the added feature.\n\
         Take its relation to the existing project into account.",
        doc_type.as_str().to_uppercase()
    )
}

// ---------------------------------------------------------------------------
// Progress analysis
// ---------------------------------------------------------------------------

pub const PROGRESS_SYSTEM_PROMPT: &str = r#"You are an expert at analyzing software development progress.
Analyze the codebase information the user provides and decide whether each TODO item is complete.

Return a JSON array with one entry per TODO item in this format:
[
  {
    "todoId": "TODO id",
    "todoTitle": "TODO title",
    "isCompleted": true/false,
    "confidence": confidence between 0.0 and 1.0,
    "reason": "short reason for the verdict"
  }
]

Criteria:
- Whether related files or folders exist
- Whether code implementing the feature exists
- Whether the commit history shows related work

Use a low confidence when you are unsure.
Return only the JSON, with no other explanation."#;

pub fn progress_user_prompt(codebase_info: &str, todos: &[TodoRef]) -> String {
    let list = todos
        .iter()
        .map(|t| {
            let description = t
                .description
                .as_deref()
                .filter(|d| !d.trim().is_empty())
                .unwrap_or("no description");
            format!("- [{}] {} ({}): {description}", t.id, t.title, t.category)
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "## Codebase information\n\
         {codebase_info}\n\n\
         ## TODO items\n\
         {list}\n\n\
         Using the information above, decide whether each TODO item is complete."
    )
}

// ---------------------------------------------------------------------------
// Screenshot analysis
// ---------------------------------------------------------------------------

pub const SCREENSHOT_SYSTEM_PROMPT: &str = r#"You are an expert at analyzing web design.
Extract the following from the image and return it as JSON:

{
  "colors": [
    {
      "hex": "RRGGBB hex code with leading hash",
      "name": "color name",
      "usage": "where it is used (background, button, text, ...)"
    }
  ],
  "typography": [
    {
      "fontFamily": "best-guess font",
      "fontSize": "estimated size",
      "fontWeight": "weight",
      "usage": "where it is used"
    }
  ],
  "layoutStyle": "description of the layout style",
  "designCharacteristics": ["trait 1", "trait 2"],
  "tailwindConfig": "Tailwind CSS color configuration code",
  "cssVariables": "CSS variable code",
  "aiPrompt": "a prompt describing this design to an AI"
}

Return only the JSON, with no other explanation."#;

pub const SCREENSHOT_INSTRUCTION: &str = "Analyze the design of this website screenshot.";

#[cfg(test)]
mod tests {
    use super::*;

    fn brief() -> ProjectBrief {
        ProjectBrief {
            app_type: "web".into(),
            app_name: "Shelf".into(),
            short_description: "track books".into(),
            detailed_description: "A reading log with reminders.".into(),
            core_features: vec!["login".into(), "reading log".into()],
            ..Default::default()
        }
    }

    #[test]
    fn system_prompt_lists_type_sections() {
        let p = system_prompt(UserLevel::Advanced, DocumentType::Trd);
        assert!(p.contains("1. Technical overview"));
        assert!(p.contains("8. Deployment strategy"));
        assert!(p.contains("experienced developer"));
    }

    #[test]
    fn every_type_and_level_has_a_prompt() {
        for t in DocumentType::all() {
            for l in [UserLevel::Beginner, UserLevel::Intermediate, UserLevel::Advanced] {
                assert!(system_prompt(l, *t).contains("1. "));
                assert!(feature_system_prompt(l, *t).contains("1. "));
            }
        }
    }

    #[test]
    fn user_prompt_fills_defaults() {
        let p = user_prompt(&brief());
        assert!(p.contains("- App name: Shelf"));
        assert!(p.contains("## Core features\n- login\n- reading log"));
        assert!(p.contains("## Target users\ngeneral users"));
        assert!(p.contains("## Reference apps\nnone"));
    }

    #[test]
    fn user_prompt_is_deterministic() {
        assert_eq!(user_prompt(&brief()), user_prompt(&brief()));
    }

    #[test]
    fn feature_prompt_names_type_in_caps() {
        let p = feature_user_prompt("Shelf: reading log", "Export", "CSV export", DocumentType::Tdd);
        assert!(p.contains("write a TDD document"));
        assert!(p.contains("- Feature name: Export"));
    }

    #[test]
    fn progress_prompt_lists_todos() {
        let todos = vec![
            TodoRef {
                id: "1".into(),
                title: "Login".into(),
                description: None,
                category: "auth".into(),
            },
            TodoRef {
                id: "2".into(),
                title: "Deploy".into(),
                description: Some("to fly.io".into()),
                category: "ops".into(),
            },
        ];
        let p = progress_user_prompt("src/auth.rs exists", &todos);
        assert!(p.contains("- [1] Login (auth): no description"));
        assert!(p.contains("- [2] Deploy (ops): to fly.io"));
    }

    #[test]
    fn todo_ref_accepts_numeric_and_string_ids() {
        let todos: Vec<TodoRef> = serde_json::from_value(serde_json::json!([
            {"id": 7, "title": "Login", "category": "auth"},
            {"id": "8", "title": "Deploy"}
        ]))
        .unwrap();
        assert_eq!(todos[0].id, "7");
        assert_eq!(todos[1].id, "8");
        assert!(serde_json::from_value::<TodoRef>(serde_json::json!({"id": null, "title": "x"})).is_err());
    }

    #[test]
    fn presets_match_call_sites() {
        assert_eq!(document_options().max_tokens, 4000);
        assert_eq!(feature_options().max_tokens, 3000);
        assert_eq!(progress_options().temperature, Some(0.3));
        assert_eq!(screenshot_options().temperature, None);
    }
}
