use crate::document::Document;
use crate::project::Project;
use crate::todo::Todo;
use crate::types::TodoStatus;
use std::fmt::Write as _;

/// Groups in the export's TODO section, finished work first.
const STATUS_SECTIONS: [TodoStatus; 4] = [
    TodoStatus::Done,
    TodoStatus::InProgress,
    TodoStatus::Review,
    TodoStatus::Backlog,
];

fn date(ts: &chrono::DateTime<chrono::Utc>) -> String {
    ts.format("%Y-%m-%d").to_string()
}

/// A single document with a small metadata block ahead of its content.
pub fn document_to_markdown(doc: &Document) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}", doc.title);
    out.push('\n');
    let _ = writeln!(out, "> Type: {}", doc.doc_type.title());
    let _ = writeln!(out, "> Created: {}", date(&doc.created_at));
    let _ = writeln!(out, "> Updated: {}", date(&doc.updated_at));
    out.push_str("\n---\n\n");
    out.push_str(doc.content.trim_end());
    out.push('\n');
    out
}

fn anchor(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('-'),
            c if c.is_alphanumeric() || c == '-' || c == '_' => Some(c),
            _ => None,
        })
        .collect()
}

fn todo_line(todo: &Todo) -> String {
    let mark = if todo.status == TodoStatus::Done { "x" } else { " " };
    if todo.category.is_empty() {
        format!("- [{mark}] {}", todo.title)
    } else {
        format!("- [{mark}] {} ({})", todo.title, todo.category)
    }
}

/// The whole project: metadata, table of contents, every document, then a
/// TODO status section grouped by status.
pub fn project_to_markdown(project: &Project, documents: &[Document], todos: &[Todo]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}", project.name);
    if !project.description.is_empty() {
        out.push('\n');
        let _ = writeln!(out, "{}", project.description);
    }
    out.push('\n');
    if !project.app_type.is_empty() {
        let _ = writeln!(out, "- App type: {}", project.app_type);
    }
    let _ = writeln!(out, "- Progress: {}%", project.progress);
    let _ = writeln!(out, "- Created: {}", date(&project.created_at));

    out.push_str("\n## Table of contents\n\n");
    for doc in documents {
        let _ = writeln!(out, "- [{}](#{})", doc.title, anchor(&doc.title));
    }
    if !todos.is_empty() {
        out.push_str("- [TODO status](#todo-status)\n");
    }

    for doc in documents {
        let _ = write!(out, "\n---\n\n## {}\n\n", doc.title);
        out.push_str(doc.content.trim_end());
        out.push('\n');
    }

    if !todos.is_empty() {
        out.push_str("\n---\n\n## TODO status\n");
        for status in STATUS_SECTIONS {
            let group: Vec<_> = todos.iter().filter(|t| t.status == status).collect();
            if group.is_empty() {
                continue;
            }
            let _ = write!(out, "\n### {} ({})\n\n", status.label(), group.len());
            for todo in group {
                let _ = writeln!(out, "{}", todo_line(todo));
            }
        }
    }
    out
}
