use crate::output::{print_json, print_table, truncate};
use crate::root::open_store;
use clap::Subcommand;
use std::path::Path;
use vibeplan_core::todo::{NewTodo, Todo, TodoUpdate};
use vibeplan_core::types::{Priority, TodoStatus};

#[derive(Subcommand)]
pub enum TodoSubcommand {
    /// Add a todo to the end of a project's backlog
    Add {
        uid: String,
        #[arg(required = true)]
        title: Vec<String>,
        #[arg(long)]
        description: Option<String>,
        /// low, medium or high
        #[arg(long, default_value = "medium")]
        priority: String,
        #[arg(long, default_value = "")]
        category: String,
        /// Estimated effort in days
        #[arg(long)]
        days: Option<f64>,
    },
    /// List a project's todos
    List {
        uid: String,
        /// Only todos in this status (backlog, in_progress, review, done)
        #[arg(long)]
        status: Option<String>,
    },
    /// Move a todo to another status
    Move {
        id: i64,
        status: String,
        /// Position within the target status
        #[arg(long)]
        order: Option<i64>,
    },
    /// Edit todo fields
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        days: Option<f64>,
    },
    /// Delete a todo
    Delete { id: i64 },
    /// Show a project's completion
    Progress { uid: String },
    /// Set the order of every todo in one status column
    Reorder {
        uid: String,
        status: String,
        #[arg(required = true)]
        ids: Vec<i64>,
    },
}

pub fn run(data_dir: &Path, subcmd: TodoSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        TodoSubcommand::Add {
            uid,
            title,
            description,
            priority,
            category,
            days,
        } => {
            let new = NewTodo {
                title: title.join(" "),
                description,
                priority: priority.parse()?,
                category,
                estimated_days: days,
            };
            add(data_dir, &uid, &new, json)
        }
        TodoSubcommand::List { uid, status } => {
            let status = status.map(|s| s.parse::<TodoStatus>()).transpose()?;
            list(data_dir, &uid, status, json)
        }
        TodoSubcommand::Move { id, status, order } => {
            move_to(data_dir, id, status.parse()?, order, json)
        }
        TodoSubcommand::Edit {
            id,
            title,
            description,
            priority,
            category,
            days,
        } => {
            let update = TodoUpdate {
                title,
                description,
                priority: priority.map(|p| p.parse::<Priority>()).transpose()?,
                category,
                estimated_days: days,
            };
            edit(data_dir, id, &update, json)
        }
        TodoSubcommand::Delete { id } => delete(data_dir, id, json),
        TodoSubcommand::Progress { uid } => progress(data_dir, &uid, json),
        TodoSubcommand::Reorder { uid, status, ids } => {
            reorder(data_dir, &uid, status.parse()?, &ids, json)
        }
    }
}

fn print_todos(todos: &[Todo]) {
    let rows = todos
        .iter()
        .map(|t| {
            vec![
                t.id.to_string(),
                t.status.to_string(),
                t.order.to_string(),
                t.priority.to_string(),
                t.category.clone(),
                truncate(&t.title, 50),
            ]
        })
        .collect();
    print_table(&["ID", "STATUS", "ORDER", "PRIORITY", "CATEGORY", "TITLE"], rows);
}

fn add(data_dir: &Path, uid: &str, new: &NewTodo, json: bool) -> anyhow::Result<()> {
    let mut store = open_store(data_dir)?;
    let todo = store.add_todo(uid, new)?;

    if json {
        print_json(&todo)?;
    } else {
        println!("Added todo [{}]: {}", todo.id, todo.title);
    }
    Ok(())
}

fn list(data_dir: &Path, uid: &str, status: Option<TodoStatus>, json: bool) -> anyhow::Result<()> {
    let store = open_store(data_dir)?;
    let todos = store.list_todos(uid, status)?;

    if json {
        return print_json(&todos);
    }
    if todos.is_empty() {
        println!("No todos.");
        return Ok(());
    }
    print_todos(&todos);
    Ok(())
}

fn move_to(
    data_dir: &Path,
    id: i64,
    status: TodoStatus,
    order: Option<i64>,
    json: bool,
) -> anyhow::Result<()> {
    let mut store = open_store(data_dir)?;
    let todo = store.move_todo(id, status, order)?;

    if json {
        print_json(&todo)?;
    } else {
        println!("Moved todo [{}] to {}", todo.id, todo.status.label());
    }
    Ok(())
}

fn edit(data_dir: &Path, id: i64, update: &TodoUpdate, json: bool) -> anyhow::Result<()> {
    let mut store = open_store(data_dir)?;
    let todo = store.update_todo(id, update)?;

    if json {
        print_json(&todo)?;
    } else {
        println!("Updated todo [{}]", todo.id);
    }
    Ok(())
}

fn delete(data_dir: &Path, id: i64, json: bool) -> anyhow::Result<()> {
    let mut store = open_store(data_dir)?;
    let progress = store.delete_todo(id)?;

    if json {
        print_json(&serde_json::json!({ "deleted": id, "progress": progress }))?;
    } else {
        println!("Deleted todo [{id}]");
    }
    Ok(())
}

fn progress(data_dir: &Path, uid: &str, json: bool) -> anyhow::Result<()> {
    let store = open_store(data_dir)?;
    let progress = store.progress(uid)?;

    if json {
        print_json(&progress)?;
    } else {
        println!(
            "{}% ({}/{} done)",
            progress.percentage, progress.completed, progress.total
        );
    }
    Ok(())
}

fn reorder(
    data_dir: &Path,
    uid: &str,
    status: TodoStatus,
    ids: &[i64],
    json: bool,
) -> anyhow::Result<()> {
    let mut store = open_store(data_dir)?;
    let todos = store.reorder_todos(uid, status, ids)?;

    if json {
        print_json(&todos)?;
    } else {
        print_todos(&todos);
    }
    Ok(())
}
