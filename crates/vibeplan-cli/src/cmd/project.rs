use crate::output::{print_json, print_table, truncate};
use crate::root::open_store;
use anyhow::{bail, Context};
use clap::Subcommand;
use std::path::{Path, PathBuf};
use vibeplan_core::markdown;
use vibeplan_core::project::{NewProject, ProjectUpdate};

#[derive(Subcommand)]
pub enum ProjectSubcommand {
    /// Create a project
    Create {
        #[arg(required = true)]
        name: Vec<String>,
        #[arg(long, default_value = "")]
        description: String,
        /// e.g. web, mobile, desktop
        #[arg(long, default_value = "")]
        app_type: String,
    },
    /// List projects, newest first
    List,
    /// Show a project with its progress
    Show { uid: String },
    /// Edit project fields
    Update {
        uid: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        app_type: Option<String>,
    },
    /// Delete a project with all its documents, todos and features
    Delete {
        uid: String,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Export the whole project as markdown
    Export {
        uid: String,
        /// Write to a file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

pub fn run(data_dir: &Path, subcmd: ProjectSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ProjectSubcommand::Create {
            name,
            description,
            app_type,
        } => create(data_dir, &name.join(" "), description, app_type, json),
        ProjectSubcommand::List => list(data_dir, json),
        ProjectSubcommand::Show { uid } => show(data_dir, &uid, json),
        ProjectSubcommand::Update {
            uid,
            name,
            description,
            app_type,
        } => update(
            data_dir,
            &uid,
            ProjectUpdate {
                name,
                description,
                app_type,
            },
            json,
        ),
        ProjectSubcommand::Delete { uid, yes } => delete(data_dir, &uid, yes, json),
        ProjectSubcommand::Export { uid, output } => export(data_dir, &uid, output.as_deref()),
    }
}

fn create(
    data_dir: &Path,
    name: &str,
    description: String,
    app_type: String,
    json: bool,
) -> anyhow::Result<()> {
    let mut store = open_store(data_dir)?;
    let project = store.create_project(&NewProject {
        name: name.to_string(),
        description,
        app_type,
    })?;

    if json {
        print_json(&project)?;
    } else {
        println!("Created project {} ({})", project.name, project.uid);
    }
    Ok(())
}

fn list(data_dir: &Path, json: bool) -> anyhow::Result<()> {
    let store = open_store(data_dir)?;
    let projects = store.list_projects()?;

    if json {
        return print_json(&projects);
    }
    if projects.is_empty() {
        println!("No projects.");
        return Ok(());
    }
    let rows = projects
        .iter()
        .map(|p| {
            vec![
                p.uid.clone(),
                truncate(&p.name, 40),
                p.app_type.clone(),
                format!("{}%", p.progress),
                p.updated_at.format("%Y-%m-%d").to_string(),
            ]
        })
        .collect();
    print_table(&["UID", "NAME", "TYPE", "PROGRESS", "UPDATED"], rows);
    Ok(())
}

fn show(data_dir: &Path, uid: &str, json: bool) -> anyhow::Result<()> {
    let store = open_store(data_dir)?;
    let project = store.get_project(uid)?;
    let progress = store.progress(uid)?;
    let documents = store.list_documents(uid)?;

    if json {
        return print_json(&serde_json::json!({
            "project": project,
            "progress": progress,
            "documents": documents,
        }));
    }

    println!("{}  ({})", project.name, project.uid);
    if !project.description.is_empty() {
        println!("{}", project.description);
    }
    if !project.app_type.is_empty() {
        println!("Type:      {}", project.app_type);
    }
    println!(
        "Progress:  {}% ({}/{} todos done)",
        progress.percentage, progress.completed, progress.total
    );
    println!("Created:   {}", project.created_at.format("%Y-%m-%d %H:%M"));
    if !documents.is_empty() {
        println!("Documents:");
        for doc in &documents {
            println!("  [{}] {}", doc.id, doc.title);
        }
    }
    Ok(())
}

fn update(data_dir: &Path, uid: &str, update: ProjectUpdate, json: bool) -> anyhow::Result<()> {
    let mut store = open_store(data_dir)?;
    let project = store.update_project(uid, &update)?;

    if json {
        print_json(&project)?;
    } else {
        println!("Updated project {}", project.uid);
    }
    Ok(())
}

fn delete(data_dir: &Path, uid: &str, yes: bool, json: bool) -> anyhow::Result<()> {
    if !yes {
        bail!("deleting '{uid}' removes all of its documents, todos and features; pass --yes");
    }
    let mut store = open_store(data_dir)?;
    let deleted = store.delete_project(uid)?;

    if json {
        print_json(&serde_json::json!({ "uid": uid, "deleted": deleted }))?;
    } else {
        println!(
            "Deleted project {uid} ({} documents, {} todos, {} features)",
            deleted.documents, deleted.todos, deleted.features
        );
    }
    Ok(())
}

fn export(data_dir: &Path, uid: &str, output: Option<&Path>) -> anyhow::Result<()> {
    let store = open_store(data_dir)?;
    let project = store.get_project(uid)?;
    let documents = store.list_documents(uid)?;
    let todos = store.list_todos(uid, None)?;
    let md = markdown::project_to_markdown(&project, &documents, &todos);

    match output {
        Some(path) => {
            std::fs::write(path, md)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Exported {} to {}", project.name, path.display());
        }
        None => print!("{md}"),
    }
    Ok(())
}
