use crate::output::{print_json, print_table};
use crate::root::open_store;
use anyhow::{bail, Context};
use clap::Subcommand;
use std::path::{Path, PathBuf};
use vibeplan_core::document::NewDocument;
use vibeplan_core::markdown;
use vibeplan_core::types::DocumentType;

#[derive(Subcommand)]
pub enum DocSubcommand {
    /// Attach a document to a project
    Add {
        uid: String,
        /// planning, prd, trd, tdd or todo
        doc_type: String,
        /// Read the content from a file
        #[arg(long, conflicts_with = "content")]
        file: Option<PathBuf>,
        /// Inline content
        #[arg(long)]
        content: Option<String>,
        /// Defaults to the document type's title
        #[arg(long)]
        title: Option<String>,
    },
    /// List a project's documents
    List { uid: String },
    /// Print a document's content
    Show { id: i64 },
    /// Delete a document
    Delete { id: i64 },
    /// Export one document as markdown with a metadata header
    Export {
        id: i64,
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

pub fn run(data_dir: &Path, subcmd: DocSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        DocSubcommand::Add {
            uid,
            doc_type,
            file,
            content,
            title,
        } => {
            let content = match (file, content) {
                (Some(path), _) => std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?,
                (None, Some(content)) => content,
                (None, None) => bail!("provide --file or --content"),
            };
            let new = NewDocument {
                doc_type: doc_type.parse::<DocumentType>()?,
                title,
                content,
            };
            add(data_dir, &uid, &new, json)
        }
        DocSubcommand::List { uid } => list(data_dir, &uid, json),
        DocSubcommand::Show { id } => show(data_dir, id, json),
        DocSubcommand::Delete { id } => delete(data_dir, id, json),
        DocSubcommand::Export { id, output } => export(data_dir, id, output.as_deref()),
    }
}

fn add(data_dir: &Path, uid: &str, new: &NewDocument, json: bool) -> anyhow::Result<()> {
    let mut store = open_store(data_dir)?;
    let doc = store.add_document(uid, new)?;

    if json {
        print_json(&doc)?;
    } else {
        println!("Added document [{}]: {}", doc.id, doc.title);
    }
    Ok(())
}

fn list(data_dir: &Path, uid: &str, json: bool) -> anyhow::Result<()> {
    let store = open_store(data_dir)?;
    let docs = store.list_documents(uid)?;

    if json {
        return print_json(&docs);
    }
    if docs.is_empty() {
        println!("No documents.");
        return Ok(());
    }
    let rows = docs
        .iter()
        .map(|d| {
            vec![
                d.id.to_string(),
                d.doc_type.to_string(),
                d.title.clone(),
                d.updated_at.format("%Y-%m-%d").to_string(),
            ]
        })
        .collect();
    print_table(&["ID", "TYPE", "TITLE", "UPDATED"], rows);
    Ok(())
}

fn show(data_dir: &Path, id: i64, json: bool) -> anyhow::Result<()> {
    let store = open_store(data_dir)?;
    let doc = store.get_document(id)?;

    if json {
        print_json(&doc)?;
    } else {
        println!("{}", doc.content);
    }
    Ok(())
}

fn delete(data_dir: &Path, id: i64, json: bool) -> anyhow::Result<()> {
    let mut store = open_store(data_dir)?;
    store.delete_document(id)?;

    if json {
        print_json(&serde_json::json!({ "deleted": id }))?;
    } else {
        println!("Deleted document [{id}]");
    }
    Ok(())
}

fn export(data_dir: &Path, id: i64, output: Option<&Path>) -> anyhow::Result<()> {
    let store = open_store(data_dir)?;
    let doc = store.get_document(id)?;
    let md = markdown::document_to_markdown(&doc);

    match output {
        Some(path) => {
            std::fs::write(path, md)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Exported {} to {}", doc.title, path.display());
        }
        None => print!("{md}"),
    }
    Ok(())
}
