use crate::output::{print_json, print_table};
use crate::root::open_store;
use anyhow::Context;
use clap::Subcommand;
use std::path::{Path, PathBuf};
use vibeplan_core::theme::{self, ThemeTokens};
use vibeplan_server::crawl::{self, FetchTimeouts};

#[derive(Subcommand)]
pub enum ThemeSubcommand {
    /// Extract design tokens from a local CSS file
    Css { file: PathBuf },
    /// Fetch a page and extract design tokens from its CSS
    Crawl { url: String },
    /// List saved themes
    List,
}

pub fn run(data_dir: &Path, subcmd: ThemeSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ThemeSubcommand::Css { file } => css(&file, json),
        ThemeSubcommand::Crawl { url } => crawl_url(&url, json),
        ThemeSubcommand::List => list(data_dir, json),
    }
}

fn print_tokens(tokens: &ThemeTokens) {
    if tokens.colors.is_empty() {
        println!("No colors found.");
    } else {
        let rows = tokens
            .colors
            .iter()
            .map(|c| vec![c.hex.clone(), c.name.clone(), c.count.to_string()])
            .collect();
        print_table(&["HEX", "NAME", "COUNT"], rows);
    }
    println!();
    if tokens.fonts.is_empty() {
        println!("No fonts found.");
    } else {
        let rows = tokens
            .fonts
            .iter()
            .map(|f| vec![f.font_family.clone(), f.count.to_string()])
            .collect();
        print_table(&["FONT", "COUNT"], rows);
    }
    println!();
    println!("{}", tokens.css_variables);
}

fn css(file: &Path, json: bool) -> anyhow::Result<()> {
    let css = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let tokens = theme::analyze_css(&css);

    if json {
        print_json(&tokens)?;
    } else {
        print_tokens(&tokens);
    }
    Ok(())
}

fn crawl_url(url: &str, json: bool) -> anyhow::Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    let result = rt.block_on(crawl::crawl_page(
        &reqwest::Client::new(),
        url,
        FetchTimeouts::default(),
    ))?;

    if json {
        print_json(&result)?;
    } else {
        println!("{}", result.url);
        println!();
        print_tokens(&result.tokens);
    }
    Ok(())
}

fn list(data_dir: &Path, json: bool) -> anyhow::Result<()> {
    let store = open_store(data_dir)?;
    let themes = store.list_themes()?;

    if json {
        return print_json(&themes);
    }
    if themes.is_empty() {
        println!("No saved themes.");
        return Ok(());
    }
    let rows = themes
        .iter()
        .map(|t| {
            vec![
                t.id.to_string(),
                t.name.clone(),
                t.source.to_string(),
                t.source_url.clone().unwrap_or_default(),
                t.created_at.format("%Y-%m-%d").to_string(),
            ]
        })
        .collect();
    print_table(&["ID", "NAME", "SOURCE", "URL", "SAVED"], rows);
    Ok(())
}
