mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{
    config::ConfigSubcommand, doc::DocSubcommand, project::ProjectSubcommand,
    theme::ThemeSubcommand, todo::TodoSubcommand,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "vibeplan",
    about = "Plan app projects: generated documents, todo boards, design tokens",
    version,
    propagate_version = true
)]
struct Cli {
    /// Data directory (default: ~/.vibeplan)
    #[arg(long, global = true, env = "VIBEPLAN_HOME")]
    data_dir: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server
    Serve {
        /// Port to listen on (0 = OS-assigned)
        #[arg(long, default_value = "3000")]
        port: u16,

        /// Don't open browser automatically
        #[arg(long)]
        no_open: bool,
    },

    /// Manage projects
    Project {
        #[command(subcommand)]
        subcommand: ProjectSubcommand,
    },

    /// Manage a project's todo board
    Todo {
        #[command(subcommand)]
        subcommand: TodoSubcommand,
    },

    /// Manage a project's documents
    Doc {
        #[command(subcommand)]
        subcommand: DocSubcommand,
    },

    /// Extract design tokens and manage saved themes
    Theme {
        #[command(subcommand)]
        subcommand: ThemeSubcommand,
    },

    /// Show or change the AI provider settings
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let data_dir = root::resolve_data_dir(cli.data_dir.as_deref());

    let result = match cli.command {
        Commands::Serve { port, no_open } => cmd::serve::run(&data_dir, port, no_open),
        Commands::Project { subcommand } => cmd::project::run(&data_dir, subcommand, cli.json),
        Commands::Todo { subcommand } => cmd::todo::run(&data_dir, subcommand, cli.json),
        Commands::Doc { subcommand } => cmd::doc::run(&data_dir, subcommand, cli.json),
        Commands::Theme { subcommand } => cmd::theme::run(&data_dir, subcommand, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&data_dir, subcommand, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
