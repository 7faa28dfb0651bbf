use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "depviz")]
#[command(about = "Login-gated dependency-graph visualizer core")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Project path (defaults to current directory)
    /// Used when no subcommand is specified
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Launch the interactive graph visualization server
    Serve(ServeArgs),

    /// Validate a graph upload document and record it as the new snapshot
    Import(ImportArgs),

    /// Classify and summarize a graph upload document
    Inspect(InspectArgs),

    /// Generate a starter .depviz.toml configuration file
    Init(InitArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct ServeArgs {
    /// Project path (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Port for the HTTP server (overrides config)
    #[arg(long)]
    pub port: Option<u16>,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,

    /// Principal id for the admin session driving the server
    #[arg(long, default_value = "admin")]
    pub user: String,
}

#[derive(Parser, Debug, Clone)]
pub struct ImportArgs {
    /// Graph upload document (JSON) to record
    pub file: PathBuf,

    /// Project path (defaults to current directory)
    #[arg(long, default_value = ".")]
    pub path: PathBuf,

    /// Principal id recorded as the uploader
    #[arg(long, default_value = "admin")]
    pub user: String,
}

#[derive(Parser, Debug, Clone)]
pub struct InspectArgs {
    /// Graph upload document (JSON) to summarize
    pub file: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "markdown")]
    pub format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Path where to create .depviz.toml (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}
