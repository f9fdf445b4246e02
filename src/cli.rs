//! Command-line arguments.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI entry point for the storage linker.
#[derive(Parser, Debug)]
#[command(
    name = "storage-linker",
    about = "Link local storage disks into the public directory",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Configuration file (default: ./storage-link.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the application base path
    #[arg(long, global = true)]
    pub base_path: Option<PathBuf>,

    /// Override the public directory (relative paths resolve against the base path)
    #[arg(long, global = true)]
    pub public_path: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create or remove public symlinks for local disks
    Link(LinkOpts),
    /// Print version information
    Version,
}

/// Options for the `link` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct LinkOpts {
    /// Link only this disk
    pub disk: Option<String>,

    /// Link every local disk without prompting
    #[arg(long)]
    pub all: bool,

    /// Remove existing disk symlinks instead of creating them
    #[arg(long)]
    pub remove: bool,

    /// Replace whatever already exists at a link path
    #[arg(long)]
    pub force: bool,
}
