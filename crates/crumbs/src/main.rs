//! crumbs CLI - breadcrumbs and folder index pages for markdown docs.
//!
//! Provides commands for:
//! - `build`: Generate indexes and write pages with breadcrumbs to an output directory
//! - `index`: Generate folder index pages in place
//! - `trail`: Print the breadcrumb trail for a page URL

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};

use commands::{BuildArgs, IndexArgs, TrailArgs};
use output::Output;

/// crumbs - breadcrumbs and folder index pages for markdown documentation.
#[derive(Parser)]
#[command(name = "crumbs", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the docs into an output directory with breadcrumbs prepended.
    Build(BuildArgs),
    /// Generate index pages inside the docs directory.
    Index(IndexArgs),
    /// Print the breadcrumb trail for a page URL.
    Trail(TrailArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let result = match cli.command {
        Commands::Build(args) => args.execute(),
        Commands::Index(args) => args.execute(),
        Commands::Trail(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
