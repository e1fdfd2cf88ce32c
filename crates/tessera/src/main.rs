//! # tessera
//!
//! Tessera - Declarative data binding for HTML templates.
//!
//! ## Name Origin
//!
//! A **tessera** is one tile of a mosaic. Templates mark the tiles (scopes
//! and props); this tool lays data into them, adding or removing tiles until
//! the picture matches the data.

mod commands;
mod config;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tessera")]
#[command(about = "Declarative data binding for HTML templates", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bind JSON data to a template and print the HTML
    #[command(visible_alias = "atelier")]
    Bind(commands::bind::BindArgs),

    /// List the scopes a template declares
    Scopes(commands::scopes::ScopesArgs),

    /// Print the JSON Schema for tessera.config.json
    Schema(commands::schema::SchemaArgs),
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_max_level(level)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Bind(args) => commands::bind::run(args),
        Commands::Scopes(args) => commands::scopes::run(args),
        Commands::Schema(args) => commands::schema::run(args),
    }
}
