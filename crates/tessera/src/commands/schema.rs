//! Schema command - Print the config file JSON Schema

use clap::Args;
use std::path::PathBuf;

use crate::config::TESSERA_CONFIG_SCHEMA;

#[derive(Args)]
pub struct SchemaArgs {
    /// Write the schema to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: SchemaArgs) {
    match args.output {
        Some(path) => {
            if let Err(e) = std::fs::write(&path, TESSERA_CONFIG_SCHEMA) {
                eprintln!("Failed to write {}: {}", path.display(), e);
                std::process::exit(1);
            }
            eprintln!("Wrote schema to {}", path.display());
        }
        None => println!("{}", TESSERA_CONFIG_SCHEMA),
    }
}
