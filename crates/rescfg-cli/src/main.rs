//! rescfg CLI
//!
//! Command-line submitter for the rescfg engine, driving a demo schema
//! modeled on a clustering subsystem (singleton policies) and a JGroups
//! style subsystem with per-version transformation rules.

use clap::{Parser, Subcommand};
use rescfg_core::logging_facility::{self, Profile};

mod commands;
mod host;
mod schema;

#[derive(Debug, Parser)]
#[command(name = "rescfg")]
#[command(about = "rescfg - resource configuration lifecycle engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Seed the demo schema with sample resources and print the tree
    Seed(commands::seed::SeedArgs),
    /// Apply a JSON file of operations against the seeded demo tree
    Apply(commands::apply::ApplyArgs),
    /// Transform the seeded tree for an older peer version
    Transform(commands::transform::TransformArgs),
}

fn main() {
    logging_facility::init(Profile::Development);

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Seed(args) => commands::seed::execute(args),
        Commands::Apply(args) => commands::apply::execute(args),
        Commands::Transform(args) => commands::transform::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
