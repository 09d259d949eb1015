//! Apply command
//!
//! Usage: rescfg apply <PATH> [--seed]
//!
//! Reads a JSON array of operations and executes them in order against the
//! demo schema, stopping at the first failure.

use std::path::PathBuf;

use clap::Args;
use rescfg_core::{Operation, Outcome};

use crate::commands::seed::sample_resources;
use crate::host::ConsoleHost;
use crate::schema;

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Path to a JSON file containing an array of operations
    pub path: PathBuf,

    /// Seed the sample resources before applying
    #[arg(long)]
    pub seed: bool,
}

/// Execute apply command
pub fn execute(args: ApplyArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = schema::demo_engine()?;
    let mut host = ConsoleHost;

    if args.seed {
        for (address, values) in sample_resources() {
            engine.execute(&mut host, Operation::Add { address, values })?;
        }
    }

    let text = std::fs::read_to_string(&args.path)?;
    let operations: Vec<Operation> = serde_json::from_str(&text)?;

    for op in operations {
        match engine.execute(&mut host, op)? {
            Outcome::Added(node) => println!("✓ Added {}", node.address),
            Outcome::Removed(node) => println!("✓ Removed {}", node.address),
            Outcome::Transformed(node) => {
                println!("{}", serde_json::to_string_pretty(&node)?);
            }
        }
    }

    engine.validate()?;
    Ok(())
}
