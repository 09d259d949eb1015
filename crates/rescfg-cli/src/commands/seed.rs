//! Seed command
//!
//! Usage: rescfg seed [--quiet]

use std::collections::BTreeMap;

use clap::Args;
use rescfg_core::{Operation, ResourceAddress, Value};

use crate::host::ConsoleHost;
use crate::schema;

#[derive(Debug, Args)]
pub struct SeedArgs {
    /// Suppress the tree dump, print only lifecycle activity
    #[arg(long)]
    pub quiet: bool,
}

/// Execute seed command
pub fn execute(args: SeedArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = schema::demo_engine()?;
    let mut host = ConsoleHost;

    for (address, values) in sample_resources() {
        println!("add {}", address);
        engine.execute(&mut host, Operation::Add { address, values })?;
    }

    engine.validate()?;

    if !args.quiet {
        println!("{}", serde_json::to_string_pretty(engine.tree().root())?);
    }
    println!("✓ Seeded {} resources", sample_resources().len());
    Ok(())
}

/// Sample resources, in dependency order (parents before children)
pub fn sample_resources() -> Vec<(ResourceAddress, BTreeMap<String, Value>)> {
    let jgroups = ResourceAddress::of("subsystem", "jgroups");
    vec![
        (
            jgroups.clone(),
            BTreeMap::from([("default-channel".to_string(), Value::from("ee"))]),
        ),
        (jgroups.child("stack", "udp"), BTreeMap::new()),
        (
            jgroups.child("channel", "ee"),
            BTreeMap::from([("stack".to_string(), Value::from("udp"))]),
        ),
        (
            ResourceAddress::of("singleton-policy", "default"),
            BTreeMap::from([("cache-container".to_string(), Value::from("server"))]),
        ),
    ]
}
