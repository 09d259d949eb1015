//! Transform command
//!
//! Usage: rescfg transform <ADDRESS> <TARGET>
//!
//! Seeds the demo tree, then prints the payload at ADDRESS rewritten for a
//! peer at model version TARGET. Incompatibilities surface as errors.

use clap::Args;
use rescfg_core::{ModelVersion, Operation, Outcome, ResourceAddress};

use crate::commands::seed::sample_resources;
use crate::host::ConsoleHost;
use crate::schema;

#[derive(Debug, Args)]
pub struct TransformArgs {
    /// Resource address, e.g. /subsystem=jgroups
    pub address: ResourceAddress,

    /// Target model version, e.g. 2.0.0
    pub target: ModelVersion,
}

/// Execute transform command
pub fn execute(args: TransformArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = schema::demo_engine()?;
    let mut host = ConsoleHost;

    for (address, values) in sample_resources() {
        engine.execute(&mut host, Operation::Add { address, values })?;
    }

    let outcome = engine.execute(
        &mut host,
        Operation::Transform {
            address: args.address,
            target: args.target,
        },
    )?;

    if let Outcome::Transformed(node) = outcome {
        println!("{}", serde_json::to_string_pretty(&node)?);
    }
    Ok(())
}
