//! Console service host
//!
//! The demo CLI has no real services to run; this host prints each
//! start/stop so lifecycle sequencing is visible on the terminal.

use std::collections::BTreeMap;

use rescfg_core::{ResourceAddress, ServiceHost, ServiceName, Value};

#[derive(Debug, Default)]
pub struct ConsoleHost;

impl ServiceHost for ConsoleHost {
    fn start(
        &mut self,
        name: &ServiceName,
        address: &ResourceAddress,
        _parameters: &BTreeMap<String, Value>,
    ) -> Result<(), String> {
        println!("  start {} (for {})", name, address);
        Ok(())
    }

    fn stop(&mut self, name: &ServiceName) -> Result<(), String> {
        println!("  stop  {}", name);
        Ok(())
    }
}
