use std::collections::BTreeMap;

use rescfg_core_types::{ResourceAddress, Value};

use crate::model::ServiceName;

/// Collaborator that owns the runtime services behind resources
///
/// This engine only sequences start/stop calls and handles their failure
/// signals; threads, sockets and pools live on the host's side of this
/// seam. A failure is reported as a reason string; the lifecycle handlers
/// wrap it with the owning resource's address.
pub trait ServiceHost {
    /// Start the named service with parameters derived from the persisted
    /// attribute values of the resource at `address`
    fn start(
        &mut self,
        name: &ServiceName,
        address: &ResourceAddress,
        parameters: &BTreeMap<String, Value>,
    ) -> std::result::Result<(), String>;

    /// Stop the named service
    fn stop(&mut self, name: &ServiceName) -> std::result::Result<(), String>;
}

/// What a [`RecordingHost`] observed, in call order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Started(ServiceName),
    Stopped(ServiceName),
}

/// Service host double that records every call and can be told to fail
///
/// Used by the engine's own test suites and by the demo CLI; real
/// deployments supply their own `ServiceHost`.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    pub events: Vec<HostEvent>,
    fail_start: Vec<String>,
    fail_stop: Vec<String>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent starts of the named service fail
    pub fn fail_start_of(&mut self, name: &str) {
        self.fail_start.push(name.to_string());
    }

    /// Make subsequent stops of the named service fail
    pub fn fail_stop_of(&mut self, name: &str) {
        self.fail_stop.push(name.to_string());
    }

    /// Names of services started, in order
    pub fn started(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                HostEvent::Started(n) => Some(n.as_str()),
                HostEvent::Stopped(_) => None,
            })
            .collect()
    }

    /// Names of services stopped, in order
    pub fn stopped(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                HostEvent::Stopped(n) => Some(n.as_str()),
                HostEvent::Started(_) => None,
            })
            .collect()
    }
}

impl ServiceHost for RecordingHost {
    fn start(
        &mut self,
        name: &ServiceName,
        _address: &ResourceAddress,
        _parameters: &BTreeMap<String, Value>,
    ) -> std::result::Result<(), String> {
        if self.fail_start.iter().any(|f| f == name.as_str()) {
            return Err(format!("configured start failure for {name}"));
        }
        self.events.push(HostEvent::Started(name.clone()));
        Ok(())
    }

    fn stop(&mut self, name: &ServiceName) -> std::result::Result<(), String> {
        if self.fail_stop.iter().any(|f| f == name.as_str()) {
            return Err(format!("configured stop failure for {name}"));
        }
        self.events.push(HostEvent::Stopped(name.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_host_orders_events() {
        let mut host = RecordingHost::new();
        let addr = ResourceAddress::of("server", "a");
        let params = BTreeMap::new();

        host.start(&ServiceName::new("s.one"), &addr, &params).unwrap();
        host.start(&ServiceName::new("s.two"), &addr, &params).unwrap();
        host.stop(&ServiceName::new("s.two")).unwrap();

        assert_eq!(host.started(), vec!["s.one", "s.two"]);
        assert_eq!(host.stopped(), vec!["s.two"]);
    }

    #[test]
    fn test_configured_failures() {
        let mut host = RecordingHost::new();
        host.fail_start_of("s.bad");
        let addr = ResourceAddress::of("server", "a");
        let result = host.start(&ServiceName::new("s.bad"), &addr, &BTreeMap::new());
        assert!(result.is_err());
        assert!(host.events.is_empty());
    }
}
