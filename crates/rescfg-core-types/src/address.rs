use std::fmt;

use serde::{Deserialize, Serialize};

/// One key=value segment of a resource address
///
/// The key identifies the resource *type* under a parent ("singleton-policy"),
/// the value names the *instance* ("default"). Wildcard registrations match
/// any value for their key; a concrete address always carries a value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathElement {
    pub key: String,
    pub value: String,
}

impl PathElement {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for PathElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Ordered sequence of path elements from the tree root
///
/// The empty address denotes the root itself. Addresses are cheap to clone
/// and compare; the `Display` form is "/key=value/key=value".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceAddress {
    elements: Vec<PathElement>,
}

impl ResourceAddress {
    /// The root address (no elements)
    pub fn root() -> Self {
        Self::default()
    }

    pub fn new(elements: Vec<PathElement>) -> Self {
        Self { elements }
    }

    /// Build a single-element address
    pub fn of(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            elements: vec![PathElement::new(key, value)],
        }
    }

    /// Append one element, returning the child address
    pub fn child(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut elements = self.elements.clone();
        elements.push(PathElement::new(key, value));
        Self { elements }
    }

    /// The parent address, or None at the root
    pub fn parent(&self) -> Option<Self> {
        if self.elements.is_empty() {
            return None;
        }
        Some(Self {
            elements: self.elements[..self.elements.len() - 1].to_vec(),
        })
    }

    /// The final path element, or None at the root
    pub fn last(&self) -> Option<&PathElement> {
        self.elements.last()
    }

    /// The value of the final path element ("" at the root)
    ///
    /// Dynamic capability and service names are parameterized by this value.
    pub fn last_value(&self) -> &str {
        self.elements.last().map(|e| e.value.as_str()).unwrap_or("")
    }

    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    pub fn is_root(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Error returned when parsing an address string fails
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseAddressError {
    pub input: String,
}

impl fmt::Display for ParseAddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid resource address: {}", self.input)
    }
}

impl std::error::Error for ParseAddressError {}

impl std::str::FromStr for ResourceAddress {
    type Err = ParseAddressError;

    /// Parse "/key=value/key=value"; "/" or "" is the root
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim_start_matches('/');
        if trimmed.is_empty() {
            return Ok(ResourceAddress::root());
        }
        let mut elements = Vec::new();
        for segment in trimmed.split('/') {
            let (key, value) = segment.split_once('=').ok_or_else(|| ParseAddressError {
                input: s.to_string(),
            })?;
            if key.is_empty() || value.is_empty() {
                return Err(ParseAddressError {
                    input: s.to_string(),
                });
            }
            elements.push(PathElement::new(key, value));
        }
        Ok(ResourceAddress::new(elements))
    }
}

impl fmt::Display for ResourceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.elements.is_empty() {
            return write!(f, "/");
        }
        for element in &self.elements {
            write!(f, "/{}", element)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_display() {
        let addr = ResourceAddress::of("subsystem", "jgroups").child("stack", "udp");
        assert_eq!(addr.to_string(), "/subsystem=jgroups/stack=udp");
        assert_eq!(ResourceAddress::root().to_string(), "/");
    }

    #[test]
    fn test_parent_and_last() {
        let addr = ResourceAddress::of("subsystem", "jgroups").child("stack", "udp");
        assert_eq!(addr.last_value(), "udp");
        assert_eq!(addr.last().unwrap().key, "stack");

        let parent = addr.parent().unwrap();
        assert_eq!(parent, ResourceAddress::of("subsystem", "jgroups"));
        assert_eq!(parent.parent().unwrap(), ResourceAddress::root());
        assert!(ResourceAddress::root().parent().is_none());
    }

    #[test]
    fn test_root_last_value_is_empty() {
        assert_eq!(ResourceAddress::root().last_value(), "");
    }

    #[test]
    fn test_parse_round_trip() {
        let addr: ResourceAddress = "/subsystem=jgroups/stack=udp".parse().unwrap();
        assert_eq!(addr.to_string(), "/subsystem=jgroups/stack=udp");
        assert_eq!("/".parse::<ResourceAddress>().unwrap(), ResourceAddress::root());
        assert!("/subsystem".parse::<ResourceAddress>().is_err());
        assert!("/=x".parse::<ResourceAddress>().is_err());
    }
}
