use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Schema model version (major.minor.micro)
///
/// Versions are totally ordered. Derived `Ord` compares major, then minor,
/// then micro, which matches the field declaration order below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModelVersion {
    pub major: u32,
    pub minor: u32,
    pub micro: u32,
}

impl ModelVersion {
    /// Create a new version from its three components
    pub const fn new(major: u32, minor: u32, micro: u32) -> Self {
        Self {
            major,
            minor,
            micro,
        }
    }

    /// Check whether a peer at `target` predates this version
    ///
    /// A feature introduced at `self` requires transformation when the
    /// target version is strictly older than `self`.
    pub fn requires_transformation(&self, target: &ModelVersion) -> bool {
        target < self
    }
}

impl fmt::Display for ModelVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.micro)
    }
}

/// Error returned when parsing a version string fails
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseVersionError {
    pub input: String,
}

impl fmt::Display for ParseVersionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid model version: {}", self.input)
    }
}

impl std::error::Error for ParseVersionError {}

impl FromStr for ModelVersion {
    type Err = ParseVersionError;

    /// Parse "major.minor.micro"; a missing minor or micro defaults to 0
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseVersionError {
            input: s.to_string(),
        };
        let mut parts = s.split('.');
        let major = parts
            .next()
            .ok_or_else(err)?
            .parse::<u32>()
            .map_err(|_| err())?;
        let minor = match parts.next() {
            Some(p) => p.parse::<u32>().map_err(|_| err())?,
            None => 0,
        };
        let micro = match parts.next() {
            Some(p) => p.parse::<u32>().map_err(|_| err())?,
            None => 0,
        };
        if parts.next().is_some() {
            return Err(err());
        }
        Ok(ModelVersion::new(major, minor, micro))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_ordering() {
        assert!(ModelVersion::new(1, 0, 0) < ModelVersion::new(2, 0, 0));
        assert!(ModelVersion::new(1, 1, 0) < ModelVersion::new(1, 2, 0));
        assert!(ModelVersion::new(1, 1, 1) < ModelVersion::new(1, 1, 2));
        assert!(ModelVersion::new(2, 0, 0) > ModelVersion::new(1, 9, 9));
    }

    #[test]
    fn test_requires_transformation() {
        let introduced = ModelVersion::new(3, 0, 0);
        assert!(introduced.requires_transformation(&ModelVersion::new(2, 0, 0)));
        assert!(!introduced.requires_transformation(&ModelVersion::new(3, 0, 0)));
        assert!(!introduced.requires_transformation(&ModelVersion::new(4, 0, 0)));
    }

    #[test]
    fn test_parse_and_display() {
        let v: ModelVersion = "3.1.2".parse().unwrap();
        assert_eq!(v, ModelVersion::new(3, 1, 2));
        assert_eq!(v.to_string(), "3.1.2");

        let short: ModelVersion = "3".parse().unwrap();
        assert_eq!(short, ModelVersion::new(3, 0, 0));

        assert!("3.x.0".parse::<ModelVersion>().is_err());
        assert!("".parse::<ModelVersion>().is_err());
        assert!("1.2.3.4".parse::<ModelVersion>().is_err());
    }
}
