//! Build unit identities: the name + version pair that keys every pipeline stage.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Uniquely identifies a build unit within a single resolution.
///
/// Equality and hashing are by name + version, so the same unit discovered
/// through different physical paths collapses to one identity. `Display`
/// renders the `Name, Version` form used verbatim in unresolved-dependency
/// reports.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct UnitIdentity {
    /// The unit name.
    pub name: String,
    /// The unit version string.
    pub version: String,
}

impl UnitIdentity {
    /// Creates an identity from a name and version.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for UnitIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.name, self.version)
    }
}

/// Error returned when parsing a `name@version` reference string fails.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid unit reference '{input}': expected 'Name@Version'")]
pub struct ParseIdentityError {
    /// The input that failed to parse.
    pub input: String,
}

impl FromStr for UnitIdentity {
    type Err = ParseIdentityError;

    /// Parses the `Name@Version` reference form used in unit manifests.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('@') {
            Some((name, version)) if !name.is_empty() && !version.is_empty() => {
                Ok(Self::new(name, version))
            }
            _ => Err(ParseIdentityError {
                input: s.to_string(),
            }),
        }
    }
}
