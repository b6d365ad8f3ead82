//! Target platform descriptors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque identifier for the runtime/platform a unit is resolved and
/// compiled for (e.g. `net-x`).
///
/// The pipeline never interprets the descriptor beyond equality; providers
/// use it to select platform-specific references and to filter candidate
/// search locations.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetPlatform(String);

impl TargetPlatform {
    /// Creates a platform descriptor from its identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TargetPlatform {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}
