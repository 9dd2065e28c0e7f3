//! Where a catalog document was loaded from.

use serde::{Deserialize, Serialize};

/// Opaque source-location token handed over by the document loader.
///
/// The catalog only records it and attaches it to validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceLocation(String);

impl SourceLocation {
    pub fn new(location: impl Into<String>) -> Self {
        Self(location.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceLocation {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SourceLocation {
    fn from(value: String) -> Self {
        Self(value)
    }
}
