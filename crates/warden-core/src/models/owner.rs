//! Owner identity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque tenant identity that controls visibility of resource servers.
///
/// Every resource server carries exactly one owner, fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Owner(String);

impl Owner {
    /// Builds an owner from a resolved principal, trimming surrounding
    /// whitespace. Returns `None` for a blank principal.
    pub fn new(principal: impl AsRef<str>) -> Option<Self> {
        let trimmed = principal.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Owner {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
