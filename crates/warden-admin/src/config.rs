//! Admin plane configuration.

/// Limits applied by the resource server manager.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// How many fresh key/secret pairs a create tries before surfacing a
    /// credential collision (default: 3).
    pub credential_attempts: u32,
    /// Maximum number of distinct scopes per resource server (default: 100).
    pub max_scopes: usize,
    /// Maximum length in characters of names, scopes and contact fields
    /// (default: 255).
    pub max_field_length: usize,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            credential_attempts: 3,
            max_scopes: 100,
            max_field_length: 255,
        }
    }
}
