//! Host configuration.

use serde::{Deserialize, Serialize};

/// Naming of the commands and records registered in a [`crate::CommandEnv`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Prefix of every command and record name.
    pub namespace: String,
    /// Name of the record array holding per-algorithm descriptions.
    pub record_array: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            namespace: "clef".to_string(),
            record_array: "cipher".to_string(),
        }
    }
}

impl HostConfig {
    /// Creates a configuration with the given namespace and default record array.
    pub fn with_namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    /// Fully qualified command name, e.g. `clef::aes_setup`.
    pub fn command_name(&self, algorithm: &str, verb: &str) -> String {
        format!("{}::{}_{}", self.namespace, algorithm, verb)
    }

    /// Fully qualified record array name, e.g. `clef::cipher`.
    pub fn record_array_name(&self) -> String {
        format!("{}::{}", self.namespace, self.record_array)
    }
}
