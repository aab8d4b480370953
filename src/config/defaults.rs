//! Built-in defaults (layer 1)

use serde::{Deserialize, Serialize};

use beetmover_paths::exclude::RELEASE_EXCLUDES;

/// Built-in default configuration values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinDefaults {
    /// Checksum algorithm (default: "sha512")
    pub hash_type: String,

    /// Patterns dropped from generated manifests (default: none)
    pub excludes: Vec<String>,

    /// Patterns never copied from candidates to releases
    pub release_excludes: Vec<String>,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            hash_type: "sha512".to_string(),
            excludes: Vec::new(),
            release_excludes: RELEASE_EXCLUDES.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl BuiltinDefaults {
    /// Convert to JSON Value for merging
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "hash_type": self.hash_type,
            "excludes": self.excludes,
            "release_excludes": self.release_excludes,
            "templates": {}
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let defaults = BuiltinDefaults::default();
        assert_eq!(defaults.hash_type, "sha512");
        assert!(defaults.excludes.is_empty());
        assert_eq!(defaults.release_excludes.len(), RELEASE_EXCLUDES.len());
    }

    #[test]
    fn test_to_value() {
        let value = BuiltinDefaults::default().to_value();

        assert_eq!(value["hash_type"], "sha512");
        assert!(value["templates"].as_object().unwrap().is_empty());
        assert_eq!(value["release_excludes"][0], RELEASE_EXCLUDES[0]);
    }
}
