//! Typed view of the effective configuration.

use std::collections::BTreeMap;

use serde::Deserialize;

use beetmover_paths::ExcludePatterns;

use super::effective::{ConfigError, EffectiveConfig};
use crate::hash::HashAlgorithm;
use crate::template::{Environment, ManifestTemplate};

/// Settings used by manifest generation and release planning.
#[derive(Debug, Clone, Deserialize)]
pub struct BeetmoverConfig {
    pub hash_type: String,

    #[serde(default)]
    pub excludes: Vec<String>,

    #[serde(default)]
    pub release_excludes: Vec<String>,

    #[serde(default)]
    pub templates: BTreeMap<String, ManifestTemplate>,
}

impl BeetmoverConfig {
    pub fn from_effective(effective: &EffectiveConfig) -> Result<Self, ConfigError> {
        serde_json::from_value(effective.config.clone())
            .map_err(|e| ConfigError::ParseError(format!("invalid configuration: {}", e)))
    }

    pub fn hash_algorithm(&self) -> Result<HashAlgorithm, ConfigError> {
        self.hash_type
            .parse()
            .map_err(|e| ConfigError::ValidationError(format!("hash_type: {}", e)))
    }

    pub fn exclude_patterns(&self) -> Result<ExcludePatterns, ConfigError> {
        ExcludePatterns::new(&self.excludes)
            .map_err(|e| ConfigError::ValidationError(format!("excludes: {}", e)))
    }

    pub fn release_exclude_patterns(&self) -> Result<ExcludePatterns, ConfigError> {
        ExcludePatterns::new(&self.release_excludes)
            .map_err(|e| ConfigError::ValidationError(format!("release_excludes: {}", e)))
    }

    /// Template environment over the configured templates
    pub fn environment(&self) -> Environment {
        Environment::new(self.templates.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::TemplateEnv;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let effective = EffectiveConfig::build(None, None).unwrap();
        let config = BeetmoverConfig::from_effective(&effective).unwrap();

        assert_eq!(config.hash_algorithm().unwrap(), HashAlgorithm::Sha512);
        assert!(config.exclude_patterns().unwrap().is_empty());
        assert!(!config.release_exclude_patterns().unwrap().is_empty());
        assert!(config.environment().is_empty());
    }

    #[test]
    fn test_templates_from_overrides() {
        let cli = json!({
            "templates": {
                "fake_nightly": {
                    "dated_prefix": "{{ upload_date }}/",
                    "latest_prefix": "latest/",
                    "artifacts": [
                        {"name": "a.txt", "s3_key": "a.txt", "destination": "a.txt"}
                    ]
                }
            }
        });
        let effective = EffectiveConfig::build(None, Some(cli)).unwrap();
        let config = BeetmoverConfig::from_effective(&effective).unwrap();

        let env = config.environment();
        let template = env.manifest_template("fake_nightly").unwrap();
        assert_eq!(template.artifacts[0].name, "a.txt");
    }

    #[test]
    fn test_malformed_template() {
        let cli = json!({"templates": {"fake_nightly": {"dated_prefix": "x/"}}});
        let effective = EffectiveConfig::build(None, Some(cli)).unwrap();
        let err = BeetmoverConfig::from_effective(&effective).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }
}
