//! Merged beetmover configuration and where each layer came from.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::Path;

use beetmover_paths::ExcludePatterns;

use super::defaults::BuiltinDefaults;
use super::merge::merge_layers;
use crate::hash::HashAlgorithm;
use crate::template::ManifestTemplate;

/// Layer a configuration value came from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOrigin {
    Builtin,
    File,
    Cli,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSource {
    pub origin: ConfigOrigin,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 of the raw file bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// The validated, merged configuration as written by `--effective-config`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfig {
    pub config: Value,

    /// Lowest precedence first
    pub sources: Vec<ConfigSource>,
}

impl EffectiveConfig {
    /// Merge builtin defaults, an optional TOML file and CLI overrides, then validate.
    pub fn build(config_path: Option<&Path>, cli_overrides: Option<Value>) -> Result<Self, ConfigError> {
        let mut layers = vec![BuiltinDefaults::default().to_value()];
        let mut sources = vec![ConfigSource {
            origin: ConfigOrigin::Builtin,
            path: None,
            digest: None,
        }];

        if let Some(path) = config_path {
            let (value, digest) = load_toml_file(path)?;
            layers.push(value);
            sources.push(ConfigSource {
                origin: ConfigOrigin::File,
                path: Some(path.display().to_string()),
                digest: Some(digest),
            });
        }

        if let Some(cli) = cli_overrides {
            layers.push(cli);
            sources.push(ConfigSource {
                origin: ConfigOrigin::Cli,
                path: None,
                digest: None,
            });
        }

        let config = merge_layers(layers);
        validate_config(&config)?;
        tracing::debug!(sources = sources.len(), "configuration merged");

        Ok(Self { config, sources })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn write_to_file(&self, path: &Path) -> io::Result<()> {
        let json = self
            .to_json()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, json)
    }
}

fn load_toml_file(path: &Path) -> Result<(Value, String), ConfigError> {
    let bytes = fs::read(path).map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;
    let digest = hex::encode(Sha256::digest(&bytes));

    let contents = String::from_utf8(bytes)
        .map_err(|e| ConfigError::ParseError(format!("{}: invalid UTF-8: {}", path.display(), e)))?;
    let value: Value = toml::from_str(&contents)
        .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;

    Ok((value, digest))
}

fn string_list<'a>(config: &'a Value, key: &str) -> Result<Vec<&'a str>, ConfigError> {
    match config.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| {
                v.as_str()
                    .ok_or_else(|| ConfigError::ValidationError(format!("{} must be a list of strings", key)))
            })
            .collect(),
        Some(_) => Err(ConfigError::ValidationError(format!("{} must be a list", key))),
    }
}

fn validate_config(config: &Value) -> Result<(), ConfigError> {
    if let Some(hash_type) = config.get("hash_type") {
        let name = hash_type
            .as_str()
            .ok_or_else(|| ConfigError::ValidationError("hash_type must be a string".to_string()))?;
        name.parse::<HashAlgorithm>()
            .map_err(|e| ConfigError::ValidationError(format!("hash_type: {}", e)))?;
    }

    for key in ["excludes", "release_excludes"] {
        ExcludePatterns::new(string_list(config, key)?)
            .map_err(|e| ConfigError::ValidationError(format!("{}: {}", key, e)))?;
    }

    match config.get("templates") {
        None | Some(Value::Null) => {}
        Some(Value::Object(templates)) => {
            for (key, template) in templates {
                ManifestTemplate::deserialize(template)
                    .map_err(|e| ConfigError::ValidationError(format!("templates.{}: {}", key, e)))?;
            }
        }
        Some(_) => return Err(ConfigError::ValidationError("templates must be a table".to_string())),
    }

    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_build_with_defaults_only() {
        let config = EffectiveConfig::build(None, None).unwrap();

        assert_eq!(config.config["hash_type"], "sha512");
        assert_eq!(config.sources.len(), 1);
        assert_eq!(config.sources[0].origin, ConfigOrigin::Builtin);
    }

    #[test]
    fn test_cli_override() {
        let config = EffectiveConfig::build(None, Some(json!({"hash_type": "sha256"}))).unwrap();

        assert_eq!(config.config["hash_type"], "sha256");
        assert_eq!(config.sources.last().unwrap().origin, ConfigOrigin::Cli);
    }

    #[test]
    fn test_unsupported_hash_type() {
        let err = EffectiveConfig::build(None, Some(json!({"hash_type": "md5"}))).unwrap_err();
        assert!(err.to_string().contains("hash_type"));
    }

    #[test]
    fn test_invalid_exclude_pattern() {
        let err = EffectiveConfig::build(None, Some(json!({"excludes": ["(unclosed"]}))).unwrap_err();
        assert!(err.to_string().contains("excludes"));
    }

    #[test]
    fn test_excludes_must_be_strings() {
        assert!(EffectiveConfig::build(None, Some(json!({"excludes": [1]}))).is_err());
    }

    #[test]
    fn test_invalid_template_names_its_key() {
        let cli = json!({
            "templates": {
                "fake_nightly": {
                    "dated_prefix": "{{ upload_date }}/",
                    "latest_prefix": "latest/"
                },
                "fake_candidates": {
                    "dated_prefix": "candidates/",
                    "artifacts": []
                }
            }
        });
        let err = EffectiveConfig::build(None, Some(cli)).unwrap_err();

        assert!(matches!(err, ConfigError::ValidationError(_)));
        let message = err.to_string();
        assert!(message.contains("templates.fake_candidates"), "{}", message);
        assert!(message.contains("latest_prefix"), "{}", message);
    }

    #[test]
    fn test_templates_must_be_a_table() {
        let err = EffectiveConfig::build(None, Some(json!({"templates": ["fake_nightly"]}))).unwrap_err();
        assert!(err.to_string().contains("templates must be a table"));
    }

    #[test]
    fn test_load_toml_file() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, "hash_type = \"sha1\"").unwrap();
        writeln!(temp, "excludes = ['^.*\\.log$']").unwrap();

        let config = EffectiveConfig::build(Some(temp.path()), None).unwrap();

        assert_eq!(config.config["hash_type"], "sha1");
        assert_eq!(config.config["excludes"][0], "^.*\\.log$");
        assert_eq!(config.sources[1].origin, ConfigOrigin::File);
        assert_eq!(config.sources[1].digest.as_ref().unwrap().len(), 64);
    }

    #[test]
    fn test_written_config_lists_sources() {
        let config = EffectiveConfig::build(None, Some(json!({"hash_type": "sha1"}))).unwrap();
        let out = tempfile::TempDir::new().unwrap();
        let path = out.path().join("effective.json");

        config.write_to_file(&path).unwrap();
        let written: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();

        assert_eq!(written["config"]["hash_type"], "sha1");
        assert_eq!(written["sources"], json!([{"origin": "builtin"}, {"origin": "cli"}]));
    }

    #[test]
    fn test_missing_config_file() {
        let err = EffectiveConfig::build(Some(Path::new("/nonexistent/beetmover.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }

    #[test]
    fn test_malformed_toml() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, "hash_type = ").unwrap();

        let err = EffectiveConfig::build(Some(temp.path()), None).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }
}
