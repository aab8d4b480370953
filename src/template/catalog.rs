//! Manifest template definitions.

use serde::{Deserialize, Serialize};

/// Which locales an artifact template is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactScope {
    /// Once per task locale, or once under `multi` when there are none
    #[default]
    Locale,
    /// Once, under `multi`
    Multi,
    /// Once per partial update, under the partial's locale
    Partial,
}

/// One artifact entry of a manifest template.
///
/// Every field is itself a template string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactTemplate {
    /// Artifact name used as the mapping key
    pub name: String,

    #[serde(default)]
    pub scope: ArtifactScope,

    /// Source key of the staged artifact
    pub s3_key: String,

    /// Destination path relative to the dated/latest prefixes
    pub destination: String,
}

/// A named manifest variant, selected by template key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestTemplate {
    /// Prefix of the upload-date-stamped destination
    pub dated_prefix: String,

    /// Prefix of the "latest" alias destination
    pub latest_prefix: String,

    #[serde(default)]
    pub artifacts: Vec<ArtifactTemplate>,
}
