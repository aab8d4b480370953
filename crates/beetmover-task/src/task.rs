//! Task definition as received from the pipeline.

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::error::TaskVerificationError;

/// Format of dated upload directories: `YYYY/MM/YYYY-MM-DD-HH-MM-SS`.
pub const UPLOAD_DATE_FORMAT: &str = "%Y/%m/%Y-%m-%d-%H-%M-%S";

/// One release job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub payload: Payload,
}

impl Task {
    /// Parse a task definition from JSON text.
    pub fn from_json(json: &str) -> Result<Self, TaskVerificationError> {
        serde_json::from_str(json).map_err(|e| TaskVerificationError::Malformed(e.to_string()))
    }

    /// Parse a task definition from an already-decoded JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, TaskVerificationError> {
        serde_json::from_value(value).map_err(|e| TaskVerificationError::Malformed(e.to_string()))
    }
}

/// Task payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    #[serde(rename = "upstreamArtifacts")]
    pub upstream_artifacts: Vec<UpstreamArtifact>,

    #[serde(rename = "releaseProperties", default, skip_serializing_if = "Option::is_none")]
    pub release_properties: Option<ReleaseProperties>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_number: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_date: Option<UploadDate>,
}

/// Build metadata shared by every artifact of the task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseProperties {
    pub app_name: String,
    pub branch: String,
    pub buildid: String,
    /// Stage platform, e.g. `linux64` or `android-api-15`
    pub platform: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash_type: Option<String>,
}

/// Kind of upstream artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ArtifactType {
    Build,
    Signing,
    Partial,
    Other(String),
}

impl ArtifactType {
    pub fn as_str(&self) -> &str {
        match self {
            ArtifactType::Build => "build",
            ArtifactType::Signing => "signing",
            ArtifactType::Partial => "partial",
            ArtifactType::Other(s) => s,
        }
    }
}

impl From<String> for ArtifactType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "build" => ArtifactType::Build,
            "signing" => ArtifactType::Signing,
            "partial" => ArtifactType::Partial,
            _ => ArtifactType::Other(s),
        }
    }
}

impl From<ArtifactType> for String {
    fn from(t: ArtifactType) -> Self {
        t.as_str().to_string()
    }
}

impl std::fmt::Display for ArtifactType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A file produced by an earlier task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamArtifact {
    pub path: String,

    #[serde(rename = "taskId")]
    pub task_id: String,

    #[serde(rename = "type")]
    pub artifact_type: ArtifactType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_name: Option<String>,

    // Partial-update fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buildid: Option<String>,

    #[serde(rename = "previousBuildNumber", default, skip_serializing_if = "Option::is_none")]
    pub previous_build_number: Option<String>,

    #[serde(rename = "previousVersion", default, skip_serializing_if = "Option::is_none")]
    pub previous_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

impl UpstreamArtifact {
    /// Artifact name: explicit `artifact_name`, else the last path segment.
    pub fn name(&self) -> &str {
        match self.artifact_name {
            Some(ref name) => name,
            None => self.path.rsplit('/').next().unwrap_or(&self.path),
        }
    }
}

/// Upload date as given in the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UploadDate {
    /// Already formatted as `YYYY/MM/YYYY-MM-DD-HH-MM-SS`
    Formatted(String),
    /// Seconds since the Unix epoch
    Epoch(i64),
}

impl UploadDate {
    /// Directory form of the date, in UTC.
    pub fn format(&self) -> Result<String, TaskVerificationError> {
        match self {
            UploadDate::Formatted(s) => Ok(s.clone()),
            UploadDate::Epoch(secs) => DateTime::from_timestamp(*secs, 0)
                .map(|dt| dt.format(UPLOAD_DATE_FORMAT).to_string())
                .ok_or_else(|| TaskVerificationError::InvalidField {
                    field: "upload_date".to_string(),
                    reason: format!("timestamp {} out of range", secs),
                }),
        }
    }
}
