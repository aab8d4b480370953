//! Partial-update metadata carried by upstream artifacts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::TaskVerificationError;
use crate::task::{ArtifactType, Task, UpstreamArtifact};

/// Describes one partial update between a previous build and this one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialDescriptor {
    pub artifact_name: String,
    pub buildid: String,
    pub locale: String,
    pub platform: String,
    #[serde(rename = "previousBuildNumber")]
    pub previous_build_number: String,
    #[serde(rename = "previousVersion")]
    pub previous_version: String,
}

impl PartialDescriptor {
    fn from_artifact(artifact: &UpstreamArtifact) -> Result<Self, TaskVerificationError> {
        let name = artifact.name();
        let field = |value: &Option<String>, key: &str| {
            value
                .clone()
                .ok_or_else(|| TaskVerificationError::missing(&format!("{}.{}", name, key)))
        };

        Ok(Self {
            artifact_name: name.to_string(),
            buildid: field(&artifact.buildid, "buildid")?,
            locale: field(&artifact.locale, "locale")?,
            platform: field(&artifact.platform, "platform")?,
            previous_build_number: field(&artifact.previous_build_number, "previousBuildNumber")?,
            previous_version: field(&artifact.previous_version, "previousVersion")?,
        })
    }
}

/// Partial descriptors keyed by artifact name; empty when the task has none.
pub fn partials_props(task: &Task) -> Result<BTreeMap<String, PartialDescriptor>, TaskVerificationError> {
    task.payload
        .upstream_artifacts
        .iter()
        .filter(|a| a.artifact_type == ArtifactType::Partial)
        .map(|a| {
            let descriptor = PartialDescriptor::from_artifact(a)?;
            Ok((descriptor.artifact_name.clone(), descriptor))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(json: &str) -> Task {
        Task::from_json(json).unwrap()
    }

    #[test]
    fn test_no_partials() {
        let t = task(
            r#"{"payload": {"upstreamArtifacts": [
                {"path": "public/build/target.zip", "taskId": "a", "type": "build", "locale": "en-US"}
            ]}}"#,
        );
        assert!(partials_props(&t).unwrap().is_empty());
    }

    #[test]
    fn test_partial_descriptor() {
        let t = task(
            r#"{"payload": {"upstreamArtifacts": [
                {"path": "public/build/target.zip", "taskId": "a", "type": "build", "locale": "be"},
                {"path": "public/build/be/target.partial-1.mar", "taskId": "b", "type": "partial",
                 "locale": "be", "buildid": "20170831150342", "platform": "win32",
                 "previousBuildNumber": "1", "previousVersion": "56.0.2"}
            ]}}"#,
        );

        let partials = partials_props(&t).unwrap();
        assert_eq!(partials.len(), 1);
        assert_eq!(
            partials["target.partial-1.mar"],
            PartialDescriptor {
                artifact_name: "target.partial-1.mar".to_string(),
                buildid: "20170831150342".to_string(),
                locale: "be".to_string(),
                platform: "win32".to_string(),
                previous_build_number: "1".to_string(),
                previous_version: "56.0.2".to_string(),
            }
        );
    }

    #[test]
    fn test_partial_missing_field() {
        let t = task(
            r#"{"payload": {"upstreamArtifacts": [
                {"path": "target.partial-1.mar", "taskId": "b", "type": "partial",
                 "locale": "be", "platform": "win32",
                 "previousBuildNumber": "1", "previousVersion": "56.0.2"}
            ]}}"#,
        );
        let err = partials_props(&t).unwrap_err();
        assert_eq!(
            err,
            TaskVerificationError::MissingField("target.partial-1.mar.buildid".to_string())
        );
    }

    #[test]
    fn test_descriptor_serializes_camel_case_fields() {
        let descriptor = PartialDescriptor {
            artifact_name: "a.mar".to_string(),
            buildid: "1".to_string(),
            locale: "de".to_string(),
            platform: "linux".to_string(),
            previous_build_number: "2".to_string(),
            previous_version: "55.0".to_string(),
        };
        let value = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(value["previousBuildNumber"], "2");
        assert_eq!(value["previousVersion"], "55.0");
        assert_eq!(value["artifact_name"], "a.mar");
    }
}
