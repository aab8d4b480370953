//! Locale resolution for a task.
//!
//! Locales can come from the payload (a single value) and from individual
//! upstream artifacts (any number). [`LocaleSource`] names which of the two
//! are present so the consistency rule is applied in exactly one place.

use std::collections::BTreeSet;

use crate::error::TaskVerificationError;
use crate::task::{ArtifactType, Payload};

/// Fail if the payload locale contradicts the upstream artifact locales.
///
/// Either side being empty is fine. Otherwise there must be exactly one
/// upstream locale and it must equal the payload locale.
pub fn check_locale_consistency<S: AsRef<str>>(
    payload_locale: Option<&str>,
    upstream_locales: &[S],
) -> Result<(), TaskVerificationError> {
    let Some(payload_locale) = payload_locale else {
        return Ok(());
    };
    if upstream_locales.is_empty() {
        return Ok(());
    }

    let agrees = upstream_locales.len() == 1 && upstream_locales[0].as_ref() == payload_locale;
    if agrees {
        Ok(())
    } else {
        Err(TaskVerificationError::LocaleMismatch {
            payload: payload_locale.to_string(),
            upstream: upstream_locales
                .iter()
                .map(|l| l.as_ref().to_string())
                .collect(),
        })
    }
}

/// Which sources carry locale information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocaleSource<'a> {
    Unspecified,
    PayloadOnly(&'a str),
    ArtifactsOnly(BTreeSet<&'a str>),
    Both {
        payload: &'a str,
        artifacts: BTreeSet<&'a str>,
    },
}

impl<'a> LocaleSource<'a> {
    /// Partial updates carry the locale of a previous build, not one being
    /// shipped, so they do not contribute.
    pub fn from_payload(payload: &'a Payload) -> Self {
        let artifacts: BTreeSet<&str> = payload
            .upstream_artifacts
            .iter()
            .filter(|a| a.artifact_type != ArtifactType::Partial)
            .filter_map(|a| a.locale.as_deref())
            .collect();

        match (payload.locale.as_deref(), artifacts.is_empty()) {
            (None, true) => LocaleSource::Unspecified,
            (Some(locale), true) => LocaleSource::PayloadOnly(locale),
            (None, false) => LocaleSource::ArtifactsOnly(artifacts),
            (Some(locale), false) => LocaleSource::Both {
                payload: locale,
                artifacts,
            },
        }
    }

    /// Sorted, de-duplicated locales, or `None` when there is no locale info.
    pub fn resolve(self) -> Result<Option<Vec<String>>, TaskVerificationError> {
        let owned = |set: BTreeSet<&str>| set.into_iter().map(str::to_string).collect::<Vec<_>>();

        match self {
            LocaleSource::Unspecified => Ok(None),
            LocaleSource::PayloadOnly(locale) => Ok(Some(vec![locale.to_string()])),
            LocaleSource::ArtifactsOnly(artifacts) => Ok(Some(owned(artifacts))),
            LocaleSource::Both { payload, artifacts } => {
                let upstream = owned(artifacts);
                check_locale_consistency(Some(payload), &upstream)?;
                Ok(Some(upstream))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::UpstreamArtifact;

    fn artifact(locale: Option<&str>) -> UpstreamArtifact {
        UpstreamArtifact {
            path: "some/path".to_string(),
            task_id: "someTaskId".to_string(),
            artifact_type: ArtifactType::Build,
            locale: locale.map(str::to_string),
            artifact_name: None,
            buildid: None,
            previous_build_number: None,
            previous_version: None,
            platform: None,
        }
    }

    fn payload(locale: Option<&str>, artifact_locales: &[Option<&str>]) -> Payload {
        Payload {
            locale: locale.map(str::to_string),
            upstream_artifacts: artifact_locales.iter().map(|l| artifact(*l)).collect(),
            ..Payload::default()
        }
    }

    #[test]
    fn test_consistency_matrix() {
        let cases: [(&str, &[&str], bool); 5] = [
            ("en-US", &[], false),
            ("en-US", &["en-US"], false),
            ("ro", &["ro"], false),
            ("en-US", &["ro"], true),
            ("en-US", &["en-US", "ro"], true),
        ];
        for (payload_locale, upstream, raises) in cases {
            let result = check_locale_consistency(Some(payload_locale), upstream);
            assert_eq!(result.is_err(), raises, "{payload_locale} vs {upstream:?}");
        }
    }

    #[test]
    fn test_consistency_without_payload_locale() {
        assert!(check_locale_consistency::<&str>(None, &["ro", "sk"]).is_ok());
        assert!(check_locale_consistency::<&str>(None, &[]).is_ok());
    }

    #[test]
    fn test_unspecified() {
        let p = payload(None, &[None]);
        assert_eq!(LocaleSource::from_payload(&p), LocaleSource::Unspecified);
        assert_eq!(LocaleSource::from_payload(&p).resolve().unwrap(), None);
    }

    #[test]
    fn test_payload_only() {
        let p = payload(Some("ro"), &[None]);
        assert_eq!(
            LocaleSource::from_payload(&p).resolve().unwrap(),
            Some(vec!["ro".to_string()])
        );
    }

    #[test]
    fn test_artifacts_only_sorted_unique() {
        let p = payload(None, &[Some("sk"), Some("ro"), Some("ro"), None]);
        assert_eq!(
            LocaleSource::from_payload(&p).resolve().unwrap(),
            Some(vec!["ro".to_string(), "sk".to_string()])
        );
    }

    #[test]
    fn test_both_consistent() {
        let p = payload(Some("en-US"), &[Some("en-US"), Some("en-US")]);
        assert_eq!(
            LocaleSource::from_payload(&p).resolve().unwrap(),
            Some(vec!["en-US".to_string()])
        );
    }

    #[test]
    fn test_both_inconsistent() {
        let p = payload(Some("en-US"), &[Some("en-US"), Some("ro")]);
        let err = LocaleSource::from_payload(&p).resolve().unwrap_err();
        assert!(matches!(err, TaskVerificationError::LocaleMismatch { .. }));
    }

    #[test]
    fn test_partial_locales_ignored() {
        let mut p = payload(None, &[Some("en-US")]);
        let mut partial = artifact(Some("be"));
        partial.artifact_type = ArtifactType::Partial;
        p.upstream_artifacts.push(partial);

        assert_eq!(
            LocaleSource::from_payload(&p).resolve().unwrap(),
            Some(vec!["en-US".to_string()])
        );
    }

    #[test]
    fn test_only_partials_is_unspecified() {
        let mut partial = artifact(Some("be"));
        partial.artifact_type = ArtifactType::Partial;
        let p = Payload {
            upstream_artifacts: vec![partial],
            ..Payload::default()
        };
        assert_eq!(LocaleSource::from_payload(&p), LocaleSource::Unspecified);
    }
}
