//! Candidates -> releases copy planning.
//!
//! Shipping a release copies every candidate artifact of the chosen build
//! into the releases directory, minus the excluded keys. Only the plan is
//! computed here; executing the copies is up to the caller.

use serde::{Deserialize, Serialize};

use beetmover_paths::{candidates_prefix, releases_prefix, ExcludePatterns};

/// One object-store copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyOperation {
    pub source: String,
    pub destination: String,
}

/// Plan the copies from candidates to releases.
///
/// Keys outside the build's candidates prefix are ignored.
pub fn plan_release_copy<S: AsRef<str>>(
    product: &str,
    version: &str,
    build_number: u32,
    candidate_keys: &[S],
    excludes: &ExcludePatterns,
) -> Vec<CopyOperation> {
    let from = candidates_prefix(product, version, build_number);
    let to = releases_prefix(product, version);

    let mut plan: Vec<CopyOperation> = candidate_keys
        .iter()
        .map(|k| k.as_ref())
        .filter_map(|key| {
            let rel = key.strip_prefix(from.as_str())?;
            if rel.is_empty() {
                return None;
            }
            if excludes.is_excluded(key) {
                tracing::debug!(%key, "excluded from release");
                return None;
            }
            Some(CopyOperation {
                source: key.to_string(),
                destination: format!("{}{}", to, rel),
            })
        })
        .collect();

    plan.sort_by(|a, b| a.source.cmp(&b.source));
    plan.dedup();

    tracing::info!(%from, %to, copies = plan.len(), "planned release copy");
    plan
}
