//! Beetmover manifest generation
//!
//! Renders the manifest template selected by the task's template key into
//! a mapping of locale -> artifact name -> source key and destinations.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use beetmover_paths::ExcludePatterns;
use beetmover_task::{PartialDescriptor, ReleaseContext, TaskVerificationError};

use crate::args::{generate_template_args, TemplateArgs};
use crate::template::{ArtifactScope, ArtifactTemplate, ManifestTemplate, TemplateEnv, TemplateError, TemplateVars};

/// Mapping key for artifacts not tied to a single locale.
pub const MULTI_LOCALE: &str = "multi";

/// Where one artifact goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Key of the staged artifact
    pub s3_key: String,

    /// Dated destination followed by its "latest" alias
    pub destinations: Vec<String>,
}

/// Generated manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub mapping: BTreeMap<String, BTreeMap<String, ManifestEntry>>,
}

/// Package name to the artifact names it lists, as in `target.test_packages.json`.
pub type PackageContents = BTreeMap<String, Vec<String>>;

/// Errors for manifest generation
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error(transparent)]
    Verification(#[from] TaskVerificationError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("Template '{template}' maps artifact '{name}' twice for locale '{locale}'")]
    DuplicateArtifact {
        template: String,
        locale: String,
        name: String,
    },
}

impl Manifest {
    /// Number of artifacts across all locales
    pub fn artifact_count(&self) -> usize {
        self.mapping.values().map(BTreeMap::len).sum()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn write_to_file(&self, path: &Path) -> io::Result<()> {
        let json = self.to_json().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("JSON serialization failed: {}", e),
            )
        })?;
        fs::write(path, json)
    }
}

struct Renderer<'a> {
    env: &'a dyn TemplateEnv,
    key: &'a str,
    template: &'a ManifestTemplate,
    excludes: &'a ExcludePatterns,
    manifest: Manifest,
}

impl Renderer<'_> {
    fn render(&self, part: &str, source: &str, vars: &TemplateVars) -> Result<String, TemplateError> {
        self.env.render(&format!("{}.{}", self.key, part), source, vars)
    }

    fn add(&mut self, locale: &str, artifact: &ArtifactTemplate, vars: &TemplateVars) -> Result<(), ManifestError> {
        let name = self.render("name", &artifact.name, vars)?;
        let s3_key = self.render("s3_key", &artifact.s3_key, vars)?;
        let destination = self.render("destination", &artifact.destination, vars)?;
        let dated = self.render("dated_prefix", &self.template.dated_prefix, vars)?;
        let latest = self.render("latest_prefix", &self.template.latest_prefix, vars)?;

        let destinations = vec![
            format!("{}{}", dated, destination),
            format!("{}{}", latest, destination),
        ];

        if self.excludes.is_excluded(&s3_key) || destinations.iter().any(|d| self.excludes.is_excluded(d)) {
            tracing::debug!(%locale, %name, %s3_key, "artifact matches exclude pattern, skipping");
            return Ok(());
        }

        let entries = self.manifest.mapping.entry(locale.to_string()).or_default();
        if entries.contains_key(&name) {
            return Err(ManifestError::DuplicateArtifact {
                template: self.key.to_string(),
                locale: locale.to_string(),
                name,
            });
        }
        entries.insert(name, ManifestEntry { s3_key, destinations });
        Ok(())
    }
}

fn with_locale(base: &TemplateVars, locale: &str) -> TemplateVars {
    let mut vars = base.clone();
    vars.insert("locale".into(), locale.to_string());
    vars
}

fn with_partial(base: &TemplateVars, partial: &PartialDescriptor) -> TemplateVars {
    let mut vars = with_locale(base, &partial.locale);
    vars.insert("artifact_name".into(), partial.artifact_name.clone());
    vars.insert("partial_buildid".into(), partial.buildid.clone());
    vars.insert("partial_platform".into(), partial.platform.clone());
    vars.insert("previousBuildNumber".into(), partial.previous_build_number.clone());
    vars.insert("previousVersion".into(), partial.previous_version.clone());
    vars
}

/// Under `multi`, a multi-scoped artifact of the same name takes the place
/// of the per-locale one.
fn has_multi_variant(template: &ManifestTemplate, artifact: &ArtifactTemplate) -> bool {
    template
        .artifacts
        .iter()
        .any(|a| a.scope == ArtifactScope::Multi && a.name == artifact.name)
}

/// Rewrite the artifact names in per-locale package listings to the names
/// they are uploaded under.
///
/// Names the manifest does not map for that locale are left as they are, as
/// are listings for locales the manifest does not know.
pub fn alter_unpretty_contents(manifest: &Manifest, contents: &mut BTreeMap<String, PackageContents>) {
    for (locale, packages) in contents.iter_mut() {
        let Some(entries) = manifest.mapping.get(locale) else {
            tracing::debug!(%locale, "no manifest entries for locale, leaving contents");
            continue;
        };
        for name in packages.values_mut().flatten() {
            if let Some(entry) = entries.get(name.as_str()) {
                *name = entry.s3_key.clone();
            }
        }
    }
}

/// Render a manifest from already computed template arguments.
pub fn render_manifest(
    args: &TemplateArgs,
    env: &dyn TemplateEnv,
    excludes: &ExcludePatterns,
) -> Result<Manifest, ManifestError> {
    let template = env.manifest_template(&args.template_key)?;
    tracing::info!(template_key = %args.template_key, "generating manifest");

    let base = args.vars();
    let locales: Vec<&str> = match args.locales {
        Some(ref locales) => locales.iter().map(String::as_str).collect(),
        None => vec![MULTI_LOCALE],
    };

    let mut renderer = Renderer {
        env,
        key: &args.template_key,
        template,
        excludes,
        manifest: Manifest::default(),
    };

    for artifact in &template.artifacts {
        match artifact.scope {
            ArtifactScope::Locale => {
                for locale in &locales {
                    if *locale == MULTI_LOCALE && has_multi_variant(template, artifact) {
                        continue;
                    }
                    renderer.add(locale, artifact, &with_locale(&base, locale))?;
                }
            }
            ArtifactScope::Multi => {
                renderer.add(MULTI_LOCALE, artifact, &with_locale(&base, MULTI_LOCALE))?;
            }
            ArtifactScope::Partial => {
                for partial in args.partials.values() {
                    renderer.add(&partial.locale, artifact, &with_partial(&base, partial))?;
                }
            }
        }
    }

    let manifest = renderer.manifest;
    tracing::info!(
        locales = manifest.mapping.len(),
        artifacts = manifest.artifact_count(),
        "manifest generated"
    );
    Ok(manifest)
}

/// Generate the manifest for a task.
///
/// Task verification happens before any template is looked up, so an
/// inconsistent task never produces a partial manifest.
pub fn generate_manifest(
    ctx: &ReleaseContext,
    env: &dyn TemplateEnv,
    excludes: &ExcludePatterns,
) -> Result<Manifest, ManifestError> {
    let args = generate_template_args(ctx)?;
    render_manifest(&args, env, excludes)
}
