//! Beetmover - release artifact manifest generation
//!
//! Computes where release-pipeline artifacts go in the object store:
//! template arguments from the task, a manifest of source keys and
//! destinations rendered from templates, candidates-to-releases copy plans,
//! and checksums of local files.

pub mod args;
pub mod checksums;
pub mod config;
pub mod hash;
pub mod manifest;
pub mod release;
pub mod template;

pub use args::{generate_template_args, Stage, TemplateArgs};
pub use checksums::{
    alter_unpretty_files, collect_checksums, render_checksums, write_checksums, ChecksumEntry, ChecksumError,
};
pub use config::{BeetmoverConfig, ConfigError, EffectiveConfig};
pub use hash::{get_hash, hash_file, HashAlgorithm, HashError, HASH_BLOCK_SIZE};
pub use manifest::{
    alter_unpretty_contents, generate_manifest, render_manifest, Manifest, ManifestEntry, ManifestError,
    PackageContents, MULTI_LOCALE,
};
pub use release::{plan_release_copy, CopyOperation};
pub use template::{Environment, TemplateEnv, TemplateError, TemplateVars};

pub use beetmover_paths::{candidates_prefix, matches_exclude, product_name, releases_prefix, ExcludePatterns};
pub use beetmover_task::{ReleaseContext, Task, TaskVerificationError};
