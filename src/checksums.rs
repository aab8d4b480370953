//! Checksums manifest for a directory of release artifacts.
//!
//! One line per file: `<digest> <hash_type> <size> <path>`, sorted by path.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::hash::{hash_file, HashAlgorithm};
use crate::manifest::{alter_unpretty_contents, Manifest, PackageContents};

/// Errors for checksum collection
#[derive(Debug, thiserror::Error)]
pub enum ChecksumError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Walk error: {0}")]
    WalkError(#[from] walkdir::Error),

    #[error("Path is not within artifact root: {0}")]
    PathNotInRoot(String),
}

/// Checksum of one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecksumEntry {
    /// Path relative to the collected directory, `/`-separated
    pub path: String,
    pub hash_type: String,
    pub size: u64,
    pub digest: String,
}

impl ChecksumEntry {
    pub fn to_line(&self) -> String {
        format!("{} {} {} {}", self.digest, self.hash_type, self.size, self.path)
    }
}

/// Hash every regular file under `dir`.
pub fn collect_checksums(dir: &Path, algorithm: HashAlgorithm) -> Result<Vec<ChecksumEntry>, ChecksumError> {
    let mut entries = Vec::new();

    for entry in WalkDir::new(dir)
        .follow_links(false)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()))
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let rel_path = path
            .strip_prefix(dir)
            .map_err(|_| ChecksumError::PathNotInRoot(path.display().to_string()))?;
        let rel_path = rel_path
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        entries.push(ChecksumEntry {
            path: rel_path,
            hash_type: algorithm.as_str().to_string(),
            size: entry.metadata()?.len(),
            digest: hash_file(path, algorithm)?,
        });
    }

    entries.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(entries)
}

/// Render the checksums file contents.
pub fn render_checksums(entries: &[ChecksumEntry]) -> String {
    entries
        .iter()
        .map(|e| e.to_line() + "\n")
        .collect()
}

pub fn write_checksums(path: &Path, entries: &[ChecksumEntry]) -> io::Result<()> {
    write_file(path, &render_checksums(entries))
}

pub fn write_file(path: &Path, contents: &str) -> io::Result<()> {
    fs::write(path, contents)
}

/// Write any serializable value as pretty JSON.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ChecksumError> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

/// Rewrite per-locale package listing files in place to their uploaded names.
pub fn alter_unpretty_files(manifest: &Manifest, files: &BTreeMap<String, PathBuf>) -> Result<(), ChecksumError> {
    let mut contents = BTreeMap::new();
    for (locale, path) in files {
        let listing: PackageContents = serde_json::from_str(&fs::read_to_string(path)?)?;
        contents.insert(locale.clone(), listing);
    }

    alter_unpretty_contents(manifest, &mut contents);

    for (locale, path) in files {
        if let Some(listing) = contents.get(locale) {
            write_json(path, listing)?;
        }
    }
    Ok(())
}
