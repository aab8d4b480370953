//! Exclusion rules for destination keys
//!
//! Patterns are regular expressions matched anywhere in the key; authors
//! anchor them with `^`/`$` when they mean the whole key.

use regex_lite::Regex;

/// Keys never copied from candidates to releases
pub const RELEASE_EXCLUDES: &[&str] = &[
    r"^.*tests.*$",
    r"^.*crashreporter.*$",
    r"^.*\.zip(\.asc)?$",
    r"^.*\.log$",
    r"^.*\.txt$",
    r"^.*/partner-repacks.*$",
    r"^.*.checksums(\.asc)?$",
    r"^.*/logs/.*$",
    r"^.*json$",
    r"^.*/host.*$",
    r"^.*/mar-tools/.*$",
    r"^.*robocop.apk$",
    r"^.*contrib.*",
    r"^.*/beetmover-checksums/.*$",
];

/// Errors for exclusion rules
#[derive(Debug, thiserror::Error)]
pub enum PathsError {
    #[error("Invalid exclude pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex_lite::Error,
    },
}

/// Ordered, compiled exclusion patterns
#[derive(Debug, Clone, Default)]
pub struct ExcludePatterns {
    patterns: Vec<Regex>,
}

impl ExcludePatterns {
    /// Compile patterns, failing on the first invalid one
    pub fn new<I, S>(patterns: I) -> Result<Self, PathsError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| {
                let p = p.as_ref();
                Regex::new(p).map_err(|source| PathsError::InvalidPattern {
                    pattern: p.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    /// The built-in release exclusion list
    pub fn release_defaults() -> Result<Self, PathsError> {
        Self::new(RELEASE_EXCLUDES)
    }

    /// Check if a key should be excluded
    pub fn is_excluded(&self, key: &str) -> bool {
        matches_exclude(key, self)
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }
}

/// True iff `key` matches at least one pattern.
pub fn matches_exclude(key: &str, patterns: &ExcludePatterns) -> bool {
    patterns.patterns.iter().any(|re| re.is_match(key))
}
