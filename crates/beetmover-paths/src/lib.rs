//! Object-store path resolution for release artifacts.
//!
//! Pure functions mapping product/version/build metadata to the prefixes
//! used under `pub/` in the release bucket, plus the product and platform
//! naming rules applied when picking a manifest template.

pub mod exclude;
mod platform;

pub use exclude::{matches_exclude, ExcludePatterns, PathsError};
pub use platform::{filename_platform, stage_platform_name};

use std::fmt;

/// Product whose artifacts live under the `mobile` directory.
const MOBILE_PRODUCT: &str = "fennec";

/// Directory name used for [`MOBILE_PRODUCT`].
const MOBILE_DIR: &str = "mobile";

/// Template key that relabels a product as Developer Edition.
pub const DEVEDITION_TEMPLATE_KEY: &str = "devedition";

fn product_dir(product: &str) -> &str {
    if product == MOBILE_PRODUCT {
        MOBILE_DIR
    } else {
        product
    }
}

/// Prefix holding the release candidates of one build.
///
/// `candidates_prefix("fennec", "56.0", 3)` is
/// `pub/mobile/candidates/56.0-candidates/build3/`.
pub fn candidates_prefix(product: &str, version: &str, build_number: impl fmt::Display) -> String {
    format!(
        "pub/{}/candidates/{}-candidates/build{}/",
        product_dir(product),
        version,
        build_number
    )
}

/// Prefix holding the shipped release of a version.
pub fn releases_prefix(product: &str, version: &str) -> String {
    format!("pub/{}/releases/{}/", product_dir(product), version)
}

/// Product name to render into paths for a given template key.
///
/// The `devedition` template relabels the binaries while keeping the
/// capitalization of the first character of `app_name`.
pub fn product_name(app_name: &str, template_key: &str) -> String {
    if template_key != DEVEDITION_TEMPLATE_KEY {
        return app_name.to_string();
    }

    let capitalized = app_name
        .chars()
        .next()
        .map(char::is_uppercase)
        .unwrap_or(false);

    if capitalized {
        "Devedition".to_string()
    } else {
        DEVEDITION_TEMPLATE_KEY.to_string()
    }
}
