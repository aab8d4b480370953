//! Action and bucket context a task runs under.
//!
//! Actions and buckets are opaque strings chosen by the caller; they are
//! only ever compared for equality against the known values below.

use crate::error::TaskVerificationError;
use crate::task::{ReleaseProperties, Task};

pub const ACTION_PUSH_TO_NIGHTLY: &str = "push-to-nightly";
pub const ACTION_PUSH_TO_CANDIDATES: &str = "push-to-candidates";
pub const ACTION_PUSH_TO_RELEASES: &str = "push-to-releases";
pub const ACTION_PUSH_TO_PARTNER: &str = "push-to-partner";

/// Buckets with this suffix only hold partner-restricted builds.
pub const PARTNER_BUCKET_SUFFIX: &str = "-partner";

/// A task together with the action and bucket it was dispatched with.
///
/// Construction checks that the task carries release properties, so
/// [`ReleaseContext::release_props`] is always available. Fields are private
/// and the context is read-only once built.
#[derive(Debug, Clone)]
pub struct ReleaseContext {
    task: Task,
    action: String,
    bucket: String,
    release_props: ReleaseProperties,
}

impl ReleaseContext {
    pub fn new(
        task: Task,
        action: impl Into<String>,
        bucket: impl Into<String>,
    ) -> Result<Self, TaskVerificationError> {
        let release_props = task
            .payload
            .release_properties
            .clone()
            .ok_or_else(|| TaskVerificationError::missing("releaseProperties"))?;

        Ok(Self {
            task,
            action: action.into(),
            bucket: bucket.into(),
            release_props,
        })
    }

    pub fn task(&self) -> &Task {
        &self.task
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Release properties of the task.
    pub fn release_props(&self) -> &ReleaseProperties {
        &self.release_props
    }
}

/// `push-to-releases`: copy candidates into the releases directory.
pub fn is_release_action(action: &str) -> bool {
    action == ACTION_PUSH_TO_RELEASES
}

/// `push-to-candidates`: promote a build into the candidates directory.
pub fn is_promotion_action(action: &str) -> bool {
    action == ACTION_PUSH_TO_CANDIDATES
}

fn is_partner_action(action: &str) -> bool {
    action == ACTION_PUSH_TO_PARTNER
}

/// Partner push into a partner-only bucket.
pub fn is_partner_private(action: &str, bucket: &str) -> bool {
    is_partner_action(action) && bucket.ends_with(PARTNER_BUCKET_SUFFIX)
}

/// Partner push into a public bucket.
pub fn is_partner_public(action: &str, bucket: &str) -> bool {
    is_partner_action(action) && !bucket.ends_with(PARTNER_BUCKET_SUFFIX)
}

pub fn is_partner_private_task(ctx: &ReleaseContext) -> bool {
    is_partner_private(ctx.action(), ctx.bucket())
}

pub fn is_partner_public_task(ctx: &ReleaseContext) -> bool {
    is_partner_public(ctx.action(), ctx.bucket())
}
