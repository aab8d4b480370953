//! Release task types
//!
//! Defines the task definition handed to beetmover by the pipeline, the
//! action/bucket context it runs under, and the verification rules applied
//! before any destination keys are computed.

pub mod context;
pub mod error;
pub mod locale;
pub mod partials;
pub mod task;

pub use context::{
    is_partner_private, is_partner_private_task, is_partner_public, is_partner_public_task,
    is_promotion_action, is_release_action, ReleaseContext, ACTION_PUSH_TO_CANDIDATES, ACTION_PUSH_TO_NIGHTLY, ACTION_PUSH_TO_PARTNER,
    ACTION_PUSH_TO_RELEASES, PARTNER_BUCKET_SUFFIX,
};
pub use error::TaskVerificationError;
pub use locale::{check_locale_consistency, LocaleSource};
pub use partials::{partials_props, PartialDescriptor};
pub use task::{ArtifactType, Payload, ReleaseProperties, Task, UploadDate, UpstreamArtifact};
