//! Template arguments for a release task.
//!
//! Everything a manifest template can refer to is computed here from the
//! task, the action and the bucket. The result is a pure function of those
//! three inputs.

use std::collections::BTreeMap;

use serde::Serialize;

use beetmover_paths::{filename_platform, product_name, stage_platform_name, DEVEDITION_TEMPLATE_KEY};
use beetmover_task::{
    is_partner_private_task, is_partner_public_task, is_promotion_action, is_release_action,
    partials_props, LocaleSource, PartialDescriptor, ReleaseContext, TaskVerificationError,
};

use crate::template::TemplateVars;

/// Stage platforms with this suffix use the Developer Edition templates.
const DEVEDITION_PLATFORM_SUFFIX: &str = "-devedition";

/// Which family of templates an action selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Nightly,
    Candidates,
    Releases,
    PartnerPrivate,
    PartnerPublic,
}

impl Stage {
    pub fn for_context(ctx: &ReleaseContext) -> Self {
        if is_partner_private_task(ctx) {
            Stage::PartnerPrivate
        } else if is_partner_public_task(ctx) {
            Stage::PartnerPublic
        } else if is_promotion_action(ctx.action()) {
            Stage::Candidates
        } else if is_release_action(ctx.action()) {
            Stage::Releases
        } else {
            Stage::Nightly
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Nightly => "nightly",
            Stage::Candidates => "candidates",
            Stage::Releases => "releases",
            Stage::PartnerPrivate => "partner_private",
            Stage::PartnerPublic => "partner_public",
        }
    }
}

/// Values fed to manifest rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateArgs {
    pub branch: String,
    pub product: String,
    pub filename_platform: String,
    pub stage_platform: String,
    pub platform: String,
    pub template_key: String,
    pub upload_date: String,
    pub version: String,
    pub buildid: String,
    pub partials: BTreeMap<String, PartialDescriptor>,

    /// Only for promotion to candidates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_number: Option<u32>,

    /// Absent when neither payload nor artifacts name a locale
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locales: Option<Vec<String>>,
}

impl TemplateArgs {
    /// Scalar arguments as template variables.
    pub fn vars(&self) -> TemplateVars {
        let mut vars = TemplateVars::new();
        vars.insert("branch".into(), self.branch.clone());
        vars.insert("product".into(), self.product.clone());
        vars.insert("filename_platform".into(), self.filename_platform.clone());
        vars.insert("stage_platform".into(), self.stage_platform.clone());
        vars.insert("platform".into(), self.platform.clone());
        vars.insert("template_key".into(), self.template_key.clone());
        vars.insert("upload_date".into(), self.upload_date.clone());
        vars.insert("version".into(), self.version.clone());
        vars.insert("buildid".into(), self.buildid.clone());
        if let Some(build_number) = self.build_number {
            vars.insert("build_number".into(), build_number.to_string());
        }
        vars
    }
}

/// Base of the template key: `devedition` or the lower-cased app name.
fn template_base(ctx: &ReleaseContext) -> String {
    let props = ctx.release_props();
    if props.platform.ends_with(DEVEDITION_PLATFORM_SUFFIX) {
        DEVEDITION_TEMPLATE_KEY.to_string()
    } else {
        props.app_name.to_lowercase()
    }
}

/// Build the template arguments for a task.
pub fn generate_template_args(ctx: &ReleaseContext) -> Result<TemplateArgs, TaskVerificationError> {
    let payload = &ctx.task().payload;
    let props = ctx.release_props();

    let base = template_base(ctx);
    let template_key = format!("{}_{}", base, Stage::for_context(ctx).as_str());

    let upload_date = payload
        .upload_date
        .as_ref()
        .ok_or_else(|| TaskVerificationError::MissingField("upload_date".to_string()))?
        .format()?;

    let version = payload
        .version
        .clone()
        .or_else(|| props.app_version.clone())
        .ok_or_else(|| TaskVerificationError::MissingField("version".to_string()))?;

    let build_number = if is_promotion_action(ctx.action()) {
        Some(
            payload
                .build_number
                .ok_or_else(|| TaskVerificationError::MissingField("build_number".to_string()))?,
        )
    } else {
        None
    };

    let partials = partials_props(ctx.task())?;
    let locales = LocaleSource::from_payload(payload).resolve()?;

    Ok(TemplateArgs {
        branch: props.branch.clone(),
        product: product_name(&props.app_name, &base),
        filename_platform: filename_platform(&props.platform),
        stage_platform: props.platform.clone(),
        platform: stage_platform_name(&props.platform),
        template_key,
        upload_date,
        version,
        buildid: props.buildid.clone(),
        partials,
        build_number,
        locales,
    })
}
