//! Application and image resource commands against the build service.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use super::{conclude, CommandContext};
use crate::client::ApiRequest;

fn applications_url(ctx: &CommandContext, org: &str) -> String {
    format!("{}/imagespaces/{org}/applications", ctx.cluster_url())
}

pub async fn get_applications(ctx: &mut CommandContext) -> Result<()> {
    let org = ctx.require_org()?.to_string();
    let url = applications_url(ctx, &org);

    let response = ctx.execute(ApiRequest::get(url)).await?;
    conclude(&response, None)
}

#[derive(Debug, Args)]
pub struct GetImageArgs {
    /// Application name.
    application: String,

    /// Image revision.
    #[arg(required_unless_present = "all")]
    revision: Option<String>,

    /// Retrieve every image of the application.
    #[arg(long, conflicts_with = "revision")]
    all: bool,
}

pub async fn get_image(ctx: &mut CommandContext, args: GetImageArgs) -> Result<()> {
    let org = ctx.require_org()?.to_string();
    let base = format!("{}/{}/images", applications_url(ctx, &org), args.application);
    let url = match args.revision {
        Some(revision) => format!("{base}/{revision}"),
        None => base,
    };

    let response = ctx.execute(ApiRequest::get(url)).await?;
    conclude(&response, None)
}

#[derive(Debug, Args)]
pub struct CreateImageArgs {
    /// Application name.
    application: String,

    /// Image revision to build.
    revision: String,

    /// Public path in `port:basePath` form, e.g. `9000:/shop`.
    public_path: String,

    /// Zipped application source archive.
    zip_path: PathBuf,
}

/// Build an image from a zipped source archive. Exposed to the composite
/// deploy flow as well as `create image`.
pub(crate) async fn build_image(
    ctx: &mut CommandContext,
    org: &str,
    application: &str,
    revision: &str,
    public_path: &str,
    zip_path: PathBuf,
) -> Result<()> {
    let url = format!("{}/imagespaces/{org}/images", ctx.cluster_url());
    let fields = vec![
        ("namespace".to_string(), org.to_string()),
        ("application".to_string(), application.to_string()),
        ("revision".to_string(), revision.to_string()),
        ("publicPath".to_string(), public_path.to_string()),
    ];

    let response = ctx
        .execute(ApiRequest::post_multipart(url, zip_path, fields))
        .await?;
    conclude(
        &response,
        Some(&format!("Image '{application}:{revision}' built.")),
    )
}

pub async fn create(ctx: &mut CommandContext, args: CreateImageArgs) -> Result<()> {
    let org = ctx.require_org()?.to_string();
    build_image(
        ctx,
        &org,
        &args.application,
        &args.revision,
        &args.public_path,
        args.zip_path,
    )
    .await
}

#[derive(Debug, Args)]
pub struct DeleteImageArgs {
    /// Application name.
    application: String,

    /// Image revision.
    revision: String,
}

pub async fn delete(ctx: &mut CommandContext, args: DeleteImageArgs) -> Result<()> {
    let org = ctx.require_org()?.to_string();
    let url = format!(
        "{}/{}/images/{}",
        applications_url(ctx, &org),
        args.application,
        args.revision
    );

    let response = ctx.execute(ApiRequest::delete(url)).await?;
    conclude(
        &response,
        Some(&format!(
            "Image '{}:{}' deleted.",
            args.application, args.revision
        )),
    )
}
