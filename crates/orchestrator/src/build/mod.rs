//! Build pipeline (C5): turn a service's declared source into an image
//! tag the scheduler can start, streaming build context and build events
//! without ever staging an intermediate archive on disk.

mod pipeline;
mod source;

use crate::error::OrchestratorError;
use crate::log_line::emit;
use crate::naming::image_tag;
use crate::node::NodeContext;
use forge_manifest::Service;
use std::path::Path;

/// Resolve `service`'s image source, returning the tag the caller should
/// start (or have already started) a container from.
///
/// - `image:` — pull the reference; the tag is the reference itself.
/// - `path:` — build the absolute directory as context; deterministic tag.
/// - `repo:` — shallow-clone into a temp dir, build from there, then the
///   temp dir is removed by RAII as this function returns.
pub async fn resolve_image(ctx: &NodeContext, service: &Service) -> Result<String, OrchestratorError> {
    if let Some(reference) = &service.image {
        emit(&ctx.log_sink, &service.name, format!("pulling {reference}")).await;
        ctx.engine
            .pull_image(reference)
            .await
            .map_err(OrchestratorError::Engine)?;
        return Ok(reference.clone());
    }

    if let Some(path) = &service.path {
        let tag = image_tag(&ctx.app_name, &service.name);
        build_at(ctx, Path::new(path), &tag, &service.name).await?;
        return Ok(tag);
    }

    if let Some(url) = &service.repo {
        let tag = image_tag(&ctx.app_name, &service.name);
        let clone_dir = source::shallow_clone(url).await?;
        let result = build_at(ctx, clone_dir.path(), &tag, &service.name).await;
        // `clone_dir` drops here regardless of `result`, removing the
        // temporary checkout on every exit path.
        result?;
        return Ok(tag);
    }

    Err(OrchestratorError::Internal(format!(
        "service '{}' has no image source (validator should have rejected this)",
        service.name
    )))
}

async fn build_at(ctx: &NodeContext, root: &Path, tag: &str, service_name: &str) -> Result<(), OrchestratorError> {
    emit(&ctx.log_sink, service_name, format!("building {tag} from {}", root.display())).await;
    pipeline::build_from_dir(&ctx.engine, root, tag, service_name, &ctx.log_sink).await?;
    emit(&ctx.log_sink, service_name, format!("built {tag}")).await;
    Ok(())
}
