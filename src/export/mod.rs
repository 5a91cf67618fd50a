//! Export pipeline: wrap a component snippet in a minimal Remotion project, bundle it,
//! render it and hand back the encoded bytes.
//!
//! The project directory is temporary and removed whether or not the render succeeds.

pub mod backend;
pub mod project;

use std::time::Instant;

use anyhow::Context as _;

use crate::config::{CompositionConfig, ExportConfig};
use crate::foundation::error::{ReelError, ReelResult};

pub use backend::{RemotionCliBackend, RenderBackend, codec_media};
pub use project::ExportProject;

/// Message reported when a failure carries no detail of its own.
pub const RENDER_FAILED: &str = "Render failed";

/// A finished video, ready to be delivered as a download.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportArtifact {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub file_name: String,
}

impl ExportArtifact {
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.file_name)
    }
}

/// Render `snippet` to a video with the composition settings used for preview.
#[tracing::instrument(
    level = "info",
    skip_all,
    fields(composition = %composition.id, code_bytes = snippet.len(), codec = %export.codec)
)]
pub fn export_video(
    snippet: &str,
    composition: &CompositionConfig,
    export: &ExportConfig,
    backend: &dyn RenderBackend,
) -> ReelResult<ExportArtifact> {
    composition.validate()?;
    export.validate()?;
    if snippet.trim().is_empty() {
        return Err(ReelError::validation("no component code to export"));
    }
    let (ext, content_type) = codec_media(&export.codec).ok_or_else(|| {
        ReelError::validation(format!("unsupported codec '{}'", export.codec))
    })?;

    let started = Instant::now();
    let deadline = started + export.timeout();
    let project = ExportProject::assemble(snippet, composition)?;

    let rendered = render_in(&project, backend, ext, deadline);

    if let Err(e) = project.close() {
        tracing::warn!(error = %e, "export workspace cleanup failed");
    }

    let bytes = rendered.map_err(|e| {
        tracing::warn!(error = %e, "export failed");
        match e {
            ReelError::Render(_) | ReelError::Validation(_) => e,
            other => {
                let msg = other.to_string();
                ReelError::render(if msg.is_empty() { RENDER_FAILED.to_owned() } else { msg })
            }
        }
    })?;

    tracing::info!(
        bytes = bytes.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "export finished"
    );
    Ok(ExportArtifact {
        bytes,
        content_type: content_type.to_owned(),
        file_name: export.file_name.clone(),
    })
}

fn render_in(
    project: &ExportProject,
    backend: &dyn RenderBackend,
    ext: &str,
    deadline: Instant,
) -> ReelResult<Vec<u8>> {
    let bundle = backend.bundle(project, deadline)?;
    let output = project.root().join(format!("output.{ext}"));
    backend.render(project, &bundle, &output, deadline)?;
    if Instant::now() > deadline {
        return Err(ReelError::render("export exceeded its deadline"));
    }
    let bytes = std::fs::read(&output)
        .with_context(|| format!("read rendered video '{}'", output.display()))?;
    if bytes.is_empty() {
        return Err(ReelError::render("renderer produced an empty file"));
    }
    Ok(bytes)
}
