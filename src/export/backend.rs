//! Bundle and render steps. The CLI backend drives the Remotion toolchain; tests and
//! embedders substitute their own [`RenderBackend`].

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::ExportConfig;
use crate::export::project::ExportProject;
use crate::foundation::error::{ReelError, ReelResult};
use crate::process::{ProcessSpec, run_process};

const RENDER_LOG_CAP_BYTES: usize = 16 * 1024 * 1024;

/// The two steps that turn an assembled project into a video file.
///
/// Both receive the deadline shared by the whole export; a step that cannot finish before it
/// must fail with [`ReelError::Render`].
pub trait RenderBackend {
    /// Bundle `project` and return the bundle location.
    fn bundle(&self, project: &ExportProject, deadline: Instant) -> ReelResult<PathBuf>;

    /// Render the composition from `bundle` into `output`.
    fn render(
        &self,
        project: &ExportProject,
        bundle: &Path,
        output: &Path,
        deadline: Instant,
    ) -> ReelResult<()>;
}

/// Container extension and media type for a renderer codec.
pub fn codec_media(codec: &str) -> Option<(&'static str, &'static str)> {
    match codec {
        "h264" | "h265" => Some(("mp4", "video/mp4")),
        "vp8" | "vp9" => Some(("webm", "video/webm")),
        "prores" => Some(("mov", "video/quicktime")),
        "gif" => Some(("gif", "image/gif")),
        _ => None,
    }
}

/// Runs `<program> <bundle_args> index.ts --out-dir <dir>` and
/// `<program> <render_args> <bundle> <id> <output> --codec <codec>` inside the project.
#[derive(Clone, Debug)]
pub struct RemotionCliBackend {
    config: ExportConfig,
}

impl RemotionCliBackend {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    fn spec(&self, project: &ExportProject, deadline: Instant, step: &str) -> ReelResult<ProcessSpec> {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(ReelError::render(format!(
                "export deadline of {}ms passed before {step}",
                self.config.timeout_ms
            )));
        }
        Ok(ProcessSpec::new(&self.config.program, remaining)
            .cwd(project.root())
            .max_output_bytes(RENDER_LOG_CAP_BYTES))
    }
}

impl RenderBackend for RemotionCliBackend {
    fn bundle(&self, project: &ExportProject, deadline: Instant) -> ReelResult<PathBuf> {
        let out_dir = project.bundle_dir();
        let spec = self
            .spec(project, deadline, "bundling")?
            .args(self.config.bundle_args.iter().cloned())
            .args([
                project.entry_point().display().to_string(),
                "--out-dir".to_owned(),
                out_dir.display().to_string(),
            ]);
        run_process(&spec).map_err(|e| ReelError::render(format!("bundle failed: {e}")))?;
        Ok(out_dir)
    }

    fn render(
        &self,
        project: &ExportProject,
        bundle: &Path,
        output: &Path,
        deadline: Instant,
    ) -> ReelResult<()> {
        let spec = self
            .spec(project, deadline, "rendering")?
            .args(self.config.render_args.iter().cloned())
            .args([
                bundle.display().to_string(),
                project.composition().id.clone(),
                output.display().to_string(),
                "--codec".to_owned(),
                self.config.codec.clone(),
            ]);
        let out =
            run_process(&spec).map_err(|e| ReelError::render(format!("render failed: {e}")))?;
        tracing::debug!(
            elapsed_ms = out.elapsed.as_millis() as u64,
            stderr = %out.stderr_lossy(),
            "renderer finished"
        );
        Ok(())
    }
}
