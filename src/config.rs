//! Immutable configuration values threaded through the pipeline.
//!
//! [`CompositionConfig`] is the single source of truth for duration, frame rate and dimensions. The
//! prompt assembler, preview host and export pipeline all read it, so preview and export always
//! describe the same video.

use std::path::Path;
use std::time::Duration;

use anyhow::Context as _;

use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameRange};
use crate::foundation::error::{ReelError, ReelResult};

/// Fixed composition tuple: identifier, duration, frame rate and dimensions.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CompositionConfig {
    /// Composition identifier registered with the renderer.
    pub id: String,
    /// Timeline length in frames.
    pub duration_in_frames: u64,
    /// Frame rate.
    pub fps: Fps,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
}

impl Default for CompositionConfig {
    fn default() -> Self {
        Self {
            id: "GeneratedVideo".to_owned(),
            duration_in_frames: 300,
            fps: Fps::whole(30),
            width: 1920,
            height: 1080,
        }
    }
}

impl CompositionConfig {
    /// Check the invariants the renderer relies on.
    pub fn validate(&self) -> ReelResult<()> {
        if self.id.is_empty()
            || !self
                .id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ReelError::validation(format!(
                "composition id '{}' must be non-empty and contain only [A-Za-z0-9_-]",
                self.id
            )));
        }
        if self.duration_in_frames == 0 {
            return Err(ReelError::validation("duration_in_frames must be non-zero"));
        }
        Fps::new(self.fps.num, self.fps.den)?;
        if self.width == 0 || self.height == 0 {
            return Err(ReelError::validation("width/height must be non-zero"));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            // h264 output targets yuv420p.
            return Err(ReelError::validation(
                "width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        Ok(())
    }

    /// Whole timeline as a frame range.
    pub fn frame_range(&self) -> FrameRange {
        FrameRange {
            start: FrameIndex(0),
            end: FrameIndex(self.duration_in_frames),
        }
    }

    /// Frame dimensions.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Timeline length in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.fps.frames_to_secs(self.duration_in_frames)
    }
}

/// External text-generation process settings.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Program to launch.
    pub program: String,
    /// Arguments passed to the program. The prompt itself is written to stdin.
    pub args: Vec<String>,
    /// Upper bound on the whole generation round trip.
    pub timeout_ms: u64,
    /// Upper bound on captured stdout.
    pub max_output_bytes: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            program: "claude".to_owned(),
            args: vec!["--print".to_owned()],
            timeout_ms: 90_000,
            max_output_bytes: 1024 * 1024,
        }
    }
}

impl GeneratorConfig {
    /// Timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Check basic sanity of the settings.
    pub fn validate(&self) -> ReelResult<()> {
        if self.program.trim().is_empty() {
            return Err(ReelError::validation("generator program must be set"));
        }
        if self.timeout_ms == 0 {
            return Err(ReelError::validation("generator timeout must be non-zero"));
        }
        if self.max_output_bytes == 0 {
            return Err(ReelError::validation(
                "generator max_output_bytes must be non-zero",
            ));
        }
        Ok(())
    }
}

/// Export pipeline settings (bundler/renderer invocation).
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Program used for both the bundle and the render step.
    pub program: String,
    /// Arguments preceding the bundle step's own arguments (e.g. `remotion bundle`).
    pub bundle_args: Vec<String>,
    /// Arguments preceding the render step's own arguments (e.g. `remotion render`).
    pub render_args: Vec<String>,
    /// Shared deadline for bundling and rendering.
    pub timeout_ms: u64,
    /// Video codec passed to the renderer.
    pub codec: String,
    /// File name advertised in the attachment disposition.
    pub file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            program: "npx".to_owned(),
            bundle_args: vec!["remotion".to_owned(), "bundle".to_owned()],
            render_args: vec!["remotion".to_owned(), "render".to_owned()],
            timeout_ms: 120_000,
            codec: "h264".to_owned(),
            file_name: "marketing-video.mp4".to_owned(),
        }
    }
}

impl ExportConfig {
    /// Timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Check basic sanity of the settings.
    pub fn validate(&self) -> ReelResult<()> {
        if self.program.trim().is_empty() {
            return Err(ReelError::validation("export program must be set"));
        }
        if self.timeout_ms == 0 {
            return Err(ReelError::validation("export timeout must be non-zero"));
        }
        if self.file_name.is_empty() || self.file_name.contains(['/', '\\', '"']) {
            return Err(ReelError::validation(format!(
                "export file name '{}' is not a plain file name",
                self.file_name
            )));
        }
        Ok(())
    }
}

/// Complete settings document, loadable from JSON.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Composition shared by prompt, preview and export.
    pub composition: CompositionConfig,
    /// Generation process settings.
    pub generator: GeneratorConfig,
    /// Export process settings.
    pub export: ExportConfig,
}

impl Settings {
    /// Parse settings from a JSON string. Missing fields take their defaults.
    pub fn from_json_str(s: &str) -> ReelResult<Self> {
        let settings: Self =
            serde_json::from_str(s).map_err(|e| ReelError::serde(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read and parse a JSON settings file.
    pub fn from_json_file(path: &Path) -> ReelResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read settings '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Validate every section.
    pub fn validate(&self) -> ReelResult<()> {
        self.composition.validate()?;
        self.generator.validate()?;
        self.export.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_ten_seconds_of_1080p30() {
        let c = CompositionConfig::default();
        c.validate().unwrap();
        assert_eq!(c.id, "GeneratedVideo");
        assert_eq!(c.duration_in_frames, 300);
        assert_eq!(c.fps, Fps::whole(30));
        assert_eq!((c.width, c.height), (1920, 1080));
        assert_eq!(c.duration_secs(), 10.0);
        assert_eq!(c.frame_range().len_frames(), 300);
    }

    #[test]
    fn validation_catches_bad_values() {
        let mut c = CompositionConfig {
            width: 1921,
            ..CompositionConfig::default()
        };
        assert!(c.validate().is_err());
        c.width = 1920;
        c.duration_in_frames = 0;
        assert!(c.validate().is_err());
        c.duration_in_frames = 10;
        c.id = "has space".to_owned();
        assert!(c.validate().is_err());

        let g = GeneratorConfig {
            timeout_ms: 0,
            ..GeneratorConfig::default()
        };
        assert!(g.validate().is_err());

        let e = ExportConfig {
            file_name: "../evil.mp4".to_owned(),
            ..ExportConfig::default()
        };
        assert!(e.validate().is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let s = Settings::from_json_str(
            r#"{ "composition": { "duration_in_frames": 150 }, "generator": { "timeout_ms": 5000 } }"#,
        )
        .unwrap();
        assert_eq!(s.composition.duration_in_frames, 150);
        assert_eq!(s.composition.width, 1920);
        assert_eq!(s.generator.timeout(), Duration::from_secs(5));
        assert_eq!(s.generator.program, "claude");
        assert_eq!(s.export, ExportConfig::default());
    }

    #[test]
    fn malformed_json_is_a_serde_error() {
        let err = Settings::from_json_str("{ nope").unwrap_err();
        assert!(matches!(err, ReelError::Serde(_)));
    }
}
