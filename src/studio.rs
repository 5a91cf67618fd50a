//! One user session: describe, preview, export.
//!
//! The two request handlers ([`Studio::handle_generate`], [`Studio::handle_export`]) are
//! stateless and speak the JSON payloads below. [`Studio::generate`] and [`Studio::export`]
//! add the session on top: the latest normalized code and its preview, replaced wholesale on
//! every generation.

use crate::config::Settings;
use crate::export::{ExportArtifact, RemotionCliBackend, RenderBackend, export_video};
use crate::foundation::error::{ReelError, ReelResult};
use crate::gateway::{CommandGenerator, Generator};
use crate::normalize::normalize_response;
use crate::preview::PreviewHost;
use crate::prompt::assemble_prompt;
use crate::synth::synthesize;

/// Shown when generated code cannot be turned into a component.
pub const COMPILE_FAILED: &str = "Failed to compile the generated component. Try rephrasing.";

/// Body of a generate request.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GenerateRequest {
    pub description: String,
}

/// Body of a generate response: `{"code": ..}` or `{"error": ..}`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum GenerateResponse {
    Ok { code: String },
    Err { error: String },
}

/// Body of an export request.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ExportRequest {
    pub code: String,
}

/// Body of any failed request.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&ReelError> for ErrorResponse {
    fn from(err: &ReelError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

pub struct Studio {
    settings: Settings,
    generator: Box<dyn Generator>,
    backend: Box<dyn RenderBackend>,
    code: Option<String>,
    preview: Option<PreviewHost>,
}

impl std::fmt::Debug for Studio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Studio")
            .field("settings", &self.settings)
            .field("code_bytes", &self.code.as_ref().map(String::len))
            .field("preview", &self.preview.is_some())
            .finish_non_exhaustive()
    }
}

impl Studio {
    pub fn new(
        settings: Settings,
        generator: Box<dyn Generator>,
        backend: Box<dyn RenderBackend>,
    ) -> ReelResult<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            generator,
            backend,
            code: None,
            preview: None,
        })
    }

    /// Session wired to the configured generator command and the Remotion CLI.
    pub fn from_settings(settings: Settings) -> ReelResult<Self> {
        let generator = CommandGenerator::new(settings.generator.clone())?;
        let backend = RemotionCliBackend::new(settings.export.clone());
        Self::new(settings, Box::new(generator), Box::new(backend))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Normalized code of the latest successful generation.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn preview(&self) -> Option<&PreviewHost> {
        self.preview.as_ref()
    }

    pub fn preview_mut(&mut self) -> Option<&mut PreviewHost> {
        self.preview.as_mut()
    }

    /// Generate endpoint: prompt, model, normalization. No session state is touched.
    pub fn handle_generate(&self, request: &GenerateRequest) -> GenerateResponse {
        match self.generate_code(&request.description) {
            Ok(code) => GenerateResponse::Ok { code },
            Err(err) => GenerateResponse::Err {
                error: err.to_string(),
            },
        }
    }

    /// Export endpoint: render `request.code` with the session's composition settings.
    pub fn handle_export(&self, request: &ExportRequest) -> Result<ExportArtifact, ErrorResponse> {
        export_video(
            &request.code,
            &self.settings.composition,
            &self.settings.export,
            self.backend.as_ref(),
        )
        .map_err(|e| ErrorResponse::from(&e))
    }

    /// Generate code for `description` and load it into the preview.
    ///
    /// A generation failure leaves the session as it was. Code that generates but does not
    /// compile still replaces the session code (it stays exportable) and clears the preview;
    /// the error then carries [`COMPILE_FAILED`].
    #[tracing::instrument(level = "info", skip_all, fields(description_len = description.len()))]
    pub fn generate(&mut self, description: &str) -> ReelResult<&PreviewHost> {
        let code = self.generate_code(description)?;
        let unit = synthesize(&code, &self.settings.composition);
        self.code = Some(code);
        self.preview = None;

        let Some(unit) = unit else {
            return Err(ReelError::synthesis(COMPILE_FAILED));
        };
        let host = PreviewHost::new(unit, self.settings.composition.clone())?;
        Ok(&*self.preview.insert(host))
    }

    /// Export the session's current code. Requires a completed generation.
    pub fn export(&self) -> ReelResult<ExportArtifact> {
        let Some(code) = self.code.as_deref() else {
            return Err(ReelError::validation(
                "nothing to export: generate a component first",
            ));
        };
        export_video(
            code,
            &self.settings.composition,
            &self.settings.export,
            self.backend.as_ref(),
        )
    }

    fn generate_code(&self, description: &str) -> ReelResult<String> {
        if description.trim().is_empty() {
            return Err(ReelError::validation("describe the video to generate"));
        }
        let prompt = assemble_prompt(description, &self.settings.composition);
        let raw = self.generator.generate(&prompt)?;
        let code = normalize_response(&raw);
        tracing::debug!(raw_bytes = raw.len(), code_bytes = code.len(), "response normalized");
        Ok(code)
    }
}

#[cfg(test)]
#[path = "../tests/unit/studio.rs"]
mod tests;
