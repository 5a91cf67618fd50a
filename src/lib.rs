//! Reelsmith turns a plain-language description into an animated marketing video.
//!
//! The pipeline is request-oriented:
//!
//! - Assemble a prompt and send it to a generator ([`assemble_prompt`], [`Generator`])
//! - Narrow the raw response to code ([`normalize_response`])
//! - Synthesize a component and drive it frame by frame ([`synthesize`], [`PreviewHost`])
//! - Bundle and render the same code to a video ([`export_video`])
//!
//! [`Studio`] ties the steps into one user session.
#![forbid(unsafe_code)]

mod foundation;

pub mod capabilities;
pub mod config;
pub mod export;
pub mod gateway;
pub mod normalize;
pub mod preview;
pub(crate) mod process;
pub mod prompt;
pub(crate) mod script;
pub mod studio;
pub mod synth;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameRange};
pub use crate::foundation::error::{ReelError, ReelResult};

pub use crate::config::{CompositionConfig, ExportConfig, GeneratorConfig, Settings};
pub use crate::export::{
    ExportArtifact, ExportProject, RemotionCliBackend, RenderBackend, export_video,
};
pub use crate::gateway::{CommandGenerator, Generator, ScriptedGenerator};
pub use crate::normalize::{NormalizeReport, normalize_response, normalize_with_report};
pub use crate::preview::{FrameFingerprint, PreviewHost, PreviewStats, RenderNode};
pub use crate::prompt::assemble_prompt;
pub use crate::studio::{
    COMPILE_FAILED, ErrorResponse, ExportRequest, GenerateRequest, GenerateResponse, Studio,
};
pub use crate::synth::{SynthesizedUnit, synthesize, synthesize_detailed};
