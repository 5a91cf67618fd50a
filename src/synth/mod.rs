//! Component synthesis: turn a normalized snippet into an invocable unit.
//!
//! The snippet's module syntax is rewritten so the component ends up bound to
//! [`COMPONENT_BINDING`], the result is parsed, and the program is instantiated in a scope
//! that holds exactly the capability set, in its fixed order. Nothing is resolved through a
//! module system.

pub mod rewrite;

use std::fmt;

pub use rewrite::{BindingSource, COMPONENT_BINDING, Rewritten, rewrite_module_syntax};

use crate::capabilities::{CAPABILITY_NAMES, capability_values};
use crate::config::CompositionConfig;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ReelError, ReelResult};
use crate::preview::RenderNode;
use crate::preview::resolve::render_root;
use crate::script::{Interpreter, Value, VideoInfo, parse_program};

/// A compiled component, ready to be invoked once per frame.
///
/// Owned by one session and replaced wholesale when a new snippet is synthesized.
pub struct SynthesizedUnit {
    interp: Interpreter,
    component: Value,
    name: Option<String>,
    binding: Option<BindingSource>,
    script: String,
}

impl fmt::Debug for SynthesizedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SynthesizedUnit")
            .field("name", &self.name)
            .field("binding", &self.binding)
            .field("script_bytes", &self.script.len())
            .finish_non_exhaustive()
    }
}

impl SynthesizedUnit {
    /// Component name, when the rewrite rules could name it.
    pub fn component_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Rewrite rule that produced the component binding.
    pub fn binding_source(&self) -> Option<BindingSource> {
        self.binding
    }

    /// Script text after module-syntax rewriting.
    pub fn script(&self) -> &str {
        &self.script
    }

    /// Per-frame evaluation budget (statements plus expressions).
    pub fn set_step_limit(&mut self, steps: u64) {
        self.interp.set_step_limit(steps);
    }

    /// Invoke the component for `frame` and resolve the element tree it returns.
    ///
    /// Frame-local state (scopes, step budget, `Math.random`) is reset on every call.
    /// Module-level bindings persist between calls, as they would in a browser.
    pub fn render(&mut self, frame: FrameIndex, config: &CompositionConfig) -> ReelResult<RenderNode> {
        self.interp.video = video_info(config);
        self.interp.begin_frame(frame.0 as f64);
        render_root(&mut self.interp, &self.component, config)
            .map_err(|e| ReelError::evaluation(format!("frame {}: {e}", frame.0)))
    }
}

pub(crate) fn video_info(config: &CompositionConfig) -> VideoInfo {
    VideoInfo {
        id: config.id.clone(),
        width: config.width,
        height: config.height,
        fps: config.fps.as_f64(),
        duration_in_frames: config.duration_in_frames,
    }
}

/// Synthesize `snippet`, or `None` if it cannot be turned into a component.
///
/// The cause of a failure is logged at WARN and otherwise swallowed: callers only need to
/// know that the user should rephrase.
#[tracing::instrument(level = "debug", skip_all, fields(snippet_bytes = snippet.len()))]
pub fn synthesize(snippet: &str, config: &CompositionConfig) -> Option<SynthesizedUnit> {
    match synthesize_detailed(snippet, config) {
        Ok(unit) => Some(unit),
        Err(err) => {
            tracing::warn!(error = %err, "component synthesis failed");
            None
        }
    }
}

/// Like [`synthesize`], but reports why synthesis failed.
pub fn synthesize_detailed(snippet: &str, config: &CompositionConfig) -> ReelResult<SynthesizedUnit> {
    let Rewritten {
        code,
        component,
        binding,
    } = rewrite_module_syntax(snippet);
    tracing::debug!(?binding, ?component, "module syntax rewritten");

    let program =
        parse_program(&code).map_err(|e| ReelError::synthesis(format!("transpile failed: {e}")))?;

    let mut interp = Interpreter::new(video_info(config));
    let global = interp.global();
    let capabilities = interp.push_scope(global);
    for (name, value) in CAPABILITY_NAMES.iter().zip(capability_values()) {
        interp.declare(capabilities, name, value, true);
    }
    let module = interp.push_scope(capabilities);
    interp
        .run(&program, module)
        .map_err(|e| ReelError::synthesis(format!("instantiation failed: {e}")))?;

    let value = interp.lookup(module, COMPONENT_BINDING).unwrap_or_default();
    if value.is_nullish() {
        return Err(ReelError::synthesis(format!(
            "{COMPONENT_BINDING} was never defined"
        )));
    }
    if !value.is_callable() {
        return Err(ReelError::synthesis(format!(
            "{COMPONENT_BINDING} is a {}, not a component",
            value.type_of()
        )));
    }
    interp.seal();

    Ok(SynthesizedUnit {
        interp,
        component: value,
        name: component,
        binding,
        script: code,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/synth/mod.rs"]
mod tests;
