//! Generation gateway: forwards an assembled prompt to an external text generator.

use crate::config::GeneratorConfig;
use crate::foundation::error::{ReelError, ReelResult};
use crate::process::{ProcessSpec, run_process};

/// Source of raw model output.
///
/// Implementations return the generator's full textual output verbatim. Any failure (timeout,
/// non-zero exit, oversized output) is a [`ReelError::Generation`]; no partial output is salvaged.
pub trait Generator {
    /// Send `prompt` and return the raw response text.
    fn generate(&self, prompt: &str) -> ReelResult<String>;
}

/// Generator backed by an external process that reads the prompt on stdin and answers on stdout.
#[derive(Clone, Debug)]
pub struct CommandGenerator {
    cfg: GeneratorConfig,
}

impl CommandGenerator {
    /// Create a generator from validated settings.
    pub fn new(cfg: GeneratorConfig) -> ReelResult<Self> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    /// Settings in use.
    pub fn config(&self) -> &GeneratorConfig {
        &self.cfg
    }
}

impl Generator for CommandGenerator {
    #[tracing::instrument(level = "info", skip_all, fields(program = %self.cfg.program, prompt_bytes = prompt.len()))]
    fn generate(&self, prompt: &str) -> ReelResult<String> {
        let spec = ProcessSpec::new(self.cfg.program.clone(), self.cfg.timeout())
            .args(self.cfg.args.iter().cloned())
            .stdin(prompt.as_bytes().to_vec())
            .max_output_bytes(self.cfg.max_output_bytes);

        let out = run_process(&spec).map_err(|e| ReelError::generation(e.to_string()))?;
        Ok(out.stdout_lossy())
    }
}

/// Generator that replays canned responses, for tests and offline runs.
#[derive(Clone, Debug)]
pub struct ScriptedGenerator {
    response: Result<String, String>,
}

impl ScriptedGenerator {
    /// Always answer with `text`.
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            response: Ok(text.into()),
        }
    }

    /// Always fail with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            response: Err(message.into()),
        }
    }
}

impl Generator for ScriptedGenerator {
    fn generate(&self, _prompt: &str) -> ReelResult<String> {
        self.response.clone().map_err(ReelError::generation)
    }
}
