//! Response normalization: narrow raw model text to a best-effort code-only span.
//!
//! The pipeline is an ordered list of independent passes. Each pass either rewrites the text or
//! declines (`None`), in which case the previous text flows through unchanged. Malformed input is
//! never an error; the worst case is the input passed through trimmed.

pub(crate) mod pass;
pub(crate) mod scan;

use pass::{strip_code_fences, strip_preamble, strip_trailing_prose};

/// A single named normalization pass.
#[derive(Clone, Copy)]
struct Pass {
    name: &'static str,
    apply: fn(&str) -> Option<String>,
}

const PASSES: [Pass; 3] = [
    Pass {
        name: "strip_code_fences",
        apply: strip_code_fences,
    },
    Pass {
        name: "strip_preamble",
        apply: strip_preamble,
    },
    Pass {
        name: "strip_trailing_prose",
        apply: strip_trailing_prose,
    },
];

/// Result of [`normalize_with_report`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizeReport {
    /// Whitespace-trimmed snippet.
    pub code: String,
    /// Names of the passes that changed the text, in order.
    pub applied: Vec<&'static str>,
}

/// Normalize raw model output to a code snippet.
pub fn normalize_response(raw: &str) -> String {
    normalize_with_report(raw).code
}

/// Normalize raw model output and report which passes fired.
pub fn normalize_with_report(raw: &str) -> NormalizeReport {
    let mut text = raw.to_owned();
    let mut applied = Vec::new();

    for pass in PASSES {
        match (pass.apply)(&text) {
            Some(next) => {
                tracing::debug!(
                    pass = pass.name,
                    before = text.len(),
                    after = next.len(),
                    "normalize pass applied"
                );
                applied.push(pass.name);
                text = next;
            }
            None => tracing::debug!(pass = pass.name, "normalize pass skipped"),
        }
    }

    NormalizeReport {
        code: text.trim().to_owned(),
        applied,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/normalize/pipeline.rs"]
mod tests;
