use std::sync::OnceLock;

use regex::Regex;

use crate::normalize::scan::{line_end, statement_end};

fn fence_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(?:```|~~~)[\w.+#-]*\s*$").expect("fence regex should compile")
    })
}

fn trailing_fence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*```\s*$").expect("trailing fence regex should compile"))
}

fn code_start_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(?:const |let |var |function |async function |//|/\*|import |export )")
            .expect("code start regex should compile")
    })
}

fn default_export_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^[ \t]*export\s+default\b").expect("default export regex should compile")
    })
}

fn export_ident_tail_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*[A-Za-z_$][\w$]*\s*;?\s*$").expect("export ident regex should compile")
    })
}

fn prose_start_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:\*\*|__|---|#{1,6}\s|[-*+]\s|\d+\.\s|[A-Z][a-z]+[\s,:;'!?])")
            .expect("prose regex should compile")
    })
}

/// Drop code-fence delimiter lines (optionally language-tagged) and fences glued to a code line.
pub(crate) fn strip_code_fences(src: &str) -> Option<String> {
    let mut changed = false;
    let mut kept = Vec::new();

    for line in src.lines() {
        if fence_line_re().is_match(line) {
            changed = true;
            continue;
        }
        if line.trim_end().ends_with("```") {
            changed = true;
            kept.push(trailing_fence_re().replace(line, "").into_owned());
            continue;
        }
        kept.push(line.to_owned());
    }

    changed.then(|| kept.join("\n"))
}

/// Drop every line before the first line that looks like code.
pub(crate) fn strip_preamble(src: &str) -> Option<String> {
    let lines: Vec<&str> = src.lines().collect();
    let start = lines.iter().position(|l| code_start_re().is_match(l))?;
    if start == 0 {
        return None;
    }
    Some(lines[start..].join("\n"))
}

/// Truncate prose trailing the last default-export statement.
///
/// `export default Name;` ends at its line. A default-exported declaration ends where its
/// brackets balance. Whatever follows is dropped only when it reads like prose; anything that
/// still looks like code is kept.
pub(crate) fn strip_trailing_prose(src: &str) -> Option<String> {
    let m = default_export_re().find_iter(src).last()?;
    let head_end = line_end(src, m.end());

    let end = if export_ident_tail_re().is_match(&src[m.end()..head_end]) {
        head_end
    } else {
        statement_end(src, m.start())?
    };

    let rest = src[end..].trim();
    if rest.is_empty() || !prose_start_re().is_match(rest) {
        return None;
    }
    Some(src[..end].to_owned())
}

#[cfg(test)]
#[path = "../../tests/unit/normalize/pass.rs"]
mod tests;
