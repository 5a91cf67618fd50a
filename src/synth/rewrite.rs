//! Module-syntax rewriting: imports out, the default export bound to [`COMPONENT_BINDING`].

use std::sync::OnceLock;

use regex::Regex;

/// Local name the rewritten snippet binds its component to.
pub const COMPONENT_BINDING: &str = "__Component__";

fn import_start_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*import[\s{*]").expect("import regex should compile"))
}

fn import_end_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?:\bfrom\s*|^\s*import\s*)['"][^'"]*['"]\s*;?\s*$|;\s*$"#)
            .expect("import end regex should compile")
    })
}

fn trailing_default_export_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)export\s+default\s+([A-Za-z_$][\w$]*)\s*;?\s*$")
            .expect("default export regex should compile")
    })
}

fn default_declaration_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^([ \t]*)export\s+default\s+(?:(const|let|var)\s+([A-Za-z_$][\w$]*))?")
            .expect("default declaration regex should compile")
    })
}

fn export_keyword_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^([ \t]*)export\s+").expect("export regex should compile")
    })
}

fn component_decl_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:const|function)\s+([A-Za-z_$][\w$]*)\s*(:\s*React\.FC)?")
            .expect("component declaration regex should compile")
    })
}

/// Which rewrite rule produced the component binding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingSource {
    /// `export default Name;`
    TrailingExport,
    /// `export default function Name() {}` and friends.
    ExportedDeclaration,
    /// No default export; guessed from the declarations.
    Inferred,
}

/// Output of [`rewrite_module_syntax`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rewritten {
    /// Script text with no import/export syntax left.
    pub code: String,
    /// Component name, when a rule could name it.
    pub component: Option<String>,
    /// `None` when no rule managed to bind the component.
    pub binding: Option<BindingSource>,
}

/// Apply the module-syntax rewrite rules in order.
pub fn rewrite_module_syntax(snippet: &str) -> Rewritten {
    let mut code = strip_imports(snippet);
    let mut component = None;
    let mut binding = None;

    let trailing = trailing_default_export_re()
        .captures(&code)
        .map(|caps| caps[1].to_owned());
    if let Some(name) = trailing {
        let binding_stmt = format!("const {COMPONENT_BINDING} = {name};");
        code = trailing_default_export_re()
            .replace(&code, regex::NoExpand(&binding_stmt))
            .into_owned();
        component = Some(name);
        binding = Some(BindingSource::TrailingExport);
    }

    let exported = default_declaration_re().captures(&code).map(|caps| {
        let indent = &caps[1];
        let declared = caps.get(3).map(|m| m.as_str().to_owned());
        let replacement = match &declared {
            Some(name) => format!("{indent}{} {name}", &caps[2]),
            None => format!("{indent}const {COMPONENT_BINDING} = "),
        };
        (caps.get(0).map_or(0..0, |m| m.range()), replacement, declared)
    });
    if let Some((range, replacement, declared)) = exported {
        code.replace_range(range, &replacement);
        match declared {
            Some(name) => {
                code.push_str(&format!("\nconst {COMPONENT_BINDING} = {name};"));
                component = Some(name);
            }
            None => component = component.or_else(|| declared_function_name(&code)),
        }
        binding = binding.or(Some(BindingSource::ExportedDeclaration));
    }

    code = export_keyword_re().replace_all(&code, "$1").into_owned();

    if !code.contains(COMPONENT_BINDING) {
        if let Some(name) = infer_component(&code) {
            code.push_str(&format!("\nconst {COMPONENT_BINDING} = {name};"));
            component = Some(name);
            binding = Some(BindingSource::Inferred);
        }
    }

    Rewritten {
        code,
        component,
        binding,
    }
}

/// Blank out import statements, including ones spread over several lines.
///
/// Lines are blanked rather than removed so byte offsets of later code stay close to the
/// original snippet's line structure.
pub(crate) fn strip_imports(src: &str) -> String {
    split_imports(src).0
}

/// The source with import lines blanked, plus each import statement joined onto one line.
pub(crate) fn split_imports(src: &str) -> (String, Vec<String>) {
    let mut out = Vec::new();
    let mut statements = Vec::new();
    let mut current: Option<String> = None;
    for line in src.lines() {
        if current.is_none() && import_start_re().is_match(line) {
            current = Some(String::new());
        }
        if let Some(stmt) = current.as_mut() {
            if !stmt.is_empty() {
                stmt.push(' ');
            }
            stmt.push_str(line.trim());
            if import_end_re().is_match(line) {
                statements.extend(current.take());
            }
            out.push("");
            continue;
        }
        out.push(line);
    }
    statements.extend(current);
    (out.join("\n"), statements)
}

/// Name in `const __Component__ = function Name(` / `= function* Name(`, if any.
fn declared_function_name(code: &str) -> Option<String> {
    let at = code.find(&format!("{COMPONENT_BINDING} = function"))?;
    let rest = code[at..].split_once("function")?.1.trim_start();
    let name: String = rest
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_' || *c == '$')
        .collect();
    (!name.is_empty()).then_some(name)
}

/// Pick the declaration most likely to be the component: a `React.FC` annotation wins, then
/// the first PascalCase name, then the first declaration of any kind.
pub(crate) fn infer_component(code: &str) -> Option<String> {
    let mut first = None;
    let mut pascal = None;
    for caps in component_decl_re().captures_iter(code) {
        let name = &caps[1];
        if caps.get(2).is_some() {
            return Some(name.to_owned());
        }
        if first.is_none() {
            first = Some(name.to_owned());
        }
        if pascal.is_none() && name.starts_with(|c: char| c.is_ascii_uppercase()) {
            pascal = Some(name.to_owned());
        }
    }
    pascal.or(first)
}

#[cfg(test)]
#[path = "../../tests/unit/synth/rewrite.rs"]
mod tests;
