//! The throwaway project handed to the bundler: component module, composition registration,
//! entry point and build configuration.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::Context as _;
use indexmap::IndexMap;
use regex::Regex;
use serde_json::json;
use tempfile::TempDir;

use crate::capabilities::CAPABILITY_NAMES;
use crate::config::CompositionConfig;
use crate::foundation::error::{ReelError, ReelResult};
use crate::synth::rewrite::{infer_component, split_imports};

pub const VIDEO_MODULE: &str = "Video.tsx";
pub const ROOT_MODULE: &str = "Root.tsx";
pub const ENTRY_MODULE: &str = "index.ts";
pub const TSCONFIG: &str = "tsconfig.json";

/// A project directory that is deleted when dropped or [`closed`](ExportProject::close).
#[derive(Debug)]
pub struct ExportProject {
    dir: TempDir,
    composition: CompositionConfig,
}

impl ExportProject {
    /// Write the project files for `snippet` into a fresh temporary directory.
    pub fn assemble(snippet: &str, composition: &CompositionConfig) -> ReelResult<Self> {
        let dir = tempfile::Builder::new()
            .prefix("reelsmith-export-")
            .tempdir()
            .context("create export workspace")?;

        let files = [
            (VIDEO_MODULE, video_module(snippet)),
            (ROOT_MODULE, root_module(composition)),
            (ENTRY_MODULE, entry_module().to_owned()),
            (TSCONFIG, tsconfig()?),
        ];
        for (name, text) in files {
            let path = dir.path().join(name);
            std::fs::write(&path, text).with_context(|| format!("write '{}'", path.display()))?;
        }
        tracing::debug!(dir = %dir.path().display(), "export project assembled");

        Ok(Self {
            dir,
            composition: composition.clone(),
        })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn entry_point(&self) -> PathBuf {
        self.root().join(ENTRY_MODULE)
    }

    pub fn bundle_dir(&self) -> PathBuf {
        self.root().join("bundle")
    }

    pub fn composition(&self) -> &CompositionConfig {
        &self.composition
    }

    /// Delete the project directory now, reporting failures instead of ignoring them.
    pub fn close(self) -> ReelResult<()> {
        let path = self.root().to_path_buf();
        self.dir
            .close()
            .with_context(|| format!("remove export workspace '{}'", path.display()))
            .map_err(ReelError::from)
    }
}

/// The component with the real module imports in place of injected capabilities.
///
/// Specifiers the snippet imports beyond the capability set are merged into the generated
/// import lines, imports from other modules are kept, and a default export is added when the
/// snippet never made one.
pub(crate) fn video_module(snippet: &str) -> String {
    let (body, statements) = split_imports(snippet);
    let mut modules: IndexMap<String, ModuleImports> = IndexMap::new();
    let mut verbatim = Vec::new();
    for stmt in &statements {
        match parse_import(stmt) {
            Some((source, clause)) => modules.entry(source).or_default().merge(clause),
            None => verbatim.push(stmt.clone()),
        }
    }

    let mut react = modules.shift_remove("react").unwrap_or_default();
    let mut remotion = modules.shift_remove("remotion").unwrap_or_default();
    let mut hooks: Vec<String> = CAPABILITY_NAMES
        .iter()
        .filter(|name| **name != "React")
        .map(|name| (*name).to_owned())
        .collect();
    hooks.append(&mut remotion.named);

    let mut out = format!(
        "import React{} from \"react\";\nimport {{ {} }} from \"remotion\";\n",
        named_suffix(&std::mem::take(&mut react.named)),
        hooks.join(", ")
    );
    for (source, imports) in [("react", react), ("remotion", remotion)]
        .into_iter()
        .map(|(s, i)| (s.to_owned(), i))
        .chain(modules)
    {
        imports.write_lines(&source, &mut out);
    }
    for stmt in verbatim {
        out.push_str(&stmt);
        out.push('\n');
    }
    out.push('\n');
    out.push_str(body.trim());
    out.push('\n');

    if !has_default_export(&body) {
        if let Some(name) = infer_component(&body) {
            out.push_str(&format!("\nexport default {name};\n"));
        }
    }
    out
}

/// What one module contributes, minus names the generated header already binds.
#[derive(Debug, Default)]
struct ModuleImports {
    side_effect: bool,
    default: Option<String>,
    namespace: Option<String>,
    named: Vec<String>,
}

impl ModuleImports {
    fn merge(&mut self, clause: ModuleImports) {
        self.side_effect |= clause.side_effect;
        self.default = self.default.take().or(clause.default);
        self.namespace = self.namespace.take().or(clause.namespace);
        for spec in clause.named {
            if !self.named.contains(&spec) {
                self.named.push(spec);
            }
        }
    }

    fn write_lines(&self, source: &str, out: &mut String) {
        if let Some(ns) = &self.namespace {
            out.push_str(&format!("import * as {ns} from \"{source}\";\n"));
        }
        match &self.default {
            Some(name) => out.push_str(&format!(
                "import {name}{} from \"{source}\";\n",
                named_suffix(&self.named)
            )),
            None if !self.named.is_empty() => out.push_str(&format!(
                "import {{ {} }} from \"{source}\";\n",
                self.named.join(", ")
            )),
            None if self.side_effect && self.namespace.is_none() => {
                out.push_str(&format!("import \"{source}\";\n"))
            }
            None => {}
        }
    }
}

fn named_suffix(named: &[String]) -> String {
    if named.is_empty() {
        String::new()
    } else {
        format!(", {{ {} }}", named.join(", "))
    }
}

fn import_from_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^\s*import\s+(.*?)\s*\bfrom\s*['"]([^'"]+)['"]\s*;?\s*$"#)
            .expect("import clause regex should compile")
    })
}

fn side_effect_import_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^\s*import\s*['"]([^'"]+)['"]\s*;?\s*$"#)
            .expect("side-effect import regex should compile")
    })
}

/// `import ... from "m"` split into its module and the specifiers worth keeping. Type-only
/// imports and anything unrecognized come back as `None` and are copied through as written.
fn parse_import(stmt: &str) -> Option<(String, ModuleImports)> {
    if let Some(caps) = side_effect_import_re().captures(stmt) {
        let clause = ModuleImports {
            side_effect: true,
            ..ModuleImports::default()
        };
        return Some((caps[1].to_owned(), clause));
    }
    let caps = import_from_re().captures(stmt)?;
    let mut rest = caps[1].trim();
    if rest.starts_with("type ") || rest.starts_with("type{") {
        return None;
    }

    let mut clause = ModuleImports::default();
    if let Some(open) = rest.find('{') {
        let close = rest[open..].find('}')? + open;
        for spec in rest[open + 1..close].split(',') {
            let spec = spec.split_whitespace().collect::<Vec<_>>().join(" ");
            if spec.is_empty() || spec.starts_with("type ") {
                continue;
            }
            let local = spec.rsplit_once(" as ").map_or(spec.as_str(), |(_, l)| l);
            if !is_provided(local) {
                clause.named.push(spec.clone());
            }
        }
        rest = rest[..open].trim();
    }
    for part in rest.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        if let Some(ns) = part.strip_prefix('*') {
            let ns = ns.trim_start().strip_prefix("as")?.trim();
            if !is_provided(ns) {
                clause.namespace = Some(ns.to_owned());
            }
        } else if !is_provided(part) {
            clause.default = Some(part.to_owned());
        }
    }
    Some((caps[2].to_owned(), clause))
}

fn is_provided(local: &str) -> bool {
    CAPABILITY_NAMES.contains(&local)
}

fn has_default_export(code: &str) -> bool {
    code.lines()
        .any(|line| line.trim_start().starts_with("export default"))
}

/// Composition registration. Every number comes from `composition`, so the rendered video
/// matches the preview.
pub(crate) fn root_module(composition: &CompositionConfig) -> String {
    let fps = if composition.fps.den == 1 {
        composition.fps.num.to_string()
    } else {
        format!("{} / {}", composition.fps.num, composition.fps.den)
    };
    format!(
        r#"import React from "react";
import {{ Composition }} from "remotion";
import Video from "./Video";

export const Root: React.FC = () => (
  <Composition
    id="{id}"
    component={{Video}}
    durationInFrames={{{duration}}}
    fps={{{fps}}}
    width={{{width}}}
    height={{{height}}}
  />
);
"#,
        id = composition.id,
        duration = composition.duration_in_frames,
        width = composition.width,
        height = composition.height,
    )
}

pub(crate) fn entry_module() -> &'static str {
    "import { registerRoot } from \"remotion\";\nimport { Root } from \"./Root\";\n\nregisterRoot(Root);\n"
}

pub(crate) fn tsconfig() -> ReelResult<String> {
    let doc = json!({
        "compilerOptions": {
            "target": "ES2017",
            "module": "esnext",
            "moduleResolution": "bundler",
            "jsx": "react-jsx",
            "esModuleInterop": true,
            "skipLibCheck": true,
            "strict": false
        }
    });
    serde_json::to_string_pretty(&doc).map_err(|e| ReelError::serde(e.to_string()))
}

#[cfg(test)]
#[path = "../../tests/unit/export/project.rs"]
mod tests;
