use super::*;
use crate::foundation::core::Fps;

const HELLO: &str = r#"import React from "react";
import { AbsoluteFill } from "remotion";

export default function HelloVideo() {
  return <AbsoluteFill>Hello</AbsoluteFill>;
}
"#;

#[test]
fn video_module_carries_real_imports_once() {
    let text = video_module(HELLO);
    assert!(text.starts_with("import React from \"react\";\n"));
    assert!(text.contains(
        "import { AbsoluteFill, useCurrentFrame, useVideoConfig, spring, interpolate, Sequence, Img } from \"remotion\";"
    ));
    assert_eq!(text.matches("import React").count(), 1);
    assert!(text.contains("export default function HelloVideo()"));
}

#[test]
fn video_module_keeps_imports_beyond_the_capability_set() {
    let snippet = r#"import React, { useMemo } from "react";
import {
  AbsoluteFill,
  Easing,
  interpolateColors,
  staticFile,
} from "remotion";
import * as THREE from "three";
import { loadFont } from "@remotion/google-fonts/Inter";
import type { CSSProperties } from "react";
import "./styles.css";

export default function Scene() {
  const style: CSSProperties = useMemo(() => ({}), []);
  return <AbsoluteFill style={style} />;
}
"#;
    let text = video_module(snippet);
    assert!(
        text.starts_with("import React, { useMemo } from \"react\";\n"),
        "{text}"
    );
    assert!(text.contains(
        "import { AbsoluteFill, useCurrentFrame, useVideoConfig, spring, interpolate, Sequence, Img, Easing, interpolateColors, staticFile } from \"remotion\";"
    ));
    assert!(text.contains("import * as THREE from \"three\";"));
    assert!(text.contains("import { loadFont } from \"@remotion/google-fonts/Inter\";"));
    assert!(text.contains("import type { CSSProperties } from \"react\";"));
    assert!(text.contains("import \"./styles.css\";"));
    assert_eq!(text.matches("AbsoluteFill,").count(), 1);
    assert_eq!(text.matches("import React").count(), 1);
    assert!(text.contains("export default function Scene()"));
}

#[test]
fn video_module_keeps_aliases_and_drops_shadowed_capabilities() {
    let snippet = "import { spring as springy, Img, Easing as E } from \"remotion\";\n\
                   import { useMemo } from \"react\";\n\
                   import { useMemo } from \"react\";\n\
                   const V = () => null;\n";
    let text = video_module(snippet);
    assert!(text.contains(
        "import { AbsoluteFill, useCurrentFrame, useVideoConfig, spring, interpolate, Sequence, Img, spring as springy, Easing as E } from \"remotion\";"
    ));
    assert!(text.starts_with("import React, { useMemo } from \"react\";\n"));
    assert_eq!(text.matches("useMemo").count(), 1);
    assert!(text.trim_end().ends_with("export default V;"));
}

#[test]
fn video_module_adds_missing_default_export() {
    let text = video_module("const Promo: React.FC = () => <div />;\n");
    assert!(text.trim_end().ends_with("export default Promo;"));

    let text = video_module("const A = 1;\nexport default A;\n");
    assert_eq!(text.matches("export default").count(), 1);
}

#[test]
fn root_module_follows_composition_config() {
    let text = root_module(&CompositionConfig::default());
    for needle in [
        "id=\"GeneratedVideo\"",
        "component={Video}",
        "durationInFrames={300}",
        "fps={30}",
        "width={1920}",
        "height={1080}",
        "import Video from \"./Video\";",
    ] {
        assert!(text.contains(needle), "missing {needle} in:\n{text}");
    }

    let ntsc = CompositionConfig {
        id: "Promo".to_owned(),
        duration_in_frames: 90,
        fps: Fps::new(30_000, 1001).unwrap(),
        width: 1080,
        height: 1920,
    };
    let text = root_module(&ntsc);
    assert!(text.contains("fps={30000 / 1001}"));
    assert!(text.contains("durationInFrames={90}"));
    assert!(text.contains("id=\"Promo\""));
}

#[test]
fn entry_and_tsconfig() {
    assert!(entry_module().contains("registerRoot(Root);"));
    let doc: serde_json::Value = serde_json::from_str(&tsconfig().unwrap()).unwrap();
    let opts = &doc["compilerOptions"];
    assert_eq!(opts["jsx"], "react-jsx");
    assert_eq!(opts["moduleResolution"], "bundler");
    assert_eq!(opts["strict"], false);
}

#[test]
fn assemble_writes_files_and_close_removes_them() {
    let project = ExportProject::assemble(HELLO, &CompositionConfig::default()).unwrap();
    let root = project.root().to_path_buf();
    for name in [VIDEO_MODULE, ROOT_MODULE, ENTRY_MODULE, TSCONFIG] {
        assert!(root.join(name).is_file(), "{name} missing");
    }
    assert_eq!(project.entry_point(), root.join("index.ts"));
    project.close().unwrap();
    assert!(!root.exists());
}
