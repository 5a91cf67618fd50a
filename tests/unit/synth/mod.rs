use super::*;

const HELLO: &str = r##"import React from "react";
import { AbsoluteFill, useCurrentFrame, interpolate } from "remotion";

export default function HelloVideo() {
  const frame = useCurrentFrame();
  const opacity = interpolate(frame, [0, 30], [0, 1], { extrapolateRight: "clamp" });
  return (
    <AbsoluteFill style={{ backgroundColor: "#111" }}>
      <h1 style={{ opacity }}>Hello</h1>
    </AbsoluteFill>
  );
}
"##;

fn config() -> CompositionConfig {
    CompositionConfig::default()
}

#[test]
fn synthesizes_default_function_export() {
    let mut unit = synthesize(HELLO, &config()).expect("component");
    assert_eq!(unit.component_name(), Some("HelloVideo"));
    assert_eq!(unit.binding_source(), Some(BindingSource::ExportedDeclaration));
    assert!(!unit.script().contains("import"));

    let root = unit.render(FrameIndex(0), &config()).unwrap();
    assert_eq!(root.tag(), Some("composition"));
    assert_eq!(root.text_content(), "Hello");
    let h1 = root.find_tag("h1").unwrap();
    assert_eq!(h1.props().unwrap()["style"]["opacity"], 0);
}

#[test]
fn frames_see_the_current_frame() {
    let mut unit = synthesize(HELLO, &config()).unwrap();
    let at = |unit: &mut SynthesizedUnit, f| {
        let root = unit.render(FrameIndex(f), &config()).unwrap();
        root.find_tag("h1").unwrap().props().unwrap()["style"]["opacity"].clone()
    };
    assert_eq!(at(&mut unit, 15), 0.5);
    assert_eq!(at(&mut unit, 299), 1);
}

#[test]
fn rendering_is_repeatable_in_any_order() {
    let mut unit = synthesize(HELLO, &config()).unwrap();
    let a = unit.render(FrameIndex(10), &config()).unwrap();
    let _ = unit.render(FrameIndex(200), &config()).unwrap();
    let b = unit.render(FrameIndex(10), &config()).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.fingerprint(), b.fingerprint());
}

#[test]
fn module_bindings_persist_between_frames() {
    let src = r#"
        let calls = 0;
        const Counter = () => { calls += 1; return <p>{calls}</p>; };
        export default Counter;
    "#;
    let mut unit = synthesize(src, &config()).unwrap();
    let first = unit.render(FrameIndex(0), &config()).unwrap();
    let second = unit.render(FrameIndex(0), &config()).unwrap();
    assert_eq!(first.text_content(), "1");
    assert_eq!(second.text_content(), "2");
}

#[test]
fn unsupported_syntax_yields_none() {
    let src = "class Scene extends React.Component { render() { return null; } }\nexport default Scene;";
    assert!(synthesize(src, &config()).is_none());
    let err = synthesize_detailed(src, &config()).unwrap_err();
    assert!(err.to_string().contains("transpile failed"), "{err}");
}

#[test]
fn binding_must_be_a_component() {
    let err = synthesize_detailed("const x = 1;", &config()).unwrap_err();
    assert!(err.to_string().contains("is a number, not a component"), "{err}");

    let err = synthesize_detailed("42;", &config()).unwrap_err();
    assert!(err.to_string().contains("never defined"), "{err}");
}

#[test]
fn top_level_throw_fails_instantiation() {
    let src = "const Foo = () => null;\nthrow new Error(\"boom\");\nexport default Foo;";
    let err = synthesize_detailed(src, &config()).unwrap_err();
    assert!(err.to_string().contains("instantiation failed"), "{err}");
}

#[test]
fn render_errors_name_the_frame() {
    let src = "export default () => { const o = undefined; return <p>{o.x}</p>; };";
    let mut unit = synthesize(src, &config()).unwrap();
    let err = unit.render(FrameIndex(7), &config()).unwrap_err();
    assert!(matches!(err, ReelError::Evaluation(_)));
    assert!(err.to_string().contains("frame 7"), "{err}");
}

#[test]
fn step_limit_stops_runaway_components() {
    let src = "export default () => { while (true) {} };";
    let mut unit = synthesize(src, &config()).unwrap();
    unit.set_step_limit(10_000);
    assert!(unit.render(FrameIndex(0), &config()).is_err());
}
