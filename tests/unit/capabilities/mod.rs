use super::*;
use crate::script::interp::VideoInfo;
use crate::script::parser::parse_program;

fn video() -> VideoInfo {
    VideoInfo {
        id: "GeneratedVideo".to_owned(),
        width: 1920,
        height: 1080,
        fps: 30.0,
        duration_in_frames: 300,
    }
}

fn run_at(src: &str, frame: f64) -> ScriptResult<Value> {
    let mut interp = Interpreter::new(video());
    let global = interp.global();
    let scope = interp.push_scope(global);
    for (name, value) in CAPABILITY_NAMES.iter().zip(capability_values()) {
        interp.declare(scope, name, value, false);
    }
    interp.frame = frame;
    let program = parse_program(src)?;
    interp.run(&program, scope)?;
    interp.lookup(scope, "out")
}

fn number(src: &str, frame: f64) -> f64 {
    match run_at(src, frame).unwrap() {
        Value::Number(n) => n,
        other => panic!("expected a number, got {other:?}"),
    }
}

#[test]
fn names_follow_factory_order() {
    assert_eq!(
        CAPABILITY_NAMES,
        [
            "React",
            "AbsoluteFill",
            "useCurrentFrame",
            "useVideoConfig",
            "spring",
            "interpolate",
            "Sequence",
            "Img",
        ]
    );
    assert!(matches!(
        capability_values()[1],
        Value::Primitive(Primitive::AbsoluteFill)
    ));
}

#[test]
fn hooks_expose_frame_and_composition() {
    assert_eq!(number("const out = useCurrentFrame();", 42.0), 42.0);
    assert_eq!(
        number(
            "const { width, height, fps, durationInFrames } = useVideoConfig();\nconst out = width + height + fps + durationInFrames;",
            0.0
        ),
        1920.0 + 1080.0 + 30.0 + 300.0
    );
}

#[test]
fn spring_reads_options_object() {
    let src = "const out = spring({ frame: useCurrentFrame(), fps: 30, config: { damping: 12 } });";
    assert_eq!(number(src, 0.0), 0.0);
    let late = number(src, 120.0);
    assert!((late - 1.0).abs() < 1e-3, "{late}");

    let err = run_at("const out = spring({ fps: 30 });", 0.0).unwrap_err();
    assert!(err.message.contains("frame"), "{err}");
}

#[test]
fn interpolate_applies_easing_and_clamp() {
    let src = "const out = interpolate(useCurrentFrame(), [0, 10], [0, 100], { easing: (t) => t * t, extrapolateRight: 'clamp' });";
    assert_eq!(number(src, 5.0), 25.0);
    assert_eq!(number(src, 50.0), 100.0);
}

#[test]
fn interpolate_rejects_bad_arguments() {
    for src in [
        "const out = interpolate('a', [0, 1], [0, 1]);",
        "const out = interpolate(0, [0, 1], [0, 'x']);",
        "const out = interpolate(0, [1, 0], [0, 1]);",
        "const out = interpolate(0, [0, 1], [0, 1], { extrapolateLeft: 'bounce' });",
    ] {
        assert!(run_at(src, 0.0).is_err(), "{src}");
    }
}

#[test]
fn create_element_collects_children() {
    let out = run_at(
        "const out = React.createElement('div', { id: 'x' }, 'a', React.createElement(Img, { src: 'i.png' }));",
        0.0,
    )
    .unwrap();
    let Value::Element(el) = out else {
        panic!("expected an element");
    };
    assert!(matches!(&el.kind, ElementKind::Intrinsic(tag) if tag == "div"));
    assert_eq!(el.children.len(), 2);
    assert!(matches!(el.props.get("id"), Some(Value::String(s)) if &**s == "x"));

    let out = run_at(
        "const out = React.createElement(React.Fragment, { children: 'only' });",
        0.0,
    )
    .unwrap();
    let Value::Element(el) = out else {
        panic!("expected an element");
    };
    assert!(matches!(el.kind, ElementKind::Fragment));
    assert_eq!(el.children.len(), 1);
    assert!(!el.props.contains_key("children"));
}

#[test]
fn state_hooks_are_frame_pure() {
    let src = "const [count, setCount] = React.useState(() => 3);\nsetCount(9);\nconst ref = React.useRef(1);\nconst memo = React.useMemo(() => count * 2, [count]);\nconst out = count + ref.current + memo;";
    assert_eq!(number(src, 0.0), 3.0 + 1.0 + 6.0);
}
