use crate::config::CompositionConfig;
use crate::foundation::core::FrameIndex;
use crate::preview::node::RenderNode;
use crate::synth::synthesize;

fn render(src: &str, frame: u64) -> RenderNode {
    let config = CompositionConfig::default();
    let mut unit = synthesize(src, &config).expect("component");
    unit.render(FrameIndex(frame), &config).unwrap()
}

fn render_err(src: &str) -> String {
    let config = CompositionConfig::default();
    let mut unit = synthesize(src, &config).expect("component");
    unit.render(FrameIndex(0), &config).unwrap_err().to_string()
}

#[test]
fn root_carries_composition_facts() {
    let root = render("export default () => null;", 0);
    let props = root.props().unwrap();
    assert_eq!(props["id"], "GeneratedVideo");
    assert_eq!(props["width"], 1920);
    assert_eq!(props["height"], 1080);
    assert_eq!(props["fps"], 30);
    assert_eq!(props["durationInFrames"], 300);
    assert!(root.children().is_empty());
}

#[test]
fn absolute_fill_is_a_full_frame_div() {
    let root = render(
        r#"export default () => <AbsoluteFill style={{ backgroundColor: "red", flexDirection: "row" }} />;"#,
        0,
    );
    let div = &root.children()[0];
    assert_eq!(div.tag(), Some("div"));
    let style = &div.props().unwrap()["style"];
    assert_eq!(style["position"], "absolute");
    assert_eq!(style["width"], "100%");
    assert_eq!(style["backgroundColor"], "red");
    assert_eq!(style["flexDirection"], "row");
}

#[test]
fn text_numbers_and_holes() {
    let root = render(
        "export default () => <p>{\"a\"}{1.5}{null}{false}{undefined}{[\"b\", [\"c\"]]}{\"\"}</p>;",
        0,
    );
    let p = root.find_tag("p").unwrap();
    assert_eq!(p.children().len(), 4);
    assert_eq!(p.text_content(), "a1.5bc");
}

#[test]
fn host_props_keep_only_json() {
    let root = render(
        r#"export default () => <div key="k" className="x" onClick={() => 1} data-n={2} />;"#,
        0,
    );
    let props = root.find_tag("div").unwrap().props().unwrap();
    let keys: Vec<&str> = props.keys().map(String::as_str).collect();
    assert_eq!(keys, ["className", "data-n"]);
}

#[test]
fn nested_components_receive_props_and_children() {
    let src = r#"
        const Card = ({ title, children }) => <section><h2>{title}</h2>{children}</section>;
        export default function Main() {
          return <Card title="Launch"><span>now</span></Card>;
        }
    "#;
    let root = render(src, 0);
    let section = root.find_tag("section").unwrap();
    assert_eq!(section.text_content(), "Launchnow");
    assert!(section.find_tag("span").is_some());
}

const SEQUENCED: &str = r#"
    const Local = () => <i>{useCurrentFrame()}</i>;
    export default () => (
      <AbsoluteFill>
        <Sequence from={30} durationInFrames={20} name="intro"><Local /></Sequence>
        <Sequence from={60} layout="none"><Local /></Sequence>
      </AbsoluteFill>
    );
"#;

#[test]
fn sequence_windows_and_shifts_time() {
    let root = render(SEQUENCED, 10);
    assert!(root.find_tag("i").is_none());

    let root = render(SEQUENCED, 35);
    let wrapper = &root.children()[0].children()[0];
    assert_eq!(wrapper.props().unwrap()["data-sequence"], "intro");
    assert_eq!(wrapper.text_content(), "5");

    let root = render(SEQUENCED, 50);
    assert!(root.find_tag("i").is_none());

    let root = render(SEQUENCED, 75);
    let fill = &root.children()[0];
    assert_eq!(fill.children().len(), 1);
    assert_eq!(fill.children()[0].tag(), Some("i"));
    assert_eq!(fill.text_content(), "15");
}

#[test]
fn sequence_rejects_bad_props() {
    let err = render_err("export default () => <Sequence durationInFrames={0}><p /></Sequence>;");
    assert!(err.contains("durationInFrames must be positive"), "{err}");
    let err = render_err("export default () => <Sequence from=\"10\"><p /></Sequence>;");
    assert!(err.contains("'from' must be a number"), "{err}");
}

#[test]
fn img_is_a_leaf() {
    let root = render(r#"export default () => <Img src="logo.png" style={{ width: 200 }} />;"#, 0);
    let img = root.find_tag("img").unwrap();
    assert_eq!(img.props().unwrap()["src"], "logo.png");
    assert!(img.children().is_empty());
}

#[test]
fn objects_are_not_children() {
    let err = render_err("export default () => <div>{{ a: 1 }}</div>;");
    assert!(err.contains("objects are not valid"), "{err}");
}

#[test]
fn runaway_nesting_is_reported() {
    let err = render_err("const Loop = () => <Loop />;\nexport default Loop;");
    assert!(err.contains("nested more than"), "{err}");
}
