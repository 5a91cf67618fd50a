use super::*;

const BODY: &str = "const HelloVideo: React.FC = () => {\n  const frame = useCurrentFrame();\n  return <AbsoluteFill>{frame}</AbsoluteFill>;\n};\nexport default HelloVideo;";

#[test]
fn fenced_input_loses_all_fence_lines() {
    for tag in ["", "tsx", "jsx", "typescript", "javascript"] {
        let raw = format!("```{tag}\n{BODY}\n```\n");
        let out = normalize_response(&raw);
        assert!(!out.lines().any(|l| l.trim_start().starts_with("```")), "{out}");
        assert_eq!(out, BODY);
    }
}

#[test]
fn exactly_the_prose_prefix_is_discarded() {
    for n in 0..5 {
        let mut raw = String::new();
        for i in 0..n {
            raw.push_str(&format!("Preface line {i}.\n"));
        }
        raw.push_str(BODY);
        let out = normalize_response(&raw);
        assert_eq!(out, BODY, "n={n}");
    }
}

#[test]
fn full_chatty_response_is_narrowed() {
    let raw = format!(
        "Here is the component:\n\n```tsx\n{BODY}\n```\n\nThis creates a counter that ticks every frame.\n"
    );
    let report = normalize_with_report(&raw);
    assert_eq!(report.code, BODY);
    assert_eq!(
        report.applied,
        vec!["strip_code_fences", "strip_preamble", "strip_trailing_prose"]
    );
}

#[test]
fn unrecognizable_input_passes_through_trimmed() {
    let report = normalize_with_report("  I cannot help with that.  \n");
    assert_eq!(report.code, "I cannot help with that.");
    assert!(report.applied.is_empty());
}

#[test]
fn export_statement_is_kept_when_followed_by_sentence() {
    let raw = "const Foo = () => null;\nexport default Foo;\nThe animation uses spring physics.";
    assert!(normalize_response(raw).ends_with("export default Foo;"));
}
