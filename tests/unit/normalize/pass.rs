use super::*;

#[test]
fn fence_lines_are_removed_with_or_without_language_tag() {
    for open in ["```", "```tsx", "```typescript", "  ```jsx  "] {
        let src = format!("{open}\nconst A = 1;\n```");
        let out = strip_code_fences(&src).unwrap();
        assert_eq!(out, "const A = 1;");
    }
}

#[test]
fn fence_glued_to_last_line_is_removed() {
    let out = strip_code_fences("```tsx\nexport default A;```").unwrap();
    assert_eq!(out, "export default A;");
}

#[test]
fn no_fences_declines() {
    assert_eq!(strip_code_fences("const a = 1;"), None);
}

#[test]
fn preamble_lines_before_code_are_dropped() {
    let src = "Here is the component:\n\nSure thing!\nconst A = () => null;\nexport default A;";
    let out = strip_preamble(src).unwrap();
    assert_eq!(out, "const A = () => null;\nexport default A;");
}

#[test]
fn comment_openers_count_as_code() {
    let src = "Intro\n// Scene one\nconst A = 1;";
    assert_eq!(strip_preamble(src).unwrap(), "// Scene one\nconst A = 1;");
    let src = "Intro\n/* banner */\nconst A = 1;";
    assert!(strip_preamble(src).unwrap().starts_with("/* banner */"));
}

#[test]
fn preamble_declines_when_code_starts_first_or_never() {
    assert_eq!(strip_preamble("const A = 1;\nmore"), None);
    assert_eq!(strip_preamble("just prose\nno code here"), None);
}

#[test]
fn trailing_sentence_after_export_ident_is_removed() {
    let src = "const Foo = () => null;\nexport default Foo;\n\nThis creates a fade-in title.";
    let out = strip_trailing_prose(src).unwrap();
    assert_eq!(out, "const Foo = () => null;\nexport default Foo;");
}

#[test]
fn markdown_trailers_are_removed() {
    for tail in [
        "**Notes:** uses spring",
        "--- \nmore",
        "- bullet one",
        "1. first",
        "## How it works",
        "The video has three scenes.",
    ] {
        let src = format!("const Foo = 1;\nexport default Foo;\n{tail}");
        let out = strip_trailing_prose(&src).unwrap_or_else(|| panic!("kept tail {tail:?}"));
        assert!(out.ends_with("export default Foo;"));
    }
}

#[test]
fn code_after_export_is_kept() {
    let src = "const Foo = 1;\nexport default Foo;\nconst helper = 2;";
    assert_eq!(strip_trailing_prose(src), None);
    let src = "const Foo = 1;\nexport default Foo;\nFoo.displayName = \"Foo\";";
    assert_eq!(strip_trailing_prose(src), None);
}

#[test]
fn exported_function_body_is_not_mistaken_for_prose() {
    let src = "export default function Foo() {\n  React.useMemo(() => 1, []);\n  return null;\n}\nThis component renders nothing.";
    let out = strip_trailing_prose(src).unwrap();
    assert!(out.ends_with("return null;\n}"));
    assert!(out.contains("React.useMemo"));
}

#[test]
fn last_default_export_wins() {
    let src = "// export default Old;\nconst A = 1;\nexport default A;\nNote: done";
    let out = strip_trailing_prose(src).unwrap();
    assert!(out.ends_with("export default A;"));
}

#[test]
fn missing_default_export_keeps_tail() {
    let src = "const A = 1;\nThis is an explanation.";
    assert_eq!(strip_trailing_prose(src), None);
}
