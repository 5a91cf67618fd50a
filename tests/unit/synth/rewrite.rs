use super::*;

#[test]
fn trailing_default_export_binds_the_name() {
    let out = rewrite_module_syntax("const Foo = () => null;\nexport default Foo;\n");
    assert!(out.code.contains("const __Component__ = Foo;"));
    assert!(!out.code.contains("export"));
    assert_eq!(out.component.as_deref(), Some("Foo"));
    assert_eq!(out.binding, Some(BindingSource::TrailingExport));
}

#[test]
fn trailing_export_name_is_not_expanded() {
    let out = rewrite_module_syntax("const $Comp = () => null;\nexport default $Comp;");
    assert!(out.code.contains("const __Component__ = $Comp;"));
}

#[test]
fn default_function_declaration() {
    let out = rewrite_module_syntax("export default function Hello() {\n  return null;\n}\n");
    assert!(out.code.starts_with("const __Component__ = function Hello()"));
    assert_eq!(out.component.as_deref(), Some("Hello"));
    assert_eq!(out.binding, Some(BindingSource::ExportedDeclaration));
}

#[test]
fn default_anonymous_arrow_has_no_name() {
    let out = rewrite_module_syntax("export default () => null;");
    assert_eq!(out.code, "const __Component__ = () => null;");
    assert_eq!(out.component, None);
    assert_eq!(out.binding, Some(BindingSource::ExportedDeclaration));
}

#[test]
fn default_const_declaration_keeps_its_keyword() {
    let out = rewrite_module_syntax("export default const Promo = () => null;");
    assert!(out.code.starts_with("const Promo = () => null;"));
    assert!(out.code.ends_with("\nconst __Component__ = Promo;"));
    assert_eq!(out.component.as_deref(), Some("Promo"));
}

#[test]
fn named_exports_lose_the_keyword_only() {
    let out = rewrite_module_syntax("export const helper = 1;\n  export function Scene() {}\n");
    assert!(out.code.contains("const helper = 1;"));
    assert!(out.code.contains("  function Scene() {}"));
    assert_eq!(out.component.as_deref(), Some("Scene"));
    assert_eq!(out.binding, Some(BindingSource::Inferred));
}

#[test]
fn inference_prefers_annotated_components() {
    let src = "const Title = () => null;\nconst Main: React.FC = () => null;\n";
    assert_eq!(infer_component(src).as_deref(), Some("Main"));
    assert_eq!(
        infer_component("const easing = 1;\nfunction Scene() {}").as_deref(),
        Some("Scene")
    );
    assert_eq!(infer_component("const easing = 1;").as_deref(), Some("easing"));
    assert_eq!(infer_component("42;"), None);
}

#[test]
fn imports_are_blanked_across_lines() {
    let src = "import React from \"react\";\nimport {\n  AbsoluteFill,\n  spring,\n} from \"remotion\";\nconst A = 1;";
    let stripped = strip_imports(src);
    assert!(!stripped.contains("import"));
    assert!(!stripped.contains("spring"));
    assert_eq!(stripped.lines().count(), 6);
    assert_eq!(stripped.lines().last(), Some("const A = 1;"));
}

#[test]
fn side_effect_import_is_stripped() {
    let stripped = strip_imports("import \"./styles.css\";\nconst A = 1;");
    assert_eq!(stripped, "\nconst A = 1;");
}

#[test]
fn nothing_to_bind() {
    let out = rewrite_module_syntax("42;");
    assert_eq!(out.binding, None);
    assert!(!out.code.contains(COMPONENT_BINDING));
}
