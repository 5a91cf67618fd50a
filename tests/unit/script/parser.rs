use super::*;

fn parse(src: &str) -> Program {
    parse_program(src).unwrap_or_else(|e| panic!("{e}\n{src}"))
}

fn single_expr(src: &str) -> Expr {
    match parse(src).body.as_slice() {
        [Stmt::Expr(e)] => e.clone(),
        other => panic!("expected one expression statement, got {other:?}"),
    }
}

fn jsx(src: &str) -> Rc<JsxElement> {
    match single_expr(src) {
        Expr::Jsx(el) => el,
        other => panic!("expected jsx, got {other:?}"),
    }
}

#[test]
fn parses_a_typical_generated_component() {
    let src = r#"
import { AbsoluteFill, useCurrentFrame } from "remotion";
"#;
    // Imports are stripped before parsing; the parser itself refuses them.
    assert!(parse_program(src).is_err());

    let src = r##"
interface TitleProps {
  text: string;
  delay?: number;
}

type Palette = { bg: string } | null;

const Title: React.FC<TitleProps> = ({ text, delay = 0 }) => {
  const frame = useCurrentFrame();
  const { fps } = useVideoConfig();
  const opacity = interpolate(frame - delay, [0, 20], [0, 1], {
    extrapolateLeft: "clamp",
    extrapolateRight: "clamp",
  });
  return <h1 style={{ opacity, fontSize: 96 }}>{text}</h1>;
};

export const HelloVideo: React.FC = () => {
  const scale = spring({ frame: useCurrentFrame(), fps: 30, config: { damping: 200 } });
  return (
    <AbsoluteFill style={{ backgroundColor: "#0b1020" }}>
      <Sequence from={0} durationInFrames={90}>
        <Title text="Say hello" />
      </Sequence>
      <>{[1, 2, 3].map((n) => <div key={n}>{n * scale}</div>)}</>
    </AbsoluteFill>
  );
};

export default HelloVideo;
"##;
    let program = parse(src);
    assert_eq!(program.body.len(), 5);
    assert!(matches!(program.body[0], Stmt::Empty));
    assert!(matches!(program.body[1], Stmt::Empty));
    assert!(matches!(program.body[4], Stmt::Expr(Expr::Ident(ref n)) if n == "HelloVideo"));
}

#[test]
fn type_annotations_are_erased() {
    assert_eq!(
        parse("const x: number = (1 as number);\nlet y: Array<string> | null = null;"),
        parse("const x = (1);\nlet y = null;")
    );
    assert_eq!(
        parse("function f(a: number = 1, b?: string, ...rest: string[]): void {}"),
        parse("function f(a = 1, b, ...rest) {}")
    );
    assert_eq!(
        parse("const id = <T,>(v: T): T => v;"),
        parse("const id = (v) => v;")
    );
    assert_eq!(parse("a!.b;"), parse("a.b;"));
    assert_eq!(
        parse("const c = colors satisfies Record<string, string>;"),
        parse("const c = colors;")
    );
    assert_eq!(parse("declare const x: number;"), Program { body: vec![Stmt::Empty] });
}

#[test]
fn less_than_is_not_mistaken_for_generics() {
    let e = single_expr("a < b && c > d;");
    assert!(matches!(
        e,
        Expr::Logical {
            op: LogicalOp::And,
            ..
        }
    ));
}

#[test]
fn postfix_update_requires_same_line() {
    let program = parse("a\n++b");
    assert_eq!(program.body.len(), 2);
    assert!(matches!(
        &program.body[1],
        Stmt::Expr(Expr::Update { prefix: true, .. })
    ));
}

#[test]
fn templates_split_into_quasis_and_holes() {
    let e = single_expr("`a${b}c${d + 1}`;");
    let Expr::Template { quasis, exprs } = e else {
        panic!("expected a template");
    };
    assert_eq!(quasis, vec!["a", "c", ""]);
    assert_eq!(exprs.len(), 2);
    assert_eq!(exprs[0], Expr::Ident("b".into()));
}

#[test]
fn destructuring_patterns() {
    let program = parse("const { a, b: { c }, ...rest } = obj;\nconst [x, , y = 2, ...zs] = list;");
    let Stmt::Var { decls, .. } = &program.body[0] else {
        panic!("expected a declaration");
    };
    let Pattern::Object { props, rest } = &decls[0].0 else {
        panic!("expected an object pattern");
    };
    assert_eq!(props.len(), 2);
    assert!(matches!(props[1].value, Pattern::Object { .. }));
    assert_eq!(rest.as_deref(), Some("rest"));

    let Stmt::Var { decls, .. } = &program.body[1] else {
        panic!("expected a declaration");
    };
    let Pattern::Array { elems, rest } = &decls[0].0 else {
        panic!("expected an array pattern");
    };
    assert_eq!(elems.len(), 3);
    assert!(elems[1].is_none());
    assert!(matches!(&elems[2], Some((_, Some(Expr::Number(n)))) if *n == 2.0));
    assert!(rest.is_some());
}

#[test]
fn jsx_elements_attributes_and_children() {
    let el = jsx(r#"<div className="x" hidden {...rest}>Hi {name}</div>;"#);
    assert_eq!(el.name, JsxName::Intrinsic("div".into()));
    assert_eq!(
        el.attrs[0],
        JsxAttr::Named {
            name: "className".into(),
            value: Some(Expr::Str("x".into())),
        }
    );
    assert_eq!(
        el.attrs[1],
        JsxAttr::Named {
            name: "hidden".into(),
            value: None,
        }
    );
    assert!(matches!(el.attrs[2], JsxAttr::Spread(_)));
    assert_eq!(
        el.children,
        vec![
            JsxChild::Text("Hi ".into()),
            JsxChild::Expr(Expr::Ident("name".into())),
        ]
    );
}

#[test]
fn jsx_component_names_and_fragments() {
    let el = jsx("<Foo.Bar />;");
    assert!(matches!(el.name, JsxName::Component(Expr::Member { .. })));

    let el = jsx("<><Title /></>;");
    assert_eq!(el.name, JsxName::Fragment);
    assert!(matches!(&el.children[..], [JsxChild::Element(_)]));

    let el = jsx("<my-widget data-id=\"1\" />;");
    assert_eq!(el.name, JsxName::Intrinsic("my-widget".into()));
}

#[test]
fn jsx_comments_and_empty_holes_vanish() {
    let el = jsx("<div>{/* note */}{}</div>;");
    assert!(el.children.is_empty(), "{:?}", el.children);
}

#[test]
fn jsx_mismatched_closing_tag_is_an_error() {
    let err = parse_program("<div></span>;").unwrap_err();
    assert!(err.is_syntax());
}

#[test]
fn jsx_text_follows_react_whitespace_rules() {
    assert_eq!(jsx_text("\n   Hello\n   world\n  "), "Hello world");
    assert_eq!(jsx_text("  padded  "), "  padded  ");
    assert_eq!(jsx_text("\n\n   \n"), "");
    assert_eq!(jsx_text("a &amp; b"), "a & b");
}

#[test]
fn entities_decode_named_and_numeric() {
    assert_eq!(decode_entities("&#65;&#x42;&lt;&gt;"), "AB<>");
    assert_eq!(decode_entities("&bogus; & done"), "&bogus; & done");
}

#[test]
fn regex_literals_are_rejected_with_offset() {
    let err = parse_program("const r = /ab+c/;").unwrap_err();
    assert!(err.is_syntax());
    assert_eq!(err.offset, Some(10));
}

#[test]
fn unsupported_statements_are_reported() {
    for src in ["class A {}", "enum E { A }", "try { a(); } catch (e) {}", "async function f() { await g(); }"] {
        let err = parse_program(src).unwrap_err();
        assert!(err.is_syntax(), "{src}: {err}");
    }
}

#[test]
fn unterminated_input_is_a_syntax_error() {
    for src in ["const a = (1 + ;", "const f = () => {", "<div>"] {
        assert!(parse_program(src).unwrap_err().is_syntax(), "{src}");
    }
}
