use super::*;

fn kinds(src: &str) -> Vec<TokenKind> {
    let mut lx = Lexer::new(src);
    let mut out = Vec::new();
    loop {
        let t = lx.next_token().unwrap();
        if t.kind == TokenKind::Eof {
            return out;
        }
        out.push(t.kind);
    }
}

#[test]
fn lexes_operators_greedily() {
    assert_eq!(
        kinds("a === b !== c ?? d?.e => ..."),
        vec![
            TokenKind::Ident("a".into()),
            TokenKind::EqEqEq,
            TokenKind::Ident("b".into()),
            TokenKind::NeEq,
            TokenKind::Ident("c".into()),
            TokenKind::Nullish,
            TokenKind::Ident("d".into()),
            TokenKind::QuestionDot,
            TokenKind::Ident("e".into()),
            TokenKind::Arrow,
            TokenKind::Ellipsis,
        ]
    );
}

#[test]
fn closing_angles_stay_single() {
    assert_eq!(
        kinds("Array<Array<number>>"),
        vec![
            TokenKind::Ident("Array".into()),
            TokenKind::Lt,
            TokenKind::Ident("Array".into()),
            TokenKind::Lt,
            TokenKind::Ident("number".into()),
            TokenKind::Gt,
            TokenKind::Gt,
        ]
    );
}

#[test]
fn numbers_in_all_forms() {
    assert_eq!(
        kinds("1 2.5 .5 1e3 0xff 1_000"),
        vec![
            TokenKind::Number(1.0),
            TokenKind::Number(2.5),
            TokenKind::Number(0.5),
            TokenKind::Number(1000.0),
            TokenKind::Number(255.0),
            TokenKind::Number(1000.0),
        ]
    );
}

#[test]
fn strings_decode_escapes() {
    assert_eq!(
        kinds(r#"'it\'s' "a\nb" "A\u{1F600}""#),
        vec![
            TokenKind::Str("it's".into()),
            TokenKind::Str("a\nb".into()),
            TokenKind::Str("A\u{1F600}".into()),
        ]
    );
}

#[test]
fn template_holes_keep_nested_braces() {
    let k = kinds("`scale(${ {a: 1}.a }) ${`in${x}`}`");
    let TokenKind::Template(t) = &k[0] else {
        panic!("expected template, got {k:?}");
    };
    assert_eq!(t.quasis, vec!["scale(", ") ", ""]);
    assert_eq!(t.holes.len(), 2);
    assert_eq!(t.holes[0].1.trim(), "{a: 1}.a");
    assert_eq!(t.holes[1].1, "`in${x}`");
}

#[test]
fn comments_are_trivia_and_newlines_are_tracked() {
    let mut lx = Lexer::new("a // c\n/* x */ b");
    let a = lx.next_token().unwrap();
    let b = lx.next_token().unwrap();
    assert!(!a.nl_before);
    assert!(b.nl_before);
    assert_eq!(b.kind, TokenKind::Ident("b".into()));
}

#[test]
fn unterminated_string_is_an_error() {
    let mut lx = Lexer::new("'abc");
    let err = lx.next_token().unwrap_err();
    assert!(err.to_string().contains("unterminated string"));
}
