use super::*;
use crate::script::parser::parse_program;

fn video() -> VideoInfo {
    VideoInfo {
        id: "Test".to_owned(),
        width: 640,
        height: 360,
        fps: 30.0,
        duration_in_frames: 90,
    }
}

fn setup(src: &str) -> ScriptResult<(Interpreter, ScopeRef)> {
    let mut interp = Interpreter::new(video());
    let global = interp.global();
    let scope = interp.push_scope(global);
    let program = parse_program(src)?;
    interp.run(&program, scope)?;
    Ok((interp, scope))
}

fn out(src: &str) -> ScriptResult<Value> {
    let (interp, scope) = setup(src)?;
    interp.lookup(scope, "out")
}

fn num(src: &str) -> f64 {
    out(src).unwrap_or_else(|e| panic!("{e}\n{src}")).to_number()
}

fn text(src: &str) -> String {
    out(src).unwrap_or_else(|e| panic!("{e}\n{src}")).to_js_string()
}

#[test]
fn arithmetic_follows_precedence() {
    assert_eq!(num("const out = 2 + 3 * 4 ** 2 / 8;"), 8.0);
    assert_eq!(num("const out = 2 ** 3 ** 2;"), 512.0);
    assert_eq!(num("const out = -7 % 3;"), -1.0);
    assert_eq!(text("const n = 3; const out = `n=${n}` + 1;"), "n=31");
}

#[test]
fn equality_and_comparison() {
    assert_eq!(
        text("const out = [1 == '1', 1 === '1', null == undefined, 'b' > 'a', NaN === NaN].join(',');"),
        "true,false,true,true,false"
    );
}

#[test]
fn closures_capture_their_scope() {
    let src = "function counter() { let c = 0; return () => ++c; }\nconst next = counter();\nnext(); next();\nconst out = next();";
    assert_eq!(num(src), 3.0);
}

#[test]
fn function_declarations_are_hoisted() {
    assert_eq!(num("const out = double(4);\nfunction double(x) { return x * 2; }"), 8.0);
}

#[test]
fn destructuring_with_defaults_and_rest() {
    let src = "const { a, b = 5, ...rest } = { a: 1, c: 3, d: 4 };\nconst [x, , y = 7] = [10, 20];\nconst out = a + b + Object.keys(rest).length + x + y;";
    assert_eq!(num(src), 25.0);
}

#[test]
fn loops_break_and_continue() {
    let src = "let s = 0;\nfor (let i = 0; i < 10; i++) { if (i % 2) continue; if (i > 6) break; s += i; }\nfor (const [k, v] of Object.entries({ a: 1, b: 2 })) { s += v; }\nfor (const k in { x: 1, y: 2 }) { s += k.length; }\nlet n = 3;\nwhile (n > 0) { n--; s++; }\nconst out = s;";
    assert_eq!(num(src), 12.0 + 3.0 + 2.0 + 3.0);
}

#[test]
fn switch_falls_through_to_default() {
    let src = "function f(x) { switch (x) { case 1: case 2: return 'low'; case 3: { return 'three'; } default: return 'other'; } }\nconst out = [f(1), f(3), f(9)].join(',');";
    assert_eq!(text(src), "low,three,other");
}

#[test]
fn optional_chaining_short_circuits() {
    let src = "const o = { a: null };\nconst out = String(o.a?.b.c) + String(o.missing?.()) + (o.a ?? 'd');";
    assert_eq!(text(src), "undefinedundefinedd");
}

#[test]
fn compound_and_logical_assignment() {
    let src = "let a = null; a ??= 4; a += 1; let b = 0; b ||= 7; const o = { n: 1 }; o.n *= 3; const out = a + b + o.n;";
    assert_eq!(num(src), 5.0 + 7.0 + 3.0);
}

#[test]
fn typeof_tolerates_undeclared_names() {
    assert_eq!(text("const out = typeof missing;"), "undefined");
    let err = out("const out = missing + 1;").unwrap_err();
    assert!(err.message.contains("missing is not defined"));
}

#[test]
fn const_reassignment_fails() {
    let err = out("const a = 1; a = 2; const out = a;").unwrap_err();
    assert!(err.message.contains("constant"), "{err}");
}

#[test]
fn reading_from_undefined_fails() {
    let err = out("const o = undefined; const out = o.x;").unwrap_err();
    assert!(err.message.contains("cannot read properties"), "{err}");
}

#[test]
fn throw_surfaces_message() {
    let err = out("throw new Error('boom');").unwrap_err();
    assert_eq!(err.message, "uncaught exception: boom");
}

#[test]
fn step_budget_stops_runaway_loops() {
    let mut interp = Interpreter::new(video());
    interp.set_step_limit(1_000);
    let global = interp.global();
    let program = parse_program("while (true) {}").unwrap();
    let err = interp.run(&program, global).unwrap_err();
    assert!(err.message.contains("exceeded"), "{err}");
}

#[test]
fn array_growth_is_capped() {
    assert_eq!(num("const out = new Array(1000000).length;"), 1_000_000.0);
    for src in [
        "const out = new Array(4294967295);",
        "const out = Array(1000001);",
        "const out = Array.from({ length: 1e9 });",
        "const a = []; a.length = 1e9; const out = a;",
        "const a = []; a[1e9] = 1; const out = a;",
        "let a = [0]; for (let i = 0; i < 40; i++) { a = a.concat(a); } const out = a;",
    ] {
        let err = out(src).unwrap_err();
        assert!(err.message.contains("invalid array length"), "{src}: {err}");
    }

    let a = out("const a = [1]; a[4] = 5; a.length = 2; const out = a;").unwrap();
    assert_eq!(a.to_js_string(), "1,");
}

#[test]
fn unbounded_recursion_is_caught() {
    let err = out("function f() { return f(); }\nf();").unwrap_err();
    assert!(err.message.contains("call stack"), "{err}");
}

#[test]
fn jsx_evaluates_to_elements() {
    let v = out("const Comp = ({ label }) => <div>{label}</div>;\nconst out = <Comp label=\"x\" {...{ id: 2 }} />;").unwrap();
    let Value::Element(el) = v else {
        panic!("expected an element");
    };
    assert!(matches!(el.kind, ElementKind::Component(_)));
    let keys: Vec<&str> = el.props.keys().map(String::as_str).collect();
    assert_eq!(keys, ["label", "id"]);
}

#[test]
fn frame_scopes_are_discarded_between_frames() {
    let (mut interp, scope) = setup("const make = () => () => 1;").unwrap();
    interp.seal();
    let persistent = interp.scope_count();
    let make = interp.lookup(scope, "make").unwrap();

    interp.begin_frame(0.0);
    let inner = interp.call(&make, &[]).unwrap();
    assert_eq!(interp.call(&inner, &[]).unwrap().to_number(), 1.0);
    assert!(interp.scope_count() > persistent);

    interp.begin_frame(1.0);
    assert_eq!(interp.scope_count(), persistent);
    let err = interp.call(&inner, &[]).unwrap_err();
    assert!(err.message.contains("earlier frame"), "{err}");
    assert!(interp.call(&make, &[]).is_ok());
}

#[test]
fn random_stream_restarts_each_frame() {
    let mut interp = Interpreter::new(video());
    interp.begin_frame(0.0);
    let a = interp.next_random();
    let b = interp.next_random();
    assert_ne!(a, b);
    assert!((0.0..1.0).contains(&a));
    interp.begin_frame(5.0);
    assert_eq!(interp.next_random(), a);
}
