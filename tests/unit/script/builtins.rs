use super::*;
use crate::script::interp::VideoInfo;
use crate::script::parser::parse_program;

fn eval(src: &str) -> String {
    let mut interp = Interpreter::new(VideoInfo {
        id: "Test".to_owned(),
        width: 100,
        height: 100,
        fps: 30.0,
        duration_in_frames: 30,
    });
    let global = interp.global();
    let scope = interp.push_scope(global);
    let program = parse_program(&format!("const out = {src};"))
        .unwrap_or_else(|e| panic!("{e}\n{src}"));
    interp
        .run(&program, scope)
        .unwrap_or_else(|e| panic!("{e}\n{src}"));
    interp.lookup(scope, "out").unwrap().to_js_string()
}

#[test]
fn to_fixed_rounds_midpoints_away_from_zero() {
    assert_eq!(to_fixed(2.5, 0), "3");
    assert_eq!(to_fixed(-2.5, 0), "-3");
    assert_eq!(to_fixed(1.45, 1), "1.5");
    assert_eq!(to_fixed(1.005, 2), "1.00");
    assert_eq!(to_fixed(0.1, 3), "0.100");
    assert_eq!(eval("(1234.5678).toFixed(2)"), "1234.57");
}

#[test]
fn locale_strings_group_thousands() {
    assert_eq!(to_locale_string(1_234_567.891, 0, 3), "1,234,567.891");
    assert_eq!(to_locale_string(999.9999, 0, 3), "1,000");
    assert_eq!(to_locale_string(5.0, 2, 2), "5.00");
    assert_eq!(eval("(1234.5).toLocaleString()"), "1,234.5");
    assert_eq!(
        eval("(0.5).toLocaleString('en-US', { minimumFractionDigits: 2 })"),
        "0.50"
    );
}

#[test]
fn number_formatting_methods() {
    assert_eq!(eval("(255).toString(16)"), "ff");
    assert_eq!(eval("(123.456).toPrecision(4)"), "123.5");
    assert_eq!(eval("parseInt('42px') + parseFloat('3.5em')"), "45.5");
    assert_eq!(eval("Number.isInteger(5) && !Number.isInteger(5.5)"), "true");
}

#[test]
fn math_functions() {
    assert_eq!(eval("Math.round(2.5) + Math.round(-2.5)"), "1");
    assert_eq!(eval("Math.max(1, 7, 3) - Math.min(4, 2)"), "5");
    assert_eq!(eval("Math.floor(Math.PI * 100)"), "314");
    assert_eq!(eval("Math.max()"), "-Infinity");
}

#[test]
fn array_pipelines() {
    assert_eq!(
        eval("[1, 2, 3, 4].map((x) => x * 2).filter((x) => x > 2).reduce((a, b) => a + b, 0)"),
        "18"
    );
    assert_eq!(eval("[[1, 2], [3, [4]]].flat().length"), "4");
    assert_eq!(eval("[1, 2].flatMap((x) => [x, x * 10]).join('-')"), "1-10-2-20");
    assert_eq!(eval("Array.from({ length: 3 }, (_, i) => i * 2)"), "0,2,4");
    assert_eq!(eval("[5, 6, 7].at(-1) + [5, 6, 7].indexOf(6)"), "8");
    assert_eq!(eval("[1, 2, 3].includes(2) && ![1, 2, 3].some((x) => x > 3)"), "true");
    assert_eq!(eval("[1, 2, 3].find((x) => x > 1) + [1, 2, 3].findIndex((x) => x > 5)"), "1");
}

#[test]
fn array_mutators() {
    assert_eq!(
        eval("(() => { const a = [1, 2, 3, 4]; const removed = a.splice(1, 2, 'x'); return a.join(',') + '|' + removed.join(','); })()"),
        "1,x,4|2,3"
    );
    assert_eq!(
        eval("(() => { const a = [1]; a.push(2, 3); a.unshift(0); a.pop(); return a.join(','); })()"),
        "0,1,2"
    );
}

#[test]
fn sort_defaults_to_string_order_and_is_stable() {
    assert_eq!(eval("[10, 9, 1].sort().join(',')"), "1,10,9");
    assert_eq!(eval("[3, 1, 2].sort((a, b) => a - b).join(',')"), "1,2,3");
    assert_eq!(
        eval("[{ k: 1, n: 'a' }, { k: 0, n: 'b' }, { k: 1, n: 'c' }].sort((x, y) => x.k - y.k).map((o) => o.n).join('')"),
        "bac"
    );
    assert_eq!(eval("[1, 2, 3, 4, 5, 6, 7, 8].sort(() => Math.random() - 0.5).length"), "8");
}

#[test]
fn string_methods() {
    assert_eq!(eval("'a,b,c'.split(',').reverse().join('')"), "cba");
    assert_eq!(eval("'7'.padStart(3, '0') + 'x'.padEnd(3, '.')"), "007x..");
    assert_eq!(eval("'hello'.slice(-3).toUpperCase()"), "LLO");
    assert_eq!(eval("'a-b-c'.replaceAll('-', '+') + 'a-b'.replace('-', '')"), "a+b+cab");
    assert_eq!(eval("'  hi  '.trim().length"), "2");
    assert_eq!(eval("'héllo'.charAt(1) + 'abc'.at(-1)"), "éc");
    assert_eq!(eval("'Launch'.charCodeAt(0)"), "76");
    assert_eq!(eval("'ab'.repeat(2).includes('ba')"), "true");
    assert_eq!(eval("'x'.replace('x', (m) => m + m)"), "xx");
}

#[test]
fn object_and_json_helpers() {
    assert_eq!(
        eval("JSON.stringify({ b: [1, 'x', null], a: undefined, c: () => 1 })"),
        r#"{"b":[1,"x",null]}"#
    );
    assert_eq!(eval("JSON.parse('{\"n\": 2}').n + 1"), "3");
    assert_eq!(
        eval("Object.entries(Object.assign({ a: 1 }, { b: 2 })).map(([k, v]) => k + v).join(' ')"),
        "a1 b2"
    );
    assert_eq!(eval("Object.fromEntries([['x', 1]]).x"), "1");
    assert_eq!(eval("({ a: 1 }).hasOwnProperty('a')"), "true");
}

#[test]
fn element_props_expose_children() {
    assert_eq!(eval("(<div id=\"a\">x</div>).props.children"), "x");
    assert_eq!(eval("(<div><b /><i /></div>).props.children.length"), "2");
}
