//! Global objects and the built-in methods of arrays, strings and numbers.

use std::cmp::Ordering;

use serde::Serialize;

use crate::script::error::{ScriptError, ScriptResult};
use crate::script::interp::{Interpreter, describe, own_keys, spread_into};
use crate::script::value::{
    NativeCall, PropMap, Value, array_index, array_length, number_to_string, relative_index,
    to_integer,
};

fn arg(args: &[Value], i: usize) -> Value {
    args.get(i).cloned().unwrap_or_default()
}

fn num(args: &[Value], i: usize) -> f64 {
    args.get(i).map_or(f64::NAN, Value::to_number)
}

fn callback(args: &[Value], method: &str) -> ScriptResult<Value> {
    let cb = arg(args, 0);
    if cb.is_callable() {
        Ok(cb)
    } else {
        Err(ScriptError::runtime(format!(
            "{} is not a function (in {method})",
            describe(&cb)
        )))
    }
}

fn namespace(entries: &[(&'static str, NativeCall)]) -> Value {
    Value::object(
        entries
            .iter()
            .map(|&(name, call)| (name.to_owned(), Value::native(name, Value::Undefined, call)))
            .collect(),
    )
}

pub(crate) fn install(interp: &mut Interpreter) {
    let math = namespace(MATH);
    if let Value::Object(map) = &math {
        let mut map = map.borrow_mut();
        map.insert("PI".to_owned(), Value::Number(std::f64::consts::PI));
        map.insert("E".to_owned(), Value::Number(std::f64::consts::E));
        map.insert("SQRT2".to_owned(), Value::Number(std::f64::consts::SQRT_2));
        map.insert("LN2".to_owned(), Value::Number(std::f64::consts::LN_2));
        map.insert("LN10".to_owned(), Value::Number(std::f64::consts::LN_10));
    }

    let globals = [
        ("Math", math),
        (
            "JSON",
            namespace(&[
                ("stringify", json_stringify as NativeCall),
                ("parse", json_parse),
            ]),
        ),
        (
            "console",
            namespace(&[
                ("log", console_log as NativeCall),
                ("info", console_log),
                ("debug", console_log),
                ("warn", console_warn),
                ("error", console_warn),
            ]),
        ),
        ("Object", Value::native("Object", Value::Undefined, object_ctor)),
        ("Array", Value::native("Array", Value::Undefined, array_ctor)),
        ("Number", Value::native("Number", Value::Undefined, number_ctor)),
        ("String", Value::native("String", Value::Undefined, string_ctor)),
        ("Boolean", Value::native("Boolean", Value::Undefined, boolean_ctor)),
        ("Error", Value::native("Error", Value::Undefined, error_ctor)),
        ("parseInt", Value::native("parseInt", Value::Undefined, parse_int)),
        ("parseFloat", Value::native("parseFloat", Value::Undefined, parse_float)),
        ("isNaN", Value::native("isNaN", Value::Undefined, is_nan)),
        ("isFinite", Value::native("isFinite", Value::Undefined, is_finite)),
        ("Infinity", Value::Number(f64::INFINITY)),
        ("NaN", Value::Number(f64::NAN)),
    ];
    let global = interp.global();
    for (name, value) in globals {
        interp.declare(global, name, value, false);
    }
}

// ---- property access ----

pub(crate) fn get_member(obj: &Value, key: &str) -> ScriptResult<Value> {
    let bound = |table: fn(&str) -> Option<(&'static str, NativeCall)>| {
        table(key).map_or(Value::Undefined, |(name, call)| {
            Value::native(name, obj.clone(), call)
        })
    };
    Ok(match obj {
        Value::Undefined | Value::Null => {
            return Err(ScriptError::runtime(format!(
                "cannot read properties of {} (reading '{key}')",
                obj.to_js_string()
            )));
        }
        Value::Object(map) => match map.borrow().get(key) {
            Some(v) => v.clone(),
            None => bound(object_method),
        },
        Value::Array(items) => {
            if key == "length" {
                Value::Number(items.borrow().len() as f64)
            } else if let Some(i) = array_index(key) {
                items.borrow().get(i).cloned().unwrap_or_default()
            } else {
                bound(array_method)
            }
        }
        Value::String(s) => {
            if key == "length" {
                Value::Number(s.chars().count() as f64)
            } else if let Some(i) = array_index(key) {
                s.chars()
                    .nth(i)
                    .map_or(Value::Undefined, |c| Value::str(c.to_string()))
            } else {
                bound(string_method)
            }
        }
        Value::Number(_) => bound(number_method),
        Value::Bool(_) => match key {
            "toString" => Value::native("toString", obj.clone(), to_string_method),
            _ => Value::Undefined,
        },
        Value::Native(native) => static_member(native.name, key),
        Value::Function(closure) => match key {
            "name" => Value::str(closure.func.name.as_deref().unwrap_or("")),
            "length" => Value::Number(closure.func.params.len() as f64),
            _ => Value::Undefined,
        },
        Value::Element(element) => match key {
            "props" => {
                let mut props = element.props.clone();
                if !element.children.is_empty() {
                    props.insert("children".to_owned(), children_prop(&element.children));
                }
                Value::object(props)
            }
            _ => Value::Undefined,
        },
        Value::Primitive(_) => Value::Undefined,
    })
}

/// `props.children` as React exposes it: a single child unwrapped, several as an array.
pub(crate) fn children_prop(children: &[Value]) -> Value {
    match children {
        [] => Value::Undefined,
        [only] => only.clone(),
        many => Value::array(many.to_vec()),
    }
}

fn static_member(owner: &str, key: &str) -> Value {
    let call: NativeCall = match (owner, key) {
        ("Array", "isArray") => array_is_array,
        ("Array", "from") => array_from,
        ("Array", "of") => array_of,
        ("Object", "keys") => object_keys,
        ("Object", "values") => object_values,
        ("Object", "entries") => object_entries,
        ("Object", "assign") => object_assign,
        ("Object", "fromEntries") => object_from_entries,
        ("Object", "freeze") => object_ctor,
        ("Number", "isInteger") => number_is_integer,
        ("Number", "isFinite") => number_is_finite,
        ("Number", "isNaN") => number_is_nan,
        ("Number", "parseFloat") => parse_float,
        ("Number", "parseInt") => parse_int,
        ("Number", "MAX_SAFE_INTEGER") => return Value::Number(9_007_199_254_740_991.0),
        ("Number", "MIN_SAFE_INTEGER") => return Value::Number(-9_007_199_254_740_991.0),
        ("Number", "EPSILON") => return Value::Number(f64::EPSILON),
        ("Number", "MAX_VALUE") => return Value::Number(f64::MAX),
        ("String", "fromCharCode") => string_from_char_code,
        (_, "name") => return Value::str(owner),
        _ => return Value::Undefined,
    };
    Value::native(leak_name(key), Value::Undefined, call)
}

/// Static member names are a closed set of literals, so map back to `'static`.
fn leak_name(key: &str) -> &'static str {
    const NAMES: &[&str] = &[
        "isArray",
        "from",
        "of",
        "keys",
        "values",
        "entries",
        "assign",
        "fromEntries",
        "freeze",
        "isInteger",
        "isFinite",
        "isNaN",
        "parseFloat",
        "parseInt",
        "fromCharCode",
    ];
    NAMES.iter().copied().find(|n| *n == key).unwrap_or("native")
}

// ---- globals ----

const MATH: &[(&str, NativeCall)] = &[
    ("abs", |_, _, a| Ok(Value::Number(num(a, 0).abs()))),
    ("floor", |_, _, a| Ok(Value::Number(num(a, 0).floor()))),
    ("ceil", |_, _, a| Ok(Value::Number(num(a, 0).ceil()))),
    ("trunc", |_, _, a| Ok(Value::Number(num(a, 0).trunc()))),
    ("round", |_, _, a| Ok(Value::Number((num(a, 0) + 0.5).floor()))),
    ("sign", |_, _, a| {
        let x = num(a, 0);
        Ok(Value::Number(if x == 0.0 || x.is_nan() { x } else { x.signum() }))
    }),
    ("sqrt", |_, _, a| Ok(Value::Number(num(a, 0).sqrt()))),
    ("cbrt", |_, _, a| Ok(Value::Number(num(a, 0).cbrt()))),
    ("sin", |_, _, a| Ok(Value::Number(num(a, 0).sin()))),
    ("cos", |_, _, a| Ok(Value::Number(num(a, 0).cos()))),
    ("tan", |_, _, a| Ok(Value::Number(num(a, 0).tan()))),
    ("asin", |_, _, a| Ok(Value::Number(num(a, 0).asin()))),
    ("acos", |_, _, a| Ok(Value::Number(num(a, 0).acos()))),
    ("atan", |_, _, a| Ok(Value::Number(num(a, 0).atan()))),
    ("sinh", |_, _, a| Ok(Value::Number(num(a, 0).sinh()))),
    ("cosh", |_, _, a| Ok(Value::Number(num(a, 0).cosh()))),
    ("tanh", |_, _, a| Ok(Value::Number(num(a, 0).tanh()))),
    ("exp", |_, _, a| Ok(Value::Number(num(a, 0).exp()))),
    ("log", |_, _, a| Ok(Value::Number(num(a, 0).ln()))),
    ("log2", |_, _, a| Ok(Value::Number(num(a, 0).log2()))),
    ("log10", |_, _, a| Ok(Value::Number(num(a, 0).log10()))),
    ("atan2", |_, _, a| Ok(Value::Number(num(a, 0).atan2(num(a, 1))))),
    ("pow", |_, _, a| {
        let (x, y) = (num(a, 0), num(a, 1));
        Ok(Value::Number(if y.is_nan() { f64::NAN } else { x.powf(y) }))
    }),
    ("min", |_, _, a| {
        Ok(Value::Number(a.iter().map(Value::to_number).fold(
            f64::INFINITY,
            |acc, x| if x.is_nan() || acc.is_nan() { f64::NAN } else { acc.min(x) },
        )))
    }),
    ("max", |_, _, a| {
        Ok(Value::Number(a.iter().map(Value::to_number).fold(
            f64::NEG_INFINITY,
            |acc, x| if x.is_nan() || acc.is_nan() { f64::NAN } else { acc.max(x) },
        )))
    }),
    ("hypot", |_, _, a| {
        Ok(Value::Number(
            a.iter().map(|v| v.to_number().powi(2)).sum::<f64>().sqrt(),
        ))
    }),
    ("random", |interp, _, _| Ok(Value::Number(interp.next_random()))),
];

fn json_stringify(_: &mut Interpreter, _: &Value, args: &[Value]) -> ScriptResult<Value> {
    let Some(json) = arg(args, 0).to_json() else {
        return Ok(Value::Undefined);
    };
    let indent = match arg(args, 2) {
        Value::Number(n) if n >= 1.0 => " ".repeat(n.min(10.0) as usize),
        Value::String(s) => s.chars().take(10).collect(),
        _ => String::new(),
    };
    let text = if indent.is_empty() {
        serde_json::to_string(&json)
    } else {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        json.serialize(&mut ser)
            .map(|()| String::from_utf8_lossy(&buf).into_owned())
    };
    text.map(Value::str)
        .map_err(|e| ScriptError::runtime(format!("JSON.stringify: {e}")))
}

fn json_parse(_: &mut Interpreter, _: &Value, args: &[Value]) -> ScriptResult<Value> {
    let text = arg(args, 0).to_js_string();
    serde_json::from_str::<serde_json::Value>(&text)
        .map(|json| Value::from_json(&json))
        .map_err(|e| ScriptError::runtime(format!("JSON.parse: {e}")))
}

fn console_text(args: &[Value]) -> String {
    args.iter()
        .map(|v| match v {
            Value::String(s) => s.to_string(),
            Value::Array(_) | Value::Object(_) => v
                .to_json()
                .map_or_else(|| v.to_js_string(), |j| j.to_string()),
            other => other.to_js_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn console_log(_: &mut Interpreter, _: &Value, args: &[Value]) -> ScriptResult<Value> {
    tracing::debug!(target: "reelsmith::script", "{}", console_text(args));
    Ok(Value::Undefined)
}

fn console_warn(_: &mut Interpreter, _: &Value, args: &[Value]) -> ScriptResult<Value> {
    tracing::warn!(target: "reelsmith::script", "{}", console_text(args));
    Ok(Value::Undefined)
}

fn object_ctor(_: &mut Interpreter, _: &Value, args: &[Value]) -> ScriptResult<Value> {
    Ok(match arg(args, 0) {
        v if v.is_nullish() => Value::object(PropMap::new()),
        v => v,
    })
}

fn array_ctor(_: &mut Interpreter, _: &Value, args: &[Value]) -> ScriptResult<Value> {
    if let [Value::Number(n)] = args {
        return Ok(Value::array(vec![Value::Undefined; array_length(*n)?]));
    }
    Ok(Value::array(args.to_vec()))
}

fn number_ctor(_: &mut Interpreter, _: &Value, args: &[Value]) -> ScriptResult<Value> {
    Ok(Value::Number(args.first().map_or(0.0, Value::to_number)))
}

fn string_ctor(_: &mut Interpreter, _: &Value, args: &[Value]) -> ScriptResult<Value> {
    Ok(Value::str(
        args.first().map_or_else(String::new, Value::to_js_string),
    ))
}

fn boolean_ctor(_: &mut Interpreter, _: &Value, args: &[Value]) -> ScriptResult<Value> {
    Ok(Value::Bool(arg(args, 0).truthy()))
}

fn error_ctor(_: &mut Interpreter, _: &Value, args: &[Value]) -> ScriptResult<Value> {
    let mut map = PropMap::new();
    map.insert("name".to_owned(), Value::str("Error"));
    let message = match arg(args, 0) {
        Value::Undefined => String::new(),
        other => other.to_js_string(),
    };
    map.insert("message".to_owned(), Value::str(message));
    Ok(Value::object(map))
}

fn is_nan(_: &mut Interpreter, _: &Value, args: &[Value]) -> ScriptResult<Value> {
    Ok(Value::Bool(num(args, 0).is_nan()))
}

fn is_finite(_: &mut Interpreter, _: &Value, args: &[Value]) -> ScriptResult<Value> {
    Ok(Value::Bool(num(args, 0).is_finite()))
}

fn number_is_integer(_: &mut Interpreter, _: &Value, args: &[Value]) -> ScriptResult<Value> {
    Ok(Value::Bool(
        matches!(arg(args, 0), Value::Number(n) if n.is_finite() && n.fract() == 0.0),
    ))
}

fn number_is_finite(_: &mut Interpreter, _: &Value, args: &[Value]) -> ScriptResult<Value> {
    Ok(Value::Bool(
        matches!(arg(args, 0), Value::Number(n) if n.is_finite()),
    ))
}

fn number_is_nan(_: &mut Interpreter, _: &Value, args: &[Value]) -> ScriptResult<Value> {
    Ok(Value::Bool(matches!(arg(args, 0), Value::Number(n) if n.is_nan())))
}

fn parse_int(_: &mut Interpreter, _: &Value, args: &[Value]) -> ScriptResult<Value> {
    let text = arg(args, 0).to_js_string();
    let mut s = text.trim_start();
    let negative = s.starts_with('-');
    s = s.strip_prefix(['-', '+']).unwrap_or(s);
    let mut radix = match arg(args, 1) {
        Value::Undefined => 10,
        v => to_integer(v.to_number()) as u32,
    };
    if radix == 0 {
        radix = 10;
    }
    if (radix == 16 || args.get(1).is_none_or(Value::is_nullish))
        && (s.starts_with("0x") || s.starts_with("0X"))
    {
        s = &s[2..];
        radix = 16;
    }
    if !(2..=36).contains(&radix) {
        return Ok(Value::Number(f64::NAN));
    }
    let digits: String = s.chars().take_while(|c| c.is_digit(radix)).collect();
    if digits.is_empty() {
        return Ok(Value::Number(f64::NAN));
    }
    let value = digits
        .chars()
        .filter_map(|c| c.to_digit(radix))
        .fold(0.0, |acc, d| acc * f64::from(radix) + f64::from(d));
    Ok(Value::Number(if negative { -value } else { value }))
}

fn parse_float(_: &mut Interpreter, _: &Value, args: &[Value]) -> ScriptResult<Value> {
    let text = arg(args, 0).to_js_string();
    Ok(Value::Number(parse_float_prefix(text.trim_start())))
}

/// Longest prefix of `s` that reads as a decimal literal.
fn parse_float_prefix(s: &str) -> f64 {
    let bytes = s.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    if s[i..].starts_with("Infinity") {
        return if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }
    let digits = |i: &mut usize| {
        let start = *i;
        while *i < bytes.len() && bytes[*i].is_ascii_digit() {
            *i += 1;
        }
        *i > start
    };
    let mut any = digits(&mut i);
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        any |= digits(&mut i);
    }
    if !any {
        return f64::NAN;
    }
    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        let mut j = i + 1;
        if j < bytes.len() && matches!(bytes[j], b'+' | b'-') {
            j += 1;
        }
        if digits(&mut j) {
            i = j;
        }
    }
    s[..i].parse().unwrap_or(f64::NAN)
}

// ---- Object ----

fn object_method(key: &str) -> Option<(&'static str, NativeCall)> {
    Some(match key {
        "hasOwnProperty" => ("hasOwnProperty", |_, this, args| {
            let key = arg(args, 0).to_property_key();
            Ok(Value::Bool(own_keys(this).contains(&key)))
        }),
        "toString" => ("toString", to_string_method),
        _ => return None,
    })
}

fn to_string_method(_: &mut Interpreter, this: &Value, _: &[Value]) -> ScriptResult<Value> {
    Ok(Value::str(this.to_js_string()))
}

fn object_keys(_: &mut Interpreter, _: &Value, args: &[Value]) -> ScriptResult<Value> {
    Ok(Value::array(
        own_keys(&arg(args, 0)).into_iter().map(Value::str).collect(),
    ))
}

fn object_values(_: &mut Interpreter, _: &Value, args: &[Value]) -> ScriptResult<Value> {
    let target = arg(args, 0);
    let values = own_keys(&target)
        .iter()
        .map(|k| get_member(&target, k))
        .collect::<ScriptResult<Vec<_>>>()?;
    Ok(Value::array(values))
}

fn object_entries(_: &mut Interpreter, _: &Value, args: &[Value]) -> ScriptResult<Value> {
    let target = arg(args, 0);
    let entries = own_keys(&target)
        .into_iter()
        .map(|k| {
            let v = get_member(&target, &k)?;
            Ok(Value::array(vec![Value::str(k), v]))
        })
        .collect::<ScriptResult<Vec<_>>>()?;
    Ok(Value::array(entries))
}

fn object_assign(_: &mut Interpreter, _: &Value, args: &[Value]) -> ScriptResult<Value> {
    let target = arg(args, 0);
    let Value::Object(map) = &target else {
        return Err(ScriptError::runtime(
            "Object.assign target must be an object",
        ));
    };
    for source in args.iter().skip(1) {
        let mut staged = PropMap::new();
        spread_into(&mut staged, source);
        map.borrow_mut().extend(staged);
    }
    Ok(target)
}

fn object_from_entries(interp: &mut Interpreter, _: &Value, args: &[Value]) -> ScriptResult<Value> {
    let mut map = PropMap::new();
    for entry in interp.iterate(&arg(args, 0))? {
        let key = get_member(&entry, "0")?.to_property_key();
        let value = get_member(&entry, "1")?;
        map.insert(key, value);
    }
    Ok(Value::object(map))
}

// ---- Array ----

fn this_items(this: &Value) -> ScriptResult<Vec<Value>> {
    match this {
        Value::Array(items) => Ok(items.borrow().clone()),
        other => Err(ScriptError::runtime(format!(
            "array method called on {}",
            other.type_of()
        ))),
    }
}

fn replace_items(this: &Value, items: Vec<Value>) {
    if let Value::Array(cell) = this {
        *cell.borrow_mut() = items;
    }
}

fn array_is_array(_: &mut Interpreter, _: &Value, args: &[Value]) -> ScriptResult<Value> {
    Ok(Value::Bool(matches!(arg(args, 0), Value::Array(_))))
}

fn array_of(_: &mut Interpreter, _: &Value, args: &[Value]) -> ScriptResult<Value> {
    Ok(Value::array(args.to_vec()))
}

fn array_from(interp: &mut Interpreter, _: &Value, args: &[Value]) -> ScriptResult<Value> {
    let source = arg(args, 0);
    let items = match &source {
        Value::Array(_) | Value::String(_) => interp.iterate(&source)?,
        Value::Object(_) => {
            let len = to_integer(get_member(&source, "length")?.to_number()).max(0.0);
            let len = array_length(len)?;
            (0..len)
                .map(|i| get_member(&source, &i.to_string()))
                .collect::<ScriptResult<Vec<_>>>()?
        }
        _ => Vec::new(),
    };
    let mapper = arg(args, 1);
    if !mapper.is_callable() {
        return Ok(Value::array(items));
    }
    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        out.push(interp.call(&mapper, &[item, Value::Number(i as f64)])?);
    }
    Ok(Value::array(out))
}

fn array_method(key: &str) -> Option<(&'static str, NativeCall)> {
    Some(match key {
        "map" => ("map", array_map),
        "filter" => ("filter", array_filter),
        "forEach" => ("forEach", array_for_each),
        "reduce" => ("reduce", array_reduce),
        "reduceRight" => ("reduceRight", array_reduce_right),
        "find" => ("find", array_find),
        "findIndex" => ("findIndex", array_find_index),
        "findLast" => ("findLast", array_find_last),
        "some" => ("some", array_some),
        "every" => ("every", array_every),
        "flatMap" => ("flatMap", array_flat_map),
        "sort" => ("sort", array_sort),
        "includes" => ("includes", array_includes),
        "indexOf" => ("indexOf", array_index_of),
        "lastIndexOf" => ("lastIndexOf", array_last_index_of),
        "join" => ("join", array_join),
        "toString" => ("toString", array_join),
        "slice" => ("slice", array_slice),
        "concat" => ("concat", array_concat),
        "reverse" => ("reverse", array_reverse),
        "push" => ("push", array_push),
        "pop" => ("pop", array_pop),
        "shift" => ("shift", array_shift),
        "unshift" => ("unshift", array_unshift),
        "splice" => ("splice", array_splice),
        "fill" => ("fill", array_fill),
        "flat" => ("flat", array_flat),
        "at" => ("at", array_at),
        "keys" => ("keys", array_keys),
        "entries" => ("entries", array_entries),
        _ => return None,
    })
}

/// Call `cb(item, index, array)` for each item of a snapshot of `this`.
fn each_result(
    interp: &mut Interpreter,
    this: &Value,
    args: &[Value],
    method: &str,
) -> ScriptResult<Vec<(Value, Value)>> {
    let cb = callback(args, method)?;
    let items = this_items(this)?;
    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        let r = interp.call(&cb, &[item.clone(), Value::Number(i as f64), this.clone()])?;
        out.push((item, r));
    }
    Ok(out)
}

fn array_map(interp: &mut Interpreter, this: &Value, args: &[Value]) -> ScriptResult<Value> {
    let results = each_result(interp, this, args, "map")?;
    Ok(Value::array(results.into_iter().map(|(_, r)| r).collect()))
}

fn array_filter(interp: &mut Interpreter, this: &Value, args: &[Value]) -> ScriptResult<Value> {
    let results = each_result(interp, this, args, "filter")?;
    Ok(Value::array(
        results
            .into_iter()
            .filter(|(_, r)| r.truthy())
            .map(|(item, _)| item)
            .collect(),
    ))
}

fn array_for_each(interp: &mut Interpreter, this: &Value, args: &[Value]) -> ScriptResult<Value> {
    each_result(interp, this, args, "forEach")?;
    Ok(Value::Undefined)
}

fn array_flat_map(interp: &mut Interpreter, this: &Value, args: &[Value]) -> ScriptResult<Value> {
    let results = each_result(interp, this, args, "flatMap")?;
    let mut out = Vec::new();
    for (_, r) in results {
        match r {
            Value::Array(inner) => out.extend(inner.borrow().iter().cloned()),
            other => out.push(other),
        }
    }
    Ok(Value::array(out))
}

/// First index whose callback result is truthy, scanning forward or backward.
fn search(
    interp: &mut Interpreter,
    this: &Value,
    args: &[Value],
    method: &str,
    backward: bool,
) -> ScriptResult<Option<(usize, Value)>> {
    let cb = callback(args, method)?;
    let items = this_items(this)?;
    let order: Box<dyn Iterator<Item = usize>> = if backward {
        Box::new((0..items.len()).rev())
    } else {
        Box::new(0..items.len())
    };
    for i in order {
        let item = items[i].clone();
        if interp
            .call(&cb, &[item.clone(), Value::Number(i as f64), this.clone()])?
            .truthy()
        {
            return Ok(Some((i, item)));
        }
    }
    Ok(None)
}

fn array_find(interp: &mut Interpreter, this: &Value, args: &[Value]) -> ScriptResult<Value> {
    Ok(search(interp, this, args, "find", false)?.map_or(Value::Undefined, |(_, v)| v))
}

fn array_find_last(interp: &mut Interpreter, this: &Value, args: &[Value]) -> ScriptResult<Value> {
    Ok(search(interp, this, args, "findLast", true)?.map_or(Value::Undefined, |(_, v)| v))
}

fn array_find_index(interp: &mut Interpreter, this: &Value, args: &[Value]) -> ScriptResult<Value> {
    Ok(Value::Number(
        search(interp, this, args, "findIndex", false)?.map_or(-1.0, |(i, _)| i as f64),
    ))
}

fn array_some(interp: &mut Interpreter, this: &Value, args: &[Value]) -> ScriptResult<Value> {
    Ok(Value::Bool(search(interp, this, args, "some", false)?.is_some()))
}

fn array_every(interp: &mut Interpreter, this: &Value, args: &[Value]) -> ScriptResult<Value> {
    let cb = callback(args, "every")?;
    for (i, item) in this_items(this)?.into_iter().enumerate() {
        if !interp
            .call(&cb, &[item, Value::Number(i as f64), this.clone()])?
            .truthy()
        {
            return Ok(Value::Bool(false));
        }
    }
    Ok(Value::Bool(true))
}

fn fold(
    interp: &mut Interpreter,
    this: &Value,
    args: &[Value],
    method: &str,
    backward: bool,
) -> ScriptResult<Value> {
    let cb = callback(args, method)?;
    let mut items: Vec<(usize, Value)> = this_items(this)?.into_iter().enumerate().collect();
    if backward {
        items.reverse();
    }
    let mut iter = items.into_iter();
    let mut acc = match args.get(1) {
        Some(init) => init.clone(),
        None => match iter.next() {
            Some((_, first)) => first,
            None => {
                return Err(ScriptError::runtime(format!(
                    "{method} of empty array with no initial value"
                )));
            }
        },
    };
    for (i, item) in iter {
        acc = interp.call(&cb, &[acc, item, Value::Number(i as f64), this.clone()])?;
    }
    Ok(acc)
}

fn array_reduce(interp: &mut Interpreter, this: &Value, args: &[Value]) -> ScriptResult<Value> {
    fold(interp, this, args, "reduce", false)
}

fn array_reduce_right(
    interp: &mut Interpreter,
    this: &Value,
    args: &[Value],
) -> ScriptResult<Value> {
    fold(interp, this, args, "reduceRight", true)
}

fn array_sort(interp: &mut Interpreter, this: &Value, args: &[Value]) -> ScriptResult<Value> {
    let items = this_items(this)?;
    let cmp = arg(args, 0);
    let sorted = merge_sort(items, &mut |a: &Value, b: &Value| -> ScriptResult<Ordering> {
        if a.is_nullish() || b.is_nullish() {
            return Ok(match (matches!(a, Value::Undefined), matches!(b, Value::Undefined)) {
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                _ => Ordering::Equal,
            });
        }
        if cmp.is_callable() {
            let n = interp.call(&cmp, &[a.clone(), b.clone()])?.to_number();
            Ok(n.partial_cmp(&0.0).unwrap_or(Ordering::Equal))
        } else {
            Ok(a.to_js_string().cmp(&b.to_js_string()))
        }
    })?;
    replace_items(this, sorted);
    Ok(this.clone())
}

/// Stable merge sort with a fallible comparator that need not be a total order.
fn merge_sort(
    mut items: Vec<Value>,
    cmp: &mut dyn FnMut(&Value, &Value) -> ScriptResult<Ordering>,
) -> ScriptResult<Vec<Value>> {
    if items.len() <= 1 {
        return Ok(items);
    }
    let right = items.split_off(items.len() / 2);
    let left = merge_sort(items, cmp)?;
    let right = merge_sort(right, cmp)?;
    let mut out = Vec::with_capacity(left.len() + right.len());
    let mut l = left.into_iter().peekable();
    let mut r = right.into_iter().peekable();
    while let (Some(a), Some(b)) = (l.peek(), r.peek()) {
        if cmp(a, b)? == Ordering::Greater {
            out.extend(r.next());
        } else {
            out.extend(l.next());
        }
    }
    out.extend(l);
    out.extend(r);
    Ok(out)
}

fn same_value_zero(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) if x.is_nan() && y.is_nan() => true,
        _ => a.strict_eq(b),
    }
}

fn array_includes(_: &mut Interpreter, this: &Value, args: &[Value]) -> ScriptResult<Value> {
    let needle = arg(args, 0);
    Ok(Value::Bool(
        this_items(this)?.iter().any(|v| same_value_zero(v, &needle)),
    ))
}

fn array_index_of(_: &mut Interpreter, this: &Value, args: &[Value]) -> ScriptResult<Value> {
    let needle = arg(args, 0);
    let items = this_items(this)?;
    let from = relative_index(args.get(1), items.len(), 0);
    Ok(Value::Number(
        items
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, v)| v.strict_eq(&needle))
            .map_or(-1.0, |(i, _)| i as f64),
    ))
}

fn array_last_index_of(_: &mut Interpreter, this: &Value, args: &[Value]) -> ScriptResult<Value> {
    let needle = arg(args, 0);
    Ok(Value::Number(
        this_items(this)?
            .iter()
            .rposition(|v| v.strict_eq(&needle))
            .map_or(-1.0, |i| i as f64),
    ))
}

fn array_join(_: &mut Interpreter, this: &Value, args: &[Value]) -> ScriptResult<Value> {
    let sep = match arg(args, 0) {
        Value::Undefined => ",".to_owned(),
        v => v.to_js_string(),
    };
    let parts: Vec<String> = this_items(this)?
        .iter()
        .map(|v| {
            if v.is_nullish() {
                String::new()
            } else {
                v.to_js_string()
            }
        })
        .collect();
    Ok(Value::str(parts.join(&sep)))
}

fn array_slice(_: &mut Interpreter, this: &Value, args: &[Value]) -> ScriptResult<Value> {
    let items = this_items(this)?;
    let start = relative_index(args.first(), items.len(), 0);
    let end = relative_index(args.get(1), items.len(), items.len());
    Ok(Value::array(
        items.get(start..end.max(start)).unwrap_or_default().to_vec(),
    ))
}

fn array_concat(_: &mut Interpreter, this: &Value, args: &[Value]) -> ScriptResult<Value> {
    let mut items = this_items(this)?;
    for a in args {
        match a {
            Value::Array(inner) => items.extend(inner.borrow().iter().cloned()),
            other => items.push(other.clone()),
        }
        array_length(items.len() as f64)?;
    }
    Ok(Value::array(items))
}

fn array_reverse(_: &mut Interpreter, this: &Value, _: &[Value]) -> ScriptResult<Value> {
    let mut items = this_items(this)?;
    items.reverse();
    replace_items(this, items);
    Ok(this.clone())
}

fn array_push(_: &mut Interpreter, this: &Value, args: &[Value]) -> ScriptResult<Value> {
    let mut items = this_items(this)?;
    items.extend(args.iter().cloned());
    let len = items.len();
    replace_items(this, items);
    Ok(Value::Number(len as f64))
}

fn array_pop(_: &mut Interpreter, this: &Value, _: &[Value]) -> ScriptResult<Value> {
    let mut items = this_items(this)?;
    let last = items.pop().unwrap_or_default();
    replace_items(this, items);
    Ok(last)
}

fn array_shift(_: &mut Interpreter, this: &Value, _: &[Value]) -> ScriptResult<Value> {
    let mut items = this_items(this)?;
    if items.is_empty() {
        return Ok(Value::Undefined);
    }
    let first = items.remove(0);
    replace_items(this, items);
    Ok(first)
}

fn array_unshift(_: &mut Interpreter, this: &Value, args: &[Value]) -> ScriptResult<Value> {
    let mut items = args.to_vec();
    items.extend(this_items(this)?);
    let len = items.len();
    replace_items(this, items);
    Ok(Value::Number(len as f64))
}

fn array_splice(_: &mut Interpreter, this: &Value, args: &[Value]) -> ScriptResult<Value> {
    let mut items = this_items(this)?;
    let start = relative_index(args.first(), items.len(), 0);
    let delete = match args.get(1) {
        None => items.len() - start,
        Some(v) => (to_integer(v.to_number()).max(0.0) as usize).min(items.len() - start),
    };
    let removed: Vec<Value> = items
        .splice(start..start + delete, args.iter().skip(2).cloned())
        .collect();
    replace_items(this, items);
    Ok(Value::array(removed))
}

fn array_fill(_: &mut Interpreter, this: &Value, args: &[Value]) -> ScriptResult<Value> {
    let mut items = this_items(this)?;
    let value = arg(args, 0);
    let start = relative_index(args.get(1), items.len(), 0);
    let end = relative_index(args.get(2), items.len(), items.len());
    for slot in items.iter_mut().take(end).skip(start) {
        *slot = value.clone();
    }
    replace_items(this, items);
    Ok(this.clone())
}

fn flatten(items: Vec<Value>, depth: f64, out: &mut Vec<Value>) {
    for item in items {
        match item {
            Value::Array(inner) if depth >= 1.0 => {
                let inner = inner.borrow().clone();
                flatten(inner, depth - 1.0, out);
            }
            other => out.push(other),
        }
    }
}

fn array_flat(_: &mut Interpreter, this: &Value, args: &[Value]) -> ScriptResult<Value> {
    let depth = match arg(args, 0) {
        Value::Undefined => 1.0,
        v => to_integer(v.to_number()),
    };
    let mut out = Vec::new();
    flatten(this_items(this)?, depth, &mut out);
    Ok(Value::array(out))
}

fn array_at(_: &mut Interpreter, this: &Value, args: &[Value]) -> ScriptResult<Value> {
    let items = this_items(this)?;
    let i = to_integer(num(args, 0));
    let idx = if i < 0.0 { items.len() as f64 + i } else { i };
    if idx < 0.0 {
        return Ok(Value::Undefined);
    }
    Ok(items.get(idx as usize).cloned().unwrap_or_default())
}

fn array_keys(_: &mut Interpreter, this: &Value, _: &[Value]) -> ScriptResult<Value> {
    let len = this_items(this)?.len();
    Ok(Value::array(
        (0..len).map(|i| Value::Number(i as f64)).collect(),
    ))
}

fn array_entries(_: &mut Interpreter, this: &Value, _: &[Value]) -> ScriptResult<Value> {
    Ok(Value::array(
        this_items(this)?
            .into_iter()
            .enumerate()
            .map(|(i, v)| Value::array(vec![Value::Number(i as f64), v]))
            .collect(),
    ))
}

// ---- String ----

fn this_str(this: &Value) -> String {
    this.to_js_string()
}

/// Char index of byte offset `byte` in `s`.
fn char_index(s: &str, byte: usize) -> usize {
    s[..byte].chars().count()
}

fn char_slice(s: &str, start: usize, end: usize) -> String {
    s.chars().skip(start).take(end.saturating_sub(start)).collect()
}

fn string_method(key: &str) -> Option<(&'static str, NativeCall)> {
    Some(match key {
        "toUpperCase" => ("toUpperCase", |_, this, _| {
            Ok(Value::str(this_str(this).to_uppercase()))
        }),
        "toLowerCase" => ("toLowerCase", |_, this, _| {
            Ok(Value::str(this_str(this).to_lowercase()))
        }),
        "trim" => ("trim", |_, this, _| Ok(Value::str(this_str(this).trim()))),
        "trimStart" => ("trimStart", |_, this, _| {
            Ok(Value::str(this_str(this).trim_start()))
        }),
        "trimEnd" => ("trimEnd", |_, this, _| {
            Ok(Value::str(this_str(this).trim_end()))
        }),
        "toString" | "valueOf" => ("toString", to_string_method),
        "split" => ("split", string_split),
        "slice" => ("slice", string_slice),
        "substring" => ("substring", string_substring),
        "includes" => ("includes", |_, this, args| {
            Ok(Value::Bool(
                this_str(this).contains(arg(args, 0).to_js_string().as_str()),
            ))
        }),
        "startsWith" => ("startsWith", |_, this, args| {
            Ok(Value::Bool(
                this_str(this).starts_with(arg(args, 0).to_js_string().as_str()),
            ))
        }),
        "endsWith" => ("endsWith", |_, this, args| {
            Ok(Value::Bool(
                this_str(this).ends_with(arg(args, 0).to_js_string().as_str()),
            ))
        }),
        "indexOf" => ("indexOf", |_, this, args| {
            let s = this_str(this);
            Ok(Value::Number(
                s.find(arg(args, 0).to_js_string().as_str())
                    .map_or(-1.0, |b| char_index(&s, b) as f64),
            ))
        }),
        "lastIndexOf" => ("lastIndexOf", |_, this, args| {
            let s = this_str(this);
            Ok(Value::Number(
                s.rfind(arg(args, 0).to_js_string().as_str())
                    .map_or(-1.0, |b| char_index(&s, b) as f64),
            ))
        }),
        "charAt" => ("charAt", |_, this, args| {
            let i = to_integer(num(args, 0)).max(0.0) as usize;
            Ok(Value::str(
                this_str(this).chars().nth(i).map(String::from).unwrap_or_default(),
            ))
        }),
        "charCodeAt" => ("charCodeAt", |_, this, args| {
            let i = to_integer(num(args, 0)).max(0.0) as usize;
            Ok(Value::Number(
                this_str(this)
                    .chars()
                    .nth(i)
                    .map_or(f64::NAN, |c| f64::from(u32::from(c))),
            ))
        }),
        "at" => ("at", |_, this, args| {
            let chars: Vec<char> = this_str(this).chars().collect();
            let i = to_integer(num(args, 0));
            let idx = if i < 0.0 { chars.len() as f64 + i } else { i };
            Ok(if idx < 0.0 {
                Value::Undefined
            } else {
                chars
                    .get(idx as usize)
                    .map_or(Value::Undefined, |c| Value::str(c.to_string()))
            })
        }),
        "padStart" => ("padStart", |_, this, args| pad(this, args, true)),
        "padEnd" => ("padEnd", |_, this, args| pad(this, args, false)),
        "repeat" => ("repeat", |_, this, args| {
            let n = to_integer(num(args, 0));
            if !(0.0..=1e6).contains(&n) {
                return Err(ScriptError::runtime("invalid count value for repeat"));
            }
            Ok(Value::str(this_str(this).repeat(n as usize)))
        }),
        "concat" => ("concat", |_, this, args| {
            let mut s = this_str(this);
            for a in args {
                s.push_str(&a.to_js_string());
            }
            Ok(Value::str(s))
        }),
        "replace" => ("replace", |interp, this, args| {
            string_replace(interp, this, args, false)
        }),
        "replaceAll" => ("replaceAll", |interp, this, args| {
            string_replace(interp, this, args, true)
        }),
        "localeCompare" => ("localeCompare", |_, this, args| {
            let ord = this_str(this).cmp(&arg(args, 0).to_js_string());
            Ok(Value::Number(match ord {
                Ordering::Less => -1.0,
                Ordering::Equal => 0.0,
                Ordering::Greater => 1.0,
            }))
        }),
        "normalize" => ("normalize", to_string_method),
        _ => return None,
    })
}

fn string_split(_: &mut Interpreter, this: &Value, args: &[Value]) -> ScriptResult<Value> {
    let s = this_str(this);
    let limit = match arg(args, 1) {
        Value::Undefined => usize::MAX,
        v => to_integer(v.to_number()).max(0.0) as usize,
    };
    let parts: Vec<Value> = match arg(args, 0) {
        Value::Undefined => vec![Value::str(s)],
        sep => {
            let sep = sep.to_js_string();
            if sep.is_empty() {
                s.chars().map(|c| Value::str(c.to_string())).collect()
            } else {
                s.split(sep.as_str()).map(Value::str).collect()
            }
        }
    };
    Ok(Value::array(parts.into_iter().take(limit).collect()))
}

fn string_slice(_: &mut Interpreter, this: &Value, args: &[Value]) -> ScriptResult<Value> {
    let s = this_str(this);
    let len = s.chars().count();
    let start = relative_index(args.first(), len, 0);
    let end = relative_index(args.get(1), len, len);
    Ok(Value::str(char_slice(&s, start, end)))
}

fn string_substring(_: &mut Interpreter, this: &Value, args: &[Value]) -> ScriptResult<Value> {
    let s = this_str(this);
    let len = s.chars().count() as f64;
    let clamp = |v: Option<&Value>, default: f64| match v {
        None | Some(Value::Undefined) => default,
        Some(v) => to_integer(v.to_number()).clamp(0.0, len),
    };
    let a = clamp(args.first(), 0.0);
    let b = clamp(args.get(1), len);
    Ok(Value::str(char_slice(
        &s,
        a.min(b) as usize,
        a.max(b) as usize,
    )))
}

fn pad(this: &Value, args: &[Value], at_start: bool) -> ScriptResult<Value> {
    let s = this_str(this);
    let target = to_integer(num(args, 0)).max(0.0) as usize;
    let fill = match arg(args, 1) {
        Value::Undefined => " ".to_owned(),
        v => v.to_js_string(),
    };
    let len = s.chars().count();
    if target <= len || fill.is_empty() {
        return Ok(Value::str(s));
    }
    let padding: String = fill.chars().cycle().take(target - len).collect();
    Ok(Value::str(if at_start {
        padding + &s
    } else {
        s + &padding
    }))
}

fn string_replace(
    interp: &mut Interpreter,
    this: &Value,
    args: &[Value],
    all: bool,
) -> ScriptResult<Value> {
    let s = this_str(this);
    let pattern = arg(args, 0).to_js_string();
    let replacement = arg(args, 1);
    let mut out = String::with_capacity(s.len());
    let mut last = 0;
    let matches: Vec<usize> = if pattern.is_empty() {
        vec![0]
    } else {
        s.match_indices(pattern.as_str()).map(|(i, _)| i).collect()
    };
    for at in matches.into_iter().take(if all { usize::MAX } else { 1 }) {
        out.push_str(&s[last..at]);
        let piece = if replacement.is_callable() {
            interp
                .call(
                    &replacement,
                    &[
                        Value::str(pattern.as_str()),
                        Value::Number(char_index(&s, at) as f64),
                        Value::str(s.as_str()),
                    ],
                )?
                .to_js_string()
        } else {
            replacement.to_js_string().replace("$&", &pattern)
        };
        out.push_str(&piece);
        last = at + pattern.len();
    }
    out.push_str(&s[last..]);
    Ok(Value::str(out))
}

fn string_from_char_code(_: &mut Interpreter, _: &Value, args: &[Value]) -> ScriptResult<Value> {
    Ok(Value::str(
        args.iter()
            .map(|v| char::from_u32(v.to_number() as u32).unwrap_or('\u{fffd}'))
            .collect::<String>(),
    ))
}

// ---- Number ----

fn number_method(key: &str) -> Option<(&'static str, NativeCall)> {
    Some(match key {
        "toFixed" => ("toFixed", |_, this, args| {
            let digits = to_integer(arg(args, 0).to_number());
            if !(0.0..=100.0).contains(&digits) {
                return Err(ScriptError::runtime("toFixed() digits out of range"));
            }
            Ok(Value::str(to_fixed(this.to_number(), digits as usize)))
        }),
        "toString" => ("toString", |_, this, args| {
            let radix = match arg(args, 0) {
                Value::Undefined => 10,
                v => to_integer(v.to_number()) as u32,
            };
            if !(2..=36).contains(&radix) {
                return Err(ScriptError::runtime("toString() radix must be between 2 and 36"));
            }
            Ok(Value::str(to_radix_string(this.to_number(), radix)))
        }),
        "toPrecision" => ("toPrecision", |_, this, args| {
            let x = this.to_number();
            match arg(args, 0) {
                Value::Undefined => Ok(Value::str(number_to_string(x))),
                p => Ok(Value::str(to_precision(x, to_integer(p.to_number()).clamp(1.0, 100.0) as usize))),
            }
        }),
        "toLocaleString" => ("toLocaleString", |_, this, args| {
            let opts = arg(args, 1);
            let digit_opt = |name: &str| -> ScriptResult<Option<usize>> {
                if !matches!(opts, Value::Object(_)) {
                    return Ok(None);
                }
                Ok(match get_member(&opts, name)? {
                    Value::Undefined => None,
                    v => Some(to_integer(v.to_number()).clamp(0.0, 20.0) as usize),
                })
            };
            let min = digit_opt("minimumFractionDigits")?.unwrap_or(0);
            let max = digit_opt("maximumFractionDigits")?.unwrap_or(min.max(3)).max(min);
            Ok(Value::str(to_locale_string(this.to_number(), min, max)))
        }),
        "valueOf" => ("valueOf", |_, this, _| Ok(this.clone())),
        _ => return None,
    })
}

/// `Number.prototype.toFixed`: exact midpoints round away from zero.
pub(crate) fn to_fixed(x: f64, digits: usize) -> String {
    if !x.is_finite() || x.abs() >= 1e21 {
        return number_to_string(x);
    }
    let scale = 10f64.powi(digits as i32);
    let scaled = x.abs() * scale;
    if scaled.fract() == 0.5 && scaled / scale == x.abs() && scaled < 9e15 {
        let n = scaled.ceil() as u64;
        let text = format!("{n:0width$}", width = digits + 1);
        let (int, frac) = text.split_at(text.len() - digits);
        let sign = if x < 0.0 { "-" } else { "" };
        return if digits == 0 {
            format!("{sign}{int}")
        } else {
            format!("{sign}{int}.{frac}")
        };
    }
    format!("{x:.digits$}")
}

fn to_precision(x: f64, precision: usize) -> String {
    if !x.is_finite() || x == 0.0 {
        return if x == 0.0 {
            to_fixed(0.0, precision - 1)
        } else {
            number_to_string(x)
        };
    }
    let exponent = x.abs().log10().floor() as i32;
    if exponent < -6 || exponent >= precision as i32 {
        let s = format!("{x:.prec$e}", prec = precision - 1);
        return match s.split_once('e') {
            Some((m, e)) if !e.starts_with('-') => format!("{m}e+{e}"),
            _ => s,
        };
    }
    let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
    to_fixed(x, decimals)
}

fn to_radix_string(x: f64, radix: u32) -> String {
    if radix == 10 || !x.is_finite() || x.fract() != 0.0 || x.abs() > 9e15 {
        return number_to_string(x);
    }
    let mut n = x.abs() as u64;
    if n == 0 {
        return "0".to_owned();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(std::char::from_digit((n % u64::from(radix)) as u32, radix).unwrap_or('0'));
        n /= u64::from(radix);
    }
    if x < 0.0 {
        digits.push('-');
    }
    digits.iter().rev().collect()
}

/// en-US grouping with a fraction digit window, like `Intl.NumberFormat`.
pub(crate) fn to_locale_string(x: f64, min_frac: usize, max_frac: usize) -> String {
    if x.is_nan() {
        return "NaN".to_owned();
    }
    if x.is_infinite() {
        return if x > 0.0 { "∞" } else { "-∞" }.to_owned();
    }
    let fixed = to_fixed(x.abs(), max_frac);
    let (int, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let mut frac = frac.trim_end_matches('0').to_owned();
    while frac.len() < min_frac {
        frac.push('0');
    }
    let mut grouped = String::with_capacity(int.len() + int.len() / 3);
    for (i, c) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let zero = int.chars().all(|c| c == '0') && frac.chars().all(|c| c == '0');
    let sign = if x < 0.0 && !zero { "-" } else { "" };
    if frac.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac}")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/script/builtins.rs"]
mod tests;
