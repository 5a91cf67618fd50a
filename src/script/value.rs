use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use serde_json::Value as Json;

use crate::script::ast::Function;
use crate::script::error::{ScriptError, ScriptResult};
use crate::script::interp::{Interpreter, ScopeRef};

pub(crate) type PropMap = IndexMap<String, Value>;

/// Host function. The second argument is the bound receiver (`Undefined` for free functions).
pub(crate) type NativeCall = fn(&mut Interpreter, &Value, &[Value]) -> ScriptResult<Value>;

#[derive(Debug, Clone, Default)]
pub(crate) enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(Rc<str>),
    Array(Rc<RefCell<Vec<Value>>>),
    Object(Rc<RefCell<PropMap>>),
    Function(Rc<Closure>),
    Native(Rc<NativeFn>),
    Primitive(Primitive),
    Element(Rc<Element>),
}

#[derive(Debug)]
pub(crate) struct Closure {
    pub(crate) func: Rc<Function>,
    pub(crate) env: ScopeRef,
}

#[derive(Debug)]
pub(crate) struct NativeFn {
    pub(crate) name: &'static str,
    pub(crate) this: Value,
    pub(crate) call: NativeCall,
}

/// Host-rendered building blocks that components compose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Primitive {
    AbsoluteFill,
    Sequence,
    Img,
    Fragment,
}

impl Primitive {
    pub(crate) fn name(self) -> &'static str {
        match self {
            Self::AbsoluteFill => "AbsoluteFill",
            Self::Sequence => "Sequence",
            Self::Img => "Img",
            Self::Fragment => "Fragment",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum ElementKind {
    Intrinsic(String),
    Fragment,
    Primitive(Primitive),
    Component(Value),
}

impl ElementKind {
    /// Element type from a runtime value, as `createElement` and JSX component tags see it.
    pub(crate) fn from_value(value: &Value) -> ScriptResult<Self> {
        match value {
            Value::String(tag) => Ok(Self::Intrinsic(tag.to_string())),
            Value::Primitive(Primitive::Fragment) => Ok(Self::Fragment),
            Value::Primitive(p) => Ok(Self::Primitive(*p)),
            Value::Function(_) | Value::Native(_) => Ok(Self::Component(value.clone())),
            other => Err(ScriptError::runtime(format!(
                "element type is invalid: expected a string or a component but got {}",
                other.type_of()
            ))),
        }
    }
}

#[derive(Debug)]
pub(crate) struct Element {
    pub(crate) kind: ElementKind,
    pub(crate) props: PropMap,
    pub(crate) children: Vec<Value>,
}

impl Value {
    pub(crate) fn str(s: impl Into<Rc<str>>) -> Self {
        Self::String(s.into())
    }

    pub(crate) fn array(items: Vec<Value>) -> Self {
        Self::Array(Rc::new(RefCell::new(items)))
    }

    pub(crate) fn object(props: PropMap) -> Self {
        Self::Object(Rc::new(RefCell::new(props)))
    }

    pub(crate) fn native(name: &'static str, this: Value, call: NativeCall) -> Self {
        Self::Native(Rc::new(NativeFn { name, this, call }))
    }

    pub(crate) fn is_nullish(&self) -> bool {
        matches!(self, Self::Undefined | Self::Null)
    }

    pub(crate) fn is_callable(&self) -> bool {
        matches!(self, Self::Function(_) | Self::Native(_))
    }

    pub(crate) fn truthy(&self) -> bool {
        match self {
            Self::Undefined | Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::String(s) => !s.is_empty(),
            _ => true,
        }
    }

    pub(crate) fn type_of(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "object",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Function(_) | Self::Native(_) => "function",
            Self::Primitive(Primitive::Fragment) => "symbol",
            Self::Primitive(_) => "function",
            Self::Array(_) | Self::Object(_) | Self::Element(_) => "object",
        }
    }

    pub(crate) fn to_number(&self) -> f64 {
        match self {
            Self::Undefined => f64::NAN,
            Self::Null => 0.0,
            Self::Bool(b) => f64::from(u8::from(*b)),
            Self::Number(n) => *n,
            Self::String(s) => string_to_number(s),
            Self::Array(_) => string_to_number(&self.to_js_string()),
            _ => f64::NAN,
        }
    }

    pub(crate) fn to_js_string(&self) -> String {
        match self {
            Self::Undefined => "undefined".to_owned(),
            Self::Null => "null".to_owned(),
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => number_to_string(*n),
            Self::String(s) => s.to_string(),
            Self::Array(items) => items
                .borrow()
                .iter()
                .map(|v| {
                    if v.is_nullish() {
                        String::new()
                    } else {
                        v.to_js_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(","),
            Self::Function(c) => format!(
                "function {}() {{ [code] }}",
                c.func.name.as_deref().unwrap_or("")
            ),
            Self::Native(n) => format!("function {}() {{ [native code] }}", n.name),
            Self::Primitive(p) => p.name().to_owned(),
            Self::Object(_) | Self::Element(_) => "[object Object]".to_owned(),
        }
    }

    /// `ToPrimitive` with the default hint: compound values become their string form.
    pub(crate) fn to_primitive(&self) -> Value {
        match self {
            Self::Array(_)
            | Self::Object(_)
            | Self::Element(_)
            | Self::Function(_)
            | Self::Native(_)
            | Self::Primitive(_) => Value::str(self.to_js_string()),
            other => other.clone(),
        }
    }

    pub(crate) fn to_property_key(&self) -> String {
        match self {
            Self::String(s) => s.to_string(),
            other => other.to_js_string(),
        }
    }

    pub(crate) fn strict_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => Rc::ptr_eq(a, b),
            (Self::Object(a), Self::Object(b)) => Rc::ptr_eq(a, b),
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            (Self::Native(a), Self::Native(b)) => {
                Rc::ptr_eq(a, b) || (a.name == b.name && a.this.strict_eq(&b.this))
            }
            (Self::Primitive(a), Self::Primitive(b)) => a == b,
            (Self::Element(a), Self::Element(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub(crate) fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (a, b) if a.is_nullish() && b.is_nullish() => true,
            (a, b) if a.is_nullish() || b.is_nullish() => false,
            (Self::Number(_), Self::String(_)) | (Self::String(_), Self::Number(_)) => {
                self.to_number() == other.to_number()
            }
            (Self::Bool(_), _) => Value::Number(self.to_number()).loose_eq(other),
            (_, Self::Bool(_)) => self.loose_eq(&Value::Number(other.to_number())),
            (Self::Array(_) | Self::Object(_), Self::Number(_) | Self::String(_)) => {
                self.to_primitive().loose_eq(other)
            }
            (Self::Number(_) | Self::String(_), Self::Array(_) | Self::Object(_)) => {
                self.loose_eq(&other.to_primitive())
            }
            _ => self.strict_eq(other),
        }
    }

    /// JSON view used by `JSON.stringify` and for host props. `None` means "omit".
    pub(crate) fn to_json(&self) -> Option<Json> {
        Some(match self {
            Self::Undefined
            | Self::Function(_)
            | Self::Native(_)
            | Self::Primitive(_)
            | Self::Element(_) => return None,
            Self::Null => Json::Null,
            Self::Bool(b) => Json::Bool(*b),
            Self::Number(n) => number_to_json(*n),
            Self::String(s) => Json::String(s.to_string()),
            Self::Array(items) => Json::Array(
                items
                    .borrow()
                    .iter()
                    .map(|v| v.to_json().unwrap_or(Json::Null))
                    .collect(),
            ),
            Self::Object(map) => Json::Object(
                map.borrow()
                    .iter()
                    .filter_map(|(k, v)| v.to_json().map(|j| (k.clone(), j)))
                    .collect(),
            ),
        })
    }

    pub(crate) fn from_json(json: &Json) -> Value {
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            Json::String(s) => Value::str(s.as_str()),
            Json::Array(items) => Value::array(items.iter().map(Value::from_json).collect()),
            Json::Object(map) => Value::object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::from_json(v)))
                    .collect(),
            ),
        }
    }
}

pub(crate) fn number_to_json(n: f64) -> Json {
    if !n.is_finite() {
        return Json::Null;
    }
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        return Json::from(n as i64);
    }
    serde_json::Number::from_f64(n).map_or(Json::Null, Json::Number)
}

/// `Number.prototype.toString()` for radix 10.
pub(crate) fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_owned();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
    }
    if n == 0.0 {
        return "0".to_owned();
    }
    let abs = n.abs();
    if (1e-6..1e21).contains(&abs) {
        return format!("{n}");
    }
    let s = format!("{n:e}");
    match s.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => s,
    }
}

/// `StringToNumber`: whitespace-trimmed decimal, hex/binary/octal, or `Infinity`.
pub(crate) fn string_to_number(s: &str) -> f64 {
    let t = s.trim();
    if t.is_empty() {
        return 0.0;
    }
    match t {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0b", 2), ("0B", 2), ("0o", 8), ("0O", 8)] {
        if let Some(digits) = t.strip_prefix(prefix) {
            return u64::from_str_radix(digits, radix).map_or(f64::NAN, |v| v as f64);
        }
    }
    if t
        .chars()
        .any(|c| !(c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-')))
    {
        return f64::NAN;
    }
    t.parse().unwrap_or(f64::NAN)
}

/// `ToInt32`.
pub(crate) fn to_int32(n: f64) -> i32 {
    if !n.is_finite() {
        return 0;
    }
    n.trunc().rem_euclid(4_294_967_296.0) as u32 as i32
}

/// `ToIntegerOrInfinity`, used by index arguments.
pub(crate) fn to_integer(n: f64) -> f64 {
    if n.is_nan() { 0.0 } else { n.trunc() }
}

/// Resolve a relative index (`slice(-2)`) against `len`.
pub(crate) fn relative_index(arg: Option<&Value>, len: usize, default: usize) -> usize {
    let Some(v) = arg.filter(|v| !matches!(v, Value::Undefined)) else {
        return default;
    };
    let n = to_integer(v.to_number());
    let len_f = len as f64;
    if n < 0.0 {
        (len_f + n).max(0.0) as usize
    } else {
        n.min(len_f) as usize
    }
}

/// Canonical array index for a property key (`"2"` yes, `"02"` no).
/// Longest array a script may build or grow to.
pub(crate) const MAX_ARRAY_LEN: usize = 1_000_000;

/// `n` as an array length, rejecting negatives, fractions and anything past [`MAX_ARRAY_LEN`].
pub(crate) fn array_length(n: f64) -> ScriptResult<usize> {
    if !(0.0..=MAX_ARRAY_LEN as f64).contains(&n) || n.fract() != 0.0 {
        return Err(ScriptError::runtime("invalid array length"));
    }
    Ok(n as usize)
}

pub(crate) fn array_index(key: &str) -> Option<usize> {
    let idx: usize = key.parse().ok()?;
    (idx.to_string() == key).then_some(idx)
}

#[cfg(test)]
#[path = "../../tests/unit/script/value.rs"]
mod tests;
