//! The fixed set of names a generated component may use, in the order the factory binds them.
//!
//! Nothing else from the host is reachable from component code: no module loading, no
//! filesystem, no network. The script globals (`Math`, `JSON`, array and string
//! methods) are language built-ins, not capabilities.

mod interpolate;
mod spring;

pub use interpolate::{Extrapolate, InterpolateOptions, interpolate};
pub use spring::{DEFAULT_REST_THRESHOLD, Spring, SpringConfig, measure_spring, step_response};

use std::rc::Rc;

use interpolate::InterpolateError;

use crate::script::builtins::get_member;
use crate::script::error::{ScriptError, ScriptResult};
use crate::script::interp::{Interpreter, describe};
use crate::script::value::{Element, ElementKind, NativeCall, Primitive, PropMap, Value};

/// Factory parameter names, in binding order.
pub const CAPABILITY_NAMES: [&str; 8] = [
    "React",
    "AbsoluteFill",
    "useCurrentFrame",
    "useVideoConfig",
    "spring",
    "interpolate",
    "Sequence",
    "Img",
];

/// Runtime values for [`CAPABILITY_NAMES`], index for index.
pub(crate) fn capability_values() -> [Value; 8] {
    [
        react_namespace(),
        Value::Primitive(Primitive::AbsoluteFill),
        Value::native("useCurrentFrame", Value::Undefined, use_current_frame),
        Value::native("useVideoConfig", Value::Undefined, use_video_config),
        Value::native("spring", Value::Undefined, spring_fn),
        Value::native("interpolate", Value::Undefined, interpolate_fn),
        Value::Primitive(Primitive::Sequence),
        Value::Primitive(Primitive::Img),
    ]
}

fn react_namespace() -> Value {
    let natives: [(&'static str, NativeCall); 10] = [
        ("createElement", create_element),
        ("useMemo", use_memo),
        ("useCallback", identity),
        ("useState", use_state),
        ("useRef", use_ref),
        ("useEffect", noop),
        ("useLayoutEffect", noop),
        ("memo", identity),
        ("isValidElement", is_valid_element),
        ("cloneElement", clone_element),
    ];
    let mut map: PropMap = natives
        .into_iter()
        .map(|(name, call)| (name.to_owned(), Value::native(name, Value::Undefined, call)))
        .collect();
    map.insert("Fragment".to_owned(), Value::Primitive(Primitive::Fragment));
    Value::object(map)
}

fn arg(args: &[Value], i: usize) -> Value {
    args.get(i).cloned().unwrap_or_default()
}

// ---- React ----

fn create_element(_: &mut Interpreter, _: &Value, args: &[Value]) -> ScriptResult<Value> {
    let kind = ElementKind::from_value(&arg(args, 0))
        .map_err(|e| ScriptError::runtime(format!("React.createElement: {}", e.message)))?;
    let mut props = match arg(args, 1) {
        Value::Object(map) => map.borrow().clone(),
        Value::Undefined | Value::Null => PropMap::new(),
        other => {
            return Err(ScriptError::runtime(format!(
                "React.createElement: props must be an object, got {}",
                describe(&other)
            )));
        }
    };
    let mut children = args.get(2..).unwrap_or_default().to_vec();
    if children.is_empty() {
        if let Some(from_props) = props.shift_remove("children") {
            children.push(from_props);
        }
    } else {
        props.shift_remove("children");
    }
    Ok(Value::Element(Rc::new(Element {
        kind,
        props,
        children,
    })))
}

fn clone_element(_: &mut Interpreter, _: &Value, args: &[Value]) -> ScriptResult<Value> {
    let Value::Element(source) = arg(args, 0) else {
        return Err(ScriptError::runtime(
            "React.cloneElement: argument must be an element",
        ));
    };
    let mut props = source.props.clone();
    if let Value::Object(extra) = arg(args, 1) {
        for (k, v) in extra.borrow().iter() {
            props.insert(k.clone(), v.clone());
        }
    }
    let children = match args.get(2..) {
        Some(rest) if !rest.is_empty() => rest.to_vec(),
        _ => source.children.clone(),
    };
    Ok(Value::Element(Rc::new(Element {
        kind: source.kind.clone(),
        props,
        children,
    })))
}

fn is_valid_element(_: &mut Interpreter, _: &Value, args: &[Value]) -> ScriptResult<Value> {
    Ok(Value::Bool(matches!(arg(args, 0), Value::Element(_))))
}

fn use_memo(interp: &mut Interpreter, _: &Value, args: &[Value]) -> ScriptResult<Value> {
    interp.call(&arg(args, 0), &[])
}

fn identity(_: &mut Interpreter, _: &Value, args: &[Value]) -> ScriptResult<Value> {
    Ok(arg(args, 0))
}

fn noop(_: &mut Interpreter, _: &Value, _: &[Value]) -> ScriptResult<Value> {
    Ok(Value::Undefined)
}

/// Rendering is a pure function of the frame, so state never changes: the setter is inert.
fn use_state(interp: &mut Interpreter, _: &Value, args: &[Value]) -> ScriptResult<Value> {
    let initial = arg(args, 0);
    let value = if initial.is_callable() {
        interp.call(&initial, &[])?
    } else {
        initial
    };
    Ok(Value::array(vec![
        value,
        Value::native("setState", Value::Undefined, noop),
    ]))
}

fn use_ref(_: &mut Interpreter, _: &Value, args: &[Value]) -> ScriptResult<Value> {
    let mut map = PropMap::new();
    map.insert("current".to_owned(), arg(args, 0));
    Ok(Value::object(map))
}

// ---- video hooks ----

fn use_current_frame(interp: &mut Interpreter, _: &Value, _: &[Value]) -> ScriptResult<Value> {
    Ok(Value::Number(interp.frame))
}

fn use_video_config(interp: &mut Interpreter, _: &Value, _: &[Value]) -> ScriptResult<Value> {
    let video = &interp.video;
    let mut map = PropMap::new();
    map.insert("id".to_owned(), Value::str(video.id.as_str()));
    map.insert("width".to_owned(), Value::Number(f64::from(video.width)));
    map.insert("height".to_owned(), Value::Number(f64::from(video.height)));
    map.insert("fps".to_owned(), Value::Number(video.fps));
    map.insert(
        "durationInFrames".to_owned(),
        Value::Number(video.duration_in_frames as f64),
    );
    map.insert("defaultProps".to_owned(), Value::object(PropMap::new()));
    map.insert("props".to_owned(), Value::object(PropMap::new()));
    Ok(Value::object(map))
}

// ---- spring / interpolate ----

/// Optional numeric field of an options object.
fn field_number(obj: &Value, key: &str, ctx: &str) -> ScriptResult<Option<f64>> {
    match get_member(obj, key)? {
        Value::Undefined => Ok(None),
        Value::Number(n) => Ok(Some(n)),
        other => Err(ScriptError::runtime(format!(
            "{ctx}: '{key}' must be a number, got {}",
            describe(&other)
        ))),
    }
}

fn spring_fn(_: &mut Interpreter, _: &Value, args: &[Value]) -> ScriptResult<Value> {
    const CTX: &str = "spring()";
    let opts = arg(args, 0);
    if !matches!(opts, Value::Object(_)) {
        return Err(ScriptError::runtime(
            "spring() expects an options object with 'frame' and 'fps'",
        ));
    }
    let frame = field_number(&opts, "frame", CTX)?
        .filter(|f| !f.is_nan())
        .ok_or_else(|| ScriptError::runtime("spring(): 'frame' must be a number"))?;
    let fps = field_number(&opts, "fps", CTX)?
        .filter(|f| f.is_finite() && *f > 0.0)
        .ok_or_else(|| ScriptError::runtime("spring(): 'fps' must be a positive number"))?;

    let mut spring = Spring::new(frame, fps);
    let config = get_member(&opts, "config")?;
    if matches!(config, Value::Object(_)) {
        const CFG: &str = "spring() config";
        if let Some(d) = field_number(&config, "damping", CFG)? {
            spring.config.damping = d;
        }
        if let Some(m) = field_number(&config, "mass", CFG)? {
            if m <= 0.0 {
                return Err(ScriptError::runtime("spring(): mass must be greater than 0"));
            }
            spring.config.mass = m;
        }
        if let Some(s) = field_number(&config, "stiffness", CFG)? {
            spring.config.stiffness = s;
        }
        spring.config.overshoot_clamping = get_member(&config, "overshootClamping")?.truthy();
    }
    if let Some(from) = field_number(&opts, "from", CTX)? {
        spring.from = from;
    }
    if let Some(to) = field_number(&opts, "to", CTX)? {
        spring.to = to;
    }
    if let Some(delay) = field_number(&opts, "delay", CTX)? {
        spring.delay = delay;
    }
    if let Some(duration) = field_number(&opts, "durationInFrames", CTX)? {
        if duration.is_nan() || duration <= 0.0 {
            return Err(ScriptError::runtime(
                "spring(): 'durationInFrames' must be positive",
            ));
        }
        spring.duration_in_frames = Some(duration);
    }
    spring.reverse = get_member(&opts, "reverse")?.truthy();
    Ok(Value::Number(spring.value()))
}

fn number_list(value: &Value, name: &str) -> ScriptResult<Vec<f64>> {
    let Value::Array(items) = value else {
        return Err(ScriptError::runtime(format!(
            "interpolate(): {name} must be an array, got {}",
            describe(value)
        )));
    };
    items
        .borrow()
        .iter()
        .map(|v| match v {
            Value::Number(n) => Ok(*n),
            other => Err(ScriptError::runtime(format!(
                "interpolate(): {name} must contain only numbers, got {}",
                describe(other)
            ))),
        })
        .collect()
}

fn extrapolation(options: &Value, key: &str) -> ScriptResult<Extrapolate> {
    match get_member(options, key)? {
        Value::Undefined => Ok(Extrapolate::default()),
        Value::String(s) => s
            .parse()
            .map_err(|e: String| ScriptError::runtime(format!("interpolate(): {key}: {e}"))),
        other => Err(ScriptError::runtime(format!(
            "interpolate(): {key} must be a string, got {}",
            describe(&other)
        ))),
    }
}

fn interpolate_fn(interp: &mut Interpreter, _: &Value, args: &[Value]) -> ScriptResult<Value> {
    let input = match arg(args, 0) {
        Value::Number(n) => n,
        Value::Undefined => {
            return Err(ScriptError::runtime(
                "interpolate(): input can not be undefined",
            ));
        }
        other => {
            return Err(ScriptError::runtime(format!(
                "interpolate(): cannot interpolate an input which is not a number (got {})",
                describe(&other)
            )));
        }
    };
    let input_range = number_list(&arg(args, 1), "inputRange")?;
    let output_range = number_list(&arg(args, 2), "outputRange")?;

    let mut options = InterpolateOptions::default();
    let mut easing = Value::Undefined;
    let raw = arg(args, 3);
    match &raw {
        Value::Object(_) => {
            options.extrapolate_left = extrapolation(&raw, "extrapolateLeft")?;
            options.extrapolate_right = extrapolation(&raw, "extrapolateRight")?;
            easing = get_member(&raw, "easing")?;
            if !easing.is_nullish() && !easing.is_callable() {
                return Err(ScriptError::runtime("interpolate(): easing must be a function"));
            }
        }
        Value::Undefined | Value::Null => {}
        other => {
            return Err(ScriptError::runtime(format!(
                "interpolate(): options must be an object, got {}",
                describe(other)
            )));
        }
    }

    let mut ease = |t: f64| -> ScriptResult<f64> {
        if easing.is_callable() {
            Ok(interp.call(&easing, &[Value::Number(t)])?.to_number())
        } else {
            Ok(t)
        }
    };
    interpolate::interpolate_eased(input, &input_range, &output_range, options, &mut ease)
        .map(Value::Number)
        .map_err(|e| match e {
            InterpolateError::Range(msg) => ScriptError::runtime(format!("interpolate(): {msg}")),
            InterpolateError::Easing(err) => err,
        })
}

#[cfg(test)]
#[path = "../../tests/unit/capabilities/mod.rs"]
mod tests;
