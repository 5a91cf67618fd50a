//! Element tree resolution: call components, apply the host primitives, emit [`RenderNode`]s.

use serde_json::{Map, Value as Json, json};

use crate::config::CompositionConfig;
use crate::preview::node::RenderNode;
use crate::script::builtins::children_prop;
use crate::script::value::{number_to_json, number_to_string};
use crate::script::{
    Element, ElementKind, Interpreter, Primitive, PropMap, ScriptError, ScriptResult, Value,
};

const MAX_TREE_DEPTH: usize = 256;

/// Render `component` with no props at the interpreter's current frame, wrapped in a
/// `composition` root carrying the composition facts.
pub(crate) fn render_root(
    interp: &mut Interpreter,
    component: &Value,
    config: &CompositionConfig,
) -> ScriptResult<RenderNode> {
    let mut resolver = Resolver { interp, depth: 0 };
    let mut children = Vec::new();
    let root = Element {
        kind: ElementKind::Component(component.clone()),
        props: PropMap::new(),
        children: Vec::new(),
    };
    resolver.element(&root, &mut children)?;

    let mut props = Map::new();
    props.insert("id".to_owned(), Json::String(config.id.clone()));
    props.insert("width".to_owned(), json!(config.width));
    props.insert("height".to_owned(), json!(config.height));
    props.insert("fps".to_owned(), number_to_json(config.fps.as_f64()));
    props.insert(
        "durationInFrames".to_owned(),
        json!(config.duration_in_frames),
    );
    Ok(RenderNode::element("composition", props, children))
}

struct Resolver<'a> {
    interp: &'a mut Interpreter,
    depth: usize,
}

impl Resolver<'_> {
    fn resolve(&mut self, value: &Value, out: &mut Vec<RenderNode>) -> ScriptResult<()> {
        match value {
            Value::Undefined | Value::Null | Value::Bool(_) => {}
            Value::Number(n) => out.push(RenderNode::text(number_to_string(*n))),
            Value::String(s) => {
                if !s.is_empty() {
                    out.push(RenderNode::text(s.to_string()));
                }
            }
            Value::Array(items) => {
                let items = items.borrow().clone();
                for item in &items {
                    self.resolve(item, out)?;
                }
            }
            Value::Element(el) => self.element(el, out)?,
            Value::Object(_) => {
                return Err(ScriptError::runtime(
                    "objects are not valid as an element child",
                ));
            }
            // Functions and bare component references render nothing.
            Value::Function(_) | Value::Native(_) | Value::Primitive(_) => {}
        }
        Ok(())
    }

    fn element(&mut self, el: &Element, out: &mut Vec<RenderNode>) -> ScriptResult<()> {
        if self.depth >= MAX_TREE_DEPTH {
            return Err(ScriptError::runtime(format!(
                "element tree is nested more than {MAX_TREE_DEPTH} levels deep"
            )));
        }
        self.depth += 1;
        let result = self.element_inner(el, out);
        self.depth -= 1;
        result
    }

    fn element_inner(&mut self, el: &Element, out: &mut Vec<RenderNode>) -> ScriptResult<()> {
        match &el.kind {
            ElementKind::Fragment | ElementKind::Primitive(Primitive::Fragment) => {
                self.children(el, out)
            }
            ElementKind::Intrinsic(tag) => {
                let mut children = Vec::new();
                self.children(el, &mut children)?;
                out.push(RenderNode::element(tag.as_str(), host_props(&el.props), children));
                Ok(())
            }
            ElementKind::Primitive(Primitive::AbsoluteFill) => {
                let mut children = Vec::new();
                self.children(el, &mut children)?;
                let mut props = host_props(&el.props);
                props.insert("style".to_owned(), fill_style(props.get("style")));
                out.push(RenderNode::element("div", props, children));
                Ok(())
            }
            ElementKind::Primitive(Primitive::Sequence) => self.sequence(el, out),
            ElementKind::Primitive(Primitive::Img) => {
                out.push(RenderNode::element("img", host_props(&el.props), Vec::new()));
                Ok(())
            }
            ElementKind::Component(component) => {
                let mut props = el.props.clone();
                if !el.children.is_empty() {
                    props.insert("children".to_owned(), children_prop(&el.children));
                }
                let rendered = self.interp.call(component, &[Value::object(props)])?;
                self.resolve(&rendered, out)
            }
        }
    }

    fn children(&mut self, el: &Element, out: &mut Vec<RenderNode>) -> ScriptResult<()> {
        if el.children.is_empty() {
            return match el.props.get("children") {
                Some(children) => self.resolve(children, out),
                None => Ok(()),
            };
        }
        for child in &el.children {
            self.resolve(child, out)?;
        }
        Ok(())
    }

    /// Time window: the subtree sees frames relative to `from` and renders only while
    /// `from <= frame < from + durationInFrames`.
    fn sequence(&mut self, el: &Element, out: &mut Vec<RenderNode>) -> ScriptResult<()> {
        let from = number_prop(&el.props, "from", 0.0)?;
        let duration = number_prop(&el.props, "durationInFrames", f64::INFINITY)?;
        if duration.is_nan() || duration <= 0.0 {
            return Err(ScriptError::runtime(format!(
                "<Sequence>: durationInFrames must be positive, got {}",
                number_to_string(duration)
            )));
        }

        let frame = self.interp.frame;
        if frame < from || frame >= from + duration {
            return Ok(());
        }
        self.interp.frame = frame - from;
        let mut children = Vec::new();
        let result = self.children(el, &mut children);
        self.interp.frame = frame;
        result?;

        let layout_none =
            matches!(el.props.get("layout"), Some(Value::String(s)) if &**s == "none");
        if layout_none {
            out.extend(children);
        } else {
            let mut props = Map::new();
            let user_style = el.props.get("style").and_then(Value::to_json);
            props.insert("style".to_owned(), fill_style(user_style.as_ref()));
            if let Some(Value::String(name)) = el.props.get("name") {
                props.insert("data-sequence".to_owned(), Json::String(name.to_string()));
            }
            out.push(RenderNode::element("div", props, children));
        }
        Ok(())
    }
}

fn number_prop(props: &PropMap, key: &str, default: f64) -> ScriptResult<f64> {
    match props.get(key) {
        None | Some(Value::Undefined) => Ok(default),
        Some(Value::Number(n)) => Ok(*n),
        Some(other) => Err(ScriptError::runtime(format!(
            "<Sequence>: '{key}' must be a number, got {}",
            other.type_of()
        ))),
    }
}

/// Props as the host sees them: JSON only, with functions, elements and React-internal keys
/// dropped.
fn host_props(props: &PropMap) -> Map<String, Json> {
    props
        .iter()
        .filter(|(k, _)| !matches!(k.as_str(), "children" | "key" | "ref"))
        .filter_map(|(k, v)| v.to_json().map(|j| (k.clone(), j)))
        .collect()
}

/// Full-frame flex column, with `user` style entries taking precedence.
fn fill_style(user: Option<&Json>) -> Json {
    let mut style = Map::new();
    for (k, v) in [
        ("position", json!("absolute")),
        ("top", json!(0)),
        ("left", json!(0)),
        ("right", json!(0)),
        ("bottom", json!(0)),
        ("width", json!("100%")),
        ("height", json!("100%")),
        ("display", json!("flex")),
        ("flexDirection", json!("column")),
    ] {
        style.insert(k.to_owned(), v);
    }
    if let Some(Json::Object(user)) = user {
        for (k, v) in user {
            style.insert(k.clone(), v.clone());
        }
    }
    Json::Object(style)
}

#[cfg(test)]
#[path = "../../tests/unit/preview/resolve.rs"]
mod tests;
