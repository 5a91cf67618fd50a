//! Tree-walking evaluator.
//!
//! Scopes live in an arena owned by the interpreter. Everything created while a
//! program is instantiated is kept; scopes created while rendering a frame are
//! discarded when the frame ends, so closures never form reference cycles.

use std::rc::Rc;

use crate::script::ast::{
    AssignOp, BinaryOp, DeclKind, Expr, FuncBody, Function, JsxAttr, JsxChild, JsxElement,
    JsxName, ListItem, LogicalOp, MemberProp, ObjectItem, Pattern, Program, PropKey, Stmt,
    UnaryOp,
};
use crate::script::builtins;
use crate::script::error::{ScriptError, ScriptResult};
use crate::script::value::{
    Closure, Element, ElementKind, PropMap, Value, array_index, array_length, number_to_string,
    to_int32,
};

/// Default per-frame evaluation budget, in statements plus expressions.
pub(crate) const DEFAULT_STEP_LIMIT: u64 = 2_000_000;
const MAX_CALL_DEPTH: usize = 64;
const RANDOM_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScopeRef {
    index: usize,
    epoch: u64,
}

#[derive(Debug)]
struct Binding {
    name: String,
    value: Value,
    mutable: bool,
}

#[derive(Debug)]
struct Scope {
    vars: Vec<Binding>,
    parent: Option<ScopeRef>,
}

enum Flow {
    Normal,
    Return(Value),
    Break,
    Continue,
}

/// Composition facts the video hooks expose.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct VideoInfo {
    pub(crate) id: String,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) fps: f64,
    pub(crate) duration_in_frames: u64,
}

pub(crate) struct Interpreter {
    scopes: Vec<Scope>,
    persistent: usize,
    epoch: u64,
    closures: u64,
    steps: u64,
    step_limit: u64,
    depth: usize,
    rng: u64,
    /// Frame seen by `useCurrentFrame`; shifted inside sequences.
    pub(crate) frame: f64,
    pub(crate) video: VideoInfo,
}

impl Interpreter {
    pub(crate) fn new(video: VideoInfo) -> Self {
        let mut interp = Self {
            scopes: vec![Scope {
                vars: Vec::new(),
                parent: None,
            }],
            persistent: 1,
            epoch: 0,
            closures: 0,
            steps: 0,
            step_limit: DEFAULT_STEP_LIMIT,
            depth: 0,
            rng: RANDOM_SEED,
            frame: 0.0,
            video,
        };
        builtins::install(&mut interp);
        interp
    }

    pub(crate) fn global(&self) -> ScopeRef {
        ScopeRef { index: 0, epoch: 0 }
    }

    pub(crate) fn set_step_limit(&mut self, limit: u64) {
        self.step_limit = limit;
    }

    // ---- scopes ----

    pub(crate) fn push_scope(&mut self, parent: ScopeRef) -> ScopeRef {
        let scope = ScopeRef {
            index: self.scopes.len(),
            epoch: self.epoch,
        };
        self.scopes.push(Scope {
            vars: Vec::new(),
            parent: Some(parent),
        });
        scope
    }

    /// Drop `scope` again if it is the newest one and nothing captured it.
    fn pop_scope(&mut self, scope: ScopeRef, closure_mark: u64) {
        if self.closures == closure_mark
            && scope.index + 1 == self.scopes.len()
            && scope.index >= self.persistent
        {
            self.scopes.pop();
        }
    }

    fn check_live(&self, scope: ScopeRef) -> ScriptResult<()> {
        let live = scope.index < self.persistent
            || (scope.epoch == self.epoch && scope.index < self.scopes.len());
        if live {
            Ok(())
        } else {
            Err(ScriptError::runtime(
                "a function created during an earlier frame was called after that frame ended",
            ))
        }
    }

    pub(crate) fn declare(&mut self, scope: ScopeRef, name: &str, value: Value, mutable: bool) {
        let vars = &mut self.scopes[scope.index].vars;
        if let Some(b) = vars.iter_mut().find(|b| b.name == name) {
            b.value = value;
            b.mutable = mutable;
        } else {
            vars.push(Binding {
                name: name.to_owned(),
                value,
                mutable,
            });
        }
    }

    fn find(&self, scope: ScopeRef, name: &str) -> Option<(usize, usize)> {
        let mut cur = Some(scope);
        while let Some(s) = cur {
            let sc = &self.scopes[s.index];
            if let Some(i) = sc.vars.iter().position(|b| b.name == name) {
                return Some((s.index, i));
            }
            cur = sc.parent;
        }
        None
    }

    pub(crate) fn lookup(&self, scope: ScopeRef, name: &str) -> ScriptResult<Value> {
        match self.find(scope, name) {
            Some((s, i)) => Ok(self.scopes[s].vars[i].value.clone()),
            None => Err(ScriptError::runtime(format!("{name} is not defined"))),
        }
    }

    fn assign_var(&mut self, scope: ScopeRef, name: &str, value: Value) -> ScriptResult<()> {
        let Some((s, i)) = self.find(scope, name) else {
            return Err(ScriptError::runtime(format!("{name} is not defined")));
        };
        let binding = &mut self.scopes[s].vars[i];
        if !binding.mutable {
            return Err(ScriptError::runtime(format!(
                "assignment to constant variable '{name}'"
            )));
        }
        binding.value = value;
        Ok(())
    }

    // ---- lifecycle ----

    /// Everything evaluated so far survives every later frame.
    pub(crate) fn seal(&mut self) {
        self.persistent = self.scopes.len();
        self.epoch = 1;
    }

    /// Reset per-frame state before evaluating frame `frame`.
    pub(crate) fn begin_frame(&mut self, frame: f64) {
        self.scopes.truncate(self.persistent);
        self.epoch += 1;
        self.steps = 0;
        self.depth = 0;
        self.rng = RANDOM_SEED;
        self.frame = frame;
    }

    #[cfg(test)]
    pub(crate) fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    /// Deterministic `Math.random` stream (xorshift64*), reset every frame.
    pub(crate) fn next_random(&mut self) -> f64 {
        let mut x = self.rng;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.rng = x;
        let bits = x.wrapping_mul(0x2545_F491_4F6C_DD1D) >> 11;
        bits as f64 / (1u64 << 53) as f64
    }

    fn tick(&mut self) -> ScriptResult<()> {
        self.steps += 1;
        if self.steps > self.step_limit {
            return Err(ScriptError::runtime(format!(
                "evaluation exceeded {} steps",
                self.step_limit
            )));
        }
        Ok(())
    }

    // ---- statements ----

    pub(crate) fn run(&mut self, program: &Program, scope: ScopeRef) -> ScriptResult<()> {
        match self.exec_stmts(&program.body, scope)? {
            Flow::Normal => Ok(()),
            Flow::Return(_) => Err(ScriptError::runtime("'return' outside of a function")),
            Flow::Break | Flow::Continue => {
                Err(ScriptError::runtime("'break' or 'continue' outside of a loop"))
            }
        }
    }

    /// Run `stmts` directly in `scope`, with function declarations hoisted.
    fn exec_stmts(&mut self, stmts: &[Stmt], scope: ScopeRef) -> ScriptResult<Flow> {
        for stmt in stmts {
            if let Stmt::Function { name, func } = stmt {
                let f = self.make_closure(func, scope);
                self.declare(scope, name, f, true);
            }
        }
        for stmt in stmts {
            match self.exec(stmt, scope)? {
                Flow::Normal => {}
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_block(&mut self, stmts: &[Stmt], parent: ScopeRef) -> ScriptResult<Flow> {
        let mark = self.closures;
        let scope = self.push_scope(parent);
        let flow = self.exec_stmts(stmts, scope)?;
        self.pop_scope(scope, mark);
        Ok(flow)
    }

    fn exec(&mut self, stmt: &Stmt, scope: ScopeRef) -> ScriptResult<Flow> {
        self.tick()?;
        match stmt {
            Stmt::Var { kind, decls } => {
                for (pattern, init) in decls {
                    let value = match init {
                        Some(e) => self.eval(e, scope)?,
                        None => Value::Undefined,
                    };
                    self.bind_pattern(pattern, value, scope, *kind != DeclKind::Const)?;
                }
                Ok(Flow::Normal)
            }
            Stmt::Function { .. } | Stmt::Empty => Ok(Flow::Normal),
            Stmt::Expr(e) => {
                self.eval(e, scope)?;
                Ok(Flow::Normal)
            }
            Stmt::Return(arg) => {
                let value = match arg {
                    Some(e) => self.eval(e, scope)?,
                    None => Value::Undefined,
                };
                Ok(Flow::Return(value))
            }
            Stmt::If {
                test,
                then,
                otherwise,
            } => {
                if self.eval(test, scope)?.truthy() {
                    self.exec(then, scope)
                } else if let Some(otherwise) = otherwise {
                    self.exec(otherwise, scope)
                } else {
                    Ok(Flow::Normal)
                }
            }
            Stmt::Block(stmts) => self.exec_block(stmts, scope),
            Stmt::For {
                init,
                test,
                update,
                body,
            } => {
                let mark = self.closures;
                let loop_scope = self.push_scope(scope);
                if let Some(init) = init {
                    self.exec(init, loop_scope)?;
                }
                loop {
                    if let Some(test) = test {
                        if !self.eval(test, loop_scope)?.truthy() {
                            break;
                        }
                    }
                    match self.exec(body, loop_scope)? {
                        Flow::Break => break,
                        Flow::Return(v) => return Ok(Flow::Return(v)),
                        Flow::Normal | Flow::Continue => {}
                    }
                    if let Some(update) = update {
                        self.eval(update, loop_scope)?;
                    }
                    self.tick()?;
                }
                self.pop_scope(loop_scope, mark);
                Ok(Flow::Normal)
            }
            Stmt::ForOf {
                kind,
                pattern,
                iter,
                body,
            } => {
                let iterable = self.eval(iter, scope)?;
                let items = self.iterate(&iterable)?;
                self.run_loop_body(items, *kind, pattern, body, scope)
            }
            Stmt::ForIn {
                kind,
                pattern,
                object,
                body,
            } => {
                let object = self.eval(object, scope)?;
                let keys = own_keys(&object).into_iter().map(Value::str).collect();
                self.run_loop_body(keys, *kind, pattern, body, scope)
            }
            Stmt::While { test, body } => {
                while self.eval(test, scope)?.truthy() {
                    match self.exec(body, scope)? {
                        Flow::Break => break,
                        Flow::Return(v) => return Ok(Flow::Return(v)),
                        Flow::Normal | Flow::Continue => {}
                    }
                    self.tick()?;
                }
                Ok(Flow::Normal)
            }
            Stmt::Switch {
                discriminant,
                cases,
            } => {
                let value = self.eval(discriminant, scope)?;
                let mut start = None;
                for (i, case) in cases.iter().enumerate() {
                    if let Some(test) = &case.test {
                        if self.eval(test, scope)?.strict_eq(&value) {
                            start = Some(i);
                            break;
                        }
                    }
                }
                let start = start.or_else(|| cases.iter().position(|c| c.test.is_none()));
                let Some(start) = start else {
                    return Ok(Flow::Normal);
                };
                let mark = self.closures;
                let block = self.push_scope(scope);
                let mut flow = Flow::Normal;
                'cases: for case in &cases[start..] {
                    for stmt in &case.body {
                        match self.exec(stmt, block)? {
                            Flow::Normal => {}
                            Flow::Break => break 'cases,
                            other => {
                                flow = other;
                                break 'cases;
                            }
                        }
                    }
                }
                self.pop_scope(block, mark);
                Ok(flow)
            }
            Stmt::Throw(e) => {
                let value = self.eval(e, scope)?;
                let message = match &value {
                    Value::Object(map) => map
                        .borrow()
                        .get("message")
                        .map_or_else(|| value.to_js_string(), Value::to_js_string),
                    other => other.to_js_string(),
                };
                Err(ScriptError::runtime(format!("uncaught exception: {message}")))
            }
            Stmt::Break => Ok(Flow::Break),
            Stmt::Continue => Ok(Flow::Continue),
        }
    }

    fn run_loop_body(
        &mut self,
        items: Vec<Value>,
        kind: DeclKind,
        pattern: &Pattern,
        body: &Stmt,
        scope: ScopeRef,
    ) -> ScriptResult<Flow> {
        for item in items {
            self.tick()?;
            let mark = self.closures;
            let iter_scope = self.push_scope(scope);
            self.bind_pattern(pattern, item, iter_scope, kind != DeclKind::Const)?;
            let flow = self.exec(body, iter_scope)?;
            self.pop_scope(iter_scope, mark);
            match flow {
                Flow::Break => break,
                Flow::Return(v) => return Ok(Flow::Return(v)),
                Flow::Normal | Flow::Continue => {}
            }
        }
        Ok(Flow::Normal)
    }

    fn bind_pattern(
        &mut self,
        pattern: &Pattern,
        value: Value,
        scope: ScopeRef,
        mutable: bool,
    ) -> ScriptResult<()> {
        match pattern {
            Pattern::Ident(name) => {
                self.declare(scope, name, value, mutable);
                Ok(())
            }
            Pattern::Object { props, rest } => {
                if value.is_nullish() {
                    return Err(ScriptError::runtime(format!(
                        "cannot destructure '{}' as it is {}",
                        value.to_js_string(),
                        value.to_js_string()
                    )));
                }
                let mut used = Vec::with_capacity(props.len());
                for prop in props {
                    let key = match &prop.key {
                        PropKey::Static(k) => k.clone(),
                        PropKey::Computed(e) => self.eval(e, scope)?.to_property_key(),
                    };
                    let mut v = self.get_member(&value, &key)?;
                    if let (Value::Undefined, Some(default)) = (&v, &prop.default) {
                        v = self.eval(default, scope)?;
                    }
                    self.bind_pattern(&prop.value, v, scope, mutable)?;
                    used.push(key);
                }
                if let Some(rest) = rest {
                    let remaining: PropMap = match &value {
                        Value::Object(map) => map
                            .borrow()
                            .iter()
                            .filter(|(k, _)| !used.contains(k))
                            .map(|(k, v)| (k.clone(), v.clone()))
                            .collect(),
                        _ => PropMap::new(),
                    };
                    self.declare(scope, rest, Value::object(remaining), mutable);
                }
                Ok(())
            }
            Pattern::Array { elems, rest } => {
                let items = self.iterate(&value)?;
                for (i, elem) in elems.iter().enumerate() {
                    let Some((pattern, default)) = elem else {
                        continue;
                    };
                    let mut v = items.get(i).cloned().unwrap_or_default();
                    if let (Value::Undefined, Some(default)) = (&v, default) {
                        v = self.eval(default, scope)?;
                    }
                    self.bind_pattern(pattern, v, scope, mutable)?;
                }
                if let Some(rest) = rest {
                    let tail = items.get(elems.len()..).unwrap_or_default().to_vec();
                    self.bind_pattern(rest, Value::array(tail), scope, mutable)?;
                }
                Ok(())
            }
        }
    }

    /// Snapshot of the values an iterable yields.
    pub(crate) fn iterate(&self, value: &Value) -> ScriptResult<Vec<Value>> {
        match value {
            Value::Array(items) => Ok(items.borrow().clone()),
            Value::String(s) => Ok(s.chars().map(|c| Value::str(c.to_string())).collect()),
            other => Err(ScriptError::runtime(format!(
                "{} is not iterable",
                other.type_of()
            ))),
        }
    }

    // ---- functions ----

    fn make_closure(&mut self, func: &Rc<Function>, scope: ScopeRef) -> Value {
        self.closures += 1;
        Value::Function(Rc::new(Closure {
            func: Rc::clone(func),
            env: scope,
        }))
    }

    pub(crate) fn call(&mut self, callee: &Value, args: &[Value]) -> ScriptResult<Value> {
        match callee {
            Value::Function(closure) => {
                if self.depth >= MAX_CALL_DEPTH {
                    return Err(ScriptError::runtime("maximum call stack size exceeded"));
                }
                self.depth += 1;
                let result = self.call_closure(closure, args);
                self.depth -= 1;
                result
            }
            Value::Native(native) => (native.call)(self, &native.this, args),
            other => Err(ScriptError::runtime(format!(
                "{} is not a function",
                other.type_of()
            ))),
        }
    }

    fn call_closure(&mut self, closure: &Rc<Closure>, args: &[Value]) -> ScriptResult<Value> {
        self.check_live(closure.env)?;
        let mark = self.closures;
        let scope = self.push_scope(closure.env);
        let func = &closure.func;
        if let Some(name) = &func.name {
            self.declare(scope, name, Value::Function(Rc::clone(closure)), true);
        }
        for (i, param) in func.params.iter().enumerate() {
            let mut value = if param.rest {
                Value::array(args.get(i..).unwrap_or_default().to_vec())
            } else {
                args.get(i).cloned().unwrap_or_default()
            };
            if let (Value::Undefined, Some(default)) = (&value, &param.default) {
                value = self.eval(default, scope)?;
            }
            self.bind_pattern(&param.pattern, value, scope, true)?;
        }
        let result = match &func.body {
            FuncBody::Expr(e) => self.eval(e, scope)?,
            FuncBody::Block(stmts) => match self.exec_stmts(stmts, scope)? {
                Flow::Return(v) => v,
                _ => Value::Undefined,
            },
        };
        self.pop_scope(scope, mark);
        Ok(result)
    }

    // ---- expressions ----

    pub(crate) fn eval(&mut self, expr: &Expr, scope: ScopeRef) -> ScriptResult<Value> {
        self.tick()?;
        match expr {
            Expr::Number(n) => Ok(Value::Number(*n)),
            Expr::Str(s) => Ok(Value::String(Rc::clone(s))),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Null => Ok(Value::Null),
            Expr::Undefined => Ok(Value::Undefined),
            Expr::Ident(name) => self.lookup(scope, name),
            Expr::Template { quasis, exprs } => {
                let mut out = String::new();
                for (i, quasi) in quasis.iter().enumerate() {
                    out.push_str(quasi);
                    if let Some(e) = exprs.get(i) {
                        out.push_str(&self.eval(e, scope)?.to_js_string());
                    }
                }
                Ok(Value::str(out))
            }
            Expr::Array(items) => Ok(Value::array(self.eval_list(items, scope)?)),
            Expr::Object(items) => {
                let mut map = PropMap::new();
                for item in items {
                    match item {
                        ObjectItem::Prop(key, value) => {
                            let key = match key {
                                PropKey::Static(k) => k.clone(),
                                PropKey::Computed(e) => self.eval(e, scope)?.to_property_key(),
                            };
                            let value = self.eval(value, scope)?;
                            map.insert(key, value);
                        }
                        ObjectItem::Spread(e) => {
                            let source = self.eval(e, scope)?;
                            spread_into(&mut map, &source);
                        }
                    }
                }
                Ok(Value::object(map))
            }
            Expr::Function(func) => Ok(self.make_closure(func, scope)),
            Expr::Unary { op, expr } => {
                if let (UnaryOp::TypeOf, Expr::Ident(name)) = (op, expr.as_ref()) {
                    let v = self.lookup(scope, name).unwrap_or_default();
                    return Ok(Value::str(v.type_of()));
                }
                let v = self.eval(expr, scope)?;
                Ok(match op {
                    UnaryOp::Neg => Value::Number(-v.to_number()),
                    UnaryOp::Plus => Value::Number(v.to_number()),
                    UnaryOp::Not => Value::Bool(!v.truthy()),
                    UnaryOp::BitNot => Value::Number(f64::from(!to_int32(v.to_number()))),
                    UnaryOp::TypeOf => Value::str(v.type_of()),
                    UnaryOp::Void => Value::Undefined,
                })
            }
            Expr::Update {
                increment,
                prefix,
                target,
            } => {
                let old = self.eval(target, scope)?.to_number();
                let new = if *increment { old + 1.0 } else { old - 1.0 };
                self.write_target(target, Value::Number(new), scope)?;
                Ok(Value::Number(if *prefix { new } else { old }))
            }
            Expr::Binary { op, left, right } => {
                let l = self.eval(left, scope)?;
                let r = self.eval(right, scope)?;
                binary(*op, &l, &r)
            }
            Expr::Logical { op, left, right } => {
                let l = self.eval(left, scope)?;
                let short = match op {
                    LogicalOp::And => !l.truthy(),
                    LogicalOp::Or => l.truthy(),
                    LogicalOp::Nullish => !l.is_nullish(),
                };
                if short { Ok(l) } else { self.eval(right, scope) }
            }
            Expr::Conditional {
                test,
                then,
                otherwise,
            } => {
                if self.eval(test, scope)?.truthy() {
                    self.eval(then, scope)
                } else {
                    self.eval(otherwise, scope)
                }
            }
            Expr::Assign { op, target, value } => self.eval_assign(*op, target, value, scope),
            Expr::Member { .. } | Expr::Call { .. } => {
                Ok(self.eval_chain(expr, scope)?.unwrap_or_default())
            }
            Expr::New { callee, args } => {
                let ctor = self.eval(callee, scope)?;
                let args = self.eval_list(args, scope)?;
                match &ctor {
                    Value::Native(_) => self.call(&ctor, &args),
                    other => Err(ScriptError::runtime(format!(
                        "{} is not a constructor",
                        callee_name(callee).unwrap_or_else(|| other.type_of().to_owned())
                    ))),
                }
            }
            Expr::Sequence(items) => {
                let mut last = Value::Undefined;
                for item in items {
                    last = self.eval(item, scope)?;
                }
                Ok(last)
            }
            Expr::Jsx(element) => self.eval_jsx(element, scope),
        }
    }

    /// Member and call chains. `None` means an optional link short-circuited the rest.
    fn eval_chain(&mut self, expr: &Expr, scope: ScopeRef) -> ScriptResult<Option<Value>> {
        match expr {
            Expr::Member {
                object,
                prop,
                optional,
            } => {
                let Some(obj) = self.eval_chain(object, scope)? else {
                    return Ok(None);
                };
                if *optional && obj.is_nullish() {
                    return Ok(None);
                }
                let key = self.member_key(prop, scope)?;
                if obj.is_nullish() {
                    return Err(ScriptError::runtime(format!(
                        "cannot read properties of {} (reading '{key}')",
                        obj.to_js_string()
                    )));
                }
                Ok(Some(self.get_member(&obj, &key)?))
            }
            Expr::Call {
                callee,
                args,
                optional,
            } => {
                let Some(func) = self.eval_chain(callee, scope)? else {
                    return Ok(None);
                };
                if *optional && func.is_nullish() {
                    return Ok(None);
                }
                if !func.is_callable() {
                    let name = callee_name(callee).unwrap_or_else(|| "expression".to_owned());
                    return Err(ScriptError::runtime(format!("{name} is not a function")));
                }
                let args = self.eval_list(args, scope)?;
                Ok(Some(self.call(&func, &args)?))
            }
            other => Ok(Some(self.eval(other, scope)?)),
        }
    }

    fn member_key(&mut self, prop: &MemberProp, scope: ScopeRef) -> ScriptResult<String> {
        match prop {
            MemberProp::Static(name) => Ok(name.clone()),
            MemberProp::Computed(e) => Ok(self.eval(e, scope)?.to_property_key()),
        }
    }

    fn eval_list(&mut self, items: &[ListItem], scope: ScopeRef) -> ScriptResult<Vec<Value>> {
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            match item {
                ListItem::Item(e) => out.push(self.eval(e, scope)?),
                ListItem::Spread(e) => {
                    let v = self.eval(e, scope)?;
                    out.extend(self.iterate(&v)?);
                }
                ListItem::Hole => out.push(Value::Undefined),
            }
        }
        Ok(out)
    }

    fn eval_assign(
        &mut self,
        op: AssignOp,
        target: &Expr,
        value: &Expr,
        scope: ScopeRef,
    ) -> ScriptResult<Value> {
        let new = match op {
            AssignOp::Assign => self.eval(value, scope)?,
            AssignOp::And | AssignOp::Or | AssignOp::Nullish => {
                let current = self.eval(target, scope)?;
                let keep = match op {
                    AssignOp::And => !current.truthy(),
                    AssignOp::Or => current.truthy(),
                    _ => !current.is_nullish(),
                };
                if keep {
                    return Ok(current);
                }
                self.eval(value, scope)?
            }
            arith => {
                let current = self.eval(target, scope)?;
                let rhs = self.eval(value, scope)?;
                let bin = match arith {
                    AssignOp::Add => BinaryOp::Add,
                    AssignOp::Sub => BinaryOp::Sub,
                    AssignOp::Mul => BinaryOp::Mul,
                    AssignOp::Div => BinaryOp::Div,
                    _ => BinaryOp::Mod,
                };
                binary(bin, &current, &rhs)?
            }
        };
        self.write_target(target, new.clone(), scope)?;
        Ok(new)
    }

    fn write_target(&mut self, target: &Expr, value: Value, scope: ScopeRef) -> ScriptResult<()> {
        match target {
            Expr::Ident(name) => self.assign_var(scope, name, value),
            Expr::Member { object, prop, .. } => {
                let obj = self.eval(object, scope)?;
                let key = self.member_key(prop, scope)?;
                set_member(&obj, &key, value)
            }
            _ => Err(ScriptError::runtime("invalid assignment target")),
        }
    }

    pub(crate) fn get_member(&self, obj: &Value, key: &str) -> ScriptResult<Value> {
        builtins::get_member(obj, key)
    }

    fn eval_jsx(&mut self, element: &JsxElement, scope: ScopeRef) -> ScriptResult<Value> {
        let kind = match &element.name {
            JsxName::Fragment => ElementKind::Fragment,
            JsxName::Intrinsic(tag) => ElementKind::Intrinsic(tag.clone()),
            JsxName::Component(expr) => {
                let v = self.eval(expr, scope)?;
                ElementKind::from_value(&v).map_err(|e| {
                    ScriptError::runtime(format!(
                        "<{}>: {}",
                        callee_name(expr).unwrap_or_default(),
                        e.message
                    ))
                })?
            }
        };
        let mut props = PropMap::new();
        for attr in &element.attrs {
            match attr {
                JsxAttr::Named { name, value } => {
                    let v = match value {
                        Some(e) => self.eval(e, scope)?,
                        None => Value::Bool(true),
                    };
                    props.insert(name.clone(), v);
                }
                JsxAttr::Spread(e) => {
                    let source = self.eval(e, scope)?;
                    spread_into(&mut props, &source);
                }
            }
        }
        let mut children = Vec::with_capacity(element.children.len());
        for child in &element.children {
            children.push(match child {
                JsxChild::Text(text) => Value::str(text.as_str()),
                JsxChild::Expr(e) => self.eval(e, scope)?,
                JsxChild::Element(el) => self.eval_jsx(el, scope)?,
            });
        }
        Ok(Value::Element(Rc::new(Element {
            kind,
            props,
            children,
        })))
    }
}

/// Copy enumerable own properties of `source` into `map` (object spread, `Object.assign`).
pub(crate) fn spread_into(map: &mut PropMap, source: &Value) {
    match source {
        Value::Object(src) => {
            for (k, v) in src.borrow().iter() {
                map.insert(k.clone(), v.clone());
            }
        }
        Value::Array(items) => {
            for (i, v) in items.borrow().iter().enumerate() {
                map.insert(i.to_string(), v.clone());
            }
        }
        Value::String(s) => {
            for (i, c) in s.chars().enumerate() {
                map.insert(i.to_string(), Value::str(c.to_string()));
            }
        }
        _ => {}
    }
}

pub(crate) fn own_keys(value: &Value) -> Vec<String> {
    match value {
        Value::Object(map) => map.borrow().keys().cloned().collect(),
        Value::Array(items) => (0..items.borrow().len()).map(|i| i.to_string()).collect(),
        Value::String(s) => (0..s.chars().count()).map(|i| i.to_string()).collect(),
        _ => Vec::new(),
    }
}

pub(crate) fn set_member(obj: &Value, key: &str, value: Value) -> ScriptResult<()> {
    match obj {
        Value::Object(map) => {
            map.borrow_mut().insert(key.to_owned(), value);
            Ok(())
        }
        Value::Array(items) => {
            let mut items = items.borrow_mut();
            if key == "length" {
                items.resize(array_length(value.to_number())?, Value::Undefined);
            } else if let Some(idx) = array_index(key) {
                if idx >= items.len() {
                    array_length(idx as f64 + 1.0)?;
                    items.resize(idx + 1, Value::Undefined);
                }
                items[idx] = value;
            }
            Ok(())
        }
        Value::Undefined | Value::Null => Err(ScriptError::runtime(format!(
            "cannot set properties of {} (setting '{key}')",
            obj.to_js_string()
        ))),
        // Writes to functions (`Component.displayName = ..`) and primitives are dropped.
        _ => Ok(()),
    }
}

fn callee_name(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Ident(name) => Some(name.clone()),
        Expr::Member {
            object,
            prop: MemberProp::Static(prop),
            ..
        } => callee_name(object).map(|o| format!("{o}.{prop}")),
        _ => None,
    }
}

pub(crate) fn binary(op: BinaryOp, l: &Value, r: &Value) -> ScriptResult<Value> {
    let num = |f: fn(f64, f64) -> f64| Value::Number(f(l.to_number(), r.to_number()));
    let int = |f: fn(i32, i32) -> i32| {
        Value::Number(f64::from(f(to_int32(l.to_number()), to_int32(r.to_number()))))
    };
    Ok(match op {
        BinaryOp::Add => {
            let (lp, rp) = (l.to_primitive(), r.to_primitive());
            if matches!(lp, Value::String(_)) || matches!(rp, Value::String(_)) {
                Value::str(lp.to_js_string() + &rp.to_js_string())
            } else {
                Value::Number(lp.to_number() + rp.to_number())
            }
        }
        BinaryOp::Sub => num(|a, b| a - b),
        BinaryOp::Mul => num(|a, b| a * b),
        BinaryOp::Div => num(|a, b| a / b),
        BinaryOp::Mod => num(|a, b| a % b),
        BinaryOp::Pow => num(|a, b| if b.is_nan() { f64::NAN } else { a.powf(b) }),
        BinaryOp::EqStrict => Value::Bool(l.strict_eq(r)),
        BinaryOp::NeStrict => Value::Bool(!l.strict_eq(r)),
        BinaryOp::EqLoose => Value::Bool(l.loose_eq(r)),
        BinaryOp::NeLoose => Value::Bool(!l.loose_eq(r)),
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            Value::Bool(compare(op, &l.to_primitive(), &r.to_primitive()))
        }
        BinaryOp::BitAnd => int(|a, b| a & b),
        BinaryOp::BitOr => int(|a, b| a | b),
        BinaryOp::BitXor => int(|a, b| a ^ b),
        BinaryOp::In => {
            let key = l.to_property_key();
            let found = match r {
                Value::Object(map) => map.borrow().contains_key(&key),
                Value::Array(items) => {
                    key == "length" || array_index(&key).is_some_and(|i| i < items.borrow().len())
                }
                other => {
                    return Err(ScriptError::runtime(format!(
                        "cannot use 'in' operator to search for '{key}' in {}",
                        other.to_js_string()
                    )));
                }
            };
            Value::Bool(found)
        }
    })
}

fn compare(op: BinaryOp, l: &Value, r: &Value) -> bool {
    if let (Value::String(a), Value::String(b)) = (l, r) {
        return match op {
            BinaryOp::Lt => a < b,
            BinaryOp::Le => a <= b,
            BinaryOp::Gt => a > b,
            _ => a >= b,
        };
    }
    let (a, b) = (l.to_number(), r.to_number());
    match op {
        BinaryOp::Lt => a < b,
        BinaryOp::Le => a <= b,
        BinaryOp::Gt => a > b,
        _ => a >= b,
    }
}

/// Short description of a value for diagnostics.
pub(crate) fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => format!("{s:?}"),
        Value::Number(n) => number_to_string(*n),
        other => other.type_of().to_owned(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/script/interp.rs"]
mod tests;
