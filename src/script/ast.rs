//! Syntax tree for the TSX subset. Type syntax never reaches the tree: the parser erases it.

use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Program {
    pub(crate) body: Vec<Stmt>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DeclKind {
    Const,
    Let,
    Var,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Stmt {
    Var {
        kind: DeclKind,
        decls: Vec<(Pattern, Option<Expr>)>,
    },
    Function {
        name: String,
        func: Rc<Function>,
    },
    Expr(Expr),
    Return(Option<Expr>),
    If {
        test: Expr,
        then: Box<Stmt>,
        otherwise: Option<Box<Stmt>>,
    },
    Block(Vec<Stmt>),
    For {
        init: Option<Box<Stmt>>,
        test: Option<Expr>,
        update: Option<Expr>,
        body: Box<Stmt>,
    },
    ForOf {
        kind: DeclKind,
        pattern: Pattern,
        iter: Expr,
        body: Box<Stmt>,
    },
    ForIn {
        kind: DeclKind,
        pattern: Pattern,
        object: Expr,
        body: Box<Stmt>,
    },
    While {
        test: Expr,
        body: Box<Stmt>,
    },
    Switch {
        discriminant: Expr,
        cases: Vec<SwitchCase>,
    },
    Throw(Expr),
    Break,
    Continue,
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SwitchCase {
    /// `None` for `default:`.
    pub(crate) test: Option<Expr>,
    pub(crate) body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Pattern {
    Ident(String),
    Object {
        props: Vec<ObjectPatternProp>,
        rest: Option<String>,
    },
    Array {
        elems: Vec<Option<(Pattern, Option<Expr>)>>,
        rest: Option<Box<Pattern>>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ObjectPatternProp {
    pub(crate) key: PropKey,
    pub(crate) value: Pattern,
    pub(crate) default: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Param {
    pub(crate) pattern: Pattern,
    pub(crate) default: Option<Expr>,
    pub(crate) rest: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FuncBody {
    Block(Vec<Stmt>),
    Expr(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Function {
    pub(crate) name: Option<String>,
    pub(crate) params: Vec<Param>,
    pub(crate) body: FuncBody,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PropKey {
    Static(String),
    Computed(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ObjectItem {
    Prop(PropKey, Expr),
    Spread(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ListItem {
    Item(Expr),
    Spread(Expr),
    Hole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UnaryOp {
    Neg,
    Plus,
    Not,
    BitNot,
    TypeOf,
    Void,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    EqLoose,
    NeLoose,
    EqStrict,
    NeStrict,
    Lt,
    Le,
    Gt,
    Ge,
    BitAnd,
    BitOr,
    BitXor,
    In,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LogicalOp {
    And,
    Or,
    Nullish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    And,
    Or,
    Nullish,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum MemberProp {
    Static(String),
    Computed(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Expr {
    Number(f64),
    Str(Rc<str>),
    Bool(bool),
    Null,
    Undefined,
    Ident(String),
    Template {
        quasis: Vec<String>,
        exprs: Vec<Expr>,
    },
    Array(Vec<ListItem>),
    Object(Vec<ObjectItem>),
    Function(Rc<Function>),
    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
    },
    Update {
        increment: bool,
        prefix: bool,
        target: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Conditional {
        test: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    Assign {
        op: AssignOp,
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Member {
        object: Box<Expr>,
        prop: MemberProp,
        optional: bool,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<ListItem>,
        optional: bool,
    },
    New {
        callee: Box<Expr>,
        args: Vec<ListItem>,
    },
    Sequence(Vec<Expr>),
    Jsx(Rc<JsxElement>),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum JsxName {
    Fragment,
    /// Lowercase host tag such as `div` or `svg`.
    Intrinsic(String),
    /// Component reference: an identifier or member path evaluated at runtime.
    Component(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum JsxAttr {
    Named { name: String, value: Option<Expr> },
    Spread(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum JsxChild {
    Text(String),
    Expr(Expr),
    Element(Rc<JsxElement>),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct JsxElement {
    pub(crate) name: JsxName,
    pub(crate) attrs: Vec<JsxAttr>,
    pub(crate) children: Vec<JsxChild>,
}
