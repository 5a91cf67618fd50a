use std::rc::Rc;

use crate::script::ast::{
    AssignOp, BinaryOp, DeclKind, Expr, FuncBody, Function, JsxAttr, JsxChild, JsxElement,
    JsxName, ListItem, LogicalOp, MemberProp, ObjectItem, ObjectPatternProp, Param, Pattern,
    Program, PropKey, Stmt, SwitchCase, UnaryOp,
};
use crate::script::error::{ScriptError, ScriptResult};
use crate::script::lexer::{Lexer, TemplateLit, Token, TokenKind, is_ident_continue};
use crate::script::value::number_to_string;

/// Words that cannot name a binding or appear as a bare identifier expression.
const RESERVED: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "finally", "for", "function", "if",
    "import", "in", "instanceof", "let", "new", "return", "super", "switch", "this", "throw",
    "try", "typeof", "var", "void", "while", "with", "yield",
];

pub(crate) fn parse_program(src: &str) -> ScriptResult<Program> {
    let mut p = Parser::new(src, 0)?;
    let mut body = Vec::new();
    while !p.at(&TokenKind::Eof) {
        body.push(p.parse_statement()?);
    }
    Ok(Program { body })
}

/// Parse a standalone expression embedded at byte `base` of the enclosing source.
fn parse_embedded(src: &str, base: usize) -> ScriptResult<Expr> {
    let mut p = Parser::new(src, base)?;
    let expr = p.parse_expression()?;
    if !p.at(&TokenKind::Eof) {
        return Err(p.unexpected());
    }
    Ok(expr)
}

fn rebase(mut err: ScriptError, base: usize) -> ScriptError {
    if let Some(off) = err.offset.as_mut() {
        *off += base;
    }
    err
}

struct Checkpoint {
    pos: usize,
    tok: Token,
    prev_end: usize,
}

enum BinKind {
    Logical(LogicalOp),
    Binary(BinaryOp),
}

fn binary_op(kind: &TokenKind) -> Option<(u8, BinKind)> {
    use BinKind::{Binary, Logical};
    Some(match kind {
        TokenKind::Nullish => (1, Logical(LogicalOp::Nullish)),
        TokenKind::OrOr => (2, Logical(LogicalOp::Or)),
        TokenKind::AndAnd => (3, Logical(LogicalOp::And)),
        TokenKind::Pipe => (4, Binary(BinaryOp::BitOr)),
        TokenKind::Caret => (5, Binary(BinaryOp::BitXor)),
        TokenKind::Amp => (6, Binary(BinaryOp::BitAnd)),
        TokenKind::EqEq => (7, Binary(BinaryOp::EqLoose)),
        TokenKind::Ne => (7, Binary(BinaryOp::NeLoose)),
        TokenKind::EqEqEq => (7, Binary(BinaryOp::EqStrict)),
        TokenKind::NeEq => (7, Binary(BinaryOp::NeStrict)),
        TokenKind::Lt => (8, Binary(BinaryOp::Lt)),
        TokenKind::Le => (8, Binary(BinaryOp::Le)),
        TokenKind::Gt => (8, Binary(BinaryOp::Gt)),
        TokenKind::Ge => (8, Binary(BinaryOp::Ge)),
        TokenKind::Ident(w) if w == "in" => (8, Binary(BinaryOp::In)),
        TokenKind::Plus => (9, Binary(BinaryOp::Add)),
        TokenKind::Minus => (9, Binary(BinaryOp::Sub)),
        TokenKind::Star => (10, Binary(BinaryOp::Mul)),
        TokenKind::Slash => (10, Binary(BinaryOp::Div)),
        TokenKind::Percent => (10, Binary(BinaryOp::Mod)),
        TokenKind::StarStar => (11, Binary(BinaryOp::Pow)),
        _ => return None,
    })
}

const PREC_RELATIONAL: u8 = 8;
const PREC_POW: u8 = 11;

struct Parser<'a> {
    lexer: Lexer<'a>,
    tok: Token,
    prev_end: usize,
    base: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str, base: usize) -> ScriptResult<Self> {
        let mut lexer = Lexer::new(src);
        let tok = lexer.next_token().map_err(|e| rebase(e, base))?;
        Ok(Self {
            lexer,
            tok,
            prev_end: 0,
            base,
        })
    }

    // ---- token plumbing ----

    fn bump(&mut self) -> ScriptResult<Token> {
        let next = self
            .lexer
            .next_token()
            .map_err(|e| rebase(e, self.base))?;
        self.prev_end = self.tok.span.end;
        Ok(std::mem::replace(&mut self.tok, next))
    }

    fn peek(&self) -> ScriptResult<Token> {
        self.lexer
            .clone()
            .next_token()
            .map_err(|e| rebase(e, self.base))
    }

    fn peek2(&self) -> ScriptResult<(Token, Token)> {
        let mut lx = self.lexer.clone();
        let a = lx.next_token().map_err(|e| rebase(e, self.base))?;
        let b = lx.next_token().map_err(|e| rebase(e, self.base))?;
        Ok((a, b))
    }

    /// Restart token scanning at raw offset `pos` (used around JSX).
    fn resume_at(&mut self, pos: usize) -> ScriptResult<()> {
        self.lexer.pos = pos;
        self.prev_end = pos;
        self.tok = self
            .lexer
            .next_token()
            .map_err(|e| rebase(e, self.base))?;
        Ok(())
    }

    fn at(&self, kind: &TokenKind) -> bool {
        &self.tok.kind == kind
    }

    fn at_word(&self, word: &str) -> bool {
        matches!(&self.tok.kind, TokenKind::Ident(w) if w == word)
    }

    fn eat(&mut self, kind: &TokenKind) -> ScriptResult<bool> {
        if self.at(kind) {
            self.bump()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn eat_word(&mut self, word: &str) -> ScriptResult<bool> {
        if self.at_word(word) {
            self.bump()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> ScriptResult<()> {
        if self.eat(kind)? {
            Ok(())
        } else {
            Err(self.error(format!(
                "expected {kind:?}, found {:?}",
                self.tok.kind
            )))
        }
    }

    fn error(&self, message: impl Into<String>) -> ScriptError {
        ScriptError::syntax(self.base + self.tok.span.start, message)
    }

    fn error_at(&self, pos: usize, message: impl Into<String>) -> ScriptError {
        ScriptError::syntax(self.base + pos, message)
    }

    fn unexpected(&self) -> ScriptError {
        match &self.tok.kind {
            TokenKind::Eof => self.error("unexpected end of input"),
            kind => self.error(format!("unexpected {kind:?}")),
        }
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.lexer.pos,
            tok: self.tok.clone(),
            prev_end: self.prev_end,
        }
    }

    fn restore(&mut self, cp: Checkpoint) {
        self.lexer.pos = cp.pos;
        self.tok = cp.tok;
        self.prev_end = cp.prev_end;
    }

    /// Run `f` and rewind if it declines (`Ok(None)`) or fails.
    fn speculate<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> ScriptResult<Option<T>>,
    ) -> ScriptResult<Option<T>> {
        let cp = self.checkpoint();
        match f(self) {
            Ok(Some(v)) => Ok(Some(v)),
            Ok(None) | Err(_) => {
                self.restore(cp);
                Ok(None)
            }
        }
    }

    fn expect_ident(&mut self) -> ScriptResult<String> {
        match &self.tok.kind {
            TokenKind::Ident(name) if !RESERVED.contains(&name.as_str()) => {
                let name = name.clone();
                self.bump()?;
                Ok(name)
            }
            _ => Err(self.unexpected()),
        }
    }

    /// Any identifier, keywords included (`a.default`, `{ delete: 1 }`).
    fn expect_property_name(&mut self) -> ScriptResult<String> {
        match &self.tok.kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.bump()?;
                Ok(name)
            }
            _ => Err(self.unexpected()),
        }
    }

    fn end_statement(&mut self) -> ScriptResult<()> {
        if self.eat(&TokenKind::Semi)?
            || self.at(&TokenKind::RBrace)
            || self.at(&TokenKind::Eof)
            || self.tok.nl_before
        {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    // ---- statements ----

    fn parse_statement(&mut self) -> ScriptResult<Stmt> {
        let word = match &self.tok.kind {
            TokenKind::LBrace => return Ok(Stmt::Block(self.parse_block()?)),
            TokenKind::Semi => {
                self.bump()?;
                return Ok(Stmt::Empty);
            }
            TokenKind::Ident(w) => w.clone(),
            _ => return self.parse_expression_statement(),
        };

        match word.as_str() {
            "const" | "let" | "var" => {
                let stmt = self.parse_var_decl()?;
                self.end_statement()?;
                Ok(stmt)
            }
            "function" => {
                self.bump()?;
                self.parse_function_decl()
            }
            "async" if self.peek()?.kind == TokenKind::Ident("function".to_owned()) => {
                self.bump()?;
                self.bump()?;
                self.parse_function_decl()
            }
            "return" => {
                self.bump()?;
                let arg = if self.at(&TokenKind::Semi)
                    || self.at(&TokenKind::RBrace)
                    || self.at(&TokenKind::Eof)
                    || self.tok.nl_before
                {
                    None
                } else {
                    Some(self.parse_expression()?)
                };
                self.end_statement()?;
                Ok(Stmt::Return(arg))
            }
            "if" => {
                self.bump()?;
                let test = self.parse_paren_expression()?;
                let then = Box::new(self.parse_statement()?);
                let otherwise = if self.eat_word("else")? {
                    Some(Box::new(self.parse_statement()?))
                } else {
                    None
                };
                Ok(Stmt::If {
                    test,
                    then,
                    otherwise,
                })
            }
            "for" => self.parse_for(),
            "while" => {
                self.bump()?;
                let test = self.parse_paren_expression()?;
                let body = Box::new(self.parse_statement()?);
                Ok(Stmt::While { test, body })
            }
            "switch" => self.parse_switch(),
            "throw" => {
                self.bump()?;
                let arg = self.parse_expression()?;
                self.end_statement()?;
                Ok(Stmt::Throw(arg))
            }
            "break" | "continue" => {
                self.bump()?;
                self.end_statement()?;
                Ok(if word == "break" {
                    Stmt::Break
                } else {
                    Stmt::Continue
                })
            }
            "export" => {
                self.bump()?;
                self.eat_word("default")?;
                self.parse_statement()
            }
            "interface" if self.next_is_ident_on_line()? => {
                self.skip_interface()?;
                Ok(Stmt::Empty)
            }
            "type" if self.next_is_ident_on_line()? => {
                self.skip_type_alias()?;
                Ok(Stmt::Empty)
            }
            "declare" if self.next_is_ident_on_line()? => {
                self.bump()?;
                self.parse_statement()?;
                Ok(Stmt::Empty)
            }
            "class" | "enum" | "try" | "do" | "import" | "with" | "yield" | "debugger" => {
                Err(self.error(format!("unsupported syntax '{word}'")))
            }
            _ => self.parse_expression_statement(),
        }
    }

    fn next_is_ident_on_line(&self) -> ScriptResult<bool> {
        let next = self.peek()?;
        Ok(matches!(next.kind, TokenKind::Ident(_)) && !next.nl_before)
    }

    fn parse_expression_statement(&mut self) -> ScriptResult<Stmt> {
        let expr = self.parse_expression()?;
        self.end_statement()?;
        Ok(Stmt::Expr(expr))
    }

    fn parse_paren_expression(&mut self) -> ScriptResult<Expr> {
        self.expect(&TokenKind::LParen)?;
        let expr = self.parse_expression()?;
        self.expect(&TokenKind::RParen)?;
        Ok(expr)
    }

    fn parse_block(&mut self) -> ScriptResult<Vec<Stmt>> {
        self.expect(&TokenKind::LBrace)?;
        let mut body = Vec::new();
        while !self.at(&TokenKind::RBrace) {
            if self.at(&TokenKind::Eof) {
                return Err(self.error("unterminated block"));
            }
            body.push(self.parse_statement()?);
        }
        self.bump()?;
        Ok(body)
    }

    fn decl_kind(&self) -> Option<DeclKind> {
        match &self.tok.kind {
            TokenKind::Ident(w) if w == "const" => Some(DeclKind::Const),
            TokenKind::Ident(w) if w == "let" => Some(DeclKind::Let),
            TokenKind::Ident(w) if w == "var" => Some(DeclKind::Var),
            _ => None,
        }
    }

    fn parse_var_decl(&mut self) -> ScriptResult<Stmt> {
        let Some(kind) = self.decl_kind() else {
            return Err(self.unexpected());
        };
        self.bump()?;
        let mut decls = vec![self.parse_declarator()?];
        while self.eat(&TokenKind::Comma)? {
            decls.push(self.parse_declarator()?);
        }
        Ok(Stmt::Var { kind, decls })
    }

    fn parse_declarator(&mut self) -> ScriptResult<(Pattern, Option<Expr>)> {
        let pattern = self.parse_binding_pattern()?;
        self.eat(&TokenKind::Bang)?;
        if self.eat(&TokenKind::Colon)? {
            self.skip_type()?;
        }
        let init = if self.eat(&TokenKind::Assign)? {
            Some(self.parse_assign()?)
        } else {
            None
        };
        Ok((pattern, init))
    }

    fn parse_function_decl(&mut self) -> ScriptResult<Stmt> {
        let name = self.expect_ident()?;
        let func = self.parse_function_rest(Some(name.clone()))?;
        Ok(Stmt::Function { name, func })
    }

    /// Everything after `function name`: type params, params, return type, body.
    fn parse_function_rest(&mut self, name: Option<String>) -> ScriptResult<Rc<Function>> {
        if self.at(&TokenKind::Lt) {
            self.skip_balanced(TokenKind::Lt, TokenKind::Gt)?;
        }
        let params = self.parse_params()?;
        if self.eat(&TokenKind::Colon)? {
            self.skip_type()?;
        }
        let body = FuncBody::Block(self.parse_block()?);
        Ok(Rc::new(Function { name, params, body }))
    }

    fn parse_for(&mut self) -> ScriptResult<Stmt> {
        self.bump()?;
        if self.at_word("await") {
            return Err(self.error("unsupported syntax 'for await'"));
        }
        self.expect(&TokenKind::LParen)?;

        let init = if let Some(kind) = self.decl_kind() {
            self.bump()?;
            let pattern = self.parse_binding_pattern()?;
            if self.eat(&TokenKind::Colon)? {
                self.skip_type()?;
            }
            if self.eat_word("of")? {
                let iter = self.parse_assign()?;
                self.expect(&TokenKind::RParen)?;
                let body = Box::new(self.parse_statement()?);
                return Ok(Stmt::ForOf {
                    kind,
                    pattern,
                    iter,
                    body,
                });
            }
            if self.eat_word("in")? {
                let object = self.parse_expression()?;
                self.expect(&TokenKind::RParen)?;
                let body = Box::new(self.parse_statement()?);
                return Ok(Stmt::ForIn {
                    kind,
                    pattern,
                    object,
                    body,
                });
            }
            let first = if self.eat(&TokenKind::Assign)? {
                Some(self.parse_assign()?)
            } else {
                None
            };
            let mut decls = vec![(pattern, first)];
            while self.eat(&TokenKind::Comma)? {
                decls.push(self.parse_declarator()?);
            }
            Some(Box::new(Stmt::Var { kind, decls }))
        } else if self.at(&TokenKind::Semi) {
            None
        } else {
            Some(Box::new(Stmt::Expr(self.parse_expression()?)))
        };

        self.expect(&TokenKind::Semi)?;
        let test = if self.at(&TokenKind::Semi) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(&TokenKind::Semi)?;
        let update = if self.at(&TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(&TokenKind::RParen)?;
        let body = Box::new(self.parse_statement()?);
        Ok(Stmt::For {
            init,
            test,
            update,
            body,
        })
    }

    fn parse_switch(&mut self) -> ScriptResult<Stmt> {
        self.bump()?;
        let discriminant = self.parse_paren_expression()?;
        self.expect(&TokenKind::LBrace)?;
        let mut cases = Vec::new();
        while !self.eat(&TokenKind::RBrace)? {
            let test = if self.eat_word("case")? {
                Some(self.parse_expression()?)
            } else if self.eat_word("default")? {
                None
            } else {
                return Err(self.unexpected());
            };
            self.expect(&TokenKind::Colon)?;
            let mut body = Vec::new();
            while !(self.at_word("case") || self.at_word("default") || self.at(&TokenKind::RBrace))
            {
                if self.at(&TokenKind::Eof) {
                    return Err(self.error("unterminated switch"));
                }
                body.push(self.parse_statement()?);
            }
            cases.push(SwitchCase { test, body });
        }
        Ok(Stmt::Switch {
            discriminant,
            cases,
        })
    }

    // ---- patterns and params ----

    fn parse_binding_pattern(&mut self) -> ScriptResult<Pattern> {
        match &self.tok.kind {
            TokenKind::LBrace => self.parse_object_pattern(),
            TokenKind::LBracket => self.parse_array_pattern(),
            _ => Ok(Pattern::Ident(self.expect_ident()?)),
        }
    }

    fn parse_object_pattern(&mut self) -> ScriptResult<Pattern> {
        self.expect(&TokenKind::LBrace)?;
        let mut props = Vec::new();
        let mut rest = None;
        while !self.at(&TokenKind::RBrace) {
            if self.eat(&TokenKind::Ellipsis)? {
                rest = Some(self.expect_ident()?);
                self.eat(&TokenKind::Comma)?;
                continue;
            }
            let (key, shorthand) = self.parse_property_key()?;
            let value = if self.eat(&TokenKind::Colon)? {
                self.parse_binding_pattern()?
            } else {
                match shorthand {
                    Some(name) => Pattern::Ident(name),
                    None => return Err(self.error("expected ':' in object pattern")),
                }
            };
            let default = if self.eat(&TokenKind::Assign)? {
                Some(self.parse_assign()?)
            } else {
                None
            };
            props.push(ObjectPatternProp {
                key,
                value,
                default,
            });
            if !self.eat(&TokenKind::Comma)? {
                break;
            }
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(Pattern::Object { props, rest })
    }

    fn parse_array_pattern(&mut self) -> ScriptResult<Pattern> {
        self.expect(&TokenKind::LBracket)?;
        let mut elems = Vec::new();
        let mut rest = None;
        while !self.at(&TokenKind::RBracket) {
            if self.eat(&TokenKind::Comma)? {
                elems.push(None);
                continue;
            }
            if self.eat(&TokenKind::Ellipsis)? {
                rest = Some(Box::new(self.parse_binding_pattern()?));
                break;
            }
            let pattern = self.parse_binding_pattern()?;
            let default = if self.eat(&TokenKind::Assign)? {
                Some(self.parse_assign()?)
            } else {
                None
            };
            elems.push(Some((pattern, default)));
            if !self.eat(&TokenKind::Comma)? {
                break;
            }
        }
        self.expect(&TokenKind::RBracket)?;
        Ok(Pattern::Array { elems, rest })
    }

    fn parse_params(&mut self) -> ScriptResult<Vec<Param>> {
        self.expect(&TokenKind::LParen)?;
        let mut params = Vec::new();
        while !self.at(&TokenKind::RParen) {
            let rest = self.eat(&TokenKind::Ellipsis)?;
            let pattern = self.parse_binding_pattern()?;
            self.eat(&TokenKind::Question)?;
            if self.eat(&TokenKind::Colon)? {
                self.skip_type()?;
            }
            let default = if self.eat(&TokenKind::Assign)? {
                Some(self.parse_assign()?)
            } else {
                None
            };
            params.push(Param {
                pattern,
                default,
                rest,
            });
            if !self.eat(&TokenKind::Comma)? {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(params)
    }

    /// Object key. The second value is set when the key can also be a shorthand binding.
    fn parse_property_key(&mut self) -> ScriptResult<(PropKey, Option<String>)> {
        let tok = self.bump()?;
        match tok.kind {
            TokenKind::Ident(name) => Ok((PropKey::Static(name.clone()), Some(name))),
            TokenKind::Str(s) => Ok((PropKey::Static(s), None)),
            TokenKind::Number(n) => Ok((PropKey::Static(number_to_string(n)), None)),
            TokenKind::LBracket => {
                let key = self.parse_assign()?;
                self.expect(&TokenKind::RBracket)?;
                Ok((PropKey::Computed(key), None))
            }
            kind => Err(self.error_at(tok.span.start, format!("unexpected {kind:?}"))),
        }
    }

    // ---- expressions ----

    fn parse_expression(&mut self) -> ScriptResult<Expr> {
        let first = self.parse_assign()?;
        if !self.at(&TokenKind::Comma) {
            return Ok(first);
        }
        let mut items = vec![first];
        while self.eat(&TokenKind::Comma)? {
            items.push(self.parse_assign()?);
        }
        Ok(Expr::Sequence(items))
    }

    fn parse_assign(&mut self) -> ScriptResult<Expr> {
        if let Some(func) = self.try_arrow()? {
            return Ok(Expr::Function(func));
        }
        let target = self.parse_conditional()?;
        let op = match self.tok.kind {
            TokenKind::Assign => AssignOp::Assign,
            TokenKind::PlusEq => AssignOp::Add,
            TokenKind::MinusEq => AssignOp::Sub,
            TokenKind::StarEq => AssignOp::Mul,
            TokenKind::SlashEq => AssignOp::Div,
            TokenKind::PercentEq => AssignOp::Mod,
            TokenKind::AndAndEq => AssignOp::And,
            TokenKind::OrOrEq => AssignOp::Or,
            TokenKind::NullishEq => AssignOp::Nullish,
            _ => return Ok(target),
        };
        if !matches!(target, Expr::Ident(_) | Expr::Member { .. }) {
            return Err(self.error("invalid assignment target"));
        }
        self.bump()?;
        let value = self.parse_assign()?;
        Ok(Expr::Assign {
            op,
            target: Box::new(target),
            value: Box::new(value),
        })
    }

    fn try_arrow(&mut self) -> ScriptResult<Option<Rc<Function>>> {
        let ident = match &self.tok.kind {
            TokenKind::Ident(name) if !RESERVED.contains(&name.as_str()) => Some(name.clone()),
            TokenKind::LParen => None,
            // Generic arrows in TSX are written `<T,>(x: T) => ..` or `<T extends U>(..) => ..`.
            TokenKind::Lt => {
                // JSX text may follow the `<`, so a lexing failure just means "not generic".
                let generic = self.peek2().is_ok_and(|(a, b)| {
                    matches!(a.kind, TokenKind::Ident(_))
                        && (b.kind == TokenKind::Comma
                            || b.kind == TokenKind::Ident("extends".to_owned()))
                });
                if !generic {
                    return Ok(None);
                }
                None
            }
            _ => return Ok(None),
        };

        if let Some(name) = ident {
            let next = self.peek()?;
            if next.kind == TokenKind::Arrow && !next.nl_before {
                self.bump()?;
                self.bump()?;
                let body = self.parse_arrow_body()?;
                return Ok(Some(Rc::new(Function {
                    name: None,
                    params: vec![Param {
                        pattern: Pattern::Ident(name),
                        default: None,
                        rest: false,
                    }],
                    body,
                })));
            }
            if name == "async"
                && !next.nl_before
                && matches!(next.kind, TokenKind::Ident(_) | TokenKind::LParen)
            {
                return self.speculate(|p| {
                    p.bump()?;
                    p.try_arrow()
                });
            }
            return Ok(None);
        }

        let Some(params) = self.speculate(|p| p.parse_arrow_params())? else {
            return Ok(None);
        };
        let body = self.parse_arrow_body()?;
        Ok(Some(Rc::new(Function {
            name: None,
            params,
            body,
        })))
    }

    /// `<T,>(a, b): R =>` up to and including the arrow.
    fn parse_arrow_params(&mut self) -> ScriptResult<Option<Vec<Param>>> {
        if self.at(&TokenKind::Lt) {
            self.skip_balanced(TokenKind::Lt, TokenKind::Gt)?;
        }
        if !self.at(&TokenKind::LParen) {
            return Ok(None);
        }
        let params = self.parse_params()?;
        if self.eat(&TokenKind::Colon)? {
            self.skip_type()?;
        }
        if !self.at(&TokenKind::Arrow) || self.tok.nl_before {
            return Ok(None);
        }
        self.bump()?;
        Ok(Some(params))
    }

    fn parse_arrow_body(&mut self) -> ScriptResult<FuncBody> {
        if self.at(&TokenKind::LBrace) {
            Ok(FuncBody::Block(self.parse_block()?))
        } else {
            Ok(FuncBody::Expr(self.parse_assign()?))
        }
    }

    fn parse_conditional(&mut self) -> ScriptResult<Expr> {
        let test = self.parse_binary(0)?;
        if !self.eat(&TokenKind::Question)? {
            return Ok(test);
        }
        let then = self.parse_assign()?;
        self.expect(&TokenKind::Colon)?;
        let otherwise = self.parse_assign()?;
        Ok(Expr::Conditional {
            test: Box::new(test),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        })
    }

    fn parse_binary(&mut self, min_prec: u8) -> ScriptResult<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            if (self.at_word("as") || self.at_word("satisfies"))
                && !self.tok.nl_before
                && min_prec <= PREC_RELATIONAL
            {
                self.bump()?;
                self.skip_type()?;
                continue;
            }
            let Some((prec, kind)) = binary_op(&self.tok.kind) else {
                break;
            };
            if prec < min_prec {
                break;
            }
            self.bump()?;
            let next_min = if prec == PREC_POW { prec } else { prec + 1 };
            let right = Box::new(self.parse_binary(next_min)?);
            let left_box = Box::new(left);
            left = match kind {
                BinKind::Logical(op) => Expr::Logical {
                    op,
                    left: left_box,
                    right,
                },
                BinKind::Binary(op) => Expr::Binary {
                    op,
                    left: left_box,
                    right,
                },
            };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> ScriptResult<Expr> {
        let op = match &self.tok.kind {
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Plus => UnaryOp::Plus,
            TokenKind::Tilde => UnaryOp::BitNot,
            TokenKind::Ident(w) if w == "typeof" => UnaryOp::TypeOf,
            TokenKind::Ident(w) if w == "void" => UnaryOp::Void,
            TokenKind::Ident(w) if w == "await" || w == "delete" => {
                return Err(self.error(format!("unsupported syntax '{w}'")));
            }
            TokenKind::PlusPlus | TokenKind::MinusMinus => {
                let increment = self.at(&TokenKind::PlusPlus);
                self.bump()?;
                let target = self.parse_unary()?;
                return self.update(target, increment, true);
            }
            _ => return self.parse_postfix(),
        };
        self.bump()?;
        let expr = self.parse_unary()?;
        Ok(Expr::Unary {
            op,
            expr: Box::new(expr),
        })
    }

    fn update(&self, target: Expr, increment: bool, prefix: bool) -> ScriptResult<Expr> {
        if !matches!(target, Expr::Ident(_) | Expr::Member { .. }) {
            return Err(self.error("invalid update target"));
        }
        Ok(Expr::Update {
            increment,
            prefix,
            target: Box::new(target),
        })
    }

    fn parse_postfix(&mut self) -> ScriptResult<Expr> {
        let expr = self.parse_call_member()?;
        if matches!(self.tok.kind, TokenKind::PlusPlus | TokenKind::MinusMinus)
            && !self.tok.nl_before
        {
            let increment = self.at(&TokenKind::PlusPlus);
            self.bump()?;
            return self.update(expr, increment, false);
        }
        Ok(expr)
    }

    fn parse_call_member(&mut self) -> ScriptResult<Expr> {
        let mut expr = if self.at_word("new") {
            self.parse_new()?
        } else {
            self.parse_primary()?
        };
        loop {
            match &self.tok.kind {
                TokenKind::Dot => {
                    self.bump()?;
                    let name = self.expect_property_name()?;
                    expr = member(expr, MemberProp::Static(name), false);
                }
                TokenKind::QuestionDot => {
                    self.bump()?;
                    match self.tok.kind {
                        TokenKind::LParen => {
                            let args = self.parse_args()?;
                            expr = Expr::Call {
                                callee: Box::new(expr),
                                args,
                                optional: true,
                            };
                        }
                        TokenKind::LBracket => {
                            self.bump()?;
                            let prop = self.parse_expression()?;
                            self.expect(&TokenKind::RBracket)?;
                            expr = member(expr, MemberProp::Computed(Box::new(prop)), true);
                        }
                        _ => {
                            let name = self.expect_property_name()?;
                            expr = member(expr, MemberProp::Static(name), true);
                        }
                    }
                }
                TokenKind::LBracket => {
                    self.bump()?;
                    let prop = self.parse_expression()?;
                    self.expect(&TokenKind::RBracket)?;
                    expr = member(expr, MemberProp::Computed(Box::new(prop)), false);
                }
                TokenKind::LParen => {
                    let args = self.parse_args()?;
                    expr = Expr::Call {
                        callee: Box::new(expr),
                        args,
                        optional: false,
                    };
                }
                // Explicit type arguments: `useState<number>(0)`.
                TokenKind::Lt => {
                    let matched = self.speculate(|p| {
                        p.skip_type_args()?;
                        Ok(p.at(&TokenKind::LParen).then_some(()))
                    })?;
                    if matched.is_none() {
                        break;
                    }
                }
                // Non-null assertion `value!`.
                TokenKind::Bang if !self.tok.nl_before && self.tok.span.start == self.prev_end => {
                    self.bump()?;
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_new(&mut self) -> ScriptResult<Expr> {
        self.bump()?;
        let mut callee = self.parse_primary()?;
        while self.eat(&TokenKind::Dot)? {
            let name = self.expect_property_name()?;
            callee = member(callee, MemberProp::Static(name), false);
        }
        if self.at(&TokenKind::Lt) {
            self.skip_type_args()?;
        }
        let args = if self.at(&TokenKind::LParen) {
            self.parse_args()?
        } else {
            Vec::new()
        };
        Ok(Expr::New {
            callee: Box::new(callee),
            args,
        })
    }

    fn parse_args(&mut self) -> ScriptResult<Vec<ListItem>> {
        self.expect(&TokenKind::LParen)?;
        let mut args = Vec::new();
        while !self.at(&TokenKind::RParen) {
            if self.eat(&TokenKind::Ellipsis)? {
                args.push(ListItem::Spread(self.parse_assign()?));
            } else {
                args.push(ListItem::Item(self.parse_assign()?));
            }
            if !self.eat(&TokenKind::Comma)? {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(args)
    }

    fn parse_primary(&mut self) -> ScriptResult<Expr> {
        let tok = self.bump()?;
        match tok.kind {
            TokenKind::Number(n) => Ok(Expr::Number(n)),
            TokenKind::Str(s) => Ok(Expr::Str(s.into())),
            TokenKind::Template(lit) => self.template(lit),
            TokenKind::LParen => {
                let expr = self.parse_expression()?;
                self.expect(&TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::LBracket => self.parse_array_literal(),
            TokenKind::LBrace => self.parse_object_literal(),
            TokenKind::Lt => self.parse_jsx(tok.span.end),
            TokenKind::Slash | TokenKind::SlashEq => Err(self.error_at(
                tok.span.start,
                "regular expression literals are not supported",
            )),
            TokenKind::Ident(word) => match word.as_str() {
                "true" => Ok(Expr::Bool(true)),
                "false" => Ok(Expr::Bool(false)),
                "null" => Ok(Expr::Null),
                "undefined" => Ok(Expr::Undefined),
                "function" => {
                    let name = if self.at(&TokenKind::LParen) || self.at(&TokenKind::Lt) {
                        None
                    } else {
                        Some(self.expect_ident()?)
                    };
                    Ok(Expr::Function(self.parse_function_rest(name)?))
                }
                "async" if self.at_word("function") => {
                    self.bump()?;
                    let name = if self.at(&TokenKind::LParen) {
                        None
                    } else {
                        Some(self.expect_ident()?)
                    };
                    Ok(Expr::Function(self.parse_function_rest(name)?))
                }
                w if RESERVED.contains(&w) => {
                    Err(self.error_at(tok.span.start, format!("unexpected keyword '{w}'")))
                }
                _ => Ok(Expr::Ident(word)),
            },
            TokenKind::Eof => Err(self.error_at(tok.span.start, "unexpected end of input")),
            kind => Err(self.error_at(tok.span.start, format!("unexpected {kind:?}"))),
        }
    }

    fn template(&mut self, lit: TemplateLit) -> ScriptResult<Expr> {
        let mut exprs = Vec::with_capacity(lit.holes.len());
        for (offset, src) in &lit.holes {
            exprs.push(parse_embedded(src, self.base + offset)?);
        }
        Ok(Expr::Template {
            quasis: lit.quasis,
            exprs,
        })
    }

    fn parse_array_literal(&mut self) -> ScriptResult<Expr> {
        let mut items = Vec::new();
        while !self.at(&TokenKind::RBracket) {
            if self.eat(&TokenKind::Comma)? {
                items.push(ListItem::Hole);
                continue;
            }
            if self.eat(&TokenKind::Ellipsis)? {
                items.push(ListItem::Spread(self.parse_assign()?));
            } else {
                items.push(ListItem::Item(self.parse_assign()?));
            }
            if !self.eat(&TokenKind::Comma)? {
                break;
            }
        }
        self.expect(&TokenKind::RBracket)?;
        Ok(Expr::Array(items))
    }

    fn parse_object_literal(&mut self) -> ScriptResult<Expr> {
        let mut items = Vec::new();
        while !self.at(&TokenKind::RBrace) {
            if self.eat(&TokenKind::Ellipsis)? {
                items.push(ObjectItem::Spread(self.parse_assign()?));
            } else {
                let (key, shorthand) = self.parse_property_key()?;
                let value = if self.eat(&TokenKind::Colon)? {
                    self.parse_assign()?
                } else if self.at(&TokenKind::LParen) || self.at(&TokenKind::Lt) {
                    let name = match &key {
                        PropKey::Static(s) => Some(s.clone()),
                        PropKey::Computed(_) => None,
                    };
                    Expr::Function(self.parse_function_rest(name)?)
                } else {
                    match shorthand {
                        Some(name) => Expr::Ident(name),
                        None => return Err(self.unexpected()),
                    }
                };
                items.push(ObjectItem::Prop(key, value));
            }
            if !self.eat(&TokenKind::Comma)? {
                break;
            }
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(Expr::Object(items))
    }

    // ---- JSX ----

    fn parse_jsx(&mut self, after_lt: usize) -> ScriptResult<Expr> {
        let (element, end) = self.jsx_element(after_lt)?;
        self.resume_at(end)?;
        Ok(Expr::Jsx(Rc::new(element)))
    }

    /// The current token must be the `}` closing an embedded expression; returns the raw offset after it.
    fn close_brace(&self) -> ScriptResult<usize> {
        if self.at(&TokenKind::RBrace) {
            Ok(self.tok.span.end)
        } else {
            Err(self.error("expected '}' in JSX"))
        }
    }

    /// Parse an element whose `<` ends at `start`. Returns the element and the offset past it.
    fn jsx_element(&mut self, start: usize) -> ScriptResult<(JsxElement, usize)> {
        let src = self.lexer.src;
        let mut pos = skip_ws(src, start);
        if src[pos..].starts_with('>') {
            let (children, end) = self.jsx_children(pos + 1, "")?;
            let element = JsxElement {
                name: JsxName::Fragment,
                attrs: Vec::new(),
                children,
            };
            return Ok((element, end));
        }

        let name_end = jsx_name_end(src, pos);
        if name_end == pos {
            return Err(self.error_at(pos, "expected JSX tag name"));
        }
        let tag = &src[pos..name_end];
        let name = jsx_name(tag);
        pos = name_end;

        let mut attrs = Vec::new();
        loop {
            pos = skip_ws(src, pos);
            let rest = &src[pos..];
            if rest.starts_with("/>") {
                let element = JsxElement {
                    name,
                    attrs,
                    children: Vec::new(),
                };
                return Ok((element, pos + 2));
            }
            if rest.starts_with('>') {
                let (children, end) = self.jsx_children(pos + 1, tag)?;
                let element = JsxElement {
                    name,
                    attrs,
                    children,
                };
                return Ok((element, end));
            }
            if rest.starts_with('{') {
                self.resume_at(pos + 1)?;
                self.expect(&TokenKind::Ellipsis)?;
                let expr = self.parse_assign()?;
                pos = self.close_brace()?;
                attrs.push(JsxAttr::Spread(expr));
                continue;
            }

            let attr_end = jsx_name_end(src, pos);
            if attr_end == pos {
                return Err(self.error_at(pos, format!("malformed JSX tag <{tag}>")));
            }
            let attr = src[pos..attr_end].to_owned();
            pos = skip_ws(src, attr_end);
            if !src[pos..].starts_with('=') {
                attrs.push(JsxAttr::Named {
                    name: attr,
                    value: None,
                });
                continue;
            }
            pos = skip_ws(src, pos + 1);
            let value = match src[pos..].chars().next() {
                Some(quote @ ('"' | '\'')) => {
                    let Some(close) = src[pos + 1..].find(quote) else {
                        return Err(self.error_at(pos, "unterminated JSX attribute string"));
                    };
                    let raw = &src[pos + 1..pos + 1 + close];
                    pos += close + 2;
                    Expr::Str(decode_entities(raw).into())
                }
                Some('{') => {
                    self.resume_at(pos + 1)?;
                    let expr = self.parse_assign()?;
                    pos = self.close_brace()?;
                    expr
                }
                Some('<') => {
                    let (element, end) = self.jsx_element(pos + 1)?;
                    pos = end;
                    Expr::Jsx(Rc::new(element))
                }
                _ => return Err(self.error_at(pos, "expected JSX attribute value")),
            };
            attrs.push(JsxAttr::Named {
                name: attr,
                value: Some(value),
            });
        }
    }

    fn jsx_children(&mut self, mut pos: usize, tag: &str) -> ScriptResult<(Vec<JsxChild>, usize)> {
        let src = self.lexer.src;
        let mut children = Vec::new();
        loop {
            let text_end = src[pos..].find(['<', '{']).map_or(src.len(), |i| pos + i);
            if text_end > pos {
                let text = jsx_text(&src[pos..text_end]);
                if !text.is_empty() {
                    children.push(JsxChild::Text(text));
                }
            }
            pos = text_end;
            if pos >= src.len() {
                return Err(self.error_at(pos, format!("unterminated JSX element <{tag}>")));
            }

            if src[pos..].starts_with('{') {
                self.resume_at(pos + 1)?;
                if !self.at(&TokenKind::RBrace) {
                    let expr = self.parse_expression()?;
                    children.push(JsxChild::Expr(expr));
                }
                pos = self.close_brace()?;
                continue;
            }

            let after = skip_ws(src, pos + 1);
            if src[after..].starts_with('/') {
                let name_start = after + 1;
                let Some(close) = src[name_start..].find('>') else {
                    return Err(self.error_at(pos, format!("unterminated closing tag </{tag}>")));
                };
                let closing = src[name_start..name_start + close].trim();
                if closing != tag {
                    return Err(self.error_at(
                        pos,
                        format!("expected closing tag </{tag}>, found </{closing}>"),
                    ));
                }
                return Ok((children, name_start + close + 1));
            }

            let (child, end) = self.jsx_element(pos + 1)?;
            children.push(JsxChild::Element(Rc::new(child)));
            pos = end;
        }
    }

    // ---- type erasure ----

    fn skip_type(&mut self) -> ScriptResult<()> {
        if matches!(self.tok.kind, TokenKind::Pipe | TokenKind::Amp) {
            self.bump()?;
        }
        self.skip_type_operand()?;
        while matches!(self.tok.kind, TokenKind::Pipe | TokenKind::Amp) {
            self.bump()?;
            self.skip_type_operand()?;
        }
        if self.at_word("extends") && !self.tok.nl_before {
            self.bump()?;
            self.skip_type()?;
            self.expect(&TokenKind::Question)?;
            self.skip_type()?;
            self.expect(&TokenKind::Colon)?;
            self.skip_type()?;
        }
        Ok(())
    }

    fn skip_type_operand(&mut self) -> ScriptResult<()> {
        while ["keyof", "readonly", "unique", "infer"]
            .iter()
            .any(|w| self.at_word(w))
        {
            self.bump()?;
        }
        match &self.tok.kind {
            TokenKind::Ident(w) if w == "typeof" => {
                self.bump()?;
                self.skip_entity_name()?;
            }
            TokenKind::Ident(w) if w == "new" => {
                self.bump()?;
                return self.skip_type_operand();
            }
            TokenKind::Ident(_) => {
                self.skip_entity_name()?;
                if self.at(&TokenKind::Lt) && !self.tok.nl_before {
                    self.skip_type_args()?;
                }
                if self.at_word("is") && !self.tok.nl_before {
                    self.bump()?;
                    self.skip_type()?;
                }
            }
            TokenKind::Str(_) | TokenKind::Number(_) | TokenKind::Template(_) => {
                self.bump()?;
            }
            TokenKind::Minus => {
                self.bump()?;
                self.bump()?;
            }
            TokenKind::LParen => {
                self.skip_balanced(TokenKind::LParen, TokenKind::RParen)?;
                if self.eat(&TokenKind::Arrow)? {
                    self.skip_type()?;
                }
            }
            TokenKind::Lt => {
                self.skip_balanced(TokenKind::Lt, TokenKind::Gt)?;
                self.skip_balanced(TokenKind::LParen, TokenKind::RParen)?;
                self.expect(&TokenKind::Arrow)?;
                self.skip_type()?;
            }
            TokenKind::LBrace => self.skip_balanced(TokenKind::LBrace, TokenKind::RBrace)?,
            TokenKind::LBracket => {
                self.skip_balanced(TokenKind::LBracket, TokenKind::RBracket)?
            }
            _ => return Err(self.error("expected a type")),
        }
        while self.at(&TokenKind::LBracket) && !self.tok.nl_before {
            self.skip_balanced(TokenKind::LBracket, TokenKind::RBracket)?;
        }
        Ok(())
    }

    fn skip_entity_name(&mut self) -> ScriptResult<()> {
        self.expect_property_name()?;
        while self.eat(&TokenKind::Dot)? {
            self.expect_property_name()?;
        }
        Ok(())
    }

    fn skip_type_args(&mut self) -> ScriptResult<()> {
        self.expect(&TokenKind::Lt)?;
        loop {
            self.skip_type()?;
            if !self.eat(&TokenKind::Comma)? {
                break;
            }
        }
        self.expect(&TokenKind::Gt)
    }

    fn skip_balanced(&mut self, open: TokenKind, close: TokenKind) -> ScriptResult<()> {
        self.expect(&open)?;
        let mut depth = 1usize;
        while depth > 0 {
            if self.at(&TokenKind::Eof) {
                return Err(self.error("unbalanced brackets in type"));
            }
            if self.at(&open) {
                depth += 1;
            } else if self.at(&close) {
                depth -= 1;
            }
            self.bump()?;
        }
        Ok(())
    }

    fn skip_interface(&mut self) -> ScriptResult<()> {
        self.bump()?;
        self.expect_property_name()?;
        if self.at(&TokenKind::Lt) {
            self.skip_balanced(TokenKind::Lt, TokenKind::Gt)?;
        }
        if self.eat_word("extends")? {
            loop {
                self.skip_type_operand()?;
                if !self.eat(&TokenKind::Comma)? {
                    break;
                }
            }
        }
        self.skip_balanced(TokenKind::LBrace, TokenKind::RBrace)
    }

    fn skip_type_alias(&mut self) -> ScriptResult<()> {
        self.bump()?;
        self.expect_property_name()?;
        if self.at(&TokenKind::Lt) {
            self.skip_balanced(TokenKind::Lt, TokenKind::Gt)?;
        }
        self.expect(&TokenKind::Assign)?;
        self.skip_type()?;
        self.end_statement()
    }
}

fn member(object: Expr, prop: MemberProp, optional: bool) -> Expr {
    Expr::Member {
        object: Box::new(object),
        prop,
        optional,
    }
}

fn skip_ws(src: &str, pos: usize) -> usize {
    src[pos..]
        .char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map_or(src.len(), |(i, _)| pos + i)
}

/// Tag and attribute names: identifiers joined by `-`, `.` or `:`.
fn jsx_name_end(src: &str, pos: usize) -> usize {
    src[pos..]
        .char_indices()
        .find(|&(_, c)| !(is_ident_continue(c) || matches!(c, '-' | '.' | ':')))
        .map_or(src.len(), |(i, _)| pos + i)
}

fn jsx_name(tag: &str) -> JsxName {
    if tag.contains('.') {
        let mut parts = tag.split('.');
        let first = parts.next().unwrap_or_default();
        let mut expr = Expr::Ident(first.to_owned());
        for part in parts {
            expr = member(expr, MemberProp::Static(part.to_owned()), false);
        }
        return JsxName::Component(expr);
    }
    if tag.starts_with(|c: char| c.is_ascii_lowercase()) || tag.contains('-') {
        JsxName::Intrinsic(tag.to_owned())
    } else {
        JsxName::Component(Expr::Ident(tag.to_owned()))
    }
}

/// Collapse JSX text the way React's compilers do: lines are trimmed at their
/// inner edges, blank lines dropped, and the rest joined by single spaces.
pub(crate) fn jsx_text(raw: &str) -> String {
    let lines: Vec<&str> = raw.split('\n').collect();
    let last_non_empty = lines.iter().rposition(|l| !l.trim().is_empty());
    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        let line = line.trim_end_matches('\r').replace('\t', " ");
        let mut piece = line.as_str();
        if i != 0 {
            piece = piece.trim_start();
        }
        if i != lines.len() - 1 {
            piece = piece.trim_end();
        }
        if piece.is_empty() {
            continue;
        }
        out.push_str(piece);
        if Some(i) != last_non_empty {
            out.push(' ');
        }
    }
    decode_entities(&out)
}

pub(crate) fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_owned();
    }
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest.find(';').filter(|&semi| semi <= 10).and_then(|semi| {
            let entity = &rest[1..semi];
            let c = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                "mdash" => Some('\u{2014}'),
                "ndash" => Some('\u{2013}'),
                "hellip" => Some('\u{2026}'),
                "copy" => Some('\u{a9}'),
                "reg" => Some('\u{ae}'),
                "trade" => Some('\u{2122}'),
                "times" => Some('\u{d7}'),
                "rarr" => Some('\u{2192}'),
                "larr" => Some('\u{2190}'),
                _ => {
                    let num = entity.strip_prefix('#')?;
                    let code = match num.strip_prefix(['x', 'X']) {
                        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                        None => num.parse().ok()?,
                    };
                    char::from_u32(code)
                }
            };
            c.map(|c| (c, semi))
        });
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
#[path = "../../tests/unit/script/parser.rs"]
mod tests;
