use crate::script::error::{ScriptError, ScriptResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Span {
    pub(crate) start: usize,
    pub(crate) end: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) span: Span,
    /// A line break separates this token from the previous one.
    pub(crate) nl_before: bool,
}

/// Template literal split into cooked text chunks and raw `${}` hole sources.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TemplateLit {
    pub(crate) quasis: Vec<String>,
    /// `(byte offset of the hole source, hole source)`.
    pub(crate) holes: Vec<(usize, String)>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Ident(String),
    Number(f64),
    Str(String),
    Template(TemplateLit),

    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Dot,
    Ellipsis,
    Semi,
    Colon,

    Question,
    QuestionDot,
    Nullish,
    NullishEq,
    Arrow,

    Assign,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    AndAndEq,
    OrOrEq,

    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    Percent,
    PlusPlus,
    MinusMinus,

    Bang,
    Tilde,
    EqEq,
    EqEqEq,
    Ne,
    NeEq,
    Lt,
    Le,
    Gt,
    Ge,

    AndAnd,
    OrOr,
    Amp,
    Pipe,
    Caret,

    Eof,
}

/// On-demand tokenizer. The parser repositions `pos` when it scans JSX text itself.
#[derive(Debug, Clone)]
pub(crate) struct Lexer<'a> {
    pub(crate) src: &'a str,
    pub(crate) pos: usize,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek_byte(&self, ahead: usize) -> Option<u8> {
        self.src.as_bytes().get(self.pos + ahead).copied()
    }

    /// Skip whitespace and comments. Returns `true` when a line break was crossed.
    pub(crate) fn skip_trivia(&mut self) -> ScriptResult<bool> {
        let src = self.src;
        let bytes = src.as_bytes();
        let mut nl = false;
        while self.pos < bytes.len() {
            let b = bytes[self.pos];
            match b {
                b'\n' => {
                    nl = true;
                    self.pos += 1;
                }
                b' ' | b'\t' | b'\r' => self.pos += 1,
                b'/' if self.peek_byte(1) == Some(b'/') => {
                    self.pos = self.src[self.pos..]
                        .find('\n')
                        .map_or(bytes.len(), |p| self.pos + p);
                }
                b'/' if self.peek_byte(1) == Some(b'*') => {
                    let start = self.pos;
                    let Some(p) = self.src[self.pos + 2..].find("*/") else {
                        return Err(ScriptError::syntax(start, "unterminated block comment"));
                    };
                    if self.src[self.pos..self.pos + 2 + p].contains('\n') {
                        nl = true;
                    }
                    self.pos += 2 + p + 2;
                }
                _ => {
                    let Some(c) = self.src[self.pos..].chars().next() else {
                        break;
                    };
                    // Non-breaking and other unicode spaces occasionally leak from chat output.
                    if c.is_whitespace() {
                        if c == '\u{2028}' || c == '\u{2029}' {
                            nl = true;
                        }
                        self.pos += c.len_utf8();
                    } else {
                        break;
                    }
                }
            }
        }
        Ok(nl)
    }

    pub(crate) fn next_token(&mut self) -> ScriptResult<Token> {
        let nl_before = self.skip_trivia()?;
        let start = self.pos;
        let kind = self.scan_kind()?;
        Ok(Token {
            kind,
            span: Span {
                start,
                end: self.pos,
            },
            nl_before,
        })
    }

    fn scan_kind(&mut self) -> ScriptResult<TokenKind> {
        let start = self.pos;
        let Some(c) = self.src[self.pos..].chars().next() else {
            return Ok(TokenKind::Eof);
        };

        if c.is_ascii_digit()
            || (c == '.' && self.peek_byte(1).is_some_and(|b| b.is_ascii_digit()))
        {
            return self.scan_number();
        }

        if is_ident_start(c) {
            let end = ident_end(self.src, self.pos);
            let s = &self.src[self.pos..end];
            self.pos = end;
            return Ok(TokenKind::Ident(s.to_owned()));
        }

        if c == '"' || c == '\'' {
            return self.scan_string(c);
        }
        if c == '`' {
            return self.scan_template();
        }

        let rest = &self.src[self.pos..];
        const PUNCT: &[(&str, TokenKind)] = &[
            ("...", TokenKind::Ellipsis),
            ("===", TokenKind::EqEqEq),
            ("!==", TokenKind::NeEq),
            ("&&=", TokenKind::AndAndEq),
            ("||=", TokenKind::OrOrEq),
            ("??=", TokenKind::NullishEq),
            ("=>", TokenKind::Arrow),
            ("==", TokenKind::EqEq),
            ("!=", TokenKind::Ne),
            ("<=", TokenKind::Le),
            (">=", TokenKind::Ge),
            ("&&", TokenKind::AndAnd),
            ("||", TokenKind::OrOr),
            ("??", TokenKind::Nullish),
            ("++", TokenKind::PlusPlus),
            ("--", TokenKind::MinusMinus),
            ("**", TokenKind::StarStar),
            ("+=", TokenKind::PlusEq),
            ("-=", TokenKind::MinusEq),
            ("*=", TokenKind::StarEq),
            ("/=", TokenKind::SlashEq),
            ("%=", TokenKind::PercentEq),
        ];
        for (text, kind) in PUNCT {
            if rest.starts_with(text) {
                self.pos += text.len();
                return Ok(kind.clone());
            }
        }

        // `?.` is optional chaining unless a digit follows (`a?.5:1`).
        if rest.starts_with("?.") && !self.peek_byte(2).is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 2;
            return Ok(TokenKind::QuestionDot);
        }

        let kind = match c {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            ';' => TokenKind::Semi,
            ':' => TokenKind::Colon,
            '?' => TokenKind::Question,
            '=' => TokenKind::Assign,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '!' => TokenKind::Bang,
            '~' => TokenKind::Tilde,
            '<' => TokenKind::Lt,
            '>' => TokenKind::Gt,
            '&' => TokenKind::Amp,
            '|' => TokenKind::Pipe,
            '^' => TokenKind::Caret,
            _ => {
                return Err(ScriptError::syntax(
                    start,
                    format!("unexpected character '{c}'"),
                ));
            }
        };
        self.pos += c.len_utf8();
        Ok(kind)
    }

    fn scan_number(&mut self) -> ScriptResult<TokenKind> {
        let start = self.pos;
        let src = self.src;
        let bytes = src.as_bytes();

        if bytes[self.pos] == b'0' {
            let radix = match self.peek_byte(1) {
                Some(b'x' | b'X') => Some(16),
                Some(b'b' | b'B') => Some(2),
                Some(b'o' | b'O') => Some(8),
                _ => None,
            };
            if let Some(radix) = radix {
                self.pos += 2;
                let digits_start = self.pos;
                while self.pos < bytes.len()
                    && (bytes[self.pos].is_ascii_hexdigit() || bytes[self.pos] == b'_')
                {
                    self.pos += 1;
                }
                let digits: String = self.src[digits_start..self.pos]
                    .chars()
                    .filter(|&c| c != '_')
                    .collect();
                let v = u64::from_str_radix(&digits, radix)
                    .map_err(|_| ScriptError::syntax(start, "invalid number literal"))?;
                return Ok(TokenKind::Number(v as f64));
            }
        }

        let digits = |lx: &mut Self| {
            while lx.pos < bytes.len() && (bytes[lx.pos].is_ascii_digit() || bytes[lx.pos] == b'_')
            {
                lx.pos += 1;
            }
        };

        digits(self);
        if self.peek_byte(0) == Some(b'.') {
            self.pos += 1;
            digits(self);
        }
        if matches!(self.peek_byte(0), Some(b'e' | b'E')) {
            let e_pos = self.pos;
            self.pos += 1;
            if matches!(self.peek_byte(0), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            let exp_start = self.pos;
            digits(self);
            if exp_start == self.pos {
                return Err(ScriptError::syntax(
                    e_pos,
                    "invalid number exponent (expected digits)",
                ));
            }
        }

        let text: String = self.src[start..self.pos]
            .chars()
            .filter(|&c| c != '_')
            .collect();
        let v: f64 = text
            .parse()
            .map_err(|_| ScriptError::syntax(start, "invalid number literal"))?;
        Ok(TokenKind::Number(v))
    }

    fn scan_string(&mut self, quote: char) -> ScriptResult<TokenKind> {
        let start = self.pos;
        self.pos += 1;
        let mut out = String::new();
        loop {
            let Some(c) = self.src[self.pos..].chars().next() else {
                return Err(ScriptError::syntax(start, "unterminated string literal"));
            };
            self.pos += c.len_utf8();
            match c {
                c if c == quote => return Ok(TokenKind::Str(out)),
                '\n' => return Err(ScriptError::syntax(start, "unterminated string literal")),
                '\\' => self.scan_escape(&mut out)?,
                c => out.push(c),
            }
        }
    }

    fn scan_escape(&mut self, out: &mut String) -> ScriptResult<()> {
        let at = self.pos;
        let Some(c) = self.src[self.pos..].chars().next() else {
            return Err(ScriptError::syntax(at, "unterminated escape sequence"));
        };
        self.pos += c.len_utf8();
        match c {
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' => out.push('\0'),
            '\n' => {}
            '\r' => {
                if self.peek_byte(0) == Some(b'\n') {
                    self.pos += 1;
                }
            }
            'x' => {
                let hex = self.src.get(self.pos..self.pos + 2).unwrap_or("");
                let v = u32::from_str_radix(hex, 16)
                    .map_err(|_| ScriptError::syntax(at, "invalid \\x escape"))?;
                self.pos += 2;
                out.push(char::from_u32(v).unwrap_or('\u{fffd}'));
            }
            'u' => {
                let v = if self.peek_byte(0) == Some(b'{') {
                    let close = self.src[self.pos..]
                        .find('}')
                        .ok_or_else(|| ScriptError::syntax(at, "invalid \\u escape"))?;
                    let hex = &self.src[self.pos + 1..self.pos + close];
                    self.pos += close + 1;
                    u32::from_str_radix(hex, 16)
                        .map_err(|_| ScriptError::syntax(at, "invalid \\u escape"))?
                } else {
                    let hex = self.src.get(self.pos..self.pos + 4).unwrap_or("");
                    self.pos += 4;
                    u32::from_str_radix(hex, 16)
                        .map_err(|_| ScriptError::syntax(at, "invalid \\u escape"))?
                };
                out.push(char::from_u32(v).unwrap_or('\u{fffd}'));
            }
            other => out.push(other),
        }
        Ok(())
    }

    fn scan_template(&mut self) -> ScriptResult<TokenKind> {
        let start = self.pos;
        self.pos += 1;
        let mut quasis = Vec::new();
        let mut holes = Vec::new();
        let mut cur = String::new();

        loop {
            let Some(c) = self.src[self.pos..].chars().next() else {
                return Err(ScriptError::syntax(start, "unterminated template literal"));
            };
            match c {
                '`' => {
                    self.pos += 1;
                    quasis.push(cur);
                    return Ok(TokenKind::Template(TemplateLit { quasis, holes }));
                }
                '\\' => {
                    self.pos += 1;
                    self.scan_escape(&mut cur)?;
                }
                '$' if self.peek_byte(1) == Some(b'{') => {
                    let hole_start = self.pos + 2;
                    let hole_end = find_hole_end(self.src, hole_start).ok_or_else(|| {
                        ScriptError::syntax(self.pos, "unterminated template expression")
                    })?;
                    quasis.push(std::mem::take(&mut cur));
                    holes.push((hole_start, self.src[hole_start..hole_end].to_owned()));
                    self.pos = hole_end + 1;
                }
                c => {
                    self.pos += c.len_utf8();
                    cur.push(c);
                }
            }
        }
    }
}

pub(crate) fn is_ident_start(c: char) -> bool {
    c == '_' || c == '$' || c.is_alphabetic()
}

pub(crate) fn is_ident_continue(c: char) -> bool {
    c == '_' || c == '$' || c.is_alphanumeric()
}

/// Byte offset just past the identifier starting at `start`.
pub(crate) fn ident_end(src: &str, start: usize) -> usize {
    let mut end = start;
    for (i, c) in src[start..].char_indices() {
        if (i == 0 && is_ident_start(c)) || (i > 0 && is_ident_continue(c)) {
            end = start + i + c.len_utf8();
        } else {
            break;
        }
    }
    end
}

/// Offset of the `}` closing a `${` hole whose body starts at `start`.
fn find_hole_end(src: &str, start: usize) -> Option<usize> {
    let bytes = src.as_bytes();
    let mut depth = 0usize;
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
                if depth == 0 {
                    return Some(i);
                }
                depth -= 1;
            }
            b'\'' | b'"' => {
                let q = bytes[i];
                i += 1;
                while i < bytes.len() && bytes[i] != q {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
            }
            b'`' => {
                let mut lx = Lexer { src, pos: i };
                lx.scan_template().ok()?;
                i = lx.pos;
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                i = src[i..].find('\n').map_or(bytes.len(), |p| i + p);
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = src[i + 2..].find("*/").map_or(bytes.len(), |p| i + 2 + p + 2);
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    None
}

#[cfg(test)]
#[path = "../../tests/unit/script/lexer.rs"]
mod tests;
