use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScriptErrorKind {
    Syntax,
    Runtime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScriptError {
    pub(crate) kind: ScriptErrorKind,
    pub(crate) offset: Option<usize>,
    pub(crate) message: String,
}

impl ScriptError {
    pub(crate) fn syntax(offset: usize, message: impl Into<String>) -> Self {
        Self {
            kind: ScriptErrorKind::Syntax,
            offset: Some(offset),
            message: message.into(),
        }
    }

    pub(crate) fn runtime(message: impl Into<String>) -> Self {
        Self {
            kind: ScriptErrorKind::Runtime,
            offset: None,
            message: message.into(),
        }
    }

    #[cfg(test)]
    pub(crate) fn is_syntax(&self) -> bool {
        self.kind == ScriptErrorKind::Syntax
    }
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.offset) {
            (ScriptErrorKind::Syntax, Some(off)) => {
                write!(f, "syntax error at byte {off}: {}", self.message)
            }
            (ScriptErrorKind::Syntax, None) => write!(f, "syntax error: {}", self.message),
            (ScriptErrorKind::Runtime, _) => write!(f, "runtime error: {}", self.message),
        }
    }
}

impl std::error::Error for ScriptError {}

pub(crate) type ScriptResult<T> = Result<T, ScriptError>;
