//! A small evaluator for the TSX subset generated components are written in.
//!
//! Type annotations are parsed and discarded. Evaluation is budgeted per frame and
//! can only reach the globals installed by [`builtins`] and whatever the caller
//! binds into the program scope.

pub(crate) mod ast;
pub(crate) mod builtins;
pub(crate) mod error;
pub(crate) mod interp;
pub(crate) mod lexer;
pub(crate) mod parser;
pub(crate) mod value;

pub(crate) use error::{ScriptError, ScriptResult};
pub(crate) use interp::{Interpreter, VideoInfo};
pub(crate) use parser::parse_program;
pub(crate) use value::{Element, ElementKind, Primitive, PropMap, Value};
