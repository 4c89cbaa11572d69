//! Coal is a small statically-typed scripting language with
//! Smalltalk-style keyword selectors, evaluated by a tree-walking
//! interpreter.
//!
//! ```
//! use coal::{run_source, CollectStringPrint};
//!
//! let mut out = CollectStringPrint::new();
//! run_source("let x: Int = 3\nx = x + 4\n[print: x]", &mut out).unwrap();
//! assert_eq!(out.output(), "7\n");
//! ```

pub mod ast;
mod builtins;
mod error;
mod eval;
mod io;
mod lexer;
mod modules;
mod parse;
mod repl;
mod scope;
mod types;
mod value;

pub use crate::{
    error::{CoalError, ErrorKind, Pos, RunResult},
    eval::Interpreter,
    io::{CollectStringPrint, NoPrint, PrintWriter, StdPrint},
    parse::parse,
    repl::{banner, reserved_reply, LineBuffer, ReplSession, RESERVED_WORDS},
};

/// Parses and evaluates a whole source text in a fresh interpreter.
pub fn run_source(source: &str, print: &mut impl PrintWriter) -> RunResult<()> {
    let stmts = parse::parse(source)?;
    Interpreter::new().run(&stmts, print)
}
