//! Persistent REPL session support.
//!
//! [`ReplSession`] keeps interpreter state across `execute()` calls so
//! interactive snippets share variables, functions, and types.
//! [`LineBuffer`] implements the line-continuation discipline of the
//! interactive driver: block-opening keywords raise the pending depth by
//! four columns, `end` lowers it, and the buffered source is flushed for
//! parsing once the depth returns to zero.

use crate::{
    error::RunResult,
    eval::Interpreter,
    io::PrintWriter,
    parse::parse,
};

/// Reserved words offered to tab completion, in the order the original
/// driver advertised them.
pub const RESERVED_WORDS: &[&str] = &[
    "let", "def", "if", "elif", "else", "for", "each", "while", "break", "next", "return", "type",
    "end", "help", "copyright", "credits", "license", "quit",
];

/// Keywords that open an indented block on the continuation prompt.
const BLOCK_OPENERS: &[&str] = &["def", "if", "for", "each", "while"];

/// The greeting printed when the REPL starts.
#[must_use]
pub fn banner() -> String {
    format!(
        "Coal {} (Rust)\nType \"help\", \"copyright\", \"credits\" or \"license\" for more information.",
        env!("CARGO_PKG_VERSION")
    )
}

/// Canned replies for the reserved words intercepted before parsing.
#[must_use]
pub fn reserved_reply(word: &str) -> Option<&'static str> {
    match word {
        "help" => Some(
            "You can access the command history with the UP and DOWN arrows.\n\
             Use TAB to auto-complete keywords. Press TAB twice on an empty line\n\
             to list all the available keywords.",
        ),
        "copyright" => Some("Copyright (c) 2016 William F.\nAll rights reserved."),
        "credits" => Some(
            "Thanks to everyone in the Pythonista community for supporting Coal\n\
             development.",
        ),
        "license" => Some("Type [license] to see the full license text."),
        "quit" => Some("Use [quit] or Ctrl-D (i.e. EOF) to exit."),
        _ => None,
    }
}

/// A REPL session holding interpreter state across executions.
#[derive(Debug, Default)]
pub struct ReplSession {
    interp: Interpreter,
}

impl ReplSession {
    #[must_use]
    pub fn new() -> Self {
        Self {
            interp: Interpreter::new(),
        }
    }

    /// Parses and evaluates one source snippet against the session state.
    pub fn execute(&mut self, source: &str, print: &mut impl PrintWriter) -> RunResult<()> {
        let stmts = parse(source)?;
        self.interp.run(&stmts, print)
    }
}

/// Accumulates interactive input lines until the entered block closes.
#[derive(Debug, Default)]
pub struct LineBuffer {
    code: String,
    depth: usize,
    in_block: bool,
}

impl LineBuffer {
    /// Whether no block continuation is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.in_block
    }

    /// The indentation to pre-fill on the continuation prompt.
    #[must_use]
    pub fn indent(&self) -> usize {
        self.depth
    }

    /// Discards any buffered block (after an interrupt).
    pub fn clear(&mut self) {
        self.code.clear();
        self.depth = 0;
        self.in_block = false;
    }

    /// Feeds one input line. Returns the buffered source once a block is
    /// complete, or immediately for plain single-line input.
    pub fn push_line(&mut self, line: &str) -> Option<String> {
        if !self.in_block {
            if starts_with_any(line.trim_start(), BLOCK_OPENERS) {
                self.in_block = true;
                self.depth = 4;
                self.code.clear();
                self.code.push_str(line);
                self.code.push('\n');
                return None;
            }
            return Some(line.to_owned());
        }

        let trimmed = line.trim_start();
        if trimmed.is_empty() {
            return None;
        }

        if starts_with_any(trimmed, BLOCK_OPENERS) {
            self.depth += 4;
        } else if starts_with_any(trimmed, &["elif", "else"]) {
            // Same level as the block they belong to.
        } else {
            self.depth = line.len() - trimmed.len();
        }

        self.code.push_str(line);
        self.code.push('\n');

        if starts_with_any(trimmed, &["end"]) {
            if self.depth == 0 {
                self.in_block = false;
                return Some(std::mem::take(&mut self.code));
            }
            self.depth = self.depth.saturating_sub(4);
        }
        None
    }
}

/// Keyword check with a word boundary: `end` matches, `ending` does not.
fn starts_with_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| {
        text.strip_prefix(keyword).is_some_and(|rest| {
            rest.chars().next().is_none_or(|c| !c.is_alphanumeric() && c != '_')
        })
    })
}
