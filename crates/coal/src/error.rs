use std::fmt;

use strum::{Display, IntoStaticStr};

/// Result type alias for operations that can produce a runtime error.
pub type RunResult<T> = Result<T, CoalError>;

/// Error kinds surfaced by the interpreter.
///
/// The string representation matches the variant name exactly (e.g.
/// `TypeError` -> "TypeError") and is used as the leading tag of the
/// one-line report printed at the process boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
pub enum ErrorKind {
    /// Wrong value type for an assignment, argument, or built-in method;
    /// unknown declared type.
    TypeError,
    /// Reference to an unbound name.
    NameError,
    /// Selector not found on a receiver.
    MethodError,
    /// Out-of-range iterable assignment.
    IndexError,
    /// Unknown module.
    ImportError,
    /// `break`/`next` outside a loop; parser failures.
    SyntaxError,
    /// Wrong argument count; non-writable iterable target; division by zero.
    Exception,
    /// Not an error: an `exit` statement or `quit:` call requesting process
    /// termination with the carried status. The CLI boundary turns this
    /// into the exit code instead of printing a report.
    Exit,
}

/// Source position of an error, 1-based line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pos {
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}:{}]", self.line, self.column)
    }
}

/// A single interpreter error: kind, message, and an optional source
/// position hint.
///
/// Every failure travels this channel; the evaluator never recovers
/// locally. The top-level driver prints the rendered form and exits with
/// status 1 (or the carried status for [`ErrorKind::Exit`]).
#[derive(Debug, Clone, PartialEq)]
pub struct CoalError {
    kind: ErrorKind,
    message: String,
    pos: Option<Pos>,
}

impl CoalError {
    /// Creates a new error with the given kind and message.
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl fmt::Display) -> Self {
        Self {
            kind,
            message: message.to_string(),
            pos: None,
        }
    }

    /// Attaches a source position to the error.
    #[must_use]
    pub fn at(mut self, pos: Pos) -> Self {
        self.pos = Some(pos);
        self
    }

    /// Returns the error kind.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the process exit status this error maps to.
    ///
    /// [`ErrorKind::Exit`] carries an explicit status in its message; every
    /// real error exits 1.
    #[must_use]
    pub fn exit_status(&self) -> i32 {
        if self.kind == ErrorKind::Exit {
            self.message.parse().unwrap_or(0)
        } else {
            1
        }
    }

    /// Creates the pseudo-error representing an `exit`/`quit:` request.
    #[must_use]
    pub fn exit_with(status: i32) -> Self {
        Self::new(ErrorKind::Exit, status)
    }

    /// Creates a TypeError for a slot/value type mismatch.
    ///
    /// Format: `TypeError: Wrong value type for {expected}: {got}`
    #[must_use]
    pub fn wrong_value_type(expected: impl fmt::Display, got: &str) -> Self {
        Self::new(
            ErrorKind::TypeError,
            format!("Wrong value type for {expected}: {got}"),
        )
    }

    /// Creates a TypeError for an unknown declared type.
    #[must_use]
    pub fn unknown_type(name: &str) -> Self {
        Self::new(ErrorKind::TypeError, format!("Unknown type \"{name}\""))
    }

    /// Creates a TypeError for a failed builtin-type conversion.
    ///
    /// Format: `TypeError: Wrong type of value for object "{target}": {got}`
    #[must_use]
    pub fn conversion_failed(target: &str, got: &str) -> Self {
        Self::new(
            ErrorKind::TypeError,
            format!("Wrong type of value for object \"{target}\": {got}"),
        )
    }

    /// Creates a TypeError for a wrongly-typed function argument.
    #[must_use]
    pub fn wrong_argument_type(selector: &str, got: &str) -> Self {
        Self::new(
            ErrorKind::TypeError,
            format!("Wrong argument type for \"{selector}\": \"{got}\""),
        )
    }

    /// Creates a TypeError for a non-iterable value where one was required.
    #[must_use]
    pub fn not_iterable(object_type: &str) -> Self {
        Self::new(
            ErrorKind::TypeError,
            format!("\"{object_type}\" object is not iterable"),
        )
    }

    /// Creates a NameError for an unbound name.
    #[must_use]
    pub fn unknown_name(name: &str) -> Self {
        Self::new(ErrorKind::NameError, format!("Unknown name \"{name}\""))
    }

    /// Creates a MethodError for a selector missing on a receiver.
    #[must_use]
    pub fn no_method(object_type: &str, selector: &str) -> Self {
        Self::new(
            ErrorKind::MethodError,
            format!("\"{object_type}\" object has no method/attribute \"{selector}\""),
        )
    }

    /// Creates a MethodError for a type with no matching constructor.
    #[must_use]
    pub fn no_constructor(type_name: &str, selector: &str) -> Self {
        Self::new(
            ErrorKind::MethodError,
            format!("\"{type_name}\" type has no constructor \"{selector}\""),
        )
    }

    /// Creates an ImportError for an unknown module.
    #[must_use]
    pub fn unknown_module(name: &str) -> Self {
        Self::new(
            ErrorKind::ImportError,
            format!("Can't find module \"{name}\""),
        )
    }

    /// Creates an Exception for a call with the wrong argument count.
    #[must_use]
    pub fn wrong_argument_count(selector: &str) -> Self {
        Self::new(
            ErrorKind::Exception,
            format!("Wrong argument count for \"{selector}\""),
        )
    }

    /// Creates the IndexError for an out-of-range iterable assignment.
    #[must_use]
    pub fn assignment_out_of_range() -> Self {
        Self::new(ErrorKind::IndexError, "List assignment index out of range")
    }

    /// Creates the Exception for an item assignment on a non-writable
    /// target.
    #[must_use]
    pub fn not_writable_iterable(object_type: &str) -> Self {
        Self::new(
            ErrorKind::Exception,
            format!("\"{object_type}\" object is not a writable iterable"),
        )
    }

    /// Creates the SyntaxError for `break`/`next` outside a loop.
    #[must_use]
    pub fn flow_outside_loop(word: &str) -> Self {
        Self::new(ErrorKind::SyntaxError, format!("Invalid syntax: \"{word}\""))
    }

    /// Creates an Exception for division or modulo by zero.
    #[must_use]
    pub fn division_by_zero() -> Self {
        Self::new(ErrorKind::Exception, "Division by zero")
    }

    /// Creates a generic SyntaxError with a custom message.
    #[must_use]
    pub fn syntax(message: impl fmt::Display) -> Self {
        Self::new(ErrorKind::SyntaxError, message)
    }

    /// Creates a generic TypeError with a custom message.
    #[must_use]
    pub fn type_error(message: impl fmt::Display) -> Self {
        Self::new(ErrorKind::TypeError, message)
    }
}

impl fmt::Display for CoalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind == ErrorKind::Exit {
            return write!(f, "exit {}", self.message);
        }
        if let Some(pos) = self.pos {
            write!(f, "{pos} ")?;
        }
        write!(f, "{}: {}.", self.kind, self.message)
    }
}

impl std::error::Error for CoalError {}
