//! The built-ins registry: global selectors available to every local call
//! and the constructors of the six built-in value types.

use std::borrow::Cow;

use crate::{
    error::{CoalError, RunResult},
    io::PrintWriter,
    value::{ReprStyle, Value},
};

/// The six built-in value types, as they appear in `let` declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BuiltinType {
    Void,
    Bool,
    Int,
    Float,
    String,
    List,
}

impl BuiltinType {
    pub const ALL: [Self; 6] = [
        Self::Void,
        Self::Bool,
        Self::Int,
        Self::Float,
        Self::String,
        Self::List,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Void => "Void",
            Self::Bool => "Bool",
            Self::Int => "Int",
            Self::Float => "Float",
            Self::String => "String",
            Self::List => "List",
        }
    }

    /// Wraps a value via this type's constructor, converting the payload
    /// where the type allows it. A declaration like `let x: Int = 3.9`
    /// truncates; a failed conversion is a `TypeError` naming both types.
    pub fn construct(self, value: &Value) -> RunResult<Value> {
        let got = value.object_type();
        match self {
            Self::Void => Ok(Value::void_of(&got)),
            Self::Bool => Ok(Value::Bool(match value {
                Value::Bool(b) => *b,
                Value::Str(s) => s.borrow().as_str() == "true",
                _ => false,
            })),
            Self::Int => match value {
                Value::Int(i) => Ok(Value::Int(*i)),
                Value::Bool(b) => Ok(Value::Int(i64::from(*b))),
                #[allow(clippy::cast_possible_truncation)]
                Value::Float(f) => Ok(Value::Int(f.trunc() as i64)),
                Value::Str(s) => s
                    .borrow()
                    .trim()
                    .parse::<i64>()
                    .map(Value::Int)
                    .map_err(|_| CoalError::conversion_failed("Int", &got)),
                _ => Err(CoalError::conversion_failed("Int", &got)),
            },
            Self::Float => match value {
                Value::Int(i) => Ok(Value::Float(*i as f64)),
                Value::Bool(b) => Ok(Value::Float(f64::from(u8::from(*b)))),
                Value::Float(f) => Ok(Value::Float(*f)),
                Value::Str(s) => s
                    .borrow()
                    .trim()
                    .parse::<f64>()
                    .map(Value::Float)
                    .map_err(|_| CoalError::conversion_failed("Float", &got)),
                _ => Err(CoalError::conversion_failed("Float", &got)),
            },
            Self::String => Ok(Value::from_string(value.repr(ReprStyle::String))),
            Self::List => match value {
                Value::List(items) => Ok(Value::from_list(items.borrow().clone())),
                Value::Str(s) => Ok(Value::from_list(
                    s.borrow().chars().map(|c| Value::from_string(c.to_string())).collect(),
                )),
                _ => Err(CoalError::conversion_failed("List", &got)),
            },
        }
    }
}

/// Selectors answered by the built-ins registry before user methods are
/// consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BuiltinFunctions {
    License,
    Quit,
    Print,
    PrintSep,
    Chr,
    Ord,
}

impl BuiltinFunctions {
    pub fn from_selector(selector: &str) -> Option<Self> {
        match selector {
            "license:" => Some(Self::License),
            "quit:" => Some(Self::Quit),
            "print:" => Some(Self::Print),
            "print:sep:" => Some(Self::PrintSep),
            "chr:" => Some(Self::Chr),
            "ord:" => Some(Self::Ord),
            _ => None,
        }
    }

    fn selector(self) -> &'static str {
        match self {
            Self::License => "license:",
            Self::Quit => "quit:",
            Self::Print => "print:",
            Self::PrintSep => "print:sep:",
            Self::Chr => "chr:",
            Self::Ord => "ord:",
        }
    }
}

/// Runs a built-in selector against already-evaluated arguments.
pub(crate) fn call_builtin(
    function: BuiltinFunctions,
    args: &[Value],
    print: &mut impl PrintWriter,
) -> RunResult<Value> {
    match function {
        BuiltinFunctions::License => {
            if !args.is_empty() {
                return Err(CoalError::wrong_argument_count(function.selector()));
            }
            print.stdout_write(Cow::Borrowed(LICENSE_TEXT));
            print.stdout_push("\n");
            Ok(Value::void())
        }
        BuiltinFunctions::Quit => {
            let status = match args {
                [] => 0,
                [Value::Int(status)] => i32::try_from(*status).unwrap_or(1),
                [Value::Bool(flag)] => i32::from(*flag),
                [other] => {
                    return Err(CoalError::type_error(format!(
                        "Built-in method \"quit:\" takes \"Int\", not \"{}\"",
                        other.object_type()
                    )));
                }
                _ => return Err(CoalError::wrong_argument_count(function.selector())),
            };
            Err(CoalError::exit_with(status))
        }
        BuiltinFunctions::Print => {
            let rendered = match args {
                [] => String::new(),
                [value] => value.repr(ReprStyle::String),
                _ => return Err(CoalError::wrong_argument_count(function.selector())),
            };
            print.stdout_write(Cow::Owned(rendered));
            print.stdout_push("\n");
            Ok(Value::void())
        }
        BuiltinFunctions::PrintSep => {
            let [value, sep] = args else {
                return Err(CoalError::wrong_argument_count(function.selector()));
            };
            let Value::Str(sep) = sep else {
                return Err(CoalError::type_error(
                    "Builtin-method \"print:sep:\" takes \"sep:\" as \"String\"",
                ));
            };
            print.stdout_write(Cow::Owned(value.repr(ReprStyle::String)));
            print.stdout_push(sep.borrow().as_str());
            Ok(Value::void())
        }
        BuiltinFunctions::Chr => {
            let [Value::Int(code)] = args else {
                return Err(CoalError::type_error("Built-in method \"chr:\" takes \"Int\""));
            };
            let c = u32::try_from(*code)
                .ok()
                .and_then(char::from_u32)
                .ok_or_else(|| CoalError::type_error(format!("Invalid character code {code}")))?;
            Ok(Value::from_string(c.to_string()))
        }
        BuiltinFunctions::Ord => {
            let [Value::Str(text)] = args else {
                return Err(CoalError::type_error("Built-in method \"ord:\" takes \"String\""));
            };
            let text = text.borrow();
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(Value::Int(i64::from(u32::from(c)))),
                _ => Err(CoalError::type_error(
                    "Built-in method \"ord:\" takes a single character",
                )),
            }
        }
    }
}

const LICENSE_TEXT: &str = "\
MIT License

Copyright (c) 2016 William F. de Araujo

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the \"Software\"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED \"AS IS\", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.";
