//! Built-in method table of the `String` type.

use std::{cell::RefCell, rc::Rc};

use crate::{
    error::{CoalError, RunResult},
    value::{ReprStyle, Value},
};

/// String methods, keyed by selector in [`StrMethods::from_selector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StrMethods {
    Length,
    Concat,
    Format,
    ToUpper,
    ToLower,
    ReplaceWith,
    ReplaceWithTimes,
    AfterReplacingWith,
    AfterReplacingWithTimes,
    AfterTrimming,
}

impl StrMethods {
    pub fn from_selector(selector: &str) -> Option<Self> {
        match selector {
            "length:" => Some(Self::Length),
            "concat:" => Some(Self::Concat),
            "format:" => Some(Self::Format),
            "toUpper:" => Some(Self::ToUpper),
            "toLower:" => Some(Self::ToLower),
            "replace:with:" => Some(Self::ReplaceWith),
            "replace:with:times:" => Some(Self::ReplaceWithTimes),
            "stringAfterReplacing:with:" => Some(Self::AfterReplacingWith),
            "stringAfterReplacing:with:times:" => Some(Self::AfterReplacingWithTimes),
            "stringAfterTrimming:" => Some(Self::AfterTrimming),
            _ => None,
        }
    }

    fn selector(self) -> &'static str {
        match self {
            Self::Length => "length:",
            Self::Concat => "concat:",
            Self::Format => "format:",
            Self::ToUpper => "toUpper:",
            Self::ToLower => "toLower:",
            Self::ReplaceWith => "replace:with:",
            Self::ReplaceWithTimes => "replace:with:times:",
            Self::AfterReplacingWith => "stringAfterReplacing:with:",
            Self::AfterReplacingWithTimes => "stringAfterReplacing:with:times:",
            Self::AfterTrimming => "stringAfterTrimming:",
        }
    }

    pub fn call(self, recv: &Rc<RefCell<String>>, args: Vec<Value>) -> RunResult<Value> {
        let arity = match self {
            Self::Length | Self::ToUpper | Self::ToLower => 0,
            Self::Concat | Self::Format | Self::AfterTrimming => 1,
            Self::ReplaceWith | Self::AfterReplacingWith => 2,
            Self::ReplaceWithTimes | Self::AfterReplacingWithTimes => 3,
        };
        if args.len() != arity {
            return Err(CoalError::wrong_argument_count(self.selector()));
        }

        match self {
            Self::Length => {
                #[allow(clippy::cast_possible_wrap)]
                let length = recv.borrow().chars().count() as i64;
                Ok(Value::Int(length))
            }
            Self::Concat => {
                let mut out = recv.borrow().clone();
                out.push_str(&args[0].repr(ReprStyle::String));
                Ok(Value::from_string(out))
            }
            Self::Format => {
                let Value::List(items) = &args[0] else {
                    return Err(CoalError::not_iterable(&args[0].object_type()));
                };
                let out = format_positional(&recv.borrow(), &items.borrow())?;
                Ok(Value::from_string(out))
            }
            Self::ToUpper => Ok(Value::from_string(recv.borrow().to_uppercase())),
            Self::ToLower => Ok(Value::from_string(recv.borrow().to_lowercase())),
            Self::ReplaceWith => {
                let old = args[0].repr(ReprStyle::String);
                let new = args[1].repr(ReprStyle::String);
                let replaced = recv.borrow().replace(&old, &new);
                *recv.borrow_mut() = replaced;
                Ok(Value::void())
            }
            Self::ReplaceWithTimes => {
                let times = replace_count(&args[2], self.selector())?;
                let old = args[0].repr(ReprStyle::String);
                let new = args[1].repr(ReprStyle::String);
                let replaced = recv.borrow().replacen(&old, &new, times);
                *recv.borrow_mut() = replaced;
                Ok(Value::void())
            }
            Self::AfterReplacingWith => {
                let old = args[0].repr(ReprStyle::String);
                let new = args[1].repr(ReprStyle::String);
                let out = recv.borrow().replace(&old, &new);
                Ok(Value::from_string(out))
            }
            Self::AfterReplacingWithTimes => {
                let times = replace_count(&args[2], self.selector())?;
                let old = args[0].repr(ReprStyle::String);
                let new = args[1].repr(ReprStyle::String);
                let out = recv.borrow().replacen(&old, &new, times);
                Ok(Value::from_string(out))
            }
            Self::AfterTrimming => {
                let Value::Str(needle) = &args[0] else {
                    return Err(CoalError::type_error(format!(
                        "String method \"{}\" takes a \"String\"",
                        self.selector()
                    )));
                };
                let out = recv.borrow().replace(needle.borrow().as_str(), "");
                Ok(Value::from_string(out))
            }
        }
    }
}

/// Validates the `times:` argument of the counted replace forms.
fn replace_count(value: &Value, selector: &str) -> RunResult<usize> {
    match value {
        Value::Int(n) if *n >= 0 => Ok(usize::try_from(*n).unwrap_or(usize::MAX)),
        // A negative count replaces every occurrence.
        Value::Int(_) => Ok(usize::MAX),
        _ => Err(CoalError::type_error(format!(
            "String method \"{selector}\" takes \"times:\" as \"Int\""
        ))),
    }
}

/// Fills `{}` placeholders positionally with the `String` repr of each
/// substitution value.
fn format_positional(template: &str, values: &[Value]) -> RunResult<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    let mut next = 0;
    while let Some(at) = rest.find("{}") {
        let Some(value) = values.get(next) else {
            return Err(CoalError::new(
                crate::error::ErrorKind::Exception,
                "Replacement index out of range for \"format:\"",
            ));
        };
        out.push_str(&rest[..at]);
        out.push_str(&value.repr(ReprStyle::String));
        rest = &rest[at + 2..];
        next += 1;
    }
    out.push_str(rest);
    Ok(out)
}
