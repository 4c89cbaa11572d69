//! Built-in method table of the `List` type.

use std::{cell::RefCell, rc::Rc};

use crate::{
    error::{CoalError, RunResult},
    value::Value,
};

/// List methods, keyed by selector in [`ListMethods::from_selector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ListMethods {
    Length,
    Iterate,
    Append,
    Update,
}

impl ListMethods {
    pub fn from_selector(selector: &str) -> Option<Self> {
        match selector {
            "length:" => Some(Self::Length),
            "iterate:" => Some(Self::Iterate),
            "append:" => Some(Self::Append),
            "update:" => Some(Self::Update),
            _ => None,
        }
    }

    fn selector(self) -> &'static str {
        match self {
            Self::Length => "length:",
            Self::Iterate => "iterate:",
            Self::Append => "append:",
            Self::Update => "update:",
        }
    }

    pub fn call(self, recv: &Rc<RefCell<Vec<Value>>>, mut args: Vec<Value>) -> RunResult<Value> {
        let arity = match self {
            Self::Length | Self::Iterate => 0,
            Self::Append | Self::Update => 1,
        };
        if args.len() != arity {
            return Err(CoalError::wrong_argument_count(self.selector()));
        }

        match self {
            Self::Length => {
                #[allow(clippy::cast_possible_wrap)]
                let length = recv.borrow().len() as i64;
                Ok(Value::Int(length))
            }
            Self::Iterate => {
                #[allow(clippy::cast_possible_wrap)]
                let indices = (0..recv.borrow().len()).map(|i| Value::Int(i as i64)).collect();
                Ok(Value::from_list(indices))
            }
            Self::Append => {
                let value = args.pop().unwrap_or_else(Value::void);
                recv.borrow_mut().push(value);
                Ok(Value::void())
            }
            Self::Update => {
                let Value::List(other) = &args[0] else {
                    return Err(CoalError::not_iterable(&args[0].object_type()));
                };
                // Clone the handles first in case the argument is the
                // receiver itself.
                let extension: Vec<Value> = other.borrow().clone();
                recv.borrow_mut().extend(extension);
                Ok(Value::void())
            }
        }
    }
}
