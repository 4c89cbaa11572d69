//! User-defined types and their instances.

use std::cell::RefCell;

use indexmap::IndexMap;

use crate::{
    ast::{InitDecl, Stmt},
    error::{CoalError, RunResult},
    value::Value,
};

/// One `init` block of a user type, keyed by its concatenated selector.
#[derive(Debug)]
pub(crate) struct Initializer {
    pub selector: String,
    pub param_names: Vec<String>,
    pub param_types: Vec<String>,
    pub param_aliases: Vec<Option<String>>,
    pub suite: Vec<Stmt>,
}

impl Initializer {
    pub fn binding_name(&self, index: usize) -> &str {
        self.param_aliases[index]
            .as_deref()
            .unwrap_or(&self.param_names[index])
    }
}

impl From<InitDecl> for Initializer {
    fn from(decl: InitDecl) -> Self {
        Self {
            selector: decl.selector,
            param_names: decl.param_names,
            param_types: decl.param_types,
            param_aliases: decl.param_aliases,
            suite: decl.suite,
        }
    }
}

/// A user-defined type: a constructor registry keyed by selector.
#[derive(Debug)]
pub(crate) struct UserType {
    pub name: String,
    /// Parent type name; nominal only.
    #[allow(dead_code)]
    pub extends: String,
    pub inits: IndexMap<String, Initializer>,
}

/// An instance of a user type.
///
/// Attributes are written through `[self name: value]` during a
/// constructor; afterwards they are exposed through the call interface as
/// `name:` getters/setters.
#[derive(Debug)]
pub(crate) struct Instance {
    pub type_name: String,
    pub attrs: RefCell<IndexMap<String, Value>>,
}

impl Instance {
    pub fn new(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_owned(),
            attrs: RefCell::new(IndexMap::new()),
        }
    }

    /// Dispatches a selector on the instance: `name:` with no arguments
    /// reads the public attribute `name`, with one argument writes it.
    pub fn call(&self, selector: &str, mut args: Vec<Value>) -> RunResult<Value> {
        let Some(attr_name) = selector.strip_suffix(':') else {
            return Err(CoalError::no_method(&self.type_name, selector));
        };
        if !self.attrs.borrow().contains_key(attr_name) {
            return Err(CoalError::no_method(&self.type_name, selector));
        }
        match args.len() {
            0 => Ok(self.attrs.borrow()[attr_name].clone()),
            1 => {
                let value = args.pop().unwrap_or_else(Value::void);
                self.attrs.borrow_mut().insert(attr_name.to_owned(), value);
                Ok(Value::void())
            }
            _ => Err(CoalError::wrong_argument_count(selector)),
        }
    }
}
