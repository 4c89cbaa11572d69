//! The module object type backing built-in modules.

use std::cell::RefCell;

use indexmap::IndexMap;

use crate::{
    error::{CoalError, RunResult},
    modules::{self, ModuleFunction},
    value::Value,
};

/// A built-in module: named attributes plus a table of native methods.
///
/// Modules share the object call shape: a bare selector (`[math pi]`,
/// encoded as `pi:`) reads an attribute, a keyword selector with arguments
/// dispatches a method.
#[derive(Debug)]
pub(crate) struct Module {
    /// Qualified name reported as the module's object type
    /// (e.g. `stdlib.math`).
    pub qualified: String,
    pub attrs: RefCell<IndexMap<String, Value>>,
    pub methods: IndexMap<String, ModuleFunction>,
}

impl Module {
    pub fn new(qualified: &str) -> Self {
        Self {
            qualified: qualified.to_owned(),
            attrs: RefCell::new(IndexMap::new()),
            methods: IndexMap::new(),
        }
    }

    pub fn set_attr(&mut self, name: &str, value: Value) {
        self.attrs.borrow_mut().insert(name.to_owned(), value);
    }

    pub fn set_method(&mut self, selector: &str, function: ModuleFunction) {
        self.methods.insert(selector.to_owned(), function);
    }

    /// Dispatches a selector: methods first, then the attribute
    /// getter/setter fallback.
    pub fn call(&self, selector: &str, mut args: Vec<Value>) -> RunResult<Value> {
        if let Some(function) = self.methods.get(selector) {
            return modules::dispatch(*function, args);
        }
        let attr_name = selector.strip_suffix(':').unwrap_or(selector);
        if self.attrs.borrow().contains_key(attr_name) {
            return match args.len() {
                0 => Ok(self.attrs.borrow()[attr_name].clone()),
                1 => {
                    let value = args.pop().unwrap_or_else(Value::void);
                    self.attrs.borrow_mut().insert(attr_name.to_owned(), value);
                    Ok(Value::void())
                }
                _ => Err(CoalError::wrong_argument_count(selector)),
            };
        }
        Err(CoalError::no_method(&self.qualified, selector))
    }
}
