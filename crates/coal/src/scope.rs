//! Stacked binding environments.
//!
//! A scope frame is a record of three name maps: declared types, function
//! selectors, and value bindings. Lookups read the current frame only; the
//! evaluator decides when a call pushes a fresh frame and when it reuses
//! the caller's (see the scope discipline notes in DESIGN.md).

use std::rc::Rc;

use ahash::AHashMap;

use crate::{
    builtins::BuiltinType,
    types::{Function, UserType},
    value::Value,
};

/// A type binding: one of the six built-in types or a user `type`.
#[derive(Debug, Clone)]
pub(crate) enum TypeEntry {
    Builtin(BuiltinType),
    User(Rc<UserType>),
}

/// One frame of the scope stack.
#[derive(Debug, Default)]
pub(crate) struct ScopeFrame {
    pub types: AHashMap<String, TypeEntry>,
    pub methods: AHashMap<String, Rc<Function>>,
    pub names: AHashMap<String, Value>,
}

impl ScopeFrame {
    /// A fresh frame seeded with the built-in registry: the six value
    /// types, no methods, no names.
    pub fn base() -> Self {
        let mut types = AHashMap::with_capacity(8);
        for ty in BuiltinType::ALL {
            types.insert(ty.name().to_owned(), TypeEntry::Builtin(ty));
        }
        Self {
            types,
            methods: AHashMap::new(),
            names: AHashMap::new(),
        }
    }

    /// The frame allocated on a depth-zero function call: built-in types,
    /// a snapshot of the caller's methods (so recursive calls see sibling
    /// functions), built-in names.
    pub fn for_call(caller_methods: &AHashMap<String, Rc<Function>>) -> Self {
        let mut frame = Self::base();
        frame.methods = caller_methods.clone();
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_frame_holds_builtin_types_only() {
        let frame = ScopeFrame::base();
        assert_eq!(frame.types.len(), 6);
        assert!(matches!(frame.types.get("Int"), Some(TypeEntry::Builtin(BuiltinType::Int))));
        assert!(frame.methods.is_empty());
        assert!(frame.names.is_empty());
    }
}
