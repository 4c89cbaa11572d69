//! Implementation of the `core` module.
//!
//! Exposes interpreter metadata; currently the `version` attribute, a
//! List of the three crate version components.

use crate::{types::Module, value::Value};

/// Creates the `core` module.
pub(crate) fn create_module() -> Module {
    let mut module = Module::new("stdlib.core");
    module.set_attr("version", Value::from_list(version_components()));
    module
}

fn version_components() -> Vec<Value> {
    env!("CARGO_PKG_VERSION")
        .split('.')
        .take(3)
        .map(|part| Value::Int(part.parse().unwrap_or(0)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_a_three_int_list() {
        let module = create_module();
        let version = module.call("version:", vec![]).unwrap();
        let Value::List(items) = &version else {
            panic!("version should be a List, got {}", version.object_type());
        };
        assert_eq!(items.borrow().len(), 3);
        assert!(items.borrow().iter().all(|v| matches!(v, Value::Int(_))));
    }
}
