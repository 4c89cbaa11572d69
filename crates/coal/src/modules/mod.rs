//! Built-in module implementations.
//!
//! Modules are created on demand when an `import` statement executes and
//! registered in the importing scope under their name or alias. Each
//! module value answers the standard object call interface: bare
//! selectors read attributes, keyword selectors dispatch the functions
//! enumerated here.

use crate::{error::RunResult, value::Value};

pub(crate) mod core_mod;
pub(crate) mod math;

pub(crate) use math::MathFunctions;

/// A native function belonging to a built-in module. The enum is both the
/// dispatch key stored in the module's method table and the identity used
/// by [`dispatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ModuleFunction {
    Math(MathFunctions),
}

/// Creates the module registered under `name`, if one exists.
pub(crate) fn create(name: &str) -> Option<Value> {
    let module = match name {
        "core" => core_mod::create_module(),
        "math" => math::create_module(),
        _ => return None,
    };
    Some(Value::Module(std::rc::Rc::new(module)))
}

/// Runs a module function against already-evaluated arguments.
pub(crate) fn dispatch(function: ModuleFunction, args: Vec<Value>) -> RunResult<Value> {
    match function {
        ModuleFunction::Math(f) => f.call(&args),
    }
}
