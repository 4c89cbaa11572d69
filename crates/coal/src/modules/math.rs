//! Implementation of the `math` module.
//!
//! Provides the constants `e` and `pi` and the functions `atan:` and
//! `sqrt:`, each accepting an Int or Float and returning a Float.

use crate::{
    error::{CoalError, RunResult},
    modules::ModuleFunction,
    types::Module,
    value::Value,
};

/// Math module functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MathFunctions {
    Atan,
    Sqrt,
}

impl MathFunctions {
    fn selector(self) -> &'static str {
        match self {
            Self::Atan => "atan:",
            Self::Sqrt => "sqrt:",
        }
    }

    pub fn call(self, args: &[Value]) -> RunResult<Value> {
        let [arg] = args else {
            return Err(CoalError::wrong_argument_count(self.selector()));
        };
        let number = match arg {
            Value::Int(i) => *i as f64,
            Value::Float(f) => *f,
            _ => {
                return Err(CoalError::type_error(format!(
                    "\"math {}\" takes \"Int\" or \"Float\"",
                    self.selector()
                )));
            }
        };
        let result = match self {
            Self::Atan => number.atan(),
            Self::Sqrt => number.sqrt(),
        };
        Ok(Value::Float(result))
    }
}

/// Creates the `math` module: constants first, then the function table.
pub(crate) fn create_module() -> Module {
    let mut module = Module::new("stdlib.math");

    module.set_attr("e", Value::Float(std::f64::consts::E));
    module.set_attr("pi", Value::Float(std::f64::consts::PI));

    module.set_method("atan:", ModuleFunction::Math(MathFunctions::Atan));
    module.set_method("sqrt:", ModuleFunction::Math(MathFunctions::Sqrt));

    module
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqrt_widens_ints() {
        let out = MathFunctions::Sqrt.call(&[Value::Int(9)]).unwrap();
        assert!(out.loose_eq(&Value::Float(3.0)));
    }

    #[test]
    fn atan_rejects_strings() {
        let err = MathFunctions::Atan.call(&[Value::from_string("x".into())]).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::TypeError);
    }

    #[test]
    fn module_exposes_constants_via_call() {
        let module = create_module();
        let pi = module.call("pi:", vec![]).unwrap();
        assert!(pi.loose_eq(&Value::Float(std::f64::consts::PI)));
    }
}
