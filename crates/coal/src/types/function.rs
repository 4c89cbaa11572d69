//! User-defined functions.

use crate::ast::{FuncDecl, Stmt};

/// A user-defined function registered under its concatenated selector.
///
/// `simple` functions are the zero-selector `def name -> Type` form: they
/// take no declared parameters and their call protocol ignores whatever
/// arguments were supplied.
#[derive(Debug)]
pub(crate) struct Function {
    pub selector: String,
    pub param_names: Vec<String>,
    pub param_types: Vec<String>,
    pub param_aliases: Vec<Option<String>>,
    pub return_type: String,
    pub suite: Vec<Stmt>,
    pub simple: bool,
}

impl Function {
    /// The name each argument binds to in the callee scope: the alias when
    /// one was declared, the keyword name otherwise.
    pub fn binding_name(&self, index: usize) -> &str {
        self.param_aliases[index]
            .as_deref()
            .unwrap_or(&self.param_names[index])
    }
}

impl From<FuncDecl> for Function {
    fn from(decl: FuncDecl) -> Self {
        Self {
            selector: decl.selector,
            param_names: decl.param_names,
            param_types: decl.param_types,
            param_aliases: decl.param_aliases,
            return_type: decl.return_type,
            suite: decl.suite,
            simple: decl.simple,
        }
    }
}
