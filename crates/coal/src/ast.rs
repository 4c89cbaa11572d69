//! Abstract syntax tree for Coal programs.
//!
//! The parser produces a flat `Vec<Stmt>` per program; suites are ordered
//! statement lists. Selectors are stored pre-concatenated (each keyword
//! followed by `:`), so `[obj replace: a with: b]` carries the selector
//! string `"replace:with:"`.

/// Assignment operators accepted by a name assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignMode {
    Set,
    Add,
    Sub,
    Mul,
    Div,
}

/// Binary expression operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    Eq,
    NotEq,
    Gt,
    Lt,
    Ge,
    Le,
}

impl BinOp {
    /// The operator's surface spelling, for error messages.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Ge => ">=",
            Self::Le => "<=",
        }
    }
}

/// A function definition: keyword selectors, parameter metadata, declared
/// return type, and body.
///
/// `simple` marks the zero-argument `def name -> Type` form, whose call
/// protocol is relaxed about argument counts.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub selector: String,
    pub param_names: Vec<String>,
    pub param_types: Vec<String>,
    pub param_aliases: Vec<Option<String>>,
    pub return_type: String,
    pub suite: Vec<Stmt>,
    pub simple: bool,
}

/// An initializer inside a `type` definition.
#[derive(Debug, Clone, PartialEq)]
pub struct InitDecl {
    pub selector: String,
    pub param_names: Vec<String>,
    pub param_types: Vec<String>,
    pub param_aliases: Vec<Option<String>>,
    pub suite: Vec<Stmt>,
}

/// Builds the selector string for a keyword list: each keyword followed
/// by a colon.
#[must_use]
pub fn selector_for(keywords: &[String]) -> String {
    let mut selector = String::new();
    for keyword in keywords {
        selector.push_str(keyword);
        selector.push(':');
    }
    selector
}

/// Statement nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `import name` / `import name as alias`.
    Import { name: String, alias: Option<String> },
    /// `let name: Type = value`.
    NameDef { name: String, ty: String, value: Expr },
    /// `let name: Type?`.
    NameDefEmpty { name: String, ty: String },
    /// `name = value` and the compound forms.
    NameAssign { name: String, mode: AssignMode, value: Expr },
    /// `name{index} = value`.
    IterableItemAssign { name: String, index: Expr, value: Expr },
    /// `def ... end`.
    FuncDef(FuncDecl),
    /// `return` / `return value`.
    FuncRet(Option<Expr>),
    /// `type Name as Parent ... end`.
    TypeDef { name: String, extends: String, inits: Vec<InitDecl> },
    /// `[self name: value]` inside an initializer suite.
    SelfAssign { name: String, value: Expr },
    /// `if ... (elif ...)* (else ...)? end`.
    If {
        test: Expr,
        suite: Vec<Stmt>,
        elif_blocks: Vec<(Expr, Vec<Stmt>)>,
        else_suite: Option<Vec<Stmt>>,
    },
    /// `for start, end[, interval] as name ... end`.
    For {
        start: Expr,
        end: Expr,
        interval: Option<Expr>,
        name: String,
        suite: Vec<Stmt>,
    },
    /// `each iterable as name ... end`.
    Each { iterable: Expr, name: String, suite: Vec<Stmt> },
    /// `while test do ... end`.
    While { test: Expr, suite: Vec<Stmt> },
    /// `break`.
    FlowBreak,
    /// `next`.
    FlowNext,
    /// `exit` / `exit value`.
    Exit(Option<Expr>),
    /// A method call in statement position.
    Expr(Expr),
}

/// Expression nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Expr>),
    /// A name reference.
    Name(String),
    /// `&name` in argument position: the function registered under the
    /// selector `name:`.
    FuncRef(String),
    /// `&TypeName` in argument position: the user type of that name.
    TypeRef(String),
    /// `self.name` inside an initializer suite.
    NameFromSelf(String),
    /// `value{index}` / `value{start, end}`.
    ItemFromIterable {
        target: Box<Expr>,
        index: Box<Expr>,
        end: Option<Box<Expr>>,
    },
    /// `[selector: args ...]` resolved against builtins and local methods.
    LocalCall { selector: String, args: Vec<Expr> },
    /// `[receiver selector: args ...]`.
    MethodCall {
        receiver: Box<Expr>,
        selector: String,
        args: Vec<Expr>,
    },
    /// `[TypeName selector: args ...]`.
    TypeCall {
        ty: String,
        selector: Option<String>,
        args: Vec<Expr>,
    },
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Selector formation law: keywords `k1 .. km` concatenate to
    /// `k1:k2:...km:`.
    #[test]
    fn selector_concatenation() {
        assert_eq!(selector_for(&["length".into()]), "length:");
        assert_eq!(selector_for(&["replace".into(), "with".into()]), "replace:with:");
        assert_eq!(
            selector_for(&["replace".into(), "with".into(), "times".into()]),
            "replace:with:times:"
        );
    }
}
