//! Primary value type representing Coal objects at runtime.
//!
//! `Value` is a closed tagged sum. Scalars (`Void`, `Bool`, `Int`,
//! `Float`) are stored inline and copied on binding; `String`, `List`,
//! instances, and the callable/registry kinds share structure through
//! `Rc`, so in-place mutation (list cells, `replace:with:`, attribute
//! writes) is visible through every handle, matching the language's
//! aliasing behavior.

use std::{borrow::Cow, cell::RefCell, rc::Rc};

use crate::{
    error::{CoalError, RunResult},
    types::{list::ListMethods, str::StrMethods, Function, Instance, Module, UserType},
};

/// How a value renders: `String` is the user-facing form used by `print:`,
/// `Raw` is the debug form used for list elements (strings come quoted).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReprStyle {
    String,
    Raw,
}

#[derive(Debug, Clone)]
pub enum Value {
    /// The empty value, carrying the declared type of the hole: `"Any"`
    /// if unconstrained, `"Void"` if truly empty.
    Void(Rc<str>),
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Rc<RefCell<String>>),
    List(Rc<RefCell<Vec<Value>>>),
    Function(Rc<Function>),
    Type(Rc<UserType>),
    Instance(Rc<Instance>),
    Module(Rc<Module>),
}

impl Value {
    /// The truly-empty `Void`, produced by fall-through returns, missing
    /// method results, and out-of-range reads.
    #[must_use]
    pub fn void() -> Self {
        Self::Void(Rc::from("Void"))
    }

    /// A `Void` hole declared for the given type (`let x: Int?`).
    #[must_use]
    pub fn void_of(ty: &str) -> Self {
        Self::Void(Rc::from(ty))
    }

    #[must_use]
    pub fn from_string(text: String) -> Self {
        Self::Str(Rc::new(RefCell::new(text)))
    }

    #[must_use]
    pub fn from_list(values: Vec<Self>) -> Self {
        Self::List(Rc::new(RefCell::new(values)))
    }

    /// The type tag compared by every type check in the language.
    ///
    /// Voids report the declared type of their hole (`Void(Int)`), except
    /// the truly-empty void which reports plain `Void`.
    #[must_use]
    pub fn object_type(&self) -> Cow<'_, str> {
        match self {
            Self::Void(of) => {
                if &**of == "Void" {
                    Cow::Borrowed("Void")
                } else {
                    Cow::Owned(format!("Void({of})"))
                }
            }
            Self::Bool(_) => Cow::Borrowed("Bool"),
            Self::Int(_) => Cow::Borrowed("Int"),
            Self::Float(_) => Cow::Borrowed("Float"),
            Self::Str(_) => Cow::Borrowed("String"),
            Self::List(_) => Cow::Borrowed("List"),
            Self::Function(_) => Cow::Borrowed("Function"),
            Self::Type(t) => Cow::Borrowed(&t.name),
            Self::Instance(i) => Cow::Borrowed(&i.type_name),
            Self::Module(m) => Cow::Borrowed(&m.qualified),
        }
    }

    /// The uniform truthiness rule: a value is truthy iff its payload is
    /// truthy and the value is not a `Void`. Lists are truthy even when
    /// empty.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Void(_) => false,
            Self::Bool(b) => *b,
            Self::Int(i) => *i != 0,
            Self::Float(f) => *f != 0.0,
            Self::Str(s) => !s.borrow().is_empty(),
            Self::List(_) | Self::Function(_) | Self::Type(_) | Self::Instance(_) | Self::Module(_) => true,
        }
    }

    /// Renders the value as a string.
    #[must_use]
    pub fn repr(&self, style: ReprStyle) -> String {
        match self {
            Self::Void(of) => format!("Void({of})"),
            Self::Bool(b) => format!("Bool({b})"),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => float_repr(*f),
            Self::Str(s) => match style {
                ReprStyle::String => s.borrow().clone(),
                ReprStyle::Raw => format!("\"{}\"", s.borrow()),
            },
            Self::List(items) => {
                let rendered: Vec<String> = items.borrow().iter().map(|v| v.repr(ReprStyle::Raw)).collect();
                format!("List({})", rendered.join(", "))
            }
            Self::Function(f) => format!("Function({})", f.selector),
            Self::Type(t) => t.name.clone(),
            Self::Instance(i) => i.type_name.clone(),
            Self::Module(m) => format!("Module({})", m.qualified),
        }
    }

    /// Whether the value supports the `each` / `format:` / `update:`
    /// iterable protocol. Only lists are full iterables; strings support
    /// indexed reads but not iteration.
    #[must_use]
    pub fn is_iterable(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Indexed read (`end` absent) or contiguous slice of the same
    /// variant (`end` present). Out-of-range reads yield `Void`.
    pub fn iter(&self, start: i64, end: Option<i64>) -> RunResult<Self> {
        match self {
            Self::Str(s) => {
                let chars: Vec<char> = s.borrow().chars().collect();
                match end {
                    None => Ok(match normalize_index(start, chars.len()) {
                        Some(i) => Self::from_string(chars[i].to_string()),
                        None => Self::void(),
                    }),
                    Some(end) => {
                        let (from, to) = slice_bounds(start, end, chars.len());
                        Ok(Self::from_string(chars[from..to].iter().collect()))
                    }
                }
            }
            Self::List(items) => {
                let items = items.borrow();
                match end {
                    None => Ok(match normalize_index(start, items.len()) {
                        Some(i) => items[i].clone(),
                        None => Self::void(),
                    }),
                    Some(end) => {
                        let (from, to) = slice_bounds(start, end, items.len());
                        Ok(Self::from_list(items[from..to].to_vec()))
                    }
                }
            }
            other => Err(CoalError::not_iterable(&other.object_type())),
        }
    }

    /// In-place indexed write. An index of `length + 1` appends; anything
    /// further out is an `IndexError`. Only lists are writable.
    #[allow(clippy::cast_possible_wrap)]
    pub fn assign(&self, index: i64, value: Self) -> RunResult<()> {
        let Self::List(items) = self else {
            return Err(CoalError::not_writable_iterable(&self.object_type()));
        };
        let mut items = items.borrow_mut();
        let len = items.len();
        if index == len as i64 + 1 {
            items.push(value);
            return Ok(());
        }
        match normalize_index(index, len) {
            Some(i) => {
                items[i] = value;
                Ok(())
            }
            None => Err(CoalError::assignment_out_of_range()),
        }
    }

    /// Dispatches a selector on this value: built-in method tables for
    /// `String`/`List`, attribute getters/setters for instances and
    /// modules, `MethodError` everywhere else.
    pub fn call(&self, selector: &str, args: Vec<Self>) -> RunResult<Self> {
        match self {
            Self::Str(s) => match StrMethods::from_selector(selector) {
                Some(method) => method.call(s, args),
                None => Err(CoalError::no_method("String", selector)),
            },
            Self::List(items) => match ListMethods::from_selector(selector) {
                Some(method) => method.call(items, args),
                None => Err(CoalError::no_method("List", selector)),
            },
            Self::Instance(instance) => instance.call(selector, args),
            Self::Module(module) => module.call(selector, args),
            other => Err(CoalError::no_method(&other.object_type(), selector)),
        }
    }

    /// Equality as observed by the `==` operator: numbers compare
    /// promoted (Bools count as 0/1), strings by content, voids by their
    /// declared type, and the shared kinds by identity of their storage.
    #[must_use]
    pub fn loose_eq(&self, other: &Self) -> bool {
        if let (Some(a), Some(b)) = (self.as_number(), other.as_number()) {
            return match (a, b) {
                (Num::Int(a), Num::Int(b)) => a == b,
                (a, b) => a.as_f64() == b.as_f64(),
            };
        }
        match (self, other) {
            (Self::Void(a), Self::Void(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => *a.borrow() == *b.borrow(),
            (Self::List(a), Self::List(b)) => Rc::ptr_eq(a, b),
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            (Self::Type(a), Self::Type(b)) => Rc::ptr_eq(a, b),
            (Self::Instance(a), Self::Instance(b)) => Rc::ptr_eq(a, b),
            (Self::Module(a), Self::Module(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// The numeric view used by arithmetic and ordering: Ints and Floats
    /// are themselves, Bools are 0/1.
    #[must_use]
    pub(crate) fn as_number(&self) -> Option<Num> {
        match self {
            Self::Int(i) => Some(Num::Int(*i)),
            Self::Float(f) => Some(Num::Float(*f)),
            Self::Bool(b) => Some(Num::Int(i64::from(*b))),
            _ => None,
        }
    }
}

/// A scalar number during arithmetic promotion.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(i) => i as f64,
            Self::Float(f) => f,
        }
    }
}

/// Resolves a possibly-negative index against a length.
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
fn normalize_index(index: i64, len: usize) -> Option<usize> {
    let len_i = len as i64;
    let resolved = if index < 0 { index + len_i } else { index };
    if (0..len_i).contains(&resolved) {
        Some(resolved as usize)
    } else {
        None
    }
}

/// Clamped slice bounds: negative ends count from the end of the
/// sequence, and an inverted range is empty.
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
fn slice_bounds(start: i64, end: i64, len: usize) -> (usize, usize) {
    let len_i = len as i64;
    let clamp = |i: i64| -> usize {
        let resolved = if i < 0 { i + len_i } else { i };
        resolved.clamp(0, len_i) as usize
    };
    let from = clamp(start);
    let to = clamp(end).max(from);
    (from, to)
}

/// Returns a string representation of a float.
///
/// Uses the `ryu` crate, which produces the shortest decimal
/// representation that round-trips through `f64` parsing. Always includes
/// a decimal point or an exponent, and spells the positive exponent sign
/// out (`1e+20`).
pub(crate) fn float_repr(f: f64) -> String {
    if f.is_nan() {
        return "nan".to_string();
    }
    if f.is_infinite() {
        return if f.is_sign_negative() {
            "-inf".to_string()
        } else {
            "inf".to_string()
        };
    }

    let mut buffer = ryu::Buffer::new();
    fix_ryu_exponent(buffer.format(f))
}

/// ryu produces "1e20" where we want "1e+20", and bare integers need a
/// ".0" suffix.
fn fix_ryu_exponent(s: &str) -> String {
    if let Some(e_pos) = s.find('e') {
        let (mantissa, exp_part) = s.split_at(e_pos);
        let exp = &exp_part[1..];
        if !exp.starts_with('-') {
            return format!("{mantissa}e+{exp}");
        }
        return s.to_string();
    }
    if !s.contains('.') {
        return format!("{s}.0");
    }
    s.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_type_tags() {
        assert_eq!(Value::Int(1).object_type(), "Int");
        assert_eq!(Value::Float(1.0).object_type(), "Float");
        assert_eq!(Value::Bool(true).object_type(), "Bool");
        assert_eq!(Value::from_string("x".into()).object_type(), "String");
        assert_eq!(Value::from_list(vec![]).object_type(), "List");
        assert_eq!(Value::void().object_type(), "Void");
        assert_eq!(Value::void_of("Int").object_type(), "Void(Int)");
    }

    #[test]
    fn truthiness_rule() {
        assert!(!Value::void().is_truthy());
        assert!(!Value::void_of("Any").is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(!Value::Float(0.0).is_truthy());
        assert!(!Value::from_string(String::new()).is_truthy());
        assert!(Value::Int(-1).is_truthy());
        // Empty lists are truthy.
        assert!(Value::from_list(vec![]).is_truthy());
    }

    #[test]
    fn repr_forms() {
        assert_eq!(Value::Bool(true).repr(ReprStyle::String), "Bool(true)");
        assert_eq!(Value::void_of("Int").repr(ReprStyle::String), "Void(Int)");
        assert_eq!(Value::Float(3.0).repr(ReprStyle::String), "3.0");
        assert_eq!(Value::from_string("hi".into()).repr(ReprStyle::Raw), "\"hi\"");
        let list = Value::from_list(vec![Value::Int(1), Value::from_string("a".into())]);
        assert_eq!(list.repr(ReprStyle::String), "List(1, \"a\")");
    }

    #[test]
    fn nested_list_repr_recurses_raw() {
        let inner = Value::from_list(vec![Value::Int(2)]);
        let outer = Value::from_list(vec![Value::Int(1), inner]);
        assert_eq!(outer.repr(ReprStyle::String), "List(1, List(2))");
    }

    #[test]
    fn iter_index_and_slice() {
        let list = Value::from_list(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert_eq!(list.iter(1, None).unwrap().repr(ReprStyle::String), "2");
        assert_eq!(list.iter(-1, None).unwrap().repr(ReprStyle::String), "3");
        assert!(matches!(list.iter(9, None).unwrap(), Value::Void(_)));
        assert_eq!(list.iter(0, Some(2)).unwrap().repr(ReprStyle::String), "List(1, 2)");

        let s = Value::from_string("abc".into());
        assert_eq!(s.iter(0, None).unwrap().repr(ReprStyle::String), "a");
        assert_eq!(s.iter(1, Some(3)).unwrap().repr(ReprStyle::String), "bc");
        assert!(matches!(s.iter(5, None).unwrap(), Value::Void(_)));
    }

    #[test]
    fn assign_appends_at_len_plus_one_only() {
        let list = Value::from_list(vec![Value::Int(1), Value::Int(2)]);
        list.assign(0, Value::Int(9)).unwrap();
        assert_eq!(list.repr(ReprStyle::String), "List(9, 2)");
        // length + 1 appends ...
        list.assign(3, Value::Int(3)).unwrap();
        assert_eq!(list.repr(ReprStyle::String), "List(9, 2, 3)");
        // ... but length itself is out of range.
        let err = list.assign(5, Value::Int(4)).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::IndexError);
    }

    #[test]
    fn iter_assign_round_trip_preserves_length() {
        let list = Value::from_list(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        for i in 0..3 {
            let item = list.iter(i, None).unwrap();
            list.assign(i, item).unwrap();
        }
        assert_eq!(list.repr(ReprStyle::String), "List(1, 2, 3)");
    }

    #[test]
    fn loose_eq_promotes_numbers() {
        assert!(Value::Int(3).loose_eq(&Value::Float(3.0)));
        assert!(Value::Bool(true).loose_eq(&Value::Int(1)));
        assert!(!Value::Int(3).loose_eq(&Value::from_string("3".into())));
        assert!(Value::from_string("a".into()).loose_eq(&Value::from_string("a".into())));
    }

    #[test]
    fn float_repr_matches_expected_forms() {
        assert_eq!(float_repr(1.0), "1.0");
        assert_eq!(float_repr(0.5), "0.5");
        assert_eq!(float_repr(1e20), "1e+20");
        assert_eq!(float_repr(1e-7), "1e-7");
        assert_eq!(float_repr(f64::NAN), "nan");
    }
}
