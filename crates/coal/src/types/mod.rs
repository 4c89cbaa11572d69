//! Runtime object kinds that back the [`Value`](crate::value::Value) sum:
//! callable functions, user-defined types and their instances, built-in
//! modules, and the built-in method tables of `String` and `List`.

pub(crate) mod class;
pub(crate) mod function;
pub(crate) mod list;
pub(crate) mod module;
pub(crate) mod str;

pub(crate) use class::{Initializer, Instance, UserType};
pub(crate) use function::Function;
pub(crate) use module::Module;
