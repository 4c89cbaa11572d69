//! The tree-walking evaluator.
//!
//! Drives a recursive descent over the parsed AST. Statements produce a
//! [`Flow`] describing how the enclosing suite continues; expressions
//! always produce a [`Value`]. Loop control uses the suite-result enum:
//! loops consume `Next`/`Break`, and `Return` propagates up to the
//! function-call path, which enforces the declared return type.

use std::{mem, rc::Rc};

use crate::{
    ast::{AssignMode, BinOp, Expr, InitDecl, Stmt},
    builtins::{self, BuiltinFunctions},
    error::{CoalError, ErrorKind, RunResult},
    io::PrintWriter,
    modules,
    scope::{ScopeFrame, TypeEntry},
    types::{Function, Initializer, Instance, UserType},
    value::{Num, Value},
};

/// How a suite continues after a statement.
#[derive(Debug)]
pub(crate) enum Flow {
    Normal,
    Next,
    Break,
    Return(Value),
}

/// The interpreter state: the scope stack, call depth, lexical loop
/// depth, and the constructor context (`self`).
///
/// The root frame is seeded from the built-ins registry. State persists
/// across [`Interpreter::run`] calls, which is what gives the REPL its
/// session memory.
#[derive(Debug)]
pub struct Interpreter {
    frames: Vec<ScopeFrame>,
    scope_depth: usize,
    loop_depth: usize,
    self_: Option<Rc<Instance>>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            frames: vec![ScopeFrame::base()],
            scope_depth: 0,
            loop_depth: 0,
            self_: None,
        }
    }

    /// Evaluates a parsed program against the current state.
    ///
    /// A top-level `return` is evaluated and discarded, as the original
    /// driver did.
    pub fn run(&mut self, suite: &[Stmt], print: &mut impl PrintWriter) -> RunResult<()> {
        for stmt in suite {
            self.eval_stmt(stmt, print)?;
        }
        Ok(())
    }

    fn frame(&self) -> &ScopeFrame {
        self.frames.last().expect("scope stack is never empty")
    }

    fn frame_mut(&mut self) -> &mut ScopeFrame {
        self.frames.last_mut().expect("scope stack is never empty")
    }

    /// Runs a suite, stopping at the first non-`Normal` flow.
    fn run_suite(&mut self, suite: &[Stmt], print: &mut impl PrintWriter) -> RunResult<Flow> {
        for stmt in suite {
            match self.eval_stmt(stmt, print)? {
                Flow::Normal => {}
                other => return Ok(other),
            }
        }
        Ok(Flow::Normal)
    }

    fn with_loop<T>(&mut self, body: impl FnOnce(&mut Self) -> RunResult<T>) -> RunResult<T> {
        self.loop_depth += 1;
        let result = body(self);
        self.loop_depth -= 1;
        result
    }

    fn eval_stmt(&mut self, stmt: &Stmt, print: &mut impl PrintWriter) -> RunResult<Flow> {
        match stmt {
            Stmt::Import { name, alias } => {
                let Some(module) = modules::create(name) else {
                    return Err(CoalError::unknown_module(name));
                };
                let bind_as = alias.as_ref().unwrap_or(name).clone();
                self.frame_mut().names.insert(bind_as, module);
                Ok(Flow::Normal)
            }
            Stmt::NameDef { name, ty, value } => {
                let value = self.eval_expr(value, print)?;
                let bound = match self.frame().types.get(ty) {
                    Some(TypeEntry::Builtin(builtin)) => builtin.construct(&value)?,
                    Some(TypeEntry::User(_)) => {
                        if value.object_type() != ty.as_str() {
                            return Err(CoalError::wrong_value_type(ty, &value.object_type()));
                        }
                        value
                    }
                    None => return Err(CoalError::unknown_type(ty)),
                };
                self.frame_mut().names.insert(name.clone(), bound);
                Ok(Flow::Normal)
            }
            Stmt::NameDefEmpty { name, ty } => {
                if ty != "Any" && !self.frame().types.contains_key(ty) {
                    return Err(CoalError::unknown_type(ty));
                }
                self.frame_mut().names.insert(name.clone(), Value::void_of(ty));
                Ok(Flow::Normal)
            }
            Stmt::NameAssign { name, mode, value } => {
                let value = self.eval_expr(value, print)?;
                self.assign_name(name, *mode, value)?;
                Ok(Flow::Normal)
            }
            Stmt::IterableItemAssign { name, index, value } => {
                let index = self.eval_expr(index, print)?;
                let value = self.eval_expr(value, print)?;
                let Some(slot) = self.frame().names.get(name).cloned() else {
                    return Err(CoalError::unknown_name(name));
                };
                if !slot.is_iterable() {
                    return Err(CoalError::not_writable_iterable(&slot.object_type()));
                }
                let Value::Int(i) = index else {
                    return Err(CoalError::type_error(format!(
                        "Iterable index must be \"Int\", not \"{}\"",
                        index.object_type()
                    )));
                };
                slot.assign(i, value)?;
                Ok(Flow::Normal)
            }
            Stmt::FuncDef(decl) => {
                let function = Rc::new(Function::from(decl.clone()));
                self.frame_mut().methods.insert(decl.selector.clone(), function);
                Ok(Flow::Normal)
            }
            Stmt::FuncRet(value) => {
                let value = match value {
                    Some(expr) => self.eval_expr(expr, print)?,
                    None => Value::void(),
                };
                Ok(Flow::Return(value))
            }
            Stmt::TypeDef { name, extends, inits } => {
                let user = UserType {
                    name: name.clone(),
                    extends: extends.clone(),
                    inits: inits
                        .iter()
                        .map(|decl: &InitDecl| (decl.selector.clone(), Initializer::from(decl.clone())))
                        .collect(),
                };
                self.frame_mut().types.insert(name.clone(), TypeEntry::User(Rc::new(user)));
                Ok(Flow::Normal)
            }
            Stmt::SelfAssign { .. } => Err(self_outside_constructor()),
            Stmt::If {
                test,
                suite,
                elif_blocks,
                else_suite,
            } => {
                if self.eval_expr(test, print)?.is_truthy() {
                    return self.run_suite(suite, print);
                }
                for (elif_test, elif_suite) in elif_blocks {
                    if self.eval_expr(elif_test, print)?.is_truthy() {
                        return self.run_suite(elif_suite, print);
                    }
                }
                if let Some(else_suite) = else_suite {
                    return self.run_suite(else_suite, print);
                }
                Ok(Flow::Normal)
            }
            Stmt::For {
                start,
                end,
                interval,
                name,
                suite,
            } => self.eval_for(start, end, interval.as_ref(), name, suite, print),
            Stmt::Each { iterable, name, suite } => self.eval_each(iterable, name, suite, print),
            Stmt::While { test, suite } => self.with_loop(|ev| {
                loop {
                    if !ev.eval_expr(test, print)?.is_truthy() {
                        break;
                    }
                    match ev.run_suite(suite, print)? {
                        Flow::Normal | Flow::Next => {}
                        Flow::Break => break,
                        ret @ Flow::Return(_) => return Ok(ret),
                    }
                }
                Ok(Flow::Normal)
            }),
            Stmt::FlowBreak => {
                if self.loop_depth == 0 {
                    return Err(CoalError::flow_outside_loop("break"));
                }
                Ok(Flow::Break)
            }
            Stmt::FlowNext => {
                if self.loop_depth == 0 {
                    return Err(CoalError::flow_outside_loop("next"));
                }
                Ok(Flow::Next)
            }
            Stmt::Exit(value) => {
                let status = match value {
                    None => 0,
                    Some(expr) => match self.eval_expr(expr, print)? {
                        Value::Int(status) => i32::try_from(status).unwrap_or(1),
                        Value::Bool(flag) => i32::from(flag),
                        other => {
                            return Err(CoalError::type_error(format!(
                                "\"exit\" takes \"Int\" or \"Bool\", not \"{}\"",
                                other.object_type()
                            )));
                        }
                    },
                };
                Err(CoalError::exit_with(status))
            }
            Stmt::Expr(expr) => {
                self.eval_expr(expr, print)?;
                Ok(Flow::Normal)
            }
        }
    }

    /// Type-checks and applies a `=` / `+=` / `-=` / `*=` / `/=`.
    fn assign_name(&mut self, name: &str, mode: AssignMode, value: Value) -> RunResult<()> {
        let Some(slot) = self.frame().names.get(name).cloned() else {
            return Err(CoalError::unknown_name(name));
        };
        match &slot {
            Value::Void(of) => {
                if &**of != "Any" && value.object_type() != of.as_ref() {
                    return Err(CoalError::wrong_value_type(format!("Void({of})"), &value.object_type()));
                }
            }
            _ => {
                if slot.object_type() != value.object_type() {
                    return Err(CoalError::wrong_value_type(slot.object_type(), &value.object_type()));
                }
            }
        }

        if mode == AssignMode::Set {
            self.frame_mut().names.insert(name.to_owned(), value);
            return Ok(());
        }

        // Compound modes mutate the bound value.
        let updated = match (&slot, mode) {
            (Value::Void(_), _) => {
                return Err(CoalError::type_error(format!(
                    "Compound assignment on empty value \"{name}\""
                )));
            }
            (Value::Int(a), _) => {
                let Value::Int(b) = value else { unreachable!("type-checked above") };
                Value::Int(match mode {
                    AssignMode::Add => a.wrapping_add(b),
                    AssignMode::Sub => a.wrapping_sub(b),
                    AssignMode::Mul => a.wrapping_mul(b),
                    AssignMode::Div => {
                        if b == 0 {
                            return Err(CoalError::division_by_zero());
                        }
                        floor_div(*a, b)
                    }
                    AssignMode::Set => unreachable!("handled above"),
                })
            }
            (Value::Float(a), _) => {
                let Value::Float(b) = value else { unreachable!("type-checked above") };
                Value::Float(match mode {
                    AssignMode::Add => a + b,
                    AssignMode::Sub => a - b,
                    AssignMode::Mul => a * b,
                    AssignMode::Div => {
                        if b == 0.0 {
                            return Err(CoalError::division_by_zero());
                        }
                        a / b
                    }
                    AssignMode::Set => unreachable!("handled above"),
                })
            }
            (Value::Str(target), AssignMode::Add) => {
                let Value::Str(suffix) = &value else { unreachable!("type-checked above") };
                let suffix = suffix.borrow().clone();
                target.borrow_mut().push_str(&suffix);
                return Ok(());
            }
            (Value::List(target), AssignMode::Add) => {
                let Value::List(extension) = &value else { unreachable!("type-checked above") };
                let extension = extension.borrow().clone();
                target.borrow_mut().extend(extension);
                return Ok(());
            }
            (other, _) => {
                return Err(CoalError::type_error(format!(
                    "Invalid operation \"{}\" for \"{}\"",
                    compound_symbol(mode),
                    other.object_type()
                )));
            }
        };
        self.frame_mut().names.insert(name.to_owned(), updated);
        Ok(())
    }

    fn eval_for(
        &mut self,
        start: &Expr,
        end: &Expr,
        interval: Option<&Expr>,
        name: &str,
        suite: &[Stmt],
        print: &mut impl PrintWriter,
    ) -> RunResult<Flow> {
        let start = self.eval_expr(start, print)?;
        let end = self.eval_expr(end, print)?;
        let interval = match interval {
            Some(expr) => self.eval_expr(expr, print)?,
            None => Value::Int(1),
        };
        let (Value::Int(start), Value::Int(end), Value::Int(interval)) = (start, end, interval) else {
            return Err(CoalError::type_error(
                "The values for \"start\", \"end\" and \"interval\" must be \"Int\"",
            ));
        };

        if let Some(existing) = self.frame().names.get(name) {
            let existing_ty = existing.object_type();
            if existing_ty != "Void(Any)" && existing_ty != "Int" {
                return Err(CoalError::wrong_value_type(existing_ty, "Int"));
            }
            // A compatible pre-existing binding suppresses the loop.
            return Ok(Flow::Normal);
        }

        let flow = self.with_loop(|ev| {
            let mut i = start;
            while i <= end {
                ev.frame_mut().names.insert(name.to_owned(), Value::Int(i));
                match ev.run_suite(suite, print)? {
                    Flow::Normal | Flow::Next => {}
                    Flow::Break => return Ok(Flow::Break),
                    ret @ Flow::Return(_) => return Ok(ret),
                }
                i = i.wrapping_add(interval);
            }
            Ok(Flow::Normal)
        })?;

        match flow {
            // The iteration variable is deleted on normal exit only.
            Flow::Normal => {
                self.frame_mut().names.remove(name);
                Ok(Flow::Normal)
            }
            Flow::Break => Ok(Flow::Normal),
            ret @ Flow::Return(_) => Ok(ret),
            Flow::Next => unreachable!("loops consume Next"),
        }
    }

    fn eval_each(
        &mut self,
        iterable: &Expr,
        name: &str,
        suite: &[Stmt],
        print: &mut impl PrintWriter,
    ) -> RunResult<Flow> {
        let iterable = self.eval_expr(iterable, print)?;
        if !iterable.is_iterable() {
            return Err(CoalError::not_iterable(&iterable.object_type()));
        }
        // A pre-existing loop variable suppresses iteration entirely.
        if self.frame().names.contains_key(name) {
            return Ok(Flow::Normal);
        }

        let length = match iterable.call("length:", vec![])? {
            Value::Int(length) => length,
            other => return Err(CoalError::not_iterable(&other.object_type())),
        };

        let flow = self.with_loop(|ev| {
            let mut i = 0;
            while i < length {
                let item = iterable.iter(i, None)?;
                ev.frame_mut().names.insert(name.to_owned(), item);
                match ev.run_suite(suite, print)? {
                    Flow::Normal | Flow::Next => {}
                    Flow::Break => return Ok(Flow::Break),
                    ret @ Flow::Return(_) => return Ok(ret),
                }
                i += 1;
            }
            Ok(Flow::Normal)
        })?;

        match flow {
            Flow::Normal => {
                self.frame_mut().names.remove(name);
                Ok(Flow::Normal)
            }
            Flow::Break => Ok(Flow::Normal),
            ret @ Flow::Return(_) => Ok(ret),
            Flow::Next => unreachable!("loops consume Next"),
        }
    }

    pub(crate) fn eval_expr(&mut self, expr: &Expr, print: &mut impl PrintWriter) -> RunResult<Value> {
        match expr {
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Int(i) => Ok(Value::Int(*i)),
            Expr::Float(f) => Ok(Value::Float(*f)),
            Expr::Str(s) => Ok(Value::from_string(s.clone())),
            Expr::List(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(self.eval_expr(item, print)?);
                }
                Ok(Value::from_list(values))
            }
            Expr::Name(name) => self
                .frame()
                .names
                .get(name)
                .cloned()
                .ok_or_else(|| CoalError::unknown_name(name)),
            Expr::FuncRef(name) => {
                let selector = format!("{name}:");
                self.frame()
                    .methods
                    .get(&selector)
                    .cloned()
                    .map(Value::Function)
                    .ok_or_else(|| CoalError::no_method("Builtins", &selector))
            }
            Expr::TypeRef(name) => match self.frame().types.get(name) {
                Some(TypeEntry::User(user)) => Ok(Value::Type(user.clone())),
                _ => Err(CoalError::unknown_type(name)),
            },
            Expr::NameFromSelf(name) => {
                let Some(instance) = &self.self_ else {
                    return Err(self_outside_constructor());
                };
                let attrs = instance.attrs.borrow();
                attrs.get(name).cloned().ok_or_else(|| CoalError::unknown_name(name))
            }
            Expr::ItemFromIterable { target, index, end } => {
                let target = self.eval_expr(target, print)?;
                let index = self.index_value(index, print)?;
                let end = match end {
                    Some(expr) => Some(self.index_value(expr, print)?),
                    None => None,
                };
                target.iter(index, end)
            }
            Expr::LocalCall { selector, args } => {
                let values = self.eval_args(args, print)?;
                if let Some(builtin) = BuiltinFunctions::from_selector(selector) {
                    return builtins::call_builtin(builtin, &values, print);
                }
                if let Some(function) = self.frame().methods.get(selector).cloned() {
                    return self.call_function(&function, values, print);
                }
                Err(CoalError::no_method("Builtins", selector))
            }
            Expr::MethodCall { receiver, selector, args } => {
                let receiver = self.eval_expr(receiver, print)?;
                let values = self.eval_args(args, print)?;
                receiver.call(selector, values)
            }
            Expr::TypeCall { ty, selector, args } => {
                let values = self.eval_args(args, print)?;
                self.construct_instance(ty, selector.as_deref(), values, print)
            }
            Expr::Binary { op, lhs, rhs } => {
                let lhs = self.eval_expr(lhs, print)?;
                let rhs = self.eval_expr(rhs, print)?;
                eval_binary(*op, &lhs, &rhs)
            }
        }
    }

    fn eval_args(&mut self, args: &[Expr], print: &mut impl PrintWriter) -> RunResult<Vec<Value>> {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval_expr(arg, print)?);
        }
        Ok(values)
    }

    fn index_value(&mut self, expr: &Expr, print: &mut impl PrintWriter) -> RunResult<i64> {
        match self.eval_expr(expr, print)? {
            Value::Int(i) => Ok(i),
            other => Err(CoalError::type_error(format!(
                "Iterable index must be \"Int\", not \"{}\"",
                other.object_type()
            ))),
        }
    }

    /// The function call protocol.
    ///
    /// At depth zero the callee gets a fresh frame (built-in types, a
    /// snapshot of the caller's methods, built-in names); at any deeper
    /// level the caller's frame is reused, so bindings made by the callee
    /// are visible to the caller afterwards. `simple` functions skip
    /// argument checking and binding entirely.
    fn call_function(
        &mut self,
        function: &Function,
        args: Vec<Value>,
        print: &mut impl PrintWriter,
    ) -> RunResult<Value> {
        if !function.simple {
            if args.len() != function.param_names.len() {
                return Err(CoalError::wrong_argument_count(&function.selector));
            }
            for (i, arg) in args.iter().enumerate() {
                if arg.object_type() != function.param_types[i] {
                    return Err(CoalError::wrong_argument_type(&function.selector, &arg.object_type()));
                }
            }
        }

        let pushed = if self.scope_depth == 0 {
            let mut frame = ScopeFrame::for_call(&self.frame().methods);
            if !function.simple {
                for (i, arg) in args.into_iter().enumerate() {
                    frame.names.insert(function.binding_name(i).to_owned(), arg);
                }
            }
            self.frames.push(frame);
            true
        } else {
            if !function.simple {
                for (i, arg) in args.into_iter().enumerate() {
                    let bind_as = function.binding_name(i).to_owned();
                    self.frame_mut().names.insert(bind_as, arg);
                }
            }
            false
        };
        self.scope_depth += 1;
        let saved_loop_depth = mem::replace(&mut self.loop_depth, 0);

        let result = self.run_suite(&function.suite, print);

        self.loop_depth = saved_loop_depth;
        self.scope_depth -= 1;
        if pushed {
            self.frames.pop();
        }

        match result? {
            Flow::Return(value) => {
                if value.object_type() != function.return_type {
                    return Err(CoalError::type_error(format!(
                        "Invalid return type for \"{}\": \"{}\"",
                        function.return_type,
                        value.object_type()
                    )));
                }
                Ok(value)
            }
            _ => Ok(Value::void()),
        }
    }

    /// Constructor evaluation (`[Point x: 3 y: 4]`).
    ///
    /// The matching initializer's parameters are bound into a fresh frame.
    /// Walking the suite, `[self name: value]` evaluates its value in that
    /// frame and writes the new instance's attribute; any other statement
    /// executes in the caller's frame with the constructor context set, so
    /// `self.name` reads resolve against the instance under construction.
    fn construct_instance(
        &mut self,
        ty: &str,
        selector: Option<&str>,
        args: Vec<Value>,
        print: &mut impl PrintWriter,
    ) -> RunResult<Value> {
        let user = match self.frame().types.get(ty) {
            Some(TypeEntry::User(user)) => user.clone(),
            Some(TypeEntry::Builtin(_)) => {
                return Err(CoalError::no_constructor(ty, selector.unwrap_or_default()));
            }
            None => return Err(CoalError::unknown_type(ty)),
        };
        let selector = selector.unwrap_or_default();
        let Some(init) = user.inits.get(selector) else {
            return Err(CoalError::no_constructor(&user.name, selector));
        };

        if args.len() != init.param_names.len() {
            return Err(CoalError::wrong_argument_count(&init.selector));
        }
        for (i, arg) in args.iter().enumerate() {
            if arg.object_type() != init.param_types[i] {
                return Err(CoalError::wrong_argument_type(&init.selector, &arg.object_type()));
            }
        }

        let mut init_frame = ScopeFrame::base();
        for (i, arg) in args.into_iter().enumerate() {
            init_frame.names.insert(init.binding_name(i).to_owned(), arg);
        }

        let instance = Rc::new(Instance::new(&user.name));
        let saved_self = self.self_.replace(instance.clone());
        let saved_loop_depth = mem::replace(&mut self.loop_depth, 0);
        self.frames.push(init_frame);

        let mut outcome = Ok(());
        for stmt in &init.suite {
            let step = match stmt {
                Stmt::SelfAssign { name, value } => self.eval_expr(value, print).map(|value| {
                    instance.attrs.borrow_mut().insert(name.clone(), value);
                }),
                other => {
                    let init_frame = self.frames.pop().expect("init frame was pushed");
                    let step = self.eval_stmt(other, print).map(|_| ());
                    self.frames.push(init_frame);
                    step
                }
            };
            if let Err(err) = step {
                outcome = Err(err);
                break;
            }
        }

        self.frames.pop();
        self.loop_depth = saved_loop_depth;
        self.self_ = saved_self;
        outcome?;
        Ok(Value::Instance(instance))
    }
}

fn self_outside_constructor() -> CoalError {
    CoalError::new(
        ErrorKind::Exception,
        "Call to \"self\" from outside a type constructor",
    )
}

fn compound_symbol(mode: AssignMode) -> &'static str {
    match mode {
        AssignMode::Set => "=",
        AssignMode::Add => "+=",
        AssignMode::Sub => "-=",
        AssignMode::Mul => "*=",
        AssignMode::Div => "/=",
    }
}

/// Applies a binary operator to evaluated operands, promoting the result:
/// Int op Int stays Int, any Float operand widens to Float, comparisons
/// produce Bool.
fn eval_binary(op: BinOp, lhs: &Value, rhs: &Value) -> RunResult<Value> {
    match op {
        BinOp::Eq => Ok(Value::Bool(lhs.loose_eq(rhs))),
        BinOp::NotEq => Ok(Value::Bool(!lhs.loose_eq(rhs))),
        BinOp::Gt | BinOp::Lt | BinOp::Ge | BinOp::Le => compare_order(op, lhs, rhs),
        BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod => arithmetic(op, lhs, rhs),
        BinOp::BitAnd | BinOp::BitOr | BinOp::BitXor | BinOp::Shl | BinOp::Shr => bitwise(op, lhs, rhs),
    }
}

fn invalid_operands(op: BinOp, lhs: &Value, rhs: &Value) -> CoalError {
    CoalError::type_error(format!(
        "Invalid types for \"{}\": \"{}\", \"{}\"",
        op.symbol(),
        lhs.object_type(),
        rhs.object_type()
    ))
}

fn compare_order(op: BinOp, lhs: &Value, rhs: &Value) -> RunResult<Value> {
    let ordering = match (lhs, rhs) {
        (Value::Str(a), Value::Str(b)) => a.borrow().cmp(&b.borrow()),
        _ => match (lhs.as_number(), rhs.as_number()) {
            (Some(Num::Int(a)), Some(Num::Int(b))) => a.cmp(&b),
            (Some(a), Some(b)) => a
                .as_f64()
                .partial_cmp(&b.as_f64())
                .ok_or_else(|| invalid_operands(op, lhs, rhs))?,
            _ => return Err(invalid_operands(op, lhs, rhs)),
        },
    };
    let result = match op {
        BinOp::Gt => ordering.is_gt(),
        BinOp::Lt => ordering.is_lt(),
        BinOp::Ge => ordering.is_ge(),
        BinOp::Le => ordering.is_le(),
        _ => unreachable!("compare_order only receives ordering operators"),
    };
    Ok(Value::Bool(result))
}

fn arithmetic(op: BinOp, lhs: &Value, rhs: &Value) -> RunResult<Value> {
    let (Some(a), Some(b)) = (lhs.as_number(), rhs.as_number()) else {
        return Err(invalid_operands(op, lhs, rhs));
    };
    if let (Num::Int(a), Num::Int(b)) = (a, b) {
        let result = match op {
            BinOp::Add => a.wrapping_add(b),
            BinOp::Sub => a.wrapping_sub(b),
            BinOp::Mul => a.wrapping_mul(b),
            BinOp::Div => {
                if b == 0 {
                    return Err(CoalError::division_by_zero());
                }
                floor_div(a, b)
            }
            BinOp::Mod => {
                if b == 0 {
                    return Err(CoalError::division_by_zero());
                }
                floor_mod(a, b)
            }
            _ => unreachable!("arithmetic only receives arithmetic operators"),
        };
        return Ok(Value::Int(result));
    }

    let (a, b) = (a.as_f64(), b.as_f64());
    let result = match op {
        BinOp::Add => a + b,
        BinOp::Sub => a - b,
        BinOp::Mul => a * b,
        BinOp::Div => {
            if b == 0.0 {
                return Err(CoalError::division_by_zero());
            }
            a / b
        }
        BinOp::Mod => {
            if b == 0.0 {
                return Err(CoalError::division_by_zero());
            }
            float_floor_mod(a, b)
        }
        _ => unreachable!("arithmetic only receives arithmetic operators"),
    };
    Ok(Value::Float(result))
}

fn bitwise(op: BinOp, lhs: &Value, rhs: &Value) -> RunResult<Value> {
    let (Some(Num::Int(a)), Some(Num::Int(b))) = (lhs.as_number(), rhs.as_number()) else {
        return Err(invalid_operands(op, lhs, rhs));
    };
    let result = match op {
        BinOp::BitAnd => a & b,
        BinOp::BitOr => a | b,
        BinOp::BitXor => a ^ b,
        BinOp::Shl | BinOp::Shr => {
            if b < 0 {
                return Err(CoalError::new(ErrorKind::Exception, "Negative shift count"));
            }
            if b >= 64 {
                if op == BinOp::Shl { 0 } else { a >> 63 }
            } else {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let shift = b as u32;
                if op == BinOp::Shl {
                    a.wrapping_shl(shift)
                } else {
                    a >> shift
                }
            }
        }
        _ => unreachable!("bitwise only receives bitwise operators"),
    };
    Ok(Value::Int(result))
}

/// Floor division: the quotient rounds toward negative infinity, so
/// `-7 / 2 == -4`.
fn floor_div(a: i64, b: i64) -> i64 {
    let q = a.wrapping_div(b);
    let r = a.wrapping_rem(b);
    if r != 0 && ((r < 0) != (b < 0)) { q - 1 } else { q }
}

/// Floor modulo: the result takes the divisor's sign, so `-7 % 3 == 2`.
fn floor_mod(a: i64, b: i64) -> i64 {
    let r = a.wrapping_rem(b);
    if r != 0 && ((r < 0) != (b < 0)) { r + b } else { r }
}

fn float_floor_mod(a: f64, b: f64) -> f64 {
    let r = a % b;
    if r != 0.0 && ((r < 0.0) != (b < 0.0)) { r + b } else { r }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_arithmetic_stays_int() {
        let out = eval_binary(BinOp::Add, &Value::Int(2), &Value::Int(3)).unwrap();
        assert!(matches!(out, Value::Int(5)));
        let out = eval_binary(BinOp::Div, &Value::Int(7), &Value::Int(2)).unwrap();
        assert!(matches!(out, Value::Int(3)));
    }

    #[test]
    fn float_operand_promotes() {
        let out = eval_binary(BinOp::Mul, &Value::Int(2), &Value::Float(1.5)).unwrap();
        assert!(matches!(out, Value::Float(f) if f == 3.0));
    }

    #[test]
    fn comparisons_produce_bool() {
        let out = eval_binary(BinOp::Le, &Value::Int(2), &Value::Float(2.0)).unwrap();
        assert!(matches!(out, Value::Bool(true)));
        let out = eval_binary(BinOp::Lt, &Value::from_string("a".into()), &Value::from_string("b".into())).unwrap();
        assert!(matches!(out, Value::Bool(true)));
    }

    #[test]
    fn division_by_zero_is_reported() {
        let err = eval_binary(BinOp::Div, &Value::Int(1), &Value::Int(0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Exception);
    }

    #[test]
    fn floor_semantics_match_the_original() {
        assert_eq!(floor_div(-7, 2), -4);
        assert_eq!(floor_div(7, -2), -4);
        assert_eq!(floor_mod(-7, 3), 2);
        assert_eq!(floor_mod(7, -3), -2);
    }

    #[test]
    fn string_arithmetic_is_rejected() {
        let err = eval_binary(
            BinOp::Add,
            &Value::from_string("a".into()),
            &Value::from_string("b".into()),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeError);
    }

    #[test]
    fn bitwise_requires_ints() {
        let out = eval_binary(BinOp::Shl, &Value::Int(1), &Value::Int(4)).unwrap();
        assert!(matches!(out, Value::Int(16)));
        let err = eval_binary(BinOp::BitAnd, &Value::Float(1.0), &Value::Int(1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeError);
    }
}
