//! End-to-end evaluator tests: declarations, assignment, arithmetic,
//! conditionals, loops, functions, and the scope discipline.

use coal::{run_source, CollectStringPrint, ErrorKind};
use pretty_assertions::assert_eq;

fn run(source: &str) -> String {
    let mut out = CollectStringPrint::new();
    run_source(source, &mut out).unwrap_or_else(|err| panic!("{source:?} failed: {err}"));
    out.into_output()
}

fn run_err(source: &str) -> coal::CoalError {
    let mut out = CollectStringPrint::new();
    run_source(source, &mut out).expect_err("expected an error")
}

/// `let x: Int = 3` then `x = x + 4` prints 7.
#[test]
fn declare_assign_print() {
    assert_eq!(run("let x: Int = 3\nx = x + 4\n[print: x]"), "7\n");
}

/// Compound assignment modes mutate the numeric payload.
#[test]
fn compound_assignment_modes() {
    assert_eq!(run("let x: Int = 10\nx += 5\nx -= 3\nx *= 4\nx /= 6\n[print: x]"), "8\n");
    assert_eq!(run("let f: Float = 1.5\nf *= 2.0\n[print: f]"), "3.0\n");
}

/// String and list compound `+=` mutate in place.
#[test]
fn compound_assignment_on_sequences() {
    assert_eq!(run("let s: String = \"ab\"\ns += \"cd\"\n[print: s]"), "abcd\n");
    assert_eq!(run("let a: List = (1, 2)\na += (3,)\n[print: a]"), "List(1, 2, 3)\n");
}

/// Builtin declared types convert the value through their constructor.
#[test]
fn let_coerces_through_builtin_constructors() {
    assert_eq!(run("let x: Int = 3.9\n[print: x]"), "3\n");
    assert_eq!(run("let s: String = 42\n[print: s]"), "42\n");
    assert_eq!(run("let f: Float = 2\n[print: f]"), "2.0\n");
    assert_eq!(run("let b: Bool = \"true\"\n[print: b]"), "Bool(true)\n");
}

/// Arithmetic closure: Int op Int stays Int, a Float operand widens,
/// comparisons produce Bool.
#[test]
fn arithmetic_promotion() {
    assert_eq!(run("[print: 7 / 2]"), "3\n");
    assert_eq!(run("[print: 7.0 / 2]"), "3.5\n");
    assert_eq!(run("[print: 7 % 3]"), "1\n");
    assert_eq!(run("[print: 6 & 3]"), "2\n");
    assert_eq!(run("[print: 1 << 4]"), "16\n");
    assert_eq!(run("[print: 2 <= 2.0]"), "Bool(true)\n");
    assert_eq!(run("[print: 3 == 3.0]"), "Bool(true)\n");
    assert_eq!(run("[print: \"a\" < \"b\"]"), "Bool(true)\n");
}

#[test]
fn division_by_zero_reports_exception() {
    assert_eq!(run_err("[print: 1 / 0]").kind(), ErrorKind::Exception);
    assert_eq!(run_err("let x: Int = 1\nx /= 0").kind(), ErrorKind::Exception);
}

/// First truthy branch wins; else on all-false.
#[test]
fn conditional_chain() {
    let source = "\
let n: Int = 5
if n < 0 do
  [print: \"neg\"]
elif n == 0 do
  [print: \"zero\"]
else
  [print: \"pos\"]
end";
    assert_eq!(run(source), "pos\n");
}

/// Voids are falsy in every branching position; empty lists are truthy.
#[test]
fn truthiness_in_branches() {
    assert_eq!(run("let x: Int?\nif x do\n  [print: 1]\nelse\n  [print: 2]\nend"), "2\n");
    assert_eq!(run("if () do\n  [print: 1]\nelse\n  [print: 2]\nend"), "1\n");
    assert_eq!(run("if 0 do\n  [print: 1]\nelse\n  [print: 2]\nend"), "2\n");
    assert_eq!(run("if \"\" do\n  [print: 1]\nelse\n  [print: 2]\nend"), "2\n");
}

/// `for 0, 4, 2 as i` prints 0, 2, 4 — the end bound is inclusive.
#[test]
fn counted_for_loop() {
    assert_eq!(run("for 0, 4, 2 as i\n  [print: i]\nend"), "0\n2\n4\n");
    assert_eq!(run("for 1, 3 as i\n  [print: i]\nend"), "1\n2\n3\n");
}

/// The iteration variable is deleted on normal exit but survives `break`.
#[test]
fn loop_variable_lifecycle() {
    let err = run_err("for 0, 2 as i\nend\n[print: i]");
    assert_eq!(err.kind(), ErrorKind::NameError);

    let source = "\
for 0, 5 as i
  if i == 2 do
    break
  end
end
[print: i]";
    assert_eq!(run(source), "2\n");
}

/// A pre-existing loop variable of the wrong type is a TypeError; a
/// compatible one suppresses the loop body entirely.
#[test]
fn for_with_pre_existing_variable() {
    let err = run_err("let i: String = \"x\"\nfor 0, 3 as i\n  [print: i]\nend");
    assert_eq!(err.kind(), ErrorKind::TypeError);

    assert_eq!(run("let i: Int = 9\nfor 0, 3 as i\n  [print: i]\nend\n[print: i]"), "9\n");
}

/// `each` binds each element in turn and deletes the variable on exit.
#[test]
fn each_loop() {
    assert_eq!(run("let a: List = (1, 2, 3)\neach a as v\n  [print: v]\nend"), "1\n2\n3\n");
}

/// A pre-existing `each` variable suppresses iteration entirely.
#[test]
fn each_with_pre_existing_variable_skips() {
    let source = "\
let v: Int = 9
let a: List = (1, 2, 3)
each a as v
  [print: v]
end
[print: v]";
    assert_eq!(run(source), "9\n");
}

#[test]
fn each_requires_a_list() {
    assert_eq!(run_err("each \"abc\" as c\n  [print: c]\nend").kind(), ErrorKind::TypeError);
    assert_eq!(run_err("each 5 as v\n  [print: v]\nend").kind(), ErrorKind::TypeError);
}

/// `while` re-evaluates its test; `next` skips to the next pass.
#[test]
fn while_loop_with_next() {
    let source = "\
let n: Int = 0
let total: Int = 0
while n < 5 do
  n += 1
  if n == 3 do
    next
  end
  total += n
end
[print: total]";
    assert_eq!(run(source), "12\n");
}

#[test]
fn break_and_next_outside_a_loop_are_syntax_errors() {
    assert_eq!(run_err("break").kind(), ErrorKind::SyntaxError);
    assert_eq!(run_err("next").kind(), ErrorKind::SyntaxError);
    // A function body does not inherit the caller's loops.
    let source = "\
def f -> Void
  break
end
for 0, 3 as i
  [f]
end";
    assert_eq!(run_err(source).kind(), ErrorKind::SyntaxError);
}

/// `def add: (Int a) b: (Int) -> Int` called as `[add: 2 b: 40]`.
#[test]
fn function_definition_and_call() {
    let source = "\
def add: (Int a) b: (Int) -> Int
  return a + b
end
[print: [add: 2 b: 40]]";
    assert_eq!(run(source), "42\n");
}

#[test]
fn simple_function_call() {
    assert_eq!(run("def answer -> Int\n  return 42\nend\n[print: [answer]]"), "42\n");
}

/// `return` propagates out of nested suites with its type checked.
#[test]
fn early_return_from_nested_block() {
    let source = "\
def classify: (Int n) -> String
  if n > 0 do
    return \"pos\"
  end
  return \"other\"
end
[print: [classify: 5]]
[print: [classify: -5]]";
    assert_eq!(run(source), "pos\nother\n");
}

#[test]
fn return_type_is_enforced() {
    let source = "\
def f -> Int
  return \"x\"
end
[f]";
    let err = run_err(source);
    assert_eq!(err.kind(), ErrorKind::TypeError);
    assert_eq!(err.to_string(), "TypeError: Invalid return type for \"Int\": \"String\".");
}

/// A function that falls through returns Void, unchecked.
#[test]
fn fall_through_returns_void() {
    assert_eq!(run("def f -> Int\n  let x: Int = 1\nend\n[print: [f]]"), "Void(Void)\n");
}

#[test]
fn argument_count_and_types_are_checked() {
    let def = "def add: (Int a) b: (Int) -> Int\n  return a + b\nend\n";
    let err = run_err(&format!("{def}[add: 2]"));
    assert_eq!(err.kind(), ErrorKind::Exception);
    let err = run_err(&format!("{def}[add: 2 b: \"x\"]"));
    assert_eq!(err.kind(), ErrorKind::TypeError);
}

/// Recursive calls see the sibling functions through the methods
/// snapshot taken at call time.
#[test]
fn recursion_through_methods_snapshot() {
    let source = "\
def fact: (Int n) -> Int
  if n <= 1 do
    return 1
  end
  return n * [fact: n - 1]
end
[print: [fact: 5]]";
    assert_eq!(run(source), "120\n");
}

/// Scope discipline: at depth > 0 the callee reuses the caller's frame,
/// so callee bindings leak into the caller.
#[test]
fn nested_call_shares_caller_frame() {
    let source = "\
def inner: (Int m) -> Int
  return m
end
def outer: (Int n) -> Int
  [inner: 5]
  return m
end
[print: [outer: 1]]";
    assert_eq!(run(source), "5\n");
}

/// Functions called at depth zero get a fresh frame: caller locals are
/// not visible.
#[test]
fn top_level_call_gets_fresh_frame() {
    let source = "\
let hidden: Int = 7
def peek -> Int
  return hidden
end
[peek]";
    assert_eq!(run_err(source).kind(), ErrorKind::NameError);
}

#[test]
fn unknown_name_and_selector_errors() {
    assert_eq!(run_err("[print: zzz]").kind(), ErrorKind::NameError);
    assert_eq!(run_err("x = 1").kind(), ErrorKind::NameError);
    let err = run_err("[frobnicate: 1]");
    assert_eq!(err.kind(), ErrorKind::MethodError);
    assert_eq!(
        err.to_string(),
        "MethodError: \"Builtins\" object has no method/attribute \"frobnicate:\"."
    );
}

/// `&name` references the function registered under `name:`; `&TypeName`
/// references a user type.
#[test]
fn selector_and_type_references() {
    let source = "\
def double: (Int n) -> Int
  return n * 2
end
[print: &double]";
    assert_eq!(run(source), "Function(double:)\n");

    let source = "\
type Point as Object
  init x: (Int)
    [self x: x]
  end
end
[print: &Point]";
    assert_eq!(run(source), "Point\n");

    assert_eq!(run_err("[print: &missing]").kind(), ErrorKind::MethodError);
}

/// Assignment through a typed Void hole: the declared type binds.
#[test]
fn void_hole_assignment() {
    assert_eq!(run("let x: Int?\nx = 3\n[print: x]"), "3\n");
    assert_eq!(run_err("let x: Int?\nx = \"s\"").kind(), ErrorKind::TypeError);
    assert_eq!(run("let x: Any?\nx = \"s\"\n[print: x]"), "s\n");
}

/// Compound assignment through a Void hole is rejected.
#[test]
fn compound_assignment_through_void_is_rejected() {
    assert_eq!(run_err("let x: Int?\nx += 1").kind(), ErrorKind::TypeError);
}

#[test]
fn assignment_type_mismatch_message() {
    let err = run_err("let x: Int = 1\nx = \"s\"");
    assert_eq!(err.to_string(), "TypeError: Wrong value type for Int: String.");
}

/// `exit` and `quit:` carry their status through the error channel.
#[test]
fn exit_statuses() {
    assert_eq!(run_err("exit 3").exit_status(), 3);
    assert_eq!(run_err("exit true").exit_status(), 1);
    assert_eq!(run_err("exit").exit_status(), 0);
    assert_eq!(run_err("[quit]").exit_status(), 0);
    assert_eq!(run_err("[quit: 2]").exit_status(), 2);
    assert_eq!(run_err("exit \"x\"").kind(), ErrorKind::TypeError);
}

/// Output printed before an exit is preserved.
#[test]
fn output_before_exit_is_kept() {
    let mut out = CollectStringPrint::new();
    let err = run_source("[print: \"bye\"]\nexit 1", &mut out).unwrap_err();
    assert_eq!(err.exit_status(), 1);
    assert_eq!(out.output(), "bye\n");
}
