//! Conditions, counted `for` loops and `dim`.

use brs_ir::{Block, Stmt, StmtKind};
use brs_values::numeric::int32_from_f64;
use brs_values::{RoArray, Value};

/// Whether a condition holds. Anything equal to `true` does, so nonzero
/// numbers count; every other value is false.
pub fn is_true(value: &Value) -> bool {
    value.equal_to(&Value::Boolean(true))
}

/// The step of a counted loop. Float steps truncate toward zero.
pub fn loop_step(step: Value) -> Value {
    match step.unbox() {
        Value::Float(f) => Value::Int32(int32_from_f64(f.get())),
        other => other,
    }
}

/// Whether a step counts upward. Zero and non-numeric steps count down.
pub fn steps_up(step: &Value) -> bool {
    step.greater_than(&Value::Int32(0))
}

/// A loop whose start is already past its final value in the step's
/// direction runs zero times. So does a loop whose step is zero, which
/// could never reach its final value.
pub fn skips_entirely(start: &Value, final_value: &Value, step: &Value) -> bool {
    let zero = Value::Int32(0);
    step.equal_to(&zero)
        || (start.greater_than(final_value) && step.greater_than(&zero))
        || (start.less_than(final_value) && step.less_than(&zero))
}

/// Whether the loop body runs again for `counter`.
pub fn continues(counter: &Value, final_value: &Value, step_up: bool) -> bool {
    if step_up {
        !counter.greater_than(final_value)
    } else {
        !counter.less_than(final_value)
    }
}

/// Length of one `dim` dimension: the highest index plus one.
///
/// `None` for anything but an integer or float; negative bounds give an
/// empty dimension.
pub fn dimension_size(bound: &Value) -> Option<usize> {
    let highest = match bound.unbox() {
        Value::Int32(v) => i64::from(v),
        Value::Float(f) => i64::from(int32_from_f64(f.get())),
        _ => return None,
    };
    Some(usize::try_from(highest.saturating_add(1)).unwrap_or(0))
}

/// Nested arrays for `dim a[..]`.
///
/// Every dimension but the last holds arrays of the next; the innermost
/// arrays start empty and grow on assignment.
pub fn dim_array(sizes: &[usize]) -> Value {
    Value::object(dim_tree(sizes))
}

fn dim_tree(sizes: &[usize]) -> RoArray {
    let Some((&size, rest)) = sizes.split_first() else {
        return RoArray::new(Vec::new());
    };
    let children = (0..size).map(|_| Value::object(dim_tree(rest))).collect();
    RoArray::new(children)
}

/// Whether `label` is declared in `statements` anywhere a `goto` can
/// reach it. Labels in `try` blocks are unreachable and not counted.
pub fn contains_label(statements: &[Stmt], label: &str) -> bool {
    statements.iter().any(|stmt| stmt_contains_label(stmt, label))
}

fn block_contains_label(block: &Block, label: &str) -> bool {
    contains_label(&block.statements, label)
}

fn stmt_contains_label(stmt: &Stmt, label: &str) -> bool {
    match &stmt.kind {
        StmtKind::Label { name } => name.name.eq_ignore_ascii_case(label),
        StmtKind::Block(block) => block_contains_label(block, label),
        StmtKind::If {
            then_branch,
            else_ifs,
            else_branch,
            ..
        } => {
            block_contains_label(then_branch, label)
                || else_ifs
                    .iter()
                    .any(|else_if| block_contains_label(&else_if.then_branch, label))
                || else_branch
                    .as_ref()
                    .is_some_and(|block| block_contains_label(block, label))
        }
        StmtKind::TryCatch { catch_block, .. } => block_contains_label(catch_block, label),
        StmtKind::For { body, .. }
        | StmtKind::ForEach { body, .. }
        | StmtKind::While { body, .. } => block_contains_label(body, label),
        _ => false,
    }
}

#[cfg(test)]
mod tests;
