#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use brs_values::Collection;
use pretty_assertions::assert_eq;

fn child_lengths(value: &Value) -> Vec<usize> {
    let children = value
        .as_object()
        .unwrap()
        .with(|array: &RoArray| array.elements().to_vec())
        .unwrap();
    children
        .iter()
        .map(|child| child.as_object().unwrap().with(RoArray::len).unwrap())
        .collect()
}

#[test]
fn only_true_like_conditions_hold() {
    assert!(is_true(&Value::Boolean(true)));
    assert!(is_true(&Value::Int32(3)));
    assert!(!is_true(&Value::Boolean(false)));
    assert!(!is_true(&Value::Int32(0)));
    assert!(!is_true(&Value::string("true")));
    assert!(!is_true(&Value::Invalid));
}

#[test]
fn float_steps_truncate() {
    assert_eq!(loop_step(Value::float(2.7)), Value::Int32(2));
    assert_eq!(loop_step(Value::float(-1.5)), Value::Int32(-1));
    assert_eq!(loop_step(Value::Double(0.5)), Value::Double(0.5));
}

#[test]
fn increasing_step_with_decreasing_bound_skips() {
    assert!(skips_entirely(&Value::Int32(5), &Value::Int32(1), &Value::Int32(1)));
    assert!(skips_entirely(&Value::Int32(1), &Value::Int32(5), &Value::Int32(-1)));
    assert!(!skips_entirely(&Value::Int32(1), &Value::Int32(5), &Value::Int32(1)));
    assert!(!skips_entirely(&Value::Int32(5), &Value::Int32(5), &Value::Int32(-1)));
}

#[test]
fn zero_step_skips() {
    assert!(skips_entirely(&Value::Int32(5), &Value::Int32(1), &Value::Int32(0)));
    assert!(skips_entirely(&Value::Int32(1), &Value::Int32(5), &Value::Int32(0)));
}

#[test]
fn loop_bounds_are_inclusive() {
    let last = Value::Int32(3);
    assert!(continues(&Value::Int32(3), &last, true));
    assert!(!continues(&Value::Int32(4), &last, true));
    assert!(continues(&Value::Int32(3), &last, false));
    assert!(!continues(&Value::Int32(2), &last, false));
    assert!(steps_up(&Value::Int32(2)));
    assert!(!steps_up(&Value::Int32(-2)));
}

#[test]
fn dimension_is_highest_index_plus_one() {
    assert_eq!(dimension_size(&Value::Int32(2)), Some(3));
    assert_eq!(dimension_size(&Value::float(1.9)), Some(2));
    assert_eq!(dimension_size(&Value::Int32(-5)), Some(0));
    assert_eq!(dimension_size(&Value::string("2")), None);
    assert_eq!(dimension_size(&Value::Double(2.0)), None);
}

#[test]
fn dim_builds_nested_arrays() {
    let grid = dim_array(&[2, 3]);
    assert_eq!(child_lengths(&grid), vec![3, 3]);

    let row = dim_array(&[3]);
    assert_eq!(child_lengths(&row), vec![0, 0, 0]);

    let obj = row.as_object().unwrap();
    let count = obj.with_collection_mut(|c: &mut dyn Collection| c.elements().len());
    assert_eq!(count, Some(3));
}

fn label(name: &str) -> Stmt {
    let at = brs_ir::Location::on_line("main.brs", 1, 0, 4);
    Stmt::new(
        StmtKind::Label {
            name: brs_ir::Identifier::new(name, at.clone()),
        },
        at,
    )
}

fn block(statements: Vec<Stmt>) -> Block {
    Block::new(statements, brs_ir::Location::on_line("main.brs", 1, 0, 4))
}

fn try_catch(try_block: Vec<Stmt>, catch_block: Vec<Stmt>) -> Stmt {
    let at = brs_ir::Location::on_line("main.brs", 2, 0, 9);
    Stmt::new(
        StmtKind::TryCatch {
            try_block: block(try_block),
            catch_block: block(catch_block),
            error_binding: brs_ir::Identifier::new("e", at.clone()),
        },
        at,
    )
}

#[test]
fn labels_are_found_case_insensitively() {
    let statements = vec![label("Retry")];
    assert!(contains_label(&statements, "retry"));
    assert!(!contains_label(&statements, "done"));
}

#[test]
fn labels_in_catch_blocks_count_but_not_in_try_blocks() {
    let statements = vec![try_catch(vec![label("inner")], vec![label("handler")])];
    assert!(contains_label(&statements, "handler"));
    assert!(!contains_label(&statements, "inner"));
}

#[test]
fn labels_in_nested_blocks_count() {
    let at = brs_ir::Location::on_line("main.brs", 3, 0, 9);
    let condition = brs_ir::Expr::literal(brs_ir::Literal::Boolean(true), at.clone());
    let nested = Stmt::new(
        StmtKind::While {
            condition: condition.clone(),
            body: block(vec![Stmt::new(
                StmtKind::If {
                    condition,
                    then_branch: block(Vec::new()),
                    else_ifs: Vec::new(),
                    else_branch: Some(block(vec![label("deep")])),
                },
                at.clone(),
            )]),
        },
        at,
    );
    assert!(contains_label(&[nested], "deep"));
}
