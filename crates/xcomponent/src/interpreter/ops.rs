//! Binary operators and output conversion.
//!
//! Booleans take part in arithmetic and comparison as 0 and 1. Strings only
//! support `+` (concatenation) and equality.

use crate::interpreter::EvalError;
use crate::parser::ast::BinaryOp;
use crate::types::{Markup, Value};

/// Apply a binary operator to two evaluated operands.
pub fn binary(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    match op {
        BinaryOp::Add => add(left, right),
        BinaryOp::Sub => arithmetic(op, left, right, "subtraction", i64::checked_sub),
        BinaryOp::Mul => arithmetic(op, left, right, "multiplication", i64::checked_mul),
        BinaryOp::Div => divide(left, right),
        BinaryOp::Eq => Ok(Value::Bool(equals(left, right))),
        BinaryOp::Ne => Ok(Value::Bool(!equals(left, right))),
        BinaryOp::Gt => match (left.as_int(), right.as_int()) {
            (Some(a), Some(b)) => Ok(Value::Bool(a > b)),
            _ => Err(EvalError::type_mismatch("Invalid types for comparison")),
        },
    }
}

fn add(left: &Value, right: &Value) -> Result<Value, EvalError> {
    match (left, right) {
        (Value::Str(a), Value::Str(b)) => Ok(Value::Str(format!("{a}{b}"))),
        (Value::Node(a), Value::Node(b)) => Ok(Value::Node(Markup::new(format!("{a}{b}")))),
        (Value::Node(a), Value::Str(b)) => Ok(Value::Node(Markup::new(format!("{a}{b}")))),
        (Value::Str(a), Value::Node(b)) => Ok(Value::Node(Markup::new(format!("{a}{b}")))),
        _ => arithmetic(BinaryOp::Add, left, right, "addition", i64::checked_add),
    }
}

fn arithmetic(
    op: BinaryOp,
    left: &Value,
    right: &Value,
    name: &str,
    apply: fn(i64, i64) -> Option<i64>,
) -> Result<Value, EvalError> {
    let (Some(a), Some(b)) = (left.as_int(), right.as_int()) else {
        return Err(EvalError::type_mismatch(format!("Invalid types for {name}")));
    };
    apply(a, b)
        .map(Value::Int)
        .ok_or(EvalError::IntegerOverflow { op: op.symbol() })
}

/// Integer division, truncating toward zero.
fn divide(left: &Value, right: &Value) -> Result<Value, EvalError> {
    let (Some(a), Some(b)) = (left.as_int(), right.as_int()) else {
        return Err(EvalError::type_mismatch("Invalid types for division"));
    };
    if b == 0 {
        return Err(EvalError::DivisionByZero);
    }
    a.checked_div(b)
        .map(Value::Int)
        .ok_or(EvalError::IntegerOverflow { op: "/" })
}

/// Equality used by `==` and `!=`.
///
/// Values of incompatible kinds are unequal rather than an error.
pub fn equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::Node(a), Value::Node(b)) => a == b,
        (Value::Str(a), Value::Node(b)) | (Value::Node(b), Value::Str(a)) => a == b.as_str(),
        (Value::List(a), Value::List(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| equals(x, y))
        }
        _ => match (left.as_int(), right.as_int()) {
            (Some(a), Some(b)) => a == b,
            _ => left == right,
        },
    }
}

/// Convert a value to output text.
///
/// Lists render as the concatenation of their elements. Records and
/// functions have no textual form.
pub fn stringify(value: &Value) -> Result<String, EvalError> {
    let mut out = String::new();
    write_value(value, &mut out)?;
    Ok(out)
}

fn write_value(value: &Value, out: &mut String) -> Result<(), EvalError> {
    match value {
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Int(n) => out.push_str(&n.to_string()),
        Value::Str(s) => out.push_str(s),
        Value::Node(markup) => out.push_str(markup.as_str()),
        Value::List(items) => {
            for item in items {
                write_value(item, out)?;
            }
        }
        Value::Record(_) | Value::Function(_) => {
            return Err(EvalError::type_mismatch(format!(
                "Cannot render {} value",
                value.kind()
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn booleans_coerce_in_arithmetic() {
        let sum = binary(BinaryOp::Add, &Value::Bool(true), &Value::Int(2)).unwrap();
        assert_eq!(sum, Value::Int(3));
        let diff = binary(BinaryOp::Sub, &Value::Bool(false), &Value::Bool(true)).unwrap();
        assert_eq!(diff, Value::Int(-1));
    }

    #[test]
    fn division_truncates_toward_zero() {
        let q = binary(BinaryOp::Div, &Value::Int(-7), &Value::Int(2)).unwrap();
        assert_eq!(q, Value::Int(-3));
    }

    #[test]
    fn division_by_zero_fails() {
        let err = binary(BinaryOp::Div, &Value::Int(1), &Value::Bool(false)).unwrap_err();
        assert!(matches!(err, EvalError::DivisionByZero));
    }

    #[test]
    fn overflow_is_reported() {
        let err = binary(BinaryOp::Mul, &Value::Int(i64::MAX), &Value::Int(2)).unwrap_err();
        assert!(matches!(err, EvalError::IntegerOverflow { op: "*" }));
    }

    #[test]
    fn markup_counts_as_text_for_addition() {
        let node = Value::Node(Markup::new("<b>y</b>"));
        let sum = binary(BinaryOp::Add, &Value::from("x"), &node).unwrap();
        assert_eq!(sum, Value::Node(Markup::new("x<b>y</b>")));
        let err = binary(BinaryOp::Add, &node, &Value::Int(1)).unwrap_err();
        assert_eq!(err.to_string(), "Invalid types for addition");
    }

    #[test]
    fn incompatible_kinds_are_unequal() {
        assert!(!equals(&Value::from("1"), &Value::Int(1)));
        assert!(equals(&Value::from("<b/>"), &Value::Node(Markup::new("<b/>"))));
    }

    #[test]
    fn lists_stringify_by_concatenation() {
        let list = Value::list([1_i64, 2, 3]);
        assert_eq!(stringify(&list).unwrap(), "123");
    }

    #[test]
    fn records_cannot_be_rendered() {
        let record = Value::record(HashMap::<String, Value>::new());
        let err = stringify(&record).unwrap_err();
        assert_eq!(err.to_string(), "Cannot render record value");
    }
}
