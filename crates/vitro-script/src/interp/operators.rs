//! Binary and unary operator semantics: coercion, equality, comparison.

use crate::ast::{BinaryOperator, UnaryOperator};
use crate::runtime::Value;
use crate::Error;
use std::rc::Rc;

/// Applies a binary operator to two evaluated operands.
pub fn binary(operator: BinaryOperator, left: &Value, right: &Value) -> Result<Value, Error> {
    use BinaryOperator::*;

    let value = match operator {
        Add => add(left, right),
        Subtract => Value::Number(left.to_number() - right.to_number()),
        Multiply => Value::Number(left.to_number() * right.to_number()),
        Divide => Value::Number(left.to_number() / right.to_number()),
        Modulo => Value::Number(left.to_number() % right.to_number()),
        Equal => Value::Boolean(abstract_equals(left, right)),
        NotEqual => Value::Boolean(!abstract_equals(left, right)),
        StrictEqual => Value::Boolean(left == right),
        StrictNotEqual => Value::Boolean(left != right),
        LessThan => compare(left, right, |o| o == std::cmp::Ordering::Less),
        LessThanEqual => compare(left, right, |o| o != std::cmp::Ordering::Greater),
        GreaterThan => compare(left, right, |o| o == std::cmp::Ordering::Greater),
        GreaterThanEqual => compare(left, right, |o| o != std::cmp::Ordering::Less),
    };

    Ok(value)
}

/// Applies a unary operator.
pub fn unary(operator: UnaryOperator, operand: &Value) -> Value {
    match operator {
        UnaryOperator::Minus => Value::Number(-operand.to_number()),
        UnaryOperator::Plus => Value::Number(operand.to_number()),
        UnaryOperator::LogicalNot => Value::Boolean(!operand.to_boolean()),
        UnaryOperator::Typeof => Value::String(operand.type_of().to_string()),
    }
}

/// `+` concatenates when either operand is a string, otherwise adds.
fn add(left: &Value, right: &Value) -> Value {
    match (left, right) {
        (Value::String(_), _) | (_, Value::String(_)) => {
            let mut s = left.to_display_string();
            s.push_str(&right.to_display_string());
            Value::String(s)
        }
        _ => Value::Number(left.to_number() + right.to_number()),
    }
}

/// Relational comparison: string-to-string compares lexically, anything
/// else compares numerically. NaN comparisons are always false.
fn compare(left: &Value, right: &Value, test: impl Fn(std::cmp::Ordering) -> bool) -> Value {
    if let (Value::String(a), Value::String(b)) = (left, right) {
        return Value::Boolean(test(a.cmp(b)));
    }
    let (a, b) = (left.to_number(), right.to_number());
    match a.partial_cmp(&b) {
        Some(ordering) => Value::Boolean(test(ordering)),
        None => Value::Boolean(false),
    }
}

/// Abstract equality (`==`) with type coercion.
pub fn abstract_equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        // Same-type comparisons fall back to strict equality
        (Value::Undefined, Value::Undefined)
        | (Value::Null, Value::Null) => true,
        (Value::Boolean(_), Value::Boolean(_))
        | (Value::Number(_), Value::Number(_))
        | (Value::String(_), Value::String(_))
        | (Value::Object(_), Value::Object(_))
        | (Value::Array(_), Value::Array(_)) => a == b,
        (Value::Function(x), Value::Function(y)) => Rc::ptr_eq(x, y),

        // null == undefined
        (Value::Null, Value::Undefined) | (Value::Undefined, Value::Null) => true,

        // Number vs string: coerce the string
        (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
            let parsed = s.trim().parse::<f64>().unwrap_or(f64::NAN);
            !n.is_nan() && !parsed.is_nan() && *n == parsed
        }

        // Booleans coerce to numbers
        (Value::Boolean(x), other) => {
            abstract_equals(&Value::Number(if *x { 1.0 } else { 0.0 }), other)
        }
        (other, Value::Boolean(y)) => {
            abstract_equals(other, &Value::Number(if *y { 1.0 } else { 0.0 }))
        }

        // Primitive vs object: compare against the object's string form
        (Value::Number(_) | Value::String(_), Value::Object(_) | Value::Array(_)) => {
            abstract_equals(a, &Value::String(b.to_display_string()))
        }
        (Value::Object(_) | Value::Array(_), Value::Number(_) | Value::String(_)) => {
            abstract_equals(&Value::String(a.to_display_string()), b)
        }

        _ => false,
    }
}
