//! Intrinsic methods on primitive and built-in receivers.
//!
//! There is no prototype chain in this engine; method calls on strings,
//! numbers, arrays, and objects dispatch here by receiver type.

use crate::runtime::{number_to_string, Value};
use crate::Error;

use super::Interpreter;

/// Calls an intrinsic method on `receiver`. Returns a TypeError if the
/// receiver has no such method.
pub fn call_intrinsic(
    interp: &mut Interpreter,
    receiver: &Value,
    method: &str,
    args: &[Value],
) -> Result<Value, Error> {
    match receiver {
        Value::String(s) => string_method(s, method, args),
        Value::Number(n) => number_method(*n, method, args),
        Value::Array(_) => array_method(interp, receiver, method, args),
        Value::Object(object) => match method {
            "hasOwnProperty" => {
                let key = arg_string(args, 0);
                Ok(Value::Boolean(object.borrow().has(&key)))
            }
            "toString" => Ok(Value::String(receiver.to_display_string())),
            _ => Err(method_error(receiver, method)),
        },
        _ => Err(method_error(receiver, method)),
    }
}

fn method_error(receiver: &Value, method: &str) -> Error {
    Error::Type(format!(
        "{}.{} is not a function",
        receiver.type_of(),
        method
    ))
}

fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or(Value::Undefined)
}

fn arg_string(args: &[Value], index: usize) -> String {
    args.get(index)
        .map(Value::to_display_string)
        .unwrap_or_default()
}

/// Normalizes a possibly negative index against a length.
fn normalize_index(index: f64, len: usize) -> usize {
    if index.is_nan() {
        return 0;
    }
    if index < 0.0 {
        let from_end = len as f64 + index;
        if from_end < 0.0 {
            0
        } else {
            from_end as usize
        }
    } else {
        (index as usize).min(len)
    }
}

fn string_method(s: &str, method: &str, args: &[Value]) -> Result<Value, Error> {
    let chars: Vec<char> = s.chars().collect();

    let value = match method {
        "charAt" => {
            let index = arg(args, 0).to_number();
            if index >= 0.0 && (index as usize) < chars.len() {
                Value::String(chars[index as usize].to_string())
            } else {
                Value::String(String::new())
            }
        }
        "indexOf" => {
            let needle = arg_string(args, 0);
            match s.find(&needle) {
                Some(byte_pos) => Value::Number(s[..byte_pos].chars().count() as f64),
                None => Value::Number(-1.0),
            }
        }
        "includes" => Value::Boolean(s.contains(&arg_string(args, 0))),
        "startsWith" => Value::Boolean(s.starts_with(&arg_string(args, 0))),
        "endsWith" => Value::Boolean(s.ends_with(&arg_string(args, 0))),
        "slice" | "substring" => {
            let len = chars.len();
            let start = match args.first() {
                Some(v) => normalize_index(v.to_number(), len),
                None => 0,
            };
            let end = match args.get(1) {
                Some(v) if !v.is_undefined() => normalize_index(v.to_number(), len),
                _ => len,
            };
            if start < end {
                Value::String(chars[start..end].iter().collect())
            } else {
                Value::String(String::new())
            }
        }
        "split" => {
            let separator = arg(args, 0);
            let parts: Vec<Value> = if separator.is_undefined() {
                vec![Value::String(s.to_string())]
            } else {
                let separator = separator.to_display_string();
                if separator.is_empty() {
                    chars
                        .iter()
                        .map(|c| Value::String(c.to_string()))
                        .collect()
                } else {
                    s.split(&separator)
                        .map(|part| Value::String(part.to_string()))
                        .collect()
                }
            };
            Value::array(parts)
        }
        "replace" => {
            // String patterns replace the first occurrence only
            let pattern = arg_string(args, 0);
            let replacement = arg_string(args, 1);
            Value::String(s.replacen(&pattern, &replacement, 1))
        }
        "toUpperCase" => Value::String(s.to_uppercase()),
        "toLowerCase" => Value::String(s.to_lowercase()),
        "trim" => Value::String(s.trim().to_string()),
        "concat" => {
            let mut out = s.to_string();
            for a in args {
                out.push_str(&a.to_display_string());
            }
            Value::String(out)
        }
        "repeat" => {
            let count = arg(args, 0).to_number();
            if count < 0.0 || !count.is_finite() {
                return Err(Error::Range("Invalid count value".into()));
            }
            Value::String(s.repeat(count as usize))
        }
        "padStart" | "padEnd" => {
            let target = arg(args, 0).to_number().max(0.0) as usize;
            let pad = match args.get(1) {
                Some(v) if !v.is_undefined() => v.to_display_string(),
                _ => " ".to_string(),
            };
            let current = chars.len();
            if current >= target || pad.is_empty() {
                Value::String(s.to_string())
            } else {
                let fill: String = pad.chars().cycle().take(target - current).collect();
                if method == "padStart" {
                    Value::String(format!("{}{}", fill, s))
                } else {
                    Value::String(format!("{}{}", s, fill))
                }
            }
        }
        "toString" | "valueOf" => Value::String(s.to_string()),
        _ => return Err(method_error(&Value::String(s.to_string()), method)),
    };

    Ok(value)
}

fn number_method(n: f64, method: &str, args: &[Value]) -> Result<Value, Error> {
    let value = match method {
        "toFixed" => {
            let digits = arg(args, 0).to_number();
            if !(0.0..=100.0).contains(&digits) && !args.is_empty() {
                return Err(Error::Range("toFixed() digits argument must be between 0 and 100".into()));
            }
            Value::String(format!("{:.prec$}", n, prec = digits.max(0.0) as usize))
        }
        "toString" | "valueOf" => Value::String(number_to_string(n)),
        _ => return Err(method_error(&Value::Number(n), method)),
    };

    Ok(value)
}

fn array_method(
    interp: &mut Interpreter,
    receiver: &Value,
    method: &str,
    args: &[Value],
) -> Result<Value, Error> {
    let Value::Array(elements) = receiver else {
        return Err(method_error(receiver, method));
    };

    let value = match method {
        "push" => {
            let mut elements = elements.borrow_mut();
            elements.extend(args.iter().cloned());
            Value::Number(elements.len() as f64)
        }
        "pop" => elements.borrow_mut().pop().unwrap_or(Value::Undefined),
        "indexOf" => {
            let needle = arg(args, 0);
            let position = elements.borrow().iter().position(|v| *v == needle);
            match position {
                Some(i) => Value::Number(i as f64),
                None => Value::Number(-1.0),
            }
        }
        "includes" => {
            let needle = arg(args, 0);
            Value::Boolean(elements.borrow().iter().any(|v| *v == needle))
        }
        "join" => {
            let separator = match args.first() {
                Some(v) if !v.is_undefined() => v.to_display_string(),
                _ => ",".to_string(),
            };
            let joined = elements
                .borrow()
                .iter()
                .map(|v| {
                    if v.is_nullish() {
                        String::new()
                    } else {
                        v.to_display_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(&separator);
            Value::String(joined)
        }
        "slice" => {
            let snapshot = elements.borrow();
            let len = snapshot.len();
            let start = match args.first() {
                Some(v) => normalize_index(v.to_number(), len),
                None => 0,
            };
            let end = match args.get(1) {
                Some(v) if !v.is_undefined() => normalize_index(v.to_number(), len),
                _ => len,
            };
            if start < end {
                Value::array(snapshot[start..end].to_vec())
            } else {
                Value::array(Vec::new())
            }
        }
        "concat" => {
            let mut out = elements.borrow().clone();
            for a in args {
                match a {
                    Value::Array(other) => out.extend(other.borrow().iter().cloned()),
                    other => out.push(other.clone()),
                }
            }
            Value::array(out)
        }
        "reverse" => {
            elements.borrow_mut().reverse();
            receiver.clone()
        }
        "map" => {
            let callback = arg(args, 0);
            let snapshot = elements.borrow().clone();
            let mut out = Vec::with_capacity(snapshot.len());
            for (i, element) in snapshot.into_iter().enumerate() {
                out.push(interp.call_value(
                    &callback,
                    Value::Undefined,
                    &[element, Value::Number(i as f64)],
                )?);
            }
            Value::array(out)
        }
        "filter" => {
            let callback = arg(args, 0);
            let snapshot = elements.borrow().clone();
            let mut out = Vec::new();
            for (i, element) in snapshot.into_iter().enumerate() {
                let keep = interp.call_value(
                    &callback,
                    Value::Undefined,
                    &[element.clone(), Value::Number(i as f64)],
                )?;
                if keep.to_boolean() {
                    out.push(element);
                }
            }
            Value::array(out)
        }
        "forEach" => {
            let callback = arg(args, 0);
            let snapshot = elements.borrow().clone();
            for (i, element) in snapshot.into_iter().enumerate() {
                interp.call_value(
                    &callback,
                    Value::Undefined,
                    &[element, Value::Number(i as f64)],
                )?;
            }
            Value::Undefined
        }
        "toString" => Value::String(receiver.to_display_string()),
        _ => return Err(method_error(receiver, method)),
    };

    Ok(value)
}
