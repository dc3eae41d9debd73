//! Script value representation.
//!
//! Values are request-scoped and single-threaded; objects, arrays, and
//! functions are `Rc` references, so a cached value handed out twice is
//! the same object, not a copy.

use super::function::Callable;
use super::object::Object;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A script value.
#[derive(Debug, Clone)]
pub enum Value {
    /// undefined
    Undefined,
    /// null
    Null,
    /// Boolean value
    Boolean(bool),
    /// Number (IEEE 754 double)
    Number(f64),
    /// String
    String(String),
    /// Object reference
    Object(Rc<RefCell<Object>>),
    /// Array reference
    Array(Rc<RefCell<Vec<Value>>>),
    /// Function reference
    Function(Rc<Callable>),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => {
                // NaN != NaN
                if a.is_nan() && b.is_nan() {
                    false
                } else {
                    a == b
                }
            }
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Value {
    /// Creates a fresh empty object value.
    pub fn object() -> Self {
        Value::Object(Rc::new(RefCell::new(Object::new())))
    }

    /// Creates an array value from elements.
    pub fn array(elements: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(elements)))
    }

    /// Returns true if this value is undefined.
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Returns true if this value is nullish (null or undefined).
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// Returns true if this value is a function.
    pub fn is_function(&self) -> bool {
        matches!(self, Value::Function(_))
    }

    /// Converts the value to a boolean (ToBoolean).
    pub fn to_boolean(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Number(n) => !n.is_nan() && *n != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Object(_) | Value::Array(_) | Value::Function(_) => true,
        }
    }

    /// Converts the value to a number (ToNumber).
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Boolean(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Number(n) => *n,
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    trimmed.parse::<f64>().unwrap_or(f64::NAN)
                }
            }
            Value::Object(_) | Value::Array(_) | Value::Function(_) => f64::NAN,
        }
    }

    /// Converts the value to a string (ToString).
    pub fn to_display_string(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Array(elements) => elements
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
                .join(","),
            other => other.to_string(),
        }
    }

    /// Returns the type of this value as a string (typeof).
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "object", // Historical quirk
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Object(_) | Value::Array(_) => "object",
            Value::Function(_) => "function",
        }
    }

    /// Gets a property from an object value, if this is one.
    pub fn get_property(&self, key: &str) -> Option<Value> {
        match self {
            Value::Object(object) => object.borrow().get(key).cloned(),
            _ => None,
        }
    }

    /// Sets a property on an object value. Returns false for non-objects.
    pub fn set_property(&self, key: impl Into<String>, value: Value) -> bool {
        match self {
            Value::Object(object) => {
                object.borrow_mut().set(key.into(), value);
                true
            }
            _ => false,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Undefined
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", number_to_string(*n)),
            Value::String(s) => write!(f, "{}", s),
            Value::Object(_) => write!(f, "[object Object]"),
            Value::Array(elements) => {
                write!(f, "[")?;
                for (i, element) in elements.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                write!(f, "]")
            }
            Value::Function(callable) => match callable.as_ref() {
                Callable::Script(func) => {
                    if let Some(name) = &func.name {
                        write!(f, "[Function: {}]", name)
                    } else {
                        write!(f, "[Function (anonymous)]")
                    }
                }
                Callable::Native { name, .. } => {
                    write!(f, "[Function: {} (native)]", name)
                }
            },
        }
    }
}

/// Formats a number the way scripts print them: integral values without
/// a trailing `.0`.
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == n.trunc() && n.abs() < 1e21 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Builds an object [`Value`] from key/value pairs.
///
/// ```
/// use vitro_script::{obj, Value};
///
/// let user = obj! {
///     "name" => Value::String("ada".into()),
///     "admin" => Value::Boolean(true),
/// };
/// assert_eq!(user.get_property("name"), Some(Value::String("ada".into())));
/// ```
#[macro_export]
macro_rules! obj {
    () => {
        $crate::Value::object()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let object = $crate::Value::object();
        $(object.set_property($key, $value);)+
        object
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_equality_uses_reference_identity_for_objects() {
        let a = Value::object();
        let b = a.clone();
        let c = Value::object();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn nan_is_not_equal_to_itself() {
        assert_ne!(Value::Number(f64::NAN), Value::Number(f64::NAN));
    }

    #[test]
    fn to_boolean_follows_truthiness() {
        assert!(!Value::Undefined.to_boolean());
        assert!(!Value::Number(0.0).to_boolean());
        assert!(!Value::String(String::new()).to_boolean());
        assert!(Value::String("x".into()).to_boolean());
        assert!(Value::object().to_boolean());
    }

    #[test]
    fn number_formatting_drops_integral_fraction() {
        assert_eq!(number_to_string(42.0), "42");
        assert_eq!(number_to_string(3.5), "3.5");
        assert_eq!(number_to_string(f64::NAN), "NaN");
    }

    #[test]
    fn obj_macro_builds_objects() {
        let value = obj! { "a" => Value::Number(1.0) };
        assert_eq!(value.get_property("a"), Some(Value::Number(1.0)));
    }
}
