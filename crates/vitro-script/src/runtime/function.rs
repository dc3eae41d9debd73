//! Callable values: script functions and native host functions.

use super::environment::EnvRef;
use super::value::Value;
use crate::ast::Statement;
use crate::Error;
use std::fmt;
use std::rc::Rc;

/// The signature of a native host function.
pub type NativeFn = Box<dyn Fn(&[Value]) -> Result<Value, Error>>;

/// Something that can be called.
pub enum Callable {
    /// A function defined in script source
    Script(ScriptFunction),
    /// A function provided by the host
    Native {
        /// Diagnostic name
        name: String,
        /// The implementation
        func: NativeFn,
    },
}

impl Callable {
    /// Wraps a native host function as a function value.
    pub fn native(name: impl Into<String>, func: impl Fn(&[Value]) -> Result<Value, Error> + 'static) -> Value {
        Value::Function(Rc::new(Callable::Native {
            name: name.into(),
            func: Box::new(func),
        }))
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Script(func) => f
                .debug_struct("ScriptFunction")
                .field("name", &func.name)
                .field("params", &func.params)
                .finish_non_exhaustive(),
            Callable::Native { name, .. } => {
                f.debug_struct("Native").field("name", name).finish_non_exhaustive()
            }
        }
    }
}

/// A function defined in script source, carrying its closure.
pub struct ScriptFunction {
    /// Optional name (for diagnostics)
    pub name: Option<String>,
    /// Parameter names
    pub params: Vec<String>,
    /// The function body
    pub body: Rc<Vec<Statement>>,
    /// The environment captured at definition time
    pub closure: EnvRef,
    /// Arrow functions keep the lexical `this` instead of binding their own
    pub is_arrow: bool,
}
