//! Runtime value model: values, objects, environments, callables.

pub mod environment;
pub mod function;
pub mod object;
pub mod value;

pub use environment::{EnvRef, Environment};
pub use function::{Callable, NativeFn, ScriptFunction};
pub use object::Object;
pub use value::{number_to_string, Value};
