//! Execution: the interpreter and operator/method semantics.

pub mod interpreter;
pub mod methods;
pub mod operators;

pub use interpreter::Interpreter;
