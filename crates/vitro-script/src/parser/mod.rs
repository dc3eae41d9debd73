//! Recursive descent parser for the script subset.

mod expressions;
#[allow(clippy::module_inception)]
mod parser;

pub use parser::Parser;
