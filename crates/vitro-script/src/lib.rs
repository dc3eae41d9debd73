// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Vitro Contributors

//! # vitro-script
//!
//! A small, sandboxed script engine for the subset of JavaScript that
//! server-rendered component modules actually use: variables, functions
//! (including arrows and closures), objects, arrays, template literals,
//! and the common string/number/array methods.
//!
//! There is no I/O, no timers, no prototype mutation, and no `new`; the
//! host decides exactly which bindings a script can see, which is what
//! makes per-request module execution safe.
//!
//! ## Quick Start
//!
//! ```
//! use vitro_script::{Engine, Value};
//!
//! let mut engine = Engine::new();
//! let result = engine.eval("1 + 2").unwrap();
//! assert_eq!(result, Value::Number(3.0));
//! ```
//!
//! Hosts embed the engine by evaluating a source body against an explicit
//! set of bindings:
//!
//! ```
//! use vitro_script::{Engine, Value};
//!
//! let mut engine = Engine::new();
//! let result = engine
//!     .eval_with_bindings("greeting + '!'", vec![
//!         ("greeting".to_string(), Value::String("hi".into())),
//!     ])
//!     .unwrap();
//! assert_eq!(result, Value::String("hi!".into()));
//! ```

#![warn(clippy::all)]

pub mod ast;
pub mod interp;
pub mod lexer;
pub mod parser;
pub mod runtime;

use std::fmt;

pub use interp::Interpreter;
pub use runtime::{Callable, EnvRef, Environment, NativeFn, Object, ScriptFunction, Value};

use parser::Parser;

/// An error raised during parsing or execution.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Malformed source code
    Syntax(String),
    /// An operation applied to a value of the wrong type
    Type(String),
    /// An unresolvable identifier
    Reference(String),
    /// A value outside its valid range (including call depth)
    Range(String),
    /// A `throw` statement reached the top of the script
    Thrown(String),
    /// An error raised by a host-provided native function
    Host(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Syntax(msg) => write!(f, "SyntaxError: {}", msg),
            Error::Type(msg) => write!(f, "TypeError: {}", msg),
            Error::Reference(msg) => write!(f, "ReferenceError: {}", msg),
            Error::Range(msg) => write!(f, "RangeError: {}", msg),
            Error::Thrown(msg) => write!(f, "Error: {}", msg),
            Error::Host(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Parses source text into a program AST.
pub fn parse(source: &str) -> Result<ast::Program, Error> {
    Parser::new(source).parse_program()
}

/// The script engine: a persistent global scope plus an interpreter.
///
/// `eval` runs against the engine's global scope, so a REPL session keeps
/// its bindings between lines. `eval_with_bindings` runs in a fresh
/// isolated scope instead and is the entry point hosts use for sandboxed
/// module execution.
pub struct Engine {
    globals: EnvRef,
    interp: Interpreter,
}

impl Engine {
    /// Creates a new engine with a `console` binding in its global scope.
    pub fn new() -> Self {
        let globals = Environment::new();

        let console = Value::object();
        console.set_property(
            "log",
            Callable::native("log", |args| {
                let line = args
                    .iter()
                    .map(Value::to_display_string)
                    .collect::<Vec<_>>()
                    .join(" ");
                println!("{}", line);
                Ok(Value::Undefined)
            }),
        );
        console.set_property(
            "error",
            Callable::native("error", |args| {
                let line = args
                    .iter()
                    .map(Value::to_display_string)
                    .collect::<Vec<_>>()
                    .join(" ");
                eprintln!("{}", line);
                Ok(Value::Undefined)
            }),
        );
        globals.borrow_mut().declare("console".into(), console, false);

        Self {
            globals,
            interp: Interpreter::new(),
        }
    }

    /// Evaluates source in the engine's global scope, returning the value
    /// of the last expression statement.
    pub fn eval(&mut self, source: &str) -> Result<Value, Error> {
        let program = parse(source)?;
        self.interp.run(&program, &self.globals)
    }

    /// Evaluates source in a fresh scope seeded with exactly the given
    /// bindings. The engine's globals are not visible to the script.
    pub fn eval_with_bindings(
        &mut self,
        source: &str,
        bindings: Vec<(String, Value)>,
    ) -> Result<Value, Error> {
        let program = parse(source)?;
        let scope = Environment::new();
        {
            let mut env = scope.borrow_mut();
            for (name, value) in bindings {
                env.declare(name, value, true);
            }
        }
        self.interp.run(&program, &scope)
    }

    /// Calls a function value with `undefined` as `this`.
    pub fn call(&mut self, func: &Value, args: &[Value]) -> Result<Value, Error> {
        self.interp.call_value(func, Value::Undefined, args)
    }

    /// Calls a function value with an explicit `this`.
    pub fn call_with_this(
        &mut self,
        func: &Value,
        this: Value,
        args: &[Value],
    ) -> Result<Value, Error> {
        self.interp.call_value(func, this, args)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
