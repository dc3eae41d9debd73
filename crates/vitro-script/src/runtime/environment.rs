//! Lexical environments for variable binding.

use super::value::Value;
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;

/// A shared handle to an environment. Closures capture their defining
/// environment, so environments are reference-counted rather than owned
/// by their children.
pub type EnvRef = Rc<RefCell<Environment>>;

/// A lexical environment for variable bindings.
#[derive(Debug, Default)]
pub struct Environment {
    /// The bindings in this environment
    bindings: FxHashMap<String, Binding>,
    /// The outer (parent) environment
    outer: Option<EnvRef>,
}

impl Environment {
    /// Creates a new root environment.
    pub fn new() -> EnvRef {
        Rc::new(RefCell::new(Self::default()))
    }

    /// Creates a new environment nested in `outer`.
    pub fn with_outer(outer: EnvRef) -> EnvRef {
        Rc::new(RefCell::new(Self {
            bindings: FxHashMap::default(),
            outer: Some(outer),
        }))
    }

    /// Declares a variable in this environment.
    pub fn declare(&mut self, name: String, value: Value, mutable: bool) {
        self.bindings.insert(name, Binding { value, mutable });
    }

    /// Gets a variable's value, walking the environment chain.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(binding) = self.bindings.get(name) {
            return Some(binding.value.clone());
        }
        if let Some(outer) = &self.outer {
            return outer.borrow().get(name);
        }
        None
    }

    /// Returns true if `name` is bound anywhere in the chain.
    pub fn has(&self, name: &str) -> bool {
        if self.bindings.contains_key(name) {
            return true;
        }
        match &self.outer {
            Some(outer) => outer.borrow().has(name),
            None => false,
        }
    }

    /// Assigns to an existing variable, walking the environment chain.
    /// Returns false if the name is unbound or bound immutably.
    pub fn assign(&mut self, name: &str, value: Value) -> bool {
        if let Some(binding) = self.bindings.get_mut(name) {
            if !binding.mutable {
                return false;
            }
            binding.value = value;
            return true;
        }
        match &self.outer {
            Some(outer) => outer.borrow_mut().assign(name, value),
            None => false,
        }
    }
}

/// A variable binding.
#[derive(Debug, Clone)]
struct Binding {
    /// The value
    value: Value,
    /// Whether the binding is mutable (var/let vs const)
    mutable: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_lookup_walks_outer_chain() {
        let root = Environment::new();
        root.borrow_mut()
            .declare("x".into(), Value::Number(1.0), true);
        let child = Environment::with_outer(Rc::clone(&root));
        assert_eq!(child.borrow().get("x"), Some(Value::Number(1.0)));
    }

    #[test]
    fn assignment_mutates_the_defining_environment() {
        let root = Environment::new();
        root.borrow_mut()
            .declare("x".into(), Value::Number(1.0), true);
        let child = Environment::with_outer(Rc::clone(&root));
        assert!(child.borrow_mut().assign("x", Value::Number(2.0)));
        assert_eq!(root.borrow().get("x"), Some(Value::Number(2.0)));
    }

    #[test]
    fn const_bindings_reject_assignment() {
        let env = Environment::new();
        env.borrow_mut()
            .declare("k".into(), Value::Number(1.0), false);
        assert!(!env.borrow_mut().assign("k", Value::Number(2.0)));
    }

    #[test]
    fn shadowing_does_not_leak_to_outer() {
        let root = Environment::new();
        root.borrow_mut()
            .declare("x".into(), Value::Number(1.0), true);
        let child = Environment::with_outer(Rc::clone(&root));
        child
            .borrow_mut()
            .declare("x".into(), Value::Number(9.0), true);
        assert_eq!(child.borrow().get("x"), Some(Value::Number(9.0)));
        assert_eq!(root.borrow().get("x"), Some(Value::Number(1.0)));
    }
}
