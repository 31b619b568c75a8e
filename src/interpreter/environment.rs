use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::common::token::Token;
use crate::interpreter::error::RuntimeError;
use crate::interpreter::value::Value;

/// A single frame of the lexical environment chain: a name-to-value map,
/// plus an optional link to the enclosing frame. The global frame sits at
/// the root and is never freed while the interpreter lives; every nested
/// `Block`, function call, or loop body acquires a fresh child frame.
#[derive(Debug)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn new() -> Environment {
        Environment {
            values: HashMap::new(),
            enclosing: None,
        }
    }

    pub fn with_enclosing(enclosing: Rc<RefCell<Environment>>) -> Environment {
        Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    /// Binds `name` in the current frame, silently overwriting any existing
    /// binding by that name in this frame (shadowing an outer one if the
    /// name collides there).
    pub fn define(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    /// Looks up `name`, walking outward through the enclosing chain.
    pub fn get(&self, name: &Token) -> Result<Value, RuntimeError> {
        if let Some(value) = self.values.get(&name.lexeme) {
            return Ok(value.clone());
        }
        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow().get(name);
        }
        Err(RuntimeError::undefined_variable(name))
    }

    /// Assigns into the nearest frame (innermost outward) that already
    /// defines `name`. Fails if no frame in the chain defines it.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<(), RuntimeError> {
        if self.values.contains_key(&name.lexeme) {
            self.values.insert(name.lexeme.clone(), value);
            return Ok(());
        }
        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow_mut().assign(name, value);
        }
        Err(RuntimeError::undefined_variable(name))
    }
}

impl Default for Environment {
    fn default() -> Environment {
        Environment::new()
    }
}
