use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::common::ast::FunctionDecl;
use crate::interpreter::control::Signal;
use crate::interpreter::environment::Environment;
use crate::interpreter::error::RuntimeError;
use crate::interpreter::interp::Interpreter;
use crate::interpreter::value::Value;

/// Anything that can be invoked with a fixed arity: a user-declared
/// function or a native primitive. `call` takes its own lifetime rather
/// than one owned by the trait so `Rc<dyn Callable>` stays object-safe.
pub trait Callable: fmt::Debug {
    fn arity(&self) -> usize;

    /// `"<fn NAME>"` for user functions, `"<native fn>"` for natives.
    fn describe(&self) -> String;

    fn call<'out>(
        &self,
        interpreter: &mut Interpreter<'out>,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError>;
}

/// A user-declared function. Captures the environment active at its
/// *declaration* site (a real lexical closure), not the environment at its
/// call site.
#[derive(Debug)]
pub struct LoxFunction {
    declaration: Rc<FunctionDecl>,
    closure: Rc<RefCell<Environment>>,
}

impl LoxFunction {
    pub fn new(declaration: Rc<FunctionDecl>, closure: Rc<RefCell<Environment>>) -> LoxFunction {
        LoxFunction { declaration, closure }
    }
}

impl Callable for LoxFunction {
    fn arity(&self) -> usize {
        self.declaration.params.len()
    }

    fn describe(&self) -> String {
        format!("<fn {}>", self.declaration.name.lexeme)
    }

    fn call<'out>(
        &self,
        interpreter: &mut Interpreter<'out>,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        let mut call_env = Environment::with_enclosing(Rc::clone(&self.closure));
        for (param, arg) in self.declaration.params.iter().zip(args) {
            call_env.define(&param.lexeme, arg);
        }

        match interpreter.execute_block(&self.declaration.body, Rc::new(RefCell::new(call_env))) {
            Ok(()) => Ok(Value::Nil),
            Err(Signal::Return(value)) => Ok(value),
            Err(Signal::Error(error)) => Err(error),
        }
    }
}

/// The one built-in primitive the language ships with: wall-clock time in
/// milliseconds, as a number.
#[derive(Debug)]
pub struct NativeClock;

impl Callable for NativeClock {
    fn arity(&self) -> usize {
        0
    }

    fn describe(&self) -> String {
        "<native fn>".to_string()
    }

    fn call<'out>(
        &self,
        _interpreter: &mut Interpreter<'out>,
        _args: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as f64)
            .unwrap_or(0.0);
        Ok(Value::Number(millis))
    }
}
