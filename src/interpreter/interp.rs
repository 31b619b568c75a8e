use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use crate::common::ast::{Expr, Stmt};
use crate::common::token::{Token, TokenKind};
use crate::interpreter::callable::{LoxFunction, NativeClock};
use crate::interpreter::control::Signal;
use crate::interpreter::environment::Environment;
use crate::interpreter::error::RuntimeError;
use crate::interpreter::value::Value;

/// Walks statements in order, evaluating expressions to [`Value`]s against
/// a lexically-nested [`Environment`] chain. Dispatch is a match on each
/// node's variant; there is no intermediate bytecode.
pub struct Interpreter<'out> {
    globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    output: &'out mut dyn Write,
}

impl<'out> Interpreter<'out> {
    pub fn new(output: &'out mut dyn Write) -> Interpreter<'out> {
        let globals = Rc::new(RefCell::new(Environment::new()));
        globals
            .borrow_mut()
            .define("clock", Value::Callable(Rc::new(NativeClock)));

        Interpreter {
            environment: Rc::clone(&globals),
            globals,
            output,
        }
    }

    /// Runs a whole program. A `Return` signal reaching here would mean the
    /// parser let a top-level `return` through, which it does not.
    pub fn interpret(&mut self, program: &[Stmt]) -> Result<(), RuntimeError> {
        for stmt in program {
            match self.execute(stmt) {
                Ok(()) => {}
                Err(Signal::Error(error)) => return Err(error),
                Err(Signal::Return(_)) => {
                    unreachable!("parser rejects return statements outside of a function body")
                }
            }
        }
        Ok(())
    }

    /// Executes `statements` against a fresh `environment`, restoring the
    /// previously active environment on every exit path — normal
    /// completion, a propagating error, or a `Return` signal. This
    /// restoration is the single most important invariant of the
    /// interpreter: callers must never observe a corrupted environment
    /// chain after a block or function call, however it exited.
    pub fn execute_block(
        &mut self,
        statements: &[Stmt],
        environment: Rc<RefCell<Environment>>,
    ) -> Result<(), Signal> {
        let previous = Rc::clone(&self.environment);
        self.environment = environment;

        let result = statements.iter().try_for_each(|stmt| self.execute(stmt));

        self.environment = previous;
        result
    }

    fn execute(&mut self, stmt: &Stmt) -> Result<(), Signal> {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
                Ok(())
            }
            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                let _ = writeln!(self.output, "{}", value);
                Ok(())
            }
            Stmt::Var { name, initializer } => {
                let value = self.evaluate(initializer)?;
                self.environment.borrow_mut().define(&name.lexeme, value);
                Ok(())
            }
            Stmt::Block(body) => {
                let enclosing = Rc::clone(&self.environment);
                self.execute_block(body, Rc::new(RefCell::new(Environment::with_enclosing(enclosing))))
            }
            Stmt::If { cond, then_branch, else_branch } => {
                if self.evaluate(cond)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(())
                }
            }
            Stmt::While { cond, body } => {
                while self.evaluate(cond)?.is_truthy() {
                    self.execute(body)?;
                }
                Ok(())
            }
            Stmt::Function(declaration) => {
                let function = LoxFunction::new(Rc::clone(declaration), Rc::clone(&self.environment));
                self.environment
                    .borrow_mut()
                    .define(&declaration.name.lexeme, Value::Callable(Rc::new(function)));
                Ok(())
            }
            Stmt::Return { value, .. } => {
                let value = self.evaluate(value)?;
                Err(Signal::Return(value))
            }
        }
    }

    fn evaluate(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Literal(literal) => Ok(Value::from(literal.clone())),
            Expr::Grouping(inner) => self.evaluate(inner),
            Expr::Unary { op, operand } => self.evaluate_unary(op, operand),
            Expr::Binary { left, op, right } => self.evaluate_binary(left, op, right),
            Expr::Logical { op, left, right } => self.evaluate_logical(op, left, right),
            Expr::Variable(name) => self.environment.borrow().get(name),
            Expr::Assign { name, value } => {
                let value = self.evaluate(value)?;
                self.environment.borrow_mut().assign(name, value.clone())?;
                Ok(value)
            }
            Expr::Call { callee, closing_paren, args } => self.evaluate_call(callee, closing_paren, args),
        }
    }

    fn evaluate_unary(&mut self, op: &Token, operand: &Expr) -> Result<Value, RuntimeError> {
        let value = self.evaluate(operand)?;
        match op.kind {
            TokenKind::Minus => match value {
                Value::Number(n) => Ok(Value::Number(-n)),
                _ => Err(RuntimeError::new(op, "Operand must be a number.")),
            },
            TokenKind::Bang => match value {
                Value::Bool(b) => Ok(Value::Bool(!b)),
                _ => Err(RuntimeError::new(op, "Operand must be a boolean.")),
            },
            other => unreachable!("parser only produces Minus/Bang unary operators, got {:?}", other),
        }
    }

    fn evaluate_logical(&mut self, op: &Token, left: &Expr, right: &Expr) -> Result<Value, RuntimeError> {
        let left = self.evaluate(left)?;
        match op.kind {
            TokenKind::Or if left.is_truthy() => Ok(left),
            TokenKind::Or => self.evaluate(right),
            TokenKind::And if !left.is_truthy() => Ok(left),
            TokenKind::And => self.evaluate(right),
            other => unreachable!("parser only produces Or/And logical operators, got {:?}", other),
        }
    }

    fn evaluate_binary(&mut self, left: &Expr, op: &Token, right: &Expr) -> Result<Value, RuntimeError> {
        // Both operands are evaluated fully, left before right, before any
        // operator dispatch — this ordering is observable via side effects.
        let left = self.evaluate(left)?;
        let right = self.evaluate(right)?;

        use TokenKind::*;
        match op.kind {
            Minus => Ok(Value::Number(number_operand(op, &left)? - number_operand(op, &right)?)),
            Star => Ok(Value::Number(number_operand(op, &left)? * number_operand(op, &right)?)),
            Slash => {
                let denom = number_operand(op, &right)?;
                if denom == 0.0 {
                    return Err(RuntimeError::division_by_zero(op));
                }
                Ok(Value::Number(number_operand(op, &left)? / denom))
            }
            Greater => Ok(Value::Bool(number_operand(op, &left)? > number_operand(op, &right)?)),
            GreaterEqual => Ok(Value::Bool(number_operand(op, &left)? >= number_operand(op, &right)?)),
            Less => Ok(Value::Bool(number_operand(op, &left)? < number_operand(op, &right)?)),
            LessEqual => Ok(Value::Bool(number_operand(op, &left)? <= number_operand(op, &right)?)),
            Plus => match (left, right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                (Value::String(a), Value::String(b)) => Ok(Value::String(a + &b)),
                _ => Err(RuntimeError::new(op, "Operation '+' exists only on numbers and strings")),
            },
            EqualEqual => Ok(Value::Bool(left.lox_eq(&right))),
            BangEqual => Ok(Value::Bool(!left.lox_eq(&right))),
            other => unreachable!("parser only produces binary operators, got {:?}", other),
        }
    }

    fn evaluate_call(&mut self, callee: &Expr, closing_paren: &Token, args: &[Expr]) -> Result<Value, RuntimeError> {
        let callee = self.evaluate(callee)?;

        let mut arguments = Vec::with_capacity(args.len());
        for arg in args {
            arguments.push(self.evaluate(arg)?);
        }

        let callable = match &callee {
            Value::Callable(callable) => Rc::clone(callable),
            _ => return Err(RuntimeError::new(closing_paren, "Can only call functions and classes.")),
        };

        if arguments.len() != callable.arity() {
            return Err(RuntimeError::new(
                closing_paren,
                format!("Expected {} arguments but got {}.", callable.arity(), arguments.len()),
            ));
        }

        tracing::trace!(callee = %callable.describe(), args = arguments.len(), "calling function");
        callable.call(self, arguments)
    }
}

fn number_operand(op: &Token, value: &Value) -> Result<f64, RuntimeError> {
    match value {
        Value::Number(n) => Ok(*n),
        _ => Err(RuntimeError::new(op, "Operand must be a number.")),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::common::source::Source;
    use crate::compiler::{lex, parse};

    fn run(source: &str) -> String {
        let src = Source::source(source);
        let (tokens, errors) = lex::lex(&src);
        assert!(errors.is_empty(), "unexpected lex errors: {:?}", errors);
        let program = parse::parse(tokens).expect("expected a successful parse");

        let mut out = Vec::new();
        {
            let mut interpreter = Interpreter::new(&mut out);
            interpreter.interpret(&program).expect("expected successful interpretation");
        }
        String::from_utf8(out).unwrap()
    }

    fn run_err(source: &str) -> RuntimeError {
        let src = Source::source(source);
        let (tokens, _) = lex::lex(&src);
        let program = parse::parse(tokens).unwrap();
        let mut out = Vec::new();
        let mut interpreter = Interpreter::new(&mut out);
        interpreter.interpret(&program).unwrap_err()
    }

    #[test]
    fn arithmetic_precedence() {
        assert_eq!(run("print 1 + 2 * 3;"), "7\n");
    }

    #[test]
    fn block_scoping_shadows_and_restores() {
        assert_eq!(run("var a = 1; { var a = 2; print a; } print a;"), "2\n1\n");
    }

    #[test]
    fn string_concatenation() {
        assert_eq!(run("var a = \"hi\"; var b = \"!\"; print a + b;"), "hi!\n");
    }

    #[test]
    fn recursive_fibonacci() {
        assert_eq!(
            run("fun fib(n) { if (n < 2) return n; return fib(n-1) + fib(n-2); } print fib(7);"),
            "13\n"
        );
    }

    #[test]
    fn while_loop_counts_up() {
        assert_eq!(run("var i = 0; while (i < 3) { print i; i = i + 1; }"), "0\n1\n2\n");
    }

    #[test]
    fn division_by_zero_is_a_distinct_runtime_error() {
        let error = run_err("print 1/0;");
        assert_eq!(error.kind, crate::interpreter::error::RuntimeErrorKind::DivisionByZero);
        assert!(error.message.contains("Cannot divide by zero"));
    }

    #[test]
    fn uninitialized_var_is_nil() {
        assert_eq!(run("var x; print x;"), "nil\n");
    }

    #[test]
    fn equality_semantics() {
        assert_eq!(
            run("print \"a\" == \"a\"; print \"a\" == \"b\"; print nil == nil;"),
            "true\nfalse\ntrue\n"
        );
    }

    #[test]
    fn closures_capture_declaration_environment() {
        assert_eq!(
            run("fun counter() { var i = 0; fun inc() { i = i + 1; return i; } return inc; } var c = counter(); print c(); print c(); print c();"),
            "1\n2\n3\n"
        );
    }

    #[test]
    fn two_independent_closures_do_not_share_state() {
        assert_eq!(
            run("fun counter() { var i = 0; fun inc() { i = i + 1; return i; } return inc; } var a = counter(); var b = counter(); print a(); print a(); print b();"),
            "1\n2\n1\n"
        );
    }

    #[test]
    fn unary_bang_requires_boolean_operand() {
        let error = run_err("print !1;");
        assert_eq!(error.message, "Operand must be a boolean.");
    }

    #[test]
    fn plus_rejects_mixed_types() {
        let error = run_err("print 1 + \"a\";");
        assert_eq!(error.message, "Operation '+' exists only on numbers and strings");
    }

    #[test]
    fn calling_with_wrong_arity_is_a_runtime_error() {
        let error = run_err("fun f(a, b) { return a + b; } f(1);");
        assert_eq!(error.message, "Expected 2 arguments but got 1.");
    }

    #[test]
    fn calling_a_non_callable_is_a_runtime_error() {
        let error = run_err("var x = 1; x();");
        assert_eq!(error.message, "Can only call functions and classes.");
    }

    #[test]
    fn short_circuit_or_does_not_evaluate_right_side() {
        // assigning inside the right operand would make b visible if evaluated;
        // it must not be, since the left side of `or` is already truthy.
        assert_eq!(
            run("var b = false; fun set() { b = true; return true; } print true or set(); print b;"),
            "true\nfalse\n"
        );
    }

    #[test]
    fn call_argument_order_is_left_to_right() {
        assert_eq!(
            run("fun f(a, b) { return 0; } var s = \"\"; fun l() { s = s + \"L\"; return 1; } fun r() { s = s + \"R\"; return 2; } f(l(), r()); print s;"),
            "LR\n"
        );
    }
}
