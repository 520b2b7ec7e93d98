//! Things that can appear on the left of `(...)`: native built‑ins and
//! user‑defined functions/methods.  Classes implement [`Callable`] in
//! [`class`](crate::class) to act as their own constructors.

use std::fmt;
use std::rc::Rc;

use log::{debug, info};

use crate::ast::FunctionDecl;
use crate::class::LoxInstance;
use crate::environment::{EnvRef, Environment};
use crate::error::Result;
use crate::interpreter::{Flow, Interpreter};
use crate::value::Value;

pub trait Callable {
    /// Number of arguments a call must supply.
    fn arity(&self) -> usize;

    /// Invoke with already evaluated arguments; `arguments.len() == arity()`
    /// is checked by the interpreter beforehand.
    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Value>) -> Result<Value>;
}

/// Signature of a built‑in implemented in Rust.
pub type NativeFn = fn(&mut Interpreter, &[Value]) -> Result<Value>;

/// A built‑in such as `clock` or `print`.
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: usize,
    pub func: NativeFn,
}

impl NativeFunction {
    pub fn new(name: &'static str, arity: usize, func: NativeFn) -> Self {
        Self { name, arity, func }
    }
}

impl Callable for NativeFunction {
    fn arity(&self) -> usize {
        self.arity
    }

    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Value>) -> Result<Value> {
        debug!("Calling native function '{}'", self.name);

        (self.func)(interpreter, &arguments)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn {}>", self.name)
    }
}

/// A user function or method together with the frame it closes over.
pub struct LoxFunction {
    declaration: Rc<FunctionDecl>,
    closure: EnvRef,

    /// `init` methods always evaluate to the receiver.
    is_initializer: bool,
}

impl LoxFunction {
    pub fn new(declaration: Rc<FunctionDecl>, closure: EnvRef, is_initializer: bool) -> Self {
        Self {
            declaration,
            closure,
            is_initializer,
        }
    }

    pub fn name(&self) -> &str {
        &self.declaration.name.lexeme
    }

    /// Produce a bound method: the same code with one extra frame that binds
    /// `this` to `instance`.
    pub fn bind(&self, instance: Rc<LoxInstance>) -> LoxFunction {
        debug!("Binding method '{}' to instance", self.name());

        let environment: EnvRef = Environment::child_of(&self.closure);
        environment
            .borrow_mut()
            .define("this", Value::Instance(instance));

        LoxFunction::new(
            Rc::clone(&self.declaration),
            environment,
            self.is_initializer,
        )
    }

    fn this(&self) -> Result<Value> {
        self.closure.borrow().get_at(0, "this")
    }
}

impl Callable for LoxFunction {
    fn arity(&self) -> usize {
        self.declaration.params.len()
    }

    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Value>) -> Result<Value> {
        debug!("Calling user-defined function '{}'", self.name());

        let environment: EnvRef = Environment::child_of(&self.closure);

        for (param, argument) in self.declaration.params.iter().zip(arguments) {
            environment.borrow_mut().define(&param.lexeme, argument);
        }

        let flow: Flow = interpreter.execute_block(&self.declaration.body, environment)?;

        if self.is_initializer {
            return self.this();
        }

        let value: Value = match flow {
            Flow::Return(value) => value,
            Flow::Normal => Value::Nil,
        };

        info!("Function '{}' returned: {}", self.name(), value);

        Ok(value)
    }
}

impl fmt::Debug for LoxFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}>", self.name())
    }
}
