use crate::error::{LoxError, Result};
use crate::token::Token;
use crate::value::Value;
use log::debug;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Shared handle to a scope frame.  Closures and nested frames keep their
/// enclosing frames alive, so frames are reference counted, not stack owned.
pub type EnvRef = Rc<RefCell<Environment>>;

/// One lexical scope frame: name → value bindings plus the enclosing frame.
#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<EnvRef>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: None,
        }
    }

    pub fn with_enclosing(enclosing: EnvRef) -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    /// Wrap a fresh frame enclosed by `enclosing` into a shared handle.
    pub fn child_of(enclosing: &EnvRef) -> EnvRef {
        Rc::new(RefCell::new(Environment::with_enclosing(Rc::clone(enclosing))))
    }

    /// Binds (or rebinds) `name` in this frame.
    pub fn define(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    /// Dynamic lookup: the first frame outward that binds `name` wins.
    pub fn get(&self, name: &Token) -> Result<Value> {
        if let Some(value) = self.values.get(&name.lexeme) {
            Ok(value.clone())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow().get(name)
        } else {
            Err(undefined(&name.lexeme))
        }
    }

    pub fn assign(&mut self, name: &Token, value: Value) -> Result<()> {
        if let Some(slot) = self.values.get_mut(&name.lexeme) {
            *slot = value;
            Ok(())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow_mut().assign(name, value)
        } else {
            Err(undefined(&name.lexeme))
        }
    }

    /// Read `name` from the frame exactly `distance` links outward.
    pub fn get_at(&self, distance: usize, name: &str) -> Result<Value> {
        if distance == 0 {
            debug!("get_at: '{}' found at resolved frame", name);

            return self.values.get(name).cloned().ok_or_else(|| undefined(name));
        }

        match &self.enclosing {
            Some(enclosing) => enclosing.borrow().get_at(distance - 1, name),
            None => Err(undefined(name)),
        }
    }

    /// Write `name` in the frame exactly `distance` links outward.
    pub fn assign_at(&mut self, distance: usize, name: &Token, value: Value) -> Result<()> {
        if distance == 0 {
            self.values.insert(name.lexeme.clone(), value);

            return Ok(());
        }

        match &self.enclosing {
            Some(enclosing) => enclosing.borrow_mut().assign_at(distance - 1, name, value),
            None => Err(undefined(&name.lexeme)),
        }
    }
}

fn undefined(name: &str) -> LoxError {
    LoxError::runtime(format!("Undefined variable '{}'.", name))
}
