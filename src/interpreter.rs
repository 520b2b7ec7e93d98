use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{self, Write};
use std::rc::Rc;

use chrono::Utc;
use log::{debug, info};

use crate::ast::{Expr, ExprId, FunctionDecl, LiteralValue, Stmt};
use crate::callable::{LoxFunction, NativeFunction};
use crate::class::LoxClass;
use crate::environment::{EnvRef, Environment};
use crate::error::{LoxError, Result};
use crate::resolver::Locals;
use crate::token::{Token, TokenType};
use crate::value::Value;

/// How a statement finished.  A `return` unwinds as `Flow::Return` up to the
/// nearest function call, which converts it back into a value.
#[derive(Debug)]
pub enum Flow {
    Normal,
    Return(Value),
}

/// Tree‑walking evaluator.
pub struct Interpreter {
    globals: EnvRef,
    environment: EnvRef,

    /// Resolver output: node → number of frames between use and declaration.
    locals: Locals,

    /// Sink for the `print` built‑in.
    out: Box<dyn Write>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Creates an interpreter printing to stdout.
    pub fn new() -> Self {
        Self::with_output(Box::new(io::stdout()))
    }

    /// Creates an interpreter whose `print` built‑in writes to `out`.
    pub fn with_output(out: Box<dyn Write>) -> Self {
        info!("Initializing Interpreter");

        let globals: EnvRef = Rc::new(RefCell::new(Environment::new()));

        for native in [
            NativeFunction::new("clock", 0, native_clock),
            NativeFunction::new("print", 1, native_print),
            NativeFunction::new("str", 1, native_str),
        ] {
            debug!("Defining native function '{}'", native.name);

            globals
                .borrow_mut()
                .define(native.name, Value::NativeFunction(Rc::new(native)));
        }

        Self {
            environment: Rc::clone(&globals),
            globals,
            locals: HashMap::new(),
            out,
        }
    }

    /// Interprets a resolved program.  `locals` is merged into the table kept
    /// from earlier runs, so REPL lines can call functions defined before.
    pub fn interpret(&mut self, statements: &[Stmt], locals: Locals) -> Result<()> {
        debug!("Interpreting {} statements", statements.len());

        self.locals.extend(locals);

        for stmt in statements {
            self.execute(stmt)?;
        }

        info!("Interpretation completed successfully");

        Ok(())
    }

    /// Executes a single statement.
    pub fn execute(&mut self, stmt: &Stmt) -> Result<Flow> {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
                Ok(Flow::Normal)
            }

            Stmt::Var { name, initializer } => {
                let value: Value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };

                debug!("Defining variable '{}' = {:?}", name.lexeme, value);

                self.environment.borrow_mut().define(&name.lexeme, value);
                Ok(Flow::Normal)
            }

            Stmt::Block(statements) => {
                let environment: EnvRef = Environment::child_of(&self.environment);
                self.execute_block(statements, environment)
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(Flow::Normal)
                }
            }

            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    if let Flow::Return(value) = self.execute(body)? {
                        return Ok(Flow::Return(value));
                    }
                }
                Ok(Flow::Normal)
            }

            Stmt::Function(declaration) => {
                debug!("Defining function '{}'", declaration.name.lexeme);

                let function = LoxFunction::new(
                    Rc::clone(declaration),
                    Rc::clone(&self.environment),
                    false,
                );

                self.environment.borrow_mut().define(
                    &declaration.name.lexeme,
                    Value::Function(Rc::new(function)),
                );
                Ok(Flow::Normal)
            }

            Stmt::Return { value, .. } => {
                let value: Value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };

                debug!("Returning value: {:?}", value);

                Ok(Flow::Return(value))
            }

            Stmt::Class {
                name,
                superclass,
                methods,
            } => {
                self.execute_class(name, superclass.as_ref(), methods)?;
                Ok(Flow::Normal)
            }
        }
    }

    /// Run `statements` in `environment`, restoring the current frame on every
    /// exit path before the result propagates.
    pub fn execute_block(&mut self, statements: &[Stmt], environment: EnvRef) -> Result<Flow> {
        let previous: EnvRef = std::mem::replace(&mut self.environment, environment);

        let mut result: Result<Flow> = Ok(Flow::Normal);

        for stmt in statements {
            match self.execute(stmt) {
                Ok(Flow::Normal) => {}
                other => {
                    result = other;
                    break;
                }
            }
        }

        self.environment = previous;

        result
    }

    fn execute_class(
        &mut self,
        name: &Token,
        superclass: Option<&Expr>,
        methods: &[Rc<FunctionDecl>],
    ) -> Result<()> {
        debug!("Defining class '{}'", name.lexeme);

        let superclass: Option<Rc<LoxClass>> = match superclass {
            Some(expr) => match self.evaluate(expr)? {
                Value::Class(class) => Some(class),
                _ => return Err(LoxError::runtime("Superclass must be a class.")),
            },
            None => None,
        };

        // Bound first so methods can refer to the class by name.
        self.environment
            .borrow_mut()
            .define(&name.lexeme, Value::Nil);

        let method_env: EnvRef = match &superclass {
            Some(superclass) => {
                let env: EnvRef = Environment::child_of(&self.environment);
                env.borrow_mut()
                    .define("super", Value::Class(Rc::clone(superclass)));
                env
            }
            None => Rc::clone(&self.environment),
        };

        let methods: HashMap<String, Rc<LoxFunction>> = methods
            .iter()
            .map(|decl| {
                let function = LoxFunction::new(
                    Rc::clone(decl),
                    Rc::clone(&method_env),
                    decl.name.lexeme == "init",
                );
                (decl.name.lexeme.clone(), Rc::new(function))
            })
            .collect();

        let class = LoxClass::new(name.lexeme.clone(), superclass, methods);

        self.environment
            .borrow_mut()
            .assign(name, Value::Class(Rc::new(class)))?;

        info!("Class '{}' defined", name.lexeme);

        Ok(())
    }

    /// Evaluates an expression and returns a Value.
    pub fn evaluate(&mut self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Literal(literal) => Ok(match literal {
                LiteralValue::Number(n) => Value::Number(*n),
                LiteralValue::Str(s) => Value::String(s.clone()),
                LiteralValue::True => Value::Bool(true),
                LiteralValue::False => Value::Bool(false),
                LiteralValue::Nil => Value::Nil,
            }),

            Expr::Grouping(inner) => self.evaluate(inner),

            Expr::Unary { operator, right } => self.evaluate_unary(operator, right),

            Expr::Binary {
                left,
                operator,
                right,
            } => self.evaluate_binary(left, operator, right),

            Expr::Logical {
                left,
                operator,
                right,
            } => {
                let left: Value = self.evaluate(left)?;

                let decided: bool = if operator.token_type == TokenType::OR {
                    left.is_truthy()
                } else {
                    !left.is_truthy()
                };

                if decided {
                    Ok(left)
                } else {
                    self.evaluate(right)
                }
            }

            Expr::Variable { id, name } => self.look_up_variable(*id, name),

            Expr::Assign { id, name, value } => {
                let value: Value = self.evaluate(value)?;

                match self.locals.get(id) {
                    Some(&distance) => self
                        .environment
                        .borrow_mut()
                        .assign_at(distance, name, value.clone())?,
                    None => self.globals.borrow_mut().assign(name, value.clone())?,
                }

                debug!("Assigned {:?} to '{}'", value, name.lexeme);

                Ok(value)
            }

            Expr::Call {
                callee, arguments, ..
            } => {
                let callee: Value = self.evaluate(callee)?;

                let mut values: Vec<Value> = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    values.push(self.evaluate(argument)?);
                }

                self.invoke_callable(&callee, values)
            }

            Expr::Get { object, name } => match self.evaluate(object)? {
                Value::Instance(instance) => instance.get(name),
                _ => Err(LoxError::runtime("Only instances have properties.")),
            },

            Expr::Set {
                object,
                name,
                value,
            } => {
                let Value::Instance(instance) = self.evaluate(object)? else {
                    return Err(LoxError::runtime("Only instances have fields."));
                };

                let value: Value = self.evaluate(value)?;
                instance.set(name, value.clone());

                Ok(value)
            }

            Expr::This { id, keyword } => self.look_up_variable(*id, keyword),

            Expr::Super { id, method, .. } => self.evaluate_super(*id, method),

            Expr::Empty => Err(LoxError::runtime(
                "Cannot evaluate an expression that failed to parse.",
            )),
        }
    }

    fn evaluate_unary(&mut self, operator: &Token, right: &Expr) -> Result<Value> {
        let right: Value = self.evaluate(right)?;

        match operator.token_type {
            TokenType::MINUS => match right {
                Value::Number(n) => Ok(Value::Number(-n)),
                _ => Err(LoxError::runtime("Operand must be a number.")),
            },
            TokenType::BANG => Ok(Value::Bool(!right.is_truthy())),
            _ => Err(LoxError::runtime(format!(
                "Unknown unary operator '{}'.",
                operator.lexeme
            ))),
        }
    }

    fn evaluate_binary(&mut self, left: &Expr, operator: &Token, right: &Expr) -> Result<Value> {
        let left: Value = self.evaluate(left)?;
        let right: Value = self.evaluate(right)?;

        debug!(
            "Binary '{}': left={:?}, right={:?}",
            operator.lexeme, left, right
        );

        match operator.token_type {
            TokenType::EQUAL_EQUAL => Ok(Value::Bool(is_equal(&left, &right, operator)?)),
            TokenType::BANG_EQUAL => Ok(Value::Bool(!is_equal(&left, &right, operator)?)),
            TokenType::PLUS => add(left, right),

            TokenType::MINUS => number_operands(&left, &right).map(|(a, b)| Value::Number(a - b)),
            TokenType::STAR => number_operands(&left, &right).map(|(a, b)| Value::Number(a * b)),
            TokenType::SLASH => number_operands(&left, &right).map(|(a, b)| Value::Number(a / b)),
            TokenType::GREATER => number_operands(&left, &right).map(|(a, b)| Value::Bool(a > b)),
            TokenType::GREATER_EQUAL => {
                number_operands(&left, &right).map(|(a, b)| Value::Bool(a >= b))
            }
            TokenType::LESS => number_operands(&left, &right).map(|(a, b)| Value::Bool(a < b)),
            TokenType::LESS_EQUAL => {
                number_operands(&left, &right).map(|(a, b)| Value::Bool(a <= b))
            }

            _ => Err(LoxError::runtime(format!(
                "Unknown binary operator '{}' for {} and {}.",
                operator.lexeme,
                left.type_name(),
                right.type_name()
            ))),
        }
    }

    /// Resolved references read the exact frame; unresolved ones are globals.
    fn look_up_variable(&self, id: ExprId, name: &Token) -> Result<Value> {
        match self.locals.get(&id) {
            Some(&distance) => self.environment.borrow().get_at(distance, &name.lexeme),
            None => self.globals.borrow().get(name),
        }
    }

    /// `super.method`: the `super` frame sits one link outside the `this`
    /// frame created by [`LoxFunction::bind`].
    fn evaluate_super(&mut self, id: ExprId, method: &Token) -> Result<Value> {
        let distance: usize = *self
            .locals
            .get(&id)
            .ok_or_else(|| LoxError::runtime("Can't use 'super' outside of a class."))?;

        let superclass: Value = self.environment.borrow().get_at(distance, "super")?;
        let object: Value = self
            .environment
            .borrow()
            .get_at(distance.saturating_sub(1), "this")?;

        let (Value::Class(superclass), Value::Instance(instance)) = (superclass, object) else {
            return Err(LoxError::runtime("Invalid 'super' binding."));
        };

        match superclass.find_method(&method.lexeme) {
            Some(found) => Ok(Value::Function(Rc::new(found.bind(instance)))),
            None => Err(LoxError::runtime(format!(
                "Undefined property '{}'.",
                method.lexeme
            ))),
        }
    }

    /// Invokes a callable (native, user‑defined function or class).
    fn invoke_callable(&mut self, callee: &Value, arguments: Vec<Value>) -> Result<Value> {
        let Some(callable) = callee.as_callable() else {
            return Err(LoxError::runtime("Can only call functions and classes."));
        };

        if arguments.len() != callable.arity() {
            return Err(LoxError::runtime(format!(
                "Expected {} arguments but got {}.",
                callable.arity(),
                arguments.len()
            )));
        }

        debug!("Calling {:?} with {} argument(s)", callee, arguments.len());

        callable.call(self, arguments)
    }
}

/// Equality is permissive when either side is `nil` and type‑checked
/// otherwise: comparing non‑nil values of different runtime types (or of a
/// non‑primitive type) is an error rather than `false`.
fn is_equal(left: &Value, right: &Value, operator: &Token) -> Result<bool> {
    match (left, right) {
        (Value::Nil, Value::Nil) => Ok(true),
        (Value::Nil, _) | (_, Value::Nil) => Ok(false),
        (Value::Number(a), Value::Number(b)) => Ok(a == b),
        (Value::String(a), Value::String(b)) => Ok(a == b),
        (Value::Bool(a), Value::Bool(b)) => Ok(a == b),
        _ => Err(LoxError::runtime(format!(
            "Cannot compare {} with {} using '{}'.",
            left.type_name(),
            right.type_name(),
            operator.lexeme
        ))),
    }
}

/// `+` adds numbers or concatenates strings; the error names the side at fault.
fn add(left: Value, right: Value) -> Result<Value> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
        (Value::String(a), Value::String(b)) => Ok(Value::String(a + &b)),
        (Value::Number(_), other) => Err(LoxError::runtime(format!(
            "Right operand of '+' must be a number, got {}.",
            other.type_name()
        ))),
        (Value::String(_), other) => Err(LoxError::runtime(format!(
            "Right operand of '+' must be a string, got {}.",
            other.type_name()
        ))),
        (other, _) => Err(LoxError::runtime(format!(
            "Left operand of '+' must be a number or a string, got {}.",
            other.type_name()
        ))),
    }
}

fn number_operands(left: &Value, right: &Value) -> Result<(f64, f64)> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok((*a, *b)),
        _ => Err(LoxError::runtime("Operands must be numbers.")),
    }
}

// ───────────────────────────── built‑ins ─────────────────────────────

fn native_clock(_interpreter: &mut Interpreter, _args: &[Value]) -> Result<Value> {
    let seconds: f64 = Utc::now().timestamp_micros() as f64 / 1_000_000.0;

    Ok(Value::Number(seconds))
}

fn native_print(interpreter: &mut Interpreter, args: &[Value]) -> Result<Value> {
    let text: String = args.first().map_or_else(|| "nil".to_string(), Value::to_string);

    writeln!(interpreter.out, "{}", text)?;
    interpreter.out.flush()?;

    Ok(Value::Nil)
}

fn native_str(_interpreter: &mut Interpreter, args: &[Value]) -> Result<Value> {
    let text: String = args.first().map_or_else(|| "nil".to_string(), Value::to_string);

    Ok(Value::String(text))
}
