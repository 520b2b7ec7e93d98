//! The pipeline driver: source text → tokens → AST → resolved AST → execution.
//!
//! A [`Lox`] owns one interpreter (so globals survive between REPL lines) and
//! the [`Diagnostics`] collector for the run in progress.

use std::io::Write;

use log::{debug, info};

use crate::ast::Stmt;
use crate::error::Diagnostics;
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::resolver::{Locals, Resolver};
use crate::scanner::Scanner;
use crate::token::Token;

/// Outcome of one call to [`Lox::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Ok,
    /// Scan, parse or resolve errors; nothing was executed.
    StaticError,
    /// Execution started and was aborted by a runtime error.
    RuntimeError,
}

impl RunStatus {
    /// Conventional sysexits code for a script run with this outcome.
    pub fn exit_code(self) -> i32 {
        match self {
            RunStatus::Ok => 0,
            RunStatus::StaticError => 65,
            RunStatus::RuntimeError => 70,
        }
    }
}

pub struct Lox {
    interpreter: Interpreter,
    diagnostics: Diagnostics,
}

impl Default for Lox {
    fn default() -> Self {
        Self::new()
    }
}

impl Lox {
    pub fn new() -> Self {
        Self::with_interpreter(Interpreter::new())
    }

    /// Driver whose `print` output goes to `out` instead of stdout.
    pub fn with_output(out: Box<dyn Write>) -> Self {
        Self::with_interpreter(Interpreter::with_output(out))
    }

    fn with_interpreter(interpreter: Interpreter) -> Self {
        Self {
            interpreter,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Run `source` as one top‑level program.
    ///
    /// Any static error suppresses execution.  A runtime error aborts the
    /// remaining statements.  Either way the errors are left in
    /// [`diagnostics`](Self::diagnostics) for the caller to print.
    pub fn run(&mut self, source: &str) -> RunStatus {
        info!("Running {} bytes of source", source.len());

        let tokens: Vec<Token> = Scanner::new(source).scan_tokens(&mut self.diagnostics);

        let statements: Vec<Stmt> = Parser::new(tokens).parse(&mut self.diagnostics);
        debug!("Parsed statements: {:?}", statements);

        if self.diagnostics.had_static_error() {
            return RunStatus::StaticError;
        }

        let locals: Locals = Resolver::new(&mut self.diagnostics).resolve(&statements);

        if self.diagnostics.had_static_error() {
            return RunStatus::StaticError;
        }

        match self.interpreter.interpret(&statements, locals) {
            Ok(()) => RunStatus::Ok,
            Err(e) => {
                self.diagnostics.report(e);
                RunStatus::RuntimeError
            }
        }
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Forget the errors of the previous run; the REPL calls this per line.
    pub fn reset(&mut self) {
        self.diagnostics.clear();
    }
}
