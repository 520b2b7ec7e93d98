//! Centralised error hierarchy for the **Lox interpreter**.
//!
//! All pipeline stages (scanner, parser, resolver, runtime) convert their
//! failure modes into one of the variants defined here.  Static stages never
//! abort on the first problem: they push every error into a [`Diagnostics`]
//! collector owned by the driver for the duration of one run.
//!
//! The module **does not** print diagnostics itself.

use std::io;
use thiserror::Error;

use log::info;

use crate::token::{Token, TokenType};

/// Canonical error type used throughout the interpreter.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoxError {
    /// Lexical (scanner) error with source line information.
    #[error("[line {line}] Error: {message}")]
    Lex {
        /// Human‑readable description.
        message: String,

        /// 1‑based line where the error occurred.
        line: usize,
    },

    /// Syntactic (parser) error.
    #[error("[line {line}] Error{location}: {message}")]
    Parse {
        message: String,
        line: usize,
        /// Either `" at end"` or `" at '<lexeme>'"`.
        location: String,
    },

    /// Static‑analysis failure found by the resolver.
    #[error("[line {line}] Error{location}: {message}")]
    Resolve {
        message: String,
        line: usize,
        location: String,
    },

    /// Runtime evaluation error.  The originating line is not tracked.
    #[error("Error: {0}")]
    Runtime(String),

    /// Wrapper around `std::io::Error` (transparent).  Enables `?` on I/O ops.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Render the `{location}` part of a static diagnostic for `token`.
fn location_of(token: &Token) -> String {
    if token.token_type == TokenType::EOF {
        " at end".to_string()
    } else {
        format!(" at '{}'", token.lexeme)
    }
}

impl LoxError {
    /// Helper constructor for the **scanner**.
    pub fn lex<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Lex error: line={}, msg={}", line, message);

        LoxError::Lex { message, line }
    }

    /// Helper constructor for the **parser**.
    pub fn parse<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Parse error: line={}, msg={}", token.line, message);

        LoxError::Parse {
            message,
            line: token.line,
            location: location_of(token),
        }
    }

    /// Helper constructor for the **resolver**.
    pub fn resolve<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Resolve error: line={}, msg={}", token.line, message);

        LoxError::Resolve {
            message,
            line: token.line,
            location: location_of(token),
        }
    }

    /// Helper constructor for the **interpreter**.
    pub fn runtime<S: Into<String>>(msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Runtime error: msg={}", message);

        LoxError::Runtime(message)
    }

    /// Scan, parse and resolve errors suppress execution.
    pub fn is_static(&self) -> bool {
        matches!(
            self,
            LoxError::Lex { .. } | LoxError::Parse { .. } | LoxError::Resolve { .. }
        )
    }

    pub fn is_runtime(&self) -> bool {
        matches!(self, LoxError::Runtime(_))
    }
}

/// Crate‑wide `Result` alias.
pub type Result<T> = std::result::Result<T, LoxError>;

/// Error sink for a single run of the pipeline.
///
/// Replaces a process‑wide "had error" flag: each stage reports into the
/// collector it is handed, and the driver inspects (and clears) it.
#[derive(Debug, Default)]
pub struct Diagnostics {
    errors: Vec<LoxError>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, error: LoxError) {
        info!("Diagnostic reported: {}", error);

        self.errors.push(error);
    }

    pub fn had_error(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn had_static_error(&self) -> bool {
        self.errors.iter().any(LoxError::is_static)
    }

    pub fn had_runtime_error(&self) -> bool {
        self.errors.iter().any(LoxError::is_runtime)
    }

    /// Every error reported so far, in report order.
    pub fn errors(&self) -> &[LoxError] {
        &self.errors
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_errors_render_location() {
        let at_end = Token::new(TokenType::EOF, "", None, 3);
        let at_lexeme = Token::new(TokenType::IDENTIFIER, "foo", None, 7);

        assert_eq!(
            LoxError::parse(&at_end, "Expect expression.").to_string(),
            "[line 3] Error at end: Expect expression."
        );
        assert_eq!(
            LoxError::resolve(&at_lexeme, "Bad.").to_string(),
            "[line 7] Error at 'foo': Bad."
        );
        assert_eq!(
            LoxError::lex(2, "Unexpected character: $").to_string(),
            "[line 2] Error: Unexpected character: $"
        );
        assert_eq!(
            LoxError::runtime("Operand must be a number.").to_string(),
            "Error: Operand must be a number."
        );
    }

    #[test]
    fn diagnostics_track_error_kinds() {
        let mut diagnostics = Diagnostics::new();
        assert!(!diagnostics.had_error());

        diagnostics.report(LoxError::runtime("boom"));
        assert!(diagnostics.had_runtime_error());
        assert!(!diagnostics.had_static_error());

        diagnostics.report(LoxError::lex(1, "Unterminated string."));
        assert!(diagnostics.had_static_error());
        assert_eq!(diagnostics.errors().len(), 2);

        diagnostics.clear();
        assert!(!diagnostics.had_error());
    }

    #[test]
    fn io_errors_pass_through_unclassified() {
        let err = LoxError::from(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));

        assert_eq!(err.to_string(), "closed");
        assert!(!err.is_static());
        assert!(!err.is_runtime());
    }
}
