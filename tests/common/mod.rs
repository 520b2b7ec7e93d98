#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use treelox as lox;

use lox::runner::{Lox, RunStatus};

/// In‑memory `Write` sink whose contents stay readable after the
/// interpreter takes ownership of a clone.
#[derive(Clone, Default)]
pub struct Capture(Rc<RefCell<Vec<u8>>>);

impl Capture {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Result of running one program through the whole pipeline.
pub struct Outcome {
    pub status: RunStatus,
    pub stdout: String,
    pub errors: Vec<String>,
}

impl Outcome {
    pub fn lines(&self) -> Vec<&str> {
        self.stdout.lines().collect()
    }
}

pub fn run(source: &str) -> Outcome {
    let capture = Capture::default();
    let mut lox = Lox::with_output(Box::new(capture.clone()));

    let status = lox.run(source);
    let errors = lox
        .diagnostics()
        .errors()
        .iter()
        .map(|e| e.to_string())
        .collect();

    Outcome {
        status,
        stdout: capture.contents(),
        errors,
    }
}

/// Run a program that must succeed and return its printed lines.
pub fn output_of(source: &str) -> Vec<String> {
    let outcome = run(source);

    assert_eq!(
        outcome.status,
        RunStatus::Ok,
        "program failed: {:?}",
        outcome.errors
    );

    outcome.stdout.lines().map(str::to_string).collect()
}
