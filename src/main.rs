use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use treelox as lox;

use lox::ast_printer::AstPrinter;
use lox::error::Diagnostics;
use lox::parser::Parser;
use lox::runner::{Lox, RunStatus};
use lox::scanner::Scanner;
use lox::token::Token;

#[derive(ClapParser, Debug)]
#[command(
    version,
    about = "Tree-walking Lox language interpreter",
    long_about = None,
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    commands: Option<Commands>,

    /// Script to run; starts the interactive prompt when omitted
    script: Option<PathBuf>,

    /// Enable logging to app.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize {
        filename: PathBuf,

        /// Print the tokens as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Parses input from a file and prints its AST
    Parse { filename: PathBuf },

    /// Runs input from a file as a Lox program
    Run { filename: PathBuf },

    /// Starts the interactive prompt
    Repl,
}

/// Reads the contents of a file into a String
fn read_file(filename: &Path) -> Result<String> {
    info!("Reading file: {:?}", filename);
    let file = File::open(filename).context(format!("Failed to open file {:?}", filename))?;
    let mut reader = BufReader::new(file);
    let mut buf = String::new();

    let bytes = reader
        .read_to_string(&mut buf)
        .context(format!("Failed to read file {:?}", filename))?;

    info!("Read {} bytes from {:?}", bytes, filename);

    Ok(buf)
}

fn init_logger() -> Result<()> {
    let log_file = File::create("app.log").context("Failed to create app.log")?;

    Builder::new()
        .format(|buf, record| {
            // Strip 'treelox::' from module path
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("treelox::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug) // Default to Debug, override with RUST_LOG
        .parse_default_env()
        .init();

    info!("Logger initialized, writing to app.log");
    Ok(())
}

fn report(diagnostics: &Diagnostics) {
    for e in diagnostics.errors() {
        eprintln!("{}", e);
    }
}

fn tokenize(filename: &Path, json: bool) -> Result<i32> {
    let source = read_file(filename)?;
    let mut diagnostics = Diagnostics::new();
    let tokens: Vec<Token> = Scanner::new(&source).scan_tokens(&mut diagnostics);

    if json {
        println!("{}", serde_json::to_string_pretty(&tokens)?);
    } else {
        for token in &tokens {
            println!("{}", token);
        }
    }

    report(&diagnostics);

    Ok(if diagnostics.had_error() { 65 } else { 0 })
}

fn parse(filename: &Path) -> Result<i32> {
    let source = read_file(filename)?;
    let mut diagnostics = Diagnostics::new();
    let tokens: Vec<Token> = Scanner::new(&source).scan_tokens(&mut diagnostics);
    let statements = Parser::new(tokens).parse(&mut diagnostics);

    if diagnostics.had_error() {
        report(&diagnostics);
        return Ok(65);
    }

    for stmt in &statements {
        println!("{}", AstPrinter::print_stmt(stmt));
    }

    Ok(0)
}

fn run_file(filename: &Path) -> Result<i32> {
    let source = read_file(filename)?;
    let mut lox = Lox::new();

    let status: RunStatus = lox.run(&source);
    report(lox.diagnostics());

    debug!("Run finished with {:?}", status);

    Ok(status.exit_code())
}

fn run_prompt() -> Result<i32> {
    let mut lox = Lox::new();
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break; // end of input
        }

        lox.run(&line);
        report(lox.diagnostics());
        lox.reset();
    }

    Ok(0)
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    // Initialize logger only if --log flag is provided
    if args.log {
        init_logger()?;
    } else {
        // Initialize a minimal logger to avoid "no logger" errors
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    let code: i32 = match (args.commands, args.script) {
        (Some(Commands::Tokenize { filename, json }), _) => tokenize(&filename, json)?,
        (Some(Commands::Parse { filename }), _) => parse(&filename)?,
        (Some(Commands::Run { filename }), _) | (None, Some(filename)) => run_file(&filename)?,
        (Some(Commands::Repl), _) | (None, None) => run_prompt()?,
    };

    if code != 0 {
        debug!("Exiting with code {}", code);
        std::process::exit(code);
    }

    Ok(())
}
