//! Command-line driver: inline statement, batch file, or interactive REPL.

use clap::Parser;
use std::io::{BufRead, IsTerminal};
use std::path::PathBuf;

use linecalc::{env, eval, lexer, parser};

#[derive(Parser)]
#[command(name = "linecalc")]
#[command(about = "A line-oriented integer calculator.\n\nCall with no arguments to enter the REPL.")]
#[command(version)]
struct Cli {
    /// Statement to evaluate directly (arguments are joined with spaces)
    statement: Vec<String>,

    /// Show debug output
    #[arg(long)]
    debug: bool,

    /// Echo each statement before its result
    #[arg(long)]
    echo: bool,

    /// Read statements from a file
    #[arg(short, long, value_name = "filename")]
    file: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.debug {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let mut environment = env::Environment::new();

    if let Some(path) = &cli.file {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                eprintln!("ERROR: failed to read file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        };
        // Batch mode always echoes so results line up with their input.
        let had_errors = run_source(&contents, &mut environment, true);
        if had_errors {
            std::process::exit(1);
        }
    } else if !cli.statement.is_empty() {
        let statement = cli.statement.join(" ");
        run_source(&statement, &mut environment, cli.echo);
    } else {
        run_repl(&mut environment, cli.echo);
    }
}

/// Lex, parse, and evaluate one chunk of source against `environment`,
/// rendering every statement's outcome. Returns whether any syntax
/// diagnostic or statement error was reported.
fn run_source(source: &str, environment: &mut env::Environment, echo: bool) -> bool {
    // Statements are newline-terminated.
    let mut text = String::from(source);
    if !text.ends_with('\n') {
        text.push('\n');
    }

    let mut lex = lexer::Lexer::new(&text);
    let tokens = lex.tokenize();
    let mut p = parser::Parser::new(tokens);
    let program = p.parse();

    let mut had_errors = false;
    for diagnostic in p.diagnostics() {
        eprintln!("ERROR: {diagnostic}");
        had_errors = true;
    }

    let mut evaluator = eval::Evaluator::new(environment);
    let results = evaluator.eval_program(&program);

    for (stmt, result) in program.stmts.iter().zip(results) {
        if echo {
            println!("> {}", stmt.loc.source_line.as_deref().unwrap_or(""));
        }
        match result {
            Ok(eval::Outcome::Value(value)) => println!("  {value}"),
            Ok(eval::Outcome::Blank) => {}
            Err(diagnostic) => {
                eprintln!("ERROR: {diagnostic}");
                had_errors = true;
            }
        }
    }

    had_errors
}

fn run_repl(environment: &mut env::Environment, echo: bool) {
    if !std::io::stdin().is_terminal() {
        run_piped(environment, echo);
        return;
    }

    let mut rl = match rustyline::DefaultEditor::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("linecalc: cannot initialize line editor: {e}");
            std::process::exit(1);
        }
    };

    loop {
        match rl.readline("> ") {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = rl.add_history_entry(line.trim_end());
                }
                run_source(&line, environment, echo);
            }
            Err(
                rustyline::error::ReadlineError::Interrupted | rustyline::error::ReadlineError::Eof,
            ) => {
                println!();
                break;
            }
            Err(e) => {
                eprintln!("linecalc: {e}");
                break;
            }
        }
    }
}

/// Stdin is not a terminal: read lines without prompts or line editing, so
/// piped sessions produce exactly the statements' output.
fn run_piped(environment: &mut env::Environment, echo: bool) {
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        match line {
            Ok(line) => {
                run_source(&line, environment, echo);
            }
            Err(e) => {
                eprintln!("ERROR: {e}");
                std::process::exit(1);
            }
        }
    }
}
