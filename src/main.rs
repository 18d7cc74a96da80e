use std::io::{stdin, stdout};
use std::path::PathBuf;
use std::process::ExitCode;
use clap::Parser;
use mwnci::error::InterpreterError;
use mwnci::evaluator::{Evaluator, DEFAULT_MAX_DEPTH};
use mwnci::{interpreter, repl};

const BANNER: &str = "Croeso i mwnci. ^D i adael.";

/// mwnci runs Monkey programs, either from files or one line at a time.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Programs to run in order, each in a fresh environment. Starts an
    /// interactive session when none are given.
    files: Vec<PathBuf>,

    /// Maximum depth of nested function calls.
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    // stdout belongs to the program being run
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing();

    if args.files.is_empty() {
        println!("{}", BANNER);
        let evaluator = Evaluator::new().with_max_depth(args.max_depth);
        if let Err(err) = repl::start(stdin(), stdout(), evaluator) {
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        }
        return ExitCode::SUCCESS;
    }

    let failures = interpreter::run_files(&args.files, args.max_depth, stdout());
    for (path, err) in &failures {
        // diagnostics were already written out
        if !matches!(err, InterpreterError::Parse(_)) {
            eprintln!("{}: {}", path.display(), err);
        }
    }
    if failures.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
