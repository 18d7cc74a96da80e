use std::fmt;
use std::fmt::Formatter;
use std::fs::File;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use crate::ast::Node;
use crate::environment::Environment;
use crate::error::InterpreterError;
use crate::evaluator::Evaluator;
use crate::lexer::Lexer;
use crate::object::Object;
use crate::parser::Parser;

/// Prefixes every line it writes with the time elapsed since it was created,
/// truncated to whole milliseconds.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    started: Instant,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    pub fn new() -> Self {
        Clock { started: Instant::now() }
    }

    pub fn elapsed(&self) -> Duration {
        let elapsed = self.started.elapsed();
        Duration::from_millis(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn log<W: Write>(&self, writer: &mut W, args: fmt::Arguments) -> std::io::Result<()> {
        writeln!(writer, "({}) {}", Elapsed(self.elapsed()), args)
    }

    pub fn dump_errors<W: Write>(&self, writer: &mut W, errors: &[String]) -> std::io::Result<()> {
        self.log(writer, format_args!("Error:"))?;
        for msg in errors {
            self.log(writer, format_args!("\t{}", msg))?;
        }
        writer.flush()
    }
}

/// Renders a duration the way Go's `time.Duration` prints: `0s`, `12ms`,
/// `1.5s`, `1m5s`, `1h0m2.25s`. Sub-millisecond parts are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elapsed(pub Duration);

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let millis = self.0.as_millis();
        if millis == 0 {
            return write!(f, "0s");
        }
        if millis < 1000 {
            return write!(f, "{}ms", millis);
        }

        let secs = millis / 1000;
        let (hours, minutes, seconds) = (secs / 3600, secs / 60 % 60, secs % 60);
        if hours > 0 {
            write!(f, "{}h", hours)?;
        }
        if hours > 0 || minutes > 0 {
            write!(f, "{}m", minutes)?;
        }
        write!(f, "{}", seconds)?;

        let frac = millis % 1000;
        if frac > 0 {
            let digits = format!("{:03}", frac);
            write!(f, ".{}", digits.trim_end_matches('0'))?;
        }
        write!(f, "s")
    }
}

/// Runs a whole buffer as one program in a fresh environment.
///
/// Parse diagnostics are written out and evaluation is skipped. An error
/// value reaching the top level is returned as [`InterpreterError::Runtime`].
pub fn start<R: Read, W: Write>(mut reader: R, mut writer: W, evaluator: &mut Evaluator) -> Result<Object, InterpreterError> {
    let clock = Clock::new();
    let mut input = String::new();
    reader.read_to_string(&mut input)?;

    let mut p = Parser::new(Lexer::new(&input));
    let program = p.parse_program();
    if !p.errors().is_empty() {
        clock.dump_errors(&mut writer, p.errors())?;
        return Err(InterpreterError::Parse(p.into_errors()));
    }

    debug!(statements = program.statements.len(), "evaluating program");
    let env = Environment::new_ref();
    match evaluator.eval(Node::Program(&program), &env)? {
        err @ Object::Error(_) => Err(InterpreterError::Runtime(err.to_string())),
        obj => Ok(obj),
    }
}

/// Runs each file in turn, each with a fresh evaluator and environment.
/// A failing file does not stop the ones after it; the failures are
/// returned in order.
pub fn run_files<W: Write>(paths: &[PathBuf], max_depth: usize, mut writer: W) -> Vec<(PathBuf, InterpreterError)> {
    let mut failures = Vec::new();
    for path in paths {
        let result = File::open(path)
            .map_err(InterpreterError::from)
            .and_then(|file| {
                let mut evaluator = Evaluator::new().with_max_depth(max_depth);
                start(file, &mut writer, &mut evaluator)
            });

        if let Err(err) = result {
            warn!(path = %path.display(), %err, "run failed");
            failures.push((path.clone(), err));
        }
    }
    failures
}
