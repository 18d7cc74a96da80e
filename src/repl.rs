use std::io::{BufRead, BufReader, Read, Write};
use tracing::debug;
use crate::ast::Node;
use crate::environment::Environment;
use crate::error::InterpreterError;
use crate::evaluator::Evaluator;
use crate::interpreter::Clock;
use crate::lexer::Lexer;
use crate::object::Object;
use crate::parser::Parser;

const PROMPT: &str = "» ";
const FAREWELL: &str = "👋🏽";

/// Reads one line at a time until end of input. Bindings persist across
/// lines; a fatal evaluation error is reported and the session goes on.
pub fn start<R: Read, W: Write>(reader: R, mut writer: W, mut evaluator: Evaluator) -> Result<(), InterpreterError> {
    let clock = Clock::new();
    let env = Environment::new_ref();
    let mut reader = BufReader::new(reader);

    loop {
        write!(writer, "{}", PROMPT)?;
        writer.flush()?;

        let mut buf = Vec::new();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);

        let mut p = Parser::new(Lexer::new(&line));
        let program = p.parse_program();
        if !p.errors().is_empty() {
            clock.dump_errors(&mut writer, p.errors())?;
            continue;
        }

        match evaluator.eval(Node::Program(&program), &env) {
            Ok(Object::Null) => {},
            Ok(obj) => clock.log(&mut writer, format_args!("{}", obj))?,
            Err(err) => {
                debug!(%err, "evaluation aborted");
                clock.log(&mut writer, format_args!("fatal: {}", err))?;
            },
        }
    }

    clock.log(&mut writer, format_args!("{}", FAREWELL))?;
    writer.flush()?;
    Ok(())
}
