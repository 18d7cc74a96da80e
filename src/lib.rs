pub mod interpreter;
pub mod repl;

pub mod token;
pub mod lexer;
pub mod ast;
pub mod parser;
pub mod object;
pub mod evaluator;
pub mod builtin;
pub mod environment;
pub mod error;
pub mod stack;
