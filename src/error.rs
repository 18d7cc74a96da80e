use thiserror::Error;

/// Conditions that abort evaluation outright. Language-level failures are
/// error values instead, see [`crate::object::Object::Error`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("maximum call depth of {limit} exceeded")]
    CallDepthExceeded { limit: usize },
}

#[derive(Debug, Error)]
pub enum InterpreterError {
    #[error("parsing failed with {} error(s)", .0.len())]
    Parse(Vec<String>),

    #[error("{0}")]
    Runtime(String),

    #[error("fatal: {0}")]
    Fatal(#[from] EvalError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
