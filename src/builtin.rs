use std::fmt;
use std::fmt::Formatter;
use rustc_hash::FxHashMap;
use crate::evaluator::new_error;
use crate::object::{Object, ObjectType};

/// Calling convention for host procedures: the evaluated arguments in,
/// one value out. Failures come back as error values.
pub type BuiltinFn = fn(args: &[Object]) -> Object;

#[derive(Clone, Copy, Debug)]
pub struct BuiltinFunction {
    name: &'static str,
    func: BuiltinFn
}

impl fmt::Display for BuiltinFunction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl BuiltinFunction {
    pub fn new(name: &'static str, func: BuiltinFn) -> Self {
        BuiltinFunction { name, func }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn call(&self, args: &[Object]) -> Object {
        (self.func)(args)
    }
}

/// Table of native functions the evaluator falls back to when a name is not
/// bound in any scope.
#[derive(Clone, Debug, Default)]
pub struct Builtins {
    table: FxHashMap<&'static str, BuiltinFunction>,
}

impl Builtins {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn standard() -> Self {
        let mut builtins = Self::empty();
        builtins.register("len", len);
        builtins.register("puts", puts);
        builtins.register("first", first);
        builtins.register("last", last);
        builtins.register("rest", rest);
        builtins.register("push", push);
        builtins
    }

    pub fn register(&mut self, name: &'static str, func: BuiltinFn) {
        self.table.insert(name, BuiltinFunction::new(name, func));
    }

    pub fn look_up(&self, name: &str) -> Option<BuiltinFunction> {
        self.table.get(name).copied()
    }
}

fn check_arity(args: &[Object], want: usize) -> Option<Object> {
    if args.len() != want {
        return Some(new_error(format!("wrong number of arguments: want={}, got={}", want, args.len())));
    }
    None
}

fn len(args: &[Object]) -> Object {
    if let Some(err) = check_arity(args, 1) {
        return err;
    }

    match &args[0] {
        Object::String(s) => Object::Integer(s.chars().count() as i64),
        Object::Array(v) => Object::Integer(v.len() as i64),
        Object::Hash(h) => Object::Integer(h.len() as i64),
        other => new_error(format!("argument to `len` not supported, got {}", other.object_type()))
    }
}

fn puts(args: &[Object]) -> Object {
    for arg in args {
        println!("{}", arg)
    }
    Object::Null
}

fn array_argument<'a>(name: &str, args: &'a [Object]) -> Result<&'a [Object], Object> {
    if let Some(err) = check_arity(args, 1) {
        return Err(err);
    }
    match &args[0] {
        Object::Array(arr) => Ok(arr),
        other => Err(new_error(format!("argument to `{}` must be {}, got {}",
            name, ObjectType::Array, other.object_type()))),
    }
}

fn first(args: &[Object]) -> Object {
    match array_argument("first", args) {
        Ok(arr) => arr.first().cloned().unwrap_or(Object::Null),
        Err(err) => err,
    }
}

fn last(args: &[Object]) -> Object {
    match array_argument("last", args) {
        Ok(arr) => arr.last().cloned().unwrap_or(Object::Null),
        Err(err) => err,
    }
}

fn rest(args: &[Object]) -> Object {
    match array_argument("rest", args) {
        Ok([]) => Object::Null,
        Ok([_, tail @ ..]) => Object::Array(tail.to_vec()),
        Err(err) => err,
    }
}

fn push(args: &[Object]) -> Object {
    if let Some(err) = check_arity(args, 2) {
        return err;
    }
    match &args[0] {
        Object::Array(arr) => {
            let mut pushed = arr.clone();
            pushed.push(args[1].clone());
            Object::Array(pushed)
        },
        other => new_error(format!("argument to `push` must be {}, got {}",
            ObjectType::Array, other.object_type())),
    }
}
