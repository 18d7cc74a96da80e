use std::cell::RefCell;
use std::collections::BTreeMap;
use std::ops::ControlFlow;
use std::rc::Rc;
use tracing::trace;
use crate::ast::{BlockStatement, Expression, Identifier, Node, Program, Statement};
use crate::builtin::Builtins;
use crate::environment::{Env, Environment};
use crate::error::EvalError;
use crate::object::{Function, HashKey, HashPair, Object};
use crate::stack::ensure_sufficient_stack;

pub const DEFAULT_MAX_DEPTH: usize = 2000;

pub type EvalResult = Result<Object, EvalError>;

/// Tree-walking evaluator.
///
/// Language errors, including type mismatches and unknown names, come back
/// as [`Object::Error`] inside `Ok`. `Err` is reserved for conditions that
/// abort the run, such as exceeding the call depth limit.
pub struct Evaluator {
    builtins: Builtins,
    max_depth: usize,
    depth: usize,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    pub fn new() -> Self {
        Self::with_builtins(Builtins::standard())
    }

    pub fn with_builtins(builtins: Builtins) -> Self {
        Self {
            builtins,
            max_depth: DEFAULT_MAX_DEPTH,
            depth: 0,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn eval(&mut self, node: Node, env: &Env) -> EvalResult {
        match node {
            Node::Program(program) => self.eval_program(program, env),
            Node::Statement(stmt) => self.eval_statement(stmt, env),
            Node::Expression(exp) => self.eval_expression(exp, env),
        }
    }

    pub fn eval_program(&mut self, program: &Program, env: &Env) -> EvalResult {
        let mut result = Object::Null;

        for stmt in &program.statements {
            result = self.eval_statement(stmt, env)?;

            if let Object::ReturnValue(ret) = result {
                return Ok(*ret);
            }
            if matches!(result, Object::Error(_)) {
                return Ok(result);
            }
        }
        Ok(result)
    }

    fn eval_statement(&mut self, stmt: &Statement, env: &Env) -> EvalResult {
        match stmt {
            Statement::Expression { expression, .. } => self.eval_expression(expression, env),
            Statement::Return { value, .. } => {
                let val = match value {
                    Some(value) => self.eval_expression(value, env)?,
                    None => Object::Null,
                };
                if is_signal(&val) {
                    return Ok(val);
                }
                Ok(Object::ReturnValue(Box::new(val)))
            }
            Statement::Let { name, value, .. } => {
                let val = self.eval_expression(value, env)?;
                if is_signal(&val) {
                    return Ok(val);
                }
                env.borrow_mut().set(name.value.clone(), val);
                Ok(Object::Null)
            }
        }
    }

    // Stops at the first return signal or error and hands it up unchanged.
    fn eval_block_statement(&mut self, block: &BlockStatement, env: &Env) -> EvalResult {
        let mut result = Object::Null;

        for stmt in &block.statements {
            result = self.eval_statement(stmt, env)?;

            if is_signal(&result) {
                return Ok(result);
            }
        }

        Ok(result)
    }

    // Branch bodies get their own scope so their `let`s do not leak out.
    fn eval_scoped_block(&mut self, block: &BlockStatement, env: &Env) -> EvalResult {
        let scope = Rc::new(RefCell::new(Environment::new_enclosed(Rc::clone(env))));
        self.eval_block_statement(block, &scope)
    }

    fn eval_expression(&mut self, exp: &Expression, env: &Env) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_expression_inner(exp, env))
    }

    fn eval_expression_inner(&mut self, exp: &Expression, env: &Env) -> EvalResult {
        match exp {
            Expression::Integer { value, .. } => Ok(Object::Integer(*value)),
            Expression::Float { value, .. } => Ok(Object::Float(*value)),
            Expression::String { value, .. } => Ok(Object::String(value.clone())),
            Expression::Boolean { value, .. } => Ok(Object::Boolean(*value)),
            Expression::Prefix { operator, right, .. } => {
                let right = self.eval_expression(right, env)?;
                if is_signal(&right) {
                    return Ok(right);
                }
                Ok(eval_prefix_expression(operator, right))
            },
            Expression::Infix { operator, left, right, .. } => {
                let left = self.eval_expression(left, env)?;
                if is_signal(&left) {
                    return Ok(left)
                }
                let right = self.eval_expression(right, env)?;
                if is_signal(&right) {
                    return Ok(right)
                }
                Ok(eval_infix_expression(operator, left, right))
            },
            Expression::If { condition, consequence, alternative, .. } => {
                let condition = self.eval_expression(condition, env)?;
                if is_signal(&condition) {
                    return Ok(condition);
                }

                if is_truthy(&condition) {
                    self.eval_scoped_block(consequence, env)
                } else {
                    match alternative {
                        None => Ok(Object::Null),
                        Some(alt) => self.eval_scoped_block(alt, env)
                    }
                }
            },
            Expression::Identifier(ident) => Ok(self.eval_identifier(ident, env)),
            Expression::Function { parameters, body, .. } => {
                Ok(Object::Function(Rc::new(Function {
                    parameters: parameters.clone(),
                    body: body.clone(),
                    env: Rc::clone(env),
                })))
            },
            Expression::Call { function, arguments, .. } => {
                let function = self.eval_expression(function, env)?;
                if is_signal(&function) {
                    return Ok(function);
                }
                let args = match self.eval_expressions(arguments, env)? {
                    ControlFlow::Continue(args) => args,
                    ControlFlow::Break(signal) => return Ok(signal),
                };
                self.apply_function(function, args)
            },
            Expression::Array { elements, .. } => {
                match self.eval_expressions(elements, env)? {
                    ControlFlow::Continue(elements) => Ok(Object::Array(elements)),
                    ControlFlow::Break(signal) => Ok(signal),
                }
            },
            Expression::Index { left, index, .. } => {
                let left = self.eval_expression(left, env)?;
                if is_signal(&left) {
                    return Ok(left);
                }
                let index = self.eval_expression(index, env)?;
                if is_signal(&index) {
                    return Ok(index);
                }
                Ok(eval_index_expression(left, index))
            },
            Expression::Hash { pairs, .. } => self.eval_hash_literal(pairs, env),
        }
    }

    fn eval_identifier(&self, ident: &Identifier, env: &Env) -> Object {
        if let Some(obj) = env.borrow().get(&ident.value) {
            return obj;
        }
        match self.builtins.look_up(&ident.value) {
            Some(builtin) => Object::Builtin(builtin),
            None => new_error(format!("identifier not found: {}", ident.value))
        }
    }

    // Left to right; the first error or return signal stops the list.
    fn eval_expressions(&mut self, exps: &[Expression], env: &Env) -> Result<ControlFlow<Object, Vec<Object>>, EvalError> {
        let mut result = Vec::with_capacity(exps.len());

        for exp in exps {
            let evaluated = self.eval_expression(exp, env)?;
            if is_signal(&evaluated) {
                return Ok(ControlFlow::Break(evaluated));
            }
            result.push(evaluated);
        }
        Ok(ControlFlow::Continue(result))
    }

    // Duplicate keys: the last pair written wins.
    fn eval_hash_literal(&mut self, pairs: &[(Expression, Expression)], env: &Env) -> EvalResult {
        let mut hash = BTreeMap::new();
        for (key, value) in pairs {
            let key = self.eval_expression(key, env)?;
            if is_signal(&key) {
                return Ok(key);
            }

            let hashed_key = match key.hash_key() {
                Some(hashed_key) => hashed_key,
                None => return Ok(new_error(format!("unusable as hash key: {}", key.object_type()))),
            };

            let value = self.eval_expression(value, env)?;
            if is_signal(&value) {
                return Ok(value);
            }

            hash.insert(hashed_key, HashPair { key, value });
        }
        Ok(Object::Hash(hash))
    }

    fn apply_function(&mut self, function: Object, args: Vec<Object>) -> EvalResult {
        match function {
            Object::Function(func) => {
                if func.parameters.len() != args.len() {
                    return Ok(new_error(format!("wrong number of arguments: want={}, got={}",
                        func.parameters.len(), args.len())));
                }
                if self.depth >= self.max_depth {
                    return Err(EvalError::CallDepthExceeded { limit: self.max_depth });
                }

                // parented to the closure's scope, not the caller's
                let mut scope = Environment::new_enclosed(Rc::clone(&func.env));
                for (param, arg) in func.parameters.iter().zip(args) {
                    scope.set(param.value.clone(), arg);
                }
                let scope = Rc::new(RefCell::new(scope));

                self.depth += 1;
                trace!(depth = self.depth, "calling function");
                let result = self.eval_block_statement(&func.body, &scope);
                self.depth -= 1;

                Ok(unwrap_return_value(result?))
            }
            Object::Builtin(bf) => {
                trace!(name = bf.name(), "calling builtin");
                Ok(bf.call(&args))
            },
            other => Ok(new_error(format!("not a function: {}", other.object_type()))),
        }
    }
}

fn unwrap_return_value(obj: Object) -> Object {
    match obj {
        Object::ReturnValue(value) => *value,
        other => other,
    }
}

// A return or an error raised inside a subexpression, on its way up to the
// enclosing block or call.
fn is_signal(val: &Object) -> bool {
    matches!(val, Object::ReturnValue(_) | Object::Error(_))
}

pub fn new_error(msg: impl Into<String>) -> Object {
    Object::Error(msg.into())
}

/// Only `null` and `false` are falsy.
pub fn is_truthy(obj: &Object) -> bool {
    match obj {
        Object::Null => false,
        Object::Boolean(b) => *b,
        _ => true,
    }
}

fn eval_prefix_expression(operator: &str, right: Object) -> Object {
    match operator {
        "!" => Object::Boolean(!is_truthy(&right)),
        "-" => eval_minus_prefix_expression(right),
        _ => new_error(format!("unknown operator: {}{}", operator, right.object_type())),
    }
}

fn eval_minus_prefix_expression(right: Object) -> Object {
    match right {
        Object::Integer(i) => i.checked_neg().map_or_else(overflow, Object::Integer),
        Object::Float(x) => Object::Float(-x),
        _ => new_error(format!("unknown operator: -{}", right.object_type())),
    }
}

fn eval_infix_expression(operator: &str, left: Object, right: Object) -> Object {
    match (&left, &right) {
        (Object::Integer(l), Object::Integer(r)) => eval_integer_infix_expression(operator, *l, *r),
        (Object::Float(l), Object::Float(r)) => eval_float_infix_expression(operator, *l, *r),
        (Object::String(l), Object::String(r)) => eval_string_infix_expression(operator, l, r),
        _ => match operator {
            "==" => Object::Boolean(left == right),
            "!=" => Object::Boolean(left != right),
            _ if left.object_type() != right.object_type() => new_error(format!("type mismatch: {} {} {}",
                left.object_type(), operator, right.object_type())),
            _ => unknown_infix_operator(operator, &left, &right),
        }
    }
}

fn unknown_infix_operator(operator: &str, left: &Object, right: &Object) -> Object {
    new_error(format!("unknown operator: {} {} {}", left.object_type(), operator, right.object_type()))
}

fn overflow() -> Object {
    new_error("integer overflow")
}

fn division_by_zero() -> Object {
    new_error("division by zero")
}

fn eval_integer_infix_expression(operator: &str, left: i64, right: i64) -> Object {
    let checked = match operator {
        "+" => left.checked_add(right),
        "-" => left.checked_sub(right),
        "*" => left.checked_mul(right),
        "/" if right == 0 => return division_by_zero(),
        "/" => left.checked_div(right),
        "<" => return Object::Boolean(left < right),
        ">" => return Object::Boolean(left > right),
        "==" => return Object::Boolean(left == right),
        "!=" => return Object::Boolean(left != right),
        _ => return unknown_infix_operator(operator, &Object::Integer(left), &Object::Integer(right)),
    };
    checked.map_or_else(overflow, Object::Integer)
}

fn eval_float_infix_expression(operator: &str, left: f64, right: f64) -> Object {
    match operator {
        "+" => Object::Float(left + right),
        "-" => Object::Float(left - right),
        "*" => Object::Float(left * right),
        "/" if right == 0.0 => division_by_zero(),
        "/" => Object::Float(left / right),
        "<" => Object::Boolean(left < right),
        ">" => Object::Boolean(left > right),
        "==" => Object::Boolean(left == right),
        "!=" => Object::Boolean(left != right),
        _ => unknown_infix_operator(operator, &Object::Float(left), &Object::Float(right)),
    }
}

fn eval_string_infix_expression(operator: &str, left: &str, right: &str) -> Object {
    match operator {
        "+" => Object::String(format!("{}{}", left, right)),
        "==" => Object::Boolean(left == right),
        "!=" => Object::Boolean(left != right),
        _ => new_error(format!("unknown operator: STRING {} STRING", operator)),
    }
}

fn eval_index_expression(left: Object, index: Object) -> Object {
    match (&left, &index) {
        (Object::Array(arr), Object::Integer(i)) => eval_array_index(arr, *i),
        (Object::Hash(hash), _) => eval_hash_index(hash, &index),
        _ => new_error(format!("index operator not supported: {}", left.object_type())),
    }
}

// Out of range, negative included, is null rather than an error.
fn eval_array_index(arr: &[Object], index: i64) -> Object {
    usize::try_from(index)
        .ok()
        .and_then(|i| arr.get(i))
        .cloned()
        .unwrap_or(Object::Null)
}

fn eval_hash_index(hash: &BTreeMap<HashKey, HashPair>, index: &Object) -> Object {
    match index.hash_key() {
        Some(key) => hash.get(&key).map_or(Object::Null, |pair| pair.value.clone()),
        None => new_error(format!("unusable as hash key: {}", index.object_type())),
    }
}
