use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Formatter;
use std::rc::Rc;
use crate::ast::{BlockStatement, Identifier};
use crate::builtin::BuiltinFunction;
use crate::environment::Environment;

#[derive(Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub enum ObjectType {
    Integer,
    Float,
    Boolean,
    String,
    Null,
    ReturnValue,
    Error,
    Function,
    Builtin,
    Array,
    Hash,
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}",
            match self {
                ObjectType::Integer => "INTEGER",
                ObjectType::Float => "FLOAT",
                ObjectType::Boolean => "BOOLEAN",
                ObjectType::String => "STRING",
                ObjectType::Null => "NULL",
                ObjectType::ReturnValue => "RETURN_VALUE",
                ObjectType::Error => "ERROR",
                ObjectType::Function => "FUNCTION",
                ObjectType::Builtin => "BUILTIN",
                ObjectType::Array => "ARRAY",
                ObjectType::Hash => "HASH",
            }
        )
    }
}

/// Map key derived from an integer, boolean or string: the value's type tag
/// plus a 64-bit content hash. Equal values always give equal keys.
#[derive(Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub struct HashKey {
    pub object_type: ObjectType,
    pub value: u64,
}

/// The key value itself is kept next to the mapped value so a hash can be printed.
#[derive(Debug, Clone, PartialEq)]
pub struct HashPair {
    pub key: Object,
    pub value: Object,
}

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1a.
pub fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

/// A user function together with the environment it was created in.
pub struct Function {
    pub parameters: Vec<Identifier>,
    pub body: BlockStatement,
    pub env: Rc<RefCell<Environment>>,
}

// The captured environment usually holds the function itself.
impl fmt::Debug for Function {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("parameters", &self.parameters)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub enum Object {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(String),
    Null,
    ReturnValue(Box<Object>),
    Error(String),
    Function(Rc<Function>),
    Builtin(BuiltinFunction),
    Array(Vec<Object>),
    Hash(BTreeMap<HashKey, HashPair>),
}

impl Object {
    pub fn object_type(&self) -> ObjectType {
        match self {
            Object::Integer(_) => ObjectType::Integer,
            Object::Float(_) => ObjectType::Float,
            Object::Boolean(_) => ObjectType::Boolean,
            Object::String(_) => ObjectType::String,
            Object::Null => ObjectType::Null,
            Object::ReturnValue(_) => ObjectType::ReturnValue,
            Object::Error(_) => ObjectType::Error,
            Object::Function(_) => ObjectType::Function,
            Object::Builtin(_) => ObjectType::Builtin,
            Object::Array(_) => ObjectType::Array,
            Object::Hash(_) => ObjectType::Hash,
        }
    }

    /// `None` for every type that cannot be used as a hash key.
    pub fn hash_key(&self) -> Option<HashKey> {
        let value = match self {
            Object::Integer(i) => *i as u64,
            Object::Boolean(b) => u64::from(*b),
            Object::String(s) => fnv1a(s.as_bytes()),
            _ => return None,
        };
        Some(HashKey {
            object_type: self.object_type(),
            value,
        })
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Object::Integer(a), Object::Integer(b)) => a == b,
            (Object::Float(a), Object::Float(b)) => a == b,
            (Object::Boolean(a), Object::Boolean(b)) => a == b,
            (Object::String(a), Object::String(b)) => a == b,
            (Object::Null, Object::Null) => true,
            (Object::ReturnValue(a), Object::ReturnValue(b)) => a == b,
            (Object::Error(a), Object::Error(b)) => a == b,
            (Object::Function(a), Object::Function(b)) => Rc::ptr_eq(a, b),
            (Object::Builtin(a), Object::Builtin(b)) => a.name() == b.name(),
            (Object::Array(a), Object::Array(b)) => a == b,
            (Object::Hash(a), Object::Hash(b)) => a == b,
            _ => false,
        }
    }
}

fn join<T: fmt::Display>(items: impl Iterator<Item = T>) -> String {
    items.map(|item| item.to_string()).collect::<Vec<_>>().join(", ")
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Object::Integer(i) => write!(f, "{}", i),
            Object::Float(x) => write!(f, "{:.6}", x),
            Object::Boolean(b) => write!(f, "{}", b),
            Object::String(s) => write!(f, "{}", s),
            Object::Null => write!(f, "null"),
            Object::ReturnValue(obj) => write!(f, "{}", obj),
            Object::Error(msg) => write!(f, "ERROR: {}", msg),
            Object::Function(func) => {
                write!(f, "fn({}) {}", join(func.parameters.iter()), func.body)
            },
            Object::Builtin(bf) => write!(f, "builtin function {}", bf),
            Object::Array(arr) => write!(f, "[{}]", join(arr.iter())),
            Object::Hash(hash) => write!(f, "{{{}}}",
                join(hash.values().map(|pair| format!("{}: {}", pair.key, pair.value)))),
        }
    }
}
