use std::cell::RefCell;
use std::rc::Rc;
use rustc_hash::FxHashMap;
use crate::object::Object;

pub type Env = Rc<RefCell<Environment>>;

/// Name bindings for one scope plus a link to the enclosing scope.
#[derive(Debug, Default)]
pub struct Environment {
    store: FxHashMap<String, Object>,
    outer: Option<Env>,
}

impl Environment {
    pub fn new() -> Self {
        Environment { store: FxHashMap::default(), outer: None }
    }

    pub fn new_enclosed(outer: Env) -> Self {
        Environment { store: FxHashMap::default(), outer: Some(outer) }
    }

    /// A fresh root scope, shared so closures can hold on to it.
    pub fn new_ref() -> Env {
        Rc::new(RefCell::new(Environment::new()))
    }

    pub fn get(&self, key: &str) -> Option<Object> {
        match self.store.get(key) {
            Some(obj) => Some(obj.clone()),
            None => match &self.outer {
                Some(env) => env.borrow().get(key),
                None      => None,
            },
        }
    }

    /// Always binds in this scope, shadowing any outer binding.
    pub fn set(&mut self, key: String, value: Object) {
        self.store.insert(key, value);
    }
}
