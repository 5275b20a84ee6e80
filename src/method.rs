//! Callables attached to composables and dynamic behaviors

use crate::member::Members;
use crate::{DelegationError, DelegationResult};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A method receives the members of the object it is defined on and the call arguments
pub type Method = Arc<dyn Fn(&mut Members, &[Value]) -> DelegationResult<Value> + Send + Sync>;

/// Wrap a closure into a [`Method`]
pub fn method<F>(func: F) -> Method
where
    F: Fn(&mut Members, &[Value]) -> DelegationResult<Value> + Send + Sync + 'static,
{
    Arc::new(func)
}

/// Fetch a positional argument or fail with [`DelegationError::InvalidArgument`]
pub fn required_arg<'a>(args: &'a [Value], index: usize, method: &str) -> DelegationResult<&'a Value> {
    args.get(index).ok_or_else(|| {
        DelegationError::InvalidArgument(format!(
            "{}() expects at least {} argument(s), got {}",
            method,
            index + 1,
            args.len()
        ))
    })
}

/// Name-to-method table. Cloning shares the underlying closures.
#[derive(Clone, Default)]
pub struct MethodTable {
    methods: HashMap<String, Method>,
}

impl MethodTable {
    pub fn new() -> Self {
        Self {
            methods: HashMap::new(),
        }
    }

    /// Register a method, returning the one it replaces
    pub fn insert<F>(&mut self, name: impl Into<String>, func: F) -> Option<Method>
    where
        F: Fn(&mut Members, &[Value]) -> DelegationResult<Value> + Send + Sync + 'static,
    {
        self.methods.insert(name.into(), method(func))
    }

    pub fn insert_method(&mut self, name: impl Into<String>, method: Method) -> Option<Method> {
        self.methods.insert(name.into(), method)
    }

    pub fn get(&self, name: &str) -> Option<Method> {
        self.methods.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Method> {
        self.methods.remove(name)
    }

    /// Invoke `name` against `members`; `None` when no such method exists
    pub fn invoke(
        &self,
        name: &str,
        members: &mut Members,
        args: &[Value],
    ) -> Option<DelegationResult<Value>> {
        self.methods.get(name).map(|method| method(members, args))
    }

    /// All method names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.methods.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl fmt::Debug for MethodTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}
