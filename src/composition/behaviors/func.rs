//! Closure-backed behaviors

use super::{Behavior, OwnerSlot};
use crate::{DelegationError, DelegationResult};
use serde_json::Value;

/// Wraps a single closure as a callable behavior method
pub struct FnBehavior<F> {
    owner: OwnerSlot,
    method: String,
    func: F,
}

impl<F> FnBehavior<F>
where
    F: Fn(&[Value]) -> DelegationResult<Value> + Send + Sync + 'static,
{
    pub fn new(method: impl Into<String>, func: F) -> Self {
        Self {
            owner: OwnerSlot::new(),
            method: method.into(),
            func,
        }
    }

    pub fn method_name(&self) -> &str {
        &self.method
    }
}

impl<F> Behavior for FnBehavior<F>
where
    F: Fn(&[Value]) -> DelegationResult<Value> + Send + Sync + 'static,
{
    fn owner_slot(&self) -> &OwnerSlot {
        &self.owner
    }

    fn owner_slot_mut(&mut self) -> &mut OwnerSlot {
        &mut self.owner
    }

    fn responds_to(&self, method: &str) -> bool {
        self.method == method
    }

    fn call(&mut self, method: &str, args: &[Value]) -> DelegationResult<Value> {
        if self.method == method {
            (self.func)(args)
        } else {
            Err(DelegationError::method_missing(self.kind(), method))
        }
    }

    fn kind(&self) -> &str {
        "FnBehavior"
    }
}

/// Box any behavior for [`Composable::attach_boxed`](crate::Composable::attach_boxed)
pub fn boxed<B: Behavior>(behavior: B) -> Box<dyn Behavior> {
    Box::new(behavior)
}

/// Shorthand for a boxed [`FnBehavior`]
pub fn fn_behavior<F>(method: impl Into<String>, func: F) -> Box<dyn Behavior>
where
    F: Fn(&[Value]) -> DelegationResult<Value> + Send + Sync + 'static,
{
    Box::new(FnBehavior::new(method, func))
}
