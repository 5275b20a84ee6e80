//! Composable builder
//!
//! Fluent construction of a composable with its native members and initial behaviors

use crate::composition::behaviors::Behavior;
use crate::composition::composable::Composable;
use crate::config::DelegationConfig;
use crate::member::{Members, Visibility};
use crate::method::MethodTable;
use crate::DelegationResult;
use serde_json::Value;

/// Builder for [`Composable`]
pub struct ComposableBuilder {
    type_name: String,
    native: Members,
    methods: MethodTable,
    behaviors: Vec<(String, Box<dyn Behavior>)>,
    config: DelegationConfig,
}

impl ComposableBuilder {
    /// Create a builder for a composable reporting `type_name` in errors
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            native: Members::new(),
            methods: MethodTable::new(),
            behaviors: Vec::new(),
            config: DelegationConfig::default(),
        }
    }

    /// Define a public native property
    pub fn property(self, name: impl Into<String>, value: Value) -> Self {
        self.member(name, value, Visibility::Public)
    }

    /// Define a protected native property
    pub fn protected_property(self, name: impl Into<String>, value: Value) -> Self {
        self.member(name, value, Visibility::Protected)
    }

    /// Define a private native property
    pub fn private_property(self, name: impl Into<String>, value: Value) -> Self {
        self.member(name, value, Visibility::Private)
    }

    /// Define a native property with an explicit visibility
    pub fn member(mut self, name: impl Into<String>, value: Value, visibility: Visibility) -> Self {
        self.native.insert(name, value, visibility);
        self
    }

    /// Define a native method
    pub fn method<F>(mut self, name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&mut Members, &[Value]) -> DelegationResult<Value> + Send + Sync + 'static,
    {
        self.methods.insert(name, func);
        self
    }

    /// Queue a behavior for attachment, in call order
    pub fn behavior<B: Behavior>(mut self, name: impl Into<String>, behavior: B) -> Self {
        self.behaviors.push((name.into(), Box::new(behavior)));
        self
    }

    /// Queue an already boxed behavior
    pub fn boxed_behavior(mut self, name: impl Into<String>, behavior: Box<dyn Behavior>) -> Self {
        self.behaviors.push((name.into(), behavior));
        self
    }

    pub fn config(mut self, config: DelegationConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the composable and attach the queued behaviors.
    ///
    /// Fails if a behavior name is empty.
    pub fn build(self) -> DelegationResult<Composable> {
        let mut composable =
            Composable::from_parts(self.type_name, self.native, self.methods, self.config);
        for (name, behavior) in self.behaviors {
            composable.attach_boxed(name, behavior)?;
        }
        Ok(composable)
    }
}
