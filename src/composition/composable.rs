//! The owning object and its delegation resolver

use crate::composition::behaviors::{Behavior, OwnerHandle};
use crate::composition::builder::ComposableBuilder;
use crate::config::{DelegationConfig, SetPriority};
use crate::member::{Member, Members, Visibility};
use crate::method::{Method, MethodTable};
use crate::{DelegationError, DelegationResult};
use serde_json::Value;
use std::fmt;
use std::panic::Location;
use tracing::{debug, trace, warn};

/// An object that delegates unresolved property accesses and method calls to
/// an ordered chain of named behaviors.
///
/// Behaviors are consulted in attachment order and the first one able to
/// answer wins. Every behavior in the chain holds this composable's
/// [`OwnerHandle`].
///
/// Cloning produces a new instance (fresh handle) with the same native members
/// and methods but no behaviors; they must be attached again.
pub struct Composable {
    handle: OwnerHandle,
    native: Members,
    methods: MethodTable,
    behaviors: Vec<(String, Box<dyn Behavior>)>,
    config: DelegationConfig,
}

impl Composable {
    /// Create an empty composable reporting `type_name` in errors
    pub fn new(type_name: impl Into<String>) -> Self {
        Self::with_config(type_name, DelegationConfig::default())
    }

    pub fn with_config(type_name: impl Into<String>, config: DelegationConfig) -> Self {
        Self {
            handle: OwnerHandle::new(type_name),
            native: Members::new(),
            methods: MethodTable::new(),
            behaviors: Vec::new(),
            config,
        }
    }

    pub fn builder(type_name: impl Into<String>) -> ComposableBuilder {
        ComposableBuilder::new(type_name)
    }

    pub fn handle(&self) -> &OwnerHandle {
        &self.handle
    }

    pub fn type_name(&self) -> &str {
        self.handle.type_name()
    }

    pub fn config(&self) -> &DelegationConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: DelegationConfig) {
        self.config = config;
    }

    // ------------------------------------------------------------------------
    // Native members
    // ------------------------------------------------------------------------

    pub fn native(&self) -> &Members {
        &self.native
    }

    pub fn native_mut(&mut self) -> &mut Members {
        &mut self.native
    }

    /// Define a native property, returning the member it replaces
    pub fn define_property(
        &mut self,
        name: impl Into<String>,
        value: Value,
        visibility: Visibility,
    ) -> Option<Member> {
        self.native.insert(name, value, visibility)
    }

    /// Define a native method. Native methods operate on the native members.
    pub fn define_method<F>(&mut self, name: impl Into<String>, func: F) -> Option<Method>
    where
        F: Fn(&mut Members, &[Value]) -> DelegationResult<Value> + Send + Sync + 'static,
    {
        self.methods.insert(name, func)
    }

    pub fn methods(&self) -> &MethodTable {
        &self.methods
    }

    pub(crate) fn from_parts(
        type_name: String,
        native: Members,
        methods: MethodTable,
        config: DelegationConfig,
    ) -> Self {
        Self {
            handle: OwnerHandle::new(type_name),
            native,
            methods,
            behaviors: Vec::new(),
            config,
        }
    }

    // ------------------------------------------------------------------------
    // Behavior lifecycle
    // ------------------------------------------------------------------------

    /// Attach `behavior` under `name`.
    ///
    /// An existing behavior with the same name is replaced in place, keeping its
    /// position in the chain, and returned detached.
    pub fn attach_behavior<B: Behavior>(
        &mut self,
        name: impl Into<String>,
        behavior: B,
    ) -> DelegationResult<Option<Box<dyn Behavior>>> {
        self.attach_boxed(name, Box::new(behavior))
    }

    /// [`attach_behavior`](Self::attach_behavior) for an already boxed behavior
    pub fn attach_boxed(
        &mut self,
        name: impl Into<String>,
        mut behavior: Box<dyn Behavior>,
    ) -> DelegationResult<Option<Box<dyn Behavior>>> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DelegationError::InvalidBehaviorName(name));
        }

        behavior.attach(self.handle.clone());

        match self.position(&name) {
            Some(index) => {
                let previous = std::mem::replace(&mut self.behaviors[index].1, behavior);
                debug!(owner = %self.handle, behavior = %name, "replaced behavior");
                Ok(Some(self.release(previous)))
            }
            None => {
                debug!(owner = %self.handle, behavior = %name, "attached behavior");
                self.behaviors.push((name, behavior));
                Ok(None)
            }
        }
    }

    /// Detach the behavior registered under `name` and return it.
    ///
    /// Returns `None` when no such behavior is attached, so repeated calls are
    /// harmless.
    pub fn detach_behavior(&mut self, name: &str) -> Option<Box<dyn Behavior>> {
        let index = self.position(name)?;
        let (_, behavior) = self.behaviors.remove(index);
        debug!(owner = %self.handle, behavior = %name, "detached behavior");
        Some(self.release(behavior))
    }

    /// Detach every behavior, returned in attachment order
    pub fn detach_behaviors(&mut self) -> Vec<(String, Box<dyn Behavior>)> {
        let behaviors = std::mem::take(&mut self.behaviors);
        behaviors
            .into_iter()
            .map(|(name, behavior)| {
                debug!(owner = %self.handle, behavior = %name, "detached behavior");
                (name, self.release(behavior))
            })
            .collect()
    }

    fn release(&self, mut behavior: Box<dyn Behavior>) -> Box<dyn Behavior> {
        if self.config.clear_owner_on_detach {
            behavior.detach();
        }
        behavior
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.behaviors
            .iter()
            .position(|(behavior_name, _)| behavior_name == name)
    }

    pub fn has_behavior(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn behavior(&self, name: &str) -> Option<&(dyn Behavior + 'static)> {
        self.behaviors
            .iter()
            .find(|(behavior_name, _)| behavior_name == name)
            .map(|(_, behavior)| &**behavior)
    }

    pub fn behavior_mut(&mut self, name: &str) -> Option<&mut (dyn Behavior + 'static)> {
        self.behaviors
            .iter_mut()
            .find(|(behavior_name, _)| behavior_name == name)
            .map(|(_, behavior)| &mut **behavior)
    }

    /// The behavior under `name`, if it has concrete type `T`
    pub fn behavior_as<T: Behavior>(&self, name: &str) -> Option<&T> {
        self.behavior(name)?.downcast_ref::<T>()
    }

    pub fn behavior_as_mut<T: Behavior>(&mut self, name: &str) -> Option<&mut T> {
        self.behavior_mut(name)?.downcast_mut::<T>()
    }

    /// Behavior names in attachment order
    pub fn behavior_names(&self) -> Vec<&str> {
        self.behaviors.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn behavior_count(&self) -> usize {
        self.behaviors.len()
    }

    // ------------------------------------------------------------------------
    // Resolution
    // ------------------------------------------------------------------------

    /// Read a property.
    ///
    /// A public native property is returned directly. Otherwise the behaviors
    /// are asked in order, and finally native storage is read regardless of
    /// visibility, since the resolver acts on the owner's behalf.
    pub fn get(&self, name: &str) -> DelegationResult<Value> {
        if let Some(value) = self.native.public_value(name) {
            return Ok(value.clone());
        }

        for (behavior_name, behavior) in &self.behaviors {
            if let Some(value) = behavior.get(name) {
                trace!(owner = %self.handle, behavior = %behavior_name, property = name, "property resolved by behavior");
                return Ok(value);
            }
        }

        match self.native.value(name) {
            Some(value) => {
                trace!(owner = %self.handle, property = name, "property resolved from restricted native member");
                Ok(value.clone())
            }
            None => Err(DelegationError::property_not_found(self.type_name(), name)),
        }
    }

    /// Whether [`get`](Self::get) would succeed. Never fails.
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_ok()
    }

    /// Assign a property.
    ///
    /// With [`SetPriority::NativeFirst`] an existing public native property is
    /// assigned directly. Otherwise the first behavior that defines the
    /// property receives the value (its failure is returned), or the first
    /// dynamic behavior that accepts it (a refusal moves on to the next
    /// behavior). If no behavior takes the value it is stored natively.
    pub fn set(&mut self, name: &str, value: Value) -> DelegationResult<()> {
        if self.config.set_priority == SetPriority::NativeFirst
            && self.native.public_value(name).is_some()
        {
            self.native.set_value(name, value);
            return Ok(());
        }

        for (behavior_name, behavior) in self.behaviors.iter_mut() {
            if behavior.has_property(name) {
                trace!(owner = %self.handle, behavior = %behavior_name, property = name, "property assigned on behavior");
                return behavior.set(name, value);
            }

            if behavior.accepts_dynamic() {
                match behavior.set(name, value.clone()) {
                    Ok(()) => {
                        trace!(owner = %self.handle, behavior = %behavior_name, property = name, "property accepted by dynamic behavior");
                        return Ok(());
                    }
                    Err(error) => {
                        trace!(owner = %self.handle, behavior = %behavior_name, property = name, %error, "dynamic behavior refused property");
                    }
                }
            }
        }

        self.native.set_value(name, value);
        Ok(())
    }

    /// Call a method with `args`.
    ///
    /// Native methods take precedence, then the first behavior responding to
    /// `name`. Fails with [`DelegationError::MethodMissing`] otherwise.
    pub fn call(&mut self, name: &str, args: &[Value]) -> DelegationResult<Value> {
        if let Some(method) = self.methods.get(name) {
            return method(&mut self.native, args);
        }

        for (behavior_name, behavior) in self.behaviors.iter_mut() {
            if behavior.responds_to(name) {
                trace!(owner = %self.handle, behavior = %behavior_name, method = name, "method dispatched to behavior");
                return behavior.call(name, args);
            }
        }

        Err(DelegationError::method_missing(self.handle.type_name(), name))
    }

    /// Whether [`call`](Self::call) would find a target for `name`
    pub fn responds_to(&self, name: &str) -> bool {
        self.methods.contains(name)
            || self
                .behaviors
                .iter()
                .any(|(_, behavior)| behavior.responds_to(name))
    }

    /// Remove a property from the composable and from every behavior providing it.
    ///
    /// A public native property is removed. A restricted one is left in place
    /// and, if no behavior removed anything either, the call fails with
    /// [`DelegationError::AccessDenied`] pointing at the caller. Removing a name
    /// nobody defines is a no-op.
    #[track_caller]
    pub fn unset(&mut self, name: &str) -> DelegationResult<()> {
        let caller = Location::caller();
        let mut removed = false;
        let mut restricted = None;

        match self.native.visibility(name) {
            Some(Visibility::Public) => {
                self.native.remove(name);
                removed = true;
            }
            Some(visibility) => restricted = Some(visibility),
            None => {}
        }

        for (behavior_name, behavior) in self.behaviors.iter_mut() {
            if behavior.unset(name) {
                trace!(owner = %self.handle, behavior = %behavior_name, property = name, "property removed from behavior");
                removed = true;
            }
        }

        match restricted {
            Some(visibility) if !removed => {
                let error =
                    DelegationError::access_denied(self.type_name(), name, visibility, caller);
                warn!(owner = %self.handle, property = name, %error, "refused to remove restricted property");
                Err(error)
            }
            _ => Ok(()),
        }
    }
}

impl Clone for Composable {
    fn clone(&self) -> Self {
        let clone = Self::from_parts(
            self.type_name().to_string(),
            self.native.clone(),
            self.methods.clone(),
            self.config.clone(),
        );
        debug!(
            source = %self.handle,
            clone = %clone.handle,
            dropped_behaviors = self.behaviors.len(),
            "cloned composable without behaviors"
        );
        clone
    }
}

impl fmt::Debug for Composable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Composable")
            .field("handle", &self.handle)
            .field("native", &self.native)
            .field("methods", &self.methods)
            .field("behaviors", &self.behavior_names())
            .field("config", &self.config)
            .finish()
    }
}
