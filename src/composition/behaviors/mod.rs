//! Behavior trait and stock behavior implementations

pub mod dynamic;
pub mod func;

use crate::{DelegationError, DelegationResult};
use downcast_rs::{Downcast, impl_downcast};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

pub use dynamic::*;
pub use func::*;

/// Non-owning reference from a behavior back to the composable it is attached to.
///
/// Identifies the owner by its unique instance id; the type name is kept for
/// diagnostics. Two handles are equal when they name the same instance.
///
/// A handle is an identity token only. It cannot be resolved to the owner, so
/// a behavior has no access to its owner's members through it. State a
/// behavior's methods need must live in the behavior itself, or be reached by
/// the caller through [`Composable`](crate::Composable) and passed in as
/// arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnerHandle {
    id: Uuid,
    type_name: String,
}

impl OwnerHandle {
    pub(crate) fn new(type_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            type_name: type_name.into(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }
}

impl fmt::Display for OwnerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.type_name, self.id)
    }
}

/// Storage for a behavior's owner handle, for behaviors implemented by hand
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnerSlot {
    owner: Option<OwnerHandle>,
}

impl OwnerSlot {
    pub fn new() -> Self {
        Self { owner: None }
    }

    pub fn get(&self) -> Option<&OwnerHandle> {
        self.owner.as_ref()
    }

    pub fn set(&mut self, owner: OwnerHandle) {
        self.owner = Some(owner);
    }

    pub fn clear(&mut self) {
        self.owner = None;
    }

    pub fn is_set(&self) -> bool {
        self.owner.is_some()
    }
}

/// A delegate object a [`Composable`](crate::Composable) forwards unresolved
/// accesses to.
///
/// Only access to the behavior's [`OwnerSlot`] is required; the lifecycle
/// hooks are built on it. Every delegation capability defaults to "not
/// provided", so a behavior exposes exactly what it overrides.
///
/// # Example
/// ```
/// use behaviorable::composition::{Behavior, OwnerSlot};
/// use serde_json::{json, Value};
///
/// #[derive(Default)]
/// struct Version {
///     owner: OwnerSlot,
/// }
///
/// impl Behavior for Version {
///     fn owner_slot(&self) -> &OwnerSlot {
///         &self.owner
///     }
///
///     fn owner_slot_mut(&mut self) -> &mut OwnerSlot {
///         &mut self.owner
///     }
///
///     fn get(&self, name: &str) -> Option<Value> {
///         (name == "version").then(|| json!("1.0"))
///     }
/// }
///
/// assert_eq!(Version::default().get("version"), Some(json!("1.0")));
/// ```
pub trait Behavior: Downcast + Send + Sync {
    fn owner_slot(&self) -> &OwnerSlot;

    fn owner_slot_mut(&mut self) -> &mut OwnerSlot;

    /// The composable this behavior is attached to
    fn owner(&self) -> Option<&OwnerHandle> {
        self.owner_slot().get()
    }

    /// Record `owner` as the back-reference
    fn attach(&mut self, owner: OwnerHandle) {
        self.owner_slot_mut().set(owner);
    }

    /// Clear the back-reference. Idempotent.
    fn detach(&mut self) {
        self.owner_slot_mut().clear();
    }

    fn is_attached(&self) -> bool {
        self.owner_slot().is_set()
    }

    /// Value of a property, `None` if this behavior cannot produce it
    fn get(&self, _name: &str) -> Option<Value> {
        None
    }

    /// Whether this behavior already defines the property
    fn has_property(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Assign a property
    fn set(&mut self, name: &str, _value: Value) -> DelegationResult<()> {
        Err(DelegationError::read_only(name))
    }

    /// Whether this behavior may accept assignments of names it does not define
    fn accepts_dynamic(&self) -> bool {
        false
    }

    /// Remove a property, returning whether anything was removed
    fn unset(&mut self, _name: &str) -> bool {
        false
    }

    /// Whether `method` can be called on this behavior
    fn responds_to(&self, _method: &str) -> bool {
        false
    }

    /// Invoke `method` with the forwarded arguments
    fn call(&mut self, method: &str, _args: &[Value]) -> DelegationResult<Value> {
        Err(DelegationError::method_missing(self.kind(), method))
    }

    /// Behavior type name for diagnostics
    fn kind(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl_downcast!(Behavior);

impl fmt::Debug for dyn Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Behavior")
            .field("kind", &self.kind())
            .field("owner", &self.owner())
            .finish()
    }
}
