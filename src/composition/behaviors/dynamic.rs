//! Table-driven behavior

use super::{Behavior, OwnerSlot};
use crate::member::{Members, Visibility};
use crate::method::{Method, MethodTable};
use crate::{DelegationError, DelegationResult};
use serde_json::Value;

/// Behavior whose properties and methods live in tables.
///
/// Only public properties are visible to the owner. When built with
/// [`DynamicBehaviorBuilder::dynamic`], assignments of unknown names are stored
/// instead of refused.
///
/// A clone copies the tables but starts detached.
#[derive(Debug, Default)]
pub struct DynamicBehavior {
    owner: OwnerSlot,
    properties: Members,
    methods: MethodTable,
    dynamic: bool,
}

impl DynamicBehavior {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> DynamicBehaviorBuilder {
        DynamicBehaviorBuilder::new()
    }

    pub fn properties(&self) -> &Members {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut Members {
        &mut self.properties
    }

    pub fn methods(&self) -> &MethodTable {
        &self.methods
    }

    /// Public property value
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.properties.public_value(name)
    }

    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }
}

impl Clone for DynamicBehavior {
    fn clone(&self) -> Self {
        Self {
            owner: OwnerSlot::new(),
            properties: self.properties.clone(),
            methods: self.methods.clone(),
            dynamic: self.dynamic,
        }
    }
}

impl Behavior for DynamicBehavior {
    fn owner_slot(&self) -> &OwnerSlot {
        &self.owner
    }

    fn owner_slot_mut(&mut self) -> &mut OwnerSlot {
        &mut self.owner
    }

    fn get(&self, name: &str) -> Option<Value> {
        self.properties.public_value(name).cloned()
    }

    fn has_property(&self, name: &str) -> bool {
        self.properties.public_value(name).is_some()
    }

    fn set(&mut self, name: &str, value: Value) -> DelegationResult<()> {
        match self.properties.visibility(name) {
            Some(Visibility::Public) => {
                self.properties.set_value(name, value);
                Ok(())
            }
            None if self.dynamic => {
                self.properties.set_value(name, value);
                Ok(())
            }
            _ => Err(DelegationError::read_only(name)),
        }
    }

    fn accepts_dynamic(&self) -> bool {
        self.dynamic
    }

    fn unset(&mut self, name: &str) -> bool {
        if self.has_property(name) {
            self.properties.remove(name).is_some()
        } else {
            false
        }
    }

    fn responds_to(&self, method: &str) -> bool {
        self.methods.contains(method)
    }

    fn call(&mut self, method: &str, args: &[Value]) -> DelegationResult<Value> {
        match self.methods.invoke(method, &mut self.properties, args) {
            Some(result) => result,
            None => Err(DelegationError::method_missing(self.kind(), method)),
        }
    }

    fn kind(&self) -> &str {
        "DynamicBehavior"
    }
}

/// Builder for [`DynamicBehavior`]
#[derive(Debug, Default)]
pub struct DynamicBehaviorBuilder {
    properties: Members,
    methods: MethodTable,
    dynamic: bool,
}

impl DynamicBehaviorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a public property
    pub fn property(mut self, name: impl Into<String>, value: Value) -> Self {
        self.properties.insert(name, value, Visibility::Public);
        self
    }

    /// Add a property hidden from the owner but readable by the behavior's methods
    pub fn hidden_property(mut self, name: impl Into<String>, value: Value) -> Self {
        self.properties.insert(name, value, Visibility::Private);
        self
    }

    /// Add a method
    pub fn method<F>(mut self, name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&mut Members, &[Value]) -> DelegationResult<Value> + Send + Sync + 'static,
    {
        self.methods.insert(name, func);
        self
    }

    /// Add an already shared method
    pub fn shared_method(mut self, name: impl Into<String>, method: Method) -> Self {
        self.methods.insert_method(name, method);
        self
    }

    /// Accept assignments of names the behavior does not define
    pub fn dynamic(mut self) -> Self {
        self.dynamic = true;
        self
    }

    pub fn build(self) -> DynamicBehavior {
        DynamicBehavior {
            owner: OwnerSlot::new(),
            properties: self.properties,
            methods: self.methods,
            dynamic: self.dynamic,
        }
    }
}

/// Build a [`DynamicBehavior`] from property and method lists
///
/// # Example
/// ```
/// use behaviorable::behavior;
/// use behaviorable::composition::Behavior;
/// use serde_json::json;
///
/// let mut counter = behavior! {
///     properties: { "count" => json!(0) },
///     methods: {
///         "increment" => |props, _args| {
///             let next = props.value("count").and_then(|v| v.as_i64()).unwrap_or(0) + 1;
///             props.set_value("count", json!(next));
///             Ok(json!(next))
///         },
///     },
/// };
///
/// assert_eq!(counter.call("increment", &[]).unwrap(), json!(1));
/// assert_eq!(counter.get("count"), Some(json!(1)));
/// ```
#[macro_export]
macro_rules! behavior {
    (
        $( properties: { $( $prop:expr => $value:expr ),* $(,)? } $(,)? )?
        $( methods: { $( $method:expr => $func:expr ),* $(,)? } $(,)? )?
    ) => {{
        let builder = $crate::composition::DynamicBehavior::builder();
        $( $( let builder = builder.property($prop, $value); )* )?
        $( $( let builder = builder.method($method, $func); )* )?
        builder.build()
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composition::behaviors::OwnerHandle;
    use crate::method::method;
    use serde_json::json;

    fn counter() -> DynamicBehavior {
        DynamicBehavior::builder()
            .property("count", json!(0))
            .hidden_property("step", json!(2))
            .method("increment", |props, _args| {
                let step = props.value("step").and_then(Value::as_i64).unwrap_or(1);
                let next = props.value("count").and_then(Value::as_i64).unwrap_or(0) + step;
                props.set_value("count", json!(next));
                Ok(json!(next))
            })
            .build()
    }

    #[test]
    fn test_public_properties_only() {
        let behavior = counter();
        assert_eq!(behavior.get("count"), Some(json!(0)));
        assert!(behavior.has_property("count"));
        assert_eq!(behavior.get("step"), None);
        assert!(!behavior.has_property("step"));
    }

    #[test]
    fn test_methods_see_hidden_properties() {
        let mut behavior = counter();
        assert!(behavior.responds_to("increment"));
        assert_eq!(behavior.call("increment", &[]).unwrap(), json!(2));
        assert_eq!(behavior.value("count"), Some(&json!(2)));
        assert!(behavior.call("decrement", &[]).unwrap_err().is_method_missing());
    }

    #[test]
    fn test_set_rules() {
        let mut behavior = counter();
        behavior.set("count", json!(10)).unwrap();
        assert_eq!(behavior.get("count"), Some(json!(10)));

        assert_eq!(
            behavior.set("step", json!(5)),
            Err(DelegationError::read_only("step"))
        );
        assert_eq!(
            behavior.set("unknown", json!(5)),
            Err(DelegationError::read_only("unknown"))
        );

        assert!(!behavior.is_dynamic());

        let mut open = DynamicBehavior::builder().dynamic().build();
        assert!(open.is_dynamic());
        assert!(open.accepts_dynamic());
        open.set("unknown", json!(5)).unwrap();
        assert_eq!(open.get("unknown"), Some(json!(5)));
    }

    #[test]
    fn test_unset_public_only() {
        let mut behavior = counter();
        assert!(behavior.unset("count"));
        assert!(!behavior.unset("count"));
        assert!(!behavior.unset("step"));
        assert!(behavior.properties().contains("step"));
    }

    #[test]
    fn test_shared_method() {
        let echo = method(|_props, args| Ok(args.first().cloned().unwrap_or(Value::Null)));
        let mut first = DynamicBehavior::builder()
            .shared_method("echo", echo.clone())
            .build();
        let mut second = DynamicBehavior::builder()
            .shared_method("repeat", echo)
            .build();

        assert_eq!(first.call("echo", &[json!(1)]).unwrap(), json!(1));
        assert_eq!(second.call("repeat", &[json!(2)]).unwrap(), json!(2));
        assert!(!second.responds_to("echo"));
    }

    #[test]
    fn test_clone_starts_detached() {
        let mut behavior = counter();
        behavior.attach(OwnerHandle::new("Owner"));
        behavior.set("count", json!(5)).unwrap();

        let copy = behavior.clone();

        assert!(behavior.is_attached());
        assert!(!copy.is_attached());
        assert!(copy.owner().is_none());
        assert_eq!(copy.value("count"), Some(&json!(5)));
        assert!(copy.responds_to("increment"));
    }

    #[test]
    fn test_behavior_macro() {
        let mut behavior = behavior! {
            properties: { "name" => json!("macro"), "size" => json!(3) },
            methods: {
                "echo" => |_props, args| Ok(args.first().cloned().unwrap_or(Value::Null)),
            },
        };

        assert_eq!(behavior.get("name"), Some(json!("macro")));
        assert_eq!(behavior.get("size"), Some(json!(3)));
        assert_eq!(behavior.call("echo", &[json!("hi")]).unwrap(), json!("hi"));

        let empty = behavior! {};
        assert!(empty.properties().is_empty());
        assert!(empty.methods().is_empty());
    }
}
