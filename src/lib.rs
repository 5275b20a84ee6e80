//! # behaviorable
//!
//! Composition through attachable behaviors.
//!
//! A [`Composable`] owns an ordered chain of named [`Behavior`]s. Any property
//! access or method call the composable cannot satisfy itself is delegated to
//! the first attached behavior able to answer it:
//! - **Composable**: native properties (tagged with a [`Visibility`]), native
//!   methods and the behavior chain
//! - **Behavior**: a delegate object holding a non-owning [`OwnerHandle`] back
//!   to the composable it is attached to
//! - **Resolver**: `get`, `set`, `call`, `has` and `unset` on the composable
//!
//! ## Resolution order
//!
//! | Operation | Order                                                                 |
//! |-----------|-----------------------------------------------------------------------|
//! | `get`     | public native property, behaviors in attachment order, native storage |
//! | `set`     | public native property, first qualifying behavior, native storage     |
//! | `call`    | native method, first behavior responding to the method                |
//! | `has`     | same as `get`, never fails                                            |
//! | `unset`   | public native property, then every behavior providing the name        |
//!
//! ## Example
//!
//! ```rust
//! use behaviorable::prelude::*;
//! use serde_json::json;
//!
//! let mut owner = Composable::new("Document");
//! owner
//!     .attach_behavior(
//!         "timestamps",
//!         DynamicBehavior::builder()
//!             .property("created_at", json!("2024-01-01"))
//!             .method("touch", |props, _args| {
//!                 props.set_value("created_at", json!("now"));
//!                 Ok(JsonValue::Null)
//!             })
//!             .build(),
//!     )
//!     .unwrap();
//!
//! assert_eq!(owner.get("created_at").unwrap(), json!("2024-01-01"));
//! owner.call("touch", &[]).unwrap();
//! assert_eq!(owner.get("created_at").unwrap(), json!("now"));
//! assert!(owner.call("missing", &[]).unwrap_err().is_method_missing());
//! ```

// ============================================================================
// CORE MODULES
// ============================================================================

pub mod composition;
pub mod config;
pub mod member;
pub mod method;

// ============================================================================
// CORE RE-EXPORTS
// ============================================================================

// Behavior chain and resolver
pub use composition::{
    Behavior, Composable, ComposableBuilder, DynamicBehavior, DynamicBehaviorBuilder, FnBehavior,
    OwnerHandle, OwnerSlot, SharedComposable,
};

// Configuration
pub use config::{ConfigError, DelegationConfig, SetPriority};

// Member storage
pub use member::{Member, Members, Visibility};

// Callables
pub use method::{Method, MethodTable};

// ============================================================================
// CONVENIENCE RE-EXPORTS
// ============================================================================

/// Commonly used external types
pub use serde_json::Value as JsonValue;

/// Convenient re-exports for common types and traits
pub mod prelude {
    pub use crate::{
        Behavior, Composable, ComposableBuilder, DelegationConfig, DelegationError,
        DelegationResult, DynamicBehavior, FnBehavior, Members, OwnerHandle, OwnerSlot,
        SetPriority, SharedComposable, Visibility,
    };

    // Commonly used external types
    pub use serde_json::Value as JsonValue;
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// Result type alias for delegation operations
pub type DelegationResult<T> = Result<T, DelegationError>;

/// Errors raised while resolving members through a composable and its behaviors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DelegationError {
    /// Neither the composable nor any behavior provides the property
    #[error("Undefined property: {type_name}::${name}")]
    PropertyNotFound { type_name: String, name: String },

    /// Neither the composable nor any behavior provides the method
    #[error("Undefined method {type_name}::{name}() in class and its behaviors.")]
    MethodMissing { type_name: String, name: String },

    /// Removal of a restricted native property that no behavior could remove
    #[error("Cannot access {visibility} property {type_name}::${name} in {file} on line {line}")]
    AccessDenied {
        type_name: String,
        name: String,
        visibility: Visibility,
        file: String,
        line: u32,
    },

    /// A behavior was attached under an empty name
    #[error("Invalid behavior name: {0:?}")]
    InvalidBehaviorName(String),

    /// A behavior refused an assignment
    #[error("Cannot assign read-only property ${name}")]
    ReadOnly { name: String },

    /// A method rejected its arguments
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Any other failure raised by a behavior or a method
    #[error("Execution error: {0}")]
    Execution(String),
}

impl DelegationError {
    pub fn property_not_found(type_name: &str, name: &str) -> Self {
        Self::PropertyNotFound {
            type_name: type_name.to_string(),
            name: name.to_string(),
        }
    }

    pub fn method_missing(type_name: &str, name: &str) -> Self {
        Self::MethodMissing {
            type_name: type_name.to_string(),
            name: name.to_string(),
        }
    }

    /// Builds an access error pointing at the given call site
    pub fn access_denied(
        type_name: &str,
        name: &str,
        visibility: Visibility,
        location: &std::panic::Location<'_>,
    ) -> Self {
        Self::AccessDenied {
            type_name: type_name.to_string(),
            name: name.to_string(),
            visibility,
            file: location.file().to_string(),
            line: location.line(),
        }
    }

    pub fn read_only(name: &str) -> Self {
        Self::ReadOnly {
            name: name.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::PropertyNotFound { .. })
    }

    pub fn is_method_missing(&self) -> bool {
        matches!(self, Self::MethodMissing { .. })
    }

    pub fn is_access_denied(&self) -> bool {
        matches!(self, Self::AccessDenied { .. })
    }
}

// ============================================================================
// INTEGRATION TESTS
// ============================================================================
