//! Composition through attachable behaviors.
//!
//! A [`Composable`] owns an ordered chain of named [`Behavior`]s and forwards
//! every access it cannot satisfy natively along that chain.

pub mod behaviors;
pub mod builder;
pub mod composable;
pub mod shared;

pub use behaviors::*;
pub use builder::*;
pub use composable::*;
pub use shared::*;
