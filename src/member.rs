//! Property storage shared by composables and the stock dynamic behavior.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Access level of a property.
///
/// Only [`Visibility::Public`] members are reachable by unrestricted callers;
/// the other levels exist so removal can tell a missing member from a guarded one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

impl Visibility {
    pub fn is_public(self) -> bool {
        matches!(self, Visibility::Public)
    }

    pub fn is_restricted(self) -> bool {
        !self.is_public()
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Public => write!(f, "public"),
            Visibility::Protected => write!(f, "protected"),
            Visibility::Private => write!(f, "private"),
        }
    }
}

/// A property value together with its access level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub value: Value,
    #[serde(default)]
    pub visibility: Visibility,
}

impl Member {
    pub fn new(value: Value, visibility: Visibility) -> Self {
        Self { value, visibility }
    }

    pub fn public(value: Value) -> Self {
        Self::new(value, Visibility::Public)
    }

    pub fn is_public(&self) -> bool {
        self.visibility.is_public()
    }
}

/// Name-to-member table.
///
/// A `null` value is still a defined member: absence is only ever expressed by
/// the name not being present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Members {
    data: HashMap<String, Member>,
}

impl Members {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    /// Create an empty table with the specified capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: HashMap::with_capacity(capacity),
        }
    }

    /// Define (or redefine) a member, returning the previous one
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: Value,
        visibility: Visibility,
    ) -> Option<Member> {
        self.data.insert(name.into(), Member::new(value, visibility))
    }

    /// Assign a value, keeping the visibility of an existing member.
    /// New members are public. Returns the previous value.
    pub fn set_value(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        match self.data.entry(name.into()) {
            std::collections::hash_map::Entry::Occupied(mut entry) => {
                Some(std::mem::replace(&mut entry.get_mut().value, value))
            }
            std::collections::hash_map::Entry::Vacant(entry) => {
                entry.insert(Member::public(value));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Member> {
        self.data.get(name)
    }

    /// Value of a member regardless of its visibility
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.data.get(name).map(|member| &member.value)
    }

    /// Value of a member only if it is public
    pub fn public_value(&self, name: &str) -> Option<&Value> {
        self.data
            .get(name)
            .filter(|member| member.is_public())
            .map(|member| &member.value)
    }

    pub fn visibility(&self, name: &str) -> Option<Visibility> {
        self.data.get(name).map(|member| member.visibility)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.data.contains_key(name)
    }

    /// Remove a member, returning it if it existed
    pub fn remove(&mut self, name: &str) -> Option<Member> {
        self.data.remove(name)
    }

    /// All member names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.data.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Member)> {
        self.data.iter().map(|(name, member)| (name.as_str(), member))
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Members {
    /// Collects public members
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut members = Members::new();
        for (name, value) in iter {
            members.insert(name, value, Visibility::Public);
        }
        members
    }
}
