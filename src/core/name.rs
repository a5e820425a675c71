//! Canonical state names.
//!
//! State names are case-insensitive. Every name is upper-cased on
//! construction so that registry keys, end-state membership and handler
//! return values all compare in the same canonical form.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Case-insensitive identifier of a state.
///
/// # Example
///
/// ```rust
/// use cargofsm::core::StateName;
///
/// let a = StateName::new("Eating");
/// let b = StateName::from("EATING");
/// let c: StateName = "eating".into();
///
/// assert_eq!(a, b);
/// assert_eq!(b, c);
/// assert_eq!(a.as_str(), "EATING");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct StateName(String);

impl StateName {
    /// Create a canonical name from any string-like value.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().to_uppercase())
    }

    /// The canonical (upper-cased) form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for StateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StateName({:?})", self.0)
    }
}

impl AsRef<str> for StateName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StateName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<&String> for StateName {
    fn from(name: &String) -> Self {
        Self::new(name)
    }
}

impl From<String> for StateName {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl From<&StateName> for StateName {
    fn from(name: &StateName) -> Self {
        name.clone()
    }
}

impl From<StateName> for String {
    fn from(name: StateName) -> Self {
        name.0
    }
}

impl PartialEq<str> for StateName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other.to_uppercase()
    }
}

impl PartialEq<&str> for StateName {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}
