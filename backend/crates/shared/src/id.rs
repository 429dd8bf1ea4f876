//! Common ID Types
//!
//! Type-safe integer ID wrappers for stored entities.
//! Identity is assigned by the store on creation; callers only parse and carry ids.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use thiserror::Error;

/// Generic typed ID wrapper
///
/// Usage:
/// ```
/// use kernel::id::{Id, markers};
/// type PostId = Id<markers::Post>;
///
/// let id: PostId = "42".parse().unwrap();
/// assert_eq!(id.get(), 42);
/// ```
pub struct Id<T> {
    value: i64,
    _marker: PhantomData<fn() -> T>,
}

/// Error returned when a path segment is not a decimal integer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Id must be an integer")]
pub struct ParseIdError;

impl<T> Id<T> {
    /// Wrap a raw value (e.g. a database column)
    pub const fn new(value: i64) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }

    /// Get the underlying integer
    pub const fn get(&self) -> i64 {
        self.value
    }
}

// Manual impls so that marker types need no derives.
impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.value.cmp(&other.value)
    }
}

impl<T> std::hash::Hash for Id<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> FromStr for Id<T> {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Self::new).map_err(|_| ParseIdError)
    }
}

impl<T> From<i64> for Id<T> {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.value)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        i64::deserialize(deserializer).map(Self::new)
    }
}

/// Marker types for different entity IDs
pub mod markers {
    /// Marker for Post (hokku) IDs
    pub struct Post;

    /// Marker for Author (user) IDs
    pub struct Author;

    /// Marker for Theme IDs
    pub struct Theme;
}

/// Type aliases for common IDs
pub type PostId = Id<markers::Post>;
pub type AuthorId = Id<markers::Author>;
pub type ThemeId = Id<markers::Theme>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_from_str() {
        let id: PostId = "7".parse().unwrap();
        assert_eq!(id.get(), 7);
        assert_eq!("abc".parse::<PostId>(), Err(ParseIdError));
        assert_eq!("".parse::<ThemeId>(), Err(ParseIdError));
    }

    #[test]
    fn test_id_ordering() {
        let a = AuthorId::new(1);
        let b = AuthorId::new(2);
        assert!(a < b);
        assert_eq!(a, AuthorId::from(1));
    }

    #[test]
    fn test_id_serde_as_integer() {
        let id = ThemeId::new(3);
        assert_eq!(serde_json::to_string(&id).unwrap(), "3");
        let back: ThemeId = serde_json::from_str("3").unwrap();
        assert_eq!(back, id);
    }
}
