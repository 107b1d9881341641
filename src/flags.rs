use std::fmt;

use derive_more::From;
use serde::{Deserialize, Serialize};

/// The declared value kind of a flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagKind {
    /// Flag resolves to a boolean.
    Boolean,
    /// Flag resolves to an integer.
    Integer,
    /// Flag resolves to a string.
    String,
}

impl FlagKind {
    /// Lowercase name of the kind, as it appears in log records.
    pub fn as_str(&self) -> &'static str {
        match self {
            FlagKind::Boolean => "boolean",
            FlagKind::Integer => "integer",
            FlagKind::String => "string",
        }
    }
}

impl fmt::Display for FlagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved (or default) flag value, tagged with its kind.
///
/// The variant of a [`FlagDescriptor`]'s default value decides which
/// variation call the watcher issues, so there is no stringly-typed kind
/// dispatch anywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, From)]
#[serde(untagged)]
pub enum FlagValue {
    /// A boolean flag value.
    Boolean(bool),
    /// An integer flag value.
    Integer(i64),
    /// A string flag value.
    String(String),
}

impl FlagValue {
    /// The kind of this value.
    pub fn kind(&self) -> FlagKind {
        match self {
            FlagValue::Boolean(_) => FlagKind::Boolean,
            FlagValue::Integer(_) => FlagKind::Integer,
            FlagValue::String(_) => FlagKind::String,
        }
    }
}

impl From<&str> for FlagValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<i32> for FlagValue {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

/// An entry of the flag catalog: a flag key together with its typed default.
///
/// Descriptors are immutable and built once at startup; the catalog is an
/// ordered `Vec<FlagDescriptor>` and the watcher walks it in that order.
#[derive(Debug, Clone, PartialEq)]
pub struct FlagDescriptor {
    /// Unique flag key.
    pub key: String,
    /// Default value, returned when the flag cannot be resolved. Its
    /// variant fixes the declared kind of the flag.
    pub default: FlagValue,
}

impl FlagDescriptor {
    /// Create a descriptor from a flag key and a typed default value.
    ///
    /// ```
    /// # use flagwatch::{FlagDescriptor, FlagKind};
    /// let flag = FlagDescriptor::new("capacity", 1);
    /// assert_eq!(flag.kind(), FlagKind::Integer);
    /// ```
    pub fn new(key: impl Into<String>, default: impl Into<FlagValue>) -> FlagDescriptor {
        FlagDescriptor {
            key: key.into(),
            default: default.into(),
        }
    }

    /// Declared kind of the flag.
    pub fn kind(&self) -> FlagKind {
        self.default.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_variant_fixes_declared_kind() {
        assert_eq!(FlagDescriptor::new("a", false).kind(), FlagKind::Boolean);
        assert_eq!(FlagDescriptor::new("b", 7).kind(), FlagKind::Integer);
        assert_eq!(FlagDescriptor::new("c", "x").kind(), FlagKind::String);
    }

    #[test]
    fn values_serialize_untagged() {
        assert_eq!(
            serde_json::to_string(&FlagValue::Boolean(true)).unwrap(),
            "true"
        );
        assert_eq!(serde_json::to_string(&FlagValue::Integer(42)).unwrap(), "42");
    }
}
