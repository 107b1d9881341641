use std::collections::HashMap;

use derive_more::From;
use serde::{Deserialize, Serialize};

/// Type alias for a map of attribute names to attribute values.
///
/// Attributes describe a target and are consumed by the evaluation client's
/// targeting rules; this crate only carries them along.
///
/// # Examples
/// ```
/// # use flagwatch::{Attributes, AttributeValue};
/// let attributes = [
///     ("location".to_owned(), "emea".into()),
///     ("seats".to_owned(), 250.into()),
///     ("beta_opt_in".to_owned(), true.into()),
/// ].into_iter().collect::<Attributes>();
/// ```
pub type Attributes = HashMap<String, AttributeValue>;

/// A scalar attribute value for a target.
///
/// Conveniently implements `From` conversions for `String`, `&str`, `i64`,
/// and `bool`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, From)]
#[serde(untagged)]
pub enum AttributeValue {
    /// A string value.
    String(String),
    /// An integer value.
    Int(i64),
    /// A boolean value.
    Boolean(bool),
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}
