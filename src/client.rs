use std::cell::Cell;
use std::collections::HashMap;

use crate::{Error, FlagKind, FlagValue, Result, Target, LOG_TARGET};

/// The external flag evaluation client, seen from the watcher's side.
///
/// Implementations own flag resolution entirely: transport, caching,
/// streaming and analytics batching all live behind this trait. The contract
/// is that each variation call returns the supplied default when the flag
/// cannot be resolved for the target.
///
/// Clients are acquired once at startup and held for the duration of the
/// polling loop; buffered analytics must be flushed when the client is
/// released (typically from `Drop`, so the flush runs on every exit path).
pub trait EvaluationClient {
    /// Resolve a boolean flag for a target.
    fn bool_variation(&self, flag_key: &str, target: &Target, default: bool) -> Result<bool>;

    /// Resolve an integer flag for a target.
    fn int_variation(&self, flag_key: &str, target: &Target, default: i64) -> Result<i64>;

    /// Resolve a string flag for a target.
    fn string_variation(&self, flag_key: &str, target: &Target, default: String)
        -> Result<String>;

    /// Flush any buffered analytics.
    fn flush(&self) -> Result<()>;
}

/// An in-memory [`EvaluationClient`] backed by a `(flag key, target id)` →
/// value store.
///
/// Used by the demo binaries and tests in place of a real SDK. Unknown pairs
/// resolve to the supplied default; a stored value whose kind differs from
/// the requested variation kind is an explicit [`Error::TypeMismatch`],
/// never a silent coercion.
#[derive(Debug, Default)]
pub struct StaticClient {
    values: HashMap<(String, String), FlagValue>,
    evaluations: Cell<u64>,
}

impl StaticClient {
    /// Create an empty client; every variation call resolves to its default.
    pub fn new() -> StaticClient {
        StaticClient::default()
    }

    /// Store a value for a (flag, target) pair, overwriting any previous one.
    pub fn set(
        &mut self,
        flag_key: impl Into<String>,
        target_id: impl Into<String>,
        value: impl Into<FlagValue>,
    ) {
        self.values
            .insert((flag_key.into(), target_id.into()), value.into());
    }

    /// Number of variation calls served so far.
    pub fn evaluations(&self) -> u64 {
        self.evaluations.get()
    }

    fn resolve(&self, flag_key: &str, target: &Target, expected: FlagKind) -> Result<Option<&FlagValue>> {
        self.evaluations.set(self.evaluations.get() + 1);
        match self.values.get(&(flag_key.to_owned(), target.id.clone())) {
            None => Ok(None),
            Some(value) if value.kind() == expected => Ok(Some(value)),
            Some(value) => Err(Error::TypeMismatch {
                flag_key: flag_key.to_owned(),
                expected,
                actual: value.kind(),
            }),
        }
    }
}

impl EvaluationClient for StaticClient {
    fn bool_variation(&self, flag_key: &str, target: &Target, default: bool) -> Result<bool> {
        match self.resolve(flag_key, target, FlagKind::Boolean)? {
            Some(FlagValue::Boolean(value)) => Ok(*value),
            _ => Ok(default),
        }
    }

    fn int_variation(&self, flag_key: &str, target: &Target, default: i64) -> Result<i64> {
        match self.resolve(flag_key, target, FlagKind::Integer)? {
            Some(FlagValue::Integer(value)) => Ok(*value),
            _ => Ok(default),
        }
    }

    fn string_variation(
        &self,
        flag_key: &str,
        target: &Target,
        default: String,
    ) -> Result<String> {
        match self.resolve(flag_key, target, FlagKind::String)? {
            Some(FlagValue::String(value)) => Ok(value.clone()),
            _ => Ok(default),
        }
    }

    fn flush(&self) -> Result<()> {
        log::debug!(target: LOG_TARGET,
                    evaluations = self.evaluations.get();
                    "flushing evaluation counters");
        Ok(())
    }
}

impl Drop for StaticClient {
    fn drop(&mut self) {
        // Flush cannot fail for the in-memory client, but keep the release
        // contract visible.
        let _ = self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> Target {
        Target::new("t1", "southerton")
    }

    #[test]
    fn unknown_pairs_resolve_to_the_default() {
        let client = StaticClient::new();
        assert!(!client.bool_variation("doors_enabled", &target(), false).unwrap());
        assert_eq!(client.int_variation("capacity", &target(), 1).unwrap(), 1);
        assert_eq!(
            client
                .string_variation("theme", &target(), "plain".to_owned())
                .unwrap(),
            "plain"
        );
    }

    #[test]
    fn stored_values_take_precedence_over_defaults() {
        let mut client = StaticClient::new();
        client.set("doors_enabled", "t1", true);
        client.set("capacity", "t1", 42);
        assert!(client.bool_variation("doors_enabled", &target(), false).unwrap());
        assert_eq!(client.int_variation("capacity", &target(), 1).unwrap(), 42);
    }

    #[test]
    fn values_are_scoped_to_their_target() {
        let mut client = StaticClient::new();
        client.set("doors_enabled", "t2", true);
        assert!(!client.bool_variation("doors_enabled", &target(), false).unwrap());
    }

    #[test]
    fn kind_conflict_is_an_explicit_error() {
        let mut client = StaticClient::new();
        client.set("doors_enabled", "t1", "yes");
        let err = client
            .bool_variation("doors_enabled", &target(), false)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::TypeMismatch {
                expected: FlagKind::Boolean,
                actual: FlagKind::String,
                ..
            }
        ));
    }

    #[test]
    fn evaluations_are_counted() {
        let client = StaticClient::new();
        let _ = client.bool_variation("doors_enabled", &target(), false);
        let _ = client.int_variation("capacity", &target(), 1);
        assert_eq!(client.evaluations(), 2);
    }
}
