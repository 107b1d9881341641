use std::collections::HashMap;
use std::time::Duration;

use crate::{EvaluationClient, FlagDescriptor, FlagValue, Result, Target, LOG_TARGET};

/// What the watcher reports for each evaluated pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportMode {
    /// Diff against the last observed value and report changes only.
    Changes,
    /// Report every observation unconditionally, keeping no history.
    All,
}

/// What to do when a single (flag, target) evaluation fails.
///
/// The choice is deliberate and explicit: a failed pair either tears the
/// whole loop down or is logged and skipped, leaving the rest of the tick
/// untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Propagate the first evaluation error, ending the loop.
    Abort,
    /// Log the error and continue with the next pair.
    LogAndContinue,
}

/// A single reported evaluation outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Key of the evaluated flag.
    pub flag_key: String,
    /// Identifier of the evaluated target.
    pub target_id: String,
    /// Display name of the evaluated target.
    pub target_name: String,
    /// Last value seen for this pair, if any. Always `None` in
    /// [`ReportMode::All`].
    pub previous: Option<FlagValue>,
    /// The newly observed value.
    pub value: FlagValue,
}

/// The polling loop: walks the full target × flag cross-product every tick,
/// evaluates each pair through the client, and reports outcomes.
///
/// Iteration is target-major, flag-minor, both in construction order, so the
/// sequence of evaluation calls within a tick is deterministic. Every pair is
/// evaluated on every tick; there is no short-circuiting.
///
/// The observed-value table is owned by the watcher: a single writer, keyed
/// by (flag key, target id), entries only ever overwritten. It starts empty,
/// so in [`ReportMode::Changes`] the first observation of every pair is
/// reported as a change from `None`.
pub struct Watcher {
    targets: Vec<Target>,
    flags: Vec<FlagDescriptor>,
    mode: ReportMode,
    policy: FailurePolicy,
    interval: Duration,
    seen: HashMap<(String, String), FlagValue>,
}

impl Watcher {
    /// Create a watcher over the given registry and catalog.
    pub fn new(
        targets: Vec<Target>,
        flags: Vec<FlagDescriptor>,
        mode: ReportMode,
        policy: FailurePolicy,
        interval: Duration,
    ) -> Watcher {
        Watcher {
            targets,
            flags,
            mode,
            policy,
            interval,
            seen: HashMap::new(),
        }
    }

    /// Run a single tick: evaluate every (target, flag) pair once, log the
    /// outcomes, and return the reported observations.
    pub fn run_tick<C: EvaluationClient>(&mut self, client: &C) -> Result<Vec<Observation>> {
        log::info!(target: LOG_TARGET, "re-requesting all flags");
        let mut reported = Vec::new();

        for target in &self.targets {
            for flag in &self.flags {
                let value = match evaluate(client, flag, target) {
                    Ok(value) => value,
                    Err(err) => match self.policy {
                        FailurePolicy::Abort => return Err(err),
                        FailurePolicy::LogAndContinue => {
                            log::warn!(target: LOG_TARGET,
                                       flag_name = flag.key.as_str(),
                                       target_id = target.id.as_str(),
                                       error = err.to_string().as_str();
                                       "evaluation failed, skipping pair");
                            continue;
                        }
                    },
                };

                match self.mode {
                    ReportMode::Changes => {
                        let key = (flag.key.clone(), target.id.clone());
                        if self.seen.get(&key) != Some(&value) {
                            let previous = self.seen.get(&key).cloned();
                            log::info!(target: LOG_TARGET,
                                       flag_name = flag.key.as_str(),
                                       target = target.name.as_str(),
                                       target_id = target.id.as_str(),
                                       attributes:serde = target.attributes,
                                       previous_value:serde = previous,
                                       current_value:serde = value,
                                       flag_type = value.kind().as_str();
                                       "flag changed");
                            reported.push(Observation {
                                flag_key: flag.key.clone(),
                                target_id: target.id.clone(),
                                target_name: target.name.clone(),
                                previous,
                                value: value.clone(),
                            });
                            self.seen.insert(key, value);
                        }
                    }
                    ReportMode::All => {
                        log::info!(target: LOG_TARGET,
                                   flag_name = flag.key.as_str(),
                                   target = target.name.as_str(),
                                   target_id = target.id.as_str(),
                                   attributes:serde = target.attributes,
                                   current_value:serde = value,
                                   flag_type = value.kind().as_str();
                                   "flag observed");
                        reported.push(Observation {
                            flag_key: flag.key.clone(),
                            target_id: target.id.clone(),
                            target_name: target.name.clone(),
                            previous: None,
                            value,
                        });
                    }
                }
            }
        }

        Ok(reported)
    }

    /// Run ticks forever, sleeping the fixed interval between them.
    ///
    /// Returns only when an evaluation error propagates under
    /// [`FailurePolicy::Abort`]; otherwise the loop runs until the process
    /// is killed.
    pub fn run<C: EvaluationClient>(&mut self, client: &C) -> Result<()> {
        loop {
            self.run_tick(client)?;
            std::thread::sleep(self.interval);
        }
    }
}

fn evaluate<C: EvaluationClient>(
    client: &C,
    flag: &FlagDescriptor,
    target: &Target,
) -> Result<FlagValue> {
    match &flag.default {
        FlagValue::Boolean(default) => client
            .bool_variation(&flag.key, target, *default)
            .map(FlagValue::Boolean),
        FlagValue::Integer(default) => client
            .int_variation(&flag.key, target, *default)
            .map(FlagValue::Integer),
        FlagValue::String(default) => client
            .string_variation(&flag.key, target, default.clone())
            .map(FlagValue::String),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::{Error, StaticClient};
    use FailurePolicy::{Abort, LogAndContinue};

    /// Delegates to a [`StaticClient`] while recording the call sequence.
    struct Recording {
        inner: StaticClient,
        calls: RefCell<Vec<(String, String)>>,
    }

    impl Recording {
        fn new(inner: StaticClient) -> Recording {
            Recording {
                inner,
                calls: RefCell::new(Vec::new()),
            }
        }

        fn record(&self, flag_key: &str, target: &Target) {
            self.calls
                .borrow_mut()
                .push((flag_key.to_owned(), target.id.clone()));
        }
    }

    impl EvaluationClient for Recording {
        fn bool_variation(&self, flag_key: &str, target: &Target, default: bool) -> Result<bool> {
            self.record(flag_key, target);
            self.inner.bool_variation(flag_key, target, default)
        }

        fn int_variation(&self, flag_key: &str, target: &Target, default: i64) -> Result<i64> {
            self.record(flag_key, target);
            self.inner.int_variation(flag_key, target, default)
        }

        fn string_variation(
            &self,
            flag_key: &str,
            target: &Target,
            default: String,
        ) -> Result<String> {
            self.record(flag_key, target);
            self.inner.string_variation(flag_key, target, default)
        }

        fn flush(&self) -> Result<()> {
            self.inner.flush()
        }
    }

    fn two_targets() -> Vec<Target> {
        vec![Target::new("t1", "one"), Target::new("t2", "two")]
    }

    fn boolean_catalog() -> Vec<FlagDescriptor> {
        vec![FlagDescriptor::new("enabled", false)]
    }

    fn watcher(mode: ReportMode, policy: FailurePolicy) -> Watcher {
        Watcher::new(
            two_targets(),
            boolean_catalog(),
            mode,
            policy,
            Duration::from_secs(0),
        )
    }

    #[test]
    fn first_tick_reports_every_pair_as_change_from_none() {
        let client = StaticClient::new();
        let mut watcher = watcher(ReportMode::Changes, Abort);

        let reported = watcher.run_tick(&client).unwrap();
        assert_eq!(reported.len(), 2);
        for observation in &reported {
            assert_eq!(observation.previous, None);
            assert_eq!(observation.value, FlagValue::Boolean(false));
        }
    }

    #[test]
    fn unchanged_values_are_not_reported_again() {
        let client = StaticClient::new();
        let mut watcher = watcher(ReportMode::Changes, Abort);

        watcher.run_tick(&client).unwrap();
        assert!(watcher.run_tick(&client).unwrap().is_empty());
        assert!(watcher.run_tick(&client).unwrap().is_empty());
    }

    #[test]
    fn a_flipped_value_is_reported_exactly_once() {
        let mut client = StaticClient::new();
        let mut watcher = watcher(ReportMode::Changes, Abort);

        watcher.run_tick(&client).unwrap();

        client.set("enabled", "t1", true);
        let reported = watcher.run_tick(&client).unwrap();
        assert_eq!(reported.len(), 1);
        assert_eq!(reported[0].target_id, "t1");
        assert_eq!(reported[0].previous, Some(FlagValue::Boolean(false)));
        assert_eq!(reported[0].value, FlagValue::Boolean(true));

        // Table now holds the new value, so re-observing it is quiet.
        assert!(watcher.run_tick(&client).unwrap().is_empty());
    }

    #[test]
    fn every_pair_is_evaluated_once_per_tick_in_order() {
        let client = Recording::new(StaticClient::new());
        let flags = vec![
            FlagDescriptor::new("doors_enabled", false),
            FlagDescriptor::new("capacity", 1),
        ];
        let mut watcher = Watcher::new(
            two_targets(),
            flags,
            ReportMode::Changes,
            Abort,
            Duration::from_secs(0),
        );

        watcher.run_tick(&client).unwrap();
        let expected = [
            ("doors_enabled", "t1"),
            ("capacity", "t1"),
            ("doors_enabled", "t2"),
            ("capacity", "t2"),
        ];
        assert_eq!(
            *client.calls.borrow(),
            expected
                .iter()
                .map(|(f, t)| ((*f).to_owned(), (*t).to_owned()))
                .collect::<Vec<_>>()
        );

        // A second tick repeats the full cross-product.
        watcher.run_tick(&client).unwrap();
        assert_eq!(client.calls.borrow().len(), 8);
    }

    #[test]
    fn all_mode_reports_every_pair_every_tick() {
        let client = StaticClient::new();
        let mut watcher = watcher(ReportMode::All, Abort);

        assert_eq!(watcher.run_tick(&client).unwrap().len(), 2);
        assert_eq!(watcher.run_tick(&client).unwrap().len(), 2);
    }

    #[test]
    fn abort_policy_propagates_evaluation_errors() {
        let mut client = StaticClient::new();
        // A string stored under a boolean flag trips the kind check.
        client.set("enabled", "t1", "yes");
        let mut watcher = watcher(ReportMode::Changes, Abort);

        let err = watcher.run_tick(&client).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
    }

    #[test]
    fn log_and_continue_skips_the_failing_pair() {
        let mut client = StaticClient::new();
        client.set("enabled", "t1", "yes");
        let mut watcher = watcher(ReportMode::Changes, LogAndContinue);

        let reported = watcher.run_tick(&client).unwrap();
        assert_eq!(reported.len(), 1);
        assert_eq!(reported[0].target_id, "t2");
    }

    #[test]
    fn end_to_end_two_targets_one_boolean_flag() {
        let mut client = StaticClient::new();
        let mut watcher = watcher(ReportMode::Changes, Abort);

        // Tick 1: both pairs resolve to the default and are reported once,
        // as changes from none.
        let tick1 = watcher.run_tick(&client).unwrap();
        assert_eq!(tick1.len(), 2);

        // Tick 2: t1 flips to true; exactly one change is reported.
        client.set("enabled", "t1", true);
        let tick2 = watcher.run_tick(&client).unwrap();
        assert_eq!(tick2.len(), 1);
        assert_eq!(tick2[0].flag_key, "enabled");
        assert_eq!(tick2[0].target_id, "t1");
    }
}
