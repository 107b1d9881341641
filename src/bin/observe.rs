//! Firehose variant of the flag watch demo: a seeded synthetic target
//! registry is polled forever and every observation is reported, with no
//! change diffing.

use flagwatch::{
    logging, synthetic_targets, Config, FailurePolicy, FlagDescriptor, ReportMode, StaticClient,
    Watcher, LOG_TARGET,
};

/// Fixed seed so repeated runs produce the same registry.
const REGISTRY_SEED: u64 = 2024;

fn main() -> flagwatch::Result<()> {
    logging::init();
    log::info!(target: LOG_TARGET, "started flag observe demo");

    let config = Config::from_env()?;
    log::info!(target: LOG_TARGET,
               base_url = config.base_url.as_str(),
               events_url = config.events_url.as_str();
               "creating client");

    let mut client = StaticClient::new();
    client.set("doors_enabled", "2", true);

    let mut watcher = Watcher::new(
        synthetic_targets(REGISTRY_SEED, 5),
        vec![
            FlagDescriptor::new("doors_enabled", false),
            FlagDescriptor::new("capacity", 1),
        ],
        ReportMode::All,
        FailurePolicy::Abort,
        config.poll_interval,
    );

    watcher.run(&client)
}
