//! Diffing variant of the flag watch demo: a fixed target list is polled
//! forever and only value changes are reported.

use flagwatch::{
    logging, Config, FailurePolicy, FlagDescriptor, ReportMode, StaticClient, Target, Watcher,
    LOG_TARGET,
};

fn main() -> flagwatch::Result<()> {
    logging::init();
    log::info!(target: LOG_TARGET, "started flag watch demo");

    let config = Config::from_env()?;
    log::info!(target: LOG_TARGET,
               base_url = config.base_url.as_str(),
               events_url = config.events_url.as_str();
               "creating client");

    // The real evaluation client is an external SDK; the demo runs against a
    // seeded in-memory stand-in.
    let mut client = StaticClient::new();
    client.set("doors_enabled", "1", true);
    client.set("capacity", "3", 42);

    let mut watcher = Watcher::new(
        demo_targets(),
        demo_flags(),
        ReportMode::Changes,
        FailurePolicy::Abort,
        config.poll_interval,
    );

    // The client outlives the loop and flushes its counters on drop,
    // whichever way the loop ends.
    watcher.run(&client)
}

fn demo_targets() -> Vec<Target> {
    [
        (1, "southerton"),
        (2, "grove"),
        (3, "finsbury"),
        (4, "canada"),
        (5, "featherstone"),
    ]
    .into_iter()
    .map(|(i, name)| {
        Target::new(i.to_string(), name)
            .attribute("location", if i % 2 == 1 { "emea" } else { "asia" })
    })
    .collect()
}

fn demo_flags() -> Vec<FlagDescriptor> {
    vec![
        FlagDescriptor::new("doors_enabled", false),
        FlagDescriptor::new("capacity", 1),
    ]
}
