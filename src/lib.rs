//! A small demo harness for watching feature flag values.
//!
//! # Overview
//!
//! The harness revolves around a [`Watcher`] that repeatedly evaluates every
//! flag in a catalog against every [`Target`] in a registry, through an
//! [`EvaluationClient`]. Each full pass (a *tick*) is followed by a fixed
//! sleep. Depending on the [`ReportMode`], the watcher either diffs new
//! values against the last observed value per (flag, target) pair and
//! reports only changes, or reports every observation unconditionally.
//!
//! The evaluation client is an external collaborator: it owns flag
//! resolution, transport, caching and analytics. This crate only defines the
//! seam ([`EvaluationClient`]) and ships [`StaticClient`], an in-memory
//! implementation used by the demo binaries and tests.
//!
//! # Logging
//!
//! All output is emitted through the [`log`](https://docs.rs/log) crate with
//! structured key/value pairs. [`logging::init`] installs a renderer that
//! writes one JSON object per record.
//!
//! # Error Handling
//!
//! Errors are represented by the [`Error`] enum. Configuration and client
//! construction errors are fatal; whether a single failed evaluation aborts
//! the loop is controlled by [`FailurePolicy`].

#![warn(rustdoc::missing_crate_level_docs)]
#![warn(missing_docs)]

mod attributes;
mod client;
mod config;
mod error;
mod flags;
mod targets;
mod watcher;

pub mod logging;

pub use attributes::{AttributeValue, Attributes};
pub use client::{EvaluationClient, StaticClient};
pub use config::Config;
pub use error::{Error, Result};
pub use flags::{FlagDescriptor, FlagKind, FlagValue};
pub use targets::{synthetic_targets, Target};
pub use watcher::{FailurePolicy, Observation, ReportMode, Watcher};

/// Log target used for all records emitted by this crate.
pub const LOG_TARGET: &str = "flagwatch";
