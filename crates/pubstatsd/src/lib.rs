//! Publication statistics daemon.
//!
//! `pubstatsd` answers aggregation and query calls about journals and their
//! articles over a line-delimited JSON protocol on TCP. Every aggregation
//! operation names a (scope, facet) pair from a static registry; the
//! [`Dispatcher`] forwards the pair and any filters to a [`StatsEngine`] and
//! shapes the resulting buckets for the wire. Failures reach clients as one of
//! two kinds: a `ValidationError` when the request or the backend's output is
//! unusable, and a `BackendError` when the backend could not serve the call.
//!
//! The bootstrap loads configuration through [`ConfigLoader`], installs
//! structured telemetry, builds the engine, and yields a [`Server`] that binds
//! the listener on [`Server::start`]. Lifecycle events are reported through a
//! [`HealthReporter`]; dispatch events through a [`DispatchReporter`].

mod bootstrap;
mod dispatch;
mod engine;
mod health;
mod process;
mod registry;
mod telemetry;
mod transport;

pub use bootstrap::{
    BootstrapError, ConfigLoader, EngineStartupError, RunningServer, Server, StaticConfigLoader,
    SystemConfigLoader, bootstrap_with,
};
pub use dispatch::{DispatchError, DispatchReporter, Dispatcher, Router, StructuredDispatchReporter};
pub use engine::{Buckets, EngineError, SearchHits, SnapshotEngine, SnapshotError, StatsEngine};
pub use health::{HealthReporter, StructuredHealthReporter};
pub use process::{
    LaunchError, ShutdownError, ShutdownSignal, SystemShutdownSignal, open_snapshot_engine,
    run_server, run_with,
};
pub use registry::{DIMENSIONS, Dimension, Facet, Registration, Scope, lookup};
pub use telemetry::TelemetryError;
pub use transport::ListenerError;

#[cfg(test)]
mod tests;
