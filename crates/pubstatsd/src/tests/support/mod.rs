//! Test doubles shared by the daemon's unit and behavioural suites.

mod client;
mod config_loader;
mod engine;
mod reporter;

pub use client::exchange;
pub use config_loader::{FailingConfigLoader, TestConfigLoader};
pub use engine::{StaticEngine, UnserialisableDocument};
pub use reporter::{HealthEvent, RecordingHealthReporter};
