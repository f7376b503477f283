//! Process supervision: engine selection, startup, and shutdown handling.

use std::fmt;
use std::io;
use std::sync::{Arc, Mutex, PoisonError};

use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGQUIT, SIGTERM};
use signal_hook::iterator::Signals;
use thiserror::Error;
use tracing::{info, warn};

use pubstats_config::Config;

use crate::bootstrap::{
    BootstrapError, ConfigLoader, EngineStartupError, SystemConfigLoader, bootstrap_with,
};
use crate::engine::SnapshotEngine;
use crate::health::{HealthReporter, StructuredHealthReporter};
use crate::transport::ListenerError;

const PROCESS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::process");

/// Errors reported by shutdown signal listeners.
#[derive(Debug, Error)]
pub enum ShutdownError {
    /// Installing signal handlers failed.
    #[error("failed to install signal handlers: {source}")]
    Install {
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

/// Abstraction over shutdown notification mechanisms.
pub trait ShutdownSignal: Send + Sync {
    /// Blocks until shutdown should proceed.
    ///
    /// # Errors
    ///
    /// Returns an error when the notification mechanism cannot be installed.
    fn wait(&self) -> Result<(), ShutdownError>;
}

/// Shutdown listener that waits for termination signals.
///
/// Handlers are registered by [`SystemShutdownSignal::install`], so a signal
/// delivered before [`ShutdownSignal::wait`] is queued rather than handled by
/// the default action.
pub struct SystemShutdownSignal {
    signals: Mutex<Signals>,
}

impl SystemShutdownSignal {
    /// Registers handlers for SIGTERM, SIGINT, SIGQUIT, and SIGHUP.
    ///
    /// # Errors
    ///
    /// Returns [`ShutdownError::Install`] when registration fails.
    pub fn install() -> Result<Self, ShutdownError> {
        let signals = Signals::new([SIGTERM, SIGINT, SIGQUIT, SIGHUP])
            .map_err(|source| ShutdownError::Install { source })?;
        Ok(Self {
            signals: Mutex::new(signals),
        })
    }
}

impl fmt::Debug for SystemShutdownSignal {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("SystemShutdownSignal").finish_non_exhaustive()
    }
}

impl ShutdownSignal for SystemShutdownSignal {
    fn wait(&self) -> Result<(), ShutdownError> {
        let mut signals = self.signals.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(signal) = signals.forever().next() {
            info!(target: PROCESS_TARGET, signal, "shutdown signal received");
        }
        Ok(())
    }
}

/// Errors surfaced while launching or supervising the server process.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// Bootstrapping the server failed.
    #[error("server bootstrap failed: {source}")]
    Bootstrap {
        /// Underlying bootstrap error.
        #[source]
        source: BootstrapError,
    },
    /// The listener could not be started or stopped.
    #[error("listener failed: {source}")]
    Listener {
        /// Underlying listener error.
        #[source]
        source: ListenerError,
    },
    /// Waiting for shutdown failed.
    #[error("failed to await shutdown signal: {source}")]
    Shutdown {
        /// Underlying shutdown error.
        #[source]
        source: ShutdownError,
    },
}

impl From<BootstrapError> for LaunchError {
    fn from(source: BootstrapError) -> Self {
        Self::Bootstrap { source }
    }
}

impl From<ListenerError> for LaunchError {
    fn from(source: ListenerError) -> Self {
        Self::Listener { source }
    }
}

impl From<ShutdownError> for LaunchError {
    fn from(source: ShutdownError) -> Self {
        Self::Shutdown { source }
    }
}

/// Runs the server using the production collaborators until a termination
/// signal arrives.
///
/// Signal handlers are installed before the listener binds.
/// # Errors
///
/// Returns a [`LaunchError`] when startup fails or the shutdown sequence
/// cannot complete.
pub fn run_server() -> Result<(), LaunchError> {
    let shutdown = SystemShutdownSignal::install()?;
    run_with(
        &SystemConfigLoader,
        Arc::new(StructuredHealthReporter::new()),
        &shutdown,
    )
}

/// Runs the server with injected collaborators.
///
/// `shutdown` must already be listening when this is called; signals that
/// arrive while the server starts are then observed by the first `wait`.
/// # Errors
///
/// As for [`run_server`].
pub fn run_with<S: ShutdownSignal>(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
    shutdown: &S,
) -> Result<(), LaunchError> {
    let server = bootstrap_with(loader, reporter, open_snapshot_engine)?;
    let running = server.start()?;
    info!(
        target: PROCESS_TARGET,
        address = %running.local_addr(),
        "server running"
    );
    shutdown.wait()?;
    running.stop()?;
    info!(target: PROCESS_TARGET, "shutdown sequence completed");
    Ok(())
}

/// Builds the snapshot engine named by the configuration.
///
/// Without a snapshot path the engine holds no indices and every call fails
/// as operationally unavailable.
///
/// # Errors
///
/// Returns an [`EngineStartupError`] when the snapshot cannot be read or
/// parsed.
pub fn open_snapshot_engine(config: &Config) -> Result<SnapshotEngine, EngineStartupError> {
    if let Some(path) = config.snapshot_path() {
        info!(target: PROCESS_TARGET, snapshot = %path, "loading snapshot");
        return SnapshotEngine::from_path(path).map_err(EngineStartupError::from);
    }
    warn!(
        target: PROCESS_TARGET,
        "no snapshot configured; all indices are unavailable"
    );
    Ok(SnapshotEngine::empty())
}
