//! Server bootstrap orchestration.

use std::error::Error as StdError;
use std::net::SocketAddr;
use std::sync::Arc;

use ortho_config::OrthoError;
use thiserror::Error;

use pubstats_config::Config;

use crate::dispatch::{DispatchConnectionHandler, Dispatcher, Router, StructuredDispatchReporter};
use crate::engine::{SnapshotError, StatsEngine};
use crate::health::HealthReporter;
use crate::telemetry::{self, TelemetryError};
use crate::transport::{ListenerError, ListenerHandle, SocketListener};

/// Trait abstracting configuration loading for testability.
pub trait ConfigLoader: Send + Sync {
    /// Loads the server configuration.
    ///
    /// # Errors
    ///
    /// Returns the loader's error when no valid configuration can be built.
    fn load(&self) -> Result<Config, Arc<OrthoError>>;
}

/// Loader that delegates to [`Config::load`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemConfigLoader;

impl ConfigLoader for SystemConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Config::load()
    }
}

/// Loader that hands out a configuration resolved elsewhere.
#[derive(Debug, Clone)]
pub struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    /// Wraps an already-resolved configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(self.config.clone())
    }
}

/// The statistics engine could not be constructed.
#[derive(Debug, Error)]
#[error("{source}")]
pub struct EngineStartupError {
    #[source]
    source: Box<dyn StdError + Send + Sync>,
}

impl EngineStartupError {
    /// Wraps the error raised by an engine constructor.
    #[must_use]
    pub fn new(source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

impl From<SnapshotError> for EngineStartupError {
    fn from(source: SnapshotError) -> Self {
        Self::new(source)
    }
}

/// Errors surfaced during bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Configuration failed to load.
    #[error("failed to load configuration: {source}")]
    Configuration {
        /// Underlying loader error.
        #[source]
        source: Arc<OrthoError>,
    },
    /// Telemetry initialisation failed.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        /// Underlying telemetry error.
        #[source]
        source: TelemetryError,
    },
    /// The statistics engine failed to start.
    #[error("failed to start statistics engine: {source}")]
    Engine {
        /// Underlying engine error.
        #[source]
        source: EngineStartupError,
    },
}

/// Result of a successful bootstrap invocation, ready to accept connections.
pub struct Server<E> {
    config: Config,
    dispatcher: Arc<Dispatcher<E>>,
    reporter: Arc<dyn HealthReporter>,
}

impl<E> Server<E> {
    /// Accessor for the resolved configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Dispatcher shared by every connection.
    #[must_use]
    pub const fn dispatcher(&self) -> &Arc<Dispatcher<E>> {
        &self.dispatcher
    }
}

impl<E: StatsEngine + 'static> Server<E> {
    /// Binds the configured address and starts accepting connections.
    ///
    /// # Errors
    ///
    /// Returns a [`ListenerError`] when the address cannot be resolved or
    /// bound.
    pub fn start(self) -> Result<RunningServer, ListenerError> {
        let listener = SocketListener::bind(self.config.host(), self.config.port())?;
        let router = Router::new(Arc::clone(&self.dispatcher));
        let handle = listener.start(Arc::new(DispatchConnectionHandler::new(router)))?;
        self.reporter.listener_started(handle.local_addr());
        Ok(RunningServer {
            handle,
            reporter: self.reporter,
        })
    }
}

/// A server whose listener is accepting connections.
pub struct RunningServer {
    handle: ListenerHandle,
    reporter: Arc<dyn HealthReporter>,
}

impl RunningServer {
    /// Address the listener is bound to, with any ephemeral port resolved.
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.handle.local_addr()
    }

    /// Stops accepting connections and waits for the accept loop to exit.
    ///
    /// Connections already being served finish on their own threads.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError::ThreadPanic`] if the accept loop panicked.
    pub fn stop(self) -> Result<(), ListenerError> {
        self.reporter.shutdown_requested();
        self.handle.shutdown();
        self.handle.join()?;
        self.reporter.server_stopped();
        Ok(())
    }
}

/// Bootstraps the server using the supplied collaborators.
///
/// Loads configuration, installs telemetry, and builds the engine with
/// `build_engine`. Each failure is reported to `reporter` before being
/// returned.
///
/// # Errors
///
/// Returns a [`BootstrapError`] naming the stage that failed.
pub fn bootstrap_with<E, F>(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
    build_engine: F,
) -> Result<Server<E>, BootstrapError>
where
    E: StatsEngine,
    F: FnOnce(&Config) -> Result<E, EngineStartupError>,
{
    reporter.bootstrap_starting();

    let config = match loader.load() {
        Ok(config) => config,
        Err(source) => {
            let error = BootstrapError::Configuration { source };
            reporter.bootstrap_failed(&error);
            return Err(error);
        }
    };

    if let Err(source) = telemetry::initialise(&config) {
        let error = BootstrapError::Telemetry { source };
        reporter.bootstrap_failed(&error);
        return Err(error);
    }

    let engine = match build_engine(&config) {
        Ok(engine) => engine,
        Err(source) => {
            let error = BootstrapError::Engine { source };
            reporter.bootstrap_failed(&error);
            return Err(error);
        }
    };

    let dispatcher = Dispatcher::new(engine, Arc::new(StructuredDispatchReporter));
    reporter.bootstrap_succeeded(&config);

    Ok(Server {
        config,
        dispatcher: Arc::new(dispatcher),
        reporter,
    })
}
