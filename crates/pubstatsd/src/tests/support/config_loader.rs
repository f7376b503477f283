//! Test configuration loaders for success and failure paths.

use std::ffi::OsString;
use std::sync::Arc;

use camino::Utf8PathBuf;
use ortho_config::OrthoError;

use pubstats_config::Config;

use crate::bootstrap::ConfigLoader;

/// Loader binding an ephemeral loopback port.
#[derive(Debug, Default, Clone)]
pub struct TestConfigLoader {
    snapshot_path: Option<Utf8PathBuf>,
}

impl TestConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Points the configuration at a snapshot file.
    pub fn with_snapshot(path: Utf8PathBuf) -> Self {
        Self {
            snapshot_path: Some(path),
        }
    }
}

impl ConfigLoader for TestConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(Config {
            host: "127.0.0.1".to_owned(),
            port: 0,
            snapshot_path: self.snapshot_path.clone(),
            ..Config::default()
        })
    }
}

/// Loader that intentionally fails by passing an invalid port.
pub struct FailingConfigLoader;

impl ConfigLoader for FailingConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        let args = vec![
            OsString::from("pubstatsd"),
            OsString::from("--port"),
            OsString::from("not-a-port"),
        ];
        Config::load_from_iter(args)
    }
}
