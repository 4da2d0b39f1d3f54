//! Framework for running a bundled application in portable mode: all of its
//! state lives next to the launcher instead of in the user profile.

pub mod config;
pub mod error;
pub mod fs;
pub mod identity;
pub mod launch;
pub mod logging;
pub mod paths;

use std::path::PathBuf;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

pub use config::{CommonConfig, Config};
pub use error::PortappError;
pub use identity::AppIdentity;
pub use launch::{LaunchSpec, ProcessExit};
pub use logging::LogSink;
pub use paths::Paths;

/// What an orchestrator needs from the framework once it is initialized.
pub trait Host {
    fn paths(&self) -> &Paths;

    /// False when `common.disable_log` is set.
    fn logging_enabled(&self) -> bool;

    fn launch(&mut self, spec: &LaunchSpec) -> Result<ProcessExit, PortappError>;

    /// Releases framework resources. Safe to call more than once.
    fn close(&mut self);
}

impl<H: Host + ?Sized> Host for &mut H {
    fn paths(&self) -> &Paths {
        (**self).paths()
    }

    fn logging_enabled(&self) -> bool {
        (**self).logging_enabled()
    }

    fn launch(&mut self, spec: &LaunchSpec) -> Result<ProcessExit, PortappError> {
        (**self).launch(spec)
    }

    fn close(&mut self) {
        (**self).close()
    }
}

pub struct App<C> {
    identity: AppIdentity,
    paths: Paths,
    config: Config<C>,
    log_sink: LogSink,
    closed: bool,
}

impl<C> App<C>
where
    C: Serialize + DeserializeOwned,
{
    /// Initializes the app rooted at the directory of the running executable.
    pub fn initialize(
        identity: AppIdentity,
        defaults: C,
        log_sink: &LogSink,
    ) -> Result<Self, PortappError> {
        let paths = Paths::from_current_exe(&identity)?;
        Self::with_paths(identity, paths, defaults, log_sink)
    }

    pub fn initialize_at(
        root: impl Into<PathBuf>,
        identity: AppIdentity,
        defaults: C,
        log_sink: &LogSink,
    ) -> Result<Self, PortappError> {
        let paths = Paths::from_root(root, &identity);
        Self::with_paths(identity, paths, defaults, log_sink)
    }

    fn with_paths(
        identity: AppIdentity,
        paths: Paths,
        defaults: C,
        log_sink: &LogSink,
    ) -> Result<Self, PortappError> {
        let config = config::load(&paths.config_file, defaults)?;
        if !config.common.disable_log {
            log_sink.attach(&paths.log_file)?;
        }

        info!(
            app = identity.name(),
            root = %paths.root.display(),
            "initialized portable app"
        );
        debug!(config_file = %paths.config_file.display(), disable_log = config.common.disable_log);

        Ok(Self {
            identity,
            paths,
            config,
            log_sink: log_sink.clone(),
            closed: false,
        })
    }
}

impl<C> App<C> {
    pub fn config(&self) -> &Config<C> {
        &self.config
    }
}

impl<C> Host for App<C> {
    fn paths(&self) -> &Paths {
        &self.paths
    }

    fn logging_enabled(&self) -> bool {
        !self.config.common.disable_log
    }

    fn launch(&mut self, spec: &LaunchSpec) -> Result<ProcessExit, PortappError> {
        launch::run(spec, &self.config.common.env)
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        info!(app = self.identity.name(), "closing");
        self.log_sink.detach();
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static COUNTER: AtomicU32 = AtomicU32::new(0);

    pub fn unique_temp_dir(prefix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!("portapp-{prefix}-{nanos}-{seq}"))
    }
}
