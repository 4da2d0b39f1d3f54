use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use portapp::{Host, LaunchSpec, Paths, PortappError, ProcessExit};
use tracing::{info, warn};

use crate::config::VscodeConfig;

pub const EXECUTABLE: &str = "Code.exe";
const FIXED_ARGS: [&str; 2] = ["--log", "info"];
const BUILD_VERSION: &str = env!("VSCODE_PORTABLE_BUILD_VERSION");

pub fn executable_path(app_path: &Path) -> PathBuf {
    app_path.join(EXECUTABLE)
}

pub fn launch_args<I>(caller_args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    FIXED_ARGS
        .into_iter()
        .map(OsString::from)
        .chain(caller_args)
        .collect()
}

/// Variables that point the editor at the portable data directory.
pub fn portable_env(paths: &Paths, logging_enabled: bool) -> BTreeMap<String, OsString> {
    let mut env = BTreeMap::new();
    env.insert(
        "VSCODE_APPDATA".to_string(),
        paths.data.join("appdata").into_os_string(),
    );
    env.insert(
        "VSCODE_EXTENSIONS".to_string(),
        paths.data.join("extensions").into_os_string(),
    );
    if logging_enabled {
        env.insert(
            "VSCODE_LOGS".to_string(),
            paths.data.join("logs").into_os_string(),
        );
    }
    env.insert("VSCODE_PORTABLE".to_string(), OsString::from("1"));
    env.insert("VSCODE_CWD".to_string(), paths.root.clone().into_os_string());
    env
}

pub fn launch_spec<I>(paths: &Paths, logging_enabled: bool, caller_args: I) -> LaunchSpec
where
    I: IntoIterator<Item = OsString>,
{
    LaunchSpec {
        program: executable_path(&paths.app),
        args: launch_args(caller_args),
        env: portable_env(paths, logging_enabled),
        cwd: Some(paths.app.clone()),
    }
}

/// Profile directories a non-portable editor install leaves behind.
#[cfg(windows)]
pub fn cleanup_targets() -> Vec<PathBuf> {
    let mut targets = Vec::new();
    if let Some(roaming) = dirs::config_dir() {
        targets.push(roaming.join("Code"));
    }
    if let Some(local) = dirs::data_local_dir() {
        targets.push(portapp::fs::path_join(&local, ["Programs", "Microsoft VS Code"]));
    }
    targets
}

#[cfg(not(windows))]
pub fn cleanup_targets() -> Vec<PathBuf> {
    Vec::new()
}

/// Runs cleanup (when enabled) and then closes the host, on every exit path.
struct Teardown<H: Host> {
    host: H,
    cleanup: Option<Vec<PathBuf>>,
}

impl<H: Host> Drop for Teardown<H> {
    fn drop(&mut self) {
        if let Some(targets) = self.cleanup.take() {
            if targets.is_empty() {
                warn!("cleanup requested but no cleanup targets are known on this platform");
            } else {
                info!("cleaning up temporary files");
                portapp::fs::cleanup(&targets);
            }
        }
        self.host.close();
    }
}

/// Prepares the data directory, launches the editor and blocks until it exits.
///
/// `host` is closed before this returns, whatever the outcome.
pub fn run<H: Host>(
    host: H,
    config: &VscodeConfig,
    caller_args: Vec<OsString>,
    cleanup_targets: Vec<PathBuf>,
) -> Result<ProcessExit, PortappError> {
    let mut session = Teardown {
        host,
        cleanup: config.cleanup.then_some(cleanup_targets),
    };

    let paths = session.host.paths().clone();
    portapp::fs::ensure_dir(&paths.data)?;

    let spec = launch_spec(&paths, session.host.logging_enabled(), caller_args);
    info!(
        version = BUILD_VERSION,
        data_path = %paths.data.display(),
        "starting VSCode Portable"
    );
    session.host.launch(&spec)
}
