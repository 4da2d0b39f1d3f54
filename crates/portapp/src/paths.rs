use std::path::{Path, PathBuf};

use crate::error::PortappError;
use crate::identity::AppIdentity;

/// Filesystem layout of a portable app, everything relative to the
/// directory that holds the launcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub root: PathBuf,
    pub app: PathBuf,
    pub data: PathBuf,
    pub config_file: PathBuf,
    pub log_file: PathBuf,
}

impl Paths {
    pub fn from_root(root: impl Into<PathBuf>, identity: &AppIdentity) -> Self {
        let root = root.into();
        Self {
            app: root.join("app"),
            data: root.join("data"),
            config_file: root.join(format!("{}.toml", identity.id())),
            log_file: root.join("log").join(format!("{}.log", identity.id())),
            root,
        }
    }

    /// Layout rooted at the directory of the running executable.
    pub fn from_current_exe(identity: &AppIdentity) -> Result<Self, PortappError> {
        let exe = std::env::current_exe()
            .map_err(|err| PortappError::io("resolving launcher executable", err))?;
        let root = exe.parent().map(Path::to_path_buf).ok_or_else(|| {
            PortappError::io(
                "resolving launcher directory",
                std::io::Error::new(std::io::ErrorKind::NotFound, "executable has no parent"),
            )
        })?;
        Ok(Self::from_root(root, identity))
    }
}
