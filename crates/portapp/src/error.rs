use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PortappError {
    #[error("invalid application identity: {0}")]
    InvalidIdentity(String),

    #[error("invalid configuration in {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to encode default configuration: {0}")]
    Defaults(#[from] toml::ser::Error),

    #[error("program not found: {}", .0.display())]
    ProgramNotFound(PathBuf),

    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl PortappError {
    pub fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }
}
