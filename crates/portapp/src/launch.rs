use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Command, ExitStatus};

use tracing::info;

use crate::error::PortappError;

/// A fully resolved process invocation.
///
/// `env` holds overrides on top of the inherited environment; the launcher's
/// own environment is never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub env: BTreeMap<String, OsString>,
    pub cwd: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessExit {
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
}

impl ProcessExit {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<ExitStatus> for ProcessExit {
    fn from(status: ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

/// Runs `spec` with stdio inherited and blocks until it exits.
///
/// `base_env` is applied before `spec.env`, so the spec wins on conflicts.
pub fn run(
    spec: &LaunchSpec,
    base_env: &BTreeMap<String, String>,
) -> Result<ProcessExit, PortappError> {
    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args);
    if let Some(cwd) = &spec.cwd {
        cmd.current_dir(cwd);
    }
    cmd.envs(base_env);
    cmd.envs(&spec.env);

    info!(
        program = %spec.program.display(),
        args = ?spec.args,
        "launching"
    );
    let status = cmd.status().map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            PortappError::ProgramNotFound(spec.program.clone())
        } else {
            PortappError::io("spawning program", err)
        }
    })?;

    let exit = ProcessExit::from(status);
    info!(code = ?exit.code, "program exited");
    Ok(exit)
}
