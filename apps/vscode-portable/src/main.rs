use std::process::ExitCode;

use anyhow::{Context, Result};
use portapp::{App, AppIdentity, LogSink, ProcessExit, logging};
use tracing::error;

mod config;
mod portable;

use config::VscodeConfig;

const APP_ID: &str = "vscode-portable";
const APP_NAME: &str = "Visual Studio Code Portable";

fn initialize(sink: &LogSink) -> Result<App<VscodeConfig>> {
    let identity = AppIdentity::new(APP_ID, APP_NAME)?;
    let app = App::initialize(identity, VscodeConfig::default(), sink)
        .context("cannot initialize application")?;
    Ok(app)
}

/// The editor's exit code when it fits in a process exit status, 1 otherwise.
fn exit_status(exit: ProcessExit) -> u8 {
    match exit.code.map(u8::try_from) {
        Some(Ok(code)) => code,
        _ => 1,
    }
}

fn main() -> ExitCode {
    let sink = LogSink::new();
    if let Err(err) = logging::init(&sink) {
        eprintln!("failed to install logger: {err}");
    }

    let mut app = match initialize(&sink) {
        Ok(app) => app,
        Err(err) => {
            error!("{err:#}");
            return ExitCode::FAILURE;
        }
    };

    let config = app.config().app.clone();
    let caller_args = std::env::args_os().skip(1).collect();
    match portable::run(&mut app, &config, caller_args, portable::cleanup_targets()) {
        Ok(exit) => ExitCode::from(exit_status(exit)),
        Err(err) => {
            error!(error = %err, "VSCode Portable did not run");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::exit_status;
    use portapp::ProcessExit;

    #[test]
    fn editor_exit_code_is_passed_through_when_representable() {
        assert_eq!(exit_status(ProcessExit { code: Some(0) }), 0);
        assert_eq!(exit_status(ProcessExit { code: Some(7) }), 7);
        assert_eq!(exit_status(ProcessExit { code: Some(255) }), 255);
    }

    #[test]
    fn signal_deaths_and_out_of_range_codes_become_failure() {
        assert_eq!(exit_status(ProcessExit { code: Some(256) }), 1);
        assert_eq!(exit_status(ProcessExit { code: Some(-1) }), 1);
        assert_eq!(exit_status(ProcessExit { code: None }), 1);
    }
}
