use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::PortappError;
use crate::fs::ensure_dir;

/// Log file destination that can be attached after the subscriber is installed.
///
/// Until [`LogSink::attach`] is called, writes are dropped; stderr output is
/// unaffected either way.
#[derive(Clone, Default)]
pub struct LogSink {
    file: Arc<Mutex<Option<File>>>,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&self, path: &Path) -> Result<(), PortappError> {
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|err| PortappError::io("opening log file", err))?;
        *self.lock() = Some(file);
        Ok(())
    }

    pub fn detach(&self) {
        if let Some(mut file) = self.lock().take() {
            let _ = file.flush();
        }
    }

    pub fn is_attached(&self) -> bool {
        self.lock().is_some()
    }

    fn lock(&self) -> MutexGuard<'_, Option<File>> {
        self.file.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<'a> MakeWriter<'a> for LogSink {
    type Writer = SinkWriter;

    fn make_writer(&'a self) -> Self::Writer {
        SinkWriter {
            sink: self.clone(),
        }
    }
}

pub struct SinkWriter {
    sink: LogSink,
}

impl Write for SinkWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.sink.lock().as_mut() {
            Some(file) => file.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.sink.lock().as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

/// Installs the global subscriber: stderr plus `sink`, filtered by `RUST_LOG`
/// (default `info`).
pub fn init(sink: &LogSink) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(sink.clone()))
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::LogSink;
    use crate::test_support::unique_temp_dir;
    use std::io::Write;
    use tracing_subscriber::fmt::MakeWriter;

    #[test]
    fn writes_only_reach_the_file_while_attached() {
        let dir = unique_temp_dir("log-sink");
        let path = dir.join("log").join("demo.log");
        let sink = LogSink::new();

        sink.make_writer().write_all(b"dropped\n").expect("write detached");
        sink.attach(&path).expect("attach sink");
        assert!(sink.is_attached());
        sink.make_writer().write_all(b"kept\n").expect("write attached");
        sink.detach();
        sink.make_writer().write_all(b"dropped again\n").expect("write detached");

        let content = std::fs::read_to_string(&path).expect("read log");
        assert_eq!(content, "kept\n");
        assert!(!sink.is_attached());
        let _ = std::fs::remove_dir_all(dir);
    }
}
