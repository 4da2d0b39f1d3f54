use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::PortappError;

pub fn ensure_dir(path: &Path) -> Result<(), PortappError> {
    std::fs::create_dir_all(path).map_err(|err| PortappError::io("creating directory", err))
}

pub fn path_join<I, P>(base: &Path, parts: I) -> PathBuf
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut out = base.to_path_buf();
    for part in parts {
        out.push(part);
    }
    out
}

/// Removes every path in `paths`, files and directory trees alike.
///
/// Best-effort: a path that cannot be removed is logged and skipped.
pub fn cleanup<P: AsRef<Path>>(paths: &[P]) {
    for path in paths {
        let path = path.as_ref();
        let metadata = match std::fs::symlink_metadata(path) {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "nothing to clean up");
                continue;
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "cannot inspect path for cleanup");
                continue;
            }
        };

        let result = if metadata.is_dir() {
            std::fs::remove_dir_all(path)
        } else {
            std::fs::remove_file(path)
        };
        match result {
            Ok(()) => info!(path = %path.display(), "removed"),
            Err(err) => warn!(path = %path.display(), error = %err, "cleanup failed"),
        }
    }
}
