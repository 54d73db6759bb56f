//! File helpers shared by the key store and the snapshot store.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;

use fs2::FileExt;
use serde::{de::DeserializeOwned, Serialize};
use tempfile::NamedTempFile;
use tracing::warn;

use verihire_contracts::error::{HireError, HireResult};

/// Outcome of reading a JSON document that may legitimately be absent.
pub(crate) enum Loaded<T> {
    /// No file at the path.
    Absent,
    /// File parsed; the raw bytes are kept for rollback.
    Parsed { value: T, raw: Vec<u8> },
    /// File exists but could not be read or parsed.
    Corrupt(HireError),
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Loaded<T> {
    let raw = match fs::read(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Loaded::Absent,
        Err(err) => {
            return Loaded::Corrupt(HireError::StorageRead {
                path: path.display().to_string(),
                reason: err.to_string(),
            })
        }
    };
    match serde_json::from_slice::<T>(&raw) {
        Ok(value) => Loaded::Parsed { value, raw },
        Err(err) => Loaded::Corrupt(HireError::StorageRead {
            path: path.display().to_string(),
            reason: format!("invalid JSON: {}", err),
        }),
    }
}

/// The directory temp files for `path` are created in.
pub(crate) fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Serialize `value` as pretty JSON into a temp file beside `path`, sync it,
/// and rename it over `path`.  Readers see either the old or the new file.
pub(crate) fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> HireResult<()> {
    let write_err = |reason: String| HireError::StorageWrite {
        path: path.display().to_string(),
        reason,
    };

    let parent = parent_dir(path);
    fs::create_dir_all(parent)
        .map_err(|e| write_err(format!("failed to create {}: {}", parent.display(), e)))?;
    let mut tmp = NamedTempFile::new_in(parent)
        .map_err(|e| write_err(format!("failed to create temp file: {}", e)))?;
    serde_json::to_writer_pretty(tmp.as_file_mut(), value)
        .map_err(|e| write_err(format!("failed to serialize: {}", e)))?;
    tmp.as_file_mut()
        .flush()
        .map_err(|e| write_err(format!("failed to flush: {}", e)))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| write_err(format!("failed to sync: {}", e)))?;
    tmp.persist(path)
        .map_err(|e| write_err(format!("failed to persist: {}", e.error)))?;
    Ok(())
}

/// Atomically replace `path` with `raw`, or remove it when `raw` is `None`.
pub(crate) fn restore_raw(path: &Path, raw: Option<&[u8]>) -> HireResult<()> {
    let write_err = |reason: String| HireError::StorageWrite {
        path: path.display().to_string(),
        reason,
    };
    match raw {
        Some(bytes) => {
            let mut tmp = NamedTempFile::new_in(parent_dir(path))
                .map_err(|e| write_err(format!("failed to create temp file: {}", e)))?;
            tmp.write_all(bytes)
                .map_err(|e| write_err(format!("failed to write: {}", e)))?;
            tmp.as_file()
                .sync_all()
                .map_err(|e| write_err(format!("failed to sync: {}", e)))?;
            tmp.persist(path)
                .map_err(|e| write_err(format!("failed to persist: {}", e.error)))?;
            Ok(())
        }
        None => match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(write_err(format!("failed to remove: {}", err))),
        },
    }
}

/// Move a corrupt file aside as `<name>.corrupt-<unix seconds>` so a fresh
/// file can be started without destroying the evidence.
pub(crate) fn quarantine(path: &Path) {
    let mut target = path.as_os_str().to_owned();
    target.push(format!(".corrupt-{}", chrono::Utc::now().timestamp()));
    match fs::rename(path, &target) {
        Ok(()) => warn!(
            path = %path.display(),
            moved_to = %Path::new(&target).display(),
            "corrupt store file preserved and replaced"
        ),
        Err(err) => warn!(path = %path.display(), error = %err, "failed to preserve corrupt store file"),
    }
}

/// Open (creating if needed) and exclusively lock `path`.
///
/// The lock is advisory and released when the returned file is dropped.
pub(crate) fn lock_exclusive(path: &Path) -> HireResult<File> {
    fs::create_dir_all(parent_dir(path)).map_err(|e| HireError::LockFailed {
        reason: format!("failed to create lock directory for {}: {}", path.display(), e),
    })?;
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .map_err(|e| HireError::LockFailed {
            reason: format!("failed to open lock file {}: {}", path.display(), e),
        })?;
    file.lock_exclusive().map_err(|e| HireError::LockFailed {
        reason: format!("failed to lock {}: {}", path.display(), e),
    })?;
    Ok(file)
}
