//! Persistent signing-key storage.
//!
//! The key is 32 raw random bytes in an opaque file.  It is generated once on
//! first use and returned verbatim ever after; replacing it makes every
//! earlier signature unverifiable.
//!
//! Concurrent first use is settled by a no-clobber rename: the first writer's
//! key lands, later writers discard theirs and read the winner's.

use std::fs;
use std::io::Write;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use rand::{rngs::OsRng, RngCore};
use tempfile::NamedTempFile;
use tracing::{info, warn};

use verihire_contracts::error::{HireError, HireResult};

use crate::fsutil::parent_dir;

/// Length of a freshly generated signing key.
pub const KEY_LEN: usize = 32;

fn key_err(path: &Path, reason: String) -> HireError {
    HireError::KeyStore {
        path: path.display().to_string(),
        reason,
    }
}

/// Read the key at `path` without ever creating one.
///
/// Returns `Ok(None)` when no key file exists.
pub fn read_key(path: &Path) -> HireResult<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(key) => {
            if key.len() != KEY_LEN {
                warn!(
                    path = %path.display(),
                    len = key.len(),
                    expected = KEY_LEN,
                    "signing key has unexpected length; using it verbatim"
                );
            }
            Ok(Some(key))
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(key_err(path, format!("failed to read key: {}", err))),
    }
}

/// Return the key at `path`, generating and persisting one if absent.
pub fn get_or_create_key(path: &Path) -> HireResult<Vec<u8>> {
    if let Some(key) = read_key(path)? {
        return Ok(key);
    }

    let mut key = vec![0u8; KEY_LEN];
    OsRng.fill_bytes(&mut key);

    let parent = parent_dir(path);
    fs::create_dir_all(parent)
        .map_err(|e| key_err(path, format!("failed to create {}: {}", parent.display(), e)))?;
    let mut tmp = NamedTempFile::new_in(parent)
        .map_err(|e| key_err(path, format!("failed to create temp file: {}", e)))?;
    #[cfg(unix)]
    {
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(0o600))
            .map_err(|e| key_err(path, format!("failed to set key file mode: {}", e)))?;
    }
    tmp.write_all(&key)
        .map_err(|e| key_err(path, format!("failed to write key: {}", e)))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| key_err(path, format!("failed to sync key: {}", e)))?;

    match tmp.persist_noclobber(path) {
        Ok(_) => {
            info!(path = %path.display(), "signing key generated");
            Ok(key)
        }
        Err(err) if err.error.kind() == std::io::ErrorKind::AlreadyExists => {
            info!(path = %path.display(), "signing key created concurrently; using existing key");
            read_key(path)?
                .ok_or_else(|| key_err(path, "key vanished after concurrent creation".to_string()))
        }
        Err(err) => Err(key_err(path, format!("failed to persist key: {}", err.error))),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Barrier};
    use std::thread;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn key_is_created_once_and_reused() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("secret.key");

        let first = get_or_create_key(&path).unwrap();
        let second = get_or_create_key(&path).unwrap();

        assert_eq!(first.len(), KEY_LEN);
        assert_eq!(first, second, "the same key bytes must be returned every time");
        assert_eq!(fs::read(&path).unwrap(), first, "key is stored as raw bytes");
    }

    #[test]
    fn existing_key_is_returned_verbatim() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("secret.key");
        fs::write(&path, b"legacy-key-of-odd-length").unwrap();

        assert_eq!(get_or_create_key(&path).unwrap(), b"legacy-key-of-odd-length");
    }

    #[test]
    fn read_key_never_creates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("secret.key");

        assert!(read_key(&path).unwrap().is_none());
        assert!(!path.exists());
    }

    #[test]
    fn missing_parent_directory_is_created() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/keys/secret.key");
        get_or_create_key(&path).unwrap();
        assert!(path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn key_file_is_owner_only() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("secret.key");
        get_or_create_key(&path).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }

    #[test]
    fn concurrent_first_use_agrees_on_one_key() {
        let dir = TempDir::new().unwrap();
        let path = Arc::new(dir.path().join("secret.key"));
        let barrier = Arc::new(Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let path = Arc::clone(&path);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    get_or_create_key(&path).unwrap()
                })
            })
            .collect();

        let keys: Vec<Vec<u8>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let on_disk = fs::read(path.as_path()).unwrap();
        for key in keys {
            assert_eq!(key, on_disk, "every caller must end up with the persisted key");
        }
    }
}
