//! Exclusive advisory lock on the state file.
//!
//! Mutating commands hold the lock from load to save, so overlapping
//! invocations apply their changes one after the other. The lock lives on a
//! `<state>.lock` sibling because the state file itself is replaced on save.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

/// Held lock. Released when dropped (closing the file releases the flock).
pub struct StateLock {
    _lock_file: File,
    path: PathBuf,
}

impl std::fmt::Debug for StateLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateLock")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// `<dir>/<file name>.lock` for a state path.
pub fn lock_path(state: &Path) -> PathBuf {
    let mut name = state
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".lock");
    state.with_file_name(name)
}

/// Block until the lock for `state` is held.
pub async fn acquire(state: &Path) -> Result<StateLock> {
    let path = lock_path(state);
    let lock = tokio::task::spawn_blocking(move || acquire_blocking(path))
        .await
        .context("lock task panicked")??;
    debug!(path = %lock.path.display(), "acquired state lock");
    Ok(lock)
}

fn acquire_blocking(path: PathBuf) -> Result<StateLock> {
    let lock_file = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .truncate(false)
        .open(&path)
        .with_context(|| format!("failed to open lock file: {}", path.display()))?;

    flock_exclusive(&lock_file)
        .with_context(|| format!("failed to lock: {}", path.display()))?;

    Ok(StateLock {
        _lock_file: lock_file,
        path,
    })
}

fn flock_exclusive(file: &File) -> io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::io::AsRawFd;
        let fd = file.as_raw_fd();
        loop {
            // SAFETY: flock is a standard POSIX call. fd is a valid file
            // descriptor owned by `file` for the duration of the call.
            #[allow(unsafe_code)]
            let result = unsafe { libc::flock(fd, libc::LOCK_EX) };
            if result == 0 {
                return Ok(());
            }
            let err = io::Error::last_os_error();
            if err.kind() != io::ErrorKind::Interrupted {
                return Err(err);
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = file;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_lock_path_keeps_full_file_name() {
        assert_eq!(
            lock_path(Path::new("/var/lib/registry.json")),
            PathBuf::from("/var/lib/registry.json.lock")
        );
        assert_eq!(
            lock_path(Path::new("state.yaml")),
            PathBuf::from("state.yaml.lock")
        );
    }

    #[cfg(unix)]
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_second_acquire_waits_for_release() {
        let dir = TempDir::new().unwrap();
        let state = dir.path().join("registry.json");

        let first = acquire(&state).await.unwrap();
        let acquired = Arc::new(AtomicBool::new(false));

        let waiter = {
            let state = state.clone();
            let acquired = acquired.clone();
            tokio::spawn(async move {
                let _second = acquire(&state).await.unwrap();
                acquired.store(true, Ordering::SeqCst);
            })
        };

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!acquired.load(Ordering::SeqCst));

        drop(first);
        waiter.await.unwrap();
        assert!(acquired.load(Ordering::SeqCst));
    }
}
