//! Advisory exclusive lock held across fetch, verify and install.
//!
//! `flock(2)` on a lock file in the cache entry. The lock is released when the
//! guard is dropped (or when the process dies, since the fd is closed).

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
#[cfg(unix)]
use std::os::unix::io::AsRawFd;

/// Held lock. Unlocks on drop.
#[derive(Debug)]
pub struct InstallLock {
    file: File,
    path: PathBuf,
}

impl InstallLock {
    /// Block until the exclusive lock on `path` is acquired, creating the file if needed.
    pub fn acquire(path: &Path) -> io::Result<Self> {
        let file = File::options()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;
        lock_exclusive(&file)?;
        tracing::debug!(path = %path.display(), "install lock acquired");
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Like [`InstallLock::acquire`] but returns `Ok(None)` instead of waiting.
    pub fn try_acquire(path: &Path) -> io::Result<Option<Self>> {
        let file = File::options()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;
        if !try_lock_exclusive(&file)? {
            return Ok(None);
        }
        Ok(Some(Self {
            file,
            path: path.to_path_buf(),
        }))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for InstallLock {
    fn drop(&mut self) {
        unlock(&self.file);
        tracing::debug!(path = %self.path.display(), "install lock released");
    }
}

#[cfg(unix)]
fn lock_exclusive(file: &File) -> io::Result<()> {
    loop {
        let r = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX) };
        if r == 0 {
            return Ok(());
        }
        let err = io::Error::last_os_error();
        if err.kind() != io::ErrorKind::Interrupted {
            return Err(err);
        }
    }
}

#[cfg(unix)]
fn try_lock_exclusive(file: &File) -> io::Result<bool> {
    let r = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
    if r == 0 {
        return Ok(true);
    }
    let err = io::Error::last_os_error();
    if err.raw_os_error() == Some(libc::EWOULDBLOCK) {
        return Ok(false);
    }
    Err(err)
}

#[cfg(unix)]
fn unlock(file: &File) {
    let _ = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_UN) };
}

// No advisory locking off Unix; installs there are single-invocation only.
#[cfg(not(unix))]
fn lock_exclusive(_file: &File) -> io::Result<()> {
    Ok(())
}

#[cfg(not(unix))]
fn try_lock_exclusive(_file: &File) -> io::Result<bool> {
    Ok(true)
}

#[cfg(not(unix))]
fn unlock(_file: &File) {}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn second_lock_waits_for_first() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".lock");
        let held = InstallLock::acquire(&path).unwrap();
        assert_eq!(held.path(), path.as_path());
        // flock locks belong to the open file description, so a second open conflicts.
        assert!(InstallLock::try_acquire(&path).unwrap().is_none());
        drop(held);
        let again = InstallLock::try_acquire(&path).unwrap();
        assert!(again.is_some());
    }

    #[test]
    fn acquire_creates_lock_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entry.lock");
        assert!(!path.exists());
        let _lock = InstallLock::acquire(&path).unwrap();
        assert!(path.exists());
    }
}
