//! Run lock serializing brightness passes across processes.
//!
//! The lock is a file in the runtime directory holding the owner's PID,
//! protected by an exclusive flock. A pass that cannot take the lock gives
//! up immediately; by the time it could run, the next trigger fires anyway.
//!
//! Stale locks cannot wedge the guard: the flock itself dies with the
//! owning process, and a lock file whose recorded PID no longer refers to
//! a live process is removed before one retry.

use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::constants::LOCK_FILE_NAME;

/// Exclusive ownership of "a brightness pass is in progress".
///
/// Dropping the token releases the flock and removes the lock file, on
/// every exit path.
#[derive(Debug)]
pub struct RunLock {
    file: File,
    path: PathBuf,
}

impl RunLock {
    /// Try to take the run lock without blocking.
    ///
    /// Returns `Ok(None)` when another live process holds it.
    pub fn try_acquire(path: &Path) -> std::io::Result<Option<RunLock>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        if let Some(lock) = Self::lock_file(path)? {
            return Ok(Some(lock));
        }

        // The flock is held. A live holder wins; a dead one left a stale
        // file behind, so clear it and retry once.
        if let Some(pid) = Self::holder_pid(path) {
            if is_process_running(pid) {
                return Ok(None);
            }
        }
        let _ = fs::remove_file(path);
        Self::lock_file(path)
    }

    fn lock_file(path: &Path) -> std::io::Result<Option<RunLock>> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        match file.try_lock_exclusive() {
            Ok(()) => {
                file.set_len(0)?;
                file.seek(SeekFrom::Start(0))?;
                writeln!(file, "{}", std::process::id())?;
                file.flush()?;
                Ok(Some(RunLock {
                    file,
                    path: path.to_path_buf(),
                }))
            }
            Err(_) => Ok(None),
        }
    }

    /// PID recorded in the lock file, if readable.
    pub fn holder_pid(path: &Path) -> Option<u32> {
        fs::read_to_string(path).ok()?.trim().parse().ok()
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
        let _ = fs::remove_file(&self.path);
    }
}

/// Check whether a process with the given PID exists.
pub fn is_process_running(pid: u32) -> bool {
    use nix::sys::signal::kill;
    use nix::unistd::Pid;

    kill(Pid::from_raw(pid as i32), None).is_ok()
}

/// Default lock path in the user's runtime directory.
pub fn default_lock_path() -> PathBuf {
    let runtime_dir = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".to_string());
    Path::new(&runtime_dir).join(LOCK_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn acquire_writes_own_pid() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.lock");
        let lock = RunLock::try_acquire(&path).unwrap().unwrap();
        assert_eq!(RunLock::holder_pid(&path), Some(std::process::id()));
        drop(lock);
    }

    #[test]
    fn drop_removes_the_lock_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.lock");
        {
            let _lock = RunLock::try_acquire(&path).unwrap().unwrap();
            assert!(path.exists());
        }
        assert!(!path.exists());
    }

    #[test]
    fn second_acquisition_is_refused_while_held() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.lock");
        let _held = RunLock::try_acquire(&path).unwrap().unwrap();
        assert!(RunLock::try_acquire(&path).unwrap().is_none());
    }

    #[test]
    fn stale_lock_from_a_dead_process_is_reclaimed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.lock");
        // A crashed process leaves the file behind with no flock held.
        fs::write(&path, "999999999\n").unwrap();
        let lock = RunLock::try_acquire(&path).unwrap();
        assert!(lock.is_some());
        assert_eq!(RunLock::holder_pid(&path), Some(std::process::id()));
    }

    #[test]
    fn current_process_is_running() {
        assert!(is_process_running(std::process::id()));
        assert!(!is_process_running(999_999_999));
    }
}
