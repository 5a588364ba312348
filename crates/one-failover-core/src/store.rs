//! Persisted failover state

use std::{
    fs::{File, OpenOptions},
    io::{Error as IoError, ErrorKind as IoErrorKind, Read, Write},
    path::{Path, PathBuf},
    result::Result as StdResult,
};

use nix::fcntl::{Flock, FlockArg};
use thiserror::Error;

use crate::event::VrrpState;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("failed to lock state file: {0}")]
    Lock(nix::errno::Errno),
}

pub type Result<T> = StdResult<T, Error>;

/// The last VRRP state observed, as recorded on disk
#[derive(Debug, Clone, Copy, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PersistedState {
    pub state: VrrpState,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            state: VrrpState::Unknown,
        }
    }
}

/// Single-record JSON store guarded by an exclusive advisory lock
///
/// Readers and writers share the same lock class. Transitions happen on
/// VRRP timescales, so plain mutual exclusion is sufficient and a
/// multi-reader scheme is not needed.
#[derive(Debug, Clone)]
pub struct StateStore {
    file_path: PathBuf,
}

impl StateStore {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    #[must_use]
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Read the last recorded state
    ///
    /// A store that has never been written reads as `UNKNOWN`. Every other
    /// failure propagates, a corrupt record must not be masked.
    pub fn load(&self) -> Result<PersistedState> {
        let file = match File::open(&self.file_path) {
            Ok(file) => file,
            Err(err) if err.kind() == IoErrorKind::NotFound => {
                // Bootstrap case on first boot
                log::debug!("No state recorded at {} yet", self.file_path.display());
                return Ok(PersistedState::default());
            }
            Err(err) => return Err(err.into()),
        };
        let mut locked = lock_exclusive(file)?;
        let mut contents = String::new();
        locked.read_to_string(&mut contents)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Overwrite the record with `state`
    pub fn save(&self, state: VrrpState) -> Result<()> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.file_path)?;
        let mut locked = lock_exclusive(file)?;
        serde_json::to_writer(&mut *locked, &PersistedState { state })?;
        locked.flush()?;
        Ok(())
    }
}

// The lock is released when the guard goes out of scope, on every path.
fn lock_exclusive(file: File) -> Result<Flock<File>> {
    Flock::lock(file, FlockArg::LockExclusive).map_err(|(_, errno)| Error::Lock(errno))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    fn store_in(dir: &tempfile::TempDir) -> StateStore {
        StateStore::new(dir.path().join("one-failover.state"))
    }

    #[test]
    fn load_without_file_defaults_to_unknown() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let store = store_in(&dir);

        assert_eq!(VrrpState::Unknown, store.load()?.state);

        Ok(())
    }

    #[test]
    fn save_then_load_round_trip() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let store = store_in(&dir);

        store.save(VrrpState::Master)?;
        assert_eq!(VrrpState::Master, store.load()?.state);

        store.save(VrrpState::Backup)?;
        assert_eq!(VrrpState::Backup, store.load()?.state);

        Ok(())
    }

    #[test]
    fn record_is_compact_json() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let store = store_in(&dir);

        store.save(VrrpState::Master)?;
        let contents = fs::read_to_string(store.file_path())?;
        assert_eq!("{\"state\":\"MASTER\"}", contents);

        Ok(())
    }

    #[test]
    fn lower_case_record_is_normalized() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let store = store_in(&dir);

        fs::write(store.file_path(), "{\"state\":\"master\"}")?;
        assert_eq!(VrrpState::Master, store.load()?.state);

        Ok(())
    }

    #[test]
    fn corrupt_record_is_fatal() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let store = store_in(&dir);

        fs::write(store.file_path(), "{\"state\":")?;
        assert!(matches!(store.load(), Err(Error::Json(_))));

        Ok(())
    }
}
