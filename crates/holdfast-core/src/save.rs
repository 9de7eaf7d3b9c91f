use std::fs;
use std::path::{Path, PathBuf};

use holdfast_protocol::{read_snapshot, write_snapshot, Snapshot, WireError};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("could not access the save file: {0}")]
    Io(#[from] std::io::Error),
    #[error("save file is corrupt: {0}")]
    Corrupt(#[from] WireError),
}

/// One match persisted as codec text at a fixed path. Writes go through a
/// sibling temp file and a rename, so a crash mid-write leaves the previous
/// save intact.
#[derive(Clone, Debug)]
pub struct SaveFile {
    path: PathBuf,
}

impl SaveFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn load(&self) -> Result<Snapshot, SaveError> {
        let text = fs::read_to_string(&self.path)?;
        let snapshot = read_snapshot(&text)?;
        debug!(path = %self.path.display(), turn = snapshot.turn, "save loaded");
        Ok(snapshot)
    }

    pub fn store(&self, snapshot: &Snapshot) -> Result<(), SaveError> {
        let text = write_snapshot(snapshot);
        let tmp = self.path.with_extension("sav.tmp");
        fs::write(&tmp, text)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), turn = snapshot.turn, "save written");
        Ok(())
    }
}
