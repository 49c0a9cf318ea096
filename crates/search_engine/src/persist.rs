use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("cannot write {path:?}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("cannot read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
}

/// Small text files under one directory. Writes land through a sibling temp
/// file so readers never observe a half-written file.
#[derive(Debug, Clone)]
pub struct StateFiles {
    dir: PathBuf,
}

impl StateFiles {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `Ok(None)` when the file has never been written.
    pub fn read(&self, filename: &str) -> Result<Option<String>, PersistError> {
        let path = self.dir.join(filename);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(PersistError::Read { path, source }),
        }
    }

    /// Creates the directory on first use and replaces `filename` in one rename.
    pub fn write(&self, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
        let target = self.dir.join(filename);
        let fail = |source: io::Error| PersistError::Write {
            path: target.clone(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(fail)?;
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(fail)?;
        tmp.write_all(content.as_bytes()).map_err(fail)?;
        tmp.as_file_mut().sync_all().map_err(fail)?;
        tmp.persist(&target).map_err(|err| fail(err.error))?;
        Ok(target)
    }
}
