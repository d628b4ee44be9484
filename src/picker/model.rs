use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;

use crate::session::SourceFile;

/// A pickable file: name, declared type, byte length and a way to read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerEntry {
    pub path: PathBuf,
    pub name: String,
    pub mime: String,
    pub len: u64,
}

impl PickerEntry {
    /// Read the whole file into memory for binding.
    pub fn open(&self) -> Result<SourceFile, PickError> {
        let bytes = fs::read(&self.path).map_err(|e| PickError::Io {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(SourceFile::new(self.name.clone(), self.mime.clone(), bytes))
    }
}

#[derive(Debug)]
pub enum PickError {
    /// The path's guessed type is not `audio/*`.
    NotAudio { path: PathBuf, mime: String },
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for PickError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PickError::NotAudio { path, mime } => {
                write!(f, "{} is not an audio file ({})", path.display(), mime)
            }
            PickError::Io { path, source } => write!(f, "cannot read {}: {}", path.display(), source),
        }
    }
}

impl std::error::Error for PickError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PickError::Io { source, .. } => Some(source),
            PickError::NotAudio { .. } => None,
        }
    }
}
