//! Session model types: the bound file, its resolved tags and transport state.

use std::sync::Arc;
use std::time::Duration;

use super::handles::MediaHandle;

pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
pub const UNKNOWN_ALBUM: &str = "Unknown Album";

/// An audio file read into memory, as handed over by the picker.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    /// Declared MIME type, e.g. `audio/mpeg`.
    pub mime: String,
    pub bytes: Arc<[u8]>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes: bytes.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Strip the trailing extension (last `.` onward) from a file name.
///
/// Only a non-empty extension is stripped, so `"name."` is kept as is.
pub fn display_name_from(file_name: &str) -> String {
    match file_name.rfind('.') {
        Some(dot) if dot + 1 < file_name.len() && !file_name[dot + 1..].contains('/') => {
            file_name[..dot].to_string()
        }
        _ => file_name.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Empty,
    Loading,
    Ready,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackMetadata {
    pub title: String,
    pub artist: String,
    pub album: String,
    /// Handle to the first embedded picture, if any.
    pub cover: Option<MediaHandle>,
}

impl TrackMetadata {
    /// Placeholder tags used when the parser gives up.
    pub fn fallback(display_name: &str) -> Self {
        Self {
            title: display_name.to_string(),
            artist: UNKNOWN_ARTIST.to_string(),
            album: UNKNOWN_ALBUM.to_string(),
            cover: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaybackInfo {
    pub is_playing: bool,
    pub position: Duration,
    pub duration: Duration,
}

/// What a bound file looks like from the outside.
#[derive(Debug, Clone)]
pub struct AudioSession {
    pub(super) source: Option<SourceFile>,
    pub(super) display_name: String,
    pub(super) metadata: Option<TrackMetadata>,
    pub(super) playback: PlaybackInfo,
    pub(super) load_state: LoadState,
}

impl Default for AudioSession {
    fn default() -> Self {
        Self::empty()
    }
}

impl AudioSession {
    pub fn empty() -> Self {
        Self {
            source: None,
            display_name: String::new(),
            metadata: None,
            playback: PlaybackInfo::default(),
            load_state: LoadState::Empty,
        }
    }

    pub(super) fn loading(source: SourceFile) -> Self {
        let display_name = display_name_from(&source.name);
        Self {
            source: Some(source),
            display_name,
            metadata: None,
            playback: PlaybackInfo::default(),
            load_state: LoadState::Loading,
        }
    }

    pub fn source(&self) -> Option<&SourceFile> {
        self.source.as_ref()
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn metadata(&self) -> Option<&TrackMetadata> {
        self.metadata.as_ref()
    }

    pub fn playback(&self) -> PlaybackInfo {
        self.playback
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn is_ready(&self) -> bool {
        self.load_state == LoadState::Ready
    }

    /// Engine-reported reason, when decoding failed.
    pub fn failure(&self) -> Option<&str> {
        match &self.load_state {
            LoadState::Failed { reason } => Some(reason),
            _ => None,
        }
    }
}
