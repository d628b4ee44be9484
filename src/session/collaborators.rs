//! Traits for the two collaborators the controller drives, plus the tag
//! bundle the parser hands back.

use std::fmt;
use std::time::Duration;

use crate::engine::Waveform;

use super::events::{EngineListener, SessionToken};
use super::model::SourceFile;

/// Decoder, waveform renderer and transport in one.
///
/// Commands are fire-and-forget. Results come back through the listener
/// registered with `subscribe`, tagged with the token passed to `load`.
pub trait WaveformEngine {
    fn subscribe(&mut self, listener: EngineListener);
    fn unsubscribe(&mut self);

    /// Start decoding `source`. Replaces whatever was loaded before.
    fn load(&mut self, token: SessionToken, source: &SourceFile);
    fn play(&mut self);
    fn pause(&mut self);
    fn stop(&mut self);
    fn seek(&mut self, position: Duration);
    /// Drop the loaded source and any playback resources tied to it.
    fn release(&mut self);

    /// Peak envelope of the loaded file, once decoded.
    fn waveform(&self) -> Option<Waveform>;
}

/// Reads embedded tags from an in-memory file.
pub trait TagParser: Send + Sync + 'static {
    fn parse(&self, bytes: &[u8], mime: &str) -> Result<TagBundle, TagError>;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagBundle {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub pictures: Vec<TagPicture>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TagPicture {
    pub data: Vec<u8>,
    /// MIME type of the image, e.g. `image/jpeg`.
    pub format: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TagError {
    /// The container could not be identified.
    UnsupportedContainer(String),
    /// The container was identified but its contents are malformed or truncated.
    Parse(String),
    /// Reading the stream failed, or the worker could not run.
    Io(String),
}

impl fmt::Display for TagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagError::UnsupportedContainer(msg) => write!(f, "unsupported container: {}", msg),
            TagError::Parse(msg) => write!(f, "tag parse error: {}", msg),
            TagError::Io(msg) => write!(f, "io error: {}", msg),
        }
    }
}

impl std::error::Error for TagError {}
