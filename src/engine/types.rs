//! Commands and shared handles of the audio thread.

use std::sync::{Arc, Mutex};

use crate::session::{EngineListener, SessionToken};

use super::waveform::Waveform;

#[derive(Debug)]
pub enum EngineCmd {
    /// Route notifications to this listener from now on.
    Subscribe(EngineListener),
    Unsubscribe,
    /// Decode and prepare `bytes` as the loaded file.
    Load {
        token: SessionToken,
        bytes: Arc<[u8]>,
    },
    Play,
    Pause,
    /// Pause and rewind to the start.
    Stop,
    Seek(std::time::Duration),
    /// Forget the loaded file.
    Release,
    /// Shut the audio thread down.
    Quit,
}

#[derive(Debug, Clone, Copy)]
pub struct EngineSettings {
    /// Interval between position reports while playing (milliseconds).
    pub position_interval_ms: u64,
    /// Number of buckets in the peak envelope.
    pub buckets: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            position_interval_ms: 100,
            buckets: 512,
        }
    }
}

/// Latest decoded envelope, shared with whoever draws it.
pub type WaveformHandle = Arc<Mutex<Option<Waveform>>>;
