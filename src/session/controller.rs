use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::engine::Waveform;

use super::collaborators::{TagBundle, TagError, TagParser, WaveformEngine};
use super::events::{EngineEvent, EngineListener, SessionEvent, SessionToken};
use super::handles::{MediaHandle, MediaHandles};
use super::model::{AudioSession, LoadState, SourceFile, TrackMetadata, UNKNOWN_ALBUM, UNKNOWN_ARTIST};

/// What happens to the playhead when playback runs off the end.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum FinishPolicy {
    /// Leave the position where the engine last reported it.
    #[default]
    Hold,
    /// Rewind to zero, as an explicit stop would.
    Rewind,
}

#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub finish_policy: FinishPolicy,
}

/// Owns the session for one file at a time and keeps it consistent with
/// what the engine and the tag parser report.
///
/// All methods run on the caller's thread. Collaborator results queue up in
/// an internal channel and are applied by `pump`/`pump_timeout`.
pub struct AudioSessionController<E: WaveformEngine, P: TagParser> {
    engine: E,
    parser: Arc<P>,
    options: SessionOptions,
    session: AudioSession,
    handles: MediaHandles,
    audio_handle: Option<MediaHandle>,
    generation: u64,
    tx: Sender<SessionEvent>,
    rx: Receiver<SessionEvent>,
}

impl<E: WaveformEngine, P: TagParser> AudioSessionController<E, P> {
    pub fn new(mut engine: E, parser: P, options: SessionOptions) -> Self {
        let (tx, rx) = mpsc::channel::<SessionEvent>();
        engine.subscribe(EngineListener::new(tx.clone()));
        Self {
            engine,
            parser: Arc::new(parser),
            options,
            session: AudioSession::empty(),
            handles: MediaHandles::new(),
            audio_handle: None,
            generation: 0,
            tx,
            rx,
        }
    }

    pub fn session(&self) -> &AudioSession {
        &self.session
    }

    #[cfg(test)]
    pub fn handles(&self) -> &MediaHandles {
        &self.handles
    }

    /// Handle backing the loaded audio bytes.
    #[cfg(test)]
    pub fn audio_handle(&self) -> Option<&MediaHandle> {
        self.audio_handle.as_ref()
    }

    pub fn token(&self) -> SessionToken {
        SessionToken(self.generation)
    }

    /// Peak envelope to draw, once the engine has decoded the file.
    pub fn waveform(&self) -> Option<Waveform> {
        if self.session.is_ready() {
            self.engine.waveform()
        } else {
            None
        }
    }

    /// Bind `file` as the new session, discarding whatever was bound.
    ///
    /// Decoding and tag reading start here and finish later; their results
    /// are applied by `pump`. Tag failures never surface as errors.
    pub fn bind_file(&mut self, file: SourceFile) -> SessionToken {
        self.release_handles();
        self.generation += 1;
        let token = self.token();

        info!(
            file = %file.name,
            mime = %file.mime,
            bytes = file.len(),
            generation = token.generation(),
            "binding file"
        );

        self.audio_handle = Some(self.handles.create(Arc::clone(&file.bytes), &file.mime));
        self.session = AudioSession::loading(file.clone());

        self.engine.load(token, &file);
        self.spawn_metadata(token, file);
        token
    }

    /// Flip play/pause. Ignored until the file is ready.
    pub fn toggle_playback(&mut self) {
        if !self.session.is_ready() {
            return;
        }
        let playing = !self.session.playback.is_playing;
        self.session.playback.is_playing = playing;
        if playing {
            self.engine.play();
        } else {
            self.engine.pause();
        }
    }

    pub fn stop(&mut self) {
        if !self.session.is_ready() {
            return;
        }
        self.session.playback.is_playing = false;
        self.session.playback.position = Duration::ZERO;
        self.engine.stop();
    }

    /// Jump back to the start, keeping the play/pause state.
    pub fn restart(&mut self) {
        if !self.session.is_ready() {
            return;
        }
        self.session.playback.position = Duration::ZERO;
        self.engine.seek(Duration::ZERO);
        if self.session.playback.is_playing {
            self.engine.play();
        }
    }

    /// Seek to `seconds`, clamped into `[0, duration]`.
    pub fn seek(&mut self, seconds: f64) {
        if !self.session.is_ready() {
            return;
        }
        let duration = self.session.playback.duration;
        let secs = if seconds.is_nan() {
            0.0
        } else {
            seconds.clamp(0.0, duration.as_secs_f64())
        };
        let target = Duration::from_secs_f64(secs).min(duration);
        self.engine.seek(target);
        self.session.playback.position = target;
    }

    /// Scrub relative to the current position.
    pub fn seek_by(&mut self, delta_seconds: i64) {
        let current = self.session.playback.position.as_secs_f64();
        self.seek(current + delta_seconds as f64);
    }

    /// Apply every queued notification. Returns how many were processed.
    pub fn pump(&mut self) -> usize {
        let mut n = 0;
        while let Ok(event) = self.rx.try_recv() {
            self.handle(event);
            n += 1;
        }
        n
    }

    /// Wait up to `timeout` for one notification, then drain the rest.
    /// Returns false if nothing arrived.
    pub fn pump_timeout(&mut self, timeout: Duration) -> bool {
        match self.rx.recv_timeout(timeout) {
            Ok(event) => {
                self.handle(event);
                self.pump();
                true
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => false,
        }
    }

    /// Apply one notification. Events from an older bind are dropped.
    pub fn handle(&mut self, event: SessionEvent) {
        let token = event.token();
        if token != self.token() || self.session.source.is_none() {
            debug!(
                stale = token.generation(),
                current = self.generation,
                "dropping event from superseded session"
            );
            return;
        }

        match event {
            SessionEvent::Engine { event, .. } => self.apply_engine_event(event),
            SessionEvent::Metadata { outcome, .. } => self.apply_metadata(outcome),
        }
    }

    /// Destroy the current session and release everything it holds.
    pub fn teardown(&mut self) {
        self.release_handles();
        debug!(live_handles = self.handles.live(), "session torn down");
        self.generation += 1;
        if self.session.source.is_some() {
            self.engine.release();
        }
        self.session = AudioSession::empty();
    }

    fn spawn_metadata(&mut self, token: SessionToken, file: SourceFile) {
        let parser = Arc::clone(&self.parser);
        let tx = self.tx.clone();
        let spawned = thread::Builder::new()
            .name("wavecue-tags".to_string())
            .spawn(move || {
                let outcome = parser.parse(&file.bytes, &file.mime);
                let _ = tx.send(SessionEvent::Metadata { token, outcome });
            });

        if let Err(e) = spawned {
            self.apply_metadata(Err(TagError::Io(format!("metadata worker: {e}"))));
        }
    }

    fn apply_metadata(&mut self, outcome: Result<TagBundle, TagError>) {
        let display_name = self.session.display_name.clone();
        let metadata = match outcome {
            Ok(bundle) => {
                let TagBundle {
                    title,
                    artist,
                    album,
                    pictures,
                } = bundle;
                let cover = pictures
                    .into_iter()
                    .next()
                    .map(|pic| self.handles.create(Arc::from(pic.data), &pic.format));
                TrackMetadata {
                    title: non_empty(title).unwrap_or(display_name),
                    artist: non_empty(artist).unwrap_or_else(|| UNKNOWN_ARTIST.to_string()),
                    album: non_empty(album).unwrap_or_else(|| UNKNOWN_ALBUM.to_string()),
                    cover,
                }
            }
            Err(e) => {
                let file = self.session.source.as_ref().map(|s| s.name.as_str()).unwrap_or("");
                warn!(file = %file, error = %e, "metadata read failed, using placeholders");
                TrackMetadata::fallback(&display_name)
            }
        };

        if let Some(old) = self.session.metadata.take().and_then(|m| m.cover) {
            self.handles.revoke(&old);
        }
        self.session.metadata = Some(metadata);
    }

    fn apply_engine_event(&mut self, event: EngineEvent) {
        let playback = &mut self.session.playback;
        match event {
            EngineEvent::Ready { duration } => {
                if self.session.load_state != LoadState::Loading {
                    return;
                }
                playback.duration = duration;
                playback.position = playback.position.min(duration);
                self.session.load_state = LoadState::Ready;
                info!(
                    file = %self.session.display_name,
                    duration_ms = duration.as_millis() as u64,
                    "decoded"
                );
            }
            EngineEvent::PositionUpdate { position } => {
                // While paused the position only moves by our own commands; a
                // report queued before a stop or pause must not undo them.
                if self.session.load_state == LoadState::Ready && playback.is_playing {
                    playback.position = position.min(playback.duration);
                }
            }
            EngineEvent::Finished => {
                playback.is_playing = false;
                if self.options.finish_policy == FinishPolicy::Rewind {
                    playback.position = Duration::ZERO;
                    self.engine.stop();
                }
            }
            EngineEvent::DecodeError { reason } => {
                if self.session.load_state != LoadState::Loading {
                    return;
                }
                warn!(file = %self.session.display_name, %reason, "decode failed");
                self.session.load_state = LoadState::Failed { reason };
            }
        }
    }

    fn release_handles(&mut self) {
        if let Some(cover) = self.session.metadata.as_mut().and_then(|m| m.cover.take()) {
            self.handles.revoke(&cover);
        }
        if let Some(audio) = self.audio_handle.take() {
            self.handles.revoke(&audio);
        }
    }
}

impl<E: WaveformEngine, P: TagParser> Drop for AudioSessionController<E, P> {
    fn drop(&mut self) {
        self.teardown();
        self.engine.unsubscribe();
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
