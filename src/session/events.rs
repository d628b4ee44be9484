//! Notifications flowing back into the controller.
//!
//! The engine reports through an `EngineListener`, whose four methods are the
//! whole engine-to-session contract. Metadata workers post their outcome
//! directly. Every message carries the `SessionToken` it was started under.

use std::sync::mpsc::Sender;
use std::time::Duration;

use super::collaborators::{TagBundle, TagError};

/// Generation of a bound file. Bumped on every bind and on teardown.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionToken(pub(crate) u64);

impl SessionToken {
    pub fn generation(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Decode finished; playback can start.
    Ready { duration: Duration },
    /// Periodic while playing, and after every seek, pause and stop.
    PositionUpdate { position: Duration },
    /// Playback reached the end of the file.
    Finished,
    /// The engine could not decode the file.
    DecodeError { reason: String },
}

#[derive(Debug)]
pub enum SessionEvent {
    Engine {
        token: SessionToken,
        event: EngineEvent,
    },
    Metadata {
        token: SessionToken,
        outcome: Result<TagBundle, TagError>,
    },
}

impl SessionEvent {
    pub fn token(&self) -> SessionToken {
        match self {
            SessionEvent::Engine { token, .. } | SessionEvent::Metadata { token, .. } => *token,
        }
    }
}

/// Subscription handed to the engine by the controller.
///
/// Sends never fail loudly: once the controller is gone there is nobody left
/// to reconcile, so notifications are dropped.
#[derive(Debug, Clone)]
pub struct EngineListener {
    tx: Sender<SessionEvent>,
}

impl EngineListener {
    pub(crate) fn new(tx: Sender<SessionEvent>) -> Self {
        Self { tx }
    }

    pub fn ready(&self, token: SessionToken, duration: Duration) {
        self.emit(token, EngineEvent::Ready { duration });
    }

    pub fn position(&self, token: SessionToken, position: Duration) {
        self.emit(token, EngineEvent::PositionUpdate { position });
    }

    pub fn finished(&self, token: SessionToken) {
        self.emit(token, EngineEvent::Finished);
    }

    pub fn decode_error(&self, token: SessionToken, reason: impl Into<String>) {
        self.emit(
            token,
            EngineEvent::DecodeError {
                reason: reason.into(),
            },
        );
    }

    fn emit(&self, token: SessionToken, event: EngineEvent) {
        let _ = self.tx.send(SessionEvent::Engine { token, event });
    }
}
