//! rodio-backed waveform engine.
//!
//! A dedicated thread owns the output stream and the loaded file. The
//! session side talks to it over a command channel and hears back through
//! the `EngineListener` it subscribed.

mod sink;
mod thread;
mod types;
mod waveform;

use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::session::{EngineListener, SessionToken, SourceFile, WaveformEngine};

pub use types::EngineSettings;
use types::{EngineCmd, WaveformHandle};
pub use waveform::Waveform;

use thread::spawn_engine_thread;

/// Generation the audio thread should be decoding; no token ever matches it
/// after release or shutdown.
const NO_LOAD: u64 = u64::MAX;

pub struct RodioEngine {
    tx: Sender<EngineCmd>,
    waveform: WaveformHandle,
    latest_load: Arc<AtomicU64>,
    join: Option<JoinHandle<()>>,
}

impl RodioEngine {
    pub fn spawn(settings: EngineSettings) -> io::Result<Self> {
        let (tx, rx) = mpsc::channel::<EngineCmd>();
        let waveform: WaveformHandle = Arc::new(Mutex::new(None));
        let latest_load = Arc::new(AtomicU64::new(NO_LOAD));
        let join = spawn_engine_thread(rx, waveform.clone(), latest_load.clone(), settings)?;
        Ok(Self {
            tx,
            waveform,
            latest_load,
            join: Some(join),
        })
    }

    fn send(&self, cmd: EngineCmd) {
        // The thread only exits on Quit or when we are dropped.
        let _ = self.tx.send(cmd);
    }
}

impl WaveformEngine for RodioEngine {
    fn subscribe(&mut self, listener: EngineListener) {
        self.send(EngineCmd::Subscribe(listener));
    }

    fn unsubscribe(&mut self) {
        self.send(EngineCmd::Unsubscribe);
    }

    fn load(&mut self, token: SessionToken, source: &SourceFile) {
        // Published before the command so a decode in progress sees it.
        self.latest_load.store(token.generation(), Ordering::Release);
        self.send(EngineCmd::Load {
            token,
            bytes: Arc::clone(&source.bytes),
        });
    }

    fn play(&mut self) {
        self.send(EngineCmd::Play);
    }

    fn pause(&mut self) {
        self.send(EngineCmd::Pause);
    }

    fn stop(&mut self) {
        self.send(EngineCmd::Stop);
    }

    fn seek(&mut self, position: Duration) {
        self.send(EngineCmd::Seek(position));
    }

    fn release(&mut self) {
        self.latest_load.store(NO_LOAD, Ordering::Release);
        self.send(EngineCmd::Release);
    }

    fn waveform(&self) -> Option<Waveform> {
        self.waveform.lock().ok().and_then(|w| w.clone())
    }
}

impl Drop for RodioEngine {
    fn drop(&mut self) {
        self.latest_load.store(NO_LOAD, Ordering::Release);
        self.send(EngineCmd::Quit);
        if let Some(h) = self.join.take() {
            let _ = h.join();
        }
    }
}
