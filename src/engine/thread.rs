use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, warn};

use crate::session::{EngineListener, SessionToken};

use super::sink::{create_sink_at, decode_envelope};
use super::types::{EngineCmd, EngineSettings, WaveformHandle};

/// The file currently loaded on the audio thread.
struct Loaded {
    token: SessionToken,
    bytes: Arc<[u8]>,
    sink: Option<Sink>,
    /// Added to `Sink::get_pos` when the sink was rebuilt with a skip.
    offset: Duration,
    playing: bool,
}

impl Loaded {
    fn position(&self) -> Duration {
        self.sink
            .as_ref()
            .map_or(Duration::ZERO, |s| self.offset + s.get_pos())
    }

    fn rebuild(&mut self, stream: Option<&OutputStream>, start_at: Duration) {
        if let Some(old) = self.sink.take() {
            old.stop();
        }
        let Some(stream) = stream else {
            return;
        };
        match create_sink_at(stream, &self.bytes, start_at) {
            Ok(sink) => {
                if self.playing {
                    sink.play();
                }
                self.sink = Some(sink);
                self.offset = start_at;
            }
            Err(e) => warn!(error = %e, "failed to rebuild sink"),
        }
    }
}

pub(super) fn spawn_engine_thread(
    rx: Receiver<EngineCmd>,
    waveform: WaveformHandle,
    latest_load: Arc<AtomicU64>,
    settings: EngineSettings,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("wavecue-engine".to_string())
        .spawn(move || {
            let stream = match OutputStreamBuilder::open_default_stream() {
                Ok(mut s) => {
                    // rodio logs to stderr when the stream is dropped, which would
                    // scribble over the TUI.
                    s.log_on_drop(false);
                    Some(s)
                }
                Err(e) => {
                    warn!(error = %e, "no audio output device, playback disabled");
                    None
                }
            };

            let mut listener: Option<EngineListener> = None;
            let mut loaded: Option<Loaded> = None;
            let tick = Duration::from_millis(settings.position_interval_ms.max(1));

            loop {
                match rx.recv_timeout(tick) {
                    Ok(cmd) => match cmd {
                        EngineCmd::Subscribe(l) => listener = Some(l),
                        EngineCmd::Unsubscribe => listener = None,

                        EngineCmd::Load { token, bytes } => {
                            if let Some(mut old) = loaded.take() {
                                old.playing = false;
                                old.rebuild(None, Duration::ZERO);
                            }
                            set_waveform(&waveform, None);

                            let current = || latest_load.load(Ordering::Acquire) == token.generation();
                            match decode_envelope(&bytes, settings.buckets, current) {
                                Ok(None) => {
                                    debug!(generation = token.generation(), "load superseded, skipped");
                                }
                                Ok(Some((wave, duration))) => {
                                    set_waveform(&waveform, Some(wave));
                                    let mut l = Loaded {
                                        token,
                                        bytes,
                                        sink: None,
                                        offset: Duration::ZERO,
                                        playing: false,
                                    };
                                    l.rebuild(stream.as_ref(), Duration::ZERO);
                                    loaded = Some(l);
                                    debug!(
                                        generation = token.generation(),
                                        duration_ms = duration.as_millis() as u64,
                                        "engine ready"
                                    );
                                    if let Some(ref ls) = listener {
                                        ls.ready(token, duration);
                                    }
                                }
                                Err(reason) => {
                                    if let Some(ref ls) = listener {
                                        ls.decode_error(token, reason);
                                    }
                                }
                            }
                        }

                        EngineCmd::Play => {
                            let Some(l) = loaded.as_mut() else {
                                continue;
                            };
                            l.playing = true;
                            let drained = l.sink.as_ref().is_none_or(|s| s.empty());
                            if drained {
                                // Played to the end earlier; start over.
                                l.rebuild(stream.as_ref(), Duration::ZERO);
                            } else if let Some(ref s) = l.sink {
                                s.play();
                            }
                            if l.sink.is_none() {
                                warn!("play requested without an output device");
                            }
                        }

                        EngineCmd::Pause => {
                            if let Some(l) = loaded.as_mut() {
                                l.playing = false;
                                if let Some(ref s) = l.sink {
                                    s.pause();
                                }
                                if let Some(ref ls) = listener {
                                    ls.position(l.token, l.position());
                                }
                            }
                        }

                        EngineCmd::Stop => {
                            if let Some(l) = loaded.as_mut() {
                                l.playing = false;
                                l.rebuild(stream.as_ref(), Duration::ZERO);
                                if let Some(ref ls) = listener {
                                    ls.position(l.token, Duration::ZERO);
                                }
                            }
                        }

                        EngineCmd::Seek(pos) => {
                            let Some(l) = loaded.as_mut() else {
                                continue;
                            };
                            // A drained sink has nothing left to seek in.
                            let seeked = l
                                .sink
                                .as_ref()
                                .filter(|s| !s.empty())
                                .map(|s| s.try_seek(pos));
                            match seeked {
                                Some(Ok(())) => l.offset = Duration::ZERO,
                                Some(Err(e)) => {
                                    debug!(error = %e, "seek unsupported, rebuilding sink");
                                    l.rebuild(stream.as_ref(), pos);
                                }
                                None => l.rebuild(stream.as_ref(), pos),
                            }
                            if let Some(ref ls) = listener {
                                ls.position(l.token, pos);
                            }
                        }

                        EngineCmd::Release => {
                            if let Some(mut l) = loaded.take() {
                                l.playing = false;
                                l.rebuild(None, Duration::ZERO);
                            }
                            set_waveform(&waveform, None);
                        }

                        EngineCmd::Quit => {
                            if let Some(mut l) = loaded.take() {
                                l.rebuild(None, Duration::ZERO);
                            }
                            break;
                        }
                    },
                    Err(RecvTimeoutError::Timeout) => {
                        // Periodic position report and end-of-file detection.
                        let Some(l) = loaded.as_mut() else {
                            continue;
                        };
                        if !l.playing {
                            continue;
                        }
                        let drained = l.sink.as_ref().is_none_or(|s| s.empty());
                        if let Some(ref ls) = listener {
                            ls.position(l.token, l.position());
                        }
                        if drained {
                            l.playing = false;
                            if let Some(ref ls) = listener {
                                ls.finished(l.token);
                            }
                        }
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        })
}

fn set_waveform(handle: &WaveformHandle, wave: Option<super::Waveform>) {
    if let Ok(mut w) = handle.lock() {
        *w = wave;
    }
}
