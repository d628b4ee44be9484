//! Decoding helpers over in-memory audio.
//!
//! Everything here reads from a shared byte buffer, so a sink can be rebuilt
//! at any offset without touching the filesystem again.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use super::waveform::{PeakAccumulator, Waveform};

/// Create a paused `Sink` for `bytes` that starts playback at `start_at`.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    bytes: &Arc<[u8]>,
    start_at: Duration,
) -> Result<Sink, String> {
    let source = Decoder::new(Cursor::new(Arc::clone(bytes)))
        .map_err(|e| e.to_string())?
        // `skip_duration` is the fallback seeking primitive; Duration::ZERO is fine.
        .skip_duration(start_at);

    let sink = Sink::connect_new(stream.mixer());
    sink.append(source);
    sink.pause();
    Ok(sink)
}

/// Samples decoded between checks of `keep_going`.
const CANCEL_CHECK_SAMPLES: u64 = 1 << 16;

/// Decode `bytes` once, fully, to get the exact duration and a peak envelope
/// of `buckets` entries.
///
/// `keep_going` is polled before decoding and periodically during it;
/// `Ok(None)` means it returned false and the work was dropped.
pub(crate) fn decode_envelope(
    bytes: &Arc<[u8]>,
    buckets: usize,
    keep_going: impl Fn() -> bool,
) -> Result<Option<(Waveform, Duration)>, String> {
    if !keep_going() {
        return Ok(None);
    }
    let decoder = Decoder::new(Cursor::new(Arc::clone(bytes))).map_err(|e| e.to_string())?;
    let sample_rate = decoder.sample_rate();
    if sample_rate == 0 {
        return Err("stream reports a zero sample rate".to_string());
    }

    let mut acc = PeakAccumulator::new(decoder.channels(), sample_rate);
    let mut seen: u64 = 0;
    for sample in decoder {
        acc.push(sample);
        seen += 1;
        if seen % CANCEL_CHECK_SAMPLES == 0 && !keep_going() {
            return Ok(None);
        }
    }

    if acc.frames() == 0 {
        return Err("no audio frames decoded".to_string());
    }
    Ok(Some(acc.finish(buckets)))
}
