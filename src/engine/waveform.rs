//! Peak envelope extraction.
//!
//! Decoded samples are folded into fixed-size blocks of frames while
//! streaming, so memory stays proportional to the block count rather than
//! the sample count. `finish` then resamples the blocks to the requested
//! number of buckets.

use std::time::Duration;

/// Frames folded into one block during decode.
const BLOCK_FRAMES: usize = 256;

/// Absolute peak per bucket, in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    peaks: Vec<f32>,
}

impl Waveform {
    pub fn from_peaks(peaks: Vec<f32>) -> Self {
        Self {
            peaks: peaks
                .into_iter()
                .map(|p| if p.is_finite() { p.abs().min(1.0) } else { 0.0 })
                .collect(),
        }
    }

    pub fn peaks(&self) -> &[f32] {
        &self.peaks
    }

    /// Max-resample the envelope to `width` columns for drawing.
    pub fn resample(&self, width: usize) -> Vec<f32> {
        max_resample(&self.peaks, width)
    }
}

pub(super) struct PeakAccumulator {
    channels: usize,
    sample_rate: u32,
    in_frame: usize,
    in_block: usize,
    block_max: f32,
    blocks: Vec<f32>,
    frames: u64,
}

impl PeakAccumulator {
    pub(super) fn new(channels: u16, sample_rate: u32) -> Self {
        Self {
            channels: usize::from(channels.max(1)),
            sample_rate,
            in_frame: 0,
            in_block: 0,
            block_max: 0.0,
            blocks: Vec::new(),
            frames: 0,
        }
    }

    pub(super) fn push(&mut self, sample: f32) {
        if sample.is_finite() {
            self.block_max = self.block_max.max(sample.abs());
        }
        self.in_frame += 1;
        if self.in_frame < self.channels {
            return;
        }

        self.in_frame = 0;
        self.frames += 1;
        self.in_block += 1;
        if self.in_block == BLOCK_FRAMES {
            self.flush_block();
        }
    }

    fn flush_block(&mut self) {
        self.blocks.push(self.block_max.min(1.0));
        self.block_max = 0.0;
        self.in_block = 0;
    }

    pub(super) fn frames(&self) -> u64 {
        self.frames
    }

    /// Duration covered by the complete frames seen so far.
    pub(super) fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        let nanos = u128::from(self.frames) * 1_000_000_000 / u128::from(self.sample_rate);
        Duration::from_nanos(nanos.min(u128::from(u64::MAX)) as u64)
    }

    pub(super) fn finish(mut self, buckets: usize) -> (Waveform, Duration) {
        if self.in_block > 0 {
            self.flush_block();
        }
        let duration = self.duration();
        (Waveform::from_peaks(max_resample(&self.blocks, buckets)), duration)
    }
}

/// Resample `values` to `width` entries, taking the max over each span.
/// Upsampling repeats the nearest source value.
pub(super) fn max_resample(values: &[f32], width: usize) -> Vec<f32> {
    if width == 0 {
        return Vec::new();
    }
    if values.is_empty() {
        return vec![0.0; width];
    }

    let n = values.len();
    (0..width)
        .map(|i| {
            let start = i * n / width;
            let end = ((i + 1) * n / width).max(start + 1).min(n);
            values[start..end].iter().copied().fold(0.0, f32::max)
        })
        .collect()
}
