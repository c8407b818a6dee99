//! The live signal tap: a `Source` wrapper that copies what is being played
//! into a bounded ring, and the reader side that turns the ring into spectrum
//! frames.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use rodio::Source;

use crate::config::SpectrumSettings;
use crate::spectrum::{Analyser, SignalSource};

/// Mono samples are pushed in batches of this many.
const BATCH_LEN: usize = 512;

/// With no fresh samples for this long the output is treated as silent
/// (paused, stopped or between tracks).
const STALE_AFTER: Duration = Duration::from_millis(250);

struct SampleRing {
    samples: VecDeque<f32>,
    capacity: usize,
    last_write: Option<Instant>,
}

impl SampleRing {
    fn push(&mut self, batch: &[f32]) {
        for &s in batch {
            if self.samples.len() == self.capacity {
                self.samples.pop_front();
            }
            self.samples.push_back(s);
        }
        self.last_write = Some(Instant::now());
    }

    fn is_stale(&self) -> bool {
        self.last_write.is_none_or(|t| t.elapsed() > STALE_AFTER)
    }
}

/// Shared between the audio side (writer) and the spectrum sampler (reader).
pub struct SignalTap {
    ring: Mutex<SampleRing>,
    analyser: Mutex<Analyser>,
}

impl SignalTap {
    pub fn new(settings: &SpectrumSettings) -> Self {
        let analyser = Analyser::new(settings);
        let capacity = analyser.fft_size() * 2;
        Self {
            ring: Mutex::new(SampleRing {
                samples: VecDeque::with_capacity(capacity),
                capacity,
                last_write: None,
            }),
            analyser: Mutex::new(analyser),
        }
    }

    /// Append mono samples. Never blocks: if the reader holds the ring the
    /// batch is dropped.
    pub fn push(&self, batch: &[f32]) {
        if let Ok(mut ring) = self.ring.try_lock() {
            ring.push(batch);
        }
    }

    /// Drop buffered samples so the next frame reads as silence.
    pub fn clear(&self) {
        if let Ok(mut ring) = self.ring.lock() {
            ring.samples.clear();
            ring.last_write = None;
        }
    }
}

impl SignalSource for SignalTap {
    fn current_frame(&self, out: &mut [u8]) {
        let Ok(mut analyser) = self.analyser.lock() else {
            out.fill(0);
            return;
        };
        {
            let Ok(mut ring) = self.ring.lock() else {
                out.fill(0);
                return;
            };
            if ring.is_stale() {
                drop(ring);
                analyser.reset();
                out.fill(0);
                return;
            }
            analyser.load(ring.samples.make_contiguous());
        }
        analyser.compute(out);
    }
}

/// Wraps a source and mirrors a mono downmix of it into a [`SignalTap`].
pub struct TapSource<S> {
    inner: S,
    tap: Arc<SignalTap>,
    frame_sum: f32,
    frame_pos: u16,
    batch: Vec<f32>,
}

impl<S: Source> TapSource<S> {
    pub fn new(inner: S, tap: Arc<SignalTap>) -> Self {
        Self {
            inner,
            tap,
            frame_sum: 0.0,
            frame_pos: 0,
            batch: Vec::with_capacity(BATCH_LEN),
        }
    }
}

impl<S: Source> Iterator for TapSource<S> {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        let Some(sample) = self.inner.next() else {
            // Short tracks and the tail of long ones still reach the tap.
            if !self.batch.is_empty() {
                self.tap.push(&self.batch);
                self.batch.clear();
            }
            return None;
        };

        self.frame_sum += sample;
        self.frame_pos += 1;
        let channels = self.inner.channels().max(1);
        if self.frame_pos >= channels {
            self.batch.push(self.frame_sum / f32::from(self.frame_pos));
            self.frame_sum = 0.0;
            self.frame_pos = 0;
            if self.batch.len() >= BATCH_LEN {
                self.tap.push(&self.batch);
                self.batch.clear();
            }
        }

        Some(sample)
    }
}

impl<S: Source> Source for TapSource<S> {
    fn current_span_len(&self) -> Option<usize> {
        self.inner.current_span_len()
    }

    fn channels(&self) -> u16 {
        self.inner.channels()
    }

    fn sample_rate(&self) -> u32 {
        self.inner.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        self.inner.total_duration()
    }

    fn try_seek(&mut self, pos: Duration) -> Result<(), rodio::source::SeekError> {
        self.batch.clear();
        self.frame_sum = 0.0;
        self.frame_pos = 0;
        self.inner.try_seek(pos)
    }
}
