use std::f32::consts::PI;
use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::config::SpectrumSettings;

/// Byte-valued magnitude spectrum in the style of a browser analyser node:
/// Blackman window, FFT, magnitude scaled by 1/N, exponential smoothing over
/// time, then `[min_db, max_db]` mapped linearly onto `0..=255`.
///
/// All buffers are allocated once in `new`.
pub struct Analyser {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    time: Vec<f32>,
    buffer: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    smoothed: Vec<f32>,
    min_db: f32,
    max_db: f32,
    smoothing: f32,
}

impl Analyser {
    pub fn new(settings: &SpectrumSettings) -> Self {
        let n = settings.fft_size.max(2);
        let fft = FftPlanner::<f32>::new().plan_fft_forward(n);
        let scratch_len = fft.get_inplace_scratch_len();

        Self {
            fft,
            window: blackman(n),
            time: vec![0.0; n],
            buffer: vec![Complex::new(0.0, 0.0); n],
            scratch: vec![Complex::new(0.0, 0.0); scratch_len],
            smoothed: vec![0.0; n / 2],
            min_db: settings.min_db,
            max_db: settings.max_db,
            smoothing: settings.smoothing.clamp(0.0, 0.999),
        }
    }

    pub fn fft_size(&self) -> usize {
        self.time.len()
    }

    pub fn bin_count(&self) -> usize {
        self.smoothed.len()
    }

    /// Copy the most recent samples into the time-domain buffer. Shorter
    /// input is zero-padded at the front; longer input keeps its tail.
    pub fn load(&mut self, samples: &[f32]) {
        let n = self.time.len();
        let take = samples.len().min(n);
        let pad = n - take;
        self.time[..pad].fill(0.0);
        self.time[pad..].copy_from_slice(&samples[samples.len() - take..]);
    }

    /// Transform the loaded samples and write one amplitude per bin into
    /// `out`. Slots past the bin count are zeroed.
    pub fn compute(&mut self, out: &mut [u8]) {
        for ((slot, &sample), &w) in self.buffer.iter_mut().zip(&self.time).zip(&self.window) {
            *slot = Complex::new(sample * w, 0.0);
        }
        self.fft
            .process_with_scratch(&mut self.buffer, &mut self.scratch);

        let scale = 1.0 / self.time.len() as f32;
        let range = self.max_db - self.min_db;
        let tau = self.smoothing;

        for (k, smoothed) in self.smoothed.iter_mut().enumerate() {
            let magnitude = self.buffer[k].norm() * scale;
            let next = tau * *smoothed + (1.0 - tau) * magnitude;
            *smoothed = if next.is_finite() { next } else { 0.0 };
        }

        for (i, slot) in out.iter_mut().enumerate() {
            *slot = match self.smoothed.get(i) {
                Some(&m) if m > 0.0 => {
                    let db = 20.0 * m.log10();
                    (255.0 * (db - self.min_db) / range).clamp(0.0, 255.0) as u8
                }
                _ => 0,
            };
        }
    }

    pub fn analyse(&mut self, samples: &[f32], out: &mut [u8]) {
        self.load(samples);
        self.compute(out);
    }

    /// Forget smoothing history.
    pub fn reset(&mut self) {
        self.smoothed.fill(0.0);
    }
}

fn blackman(n: usize) -> Vec<f32> {
    const A0: f32 = 0.42;
    const A1: f32 = 0.5;
    const A2: f32 = 0.08;
    (0..n)
        .map(|i| {
            let x = i as f32 / n as f32;
            A0 - A1 * (2.0 * PI * x).cos() + A2 * (4.0 * PI * x).cos()
        })
        .collect()
}
