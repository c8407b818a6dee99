use super::*;
use crate::audio::SignalTap;
use crate::config::SpectrumSettings;
use std::f32::consts::PI;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn settings(fft_size: usize, smoothing: f32) -> SpectrumSettings {
    SpectrumSettings {
        fft_size,
        smoothing,
        ..SpectrumSettings::default()
    }
}

/// Sine that completes exactly `bin` cycles over `n` samples.
fn sine_at_bin(bin: usize, n: usize) -> Vec<f32> {
    (0..n)
        .map(|i| (2.0 * PI * bin as f32 * i as f32 / n as f32).sin())
        .collect()
}

struct ConstantSource {
    value: u8,
    calls: AtomicUsize,
}

impl SignalSource for ConstantSource {
    fn current_frame(&self, out: &mut [u8]) {
        self.calls.fetch_add(1, Ordering::Relaxed);
        out.fill(self.value);
    }
}

fn constant(value: u8) -> Arc<ConstantSource> {
    Arc::new(ConstantSource {
        value,
        calls: AtomicUsize::new(0),
    })
}

#[test]
fn sampler_without_source_yields_zero_frame_of_requested_length() {
    let mut sampler = SpectrumSampler::new(64);
    assert!(!sampler.is_attached());

    let frame = sampler.sample();
    assert_eq!(frame.len(), 64);
    assert!(frame.is_silent());
}

#[test]
fn sampler_reads_attached_source_every_tick() {
    let source = constant(7);
    let mut sampler = SpectrumSampler::new(16);
    assert!(sampler.attach(source.clone()));

    assert!(sampler.sample().iter().all(|&a| a == 7));
    sampler.sample();
    assert_eq!(source.calls.load(Ordering::Relaxed), 2);
}

#[test]
fn attach_is_idempotent_and_binds_only_once() {
    let first = constant(1);
    let second = constant(2);
    let mut sampler = SpectrumSampler::new(8);

    assert!(sampler.attach(first.clone()));
    assert!(!sampler.attach(first.clone()));
    assert!(!sampler.attach(second));

    assert!(sampler.sample().iter().all(|&a| a == 1));
}

#[test]
fn sampler_reuses_its_frame_buffer() {
    let mut sampler = SpectrumSampler::new(32);
    sampler.attach(constant(3));

    let first = sampler.sample().as_ptr();
    let second = sampler.sample().as_ptr();
    assert_eq!(first, second);
}

#[test]
fn frame_stream_never_ends_or_changes_length() {
    let spectrum = SpectrumSettings::default();
    let len = spectrum.frame_len();
    let tap = Arc::new(SignalTap::new(&spectrum));
    let mut sampler = SpectrumSampler::new(len);
    let tone = sine_at_bin(8, spectrum.fft_size);

    for _ in 0..50 {
        let frame = sampler.sample();
        assert_eq!(frame.len(), len);
        assert!(frame.is_silent());
    }

    assert!(sampler.attach(tap.clone()));
    let mut heard = false;
    for round in 0..200 {
        match round % 50 {
            0 => tap.push(&tone),
            25 => tap.clear(),
            _ => {}
        }
        let frame = sampler.sample();
        assert_eq!(frame.len(), len);
        heard |= !frame.is_silent();
    }
    assert!(heard);

    // A second binding attempt leaves the stream running on the first tap.
    assert!(!sampler.attach(constant(9)));
    tap.clear();
    for _ in 0..50 {
        let frame = sampler.sample();
        assert_eq!(frame.len(), len);
        assert!(frame.is_silent());
    }
}

#[test]
fn analyser_reports_silence_as_zero() {
    let mut analyser = Analyser::new(&settings(256, 0.0));
    let mut out = [0xffu8; 128];
    analyser.analyse(&[0.0; 256], &mut out);
    assert!(out.iter().all(|&a| a == 0));
}

#[test]
fn analyser_peaks_at_the_sine_bin() {
    let mut analyser = Analyser::new(&settings(256, 0.0));
    assert_eq!(analyser.fft_size(), 256);
    assert_eq!(analyser.bin_count(), 128);

    let mut out = [0u8; 128];
    analyser.analyse(&sine_at_bin(16, 256), &mut out);

    assert_eq!(out[16], 255);
    assert!(out[60] < 10, "far bin leaked: {}", out[60]);
    assert!(out[100] < 10, "far bin leaked: {}", out[100]);
}

#[test]
fn analyser_zero_fills_slots_beyond_bin_count() {
    let mut analyser = Analyser::new(&settings(64, 0.0));
    let mut out = [9u8; 48];
    analyser.analyse(&sine_at_bin(4, 64), &mut out);
    assert!(out[32..].iter().all(|&a| a == 0));
    assert_eq!(out[4], 255);
}

#[test]
fn analyser_pads_short_input_and_keeps_tail_of_long_input() {
    let mut analyser = Analyser::new(&settings(64, 0.0));
    let mut out = [0u8; 32];

    analyser.analyse(&[0.0; 10], &mut out);
    assert!(out.iter().all(|&a| a == 0));

    // Loud garbage followed by exactly one window of silence.
    let mut long = vec![1.0f32; 100];
    long.extend(std::iter::repeat(0.0).take(64));
    analyser.analyse(&long, &mut out);
    assert!(out.iter().all(|&a| a == 0));
}

#[test]
fn smoothing_decays_and_reset_clears_history() {
    let mut analyser = Analyser::new(&settings(256, 0.5));
    let mut loud = [0u8; 128];
    analyser.analyse(&sine_at_bin(16, 256), &mut loud);

    let mut decaying = [0u8; 128];
    analyser.analyse(&[0.0; 256], &mut decaying);
    assert!(decaying[16] > 0);

    analyser.reset();
    let mut after_reset = [0u8; 128];
    analyser.analyse(&[0.0; 256], &mut after_reset);
    assert!(after_reset.iter().all(|&a| a == 0));
}
