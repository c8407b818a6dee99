//! Frequency-domain visualization feed.
//!
//! [`SpectrumSampler`] is polled once per redraw and hands out a fixed-size
//! [`Frame`] of byte amplitudes read from whatever [`SignalSource`] it was
//! attached to. Repeated polls are an endless frame stream that survives
//! attaching and silence. [`Analyser`] turns raw samples into those amplitudes.

mod analyser;
mod sampler;

pub use analyser::*;
pub use sampler::*;

#[cfg(test)]
mod tests;
