use std::ops::Deref;
use std::sync::Arc;

/// A live view of the audio currently reaching the output.
pub trait SignalSource: Send + Sync {
    /// Fill `out` with the latest byte amplitudes, one per frequency bin.
    /// Must write every slot, using 0 for silence.
    fn current_frame(&self, out: &mut [u8]);
}

/// One fixed-length spectrum snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    amplitudes: Box<[u8]>,
}

impl Frame {
    pub fn silent(len: usize) -> Self {
        Self {
            amplitudes: vec![0; len].into_boxed_slice(),
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.amplitudes
    }

    pub fn is_silent(&self) -> bool {
        self.amplitudes.iter().all(|&a| a == 0)
    }
}

impl Deref for Frame {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.amplitudes
    }
}

/// Pulls one frame per redraw tick from an attached signal source.
///
/// Successive [`sample`](Self::sample) calls form a lazy, infinite,
/// restart-free sequence of frames: nothing is computed until a frame is
/// asked for, the sequence never ends, and attaching a source or the source
/// going silent does not reset it. Every frame is [`frame_len`](Self::frame_len)
/// long. The frame buffer is allocated once and overwritten in place, so a
/// caller holds at most one frame at a time. Without a source every sample is
/// an all-zero frame.
pub struct SpectrumSampler {
    source: Option<Arc<dyn SignalSource>>,
    frame: Frame,
}

impl SpectrumSampler {
    pub fn new(frame_len: usize) -> Self {
        Self {
            source: None,
            frame: Frame::silent(frame_len),
        }
    }

    /// Bind to `source`. Binding happens once: re-attaching the same source
    /// is a no-op and a different one is ignored. Returns `true` only when a
    /// new binding was made.
    pub fn attach(&mut self, source: Arc<dyn SignalSource>) -> bool {
        match &self.source {
            Some(existing) if std::ptr::addr_eq(Arc::as_ptr(existing), Arc::as_ptr(&source)) => {
                false
            }
            Some(_) => {
                tracing::warn!("spectrum sampler already attached; ignoring new signal source");
                false
            }
            None => {
                self.source = Some(source);
                tracing::debug!(frame_len = self.frame.len(), "spectrum sampler attached");
                true
            }
        }
    }

    pub fn is_attached(&self) -> bool {
        self.source.is_some()
    }

    pub fn frame_len(&self) -> usize {
        self.frame.len()
    }

    /// Refresh and return the next frame of the sequence.
    pub fn sample(&mut self) -> &Frame {
        match &self.source {
            Some(source) => source.current_frame(&mut self.frame.amplitudes),
            None => self.frame.amplitudes.fill(0),
        }
        &self.frame
    }
}
