//! Transport state and the small value types around it.

use crate::library::Track;

/// Identifies one `load` issued to the transport.
pub type Generation = u64;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RepeatMode {
    /// Stop after the last track of the queue.
    #[default]
    Off,
    /// Wrap around to the start of the queue.
    All,
    /// Repeat the current track when it ends.
    One,
}

impl RepeatMode {
    /// `Off -> All -> One -> Off`.
    pub fn cycle(self) -> Self {
        match self {
            Self::Off => Self::All,
            Self::All => Self::One,
            Self::One => Self::Off,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::All => "All",
            Self::One => "One",
        }
    }
}

/// Everything the controller knows about the transport. Owned by the
/// controller; the presentation layer only ever sees copies.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportState {
    pub current_index: Option<usize>,
    pub is_playing: bool,
    /// Seconds into the current track.
    pub position: f64,
    /// Seconds; 0 until the device reports it.
    pub duration: f64,
    /// Slider volume in `[0.0, 1.0]`, kept while muted.
    pub volume: f32,
    pub is_muted: bool,
    pub repeat_mode: RepeatMode,
    pub is_shuffle: bool,
}

impl Default for TransportState {
    fn default() -> Self {
        Self {
            current_index: None,
            is_playing: false,
            position: 0.0,
            duration: 0.0,
            volume: 1.0,
            is_muted: false,
            repeat_mode: RepeatMode::Off,
            is_shuffle: false,
        }
    }
}

impl TransportState {
    /// Volume actually sent to the device.
    pub fn effective_volume(&self) -> f32 {
        if self.is_muted { 0.0 } else { self.volume }
    }

    pub fn duration_known(&self) -> bool {
        self.duration > 0.0
    }
}

/// Lifecycle of the source behind the current generation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum SourceStatus {
    #[default]
    Empty,
    Loading,
    Ready,
    Failed,
}

/// Initial policy knobs for a new controller.
#[derive(Debug, Clone, Copy)]
pub struct PlaybackOptions {
    pub repeat_mode: RepeatMode,
    pub shuffle: bool,
    /// Select and load (but do not start) the first track when tracks are
    /// appended to an empty queue.
    pub auto_cue: bool,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            repeat_mode: RepeatMode::Off,
            shuffle: false,
            auto_cue: true,
        }
    }
}

/// Read-only view handed to the presentation layer once per redraw.
#[derive(Debug, Clone)]
pub struct PlayerSnapshot {
    pub state: TransportState,
    pub track: Option<Track>,
    pub queue_len: usize,
    pub last_error: Option<String>,
}
