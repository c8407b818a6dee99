//! Audio-related small types and handles.

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use crate::playback::Generation;

use super::tap::SignalTap;

#[derive(Debug)]
pub enum AudioCmd {
    /// Replace the current source with the file at `path`, left paused.
    Load { generation: Generation, path: PathBuf },
    /// Start or resume the loaded source.
    Play,
    /// Pause the loaded source.
    Pause,
    /// Jump to an absolute position in the loaded source.
    Seek(Duration),
    /// Output volume in `[0, 1]`.
    SetVolume(f32),
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

/// Slot for the one signal tap of an output device; filled on first request.
pub type TapSlot = Arc<OnceLock<Arc<SignalTap>>>;
