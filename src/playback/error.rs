use thiserror::Error;

/// Errors surfaced by the playback controller.
///
/// Neither variant is fatal: the controller is always left in a state from
/// which the user can continue.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlaybackError {
    /// An index outside the queue was requested. State is unchanged.
    #[error("track index {index} is out of range for a queue of {len}")]
    OutOfRange { index: usize, len: usize },

    /// The device failed to start or resume playback.
    #[error("playback failed: {0}")]
    Playback(String),
}

/// A command could not be delivered to the output device.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("audio thread is not running")]
    Disconnected,
}

pub type Result<T> = std::result::Result<T, PlaybackError>;
