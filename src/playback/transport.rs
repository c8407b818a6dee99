//! The boundary between the controller and whatever decodes and outputs audio.

use std::path::Path;

use super::error::TransportError;
use super::types::Generation;

/// Commands the controller issues to the output device.
///
/// Every method returns as soon as the command is handed off; results come
/// back later as [`TransportEvent`]s. An `Err` means the command never reached
/// the device.
pub trait Transport {
    /// Discard any loaded source and load `locator`, tagging every later
    /// notification about it with `generation`.
    fn load(&mut self, generation: Generation, locator: &Path) -> Result<(), TransportError>;
    fn play(&mut self) -> Result<(), TransportError>;
    fn pause(&mut self) -> Result<(), TransportError>;
    fn seek(&mut self, seconds: f64) -> Result<(), TransportError>;
    fn set_volume(&mut self, volume: f32) -> Result<(), TransportError>;
}

/// Asynchronous notifications from the output device.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    /// The source is decoded and ready; `duration` is 0 when unknown.
    Ready {
        generation: Generation,
        duration: f64,
        position: f64,
    },
    Progress {
        generation: Generation,
        position: f64,
    },
    /// The source played to its end.
    Ended { generation: Generation },
    /// The device could not load or start the source.
    Error {
        generation: Generation,
        cause: String,
    },
}

impl TransportEvent {
    pub fn generation(&self) -> Generation {
        match self {
            Self::Ready { generation, .. }
            | Self::Progress { generation, .. }
            | Self::Ended { generation }
            | Self::Error { generation, .. } => *generation,
        }
    }
}
