//! Playback control: the track registry, the transport boundary and the
//! controller state machine that decides what plays next.
//!
//! The controller never decodes audio itself. It issues commands through a
//! [`Transport`] and reacts to the [`TransportEvent`]s the device reports back.

mod controller;
mod error;
mod registry;
mod transport;
mod types;

pub use controller::*;
pub use error::*;
pub use registry::*;
pub use transport::*;
pub use types::*;
