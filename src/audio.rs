//! rodio-backed output device.
//!
//! [`AudioPlayer`] implements the playback [`Transport`](crate::playback::Transport)
//! by forwarding commands to a dedicated audio thread, which owns the output
//! stream and reports back through [`TransportEvent`](crate::playback::TransportEvent)s.
//! The same thread feeds the lazily created [`SignalTap`].

mod player;
mod sink;
mod tap;
mod thread;
mod types;

pub use player::*;
pub use tap::*;
pub use types::*;
