//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the cursor and the
//! transient status notice; playback state is read from controller snapshots.

mod model;

pub use model::*;
