//! Library ingestion: turns user-supplied paths into queue-ready `Track`s.

mod ingest;
mod model;

pub use ingest::*;
pub use model::*;
