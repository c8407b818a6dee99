use crate::library::Track;

use super::error::{PlaybackError, Result};

/// Ordered play queue. Appending never moves existing tracks.
#[derive(Debug, Clone, Default)]
pub struct TrackRegistry {
    tracks: Vec<Track>,
}

impl TrackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `tracks` in order. Returns whether the queue was empty before.
    pub fn append(&mut self, tracks: impl IntoIterator<Item = Track>) -> bool {
        let was_empty = self.tracks.is_empty();
        self.tracks.extend(tracks);
        was_empty
    }

    pub fn get(&self, index: usize) -> Result<&Track> {
        self.tracks.get(index).ok_or(PlaybackError::OutOfRange {
            index,
            len: self.tracks.len(),
        })
    }

    /// Remove the track at `index`; later tracks shift down by one.
    pub fn remove(&mut self, index: usize) -> Result<Track> {
        if index >= self.tracks.len() {
            return Err(PlaybackError::OutOfRange {
                index,
                len: self.tracks.len(),
            });
        }
        Ok(self.tracks.remove(index))
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn as_slice(&self) -> &[Track] {
        &self.tracks
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }
}
