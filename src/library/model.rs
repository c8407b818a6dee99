use std::path::PathBuf;

/// One playable item. Immutable once ingested.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Track {
    /// Unique per ingestion: name, byte size, creation time and a sequence number.
    pub id: String,
    /// Path handed to the output device.
    pub locator: PathBuf,
    pub title: String,
    pub artist: String,
}

impl Track {
    /// `Artist - Title`, or just the title when the artist is blank.
    pub fn display(&self) -> String {
        let artist = self.artist.trim();
        if artist.is_empty() {
            self.title.clone()
        } else {
            format!("{} - {}", artist, self.title)
        }
    }
}
