use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::Track;

/// Placeholder artist; tags are not read.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

static NEXT_SEQUENCE: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} is not an audio file")]
    NotAudio(PathBuf),
}

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Build an id from the file name, its byte size, the creation instant and a
/// process-wide sequence number.
fn make_id(name: &str, size: u64) -> String {
    let created = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let seq = NEXT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{name}-{size}-{created}-{seq}")
}

/// Turn a single audio file into a `Track`.
pub fn track_from_path(path: &Path, settings: &LibrarySettings) -> Result<Track, IngestError> {
    if !is_audio_file(path, settings) {
        return Err(IngestError::NotAudio(path.to_path_buf()));
    }
    let meta = std::fs::metadata(path).map_err(|source| IngestError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN");
    let title = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN")
        .to_string();

    Ok(Track {
        id: make_id(name, meta.len()),
        locator: path.to_path_buf(),
        title,
        artist: UNKNOWN_ARTIST.to_string(),
    })
}

/// Collect audio tracks under `dir`, sorted case-insensitively by title.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<Track> {
    let mut tracks: Vec<Track> = Vec::new();

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        let path = entry.path();
        if !path.is_file()
            || (!settings.include_hidden && is_hidden(path))
            || !is_audio_file(path, settings)
        {
            continue;
        }
        match track_from_path(path, settings) {
            Ok(track) => tracks.push(track),
            Err(e) => tracing::warn!(error = %e, "skipping file"),
        }
    }

    tracks.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));
    tracks
}

/// Ingest every path given by the user. Directories are scanned; files are
/// taken as-is when they look like audio. The combined result is sorted
/// case-insensitively by title.
pub fn ingest(paths: &[PathBuf], settings: &LibrarySettings) -> Vec<Track> {
    let mut tracks = Vec::new();
    for path in paths {
        if path.is_dir() {
            tracks.extend(scan(path, settings));
        } else {
            match track_from_path(path, settings) {
                Ok(track) => tracks.push(track),
                Err(e) => tracing::warn!(error = %e, "skipping input"),
            }
        }
    }
    tracks.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));
    tracing::info!(count = tracks.len(), inputs = paths.len(), "ingested tracks");
    tracks
}
