//! The playback controller: owns the transport state and the next-track policy.
//!
//! All mutation happens through `&mut self`, so commands and device
//! notifications are serialized by whoever owns the controller (the runtime
//! event loop). The only ordering guard is the load generation: every `load`
//! bumps it, and notifications carrying an older generation are dropped.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::library::Track;

use super::error::{PlaybackError, Result, TransportError};
use super::registry::TrackRegistry;
use super::transport::{Transport, TransportEvent};
use super::types::{
    Generation, PlaybackOptions, PlayerSnapshot, RepeatMode, SourceStatus, TransportState,
};

/// Outcome of the next-track decision.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Advance {
    Play(usize),
    Stop,
}

pub struct PlaybackController<T: Transport> {
    registry: TrackRegistry,
    transport: T,
    state: TransportState,
    generation: Generation,
    source: SourceStatus,
    last_nonzero_volume: f32,
    last_error: Option<String>,
    auto_cue: bool,
    rng: StdRng,
}

impl<T: Transport> PlaybackController<T> {
    pub fn new(transport: T, options: PlaybackOptions) -> Self {
        Self::with_rng(transport, options, StdRng::from_entropy())
    }

    /// Like [`PlaybackController::new`] with a caller-provided shuffle RNG.
    pub fn with_rng(transport: T, options: PlaybackOptions, rng: StdRng) -> Self {
        let state = TransportState {
            repeat_mode: options.repeat_mode,
            is_shuffle: options.shuffle,
            ..TransportState::default()
        };
        Self {
            registry: TrackRegistry::new(),
            transport,
            last_nonzero_volume: state.volume,
            state,
            generation: 0,
            source: SourceStatus::Empty,
            last_error: None,
            auto_cue: options.auto_cue,
            rng,
        }
    }

    pub fn state(&self) -> &TransportState {
        &self.state
    }

    pub fn tracks(&self) -> &[Track] {
        self.registry.as_slice()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn source_status(&self) -> SourceStatus {
        self.source
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.state
            .current_index
            .and_then(|i| self.registry.get(i).ok())
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            state: self.state.clone(),
            track: self.current_track().cloned(),
            queue_len: self.registry.len(),
            last_error: self.last_error.clone(),
        }
    }

    /// Append tracks to the queue. When the queue was empty and nothing is
    /// selected, the first track is cued (loaded but paused) if enabled.
    pub fn append_tracks(&mut self, tracks: Vec<Track>) -> Result<()> {
        let added = tracks.len();
        if added == 0 {
            return Ok(());
        }
        let was_empty = self.registry.append(tracks);
        tracing::info!(added, total = self.registry.len(), "appended tracks");

        if was_empty && self.auto_cue && self.state.current_index.is_none() {
            return self.load_index(0, false);
        }
        Ok(())
    }

    /// Remove a track from the queue without leaving the current index dangling.
    pub fn remove_track(&mut self, index: usize) -> Result<Track> {
        let removed = self.registry.remove(index)?;
        match self.state.current_index {
            Some(current) if current == index => {
                self.unload();
                if let Err(e) = self.transport.pause() {
                    tracing::warn!(error = %e, "failed to pause after removing current track");
                }
            }
            Some(current) if current > index => {
                self.state.current_index = Some(current - 1);
            }
            _ => {}
        }
        tracing::info!(index, id = %removed.id, "removed track");
        Ok(removed)
    }

    /// Load the track at `index` and start playing it from the beginning.
    pub fn select_and_play(&mut self, index: usize) -> Result<()> {
        self.load_index(index, true)
    }

    pub fn toggle_play_pause(&mut self) -> Result<()> {
        if self.registry.is_empty() {
            tracing::debug!("play/pause ignored: queue is empty");
            return Ok(());
        }
        let Some(index) = self.state.current_index else {
            return self.select_and_play(0);
        };
        if matches!(self.source, SourceStatus::Empty | SourceStatus::Failed) {
            // Nothing usable is loaded; retrying means reloading.
            return self.select_and_play(index);
        }

        if self.state.is_playing {
            self.state.is_playing = false;
            let sent = self.transport.pause();
            self.check(sent)
        } else {
            self.state.is_playing = true;
            self.last_error = None;
            let sent = self.transport.play();
            self.check(sent)
        }
    }

    /// Start or resume; no-op while already playing.
    pub fn play(&mut self) -> Result<()> {
        if self.state.is_playing {
            return Ok(());
        }
        self.toggle_play_pause()
    }

    /// Pause; no-op unless playing.
    pub fn pause(&mut self) -> Result<()> {
        if !self.state.is_playing {
            return Ok(());
        }
        self.toggle_play_pause()
    }

    /// Advance according to repeat/shuffle policy. Also the only handler for
    /// the device's `Ended` notification, so a manual skip and a natural end
    /// of track behave identically.
    pub fn play_next(&mut self) -> Result<()> {
        if self.registry.is_empty() {
            tracing::debug!("next ignored: queue is empty");
            return Ok(());
        }
        match self.next_advance() {
            Advance::Play(index) => self.select_and_play(index),
            Advance::Stop => {
                tracing::info!("reached end of queue");
                self.unload();
                Ok(())
            }
        }
    }

    /// Step back one track, always wrapping regardless of repeat mode.
    pub fn play_previous(&mut self) -> Result<()> {
        let len = self.registry.len();
        let Some(current) = self.state.current_index.filter(|_| len > 0) else {
            tracing::debug!("previous ignored: nothing selected");
            return Ok(());
        };
        self.select_and_play((current + len - 1) % len)
    }

    /// Seek within the current track, clamped into `[0, duration]`.
    pub fn seek(&mut self, seconds: f64) -> Result<()> {
        if self.state.current_index.is_none() {
            tracing::debug!("seek ignored: nothing selected");
            return Ok(());
        }
        let target = self.clamp_position(seconds);
        self.state.position = target;
        let sent = self.transport.seek(target);
        self.check(sent)
    }

    /// Seek relative to the current position.
    pub fn seek_by(&mut self, delta_seconds: f64) -> Result<()> {
        self.seek(self.state.position + delta_seconds)
    }

    /// Set the volume. Exactly 0 mutes; anything above unmutes and becomes the
    /// volume restored by the next unmute.
    pub fn set_volume(&mut self, volume: f32) -> Result<()> {
        let volume = if volume.is_nan() {
            0.0
        } else {
            volume.clamp(0.0, 1.0)
        };
        self.state.volume = volume;
        if volume == 0.0 {
            self.state.is_muted = true;
        } else {
            self.last_nonzero_volume = volume;
            self.state.is_muted = false;
        }
        self.apply_volume()
    }

    pub fn step_volume(&mut self, delta: f32) -> Result<()> {
        self.set_volume(self.state.volume + delta)
    }

    pub fn toggle_mute(&mut self) -> Result<()> {
        if self.state.is_muted {
            self.state.is_muted = false;
            if self.state.volume == 0.0 {
                self.state.volume = self.last_nonzero_volume;
            }
        } else {
            self.state.is_muted = true;
        }
        self.apply_volume()
    }

    pub fn cycle_repeat_mode(&mut self) -> RepeatMode {
        self.state.repeat_mode = self.state.repeat_mode.cycle();
        tracing::debug!(mode = ?self.state.repeat_mode, "repeat mode changed");
        self.state.repeat_mode
    }

    pub fn toggle_shuffle(&mut self) -> bool {
        self.state.is_shuffle = !self.state.is_shuffle;
        tracing::debug!(shuffle = self.state.is_shuffle, "shuffle toggled");
        self.state.is_shuffle
    }

    /// Apply a device notification. Notifications from a superseded load are
    /// discarded.
    pub fn handle_event(&mut self, event: TransportEvent) -> Result<()> {
        let generation = event.generation();
        if generation != self.generation {
            tracing::debug!(
                generation,
                current = self.generation,
                "dropping stale transport event"
            );
            return Ok(());
        }

        match event {
            TransportEvent::Ready {
                duration, position, ..
            } => {
                self.source = SourceStatus::Ready;
                self.state.duration = if duration.is_finite() {
                    duration.max(0.0)
                } else {
                    0.0
                };
                self.state.position = self.clamp_position(position);
                Ok(())
            }
            TransportEvent::Progress { position, .. } => {
                if self.state.current_index.is_some() {
                    self.state.position = self.clamp_position(position);
                }
                Ok(())
            }
            TransportEvent::Ended { .. } => self.play_next(),
            TransportEvent::Error { cause, .. } => {
                self.fail(cause);
                Ok(())
            }
        }
    }

    fn next_advance(&mut self) -> Advance {
        let len = self.registry.len();
        if let (RepeatMode::One, Some(current)) = (self.state.repeat_mode, self.state.current_index)
        {
            return Advance::Play(current);
        }
        if self.state.is_shuffle {
            // Uniform pick; the same track may come up again.
            return Advance::Play(self.rng.gen_range(0..len));
        }
        let next = self.state.current_index.map_or(0, |i| i + 1);
        if next < len {
            Advance::Play(next)
        } else if self.state.repeat_mode == RepeatMode::All {
            Advance::Play(0)
        } else {
            Advance::Stop
        }
    }

    fn load_index(&mut self, index: usize, play: bool) -> Result<()> {
        let locator = self.registry.get(index)?.locator.clone();

        self.generation = self.generation.wrapping_add(1);
        self.source = SourceStatus::Loading;
        self.last_error = None;
        self.state.current_index = Some(index);
        self.state.is_playing = play;
        self.state.position = 0.0;
        self.state.duration = 0.0;
        tracing::info!(index, generation = self.generation, play, "loading track");

        let mut sent = self.transport.load(self.generation, &locator);
        if play {
            sent = sent.and_then(|()| self.transport.play());
        }
        self.check(sent)
    }

    /// Forget the current track. Bumps the generation so late notifications
    /// about it are dropped.
    fn unload(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.source = SourceStatus::Empty;
        self.state.current_index = None;
        self.state.is_playing = false;
        self.state.position = 0.0;
        self.state.duration = 0.0;
    }

    fn apply_volume(&mut self) -> Result<()> {
        let sent = self.transport.set_volume(self.state.effective_volume());
        self.check(sent)
    }

    fn check(&mut self, sent: std::result::Result<(), TransportError>) -> Result<()> {
        sent.map_err(|e| self.fail(e.to_string()))
    }

    /// Stop without losing the selection so the user can retry.
    fn fail(&mut self, cause: String) -> PlaybackError {
        tracing::warn!(%cause, index = ?self.state.current_index, "playback error");
        self.state.is_playing = false;
        if self.state.current_index.is_some() {
            self.source = SourceStatus::Failed;
        }
        self.last_error = Some(cause.clone());
        PlaybackError::Playback(cause)
    }

    fn clamp_position(&self, seconds: f64) -> f64 {
        let lower = if seconds.is_finite() {
            seconds.max(0.0)
        } else {
            0.0
        };
        if self.state.duration_known() {
            lower.min(self.state.duration)
        } else {
            lower
        }
    }
}
