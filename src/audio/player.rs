use std::path::Path;
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex, OnceLock};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::config::{AudioSettings, SpectrumSettings};
use crate::playback::{Generation, Transport, TransportError, TransportEvent};

use super::tap::SignalTap;
use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, TapSlot};

/// Handle to the audio thread. Dropping it without `quit_softly` leaves the
/// thread to exit once the command channel disconnects.
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    tap: TapSlot,
    spectrum: SpectrumSettings,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    /// Spawn the audio thread. Device notifications are delivered on `events`.
    pub fn new(
        events: Sender<TransportEvent>,
        audio_settings: AudioSettings,
        spectrum: SpectrumSettings,
    ) -> Self {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let tap: TapSlot = Arc::new(OnceLock::new());

        let audio_handle = spawn_audio_thread(rx, events, tap.clone(), audio_settings);

        Self {
            tx,
            tap,
            spectrum,
            join: Mutex::new(Some(audio_handle)),
        }
    }

    /// The output device's signal tap, created on first call. Every later
    /// call returns the same tap.
    pub fn create_tap(&self) -> Arc<SignalTap> {
        self.tap
            .get_or_init(|| {
                tracing::debug!(fft_size = self.spectrum.fft_size, "creating signal tap");
                Arc::new(SignalTap::new(&self.spectrum))
            })
            .clone()
    }

    pub fn send(&self, cmd: AudioCmd) -> Result<(), TransportError> {
        self.tx.send(cmd).map_err(|_| TransportError::Disconnected)
    }

    pub fn quit_softly(&self, fade_out: Duration) {
        let _ = self.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl Transport for AudioPlayer {
    fn load(&mut self, generation: Generation, locator: &Path) -> Result<(), TransportError> {
        self.send(AudioCmd::Load {
            generation,
            path: locator.to_path_buf(),
        })
    }

    fn play(&mut self) -> Result<(), TransportError> {
        self.send(AudioCmd::Play)
    }

    fn pause(&mut self) -> Result<(), TransportError> {
        self.send(AudioCmd::Pause)
    }

    fn seek(&mut self, seconds: f64) -> Result<(), TransportError> {
        let position = Duration::try_from_secs_f64(seconds.max(0.0)).unwrap_or(Duration::ZERO);
        self.send(AudioCmd::Seek(position))
    }

    fn set_volume(&mut self, volume: f32) -> Result<(), TransportError> {
        self.send(AudioCmd::SetVolume(volume))
    }
}
