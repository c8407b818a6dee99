use std::path::PathBuf;
use std::sync::Arc;

use crate::audio::AudioPlayer;
use crate::config;
use crate::library::ingest;
use crate::playback::{PlaybackController, PlaybackOptions, RepeatMode};
use crate::spectrum::{SignalSource, SpectrumSampler};

use super::Controller;

pub fn playback_options(settings: &config::Settings) -> PlaybackOptions {
    PlaybackOptions {
        repeat_mode: match settings.playback.repeat_mode {
            config::RepeatModeSetting::Off => RepeatMode::Off,
            config::RepeatModeSetting::All => RepeatMode::All,
            config::RepeatModeSetting::One => RepeatMode::One,
        },
        shuffle: settings.playback.shuffle,
        auto_cue: settings.playback.auto_cue,
    }
}

/// Wire the output device, the spectrum and the initial queue together.
///
/// The tap is created before the first track is queued so every load is
/// mirrored into it.
pub fn build_controller(
    audio_player: AudioPlayer,
    settings: &config::Settings,
    paths: &[PathBuf],
    sampler: &mut SpectrumSampler,
) -> Controller {
    let tap: Arc<dyn SignalSource> = audio_player.create_tap();
    sampler.attach(tap);

    let mut controller = PlaybackController::new(audio_player, playback_options(settings));
    if let Err(e) = controller.set_volume(settings.playback.volume) {
        tracing::warn!(error = %e, "failed to apply initial volume");
    }

    let tracks = ingest(paths, &settings.library);
    if tracks.is_empty() {
        tracing::warn!(?paths, "no playable files found");
    }
    if let Err(e) = controller.append_tracks(tracks) {
        tracing::warn!(error = %e, "failed to cue first track");
    }
    controller
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playback_options_follow_settings() {
        let mut settings = config::Settings::default();
        settings.playback.repeat_mode = config::RepeatModeSetting::One;
        settings.playback.shuffle = true;
        settings.playback.auto_cue = false;

        let options = playback_options(&settings);
        assert_eq!(options.repeat_mode, RepeatMode::One);
        assert!(options.shuffle);
        assert!(!options.auto_cue);
    }

    #[test]
    fn default_settings_give_default_options() {
        let options = playback_options(&config::Settings::default());
        assert_eq!(options.repeat_mode, RepeatMode::Off);
        assert!(!options.shuffle);
        assert!(options.auto_cue);
    }
}
