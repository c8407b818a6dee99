use std::env;
use std::path::PathBuf;
use std::sync::mpsc;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::AudioPlayer;
use crate::mpris::ControlCmd;
use crate::playback::{PlaybackController, TransportEvent};
use crate::spectrum::SpectrumSampler;

mod event_loop;
mod mpris_sync;
mod settings;
mod startup;

/// The controller as wired in the binary: driving the rodio audio thread.
pub type Controller = PlaybackController<AudioPlayer>;

/// Paths from the command line, or the current directory when none are given.
fn input_paths() -> Vec<PathBuf> {
    let paths: Vec<PathBuf> = env::args_os().skip(1).map(PathBuf::from).collect();
    if !paths.is_empty() {
        return paths;
    }
    vec![env::current_dir().unwrap_or_else(|_| PathBuf::from("."))]
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let _log_guard = crate::logging::init();
    let settings = settings::load_settings();
    let paths = input_paths();

    let (events_tx, events_rx) = mpsc::channel::<TransportEvent>();
    let audio_player = AudioPlayer::new(
        events_tx,
        settings.audio.clone(),
        settings.spectrum.clone(),
    );
    let mut sampler = SpectrumSampler::new(settings.spectrum.frame_len());
    let mut controller = startup::build_controller(audio_player, &settings, &paths, &mut sampler);
    let mut app = App::new(settings.ui.follow_playback);

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(
        &mut terminal,
        &mut app,
        event_loop::EventLoop {
            settings: &settings,
            controller: &mut controller,
            sampler: &mut sampler,
            mpris: &mpris,
            events_rx: &events_rx,
            control_rx: &control_rx,
        },
    );

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &run_result {
        tracing::error!(error = %e, "event loop failed");
    }
    run_result
}
