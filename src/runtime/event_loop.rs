use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::config;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::playback::{self, TransportEvent};
use crate::runtime::Controller;
use crate::runtime::mpris_sync::MprisSync;
use crate::spectrum::SpectrumSampler;
use crate::ui;

/// Everything the event loop reads from or drives.
pub struct EventLoop<'a> {
    pub settings: &'a config::Settings,
    pub controller: &'a mut Controller,
    pub sampler: &'a mut SpectrumSampler,
    pub mpris: &'a MprisHandle,
    pub events_rx: &'a mpsc::Receiver<TransportEvent>,
    pub control_rx: &'a mpsc::Receiver<ControlCmd>,
}

/// Main terminal event loop: drains device notifications and media-key
/// commands, redraws, then waits for a key press for at most one redraw
/// interval. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
    ctx: EventLoop<'_>,
) -> Result<(), Box<dyn std::error::Error>> {
    let EventLoop {
        settings,
        controller,
        sampler,
        mpris,
        events_rx,
        control_rx,
    } = ctx;
    let redraw = Duration::from_millis(settings.ui.redraw_interval_ms.max(1));
    let mut mpris_sync = MprisSync::default();

    loop {
        // Device notifications first, so commands below see fresh state.
        while let Ok(event) = events_rx.try_recv() {
            report(app, controller.handle_event(event));
        }

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, settings, app, controller) {
                return Ok(());
            }
        }

        let snapshot = controller.snapshot();
        app.sync_with_playback(snapshot.state.current_index, snapshot.queue_len);
        mpris_sync.update(mpris, &snapshot);

        let spectrum = sampler.sample();
        let tracks = controller.tracks();
        terminal.draw(|f| {
            ui::draw(
                f,
                app,
                tracks,
                &snapshot,
                spectrum,
                &settings.ui,
                &settings.controls,
            )
        })?;

        if event::poll(redraw)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, controller) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Surface a rejected command in the status bar. Playback failures are
/// already logged and shown by the controller itself.
fn report(app: &mut App, result: playback::Result<()>) {
    match result {
        Ok(()) => {}
        Err(e @ playback::PlaybackError::OutOfRange { .. }) => {
            tracing::debug!(error = %e, "command rejected");
            app.set_notice(e.to_string());
        }
        Err(playback::PlaybackError::Playback(_)) => {}
    }
}

fn quit(settings: &config::Settings, controller: &Controller) {
    controller
        .transport()
        .quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
}

/// Returns true when the app should exit.
fn handle_control_cmd(
    cmd: ControlCmd,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut Controller,
) -> bool {
    tracing::debug!(?cmd, "media key");
    let result = match cmd {
        ControlCmd::Quit => {
            quit(settings, controller);
            return true;
        }
        ControlCmd::Play => controller.play(),
        // There is no stopped-but-loaded state; Stop pauses in place.
        ControlCmd::Pause | ControlCmd::Stop => controller.pause(),
        ControlCmd::PlayPause => controller.toggle_play_pause(),
        ControlCmd::Next => controller.play_next(),
        ControlCmd::Prev => controller.play_previous(),
    };
    app.follow_playback_on();
    report(app, result);
    false
}

/// Returns true when the app should exit.
fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut Controller,
) -> bool {
    app.clear_notice();
    if key.code != KeyCode::Char('g') {
        // g pending should clear on any other key
        app.clear_pending_g();
    }

    let len = controller.tracks().len();
    let scrub = settings.controls.scrub_seconds as f64;
    let step = settings.controls.volume_step;

    let result = match key.code {
        KeyCode::Char('q') => {
            quit(settings, controller);
            return true;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.next(len);
            Ok(())
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.prev(len);
            Ok(())
        }
        KeyCode::Char('g') => {
            if app.press_g() {
                app.top();
            }
            Ok(())
        }
        KeyCode::Char('G') => {
            app.bottom(len);
            Ok(())
        }
        KeyCode::Enter => {
            if len == 0 {
                Ok(())
            } else {
                app.follow_playback_on();
                controller.select_and_play(app.selected)
            }
        }
        KeyCode::Char('p') | KeyCode::Char(' ') => controller.toggle_play_pause(),
        KeyCode::Char('l') => {
            app.follow_playback_on();
            controller.play_next()
        }
        KeyCode::Char('h') => {
            app.follow_playback_on();
            controller.play_previous()
        }
        KeyCode::Char('L') => controller.seek_by(scrub),
        KeyCode::Char('H') => controller.seek_by(-scrub),
        KeyCode::Char('+') | KeyCode::Char('=') => controller.step_volume(step),
        KeyCode::Char('-') => controller.step_volume(-step),
        KeyCode::Char('m') => controller.toggle_mute(),
        KeyCode::Char('r') => {
            let mode = controller.cycle_repeat_mode();
            app.set_notice(format!("repeat: {}", mode.label()));
            Ok(())
        }
        KeyCode::Char('s') => {
            let on = controller.toggle_shuffle();
            app.set_notice(if on { "shuffle on" } else { "shuffle off" });
            Ok(())
        }
        KeyCode::Char('d') => {
            if len == 0 {
                app.set_notice("queue is empty");
                Ok(())
            } else {
                controller.remove_track(app.selected).map(|removed| {
                    app.set_notice(format!("removed {}", removed.display()));
                })
            }
        }
        _ => Ok(()),
    };

    report(app, result);
    false
}
