use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};

use crate::config::AudioSettings;
use crate::playback::{Generation, TransportEvent};

use super::sink::create_sink_at;
use super::types::{AudioCmd, TapSlot};

/// What the audio thread currently has loaded.
pub(super) struct Deck {
    pub generation: Generation,
    path: Option<PathBuf>,
    sink: Option<Sink>,
    pub paused: bool,
    volume: f32,
    ended_reported: bool,
}

impl Deck {
    pub fn new() -> Self {
        Self {
            generation: 0,
            path: None,
            sink: None,
            paused: true,
            volume: 1.0,
            ended_reported: false,
        }
    }

    fn stop(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.path = None;
        self.paused = true;
    }

    /// Periodic report for the loaded sink, if any.
    pub fn tick(&mut self) -> Option<TransportEvent> {
        let sink = self.sink.as_ref()?;
        let (drained, position) = (sink.empty(), sink.get_pos());
        self.observe(drained, position)
    }

    /// Turn one observation of the output into a notification: `Progress`
    /// while playing, a single `Ended` once the source has drained, nothing
    /// while paused.
    pub fn observe(&mut self, drained: bool, position: Duration) -> Option<TransportEvent> {
        if self.paused {
            return None;
        }
        if drained {
            if self.ended_reported {
                return None;
            }
            self.ended_reported = true;
            return Some(TransportEvent::Ended {
                generation: self.generation,
            });
        }
        Some(TransportEvent::Progress {
            generation: self.generation,
            position: position.as_secs_f64(),
        })
    }

    /// Forget a previous `Ended`; the next drain is reported again.
    pub fn rearm(&mut self) {
        self.ended_reported = false;
    }
}

/// Fixed-rate deadline for progress reports. Incoming commands do not push
/// the deadline back.
pub(super) struct Cadence {
    interval: Duration,
    next: Instant,
}

impl Cadence {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next: now + interval,
        }
    }

    /// How long to wait for a command before the next report is due.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.next.saturating_duration_since(now)
    }

    /// True once per elapsed interval; schedules the following deadline.
    pub fn due(&mut self, now: Instant) -> bool {
        if now < self.next {
            return false;
        }
        self.next = now + self.interval;
        true
    }
}

fn fade_out_sink(sink: &Sink, from: f32, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(from * (1.0 - t));
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    events: Sender<TransportEvent>,
    tap: TapSlot,
    audio_settings: AudioSettings,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream: Option<OutputStream> = match OutputStreamBuilder::open_default_stream() {
            Ok(mut stream) => {
                // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
                // but noisy for a TUI app.
                stream.log_on_drop(false);
                Some(stream)
            }
            Err(e) => {
                tracing::error!(error = %e, "no audio output device; every load will fail");
                None
            }
        };

        let emit = |event: TransportEvent| {
            // The event loop is gone only during shutdown.
            let _ = events.send(event);
        };
        let clear_tap = || {
            if let Some(t) = tap.get() {
                t.clear();
            }
        };

        let mut deck = Deck::new();
        let interval = Duration::from_millis(audio_settings.progress_interval_ms.max(1));
        let mut cadence = Cadence::new(interval, Instant::now());

        loop {
            match rx.recv_timeout(cadence.remaining(Instant::now())) {
                Ok(cmd) => match cmd {
                    AudioCmd::Load { generation, path } => {
                        deck.stop();
                        clear_tap();
                        deck.generation = generation;
                        deck.rearm();

                        let Some(stream) = stream.as_ref() else {
                            emit(TransportEvent::Error {
                                generation,
                                cause: "no audio output device".to_string(),
                            });
                            continue;
                        };

                        match create_sink_at(stream, &path, Duration::ZERO, tap.get().cloned()) {
                            Ok(prepared) => {
                                prepared.sink.set_volume(deck.volume);
                                deck.sink = Some(prepared.sink);
                                deck.path = Some(path);
                                emit(TransportEvent::Ready {
                                    generation,
                                    duration: prepared.total.map_or(0.0, |d| d.as_secs_f64()),
                                    position: 0.0,
                                });
                            }
                            Err(e) => {
                                tracing::warn!(error = %e, generation, "load failed");
                                emit(TransportEvent::Error {
                                    generation,
                                    cause: e.to_string(),
                                });
                            }
                        }
                    }

                    AudioCmd::Play => match deck.sink.as_ref() {
                        Some(s) => {
                            s.play();
                            deck.paused = false;
                        }
                        None => emit(TransportEvent::Error {
                            generation: deck.generation,
                            cause: "nothing is loaded".to_string(),
                        }),
                    },

                    AudioCmd::Pause => {
                        if let Some(ref s) = deck.sink {
                            s.pause();
                        }
                        deck.paused = true;
                        clear_tap();
                    }

                    AudioCmd::Seek(position) => {
                        let (Some(s), Some(stream)) = (deck.sink.as_ref(), stream.as_ref()) else {
                            continue;
                        };
                        if let Err(e) = s.try_seek(position) {
                            // Rebuild the sink and skip into the file instead.
                            tracing::debug!(error = %e, "try_seek unsupported; rebuilding sink");
                            let Some(path) = deck.path.clone() else {
                                continue;
                            };
                            s.stop();
                            match create_sink_at(stream, &path, position, tap.get().cloned()) {
                                Ok(prepared) => {
                                    prepared.sink.set_volume(deck.volume);
                                    if !deck.paused {
                                        prepared.sink.play();
                                    }
                                    deck.sink = Some(prepared.sink);
                                }
                                Err(e) => {
                                    tracing::warn!(error = %e, "seek rebuild failed");
                                    deck.sink = None;
                                    emit(TransportEvent::Error {
                                        generation: deck.generation,
                                        cause: e.to_string(),
                                    });
                                    continue;
                                }
                            }
                        }
                        deck.rearm();
                        emit(TransportEvent::Progress {
                            generation: deck.generation,
                            position: position.as_secs_f64(),
                        });
                    }

                    AudioCmd::SetVolume(volume) => {
                        deck.volume = volume;
                        if let Some(ref s) = deck.sink {
                            s.set_volume(volume);
                        }
                    }

                    AudioCmd::Quit { fade_out_ms } => {
                        if let Some(ref s) = deck.sink {
                            if !deck.paused {
                                // Fade out gently before stopping.
                                fade_out_sink(s, deck.volume, fade_out_ms);
                            }
                            s.stop();
                        }
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            // Runs after commands too, so a steady stream of them cannot
            // starve progress reports or end-of-track detection.
            if cadence.due(Instant::now()) {
                if let Some(event) = deck.tick() {
                    if matches!(event, TransportEvent::Ended { .. }) {
                        clear_tap();
                    }
                    emit(event);
                }
            }
        }
    })
}
