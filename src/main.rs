mod app;
mod audio;
mod config;
mod library;
mod logging;
mod mpris;
mod playback;
mod runtime;
mod spectrum;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
