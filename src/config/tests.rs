use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_tonearm_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("TONEARM_CONFIG_PATH", "/tmp/tonearm-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/tonearm-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("tonearm")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("tonearm")
            .join("config.toml")
    );
}

#[test]
fn settings_load_from_config_file_and_parse_repeat_mode_aliases() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
shuffle = true
repeat_mode = "repeat-one"
volume = 0.5
auto_cue = false

[audio]
quit_fade_out_ms = 123
progress_interval_ms = 100

[controls]
scrub_seconds = 9
volume_step = 0.1

[spectrum]
fft_size = 1024
min_db = -90.0
max_db = -20.0
smoothing = 0.5

[ui]
follow_playback = false
header_text = "hello"
redraw_interval_ms = 16

[library]
extensions = ["mp3"]
recursive = false
include_hidden = false
follow_links = false
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("TONEARM_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("TONEARM__AUDIO__QUIT_FADE_OUT_MS");

    let s = Settings::load().unwrap();
    assert!(s.playback.shuffle);
    assert!(matches!(s.playback.repeat_mode, RepeatModeSetting::One));
    assert_eq!(s.playback.volume, 0.5);
    assert!(!s.playback.auto_cue);
    assert_eq!(s.audio.quit_fade_out_ms, 123);
    assert_eq!(s.audio.progress_interval_ms, 100);
    assert_eq!(s.controls.scrub_seconds, 9);
    assert_eq!(s.controls.volume_step, 0.1);
    assert_eq!(s.spectrum.fft_size, 1024);
    assert_eq!(s.spectrum.frame_len(), 512);
    assert_eq!(s.spectrum.min_db, -90.0);
    assert_eq!(s.spectrum.max_db, -20.0);
    assert_eq!(s.spectrum.smoothing, 0.5);
    assert!(!s.ui.follow_playback);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(s.ui.redraw_interval_ms, 16);
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert!(!s.library.recursive);
    assert!(!s.library.include_hidden);
    assert!(!s.library.follow_links);
    assert!(s.validate().is_ok());
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[audio]
quit_fade_out_ms = 250
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("TONEARM_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("TONEARM__AUDIO__QUIT_FADE_OUT_MS", "0");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.quit_fade_out_ms, 0);
}

#[test]
fn defaults_are_valid() {
    let s = Settings::default();
    assert!(s.validate().is_ok());
    assert_eq!(s.spectrum.frame_len(), 128);
    assert!(matches!(s.playback.repeat_mode, RepeatModeSetting::Off));
}

#[test]
fn validate_rejects_bad_spectrum_and_volume_values() {
    let mut s = Settings::default();
    s.spectrum.fft_size = 1000;
    assert!(s.validate().unwrap_err().contains("fft_size"));

    let mut s = Settings::default();
    s.spectrum.min_db = -10.0;
    assert!(s.validate().unwrap_err().contains("min_db"));

    let mut s = Settings::default();
    s.spectrum.smoothing = 1.0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.playback.volume = 1.5;
    assert!(s.validate().unwrap_err().contains("playback.volume"));

    let mut s = Settings::default();
    s.audio.progress_interval_ms = 0;
    assert!(s.validate().is_err());
}
