use super::*;
use crate::playback::TransportState;
use std::path::PathBuf;
use std::sync::mpsc;

fn make_track() -> Track {
    Track {
        id: "test-1".to_string(),
        locator: PathBuf::from("/tmp/music/test.mp3"),
        title: "Test Title".to_string(),
        artist: "Test Artist".to_string(),
    }
}

#[test]
fn set_track_metadata_sets_and_clears_shared_state() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let handle = MprisHandle {
        state: state.clone(),
    };

    let track = make_track();
    handle.set_track_metadata(Some(7), Some(&track), 1.234_567);

    {
        let s = state.lock().unwrap();
        assert_eq!(s.title.as_deref(), Some("Test Title"));
        assert_eq!(s.artist, vec!["Test Artist".to_string()]);
        assert!(s.url.as_deref().unwrap().contains("/tmp/music/test.mp3"));
        assert_eq!(s.length_micros, Some(1_234_567));
        assert_eq!(
            s.track_id.as_ref().map(|p| p.as_str()),
            Some("/org/mpris/MediaPlayer2/track/7")
        );
    }

    handle.set_track_metadata(None, None, 0.0);
    {
        let s = state.lock().unwrap();
        assert_eq!(s.title, None);
        assert!(s.artist.is_empty());
        assert_eq!(s.url, None);
        assert_eq!(s.length_micros, None);
        assert!(s.track_id.is_none());
    }
}

#[test]
fn unknown_duration_has_no_length() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let handle = MprisHandle {
        state: state.clone(),
    };
    handle.set_track_metadata(Some(0), Some(&make_track()), 0.0);
    assert_eq!(state.lock().unwrap().length_micros, None);
}

#[test]
fn playback_status_maps_state_to_mpris_strings() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        tx,
        state: state.clone(),
    };
    let handle = MprisHandle {
        state: state.clone(),
    };

    assert_eq!(iface.playback_status(), "Stopped");
    handle.set_playback(PlaybackStatus::Playing);
    assert_eq!(iface.playback_status(), "Playing");
    handle.set_playback(PlaybackStatus::Paused);
    assert_eq!(iface.playback_status(), "Paused");
}

#[test]
fn playback_status_from_snapshot() {
    let mut snapshot = PlayerSnapshot {
        state: TransportState::default(),
        track: None,
        queue_len: 3,
        last_error: None,
    };
    assert_eq!(
        PlaybackStatus::from_snapshot(&snapshot),
        PlaybackStatus::Stopped
    );

    snapshot.state.current_index = Some(1);
    assert_eq!(
        PlaybackStatus::from_snapshot(&snapshot),
        PlaybackStatus::Paused
    );

    snapshot.state.is_playing = true;
    assert_eq!(
        PlaybackStatus::from_snapshot(&snapshot),
        PlaybackStatus::Playing
    );
}

#[test]
fn methods_forward_control_commands() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface { tx, state };

    iface.next();
    iface.previous();
    iface.play_pause();
    iface.stop();

    let got: Vec<ControlCmd> = rx.try_iter().collect();
    assert_eq!(
        got,
        vec![
            ControlCmd::Next,
            ControlCmd::Prev,
            ControlCmd::PlayPause,
            ControlCmd::Stop
        ]
    );
}

#[test]
fn metadata_includes_expected_keys_when_present() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        tx,
        state: state.clone(),
    };
    let handle = MprisHandle {
        state: state.clone(),
    };
    handle.set_track_metadata(Some(1), Some(&make_track()), 42.0);

    let map = iface.metadata();
    for k in [
        "mpris:trackid",
        "xesam:title",
        "xesam:artist",
        "xesam:url",
        "mpris:length",
    ] {
        assert!(map.contains_key(k), "missing key: {k}");
    }
}
