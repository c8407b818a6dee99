use crate::mpris::{MprisHandle, PlaybackStatus};
use crate::playback::PlayerSnapshot;

/// Pushes controller snapshots to MPRIS, but only when something a client
/// would see actually changed.
#[derive(Debug, Default)]
pub struct MprisSync {
    last: Option<(Option<usize>, PlaybackStatus, u64)>,
}

impl MprisSync {
    pub fn update(&mut self, mpris: &MprisHandle, snapshot: &PlayerSnapshot) {
        let status = PlaybackStatus::from_snapshot(snapshot);
        let key = (
            snapshot.state.current_index,
            status,
            snapshot.state.duration.to_bits(),
        );
        if self.last == Some(key) {
            return;
        }

        mpris.set_track_metadata(
            snapshot.state.current_index,
            snapshot.track.as_ref(),
            snapshot.state.duration,
        );
        mpris.set_playback(status);
        self.last = Some(key);
    }
}
