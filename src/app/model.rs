//! Application model: the presentation-side cursor over the play queue.
//!
//! The queue itself and everything about playback live in the
//! [`PlaybackController`](crate::playback::PlaybackController); `App` only
//! remembers what the user is pointing at and a transient status notice.

/// The main application model.
#[derive(Debug, Clone)]
pub struct App {
    pub selected: usize,

    /// When set, the cursor jumps to the playing track on every redraw.
    pub follow_playback: bool,

    /// A first `g` was pressed; a second one jumps to the top.
    pub pending_g: bool,

    /// One-line message for the status bar (e.g. a rejected command).
    pub notice: Option<String>,
}

impl App {
    /// Create a new `App` with the cursor on the first row.
    pub fn new(follow_playback: bool) -> Self {
        Self {
            selected: 0,
            follow_playback,
            pending_g: false,
            notice: None,
        }
    }

    /// Enable following playback (cursor follows currently playing track).
    pub fn follow_playback_on(&mut self) {
        self.follow_playback = true;
    }
    /// Disable follow-playback; the cursor stays where the user put it.
    pub fn follow_playback_off(&mut self) {
        self.follow_playback = false;
    }

    /// Move selection to the next row, wrapping to the first.
    pub fn next(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
            return;
        }
        self.follow_playback_off();
        self.selected = (self.selected + 1) % len;
    }

    /// Move selection to the previous row, wrapping to the last.
    pub fn prev(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
            return;
        }
        self.follow_playback_off();
        self.selected = (self.selected + len - 1) % len;
    }

    pub fn top(&mut self) {
        self.follow_playback_off();
        self.selected = 0;
    }

    pub fn bottom(&mut self, len: usize) {
        self.follow_playback_off();
        self.selected = len.saturating_sub(1);
    }

    /// Set the selected index, clamped into the queue.
    pub fn set_selected(&mut self, idx: usize, len: usize) {
        self.selected = idx.min(len.saturating_sub(1));
    }

    /// Feed one `g` press. Returns true when it completes a `gg`.
    pub fn press_g(&mut self) -> bool {
        if self.pending_g {
            self.pending_g = false;
            true
        } else {
            self.pending_g = true;
            false
        }
    }

    /// Forget a half-typed `gg`.
    pub fn clear_pending_g(&mut self) {
        self.pending_g = false;
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    /// Reconcile the cursor with the queue after a redraw-worth of changes:
    /// keep it in range and, when following, put it on the playing track.
    pub fn sync_with_playback(&mut self, current_index: Option<usize>, len: usize) {
        if self.follow_playback {
            if let Some(i) = current_index {
                self.selected = i;
            }
        }
        self.set_selected(self.selected, len);
    }
}
