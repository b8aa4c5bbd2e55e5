// Decides whether an inbound note-on should light and strike the pad.
//
// The app echoes the player's own presses back, and it also plays back
// recorded phrases; both arrive on the same channel. We react when the note
// is our own press coming back, when notes arrive in a playback-like burst,
// or when the app told us it is recording/playing back.

pub const PHYSICAL_WINDOW_MS: u64 = 200;
pub const BURST_WINDOW_MS: u64 = 500;
pub const BURST_COUNT: usize = 3;
pub const RAPID_GAP_MS: u64 = 100;

const HISTORY: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Grouping {
    OwnPress,
    Burst,
    Recording,
    Ignore,
}

impl Grouping {
    pub fn reacts(self) -> bool {
        self != Grouping::Ignore
    }
}

#[derive(Clone, Debug, Default)]
pub struct NoteGrouping {
    // ring of recent note-on times, newest at (next - 1)
    recent: [u64; HISTORY],
    len: usize,
    next: usize,
    recording: bool,
}

impl NoteGrouping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_recording(&mut self, on: bool) {
        self.recording = on;
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Records a note-on at `now` and classifies it.
    /// `physical_press_at` is when the matching key was last pressed by hand.
    pub fn classify(&mut self, physical_press_at: Option<u64>, now: u64) -> Grouping {
        let previous = self.newest();
        self.push(now);

        if physical_press_at.is_some_and(|t| now.saturating_sub(t) <= PHYSICAL_WINDOW_MS) {
            return Grouping::OwnPress;
        }
        let in_window = self.iter().filter(|&t| now.saturating_sub(t) < BURST_WINDOW_MS).count();
        let rapid = previous.is_some_and(|t| now.saturating_sub(t) < RAPID_GAP_MS);
        if in_window >= BURST_COUNT || rapid {
            return Grouping::Burst;
        }
        if self.recording {
            return Grouping::Recording;
        }
        Grouping::Ignore
    }

    fn push(&mut self, at: u64) {
        self.recent[self.next] = at;
        self.next = (self.next + 1) % HISTORY;
        self.len = (self.len + 1).min(HISTORY);
    }

    fn newest(&self) -> Option<u64> {
        (self.len > 0).then(|| self.recent[(self.next + HISTORY - 1) % HISTORY])
    }

    fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        (0..self.len).map(move |i| self.recent[(self.next + HISTORY - 1 - i) % HISTORY])
    }
}
