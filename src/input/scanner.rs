// Edge detection over the raw key lines. No contact debounce beyond sampling
// at most once per SCAN_INTERVAL_MS; a key changes the instant a sample
// differs from the previous one.

use crate::device_api::KeyLines;
use crate::shared::{ButtonId, KeyId, NUM_BUTTONS, NUM_KEYS};

pub const SCAN_INTERVAL_MS: u64 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyEvent {
    KeyPressed(KeyId),
    KeyReleased(KeyId),
    ButtonPressed(ButtonId),
    ButtonReleased(ButtonId),
}

#[derive(Clone, Copy, Debug, Default)]
struct LineState {
    held: bool,
    pressed_at: u64,
}

#[derive(Clone, Debug, Default)]
pub struct KeyScanner {
    last_scan: Option<u64>,
    keys: [LineState; NUM_KEYS],
    buttons: [LineState; NUM_BUTTONS],
    // last press made by hand, for telling echoes apart from app playback
    physical_press_at: [Option<u64>; NUM_KEYS],
}

impl KeyScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Samples the lines and returns every edge since the previous sample,
    /// matrix keys first. Returns nothing if called too soon.
    pub fn scan<L: KeyLines + ?Sized>(&mut self, lines: &mut L, now: u64) -> Vec<KeyEvent> {
        if self.last_scan.is_some_and(|t| now.saturating_sub(t) < SCAN_INTERVAL_MS) {
            return Vec::new();
        }
        self.last_scan = Some(now);

        let mut events = Vec::new();
        let matrix = lines.read_matrix();
        for key in KeyId::all() {
            let down = matrix[key.index()];
            let state = &mut self.keys[key.index()];
            if down == state.held {
                continue;
            }
            state.held = down;
            if down {
                state.pressed_at = now;
                self.physical_press_at[key.index()] = Some(now);
                events.push(KeyEvent::KeyPressed(key));
            } else {
                events.push(KeyEvent::KeyReleased(key));
            }
        }

        let buttons = lines.read_buttons();
        for button in ButtonId::all() {
            let down = buttons[button.index()];
            let state = &mut self.buttons[button.index()];
            if down == state.held {
                continue;
            }
            state.held = down;
            if down {
                state.pressed_at = now;
                events.push(KeyEvent::ButtonPressed(button));
            } else {
                events.push(KeyEvent::ButtonReleased(button));
            }
        }
        events
    }

    pub fn key_held(&self, key: KeyId) -> bool {
        self.keys[key.index()].held
    }

    pub fn button_held(&self, button: ButtonId) -> bool {
        self.buttons[button.index()].held
    }

    pub fn keys_held(&self, keys: &[KeyId]) -> bool {
        keys.iter().all(|&k| self.key_held(k))
    }

    pub fn buttons_held(&self, buttons: &[ButtonId]) -> bool {
        buttons.iter().all(|&b| self.button_held(b))
    }

    /// When the button went down, if it is held
    pub fn button_down_since(&self, button: ButtonId) -> Option<u64> {
        let state = self.buttons[button.index()];
        state.held.then_some(state.pressed_at)
    }

    pub fn key_down_since(&self, key: KeyId) -> Option<u64> {
        let state = self.keys[key.index()];
        state.held.then_some(state.pressed_at)
    }

    pub fn physical_press_at(&self, key: KeyId) -> Option<u64> {
        self.physical_press_at[key.index()]
    }
}
