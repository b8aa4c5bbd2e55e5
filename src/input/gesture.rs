// Multi-key gestures and per-button long press.

use crate::shared::{ButtonId, CENTER_KEYS, CORNER_BUTTONS, NUM_BUTTONS};

use super::scanner::KeyScanner;

/// Minimum gap between two firings of the same gesture
pub const GESTURE_TIMEOUT_MS: u64 = 100;
pub const LONG_PRESS_MS: u64 = 500;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gesture {
    /// all four corner buttons: wipe every track
    FullReset,
    /// all four center keys: wipe the selected drum track
    ClearTrack,
}

// Edge-armed: fires when the combo completes, then stays latched until one of
// its keys lets go. A combo completed again within the timeout re-latches
// silently, which swallows contact chatter on a held gesture.
#[derive(Clone, Copy, Debug, Default)]
struct Latch {
    latched: bool,
    fired_at: Option<u64>,
}

impl Latch {
    fn update(&mut self, all_held: bool, now: u64) -> bool {
        if !all_held {
            self.latched = false;
            return false;
        }
        if self.latched {
            return false;
        }
        self.latched = true;
        let cooled = self
            .fired_at
            .is_none_or(|t| now.saturating_sub(t) >= GESTURE_TIMEOUT_MS);
        if cooled {
            self.fired_at = Some(now);
        }
        cooled
    }
}

#[derive(Clone, Debug, Default)]
pub struct GestureDetector {
    reset: Latch,
    clear: Latch,
}

impl GestureDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// At most one gesture per call; full reset wins a tie.
    pub fn update(&mut self, scanner: &KeyScanner, now: u64) -> Option<Gesture> {
        let reset = self.reset.update(scanner.buttons_held(&CORNER_BUTTONS), now);
        let clear = self.clear.update(scanner.keys_held(&CENTER_KEYS), now);
        if reset {
            Some(Gesture::FullReset)
        } else if clear {
            Some(Gesture::ClearTrack)
        } else {
            None
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct LongPress {
    handled: [bool; NUM_BUTTONS],
}

impl LongPress {
    pub fn new() -> Self {
        Self::default()
    }

    // re-arm on every fresh press
    pub fn press(&mut self, button: ButtonId) {
        self.handled[button.index()] = false;
    }

    /// Buttons whose hold just crossed LONG_PRESS_MS
    pub fn update(&mut self, scanner: &KeyScanner, now: u64) -> Vec<ButtonId> {
        let mut fired = Vec::new();
        for button in ButtonId::all() {
            let Some(since) = scanner.button_down_since(button) else {
                continue;
            };
            let handled = &mut self.handled[button.index()];
            if !*handled && now.saturating_sub(since) >= LONG_PRESS_MS {
                *handled = true;
                fired.push(button);
            }
        }
        fired
    }

    /// Whether the press being released had turned into a long press
    pub fn release(&mut self, button: ButtonId) -> bool {
        std::mem::take(&mut self.handled[button.index()])
    }
}
