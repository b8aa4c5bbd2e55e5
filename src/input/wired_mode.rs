// Wired Mode toggle: hold the WIRED_COMBO buttons together while unpaired.

use crate::shared::{ButtonId, WIRED_COMBO};

use super::scanner::KeyScanner;

pub const WIRED_HOLD_MS: u64 = 300;

#[derive(Clone, Debug)]
pub struct WiredModeDetector {
    active: bool,
    // cleared after a toggle until both buttons are up again
    armed: bool,
}

impl Default for WiredModeDetector {
    fn default() -> Self {
        Self {
            active: false,
            armed: true,
        }
    }
}

impl WiredModeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Returns the new state when the combo toggles Wired Mode. Only the two
    /// combo buttons may be down; any other button (the corner reset includes
    /// both) disarms it until the combo is fully released.
    pub fn update(&mut self, scanner: &KeyScanner, paired: bool, now: u64) -> Option<bool> {
        if WIRED_COMBO.iter().all(|&b| !scanner.button_held(b)) {
            self.armed = true;
        }
        if ButtonId::all().any(|b| !WIRED_COMBO.contains(&b) && scanner.button_held(b)) {
            self.armed = false;
        }
        if paired || !self.armed {
            return None;
        }
        // held continuously since the later of the two presses
        let mut since = 0;
        for button in WIRED_COMBO {
            since = since.max(scanner.button_down_since(button)?);
        }
        if now.saturating_sub(since) < WIRED_HOLD_MS {
            return None;
        }
        self.armed = false;
        self.active = !self.active;
        Some(self.active)
    }

    /// Leaves Wired Mode without touching the combo arming. Returns whether it
    /// was active.
    pub fn force_off(&mut self) -> bool {
        std::mem::replace(&mut self.active, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::scanner::tests::FakeLines;

    fn hold_combo(lines: &mut FakeLines, on: bool) {
        lines.buttons[0] = on;
        lines.buttons[7] = on;
    }

    #[test]
    fn toggles_after_the_hold() {
        let mut lines = FakeLines::default();
        let mut scanner = KeyScanner::new();
        let mut wired = WiredModeDetector::new();

        hold_combo(&mut lines, true);
        scanner.scan(&mut lines, 1000);
        assert_eq!(wired.update(&scanner, false, 1299), None);
        assert_eq!(wired.update(&scanner, false, 1300), Some(true));
        // still held: no flip-flopping
        assert_eq!(wired.update(&scanner, false, 5000), None);

        hold_combo(&mut lines, false);
        scanner.scan(&mut lines, 5100);
        wired.update(&scanner, false, 5100);
        hold_combo(&mut lines, true);
        scanner.scan(&mut lines, 5200);
        assert_eq!(wired.update(&scanner, false, 5500), Some(false));
    }

    #[test]
    fn hold_counts_from_the_second_button() {
        let mut lines = FakeLines::default();
        let mut scanner = KeyScanner::new();
        let mut wired = WiredModeDetector::new();

        lines.buttons[0] = true;
        scanner.scan(&mut lines, 0);
        lines.buttons[7] = true;
        scanner.scan(&mut lines, 200);
        assert_eq!(wired.update(&scanner, false, 400), None);
        assert_eq!(wired.update(&scanner, false, 500), Some(true));
    }

    #[test]
    fn extra_buttons_disarm_the_combo() {
        let mut lines = FakeLines::default();
        let mut scanner = KeyScanner::new();
        let mut wired = WiredModeDetector::new();

        // the corner reset holds 0, 3, 4 and 7
        for b in [0, 3, 4, 7] {
            lines.buttons[b] = true;
        }
        scanner.scan(&mut lines, 0);
        assert_eq!(wired.update(&scanner, false, 400), None);

        // letting go of 3 and 4 is not enough, the combo must start fresh
        lines.buttons[3] = false;
        lines.buttons[4] = false;
        scanner.scan(&mut lines, 500);
        assert_eq!(wired.update(&scanner, false, 900), None);

        hold_combo(&mut lines, false);
        scanner.scan(&mut lines, 1000);
        wired.update(&scanner, false, 1000);
        hold_combo(&mut lines, true);
        scanner.scan(&mut lines, 1100);
        assert_eq!(wired.update(&scanner, false, 1400), Some(true));
    }

    #[test]
    fn ignored_while_paired() {
        let mut lines = FakeLines::default();
        let mut scanner = KeyScanner::new();
        let mut wired = WiredModeDetector::new();
        hold_combo(&mut lines, true);
        scanner.scan(&mut lines, 0);
        assert_eq!(wired.update(&scanner, true, 1000), None);
        assert!(!wired.is_active());
    }

    #[test]
    fn force_off_reports_previous_state() {
        let mut wired = WiredModeDetector::new();
        assert!(!wired.force_off());
        wired.active = true;
        assert!(wired.force_off());
        assert!(!wired.is_active());
    }
}
