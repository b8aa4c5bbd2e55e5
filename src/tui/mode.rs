use strikepad::shared::{NUM_BUTTONS, NUM_KEYS};

// state local to tui: which simulated keys are down
// terminals without release reporting only give us presses, so a press holds
// the key for tap_hold_ms unless a real release shows up first
#[derive(Clone, Debug)]
pub struct TuiState {
    matrix: [Hold; NUM_KEYS],
    buttons: [Hold; NUM_BUTTONS],
    tap_hold_ms: u64,
    // flipped on the first release event; from then on holds are exact
    releases_seen: bool,
}

#[derive(Clone, Copy, Debug, Default)]
struct Hold {
    down: bool,
    release_at: Option<u64>,
}

#[derive(Clone, Copy, Debug)]
pub enum Line {
    Key(usize),
    Button(usize),
}

impl TuiState {
    pub fn new(tap_hold_ms: u64) -> Self {
        Self {
            matrix: [Hold::default(); NUM_KEYS],
            buttons: [Hold::default(); NUM_BUTTONS],
            tap_hold_ms,
            releases_seen: false,
        }
    }

    pub fn press(&mut self, line: Line, now: u64) {
        let release_at = (!self.releases_seen).then_some(now + self.tap_hold_ms);
        let hold = self.hold_mut(line);
        hold.down = true;
        hold.release_at = release_at;
    }

    pub fn release(&mut self, line: Line) {
        self.releases_seen = true;
        *self.hold_mut(line) = Hold::default();
    }

    // let go of taps whose hold ran out
    pub fn expire(&mut self, now: u64) {
        for hold in self.matrix.iter_mut().chain(self.buttons.iter_mut()) {
            if hold.release_at.is_some_and(|t| now >= t) {
                *hold = Hold::default();
            }
        }
    }

    pub fn matrix(&self) -> [bool; NUM_KEYS] {
        self.matrix.map(|h| h.down)
    }

    pub fn buttons(&self) -> [bool; NUM_BUTTONS] {
        self.buttons.map(|h| h.down)
    }

    pub fn exact_releases(&self) -> bool {
        self.releases_seen
    }

    fn hold_mut(&mut self, line: Line) -> &mut Hold {
        match line {
            Line::Key(i) => &mut self.matrix[i],
            Line::Button(i) => &mut self.buttons[i],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taps_expire_without_release_events() {
        let mut ts = TuiState::new(500);
        ts.press(Line::Key(3), 1000);
        ts.expire(1499);
        assert!(ts.matrix()[3]);
        ts.expire(1500);
        assert!(!ts.matrix()[3]);
    }

    #[test]
    fn real_releases_disable_the_timer() {
        let mut ts = TuiState::new(500);
        ts.press(Line::Button(2), 0);
        ts.release(Line::Button(2));
        ts.press(Line::Button(2), 100);
        ts.expire(10_000);
        assert!(ts.buttons()[2]);
        assert!(ts.exact_releases());
    }
}
