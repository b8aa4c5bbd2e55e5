use std::time::Duration;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crate::sim::PeerCommand;
use super::mode::{Line, TuiState};

const TEMPO_STEP: i16 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimAction {
    Quit,
    Peer(PeerCommand),
}

// poll for input from tui, pad and button keys update the held state in
// tuistate directly, everything else becomes a SimAction
pub fn poll_input(timeout: Duration, ts: &mut TuiState, now: u64) -> anyhow::Result<Vec<SimAction>> {
    let mut actions = Vec::new();
    if !event::poll(timeout)? {
        return Ok(actions);
    }
    // take everything that's queued so a burst of keys lands in one cycle
    loop {
        if let Event::Key(key) = event::read()? {
            if let Some(action) = handle_key(key.code, key.kind, ts, now) {
                actions.push(action);
            }
        }
        if !event::poll(Duration::ZERO)? {
            return Ok(actions);
        }
    }
}

fn handle_key(code: KeyCode, kind: KeyEventKind, ts: &mut TuiState, now: u64) -> Option<SimAction> {
    let KeyCode::Char(c) = code else {
        return (code == KeyCode::Esc && kind == KeyEventKind::Press).then_some(SimAction::Quit);
    };
    let c = c.to_ascii_lowercase();

    // the pad and the mode buttons follow press/release
    if let Some(line) = char_to_pad(c).map(Line::Key).or_else(|| char_to_button(c).map(Line::Button)) {
        match kind {
            KeyEventKind::Press | KeyEventKind::Repeat => ts.press(line, now),
            KeyEventKind::Release => ts.release(line),
        }
        return None;
    }
    if kind != KeyEventKind::Press {
        return None;
    }
    let cmd = match c {
        'p' => PeerCommand::TogglePair,
        ' ' => PeerCommand::TogglePlay,
        '+' | '=' => PeerCommand::Tempo(TEMPO_STEP),
        '-' => PeerCommand::Tempo(-TEMPO_STEP),
        _ => return None,
    };
    Some(SimAction::Peer(cmd))
}

// convert char to pad index
fn char_to_pad(c: char) -> Option<usize> {
    let idx = match c {
        '1' => 0, '2' => 1, '3' => 2, '4' => 3,
        'q' => 4, 'w' => 5, 'e' => 6, 'r' => 7,
        'a' => 8, 's' => 9, 'd' => 10, 'f' => 11,
        'z' => 12, 'x' => 13, 'c' => 14, 'v' => 15,
        _ => return None,
    };
    Some(idx)
}

// two rows of mode buttons to the right of the pad
fn char_to_button(c: char) -> Option<usize> {
    let idx = match c {
        '5' => 0, '6' => 1, '7' => 2, '8' => 3,
        't' => 4, 'y' => 5, 'u' => 6, 'i' => 7,
        _ => return None,
    };
    Some(idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_keys_hold_lines() {
        let mut ts = TuiState::new(500);
        assert_eq!(handle_key(KeyCode::Char('W'), KeyEventKind::Press, &mut ts, 0), None);
        assert!(ts.matrix()[5]);
        handle_key(KeyCode::Char('i'), KeyEventKind::Press, &mut ts, 0);
        assert!(ts.buttons()[7]);
        handle_key(KeyCode::Char('w'), KeyEventKind::Release, &mut ts, 10);
        assert!(!ts.matrix()[5]);
    }

    #[test]
    fn simulator_controls() {
        let mut ts = TuiState::new(500);
        assert_eq!(
            handle_key(KeyCode::Char('p'), KeyEventKind::Press, &mut ts, 0),
            Some(SimAction::Peer(PeerCommand::TogglePair))
        );
        assert_eq!(
            handle_key(KeyCode::Char('-'), KeyEventKind::Press, &mut ts, 0),
            Some(SimAction::Peer(PeerCommand::Tempo(-TEMPO_STEP)))
        );
        assert_eq!(handle_key(KeyCode::Char('p'), KeyEventKind::Release, &mut ts, 0), None);
        assert_eq!(handle_key(KeyCode::Esc, KeyEventKind::Press, &mut ts, 0), Some(SimAction::Quit));
    }
}
