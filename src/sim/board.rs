use std::collections::VecDeque;

use crossbeam_channel::Sender;
use strikepad::shared::{NUM_BUTTONS, NUM_KEYS, NUM_PIXELS};
use strikepad::{Board, KeyLines, PixelId, Rgb, SolenoidChannel};

const ACTIVITY_LINES: usize = 6;

// stands in for the real hardware: key lines come from the terminal, outputs
// are kept for drawing, wireless notifies go to the simulated app
pub struct SimBoard {
    matrix: [bool; NUM_KEYS],
    buttons: [bool; NUM_BUTTONS],
    // pixel buffer vs what the strip shows after the last flush
    staged: [Rgb; NUM_PIXELS],
    shown: [Rgb; NUM_PIXELS],
    solenoids: [bool; NUM_KEYS],
    strikes: u64,
    to_peer: Sender<Vec<u8>>,
    activity: VecDeque<String>,
}

impl SimBoard {
    pub fn new(to_peer: Sender<Vec<u8>>) -> Self {
        Self {
            matrix: [false; NUM_KEYS],
            buttons: [false; NUM_BUTTONS],
            staged: [Rgb::OFF; NUM_PIXELS],
            shown: [Rgb::OFF; NUM_PIXELS],
            solenoids: [false; NUM_KEYS],
            strikes: 0,
            to_peer,
            activity: VecDeque::with_capacity(ACTIVITY_LINES),
        }
    }

    pub fn set_lines(&mut self, matrix: [bool; NUM_KEYS], buttons: [bool; NUM_BUTTONS]) {
        self.matrix = matrix;
        self.buttons = buttons;
    }

    pub fn pixel(&self, pixel: PixelId) -> Rgb {
        self.shown[pixel.index()]
    }

    pub fn solenoid(&self, channel: SolenoidChannel) -> bool {
        self.solenoids[channel.index()]
    }

    pub fn strikes(&self) -> u64 {
        self.strikes
    }

    pub fn activity(&self) -> impl Iterator<Item = &str> {
        self.activity.iter().map(String::as_str)
    }

    fn log_activity(&mut self, line: String) {
        if self.activity.len() == ACTIVITY_LINES {
            self.activity.pop_front();
        }
        self.activity.push_back(line);
    }
}

impl KeyLines for SimBoard {
    fn read_matrix(&mut self) -> [bool; NUM_KEYS] {
        self.matrix
    }

    fn read_buttons(&mut self) -> [bool; NUM_BUTTONS] {
        self.buttons
    }
}

impl Board for SimBoard {
    fn set_solenoid(&mut self, channel: SolenoidChannel, on: bool) {
        if on && !self.solenoids[channel.index()] {
            self.strikes += 1;
        }
        self.solenoids[channel.index()] = on;
    }

    fn set_pixel(&mut self, pixel: PixelId, color: Rgb) {
        self.staged[pixel.index()] = color;
    }

    fn show_pixels(&mut self) {
        self.shown = self.staged;
    }

    fn notify(&mut self, packet: &[u8]) {
        self.log_activity(format!("ble  {packet:02x?}"));
        // the app thread is gone only when we're shutting down
        let _ = self.to_peer.try_send(packet.to_vec());
    }

    fn write_wired(&mut self, bytes: &[u8]) {
        self.log_activity(format!("midi {bytes:02x?}"));
    }
}
