// Boundary between the control core and the hardware it drives.
//
// The core never touches a line or a radio itself: every poll returns a list
// of DeviceCommands, and the host hands them to whatever implements Board
// (real drivers on the instrument, the terminal simulator on a desktop).
// Inputs come the other way through KeyLines and Clock.

use std::time::Instant;

use crate::leds::Rgb;
use crate::midi::{BlePacket, MidiMessage};
use crate::shared::{PixelId, SolenoidChannel, NUM_BUTTONS, NUM_KEYS};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceCommand {
    Solenoid { channel: SolenoidChannel, on: bool },
    Pixel { pixel: PixelId, color: Rgb },
    // push the pixel buffer out to the strip
    ShowPixels,
    // wireless notify to the paired app; only ever produced while paired
    Notify(BlePacket),
    Wired(MidiMessage),
}

/// Raw electrical state of the keys, true = closed
pub trait KeyLines {
    fn read_matrix(&mut self) -> [bool; NUM_KEYS];
    fn read_buttons(&mut self) -> [bool; NUM_BUTTONS];
}

/// Output side of the hardware
pub trait Board {
    fn set_solenoid(&mut self, channel: SolenoidChannel, on: bool);
    fn set_pixel(&mut self, pixel: PixelId, color: Rgb);
    fn show_pixels(&mut self);
    fn notify(&mut self, packet: &[u8]);
    fn write_wired(&mut self, bytes: &[u8]);
}

pub fn dispatch<B: Board + ?Sized>(board: &mut B, cmds: impl IntoIterator<Item = DeviceCommand>) {
    for cmd in cmds {
        match cmd {
            DeviceCommand::Solenoid { channel, on } => board.set_solenoid(channel, on),
            DeviceCommand::Pixel { pixel, color } => board.set_pixel(pixel, color),
            DeviceCommand::ShowPixels => board.show_pixels(),
            DeviceCommand::Notify(packet) => board.notify(packet.as_bytes()),
            DeviceCommand::Wired(msg) => {
                let (bytes, len) = msg.to_bytes();
                board.write_wired(&bytes[..len]);
            }
        }
    }
}

/// Monotonic milliseconds
pub trait Clock {
    fn now_ms(&self) -> u64;
}

pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        solenoids: Vec<(u8, bool)>,
        shows: usize,
        notified: Vec<Vec<u8>>,
        wired: Vec<Vec<u8>>,
    }

    impl Board for Recorder {
        fn set_solenoid(&mut self, channel: SolenoidChannel, on: bool) {
            self.solenoids.push((channel.get(), on));
        }
        fn set_pixel(&mut self, _pixel: PixelId, _color: Rgb) {}
        fn show_pixels(&mut self) {
            self.shows += 1;
        }
        fn notify(&mut self, packet: &[u8]) {
            self.notified.push(packet.to_vec());
        }
        fn write_wired(&mut self, bytes: &[u8]) {
            self.wired.push(bytes.to_vec());
        }
    }

    #[test]
    fn dispatch_routes_each_command() {
        let mut board = Recorder::default();
        let channel = SolenoidChannel::new(3).unwrap();
        dispatch(
            &mut board,
            [
                DeviceCommand::Solenoid { channel, on: true },
                DeviceCommand::ShowPixels,
                DeviceCommand::Notify(BlePacket::encode(MidiMessage::cc(0x52, 127), 0)),
                DeviceCommand::Wired(MidiMessage::ProgramChange { channel: 0, program: 80 }),
            ],
        );
        assert_eq!(board.solenoids, vec![(3, true)]);
        assert_eq!(board.shows, 1);
        assert_eq!(board.notified, vec![vec![0x80, 0x80, 0xB0, 0x52, 127]]);
        assert_eq!(board.wired, vec![vec![0xC0, 80]]);
    }
}
