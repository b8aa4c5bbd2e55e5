//! MIDI plumbing: the message type shared by both links, the BLE packet
//! framing, the control-change vocabulary spoken with the companion app, the
//! wired synth note tables, and the inbound note classifier.

pub mod ble;
pub mod control;
pub mod grouping;
pub mod wired;

pub use ble::BlePacket;
pub use control::Control;
pub use grouping::{Grouping, NoteGrouping};
pub use wired::WiredSynth;

/// A single channel-voice message
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MidiMessage {
    NoteOn { channel: u8, note: u8, velocity: u8 },
    NoteOff { channel: u8, note: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
    ProgramChange { channel: u8, program: u8 },
}

impl MidiMessage {
    pub fn cc(controller: u8, value: u8) -> Self {
        MidiMessage::ControlChange {
            channel: 0,
            controller,
            value,
        }
    }

    pub fn status(&self) -> u8 {
        match *self {
            MidiMessage::NoteOn { channel, .. } => 0x90 | (channel & 0x0F),
            MidiMessage::NoteOff { channel, .. } => 0x80 | (channel & 0x0F),
            MidiMessage::ControlChange { channel, .. } => 0xB0 | (channel & 0x0F),
            MidiMessage::ProgramChange { channel, .. } => 0xC0 | (channel & 0x0F),
        }
    }

    /// Raw wire bytes; the second value is how many of the three are used.
    ///
    /// Data bytes are passed through unmasked: the companion app uses the full
    /// byte for tempo values above 127.
    pub fn to_bytes(&self) -> ([u8; 3], usize) {
        let status = self.status();
        match *self {
            MidiMessage::NoteOn { note, velocity, .. } => ([status, note, velocity], 3),
            MidiMessage::NoteOff { note, .. } => ([status, note, 0], 3),
            MidiMessage::ControlChange {
                controller, value, ..
            } => ([status, controller, value], 3),
            MidiMessage::ProgramChange { program, .. } => ([status, program, 0], 2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_bytes() {
        let on = MidiMessage::NoteOn { channel: 9, note: 36, velocity: 100 };
        assert_eq!(on.to_bytes(), ([0x99, 36, 100], 3));

        let off = MidiMessage::NoteOff { channel: 0, note: 61 };
        assert_eq!(off.to_bytes(), ([0x80, 61, 0], 3));

        let pc = MidiMessage::ProgramChange { channel: 0, program: 88 };
        assert_eq!(pc.to_bytes().1, 2);

        assert_eq!(MidiMessage::cc(0x41, 140).to_bytes(), ([0xB0, 0x41, 140], 3));
    }
}
