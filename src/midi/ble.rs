// BLE-MIDI framing for the companion app link.
//
//   [0x80, ts | 0x80, status, data1, (data2)]
//
// ts is the low 7 bits of the millisecond clock. data2 is only carried by
// note-on and control-change; note-off and program change travel as two bytes.

use super::MidiMessage;
use crate::error::{Error, Result};

pub const PACKET_HEADER: u8 = 0x80;
const MAX_PACKET: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlePacket {
    bytes: [u8; MAX_PACKET],
    len: u8,
}

impl BlePacket {
    pub fn encode(msg: MidiMessage, now: u64) -> Self {
        let (raw, _) = msg.to_bytes();
        let body = match msg {
            MidiMessage::NoteOn { .. } | MidiMessage::ControlChange { .. } => 3,
            MidiMessage::NoteOff { .. } | MidiMessage::ProgramChange { .. } => 2,
        };
        let mut bytes = [0u8; MAX_PACKET];
        bytes[0] = PACKET_HEADER;
        bytes[1] = timestamp_byte(now);
        bytes[2..2 + body].copy_from_slice(&raw[..body]);
        Self {
            bytes,
            len: (2 + body) as u8,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    pub fn decode(&self) -> Result<MidiMessage> {
        decode(self.as_bytes())
    }
}

pub fn timestamp_byte(now: u64) -> u8 {
    (now & 0x7F) as u8 | 0x80
}

/// Decodes the first message of an inbound packet.
pub fn decode(data: &[u8]) -> Result<MidiMessage> {
    if data.len() < 4 {
        return Err(Error::Malformed("shorter than header + 2 bytes"));
    }
    if data[0] & 0x80 == 0 {
        return Err(Error::Malformed("missing header bit"));
    }
    let status = data[2];
    if status & 0x80 == 0 {
        return Err(Error::Malformed("no status byte"));
    }
    let channel = status & 0x0F;
    match status & 0xF0 {
        0x90 => {
            let [note, velocity] = data_pair(data)?;
            Ok(MidiMessage::NoteOn { channel, note, velocity })
        }
        0x80 => Ok(MidiMessage::NoteOff { channel, note: data[3] }),
        0xB0 => {
            let [controller, value] = data_pair(data)?;
            Ok(MidiMessage::ControlChange { channel, controller, value })
        }
        0xC0 => Ok(MidiMessage::ProgramChange { channel, program: data[3] }),
        _ => Err(Error::Malformed("unsupported status")),
    }
}

fn data_pair(data: &[u8]) -> Result<[u8; 2]> {
    match data.get(3..5) {
        Some(&[a, b]) => Ok([a, b]),
        _ => Err(Error::Malformed("missing second data byte")),
    }
}
