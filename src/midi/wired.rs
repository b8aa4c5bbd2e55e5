// Note tables for the hardware synth on the wired MIDI port.

use super::MidiMessage;
use crate::config::DeviceConfig;
use crate::shared::{KeyId, Mode, TrackId, NUM_KEYS};

/// General MIDI percussion notes for KICK, SNARE, HAT, PERC (side stick)
pub const DRUM_NOTES: [u8; 4] = [36, 38, 42, 37];
/// Key 0 plays this note in synth modes; key k plays base + k
pub const SYNTH_BASE_NOTE: u8 = 60;
// General MIDI programs (0-based) for PAD, LEAD, PLUCK, BELL
const VOICE_PROGRAMS: [u8; 4] = [88, 80, 45, 14];

#[derive(Clone, Copy, Debug)]
pub struct WiredSynth {
    drum_channel: u8,
    synth_channel: u8,
    velocity: u8,
}

impl WiredSynth {
    pub fn new(config: &DeviceConfig) -> Self {
        Self {
            drum_channel: config.drum_channel & 0x0F,
            synth_channel: config.synth_channel & 0x0F,
            velocity: config.velocity,
        }
    }

    pub fn drum_hit(&self, track: TrackId) -> MidiMessage {
        MidiMessage::NoteOn {
            channel: self.drum_channel,
            note: DRUM_NOTES[track.index()],
            velocity: self.velocity,
        }
    }

    pub fn note_on(&self, key: KeyId) -> MidiMessage {
        MidiMessage::NoteOn {
            channel: self.synth_channel,
            note: synth_note(key),
            velocity: self.velocity,
        }
    }

    pub fn note_off(&self, key: KeyId) -> MidiMessage {
        MidiMessage::NoteOff {
            channel: self.synth_channel,
            note: synth_note(key),
        }
    }

    // None for drum modes; drums always use the percussion kit
    pub fn program_for(&self, mode: Mode) -> Option<MidiMessage> {
        let voice = mode.index().checked_sub(4)?;
        Some(MidiMessage::ProgramChange {
            channel: self.synth_channel,
            program: VOICE_PROGRAMS[voice as usize],
        })
    }

    /// Note-offs for every drum voice and all 16 synth notes
    pub fn all_notes_off(&self) -> impl Iterator<Item = MidiMessage> + '_ {
        let drums = DRUM_NOTES.iter().map(|&note| MidiMessage::NoteOff {
            channel: self.drum_channel,
            note,
        });
        let synth = KeyId::all().map(|key| self.note_off(key));
        drums.chain(synth)
    }
}

pub fn synth_note(key: KeyId) -> u8 {
    SYNTH_BASE_NOTE + key.get()
}

pub fn key_for_note(note: u8) -> Option<KeyId> {
    let offset = note.checked_sub(SYNTH_BASE_NOTE)?;
    if (offset as usize) < NUM_KEYS {
        KeyId::new(offset)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synth() -> WiredSynth {
        WiredSynth::new(&DeviceConfig::default())
    }

    #[test]
    fn drums_use_percussion_channel() {
        let hit = synth().drum_hit(TrackId::new(2).unwrap());
        assert_eq!(hit, MidiMessage::NoteOn { channel: 9, note: 42, velocity: 100 });
    }

    #[test]
    fn synth_notes_start_at_middle_c() {
        let key = KeyId::new(5).unwrap();
        assert_eq!(synth().note_on(key), MidiMessage::NoteOn { channel: 0, note: 65, velocity: 100 });
        assert_eq!(key_for_note(65), Some(key));
        assert_eq!(key_for_note(59), None);
        assert_eq!(key_for_note(76), None);
    }

    #[test]
    fn all_notes_off_covers_every_voice() {
        let offs: Vec<_> = synth().all_notes_off().collect();
        assert_eq!(offs.len(), 4 + 16);
        assert!(offs.iter().all(|m| matches!(m, MidiMessage::NoteOff { .. })));
    }

    #[test]
    fn programs_only_for_synth_modes() {
        assert_eq!(synth().program_for(Mode::Snare), None);
        assert_eq!(
            synth().program_for(Mode::Bell),
            Some(MidiMessage::ProgramChange { channel: 0, program: 14 })
        );
    }
}
