// Types and fixed tables shared by every layer.
//
// Physical layout of the pad (matrix keys and the two rows of direct buttons):
//
//   0  1  2  3        buttons:  0 1 2 3
//   4  5  6  7                  4 5 6 7
//   8  9 10 11
//  12 13 14 15
//
// Every matrix key owns one solenoid and two LED pixels. The LED strip runs
// serpentine (left to right on even rows, right to left on odd rows) and the
// solenoid drivers are wired column-major, so none of these are identity maps.
// A step and the key that edits it share the same index.

use crate::error::Error;

pub const NUM_KEYS: usize = 16;
pub const NUM_BUTTONS: usize = 8;
pub const NUM_TRACKS: usize = 4;
pub const STEPS_PER_PATTERN: usize = 16;
pub const NUM_PIXELS: usize = 32;
pub const NUM_MODES: usize = 8;

macro_rules! bounded_index {
    ($(#[$meta:meta])* $name:ident, $limit:expr, $kind:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u8);

        impl $name {
            pub const COUNT: usize = $limit;
            pub const FIRST: Self = Self(0);

            pub const fn new(value: u8) -> Option<Self> {
                if (value as usize) < $limit {
                    Some(Self(value))
                } else {
                    None
                }
            }

            pub const fn get(self) -> u8 {
                self.0
            }

            pub const fn index(self) -> usize {
                self.0 as usize
            }

            pub fn all() -> impl Iterator<Item = Self> {
                (0..$limit as u8).map(Self)
            }
        }

        impl TryFrom<u8> for $name {
            type Error = Error;

            fn try_from(value: u8) -> Result<Self, Error> {
                Self::new(value).ok_or(Error::OutOfRange {
                    kind: $kind,
                    value,
                    limit: $limit as u8,
                })
            }
        }
    };
}

// ye olde types
bounded_index!(
    /// One of the 16 matrix keys
    KeyId, NUM_KEYS, "key"
);
bounded_index!(
    /// One of the 8 direct (mode) buttons
    ButtonId, NUM_BUTTONS, "button"
);
bounded_index!(
    /// A sixteenth-note slot in the pattern
    Step, STEPS_PER_PATTERN, "step"
);
bounded_index!(
    /// One of the 4 drum tracks
    TrackId, NUM_TRACKS, "track"
);
bounded_index!(
    /// A physical pixel on the LED strip
    PixelId, NUM_PIXELS, "pixel"
);
bounded_index!(
    /// An output line on the solenoid driver board
    SolenoidChannel, NUM_KEYS, "solenoid"
);

const KEY_PIXELS: [[u8; 2]; NUM_KEYS] = [
    [0, 1], [2, 3], [4, 5], [6, 7],
    [14, 15], [12, 13], [10, 11], [8, 9],
    [16, 17], [18, 19], [20, 21], [22, 23],
    [30, 31], [28, 29], [26, 27], [24, 25],
];

const KEY_SOLENOID: [u8; NUM_KEYS] = [
    0, 4, 8, 12,
    1, 5, 9, 13,
    2, 6, 10, 14,
    3, 7, 11, 15,
];

const SOLENOID_KEY: [u8; NUM_KEYS] = invert_channels(KEY_SOLENOID);
const PIXEL_KEY: [u8; NUM_PIXELS] = pixel_owners(KEY_PIXELS);

const fn invert_channels(map: [u8; NUM_KEYS]) -> [u8; NUM_KEYS] {
    let mut out = [0u8; NUM_KEYS];
    let mut key = 0;
    while key < NUM_KEYS {
        out[map[key] as usize] = key as u8;
        key += 1;
    }
    out
}

const fn pixel_owners(map: [[u8; 2]; NUM_KEYS]) -> [u8; NUM_PIXELS] {
    let mut out = [0u8; NUM_PIXELS];
    let mut key = 0;
    while key < NUM_KEYS {
        out[map[key][0] as usize] = key as u8;
        out[map[key][1] as usize] = key as u8;
        key += 1;
    }
    out
}

/// The four keys in the middle of the matrix
pub const CENTER_KEYS: [KeyId; 4] = [KeyId(5), KeyId(6), KeyId(9), KeyId(10)];
/// The four corner keys of the matrix
pub const CORNER_KEYS: [KeyId; 4] = [KeyId(0), KeyId(3), KeyId(12), KeyId(15)];
/// The four corner direct buttons (both ends of both rows)
pub const CORNER_BUTTONS: [ButtonId; 4] = [ButtonId(0), ButtonId(3), ButtonId(4), ButtonId(7)];
/// Holding these two while unpaired toggles wired mode
pub const WIRED_COMBO: [ButtonId; 2] = [ButtonId(0), ButtonId(7)];

impl KeyId {
    pub const fn solenoid(self) -> SolenoidChannel {
        SolenoidChannel(KEY_SOLENOID[self.0 as usize])
    }

    pub const fn pixels(self) -> [PixelId; 2] {
        let pair = KEY_PIXELS[self.0 as usize];
        [PixelId(pair[0]), PixelId(pair[1])]
    }

    pub const fn step(self) -> Step {
        Step(self.0)
    }
}

impl SolenoidChannel {
    pub const fn key(self) -> KeyId {
        KeyId(SOLENOID_KEY[self.0 as usize])
    }
}

impl PixelId {
    pub const fn key(self) -> KeyId {
        KeyId(PIXEL_KEY[self.0 as usize])
    }
}

impl Step {
    pub const fn key(self) -> KeyId {
        KeyId(self.0)
    }

    pub const fn next(self) -> Self {
        Self((self.0 + 1) % STEPS_PER_PATTERN as u8)
    }
}

impl ButtonId {
    // button i selects mode i
    pub const fn mode(self) -> Mode {
        Mode::ALL[self.0 as usize]
    }
}

/// What the 16 matrix keys currently do, and which palette the LEDs use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    Kick,
    Snare,
    Hat,
    Perc,
    Pad,
    Lead,
    Pluck,
    Bell,
}

impl Mode {
    pub const ALL: [Mode; NUM_MODES] = [
        Mode::Kick,
        Mode::Snare,
        Mode::Hat,
        Mode::Perc,
        Mode::Pad,
        Mode::Lead,
        Mode::Pluck,
        Mode::Bell,
    ];

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    pub const fn index(self) -> u8 {
        self as u8
    }

    // drum modes edit a pattern track, synth modes play notes in real time
    pub const fn is_drum(self) -> bool {
        (self as u8) < 4
    }

    pub const fn track(self) -> Option<TrackId> {
        if self.is_drum() {
            Some(TrackId(self as u8))
        } else {
            None
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Mode::Kick => "KICK",
            Mode::Snare => "SNARE",
            Mode::Hat => "HAT",
            Mode::Perc => "PERC",
            Mode::Pad => "PAD",
            Mode::Lead => "LEAD",
            Mode::Pluck => "PLUCK",
            Mode::Bell => "BELL",
        }
    }
}

// Snapshot of the controller for front-ends; read it, never write it back.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayState {
    pub mode: Mode,
    pub bpm: u8,
    pub playing: bool,
    pub current_step: u8,
    pub paired: bool,
    pub wired_mode: bool,
    pub resyncing: bool,
    pub peer_recording: bool,
    pub active_solenoids: usize,
    pub sync_queue_len: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solenoid_map_is_a_bijection() {
        for key in KeyId::all() {
            assert_eq!(key.solenoid().key(), key);
        }
        let mut seen = [false; NUM_KEYS];
        for key in KeyId::all() {
            let ch = key.solenoid().index();
            assert!(!seen[ch], "channel {ch} used twice");
            seen[ch] = true;
        }
    }

    #[test]
    fn every_pixel_belongs_to_exactly_one_key() {
        let mut owners = [0usize; NUM_PIXELS];
        for key in KeyId::all() {
            for pixel in key.pixels() {
                assert_eq!(pixel.key(), key);
                owners[pixel.index()] += 1;
            }
        }
        assert!(owners.iter().all(|&n| n == 1));
    }

    #[test]
    fn indices_reject_out_of_range() {
        assert!(KeyId::new(15).is_some());
        assert!(KeyId::new(16).is_none());
        assert!(TrackId::try_from(4).is_err());
        assert!(PixelId::try_from(31).is_ok());
    }

    #[test]
    fn step_wraps_after_fifteen() {
        let last = Step::new(15).unwrap();
        assert_eq!(last.next().get(), 0);
    }

    #[test]
    fn mode_classification() {
        assert_eq!(Mode::Perc.track().map(TrackId::get), Some(3));
        assert!(Mode::Pad.track().is_none());
        assert_eq!(ButtonId::new(5).unwrap().mode(), Mode::Lead);
        assert_eq!(Mode::from_index(8), None);
    }
}
