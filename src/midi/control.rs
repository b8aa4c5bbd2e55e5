// Control-change vocabulary shared with the companion app.
//
//   0-7    select mode (value ignored)
//   16-31  step state for the selected drum track (control-16 = step, value>0 = set)
//   0x40   play (value>0) / stop
//   0x41   tempo, value + 60 bpm
//   0x42   clear every track
//   0x50   peer asks for a full resync
//   0x51   resync start marker
//   0x52   heartbeat
//   0x53   recording flag from the app / long-press record start (mode) and stop (0)
//   0x54   bar sync, value = step that just played
//   0x55   packed pattern datum, (track << 4) | step

use crate::sequencer::MIN_BPM;
use crate::shared::{Mode, Step, TrackId};

pub const CC_MODE_LAST: u8 = 7;
pub const CC_STEP_FIRST: u8 = 16;
pub const CC_STEP_END: u8 = 32;
pub const CC_PLAY: u8 = 0x40;
pub const CC_TEMPO: u8 = 0x41;
pub const CC_RESET: u8 = 0x42;
pub const CC_STATE_REQUEST: u8 = 0x50;
pub const CC_SYNC_START: u8 = 0x51;
pub const CC_HEARTBEAT: u8 = 0x52;
pub const CC_RECORD: u8 = 0x53;
pub const CC_BAR_SYNC: u8 = 0x54;
pub const CC_PATTERN: u8 = 0x55;

const ON: u8 = 127;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    SelectMode(Mode),
    StepState { step: Step, on: bool },
    Play(bool),
    /// Raw tempo offset; the bpm is 60 + value before clamping
    Tempo(u8),
    FullReset,
    StateRequest,
    SyncStart,
    Heartbeat,
    /// 0 = stop/off, otherwise a mode index or "on"
    Record(u8),
    BarSync(Step),
    PatternDatum { track: TrackId, step: Step },
}

impl Control {
    pub fn decode(controller: u8, value: u8) -> Option<Self> {
        let control = match controller {
            0..=CC_MODE_LAST => Control::SelectMode(Mode::from_index(controller)?),
            CC_STEP_FIRST..CC_STEP_END => Control::StepState {
                step: Step::new(controller - CC_STEP_FIRST)?,
                on: value > 0,
            },
            CC_PLAY => Control::Play(value > 0),
            CC_TEMPO => Control::Tempo(value),
            CC_RESET => Control::FullReset,
            CC_STATE_REQUEST => Control::StateRequest,
            CC_SYNC_START => Control::SyncStart,
            CC_HEARTBEAT => Control::Heartbeat,
            CC_RECORD => Control::Record(value),
            CC_BAR_SYNC => Control::BarSync(Step::new(value)?),
            CC_PATTERN => {
                let (track, step) = unpack_datum(value)?;
                Control::PatternDatum { track, step }
            }
            _ => return None,
        };
        Some(control)
    }

    /// (controller, value)
    pub fn encode(self) -> (u8, u8) {
        match self {
            Control::SelectMode(mode) => (mode.index(), ON),
            Control::StepState { step, on } => (CC_STEP_FIRST + step.get(), if on { ON } else { 0 }),
            Control::Play(on) => (CC_PLAY, if on { ON } else { 0 }),
            Control::Tempo(value) => (CC_TEMPO, value),
            Control::FullReset => (CC_RESET, ON),
            Control::StateRequest => (CC_STATE_REQUEST, ON),
            Control::SyncStart => (CC_SYNC_START, ON),
            Control::Heartbeat => (CC_HEARTBEAT, ON),
            Control::Record(value) => (CC_RECORD, value),
            Control::BarSync(step) => (CC_BAR_SYNC, step.get()),
            Control::PatternDatum { track, step } => (CC_PATTERN, pack_datum(track, step)),
        }
    }

    pub fn tempo(bpm: u8) -> Self {
        Control::Tempo(bpm.saturating_sub(MIN_BPM))
    }
}

pub fn pack_datum(track: TrackId, step: Step) -> u8 {
    (track.get() << 4) | step.get()
}

pub fn unpack_datum(value: u8) -> Option<(TrackId, Step)> {
    Some((TrackId::new(value >> 4)?, Step::new(value & 0x0F)?))
}
