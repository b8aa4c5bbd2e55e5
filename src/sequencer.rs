// 16-step playback clock. Knows nothing about tracks or outputs; it only says
// which step fired on a given poll and remembers it for the LED indicator.

use crate::shared::{Step, STEPS_PER_PATTERN};

pub const MIN_BPM: u8 = 60;
pub const MAX_BPM: u8 = 200;

const STEPS_PER_BEAT: u32 = (STEPS_PER_PATTERN / 4) as u32; // 16th notes

/// The step that fired last and when, for the fade on the LEDs
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Indicator {
    pub step: Step,
    pub started_at: u64,
}

#[derive(Clone, Debug)]
pub struct Sequencer {
    current: Step,
    bpm: u8,
    running: bool,
    // deadline of `current`; fixed when the previous step fired so a tempo
    // change only moves the steps after it
    next_step_at: u64,
    indicator: Option<Indicator>,
}

impl Sequencer {
    pub fn new(bpm: u8) -> Self {
        Self {
            current: Step::FIRST,
            bpm: clamp_bpm(bpm as i32),
            running: false,
            next_step_at: 0,
            indicator: None,
        }
    }

    pub fn bpm(&self) -> u8 {
        self.bpm
    }

    // takes a wide int so callers can pass raw protocol arithmetic
    pub fn set_bpm(&mut self, bpm: i32) {
        self.bpm = clamp_bpm(bpm);
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn current_step(&self) -> Step {
        self.current
    }

    pub fn next_step_at(&self) -> u64 {
        self.next_step_at
    }

    pub fn indicator(&self) -> Option<Indicator> {
        self.indicator
    }

    pub fn clear_indicator(&mut self) {
        self.indicator = None;
    }

    pub fn step_interval_ms(&self) -> u64 {
        60_000 / (self.bpm as u64 * STEPS_PER_BEAT as u64)
    }

    // always restarts from step 0; the first step fires on the next tick
    pub fn start(&mut self, now: u64) {
        self.running = true;
        self.current = Step::FIRST;
        self.next_step_at = now;
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.indicator = None;
    }

    /// Fires at most one step per call. Returns the step that fired.
    pub fn tick(&mut self, now: u64) -> Option<Step> {
        if !self.running || now < self.next_step_at {
            return None;
        }
        let fired = self.current;
        self.indicator = Some(Indicator {
            step: fired,
            started_at: now,
        });
        self.current = fired.next();

        let interval = self.step_interval_ms();
        self.next_step_at += interval;
        if self.next_step_at <= now {
            // fell behind (stalled loop); don't burst to catch up
            self.next_step_at = now + interval;
        }
        Some(fired)
    }
}

fn clamp_bpm(bpm: i32) -> u8 {
    bpm.clamp(MIN_BPM as i32, MAX_BPM as i32) as u8
}
