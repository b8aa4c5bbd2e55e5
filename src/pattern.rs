// The drum pattern: 4 tracks of 16 on/off steps.
//
// "track": one drum voice (KICK, SNARE, HAT, PERC), selected by modes 0-3.
// "step": one sixteenth note of a single track; set means the track hits there.
//
// Synth modes have no stored pattern; their keys play notes in real time.

use crate::shared::{Step, TrackId, NUM_TRACKS, STEPS_PER_PATTERN};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Track {
    pub steps: [bool; STEPS_PER_PATTERN],
}

impl Track {
    pub fn is_empty(&self) -> bool {
        !self.steps.iter().any(|&s| s)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatternGrid {
    tracks: [Track; NUM_TRACKS],
}

impl PatternGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, track: TrackId, step: Step) -> bool {
        self.tracks[track.index()].steps[step.index()]
    }

    pub fn set(&mut self, track: TrackId, step: Step, on: bool) {
        self.tracks[track.index()].steps[step.index()] = on;
    }

    // returns the new state of the step
    pub fn toggle(&mut self, track: TrackId, step: Step) -> bool {
        let cell = &mut self.tracks[track.index()].steps[step.index()];
        *cell = !*cell;
        *cell
    }

    pub fn track(&self, track: TrackId) -> &Track {
        &self.tracks[track.index()]
    }

    // returns the steps that were set before clearing
    pub fn clear_track(&mut self, track: TrackId) -> Vec<Step> {
        let cleared: Vec<Step> = Step::all().filter(|&s| self.get(track, s)).collect();
        self.tracks[track.index()] = Track::default();
        cleared
    }

    pub fn clear_all(&mut self) {
        self.tracks = [Track::default(); NUM_TRACKS];
    }

    /// Tracks that hit on the given step, in track order
    pub fn hits_at(&self, step: Step) -> impl Iterator<Item = TrackId> + '_ {
        TrackId::all().filter(move |&t| self.get(t, step))
    }

    /// Every set step, track-major
    pub fn set_steps(&self) -> impl Iterator<Item = (TrackId, Step)> + '_ {
        TrackId::all().flat_map(move |t| Step::all().filter(move |&s| self.get(t, s)).map(move |s| (t, s)))
    }

    pub fn count(&self) -> usize {
        self.set_steps().count()
    }
}
