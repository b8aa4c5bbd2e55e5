// Paced outbound queue for bulk control messages (resync, track-clear echoes).
//
// The radio drops notifications sent back to back, so queued entries go out
// at most one per poll and at least SPACING_MS apart. Entries are scheduled
// when pushed, relative to the entry ahead of them.

use log::warn;

use crate::error::{Error, Result};
use crate::midi::Control;
use crate::pattern::PatternGrid;
use crate::shared::Mode;

pub const SYNC_QUEUE_CAPACITY: usize = 128;
pub const SPACING_MS: u64 = 30;
/// How long a fresh connection is left alone before the resync starts
pub const SETTLE_MS: u64 = 500;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncEntry {
    pub control: u8,
    pub value: u8,
    pub send_at: u64,
}

#[derive(Clone, Debug)]
pub struct SyncQueue {
    ring: [SyncEntry; SYNC_QUEUE_CAPACITY],
    head: usize,
    len: usize,
    drained: bool,
}

impl Default for SyncQueue {
    fn default() -> Self {
        Self {
            ring: [SyncEntry::default(); SYNC_QUEUE_CAPACITY],
            head: 0,
            len: 0,
            drained: false,
        }
    }
}

impl SyncQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops everything pending, including an unreported completion
    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
        self.drained = false;
    }

    /// Queues one control message and returns when it will go out.
    pub fn push(&mut self, control: u8, value: u8, now: u64) -> Result<u64> {
        if self.len == SYNC_QUEUE_CAPACITY {
            return Err(Error::QueueFull { control });
        }
        let send_at = match self.tail() {
            Some(last) => now.max(last.send_at + SPACING_MS),
            None => now,
        };
        let slot = (self.head + self.len) % SYNC_QUEUE_CAPACITY;
        self.ring[slot] = SyncEntry { control, value, send_at };
        self.len += 1;
        self.drained = false;
        Ok(send_at)
    }

    pub fn push_control(&mut self, control: Control, now: u64) -> Result<u64> {
        let (controller, value) = control.encode();
        self.push(controller, value, now)
    }

    /// Hands out the oldest entry once it is due, at most one per call.
    pub fn pop_ready(&mut self, now: u64) -> Option<SyncEntry> {
        let entry = self.peek()?;
        if entry.send_at > now {
            return None;
        }
        self.head = (self.head + 1) % SYNC_QUEUE_CAPACITY;
        self.len -= 1;
        if self.len == 0 {
            self.drained = true;
        }
        Some(entry)
    }

    pub fn peek(&self) -> Option<SyncEntry> {
        (self.len > 0).then(|| self.ring[self.head])
    }

    /// True once after the last pending entry has been popped
    pub fn take_completion(&mut self) -> bool {
        std::mem::take(&mut self.drained)
    }

    /// Queues a full state dump for a freshly connected peer: start marker,
    /// mode, tempo, transport, then one datum per set step. Entries that don't
    /// fit are dropped with a warning. Returns how many were queued.
    pub fn queue_resync(&mut self, mode: Mode, bpm: u8, running: bool, grid: &PatternGrid, now: u64) -> usize {
        let header = [
            Control::SyncStart,
            Control::SelectMode(mode),
            Control::tempo(bpm),
            Control::Play(running),
        ];
        let data = grid
            .set_steps()
            .map(|(track, step)| Control::PatternDatum { track, step });

        let mut queued = 0;
        for control in header.into_iter().chain(data) {
            match self.push_control(control, now) {
                Ok(_) => queued += 1,
                Err(e) => warn!("resync: {e}"),
            }
        }
        queued
    }

    fn tail(&self) -> Option<SyncEntry> {
        (self.len > 0).then(|| self.ring[(self.head + self.len - 1) % SYNC_QUEUE_CAPACITY])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::midi::control::{CC_PATTERN, CC_PLAY, CC_SYNC_START, CC_TEMPO};
    use crate::shared::{Step, TrackId};

    #[test]
    fn entries_are_paced_and_fifo() {
        let mut q = SyncQueue::new();
        assert_eq!(q.push(1, 10, 1000).unwrap(), 1000);
        assert_eq!(q.push(2, 20, 1000).unwrap(), 1030);
        assert_eq!(q.push(3, 30, 1005).unwrap(), 1060);

        assert_eq!(q.pop_ready(1000).map(|e| e.control), Some(1));
        assert_eq!(q.pop_ready(1000), None);
        assert_eq!(q.pop_ready(1029), None);
        assert_eq!(q.pop_ready(1030).map(|e| e.control), Some(2));
        // late polls still release one entry at a time
        assert_eq!(q.pop_ready(5000).map(|e| e.control), Some(3));
        assert!(q.is_empty());
    }

    #[test]
    fn push_after_idle_is_not_delayed() {
        let mut q = SyncQueue::new();
        q.push(1, 0, 0).unwrap();
        q.pop_ready(0);
        assert_eq!(q.push(2, 0, 5000).unwrap(), 5000);
        q.push(3, 0, 5000).unwrap();
        q.pop_ready(5000);
        // the entry behind a gap keeps its own slot
        assert_eq!(q.push(4, 0, 9000).unwrap(), 9000);
    }

    #[test]
    fn overflow_drops_only_the_new_entry() {
        let mut q = SyncQueue::new();
        for i in 0..SYNC_QUEUE_CAPACITY {
            q.push(i as u8, 0, 0).unwrap();
        }
        let err = q.push(0x7F, 1, 0);
        assert!(matches!(err, Err(Error::QueueFull { control: 0x7F })));
        assert_eq!(q.len(), SYNC_QUEUE_CAPACITY);

        let mut now = 0;
        let mut seen = Vec::new();
        while !q.is_empty() {
            if let Some(e) = q.pop_ready(now) {
                seen.push(e.control);
            }
            now += 1;
        }
        let expected: Vec<u8> = (0..SYNC_QUEUE_CAPACITY as u8).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn completion_fires_once() {
        let mut q = SyncQueue::new();
        assert!(!q.take_completion());
        q.push(1, 0, 0).unwrap();
        q.push(2, 0, 0).unwrap();
        q.pop_ready(0);
        assert!(!q.take_completion());
        q.pop_ready(30);
        assert!(q.take_completion());
        assert!(!q.take_completion());
    }

    #[test]
    fn clear_forgets_pending_completion() {
        let mut q = SyncQueue::new();
        q.push(1, 0, 0).unwrap();
        q.pop_ready(0);
        q.clear();
        assert!(!q.take_completion());
    }

    #[test]
    fn resync_layout() {
        let mut grid = PatternGrid::new();
        grid.set(TrackId::new(2).unwrap(), Step::new(11).unwrap(), true);
        grid.set(TrackId::new(0).unwrap(), Step::new(4).unwrap(), true);

        let mut q = SyncQueue::new();
        assert_eq!(q.queue_resync(Mode::Snare, 100, true, &grid, 0), 6);

        let mut sent = Vec::new();
        for i in 0..6 {
            let e = q.pop_ready(i * SPACING_MS).unwrap();
            assert_eq!(e.send_at, i * SPACING_MS);
            sent.push((e.control, e.value));
        }
        assert_eq!(
            sent,
            vec![
                (CC_SYNC_START, 127),
                (1, 127),
                (CC_TEMPO, 40),
                (CC_PLAY, 127),
                (CC_PATTERN, 0x04),
                (CC_PATTERN, 0x2B),
            ]
        );
    }
}
