// Solenoid strikers. The supply can't hold more than MAX_ACTIVE coils at once,
// so a strike past the budget is dropped, never queued: a missed beat is
// better than a brownout.

use crate::device_api::DeviceCommand;
use crate::error::{Error, Result};
use crate::shared::{KeyId, NUM_KEYS};

pub const MAX_ACTIVE: usize = 8;
pub const PULSE_MS: u64 = 50;

#[derive(Clone, Debug, Default)]
pub struct SolenoidBank {
    release_at: [Option<u64>; NUM_KEYS],
    active: usize,
}

impl SolenoidBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_count(&self) -> usize {
        self.active
    }

    pub fn is_active(&self, key: KeyId) -> bool {
        self.release_at[key.index()].is_some()
    }

    pub fn release_at(&self, key: KeyId) -> Option<u64> {
        self.release_at[key.index()]
    }

    /// Energizes the key's coil for one pulse. Striking a coil that is already
    /// on just restarts its pulse.
    pub fn strike(&mut self, key: KeyId, now: u64, out: &mut Vec<DeviceCommand>) -> Result<()> {
        let slot = &mut self.release_at[key.index()];
        if slot.is_none() {
            if self.active >= MAX_ACTIVE {
                return Err(Error::SolenoidBudget { active: self.active });
            }
            self.active += 1;
            out.push(DeviceCommand::Solenoid {
                channel: key.solenoid(),
                on: true,
            });
        }
        *slot = Some(now + PULSE_MS);
        Ok(())
    }

    pub fn release(&mut self, key: KeyId, out: &mut Vec<DeviceCommand>) {
        if self.release_at[key.index()].take().is_some() {
            self.active = self.active.saturating_sub(1);
            out.push(DeviceCommand::Solenoid {
                channel: key.solenoid(),
                on: false,
            });
        }
    }

    /// Releases every coil whose pulse has run out.
    pub fn age(&mut self, now: u64, out: &mut Vec<DeviceCommand>) {
        for key in KeyId::all() {
            if self.release_at[key.index()].is_some_and(|t| now >= t) {
                self.release(key, out);
            }
        }
    }
}
