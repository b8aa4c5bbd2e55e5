// LED pulse shapes: attack / hold / release for drum steps, a plain decay for synth modes.
//
//   level
//   target  |   ______________
//           |  /              \
//   base    |_/                \____
//           0 5%             80%  100%  of duration

const ATTACK_PERCENT: u64 = 5;
const RELEASE_PERCENT: u64 = 20;

/// Brightness `elapsed` ms into a pulse of `duration` ms going from `base` to
/// `target` and back. Duration 0 snaps to target; a finished pulse is `base`.
pub fn fade(elapsed: u64, duration: u64, base: u8, target: u8) -> u8 {
    if duration == 0 {
        return target;
    }
    if elapsed >= duration {
        return base;
    }
    let attack = duration * ATTACK_PERCENT / 100;
    let release = duration * RELEASE_PERCENT / 100;
    let release_start = duration - release;

    if elapsed < attack {
        lerp(base, target, elapsed, attack)
    } else if elapsed < release_start {
        target
    } else {
        lerp(base, target, duration - elapsed, release)
    }
}

/// Synth-mode indicator: starts at `level` and decays linearly to 0 over
/// `duration` ms.
pub fn fade_out(elapsed: u64, duration: u64, level: u8) -> u8 {
    if elapsed >= duration {
        return 0;
    }
    lerp(0, level, duration - elapsed, duration)
}

// base + (target - base) * num / den, in either direction
fn lerp(base: u8, target: u8, num: u64, den: u64) -> u8 {
    if den == 0 {
        return target;
    }
    let delta = target as i64 - base as i64;
    (base as i64 + delta * num as i64 / den as i64).clamp(0, 255) as u8
}
