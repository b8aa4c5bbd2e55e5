//! LED renderer.
//!
//! Each frame is recomputed from scratch out of the controller's state; the
//! only things the renderer keeps between frames are the per-key note flash
//! levels (synth modes) and what it last sent to the strip, so unchanged
//! pixels are never re-sent.

pub mod fade;
pub mod palette;

pub use fade::{fade, fade_out};
pub use palette::{mode_color, Rgb, ADVERTISE_ACCENT, WIRED_ACCENT};

use crate::device_api::DeviceCommand;
use crate::pattern::PatternGrid;
use crate::sequencer::Indicator;
use crate::shared::{KeyId, Mode, PixelId, CENTER_KEYS, CORNER_KEYS, NUM_KEYS, NUM_PIXELS};

pub const FULL: u8 = 255;
/// A set step in the selected drum track
pub const TOGGLE_ON: u8 = 70;
/// Peak of the step indicator over an empty step
pub const INDICATOR_ONLY: u8 = 40;
pub const ADVERTISE_LEVEL: u8 = 80;
pub const ADVERTISE_PERIOD_MS: u64 = 1000;

/// Everything a frame depends on besides the renderer's own flash state
#[derive(Clone, Copy, Debug)]
pub struct RenderView<'a> {
    pub paired: bool,
    pub wired_mode: bool,
    pub mode: Mode,
    pub grid: &'a PatternGrid,
    pub running: bool,
    pub indicator: Option<Indicator>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LedFrame {
    pub levels: [u8; NUM_PIXELS],
    pub colors: [Rgb; NUM_PIXELS],
}

impl LedFrame {
    fn dark() -> Self {
        Self {
            levels: [0; NUM_PIXELS],
            colors: [Rgb::OFF; NUM_PIXELS],
        }
    }

    fn light_key(&mut self, key: KeyId, level: u8, color: Rgb) {
        for pixel in key.pixels() {
            self.levels[pixel.index()] = level;
            self.colors[pixel.index()] = color.scaled(level);
        }
    }

    pub fn level(&self, pixel: PixelId) -> u8 {
        self.levels[pixel.index()]
    }
}

#[derive(Clone, Debug)]
pub struct LedRenderer {
    shown: [Option<Rgb>; NUM_PIXELS],
    flash: [u8; NUM_KEYS],
    fade_ms: u64,
}

impl LedRenderer {
    pub fn new(fade_ms: u64) -> Self {
        Self {
            shown: [None; NUM_PIXELS],
            flash: [0; NUM_KEYS],
            fade_ms,
        }
    }

    pub fn set_flash(&mut self, key: KeyId, level: u8) {
        self.flash[key.index()] = level;
    }

    pub fn flash(&self, key: KeyId) -> u8 {
        self.flash[key.index()]
    }

    // drops note flashes and forgets what the strip shows (full redraw next frame)
    pub fn clear_transients(&mut self) {
        self.flash = [0; NUM_KEYS];
        self.invalidate();
    }

    pub fn invalidate(&mut self) {
        self.shown = [None; NUM_PIXELS];
    }

    pub fn compose(&self, view: &RenderView, now: u64) -> LedFrame {
        let mut frame = LedFrame::dark();

        if !view.paired && !view.wired_mode {
            // advertising: inner and corner pairs take turns once a second
            let keys = if (now / ADVERTISE_PERIOD_MS) % 2 == 0 {
                CENTER_KEYS
            } else {
                CORNER_KEYS
            };
            for key in keys {
                frame.light_key(key, ADVERTISE_LEVEL, ADVERTISE_ACCENT);
            }
            return frame;
        }

        let color = if view.wired_mode {
            WIRED_ACCENT
        } else {
            mode_color(view.mode)
        };
        let pulse = view
            .indicator
            .filter(|_| view.running)
            .map(|ind| (ind.step.key(), now.saturating_sub(ind.started_at)));

        for key in KeyId::all() {
            let elapsed = pulse.and_then(|(k, elapsed)| (k == key).then_some(elapsed));
            let level = match view.mode.track() {
                Some(track) => {
                    let on = view.grid.get(track, key.step());
                    let base = if on { TOGGLE_ON } else { 0 };
                    match elapsed {
                        Some(e) => fade(e, self.fade_ms, base, if on { FULL } else { INDICATOR_ONLY }),
                        None => base,
                    }
                }
                None => {
                    let indicator = elapsed.map_or(0, |e| fade_out(e, self.fade_ms, INDICATOR_ONLY));
                    indicator.max(self.flash[key.index()])
                }
            };
            frame.light_key(key, level, color);
        }
        frame
    }

    /// Composes a frame and emits only the pixels that changed, followed by a
    /// single ShowPixels if anything did. Returns how many pixels changed.
    pub fn render(&mut self, view: &RenderView, now: u64, out: &mut Vec<DeviceCommand>) -> usize {
        let frame = self.compose(view, now);
        let mut changed = 0;
        for pixel in PixelId::all() {
            let color = frame.colors[pixel.index()];
            if self.shown[pixel.index()] != Some(color) {
                self.shown[pixel.index()] = Some(color);
                out.push(DeviceCommand::Pixel { pixel, color });
                changed += 1;
            }
        }
        if changed > 0 {
            out.push(DeviceCommand::ShowPixels);
        }
        changed
    }
}
