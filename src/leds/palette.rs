// Strip colors: one hue per mode plus the advertising and Wired Mode accents.

use crate::shared::Mode;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const OFF: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    // brightness 255 = the color as-is
    pub fn scaled(self, brightness: u8) -> Rgb {
        let scale = |c: u8| ((c as u16 * brightness as u16) / 255) as u8;
        Rgb::new(scale(self.r), scale(self.g), scale(self.b))
    }
}

// one color per mode, in mode order
const MODE_COLORS: [Rgb; 8] = [
    Rgb::new(255, 0, 0),     // KICK
    Rgb::new(255, 110, 0),   // SNARE
    Rgb::new(255, 220, 0),   // HAT
    Rgb::new(0, 255, 40),    // PERC
    Rgb::new(0, 200, 255),   // PAD
    Rgb::new(30, 60, 255),   // LEAD
    Rgb::new(160, 0, 255),   // PLUCK
    Rgb::new(255, 40, 160),  // BELL
];

/// Base color while wired mode drives the hardware synth
pub const WIRED_ACCENT: Rgb = Rgb::new(255, 160, 60);
/// Color of the "looking for a peer" animation
pub const ADVERTISE_ACCENT: Rgb = Rgb::new(0, 90, 255);

pub fn mode_color(mode: Mode) -> Rgb {
    MODE_COLORS[mode.index() as usize]
}
