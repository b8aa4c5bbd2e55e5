//! strikepad - control core for a solenoid drum/synth step pad
//!
//! A 4x4 key matrix and 8 mode buttons drive solenoid strikers, a strip of
//! addressable LEDs, a wireless MIDI link to a companion app and a wired MIDI
//! synth. Everything runs from one non-blocking poll cycle:
//!
//! - 16-step, 4-track drum sequencer with live tempo changes
//! - solenoid pulses under a fixed concurrency budget
//! - LED frames with fades, rendered only when pixels change
//! - BLE-MIDI bridge with a paced resync queue for (re)connecting peers
//! - Wired Mode: autonomous playback on the hardware synth while unpaired
//!
//! # Usage as a Library
//!
//! ```no_run
//! use strikepad::{dispatch, link_channel, Board, DeviceConfig, KeyLines, Middle};
//!
//! fn run(board: &mut (impl Board + KeyLines), clock: impl Fn() -> u64) {
//!     let (bridge, inbox) = link_channel();
//!     // hand `bridge` to the radio stack; it implements the listener traits
//!     # drop(bridge);
//!     let mut middle = Middle::new(DeviceConfig::default());
//!     loop {
//!         let cmds = middle.poll(clock(), board, &inbox);
//!         dispatch(board, cmds);
//!     }
//! }
//! ```

pub mod config;
pub mod device_api;
pub mod error;
pub mod input;
pub mod leds;
pub mod link;
pub mod middle;
pub mod midi;
pub mod pattern;
pub mod sequencer;
pub mod shared;
pub mod solenoid;
pub mod sync_queue;

// Re-export main types
pub use config::{load_config, save_config, DeviceConfig, SimulatorSettings};
pub use device_api::{dispatch, Board, Clock, DeviceCommand, KeyLines, MonotonicClock};
pub use error::{Error, Result};
pub use leds::Rgb;
pub use link::{link_channel, LinkBridge, LinkEvent, LinkInbox, PacketListener, PairingListener};
pub use middle::Middle;
pub use midi::{BlePacket, Control, MidiMessage};
pub use shared::{ButtonId, DisplayState, KeyId, Mode, PixelId, SolenoidChannel, Step, TrackId};
