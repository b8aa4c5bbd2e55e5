// Tunables for the controller and the host simulator, stored as JSON next to
// the project: <dir>/.strikepad/config.json
//
// The safety and protocol constants (pulse width, solenoid cap, queue size and
// pacing, gesture thresholds) are not in here on purpose; they live next to the
// code that enforces them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const STRIKEPAD_DIR: &str = ".strikepad";
const CONFIG_FILE: &str = "config.json";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Tempo at power on, clamped like any other tempo change
    pub default_bpm: u8,
    /// How often a heartbeat is sent to a paired peer
    pub heartbeat_ms: u64,
    /// Length of the step-indicator pulse on the LEDs
    pub indicator_fade_ms: u64,
    /// LED frame period
    pub frame_ms: u64,
    /// Velocity for every note the device emits (1-127)
    pub velocity: u8,
    /// Wired synth channel for drum voices (9 = General MIDI percussion)
    pub drum_channel: u8,
    /// Wired synth channel for the melodic voices
    pub synth_channel: u8,
    pub simulator: SimulatorSettings,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            default_bpm: 120,
            heartbeat_ms: 2000,
            indicator_fade_ms: 240,
            frame_ms: 10,
            velocity: 100,
            drum_channel: 9,
            synth_channel: 0,
            simulator: SimulatorSettings::default(),
        }
    }
}

/// Settings only the host simulator reads
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorSettings {
    /// Poll period of the simulated main loop
    pub poll_ms: u64,
    /// How long a key stays down when the terminal can't report releases
    pub tap_hold_ms: u64,
    /// Delay before the simulated app echoes a note back
    pub echo_delay_ms: u64,
    /// Pair with the simulated app on start
    pub auto_pair: bool,
}

impl Default for SimulatorSettings {
    fn default() -> Self {
        Self {
            poll_ms: 2,
            tap_hold_ms: 550,
            echo_delay_ms: 40,
            auto_pair: false,
        }
    }
}

impl DeviceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.drum_channel > 15 || self.synth_channel > 15 {
            return Err(Error::Config("MIDI channels must be 0-15".to_string()));
        }
        if !(1..=127).contains(&self.velocity) {
            return Err(Error::Config("velocity must be 1-127".to_string()));
        }
        if self.frame_ms == 0 {
            return Err(Error::Config("frame_ms must be at least 1".to_string()));
        }
        Ok(())
    }
}

// <dir>/.strikepad/config.json
pub fn config_file_path(dir: &Path) -> PathBuf {
    dir.join(STRIKEPAD_DIR).join(CONFIG_FILE)
}

// Missing file means defaults; a file that exists but doesn't parse is an error
pub fn load_config(dir: &Path) -> Result<DeviceConfig> {
    let path = config_file_path(dir);
    if !path.exists() {
        return Ok(DeviceConfig::default());
    }
    let data = std::fs::read_to_string(&path)?;
    let config: DeviceConfig = serde_json::from_str(&data)?;
    config.validate()?;
    Ok(config)
}

// Save the config to disk, making the directory if it doesn't exist already
pub fn save_config(dir: &Path, config: &DeviceConfig) -> Result<()> {
    let path = config_file_path(dir);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?; // create .strikepad/ if needed
    }
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(&path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config, DeviceConfig::default());
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let config = DeviceConfig {
            heartbeat_ms: 750,
            synth_channel: 3,
            ..DeviceConfig::default()
        };
        save_config(dir.path(), &config).unwrap();
        assert_eq!(load_config(dir.path()).unwrap(), config);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file_path(dir.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, r#"{ "default_bpm": 90, "simulator": { "auto_pair": true } }"#).unwrap();

        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.default_bpm, 90);
        assert_eq!(config.heartbeat_ms, 2000);
        assert!(config.simulator.auto_pair);
        assert_eq!(config.simulator.poll_ms, 2);
    }

    #[test]
    fn bad_channel_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config = DeviceConfig {
            drum_channel: 16,
            ..DeviceConfig::default()
        };
        save_config(dir.path(), &config).unwrap();
        assert!(matches!(load_config(dir.path()), Err(Error::Config(_))));
    }
}
