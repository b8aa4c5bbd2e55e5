//! Error types for the control core

use thiserror::Error;

/// Result type alias for strikepad operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the control core.
///
/// None of these are fatal inside the poll cycle: the controller logs them and
/// drops the action that caused them.
#[derive(Debug, Error)]
pub enum Error {
    /// An index was outside its fixed table
    #[error("{kind} index {value} out of range (limit {limit})")]
    OutOfRange {
        kind: &'static str,
        value: u8,
        limit: u8,
    },

    /// Too many solenoids are already energized
    #[error("solenoid budget exhausted ({active} active)")]
    SolenoidBudget { active: usize },

    /// The sync queue has no free slot
    #[error("sync queue full, dropped control {control:#04x}")]
    QueueFull { control: u8 },

    /// An inbound packet could not be decoded
    #[error("malformed packet: {0}")]
    Malformed(&'static str),

    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
