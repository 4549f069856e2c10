//! Error types for sequencer operations

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SequencerError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Partitioner needs at least {needed} particles, got {got}")]
    TooFewParticles { needed: usize, got: usize },

    #[error("Event contains no particle candidates")]
    EmptyEvent,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
