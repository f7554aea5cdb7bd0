//! Error taxonomy
//!
//! Only data-integrity problems (unknown ids, malformed tables) and misuse of
//! the run lifecycle are errors. Ordinary gameplay conditions never fail.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Unknown weapon: {0}")]
    UnknownWeapon(String),

    #[error("Unknown enemy: {0}")]
    UnknownEnemy(String),

    #[error("Unknown character: {0}")]
    UnknownCharacter(String),

    #[error("Unknown upgrade: {0}")]
    UnknownUpgrade(String),

    #[error("Upgrade {0} is not among the pending offers")]
    UpgradeNotOffered(String),

    #[error("No run in progress")]
    NoActiveRun,

    #[error("Invalid content: {0}")]
    InvalidContent(String),

    #[error("Invalid tuning: {0}")]
    InvalidTuning(String),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
