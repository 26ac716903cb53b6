//! Error types for the simulation core.
//!
//! Nothing here is fatal: purchase errors are logged and dropped by the frame
//! loop, save errors are handed to the caller so it can fall back to a fresh
//! session.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PurchaseError {
    #[error("not enough money: upgrade costs {cost}, wallet holds {wallet}")]
    InsufficientFunds { cost: u32, wallet: u32 },

    #[error("stat '{0}' not found")]
    UnknownStat(String),
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("no save file at {0}")]
    NotFound(PathBuf),

    #[error("save file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not decrypt save data: {0}")]
    Decrypt(String),

    #[error("could not parse save data: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("could not encode save data: {0}")]
    Encode(#[from] ron::Error),

    #[error("invalid save data: missing '{0}'")]
    MissingField(&'static str),

    #[error("invalid save data: {field} {reason}")]
    InvalidRecord { field: &'static str, reason: String },
}

pub type SaveResult<T> = Result<T, SaveError>;
