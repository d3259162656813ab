//! Error types for the toys.
//!
//! Simulation code never fails: out-of-range input degrades to a no-op. These
//! errors cover the edges around it (configuration files, toy names).

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed configuration JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),
}
