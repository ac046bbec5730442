//! Crate-level error type.
//!
//! Each layer defines its own error enum; this type unifies them for callers
//! that drive the whole fixture (start topology, connect, run checks).

use thiserror::Error;

use crate::client::ValkeyError;
use crate::harness::SmokeError;
use crate::topology::TopologyError;
use crate::wait::WaitError;

/// Error type for fixture operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Container or network failure
    #[error("Topology error: {0}")]
    Topology(#[from] TopologyError),

    /// Client failure
    #[error("Valkey error: {0}")]
    Valkey(#[from] ValkeyError),

    /// A smoke check observed an unexpected reply
    #[error("Smoke check failed: {0}")]
    Smoke(#[from] SmokeError),

    /// A wait gave up
    #[error("Wait failed: {0}")]
    Wait(#[from] WaitError),
}

/// Result type alias for fixture operations
pub type Result<T> = std::result::Result<T, Error>;
