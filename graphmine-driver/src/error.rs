//! Driver-level errors: wraps core errors and I/O/argument failures, and
//! maps to the exit codes spec §6 defines.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Core(#[from] graphmine_core::MiningError),
}

impl DriverError {
    /// 2 for malformed input or an unsupported flag combination, 1 for
    /// anything else — spec §6's exit code table.
    pub fn exit_code(&self) -> i32 {
        match self {
            DriverError::InvalidInput(_) => 2,
            DriverError::Core(graphmine_core::MiningError::UnsupportedK { .. }) => 2,
            _ => 1,
        }
    }
}
