//! Harness infrastructure errors.
//!
//! Test outcomes are never errors; these cover the machinery around them.

use thiserror::Error;
use vesselcheck_instrument::InstrumentError;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("instruments: {0}")]
    Instrument(#[from] InstrumentError),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("log serialization: {0}")]
    Serialize(#[from] serde_json::Error),
}
