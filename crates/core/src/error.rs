//! Core shared errors (renderer-agnostic).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Sync buffer too short: needed {needed} bytes at offset {offset}, have {len}")]
    Truncated {
        offset: usize,
        needed: usize,
        len: usize,
    },
}

pub type CoreResult<T> = Result<T, CoreError>;
