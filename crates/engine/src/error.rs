// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for lease acquisition

use tenure_core::StoreError;
use thiserror::Error;

/// Why a lease could not be acquired.
///
/// Version conflicts never appear here: they are retried until the attempt
/// budget runs out.
#[derive(Debug, Error)]
pub enum AcquireError {
    #[error("exhausted allowed attempts to acquire lock for {key} after {attempts} attempts")]
    Exhausted { key: String, attempts: u32 },
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AcquireError {
    pub fn is_exhausted(&self) -> bool {
        matches!(self, AcquireError::Exhausted { .. })
    }
}
