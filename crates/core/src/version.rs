// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Version token generation

use crate::record::VersionToken;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Generates a fresh token for every lease write
pub trait VersionGen: Clone + Send + Sync + 'static {
    fn next(&self) -> VersionToken;
}

/// UUID-based generator for production use
#[derive(Clone, Default)]
pub struct UuidVersionGen;

impl VersionGen for UuidVersionGen {
    fn next(&self) -> VersionToken {
        VersionToken(uuid::Uuid::new_v4().to_string())
    }
}

/// Sequential generator for testing
#[derive(Clone)]
pub struct SequentialVersionGen {
    prefix: String,
    counter: Arc<AtomicU64>,
}

impl SequentialVersionGen {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: Arc::new(AtomicU64::new(1)),
        }
    }
}

impl Default for SequentialVersionGen {
    fn default() -> Self {
        Self::new("v")
    }
}

impl VersionGen for SequentialVersionGen {
    fn next(&self) -> VersionToken {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        VersionToken(format!("{}-{}", self.prefix, n))
    }
}
