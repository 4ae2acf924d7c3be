// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lease store implementations

mod file;
mod memory;

pub use file::FileLeaseStore;
pub use memory::MemoryLeaseStore;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeLeaseStore, StoreCall, WriteFault};
