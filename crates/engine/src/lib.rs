// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Lease lock engine: acquisition, heartbeats, and critical sections

mod acquirer;
mod error;
mod facilitator;
mod local;
mod maintainer;
mod with_lock;

pub use acquirer::{Acquirer, HeldLease};
pub use error::AcquireError;
pub use facilitator::{LeaseLockFacilitator, LockFacilitator};
pub use local::LocalLockFacilitator;
pub use maintainer::{Maintainer, MaintainerHandle, MaintenanceEnd, MaintenanceOutcome};
pub use with_lock::WithLock;
