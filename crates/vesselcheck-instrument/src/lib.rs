//! Instrumentation for container and smart-pointer conformance tests.
//!
//! - **Lifecycle item** (`lifecycle`): payload that validates and counts its
//!   own constructions, clones, moves and drops
//! - **Allocation counter** (`alloc_counter`): counting `GlobalAlloc` over `System`
//! - **Instruments** (`instruments`): the per-thread handle tests reset and read

#![deny(unsafe_code)]

pub mod alloc_counter;
pub mod instruments;
pub mod lifecycle;

pub use alloc_counter::{AllocationSnapshot, CountingAllocator};
pub use instruments::{InstrumentError, InstrumentSnapshot, Instruments};
pub use lifecycle::{LIFECYCLE_TOKEN, LifecycleItem, LifecycleSnapshot, LifecycleStatus, MOVED_FROM_ID};
