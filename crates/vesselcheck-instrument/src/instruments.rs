//! Explicit counter bundle handed to every test body.
//!
//! The lifecycle and allocation counters live in thread-local storage. An
//! [`Instruments`] value is the single handle a test uses to reset and read
//! them; at most one exists per thread at a time, and it cannot leave the
//! thread that claimed it.

use std::cell::Cell;
use std::marker::PhantomData;

use thiserror::Error;

use crate::alloc_counter::{self, AllocationSnapshot};
use crate::lifecycle::{self, LifecycleSnapshot};

/// Errors produced while claiming the instruments.
#[derive(Debug, Error)]
pub enum InstrumentError {
    #[error("instruments already claimed on this thread")]
    AlreadyClaimed,
}

thread_local! {
    static CLAIMED: Cell<bool> = const { Cell::new(false) };
}

/// Combined lifecycle + allocation readings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstrumentSnapshot {
    pub lifecycle: LifecycleSnapshot,
    pub allocations: AllocationSnapshot,
}

/// Exclusive per-thread handle over the lifecycle and allocation counters.
#[derive(Debug)]
pub struct Instruments {
    _thread_bound: PhantomData<*const ()>,
}

impl Instruments {
    /// Claim the counters of the current thread.
    pub fn acquire() -> Result<Self, InstrumentError> {
        if CLAIMED.with(|c| c.replace(true)) {
            return Err(InstrumentError::AlreadyClaimed);
        }
        let mut instruments = Self {
            _thread_bound: PhantomData,
        };
        instruments.reset();
        Ok(instruments)
    }

    /// Zero every lifecycle and allocation counter.
    pub fn reset(&mut self) {
        lifecycle::reset();
        alloc_counter::reset();
    }

    #[must_use]
    pub fn lifecycle(&self) -> LifecycleSnapshot {
        lifecycle::snapshot()
    }

    #[must_use]
    pub fn allocations(&self) -> AllocationSnapshot {
        alloc_counter::snapshot()
    }

    #[must_use]
    pub fn snapshot(&self) -> InstrumentSnapshot {
        InstrumentSnapshot {
            lifecycle: self.lifecycle(),
            allocations: self.allocations(),
        }
    }

    /// Live instrumented items.
    #[must_use]
    pub fn alive(&self) -> i64 {
        self.lifecycle().alive()
    }

    /// Lifecycle invariant violations since the last reset.
    #[must_use]
    pub fn errors(&self) -> u64 {
        self.lifecycle().errors
    }

    /// Allocations not yet freed since the last reset.
    #[must_use]
    pub fn outstanding(&self) -> i64 {
        self.allocations().outstanding()
    }

    /// Whether allocation counts reflect real traffic.
    #[must_use]
    pub fn counts_allocations(&self) -> bool {
        alloc_counter::is_installed()
    }
}

impl Drop for Instruments {
    fn drop(&mut self) {
        let _ = CLAIMED.try_with(|c| c.set(false));
    }
}
