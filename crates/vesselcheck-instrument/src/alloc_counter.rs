//! Counting global allocator.
//!
//! Wraps [`System`] and tallies allocation and deallocation calls made by the
//! current thread. `realloc` counts as one allocation plus one deallocation,
//! the same as an explicit allocate/copy/free sequence, so a reallocating
//! container keeps `outstanding` stable across growth.
//!
//! With the `counting-allocator` feature (default) the allocator is installed
//! as the process `#[global_allocator]`. Without it the counters stay at zero
//! and [`is_installed`] reports false.

#![allow(unsafe_code)]

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};

/// System allocator wrapper with per-thread call counters.
pub struct CountingAllocator;

struct AllocationCounters {
    allocations: Cell<u64>,
    deallocations: Cell<u64>,
}

thread_local! {
    static COUNTERS: AllocationCounters = const {
        AllocationCounters {
            allocations: Cell::new(0),
            deallocations: Cell::new(0),
        }
    };
}

static INSTALLED: AtomicBool = AtomicBool::new(false);

fn note(allocations: u64, deallocations: u64) {
    INSTALLED.store(true, Ordering::Relaxed);
    let _ = COUNTERS.try_with(|c| {
        c.allocations.set(c.allocations.get().wrapping_add(allocations));
        c.deallocations.set(c.deallocations.get().wrapping_add(deallocations));
    });
}

unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        note(1, 0);
        unsafe { System.alloc(layout) }
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        note(1, 0);
        unsafe { System.alloc_zeroed(layout) }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        note(0, 1);
        unsafe { System.dealloc(ptr, layout) }
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        note(1, 1);
        unsafe { System.realloc(ptr, layout, new_size) }
    }
}

#[cfg(feature = "counting-allocator")]
#[global_allocator]
static GLOBAL: CountingAllocator = CountingAllocator;

/// Point-in-time copy of the allocation counters of the current thread.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllocationSnapshot {
    pub allocations: u64,
    pub deallocations: u64,
}

impl AllocationSnapshot {
    /// Allocations not yet freed. Negative when frees outnumber allocations
    /// since the last reset (storage allocated before the reset was released).
    #[must_use]
    pub fn outstanding(&self) -> i64 {
        self.allocations as i64 - self.deallocations as i64
    }

    /// Returns true if allocations and deallocations balance.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.allocations == self.deallocations
    }
}

/// Read the allocation counters of the current thread.
#[must_use]
pub fn snapshot() -> AllocationSnapshot {
    COUNTERS
        .try_with(|c| AllocationSnapshot {
            allocations: c.allocations.get(),
            deallocations: c.deallocations.get(),
        })
        .unwrap_or_default()
}

/// Zero both allocation counters of the current thread.
pub fn reset() {
    let _ = COUNTERS.try_with(|c| {
        c.allocations.set(0);
        c.deallocations.set(0);
    });
}

/// Returns true once the counting allocator has served any request.
#[must_use]
pub fn is_installed() -> bool {
    INSTALLED.load(Ordering::Relaxed)
}
