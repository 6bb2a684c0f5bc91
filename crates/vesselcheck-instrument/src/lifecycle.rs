//! Instrumented lifecycle item.
//!
//! [`LifecycleItem`] is the payload stored in containers and pointers under
//! test. Every construction, clone, move and drop is validated against a
//! status tag and a sentinel token and then tallied in per-thread counters:
//! - construction (`new`, `Default`) bumps `constructed`
//! - `Clone::clone` bumps `copy_constructed`, `Clone::clone_from` bumps `copy_assigned`
//! - [`LifecycleItem::take`] bumps `move_constructed`, [`LifecycleItem::move_assign`] bumps `move_assigned`
//! - `Drop` bumps `destroyed`
//!
//! Language-level moves are bitwise relocations and are not observable, so
//! they never touch the counters. Invariant violations are never raised as
//! panics; they increment the `errors` tally which tests inspect afterwards.
//!
//! Detection is sentinel based. Reading an item out of storage that was
//! released and reused can yield false positives (reuse clobbered the status
//! but kept the token) and false negatives (reuse left both intact). The
//! padding between `id` and the metadata fields keeps the status and token
//! away from the start of the storage, where allocator bookkeeping usually
//! lands, but does not close the gap.

#![allow(unsafe_code)]

use std::cell::Cell;
use std::ptr;

/// Sentinel stored in every properly constructed item.
pub const LIFECYCLE_TOKEN: u64 = 0x2c1d_d27f_0d59_cf3e;

/// Identity carried by an item after its value was moved out.
pub const MOVED_FROM_ID: i64 = -1;

/// Lifecycle state of an instrumented item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LifecycleStatus {
    Uninitialized = 0,
    Constructed = 1,
    MovedFrom = 2,
    Deleted = 3,
}

impl LifecycleStatus {
    /// Decode a raw status byte. Unknown values come from corrupted storage.
    #[must_use]
    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Uninitialized),
            1 => Some(Self::Constructed),
            2 => Some(Self::MovedFrom),
            3 => Some(Self::Deleted),
            _ => None,
        }
    }

    /// Human-readable status name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Uninitialized => "Uninitialized",
            Self::Constructed => "Constructed",
            Self::MovedFrom => "MovedFrom",
            Self::Deleted => "Deleted",
        }
    }
}

// ---------------------------------------------------------------------------
// Counters
// ---------------------------------------------------------------------------

struct LifecycleCounters {
    constructed: Cell<u64>,
    copy_constructed: Cell<u64>,
    move_constructed: Cell<u64>,
    copy_assigned: Cell<u64>,
    move_assigned: Cell<u64>,
    destroyed: Cell<u64>,
    errors: Cell<u64>,
}

impl LifecycleCounters {
    const fn new() -> Self {
        Self {
            constructed: Cell::new(0),
            copy_constructed: Cell::new(0),
            move_constructed: Cell::new(0),
            copy_assigned: Cell::new(0),
            move_assigned: Cell::new(0),
            destroyed: Cell::new(0),
            errors: Cell::new(0),
        }
    }
}

thread_local! {
    static COUNTERS: LifecycleCounters = const { LifecycleCounters::new() };
}

fn bump(select: fn(&LifecycleCounters) -> &Cell<u64>) {
    let _ = COUNTERS.try_with(|counters| {
        let cell = select(counters);
        cell.set(cell.get().wrapping_add(1));
    });
}

fn record_error() {
    bump(|c| &c.errors);
}

/// Point-in-time copy of the lifecycle counters of the current thread.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LifecycleSnapshot {
    pub constructed: u64,
    pub copy_constructed: u64,
    pub move_constructed: u64,
    pub copy_assigned: u64,
    pub move_assigned: u64,
    pub destroyed: u64,
    pub errors: u64,
}

impl LifecycleSnapshot {
    /// Items currently alive. Negative when more drops than constructions
    /// were observed (double drop).
    #[must_use]
    pub fn alive(&self) -> i64 {
        let created = self.constructed + self.copy_constructed + self.move_constructed;
        created as i64 - self.destroyed as i64
    }

    /// Clones performed, by construction or by assignment.
    #[must_use]
    pub fn copies(&self) -> u64 {
        self.copy_constructed + self.copy_assigned
    }

    /// Returns true if every counter is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// Read the lifecycle counters of the current thread.
#[must_use]
pub fn snapshot() -> LifecycleSnapshot {
    COUNTERS
        .try_with(|c| LifecycleSnapshot {
            constructed: c.constructed.get(),
            copy_constructed: c.copy_constructed.get(),
            move_constructed: c.move_constructed.get(),
            copy_assigned: c.copy_assigned.get(),
            move_assigned: c.move_assigned.get(),
            destroyed: c.destroyed.get(),
            errors: c.errors.get(),
        })
        .unwrap_or_default()
}

/// Zero every lifecycle counter of the current thread, including `errors`.
pub fn reset() {
    let _ = COUNTERS.try_with(|c| {
        for cell in [
            &c.constructed,
            &c.copy_constructed,
            &c.move_constructed,
            &c.copy_assigned,
            &c.move_assigned,
            &c.destroyed,
            &c.errors,
        ] {
            cell.set(0);
        }
    });
}

// ---------------------------------------------------------------------------
// Item
// ---------------------------------------------------------------------------

/// Payload value that makes its own lifecycle observable.
#[derive(Debug)]
#[repr(C)]
pub struct LifecycleItem {
    id: i64,
    _padding: [u8; 16],
    status: u8,
    token: u64,
}

impl LifecycleItem {
    /// Construct a live item.
    #[must_use]
    pub fn new(id: i64) -> Self {
        bump(|c| &c.constructed);
        Self::live(id)
    }

    const fn live(id: i64) -> Self {
        Self {
            id,
            _padding: [0; 16],
            status: LifecycleStatus::Constructed as u8,
            token: LIFECYCLE_TOKEN,
        }
    }

    /// Construct a live item in place at `slot`.
    ///
    /// Records an error if `slot` still holds a live item.
    ///
    /// # Safety
    ///
    /// `slot` must be valid for reads and writes of a `LifecycleItem`, properly
    /// aligned, and its bytes must be initialized (zeroed, or holding an item
    /// whether live or already dropped). Any live item at `slot` is overwritten
    /// without being dropped.
    pub unsafe fn construct_at(slot: *mut LifecycleItem, id: i64) {
        // SAFETY: caller guarantees slot is valid, aligned and initialized.
        let (token, status) = unsafe {
            (
                ptr::read_volatile(ptr::addr_of!((*slot).token)),
                ptr::read_volatile(ptr::addr_of!((*slot).status)),
            )
        };
        if token == LIFECYCLE_TOKEN && status != LifecycleStatus::Deleted as u8 {
            record_error();
        }
        bump(|c| &c.constructed);
        // SAFETY: caller guarantees slot is valid for writes.
        unsafe { ptr::write(slot, Self::live(id)) };
    }

    /// Move-construct: the value leaves `self`, which becomes `MovedFrom`.
    #[must_use]
    pub fn take(&mut self) -> Self {
        let id = self.read_source();
        self.mark_moved_from();
        bump(|c| &c.move_constructed);
        Self::live(id)
    }

    /// Move-assign: `self` receives the value of `source`, which becomes `MovedFrom`.
    pub fn move_assign(&mut self, source: &mut Self) {
        let id = source.read_source();
        self.assign(id);
        source.mark_moved_from();
        bump(|c| &c.move_assigned);
    }

    /// Identity value. Reading it from a dead or moved-from item is an error.
    #[must_use]
    pub fn id(&self) -> i64 {
        self.read_source()
    }

    /// Current status, or `None` if the status byte is corrupt.
    #[must_use]
    pub fn status(&self) -> Option<LifecycleStatus> {
        LifecycleStatus::from_raw(self.load_status())
    }

    /// Returns true if the item carries the sentinel and is `Constructed`.
    /// Does not touch the counters.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.load_token() == LIFECYCLE_TOKEN
            && self.load_status() == LifecycleStatus::Constructed as u8
    }

    fn load_status(&self) -> u8 {
        // SAFETY: reference to an initialized u8 field.
        unsafe { ptr::read_volatile(&self.status) }
    }

    fn load_token(&self) -> u64 {
        // SAFETY: reference to an initialized u64 field.
        unsafe { ptr::read_volatile(&self.token) }
    }

    fn store_status(&mut self, status: LifecycleStatus) {
        // SAFETY: exclusive reference to an initialized u8 field.
        unsafe { ptr::write_volatile(&mut self.status, status as u8) };
    }

    /// Validate `self` as a data source and return its identity.
    fn read_source(&self) -> i64 {
        if self.load_token() != LIFECYCLE_TOKEN {
            record_error();
        }
        match self.status() {
            Some(LifecycleStatus::Deleted | LifecycleStatus::MovedFrom) | None => record_error(),
            Some(_) => {}
        }
        self.id
    }

    /// Assignment targets must be constructed storage that has not been
    /// dropped. Moved-from targets are fine.
    fn check_target(&self) {
        if self.load_token() != LIFECYCLE_TOKEN {
            record_error();
        }
        match self.status() {
            Some(LifecycleStatus::Deleted | LifecycleStatus::Uninitialized) | None => {
                record_error();
            }
            Some(_) => {}
        }
    }

    /// Store an assigned identity. A moved-from target becomes live again.
    fn assign(&mut self, id: i64) {
        self.check_target();
        self.id = id;
        if self.status() == Some(LifecycleStatus::MovedFrom) {
            self.store_status(LifecycleStatus::Constructed);
        }
    }

    fn mark_moved_from(&mut self) {
        self.id = MOVED_FROM_ID;
        self.store_status(LifecycleStatus::MovedFrom);
    }
}

impl Default for LifecycleItem {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Clone for LifecycleItem {
    fn clone(&self) -> Self {
        let id = self.read_source();
        bump(|c| &c.copy_constructed);
        Self::live(id)
    }

    fn clone_from(&mut self, source: &Self) {
        let id = source.read_source();
        self.assign(id);
        bump(|c| &c.copy_assigned);
    }
}

impl Drop for LifecycleItem {
    fn drop(&mut self) {
        if self.load_token() != LIFECYCLE_TOKEN {
            record_error();
        }
        if self.load_status() == LifecycleStatus::Deleted as u8 {
            record_error();
        }
        self.store_status(LifecycleStatus::Deleted);
        bump(|c| &c.destroyed);
    }
}
