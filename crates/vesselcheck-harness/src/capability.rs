//! Operation vocabulary and the traits a type under test may implement.
//!
//! A type never declares which family it belongs to or which operations it
//! supports. It implements any subset of the traits below (plus the std
//! traits `Default`, `Clone`, `Index<usize>` and `Deref` where Rust already
//! names the operation), and the probes in [`crate::probe`] discover the
//! subset at compile time.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Abstraction family of a type under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    Array,
    UniquePointer,
    SharedPointer,
}

impl Family {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Array => "array",
            Self::UniquePointer => "unique_pointer",
            Self::SharedPointer => "shared_pointer",
        }
    }

    /// Pointer reports list their operations under a "Class methods:" heading.
    #[must_use]
    pub const fn is_pointer(self) -> bool {
        !matches!(self, Self::Array)
    }
}

/// One probed operation, across all families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Operation {
    Default,
    Size,
    Capacity,
    Empty,
    Reserve,
    PushBack,
    Index,
    At,
    Front,
    Back,
    Clear,
    Resize,
    CopyConstruct,
    CopyAssign,
    MoveConstruct,
    MoveAssign,
    Destroy,
    FromBox,
    FromValue,
    Take,
    ResetEmpty,
    ResetWith,
    Release,
    Get,
    Deref,
    UseCount,
}

impl Operation {
    /// Display name used in reports and notices.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Default => "constructor (default)",
            Self::Size => "size",
            Self::Capacity => "capacity",
            Self::Empty => "empty",
            Self::Reserve => "reserve",
            Self::PushBack => "push_back",
            Self::Index => "index",
            Self::At => "at",
            Self::Front => "front",
            Self::Back => "back",
            Self::Clear => "clear",
            Self::Resize => "resize",
            Self::CopyConstruct => "copy constructor",
            Self::CopyAssign => "copy assignment",
            Self::MoveConstruct => "move constructor",
            Self::MoveAssign => "move assignment",
            Self::Destroy => "destructor",
            Self::FromBox => "constructor (pointer)",
            Self::FromValue => "constructor (val)",
            Self::Take => "take",
            Self::ResetEmpty => "reset()",
            Self::ResetWith => "reset(value)",
            Self::Release => "release",
            Self::Get => "get",
            Self::Deref => "dereference",
            Self::UseCount => "use_count",
        }
    }

    /// Operations every Rust type has: bitwise moves and drop.
    pub const LANGUAGE: [Operation; 3] = [Self::MoveConstruct, Self::MoveAssign, Self::Destroy];

    const fn bit(self) -> u32 {
        1 << (self as u8)
    }
}

/// Join operation names with ", " for notices.
#[must_use]
pub fn join_names(ops: &[Operation]) -> String {
    ops.iter().map(|op| op.name()).collect::<Vec<_>>().join(", ")
}

/// Set of operations a type under test exposes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CapabilitySet {
    bits: u32,
}

impl CapabilitySet {
    #[must_use]
    pub const fn new() -> Self {
        Self { bits: 0 }
    }

    /// Set holding only the operations every type has.
    #[must_use]
    pub const fn language() -> Self {
        let mut set = Self::new();
        let mut i = 0;
        while i < Operation::LANGUAGE.len() {
            set.bits |= Operation::LANGUAGE[i].bit();
            i += 1;
        }
        set
    }

    /// Record the outcome of one probe.
    #[must_use]
    pub const fn with(mut self, op: Operation, present: bool) -> Self {
        if present {
            self.bits |= op.bit();
        } else {
            self.bits &= !op.bit();
        }
        self
    }

    #[must_use]
    pub const fn contains(&self, op: Operation) -> bool {
        self.bits & op.bit() != 0
    }

    /// Every operation in `ops` is present.
    #[must_use]
    pub fn contains_all(&self, ops: &[Operation]) -> bool {
        ops.iter().all(|&op| self.contains(op))
    }

    /// Operations of `ops` that are present, in the given order.
    #[must_use]
    pub fn present(&self, ops: &[Operation]) -> Vec<Operation> {
        ops.iter().copied().filter(|&op| self.contains(op)).collect()
    }

    /// Operations of `ops` that are absent, in the given order.
    #[must_use]
    pub fn missing(&self, ops: &[Operation]) -> Vec<Operation> {
        ops.iter().copied().filter(|&op| !self.contains(op)).collect()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }
}

/// Bounds-checked access past the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("index {index} out of range for length {len}")]
pub struct OutOfRange {
    pub index: usize,
    pub len: usize,
}

// ---------------------------------------------------------------------------
// Array operations
// ---------------------------------------------------------------------------

pub trait ArraySize {
    fn size(&self) -> usize;
}

pub trait ArrayCapacity {
    fn capacity(&self) -> usize;
}

pub trait ArrayEmpty {
    fn is_empty(&self) -> bool;
}

/// Ensure room for at least `capacity` elements in total.
pub trait ArrayReserve {
    fn reserve(&mut self, capacity: usize);
}

pub trait ArrayPushBack<T> {
    fn push_back(&mut self, value: T);
}

/// Bounds-checked element access.
pub trait ArrayAt<T> {
    fn at(&self, index: usize) -> Result<&T, OutOfRange>;
}

pub trait ArrayFront<T> {
    fn front(&self) -> Option<&T>;
}

pub trait ArrayBack<T> {
    fn back(&self) -> Option<&T>;
}

pub trait ArrayClear {
    fn clear(&mut self);
}

/// Truncate to `len`, or extend to `len` with copies of `value`.
pub trait ArrayResize<T> {
    fn resize(&mut self, len: usize, value: T);
}

// ---------------------------------------------------------------------------
// Pointer operations
// ---------------------------------------------------------------------------

/// Take ownership of a heap payload.
pub trait PointerFromBox<T>: Sized {
    fn from_box(value: Box<T>) -> Self;
}

/// Allocate a payload from a value.
pub trait PointerFromValue<T>: Sized {
    fn from_value(value: T) -> Self;
}

/// Raw address of the payload, null when empty.
pub trait PointerGet<T> {
    fn get(&self) -> *const T;
}

/// Give up ownership without dropping the payload.
pub trait PointerRelease<T> {
    fn release(&mut self) -> Option<Box<T>>;
}

/// Drop the payload (or this owner's share of it) and become empty.
pub trait PointerReset {
    fn reset(&mut self);
}

/// Replace the payload.
pub trait PointerResetWith<T> {
    fn reset_with(&mut self, value: Box<T>);
}

/// Move the pointer out, leaving `self` empty.
pub trait PointerTake: Sized {
    fn take(&mut self) -> Self;
}

/// Number of owners sharing the payload, 0 when empty.
pub trait PointerUseCount {
    fn use_count(&self) -> usize;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_operations_always_present() {
        let set = CapabilitySet::language();
        assert!(set.contains(Operation::MoveConstruct));
        assert!(set.contains(Operation::Destroy));
        assert!(!set.contains(Operation::Size));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn missing_preserves_order() {
        let set = CapabilitySet::new()
            .with(Operation::Size, true)
            .with(Operation::PushBack, false);
        let missing = set.missing(&[Operation::PushBack, Operation::Size, Operation::Capacity]);
        assert_eq!(missing, vec![Operation::PushBack, Operation::Capacity]);
        assert_eq!(join_names(&missing), "push_back, capacity");
    }

    #[test]
    fn with_false_clears_bit() {
        let set = CapabilitySet::language().with(Operation::Destroy, false);
        assert!(!set.contains(Operation::Destroy));
    }

    #[test]
    fn out_of_range_message() {
        let err = OutOfRange { index: 2, len: 2 };
        assert_eq!(err.to_string(), "index 2 out of range for length 2");
    }

    #[test]
    fn pointer_families_list_class_methods() {
        assert!(!Family::Array.is_pointer());
        assert!(Family::SharedPointer.is_pointer());
    }
}
