//! Deliberately broken implementations.
//!
//! Each type is correct apart from one defect, so a run against it shows
//! which classification that defect produces.

use std::ops::{Deref, Index};
use std::ptr;

use vesselcheck_harness::capability::{
    ArrayAt, ArrayBack, ArrayCapacity, ArrayClear, ArrayEmpty, ArrayFront, ArrayPushBack,
    ArrayReserve, ArrayResize, ArraySize, OutOfRange, PointerFromBox, PointerGet, PointerReset,
    PointerResetWith, PointerTake, PointerUseCount,
};

const MIN_CAPACITY: usize = 4;

fn grown_capacity(current: usize) -> usize {
    current.saturating_mul(2).max(MIN_CAPACITY)
}

/// Read-only array operations shared by every `Vec`-backed defect.
macro_rules! vec_backed {
    ($name:ident) => {
        impl<T> Default for $name<T> {
            fn default() -> Self {
                Self(Vec::new())
            }
        }

        impl<T> ArraySize for $name<T> {
            fn size(&self) -> usize {
                self.0.len()
            }
        }

        impl<T> ArrayCapacity for $name<T> {
            fn capacity(&self) -> usize {
                self.0.capacity()
            }
        }

        impl<T> ArrayEmpty for $name<T> {
            fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl<T> Index<usize> for $name<T> {
            type Output = T;

            fn index(&self, index: usize) -> &T {
                &self.0[index]
            }
        }

        impl<T> ArrayFront<T> for $name<T> {
            fn front(&self) -> Option<&T> {
                self.0.first()
            }
        }

        impl<T> ArrayBack<T> for $name<T> {
            fn back(&self) -> Option<&T> {
                self.0.last()
            }
        }
    };
}

/// Grows by cloning every element into the new block.
///
/// Results stay correct; growth-sensitive tests report suboptimal copies.
#[derive(Debug, Clone)]
pub struct CopyingVec<T>(Vec<T>);

vec_backed!(CopyingVec);

impl<T: Clone> CopyingVec<T> {
    fn regrow(&mut self, capacity: usize) {
        let mut grown = Vec::with_capacity(capacity);
        for item in &self.0 {
            grown.push(item.clone());
        }
        self.0 = grown;
    }
}

impl<T: Clone> ArrayPushBack<T> for CopyingVec<T> {
    fn push_back(&mut self, value: T) {
        if self.0.len() == self.0.capacity() {
            self.regrow(grown_capacity(self.0.capacity()));
        }
        self.0.push(value);
    }
}

impl<T: Clone> ArrayReserve for CopyingVec<T> {
    fn reserve(&mut self, capacity: usize) {
        if capacity > self.0.capacity() {
            self.regrow(capacity);
        }
    }
}

/// Moves elements on growth but never frees the old block.
#[derive(Debug, Clone)]
pub struct LeakyVec<T>(Vec<T>);

vec_backed!(LeakyVec);

impl<T> ArrayPushBack<T> for LeakyVec<T> {
    fn push_back(&mut self, value: T) {
        if self.0.len() == self.0.capacity() {
            let grown = Vec::with_capacity(grown_capacity(self.0.capacity()));
            let mut old = std::mem::replace(&mut self.0, grown);
            self.0.extend(old.drain(..));
            std::mem::forget(old);
        }
        self.0.push(value);
    }
}

impl<T> ArrayClear for LeakyVec<T> {
    fn clear(&mut self) {
        self.0.clear();
    }
}

/// `clear` forgets its elements instead of dropping them.
#[derive(Debug, Clone)]
pub struct ForgetfulVec<T>(Vec<T>);

vec_backed!(ForgetfulVec);

impl<T> ArrayPushBack<T> for ForgetfulVec<T> {
    fn push_back(&mut self, value: T) {
        self.0.push(value);
    }
}

impl<T> ArrayClear for ForgetfulVec<T> {
    fn clear(&mut self) {
        for item in self.0.drain(..) {
            std::mem::forget(item);
        }
    }
}

impl<T: Clone> ArrayResize<T> for ForgetfulVec<T> {
    fn resize(&mut self, len: usize, value: T) {
        self.0.resize(len, value);
    }
}

/// `at` clamps out-of-range indices to the last element.
#[derive(Debug, Clone)]
pub struct UncheckedAtVec<T>(Vec<T>);

vec_backed!(UncheckedAtVec);

impl<T> ArrayPushBack<T> for UncheckedAtVec<T> {
    fn push_back(&mut self, value: T) {
        self.0.push(value);
    }
}

impl<T> ArrayAt<T> for UncheckedAtVec<T> {
    fn at(&self, index: usize) -> Result<&T, OutOfRange> {
        self.0
            .get(index)
            .or_else(|| self.0.last())
            .ok_or(OutOfRange {
                index,
                len: self.0.len(),
            })
    }
}

/// A unique pointer that can be cloned, duplicating its payload.
#[derive(Debug, Clone)]
pub struct CloningPtr<T>(Option<Box<T>>);

impl<T> Default for CloningPtr<T> {
    fn default() -> Self {
        Self(None)
    }
}

impl<T> PointerFromBox<T> for CloningPtr<T> {
    fn from_box(value: Box<T>) -> Self {
        Self(Some(value))
    }
}

impl<T> PointerGet<T> for CloningPtr<T> {
    fn get(&self) -> *const T {
        self.0.as_deref().map_or(ptr::null(), ptr::from_ref)
    }
}

impl<T> PointerTake for CloningPtr<T> {
    fn take(&mut self) -> Self {
        Self(self.0.take())
    }
}

impl<T> Deref for CloningPtr<T> {
    type Target = T;

    fn deref(&self) -> &T {
        match &self.0 {
            Some(payload) => payload,
            None => panic!("dereferenced an empty CloningPtr"),
        }
    }
}

/// A "shared" pointer whose clones deep-copy the payload.
#[derive(Debug, Clone)]
pub struct DeepCopyPtr<T>(Option<Box<T>>);

impl<T> Default for DeepCopyPtr<T> {
    fn default() -> Self {
        Self(None)
    }
}

impl<T> PointerFromBox<T> for DeepCopyPtr<T> {
    fn from_box(value: Box<T>) -> Self {
        Self(Some(value))
    }
}

impl<T> PointerGet<T> for DeepCopyPtr<T> {
    fn get(&self) -> *const T {
        self.0.as_deref().map_or(ptr::null(), ptr::from_ref)
    }
}

impl<T> PointerReset for DeepCopyPtr<T> {
    fn reset(&mut self) {
        self.0 = None;
    }
}

impl<T> PointerResetWith<T> for DeepCopyPtr<T> {
    fn reset_with(&mut self, value: Box<T>) {
        self.0 = Some(value);
    }
}

impl<T> PointerUseCount for DeepCopyPtr<T> {
    fn use_count(&self) -> usize {
        usize::from(self.0.is_some())
    }
}
