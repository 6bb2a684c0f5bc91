//! Reference dynamic array over a raw heap buffer.
//!
//! Storage doubles when full. Elements are relocated bitwise on growth, so
//! growth never clones; the old block is released after the copy.

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};
use std::ptr::{self, NonNull};

use vesselcheck_harness::capability::{
    ArrayAt, ArrayBack, ArrayCapacity, ArrayClear, ArrayEmpty, ArrayFront, ArrayPushBack,
    ArrayReserve, ArrayResize, ArraySize, OutOfRange,
};

const MIN_CAPACITY: usize = 4;

/// Growable array with geometric growth.
pub struct GrowVec<T> {
    buf: NonNull<T>,
    cap: usize,
    len: usize,
    _owns: PhantomData<T>,
}

// SAFETY: GrowVec owns its elements exclusively, like Vec<T>.
unsafe impl<T: Send> Send for GrowVec<T> {}
// SAFETY: shared access only hands out &T.
unsafe impl<T: Sync> Sync for GrowVec<T> {}

impl<T> GrowVec<T> {
    const ZST: bool = size_of::<T>() == 0;

    #[must_use]
    pub const fn new() -> Self {
        Self {
            buf: NonNull::dangling(),
            cap: if Self::ZST { usize::MAX } else { 0 },
            len: 0,
            _owns: PhantomData,
        }
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut vec = Self::new();
        vec.grow_to(capacity);
        vec
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: the first `len` slots are initialized and `buf` is aligned
        // and non-null even when nothing is allocated.
        unsafe { std::slice::from_raw_parts(self.buf.as_ptr(), self.len) }
    }

    #[must_use]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as in `as_slice`, with exclusive access through `&mut self`.
        unsafe { std::slice::from_raw_parts_mut(self.buf.as_ptr(), self.len) }
    }

    pub fn push(&mut self, value: T) {
        if self.len == self.cap {
            let doubled = self.cap.saturating_mul(2).max(MIN_CAPACITY);
            self.grow_to(doubled);
        }
        // SAFETY: len < cap after growth, so the slot is in bounds and unused.
        unsafe { self.buf.as_ptr().add(self.len).write(value) };
        self.len += 1;
    }

    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: the slot at the old last index was initialized and is now
        // outside `len`, so it is read exactly once.
        Some(unsafe { self.buf.as_ptr().add(self.len).read() })
    }

    /// Drop every element past `len`.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        let tail = self.len - len;
        // Shrink first so a panicking drop cannot cause a second drop.
        self.len = len;
        // SAFETY: slots [len, len + tail) were initialized and are now
        // outside the live range.
        unsafe {
            let start = self.buf.as_ptr().add(len);
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(start, tail));
        }
    }

    /// Reallocate to exactly `capacity` slots, moving elements bitwise.
    fn grow_to(&mut self, capacity: usize) {
        if Self::ZST || capacity <= self.cap {
            return;
        }
        let new_layout = match Layout::array::<T>(capacity) {
            Ok(layout) => layout,
            Err(_) => panic!("GrowVec capacity overflow"),
        };
        // SAFETY: new_layout has non-zero size (T is not zero-sized and
        // capacity > cap >= 0).
        let raw = unsafe { alloc::alloc(new_layout) };
        let Some(new_buf) = NonNull::new(raw.cast::<T>()) else {
            alloc::handle_alloc_error(new_layout);
        };
        if self.cap > 0 {
            // SAFETY: both blocks hold at least `len` slots and do not overlap.
            unsafe {
                ptr::copy_nonoverlapping(self.buf.as_ptr(), new_buf.as_ptr(), self.len);
                self.release_buffer();
            }
        }
        self.buf = new_buf;
        self.cap = capacity;
    }

    /// # Safety
    ///
    /// `cap` slots must be allocated and no live element may remain in them.
    unsafe fn release_buffer(&mut self) {
        // SAFETY: this layout succeeded when the block was allocated.
        let layout = unsafe { Layout::array::<T>(self.cap).unwrap_unchecked() };
        // SAFETY: the block was allocated with `layout` in `grow_to`.
        unsafe { alloc::dealloc(self.buf.as_ptr().cast(), layout) };
    }
}

impl<T> Default for GrowVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for GrowVec<T> {
    fn drop(&mut self) {
        self.truncate(0);
        if !Self::ZST && self.cap > 0 {
            // SAFETY: every element was dropped by `truncate`.
            unsafe { self.release_buffer() };
        }
    }
}

impl<T: Clone> Clone for GrowVec<T> {
    fn clone(&self) -> Self {
        let mut copy = Self::with_capacity(self.len);
        for item in self.as_slice() {
            copy.push(item.clone());
        }
        copy
    }

    /// Reuses existing elements through `clone_from` and only clones the rest.
    fn clone_from(&mut self, source: &Self) {
        self.truncate(source.len);
        let (head, tail) = source.as_slice().split_at(self.len);
        for (dst, src) in self.as_mut_slice().iter_mut().zip(head) {
            dst.clone_from(src);
        }
        self.grow_to(source.len);
        for item in tail {
            self.push(item.clone());
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for GrowVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T> Index<usize> for GrowVec<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.as_slice()[index]
    }
}

impl<T> IndexMut<usize> for GrowVec<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.as_mut_slice()[index]
    }
}

impl<T> ArraySize for GrowVec<T> {
    fn size(&self) -> usize {
        self.len
    }
}

impl<T> ArrayCapacity for GrowVec<T> {
    fn capacity(&self) -> usize {
        self.cap
    }
}

impl<T> ArrayEmpty for GrowVec<T> {
    fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<T> ArrayReserve for GrowVec<T> {
    fn reserve(&mut self, capacity: usize) {
        self.grow_to(capacity);
    }
}

impl<T> ArrayPushBack<T> for GrowVec<T> {
    fn push_back(&mut self, value: T) {
        self.push(value);
    }
}

impl<T> ArrayAt<T> for GrowVec<T> {
    fn at(&self, index: usize) -> Result<&T, OutOfRange> {
        self.as_slice().get(index).ok_or(OutOfRange {
            index,
            len: self.len,
        })
    }
}

impl<T> ArrayFront<T> for GrowVec<T> {
    fn front(&self) -> Option<&T> {
        self.as_slice().first()
    }
}

impl<T> ArrayBack<T> for GrowVec<T> {
    fn back(&self) -> Option<&T> {
        self.as_slice().last()
    }
}

impl<T> ArrayClear for GrowVec<T> {
    fn clear(&mut self) {
        self.truncate(0);
    }
}

impl<T: Clone> ArrayResize<T> for GrowVec<T> {
    fn resize(&mut self, len: usize, value: T) {
        if len <= self.len {
            self.truncate(len);
            return;
        }
        self.grow_to(len);
        for _ in self.len + 1..len {
            self.push(value.clone());
        }
        self.push(value);
    }
}
