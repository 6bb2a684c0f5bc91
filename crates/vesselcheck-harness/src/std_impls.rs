//! Capability impls for `Vec<T>`, so the standard vector can be run
//! through the array suite as a baseline.

use crate::capability::{
    ArrayAt, ArrayBack, ArrayCapacity, ArrayClear, ArrayEmpty, ArrayFront, ArrayPushBack,
    ArrayReserve, ArrayResize, ArraySize, OutOfRange,
};

impl<T> ArraySize for Vec<T> {
    fn size(&self) -> usize {
        self.len()
    }
}

impl<T> ArrayCapacity for Vec<T> {
    fn capacity(&self) -> usize {
        Vec::capacity(self)
    }
}

impl<T> ArrayEmpty for Vec<T> {
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> ArrayReserve for Vec<T> {
    fn reserve(&mut self, capacity: usize) {
        let additional = capacity.saturating_sub(self.len());
        Vec::reserve(self, additional);
    }
}

impl<T> ArrayPushBack<T> for Vec<T> {
    fn push_back(&mut self, value: T) {
        self.push(value);
    }
}

impl<T> ArrayAt<T> for Vec<T> {
    fn at(&self, index: usize) -> Result<&T, OutOfRange> {
        self.get(index).ok_or(OutOfRange {
            index,
            len: self.len(),
        })
    }
}

impl<T> ArrayFront<T> for Vec<T> {
    fn front(&self) -> Option<&T> {
        self.first()
    }
}

impl<T> ArrayBack<T> for Vec<T> {
    fn back(&self) -> Option<&T> {
        self.last()
    }
}

impl<T> ArrayClear for Vec<T> {
    fn clear(&mut self) {
        Vec::clear(self);
    }
}

impl<T: Clone> ArrayResize<T> for Vec<T> {
    fn resize(&mut self, len: usize, value: T) {
        Vec::resize(self, len, value);
    }
}
