//! Reference shared-ownership pointer.
//!
//! The payload box is kept as allocated, so every owner reports the address
//! the payload was constructed at.

use std::fmt;
use std::ops::Deref;
use std::ptr;
use std::rc::Rc;

use vesselcheck_harness::capability::{
    PointerFromBox, PointerFromValue, PointerGet, PointerReset, PointerResetWith, PointerUseCount,
};

/// Reference-counted owner of an optional heap payload.
pub struct SharedPtr<T> {
    shared: Option<Rc<Box<T>>>,
}

impl<T> SharedPtr<T> {
    #[must_use]
    pub const fn empty() -> Self {
        Self { shared: None }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shared.is_none()
    }

    /// Returns true if both owners share one payload.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.shared, &other.shared) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl<T> Default for SharedPtr<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Clone for SharedPtr<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for SharedPtr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedPtr")
            .field("payload", &self.shared.as_deref())
            .field("use_count", &self.use_count())
            .finish()
    }
}

impl<T> PointerFromBox<T> for SharedPtr<T> {
    fn from_box(value: Box<T>) -> Self {
        Self {
            shared: Some(Rc::new(value)),
        }
    }
}

impl<T> PointerFromValue<T> for SharedPtr<T> {
    fn from_value(value: T) -> Self {
        Self::from_box(Box::new(value))
    }
}

impl<T> PointerGet<T> for SharedPtr<T> {
    fn get(&self) -> *const T {
        self.shared
            .as_deref()
            .map_or(ptr::null(), |payload| ptr::from_ref(&**payload))
    }
}

impl<T> PointerReset for SharedPtr<T> {
    fn reset(&mut self) {
        self.shared = None;
    }
}

impl<T> PointerResetWith<T> for SharedPtr<T> {
    fn reset_with(&mut self, value: Box<T>) {
        self.shared = Some(Rc::new(value));
    }
}

impl<T> PointerUseCount for SharedPtr<T> {
    fn use_count(&self) -> usize {
        self.shared.as_ref().map_or(0, Rc::strong_count)
    }
}

impl<T> Deref for SharedPtr<T> {
    type Target = T;

    fn deref(&self) -> &T {
        match &self.shared {
            Some(payload) => payload,
            None => panic!("dereferenced an empty SharedPtr"),
        }
    }
}
