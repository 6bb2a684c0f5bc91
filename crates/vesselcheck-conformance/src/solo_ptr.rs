//! Reference unique-ownership pointer.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::ptr;

use vesselcheck_harness::capability::{
    PointerFromBox, PointerFromValue, PointerGet, PointerRelease, PointerReset, PointerResetWith,
    PointerTake,
};

/// Sole owner of an optional heap payload. Deliberately not `Clone`.
pub struct SoloPtr<T> {
    payload: Option<Box<T>>,
}

impl<T> SoloPtr<T> {
    #[must_use]
    pub const fn empty() -> Self {
        Self { payload: None }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.payload.is_none()
    }

    #[must_use]
    pub fn payload(&self) -> Option<&T> {
        self.payload.as_deref()
    }
}

impl<T> Default for SoloPtr<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: fmt::Debug> fmt::Debug for SoloPtr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SoloPtr").field(&self.payload).finish()
    }
}

impl<T> PointerFromBox<T> for SoloPtr<T> {
    fn from_box(value: Box<T>) -> Self {
        Self {
            payload: Some(value),
        }
    }
}

impl<T> PointerFromValue<T> for SoloPtr<T> {
    fn from_value(value: T) -> Self {
        Self::from_box(Box::new(value))
    }
}

impl<T> PointerGet<T> for SoloPtr<T> {
    fn get(&self) -> *const T {
        self.payload.as_deref().map_or(ptr::null(), ptr::from_ref)
    }
}

impl<T> PointerRelease<T> for SoloPtr<T> {
    fn release(&mut self) -> Option<Box<T>> {
        self.payload.take()
    }
}

impl<T> PointerReset for SoloPtr<T> {
    fn reset(&mut self) {
        self.payload = None;
    }
}

impl<T> PointerResetWith<T> for SoloPtr<T> {
    fn reset_with(&mut self, value: Box<T>) {
        self.payload = Some(value);
    }
}

impl<T> PointerTake for SoloPtr<T> {
    fn take(&mut self) -> Self {
        Self {
            payload: self.payload.take(),
        }
    }
}

impl<T> Deref for SoloPtr<T> {
    type Target = T;

    fn deref(&self) -> &T {
        match &self.payload {
            Some(payload) => payload,
            None => panic!("dereferenced an empty SoloPtr"),
        }
    }
}

impl<T> DerefMut for SoloPtr<T> {
    fn deref_mut(&mut self) -> &mut T {
        match &mut self.payload {
            Some(payload) => payload,
            None => panic!("dereferenced an empty SoloPtr"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_hands_back_the_same_box() {
        let boxed = Box::new(17u64);
        let raw: *const u64 = &*boxed;
        let mut p = SoloPtr::from_box(boxed);
        assert_eq!(p.get(), raw);
        let released = p.release().unwrap();
        assert!(ptr::eq(&*released, raw));
        assert!(p.is_empty());
        assert!(p.release().is_none());
    }

    #[test]
    fn take_empties_the_source() {
        let mut p = SoloPtr::from_value(String::from("payload"));
        let q = p.take();
        assert!(p.get().is_null());
        assert_eq!(q.payload().map(String::as_str), Some("payload"));
        assert_eq!(q.len(), 7);
    }

    #[test]
    #[should_panic(expected = "empty SoloPtr")]
    fn deref_of_empty_panics() {
        let p: SoloPtr<u8> = SoloPtr::default();
        let _value = *p;
    }
}
