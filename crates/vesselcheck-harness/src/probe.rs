//! Compile-time capability probes.
//!
//! Probing uses autoref-based dispatch on [`Probe`]: a block-local `Present`
//! trait is implemented for `Probe<P>` only when `P` satisfies the bounds, and
//! a fallback `Absent` trait is implemented for `&Probe<P>` unconditionally.
//! Method resolution tries the by-reference receiver first, so the call lands
//! on `Present` exactly when the bounds hold. A missing operation therefore
//! never produces an instantiation error.
//!
//! Probes only see through concrete types. Inside a generic function,
//! `implements!(T: Trait)` reports what the bounds on `T` prove, not what the
//! eventual instantiation implements, so every subject macro is expanded at a
//! call site that names the concrete type.

use std::marker::PhantomData;

/// Zero-sized carrier for the type being probed.
pub struct Probe<T: ?Sized>(PhantomData<T>);

impl<T: ?Sized> Probe<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

/// Evaluate whether a concrete type satisfies a set of trait bounds.
///
/// ```
/// use vesselcheck_harness::implements;
///
/// assert!(implements!(Vec<u8>: Clone + Default));
/// assert!(!implements!(std::cell::Cell<u8>: Sync));
/// ```
#[macro_export]
macro_rules! implements {
    ($ty:ty : $($bound:tt)+) => {{
        trait Absent {
            fn present(&self) -> bool {
                false
            }
        }
        impl<P: ?Sized> Absent for &$crate::probe::Probe<P> {}
        trait Present {
            fn present(&self) -> bool {
                true
            }
        }
        impl<P: $($bound)+> Present for $crate::probe::Probe<P> {}
        (&$crate::probe::Probe::<$ty>::new()).present()
    }};
}

/// Bind a generic test body to a concrete type when the type satisfies the
/// bounds the body needs; `None` otherwise.
///
/// The body path is written last and is instantiated as `path::<Type>`.
#[macro_export]
macro_rules! runnable {
    ($ty:ty : [$($bound:tt)+] => $($body:tt)+) => {{
        trait Absent {
            fn bind(&self) -> ::core::option::Option<$crate::suite::TestFn> {
                ::core::option::Option::None
            }
        }
        impl<P: ?Sized> Absent for &$crate::probe::Probe<P> {}
        trait Present {
            fn bind(&self) -> ::core::option::Option<$crate::suite::TestFn>;
        }
        impl<P: $($bound)+> Present for $crate::probe::Probe<P> {
            fn bind(&self) -> ::core::option::Option<$crate::suite::TestFn> {
                ::core::option::Option::Some($($body)+::<P> as $crate::suite::TestFn)
            }
        }
        (&$crate::probe::Probe::<$ty>::new()).bind()
    }};
}
