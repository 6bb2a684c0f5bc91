//! Implementations under test and the fixed driver sequence.
//!
//! - **Reference** (`grow_vec`, `solo_ptr`, `shared_ptr`): conforming
//!   implementations, one per family
//! - **Defective** (`defective`): each trips exactly one classification
//! - **Stubs** (`stubs`): empty types that exercise every skip path
//! - **Driver** (`driver`): probes a subject set and runs it in order

#![deny(unsafe_code)]

pub mod defective;
pub mod driver;
pub mod grow_vec;
pub mod shared_ptr;
pub mod solo_ptr;
pub mod stubs;

pub use driver::{RunTotals, SubjectSet, run_all, subjects};
pub use grow_vec::GrowVec;
pub use shared_ptr::SharedPtr;
pub use solo_ptr::SoloPtr;
