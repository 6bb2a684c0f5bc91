//! Conformance harness for dynamic arrays, unique pointers and shared pointers.
//!
//! A type under test implements whichever operation traits it supports
//! (`capability`). A subject macro (`array_subject!`, `unique_subject!`,
//! `shared_subject!`) probes the concrete type at compile time (`probe`) and
//! binds the generic test bodies it can run (`suite`). The adaptive runner
//! (`runner`) walks the family's table, skipping tests whose operations or
//! prerequisites are missing, and the reporter (`reporter`) prints one line
//! per test.
//!
//! ```
//! use vesselcheck_harness::{
//!     ColorMode, HarnessConfig, Instruments, LifecycleItem, Reporter, TestRunner, array_subject,
//! };
//!
//! let subject = array_subject!(Vec<LifecycleItem>);
//! let config = HarnessConfig::default();
//! let mut instruments = Instruments::acquire().unwrap();
//! let mut reporter = Reporter::new(Vec::new(), ColorMode::Never);
//! let summary = TestRunner::new(&mut instruments, &config)
//!     .run(&subject, &mut reporter, None)
//!     .unwrap();
//! assert!(summary.all_passed());
//! ```

#![deny(unsafe_code)]

pub mod capability;
pub mod config;
pub mod error;
pub mod probe;
pub mod reporter;
pub mod runner;
pub mod std_impls;
pub mod structured_log;
pub mod suite;
pub mod summary;

pub use capability::{CapabilitySet, Family, Operation, OutOfRange};
pub use config::{ColorMode, HarnessConfig};
pub use error::HarnessError;
pub use reporter::Reporter;
pub use runner::{Outcome, TestRunner};
pub use suite::{Subject, TestResult, TestSpec};
pub use summary::SuiteSummary;
pub use vesselcheck_instrument::{Instruments, LifecycleItem};
