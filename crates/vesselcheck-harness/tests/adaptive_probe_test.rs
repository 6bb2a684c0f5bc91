//! Integration test: adaptive selection against partial implementations.
//!
//! Validates that:
//! 1. A type missing most operations still produces a full report.
//! 2. Tests with absent targets say "not implemented".
//! 3. Tests whose prerequisites are absent list them in table order.
//! 4. Partially implemented multi-target tests name the present operations.
//! 5. A copyable unique pointer fails the copy tests.
//! 6. Growth polling stops at the configured limit for an array whose
//!    capacity never changes.
//! 7. `get` runs on a pointer without a default constructor.
//!
//! Run: cargo test -p vesselcheck-harness --test adaptive_probe_test

use std::ops::Deref;

use vesselcheck_harness::capability::{
    ArrayCapacity, ArrayPushBack, ArraySize, PointerFromBox, PointerGet, PointerReset,
};
use vesselcheck_harness::suite::{array, shared, unique};
use vesselcheck_harness::{
    ColorMode, HarnessConfig, Instruments, LifecycleItem, Outcome, Reporter, TestResult,
    TestRunner, array_subject, shared_subject, unique_subject,
};

/// An array with nothing but size.
#[derive(Default)]
struct SizeOnly;

impl ArraySize for SizeOnly {
    fn size(&self) -> usize {
        0
    }
}

/// push_back without size.
#[derive(Default)]
struct Sink(Vec<LifecycleItem>);

impl ArrayPushBack<LifecycleItem> for Sink {
    fn push_back(&mut self, value: LifecycleItem) {
        self.0.push(value);
    }
}

/// Preallocated far beyond any growth poll, so capacity never changes.
struct HugeFixedVec(Vec<LifecycleItem>);

impl Default for HugeFixedVec {
    fn default() -> Self {
        Self(Vec::with_capacity(1 << 16))
    }
}

impl ArrayCapacity for HugeFixedVec {
    fn capacity(&self) -> usize {
        self.0.capacity()
    }
}

impl ArrayPushBack<LifecycleItem> for HugeFixedVec {
    fn push_back(&mut self, value: LifecycleItem) {
        self.0.push(value);
    }
}

/// Owning pointer with no empty state.
struct BareBox(Box<LifecycleItem>);

impl PointerFromBox<LifecycleItem> for BareBox {
    fn from_box(value: Box<LifecycleItem>) -> Self {
        Self(value)
    }
}

impl PointerGet<LifecycleItem> for BareBox {
    fn get(&self) -> *const LifecycleItem {
        std::ptr::from_ref(&*self.0)
    }
}

/// A unique pointer that can (wrongly) be cloned, with a partial reset.
#[derive(Default, Clone)]
struct CopyablePtr(Option<Box<LifecycleItem>>);

impl PointerFromBox<LifecycleItem> for CopyablePtr {
    fn from_box(value: Box<LifecycleItem>) -> Self {
        Self(Some(value))
    }
}

impl PointerGet<LifecycleItem> for CopyablePtr {
    fn get(&self) -> *const LifecycleItem {
        self.0.as_deref().map_or(std::ptr::null(), std::ptr::from_ref)
    }
}

impl PointerReset for CopyablePtr {
    fn reset(&mut self) {
        self.0 = None;
    }
}

impl Deref for CopyablePtr {
    type Target = LifecycleItem;

    fn deref(&self) -> &LifecycleItem {
        self.0.as_deref().unwrap()
    }
}

fn report(subject: &vesselcheck_harness::Subject) -> Vec<String> {
    let config = HarnessConfig::default();
    let mut instruments = Instruments::acquire().unwrap();
    let mut reporter = Reporter::new(Vec::new(), ColorMode::Never);
    TestRunner::new(&mut instruments, &config)
        .run(subject, &mut reporter, None)
        .unwrap();
    String::from_utf8(reporter.into_inner())
        .unwrap()
        .lines()
        .filter(|l| l.starts_with("  "))
        .map(str::to_string)
        .collect()
}

fn line<'a>(lines: &'a [String], test: &str) -> &'a str {
    let prefix = format!("  {test}: ");
    lines
        .iter()
        .find(|l| l.starts_with(&prefix))
        .map(|l| &l[prefix.len()..])
        .unwrap_or_else(|| panic!("no line for {test}"))
}

#[test]
fn size_only_array() {
    let lines = report(&array_subject!(SizeOnly));
    assert_eq!(lines.len(), 19);
    assert_eq!(line(&lines, "constructor (default)"), "pass");
    assert_eq!(line(&lines, "size"), "pass");
    assert_eq!(line(&lines, "capacity"), "not implemented");
    assert_eq!(
        line(&lines, "clean up"),
        "can't test, missing requirements: push_back"
    );
    assert_eq!(
        line(&lines, "move constructor"),
        "can't test, missing requirements: push_back"
    );
}

#[test]
fn push_back_without_size() {
    let lines = report(&array_subject!(Sink));
    assert_eq!(
        line(&lines, "push_back"),
        "can't test, missing requirements: size"
    );
    assert_eq!(line(&lines, "push_back (amortized growth)"), "pass");
    assert_eq!(line(&lines, "clean up (growth)"), "pass");
    assert_eq!(line(&lines, "reserve"), "not implemented");
}

#[test]
fn copyable_unique_pointer_fails_copy_tests() {
    let subject = unique_subject!(CopyablePtr);
    let lines = report(&subject);
    assert_eq!(lines.len(), unique::SPECS.len());
    assert_eq!(line(&lines, "copy constructor"), "fail");
    assert_eq!(line(&lines, "copy assignment"), "fail");
    assert_eq!(line(&lines, "constructor (pointer)"), "pass");
    assert_eq!(line(&lines, "constructor (val)"), "not implemented");
    assert_eq!(line(&lines, "reset"), "only reset() implemented");
    assert_eq!(line(&lines, "take"), "not implemented");
    assert_eq!(line(&lines, "get"), "pass");
    assert_eq!(line(&lines, "dereference"), "pass");
}

#[test]
fn copyable_pointer_as_shared_pointer_deep_copies() {
    let subject = shared_subject!(CopyablePtr);
    let config = HarnessConfig::default();
    let mut instruments = Instruments::acquire().unwrap();
    let mut runner = TestRunner::new(&mut instruments, &config);
    let copy = shared::SPECS
        .iter()
        .find(|s| s.name == "copy constructor")
        .unwrap();
    // Cloning the box clones the payload: two items alive, and a copy made.
    assert_eq!(
        runner.evaluate(&subject, copy),
        Outcome::Ran(TestResult::IncorrectObjectHandling)
    );
    let count = shared::SPECS.iter().find(|s| s.name == "use_count").unwrap();
    assert_eq!(runner.evaluate(&subject, count), Outcome::NotImplemented);
}

#[test]
fn empty_type_reports_every_line() {
    #[derive(Default)]
    struct Nothing;
    let lines = report(&shared_subject!(Nothing));
    assert_eq!(lines.len(), shared::SPECS.len());
    assert_eq!(line(&lines, "constructor (default)"), "pass");
    assert_eq!(line(&lines, "constructor (pointer)"), "not implemented");
    assert_eq!(
        line(&lines, "destructor"),
        "can't test, missing requirements: constructor (pointer)"
    );
    assert_eq!(
        line(&lines, "move assignment"),
        "can't test, missing requirements: constructor (pointer), copy constructor"
    );
}

#[test]
fn growth_polling_is_capped_for_fixed_capacity() {
    let subject = array_subject!(HugeFixedVec);
    let config = HarnessConfig::new().with_growth_poll_limit(64);
    let mut instruments = Instruments::acquire().unwrap();
    let mut runner = TestRunner::new(&mut instruments, &config);
    for name in ["capacity", "push_back (amortized growth)"] {
        let spec = array::SPECS.iter().find(|s| s.name == name).unwrap();
        assert_eq!(
            runner.evaluate(&subject, spec),
            Outcome::Ran(TestResult::Pass),
            "{name}"
        );
    }
}

#[test]
fn get_needs_no_default_constructor() {
    let lines = report(&unique_subject!(BareBox));
    assert_eq!(line(&lines, "constructor (default)"), "not implemented");
    assert_eq!(line(&lines, "get"), "pass");
    assert_eq!(line(&lines, "constructor (pointer)"), "pass");
    assert_eq!(line(&lines, "take"), "not implemented");
}
