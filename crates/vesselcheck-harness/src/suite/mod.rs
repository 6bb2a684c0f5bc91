//! Test suite: per-family test tables and generic test bodies.
//!
//! Each family module declares a static table of [`TestSpec`] entries in
//! report order, generic body functions, and an exported subject macro that
//! probes a concrete type and binds the bodies it can run.

pub mod array;
pub mod shared;
pub mod unique;

use serde::{Deserialize, Serialize};
use vesselcheck_instrument::Instruments;

use crate::capability::{CapabilitySet, Family, Operation};
use crate::config::HarnessConfig;

/// Classification of one executed test, least severe first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestResult {
    #[default]
    Pass,
    /// Correct, but performed clones a move would have avoided.
    SuboptimalObjectHandling,
    /// Lifecycle invariant violated or wrong alive count.
    IncorrectObjectHandling,
    /// Allocations and deallocations do not balance.
    LeaksMemory,
    /// An observable return value was wrong.
    IncorrectResults,
}

impl TestResult {
    /// Report text.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::SuboptimalObjectHandling => "pass, suboptimal copies/moves",
            Self::IncorrectObjectHandling => "incorrect object handling",
            Self::LeaksMemory => "leaks memory",
            Self::IncorrectResults => "fail",
        }
    }

    /// Pass and suboptimal both count as passing.
    #[must_use]
    pub const fn is_pass(self) -> bool {
        matches!(self, Self::Pass | Self::SuboptimalObjectHandling)
    }
}

/// Accumulates checks and keeps the most severe classification.
#[derive(Debug)]
pub struct Verdict<'a> {
    result: TestResult,
    instruments: &'a mut Instruments,
}

impl<'a> Verdict<'a> {
    /// Reset the instruments and start a passing verdict.
    pub fn begin(instruments: &'a mut Instruments) -> Self {
        instruments.reset();
        Self {
            result: TestResult::Pass,
            instruments,
        }
    }

    /// Escalate to `failure` unless `ok`.
    pub fn check(&mut self, ok: bool, failure: TestResult) {
        if !ok {
            self.result = self.result.max(failure);
        }
    }

    /// An observable value must be right.
    pub fn expect(&mut self, ok: bool) {
        self.check(ok, TestResult::IncorrectResults);
    }

    /// Exactly `n` items must be alive.
    pub fn expect_alive(&mut self, n: i64) {
        let alive = self.instruments.alive();
        self.check(alive == n, TestResult::IncorrectObjectHandling);
    }

    /// No lifecycle invariant may have been violated.
    pub fn expect_clean(&mut self) {
        let errors = self.instruments.errors();
        self.check(errors == 0, TestResult::IncorrectObjectHandling);
    }

    /// No clone may have happened since the last reset.
    pub fn expect_no_copies(&mut self) {
        let copies = self.instruments.lifecycle().copies();
        self.check(copies == 0, TestResult::SuboptimalObjectHandling);
    }

    /// Exactly `n` allocations must be outstanding.
    pub fn expect_outstanding(&mut self, n: i64) {
        let outstanding = self.instruments.outstanding();
        self.check(outstanding == n, TestResult::LeaksMemory);
    }

    /// Allocations must balance.
    pub fn expect_no_leaks(&mut self) {
        self.expect_outstanding(0);
    }

    /// Everything created since the reset is gone, cleanly.
    pub fn expect_settled(&mut self) {
        self.expect_alive(0);
        self.expect_clean();
        self.expect_no_leaks();
    }

    /// Reset the counters mid-test.
    pub fn reset(&mut self) {
        self.instruments.reset();
    }

    #[must_use]
    pub fn instruments(&self) -> &Instruments {
        self.instruments
    }

    #[must_use]
    pub fn finish(self) -> TestResult {
        self.result
    }
}

/// Whether a test requires its target operations to be present or absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expectation {
    Present,
    /// The targets must be structurally missing (unique-pointer copies).
    Absent,
}

/// One entry of a family's test table.
#[derive(Debug, Clone, Copy)]
pub struct TestSpec {
    pub name: &'static str,
    pub targets: &'static [Operation],
    pub requires: &'static [Operation],
    pub expectation: Expectation,
}

impl TestSpec {
    #[must_use]
    pub const fn new(
        name: &'static str,
        targets: &'static [Operation],
        requires: &'static [Operation],
    ) -> Self {
        Self {
            name,
            targets,
            requires,
            expectation: Expectation::Present,
        }
    }

    #[must_use]
    pub const fn must_be_absent(name: &'static str, targets: &'static [Operation]) -> Self {
        Self {
            name,
            targets,
            requires: &[],
            expectation: Expectation::Absent,
        }
    }
}

/// Body of a test, instantiated for one concrete type under test.
pub type TestFn = fn(&mut Instruments, &HarnessConfig) -> TestResult;

/// A concrete type under test: its probed capabilities and runnable bodies.
#[derive(Debug, Clone)]
pub struct Subject {
    pub name: String,
    pub family: Family,
    pub capabilities: CapabilitySet,
    bodies: Vec<(&'static str, TestFn)>,
}

impl Subject {
    #[must_use]
    pub fn new(name: impl Into<String>, family: Family, capabilities: CapabilitySet) -> Self {
        Self {
            name: name.into(),
            family,
            capabilities,
            bodies: Vec::new(),
        }
    }

    /// Replace the display name (defaults to the type as written).
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Register the body for `test`, if the type could bind it.
    #[must_use]
    pub fn with_body(mut self, test: &'static str, body: Option<TestFn>) -> Self {
        if let Some(body) = body {
            self.bodies.push((test, body));
        }
        self
    }

    #[must_use]
    pub fn body(&self, test: &str) -> Option<TestFn> {
        self.bodies
            .iter()
            .find(|(name, _)| *name == test)
            .map(|(_, body)| *body)
    }

    /// Test table for this subject's family.
    #[must_use]
    pub fn specs(&self) -> &'static [TestSpec] {
        match self.family {
            Family::Array => array::SPECS,
            Family::UniquePointer => unique::SPECS,
            Family::SharedPointer => shared::SPECS,
        }
    }
}
