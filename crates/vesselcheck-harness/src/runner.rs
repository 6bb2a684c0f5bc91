//! Adaptive test runner.
//!
//! Walks a subject's family table in order and decides, per test, whether
//! to run the bound body or emit a skip notice. Each body runs once; a panic
//! inside a body is contained and classified as a failure.

use std::io::Write;
use std::panic::{AssertUnwindSafe, catch_unwind};

use vesselcheck_instrument::Instruments;

use crate::capability::{Operation, join_names};
use crate::config::HarnessConfig;
use crate::error::HarnessError;
use crate::reporter::Reporter;
use crate::structured_log::{self, LogEmitter, LogEntry, LogLevel};
use crate::suite::{Expectation, Subject, TestResult, TestSpec};
use crate::summary::{SuiteSummary, TestRecord};

/// What happened to one test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The body ran (or an absence check was evaluated).
    Ran(TestResult),
    /// None of the targeted operations exist.
    NotImplemented,
    /// Only some targeted operations exist; lists the present ones.
    Partial(Vec<Operation>),
    /// Targets exist but prerequisites do not; lists the missing ones.
    MissingRequirements(Vec<Operation>),
}

impl Outcome {
    /// Report text.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::Ran(result) => result.label().to_string(),
            Self::NotImplemented => "not implemented".to_string(),
            Self::Partial(present) => format!("only {} implemented", join_names(present)),
            Self::MissingRequirements(missing) => {
                format!("can't test, missing requirements: {}", join_names(missing))
            }
        }
    }

    #[must_use]
    pub fn result(&self) -> Option<TestResult> {
        match self {
            Self::Ran(result) => Some(*result),
            _ => None,
        }
    }

    fn log_outcome(&self) -> structured_log::Outcome {
        match self {
            Self::Ran(result) if result.is_pass() => structured_log::Outcome::Pass,
            Self::Ran(_) => structured_log::Outcome::Fail,
            _ => structured_log::Outcome::Skip,
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            Self::Ran(TestResult::Pass) => LogLevel::Info,
            Self::Ran(TestResult::IncorrectResults | TestResult::LeaksMemory) => LogLevel::Error,
            _ => LogLevel::Warn,
        }
    }
}

/// Runs family tables against subjects.
pub struct TestRunner<'a> {
    instruments: &'a mut Instruments,
    config: &'a HarnessConfig,
}

impl<'a> TestRunner<'a> {
    #[must_use]
    pub fn new(instruments: &'a mut Instruments, config: &'a HarnessConfig) -> Self {
        Self {
            instruments,
            config,
        }
    }

    /// Decide and, if possible, execute one test.
    pub fn evaluate(&mut self, subject: &Subject, spec: &TestSpec) -> Outcome {
        let caps = &subject.capabilities;
        let present = caps.present(spec.targets);

        if spec.expectation == Expectation::Absent {
            return Outcome::Ran(if present.is_empty() {
                TestResult::Pass
            } else {
                TestResult::IncorrectResults
            });
        }
        if present.is_empty() {
            return Outcome::NotImplemented;
        }
        if present.len() < spec.targets.len() {
            return Outcome::Partial(present);
        }
        let missing = caps.missing(spec.requires);
        if !missing.is_empty() {
            return Outcome::MissingRequirements(missing);
        }
        let Some(body) = subject.body(spec.name) else {
            return Outcome::NotImplemented;
        };

        let instruments = &mut *self.instruments;
        let config = self.config;
        let result = catch_unwind(AssertUnwindSafe(|| body(instruments, config)))
            .unwrap_or(TestResult::IncorrectResults);
        self.instruments.reset();
        Outcome::Ran(result)
    }

    /// Run the subject's whole table, reporting each test as it completes.
    pub fn run<W: Write>(
        &mut self,
        subject: &Subject,
        reporter: &mut Reporter<W>,
        mut log: Option<&mut LogEmitter>,
    ) -> Result<SuiteSummary, HarnessError> {
        if let Some(log) = log.as_deref_mut() {
            log.set_scope(subject.family.name());
            log.emit_entry(
                LogEntry::new("", LogLevel::Info, "subject_start")
                    .with_subject(subject.family.name(), &subject.name)
                    .with_details(serde_json::json!({
                        "capabilities": subject.capabilities.len(),
                        "tests": subject.specs().len(),
                    })),
            )?;
        }

        reporter.header(subject)?;
        let mut records = Vec::with_capacity(subject.specs().len());
        for spec in subject.specs() {
            let outcome = self.evaluate(subject, spec);
            reporter.line(spec.name, &outcome)?;
            if let Some(log) = log.as_deref_mut() {
                let mut entry = LogEntry::new("", outcome.log_level(), "test_result")
                    .with_subject(subject.family.name(), &subject.name)
                    .with_test(spec.name)
                    .with_outcome(outcome.log_outcome())
                    .with_message(outcome.text());
                if let Some(result) = outcome.result() {
                    entry = entry.with_classification(result);
                }
                log.emit_entry(entry)?;
            }
            records.push(TestRecord::new(spec.name, outcome));
        }
        reporter.footer()?;

        let summary = SuiteSummary::from_records(subject.name.clone(), subject.family, records);
        if let Some(log) = log {
            log.emit_entry(
                LogEntry::new("", LogLevel::Info, "subject_end")
                    .with_subject(subject.family.name(), &subject.name)
                    .with_details(serde_json::to_value(summary.counts())?),
            )?;
            log.flush()?;
        }
        Ok(summary)
    }
}
