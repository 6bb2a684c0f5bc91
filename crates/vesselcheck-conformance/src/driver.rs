//! The fixed run sequence: arrays, then unique pointers, then shared
//! pointers, each reported as it completes.

use std::io::Write;

use clap::ValueEnum;
use serde::Serialize;
use vesselcheck_harness::structured_log::{LogEmitter, LogEntry, LogLevel};
use vesselcheck_harness::{
    HarnessConfig, HarnessError, Instruments, LifecycleItem, Reporter, Subject, SuiteSummary,
    TestRunner, array_subject, shared_subject, unique_subject,
};
use vesselcheck_instrument::alloc_counter;

use crate::defective::{
    CloningPtr, CopyingVec, DeepCopyPtr, ForgetfulVec, LeakyVec, UncheckedAtVec,
};
use crate::grow_vec::GrowVec;
use crate::shared_ptr::SharedPtr;
use crate::solo_ptr::SoloPtr;
use crate::stubs::{StubArray, StubShared, StubUnique};

/// Which implementations a run covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectSet {
    /// GrowVec, SoloPtr and SharedPtr.
    #[default]
    Reference,
    /// One broken implementation per classification.
    Defective,
    /// Empty types that implement nothing.
    Stub,
}

/// Probe and bind every subject of `set`, in run order.
#[must_use]
pub fn subjects(set: SubjectSet) -> Vec<Subject> {
    match set {
        SubjectSet::Reference => vec![
            array_subject!(GrowVec<LifecycleItem>).with_name("GrowVec"),
            unique_subject!(SoloPtr<LifecycleItem>).with_name("SoloPtr"),
            shared_subject!(SharedPtr<LifecycleItem>).with_name("SharedPtr"),
        ],
        SubjectSet::Defective => vec![
            array_subject!(CopyingVec<LifecycleItem>).with_name("CopyingVec"),
            array_subject!(LeakyVec<LifecycleItem>).with_name("LeakyVec"),
            array_subject!(ForgetfulVec<LifecycleItem>).with_name("ForgetfulVec"),
            array_subject!(UncheckedAtVec<LifecycleItem>).with_name("UncheckedAtVec"),
            unique_subject!(CloningPtr<LifecycleItem>).with_name("CloningPtr"),
            shared_subject!(DeepCopyPtr<LifecycleItem>).with_name("DeepCopyPtr"),
        ],
        SubjectSet::Stub => vec![
            array_subject!(StubArray<LifecycleItem>).with_name("StubArray"),
            unique_subject!(StubUnique<LifecycleItem>).with_name("StubUnique"),
            shared_subject!(StubShared<LifecycleItem>).with_name("StubShared"),
        ],
    }
}

/// Whole-run tallies, logged once at the end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunTotals {
    pub subjects: usize,
    pub tests: usize,
    pub executed: usize,
    /// Subjects with at least one executed test that did not pass.
    pub failing: Vec<String>,
}

impl RunTotals {
    #[must_use]
    pub fn from_summaries(summaries: &[SuiteSummary]) -> Self {
        let mut totals = Self {
            subjects: summaries.len(),
            ..Self::default()
        };
        for summary in summaries {
            totals.tests += summary.total;
            totals.executed += summary.executed();
            if !summary.all_passed() {
                totals.failing.push(summary.subject.clone());
            }
        }
        totals
    }
}

/// Run `subjects` in order on the current thread.
///
/// Claims this thread's instruments for the duration of the run.
pub fn run_all<W: Write>(
    subjects: &[Subject],
    config: &HarnessConfig,
    reporter: &mut Reporter<W>,
    mut log: Option<&mut LogEmitter>,
) -> Result<Vec<SuiteSummary>, HarnessError> {
    let mut instruments = Instruments::acquire()?;
    if !alloc_counter::is_installed() {
        reporter.warning(
            "allocation counter",
            "not installed, memory leaks will go undetected",
        )?;
    }

    let mut runner = TestRunner::new(&mut instruments, config);
    let mut summaries = Vec::with_capacity(subjects.len());
    for subject in subjects {
        summaries.push(runner.run(subject, reporter, log.as_deref_mut())?);
    }

    if let Some(log) = log {
        let totals = RunTotals::from_summaries(&summaries);
        log.set_scope("run");
        log.emit_entry(
            LogEntry::new("", LogLevel::Info, "run_end")
                .with_details(serde_json::to_value(&totals)?),
        )?;
        log.flush()?;
    }
    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vesselcheck_harness::Family;

    #[test]
    fn every_set_runs_families_in_fixed_order() {
        for set in [SubjectSet::Reference, SubjectSet::Defective, SubjectSet::Stub] {
            let families: Vec<Family> = subjects(set).iter().map(|s| s.family).collect();
            let mut sorted = families.clone();
            sorted.sort_by_key(|f| match f {
                Family::Array => 0,
                Family::UniquePointer => 1,
                Family::SharedPointer => 2,
            });
            assert_eq!(families, sorted, "{set:?}");
            assert!(families.contains(&Family::SharedPointer));
        }
    }

    #[test]
    fn totals_flag_failing_subjects() {
        let config = HarnessConfig::default();
        let mut reporter = Reporter::new(std::io::sink(), config.color);
        let summaries = run_all(
            &subjects(SubjectSet::Defective),
            &config,
            &mut reporter,
            None,
        )
        .unwrap();
        let totals = RunTotals::from_summaries(&summaries);
        assert_eq!(totals.subjects, 6);
        assert!(totals.failing.contains(&"LeakyVec".to_string()));
        assert!(!totals.failing.contains(&"CopyingVec".to_string()));
    }
}
