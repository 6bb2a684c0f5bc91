//! Integration test: the standard vector as an array baseline.
//!
//! Validates that:
//! 1. Probing `Vec<LifecycleItem>` finds every array operation.
//! 2. Every array test runs and passes against it.
//! 3. The report has one line per table entry, in table order.
//! 4. The structured log for the run validates line by line.
//!
//! Run: cargo test -p vesselcheck-harness --test vec_baseline_test

use vesselcheck_harness::structured_log::{self, LogEmitter};
use vesselcheck_harness::suite::array;
use vesselcheck_harness::{
    ColorMode, HarnessConfig, Instruments, LifecycleItem, Operation, Outcome, Reporter,
    TestResult, TestRunner, array_subject,
};

#[test]
fn vec_supports_every_array_operation() {
    let subject = array_subject!(Vec<LifecycleItem>);
    let every = [
        Operation::Default,
        Operation::Size,
        Operation::Capacity,
        Operation::Empty,
        Operation::Reserve,
        Operation::PushBack,
        Operation::Index,
        Operation::At,
        Operation::Front,
        Operation::Back,
        Operation::Clear,
        Operation::Resize,
        Operation::CopyConstruct,
        Operation::CopyAssign,
        Operation::MoveConstruct,
        Operation::MoveAssign,
        Operation::Destroy,
    ];
    let missing = subject.capabilities.missing(&every);
    assert!(missing.is_empty(), "Vec missing {missing:?}");
    assert!(!subject.capabilities.contains(Operation::UseCount));
}

#[test]
fn vec_passes_the_array_suite() {
    let subject = array_subject!(Vec<LifecycleItem>);
    let config = HarnessConfig::default();
    let mut instruments = Instruments::acquire().unwrap();
    let mut runner = TestRunner::new(&mut instruments, &config);

    for spec in array::SPECS {
        let outcome = runner.evaluate(&subject, spec);
        assert_eq!(
            outcome,
            Outcome::Ran(TestResult::Pass),
            "{} on Vec",
            spec.name
        );
    }
}

#[test]
fn report_lists_every_test_in_order() {
    let subject = array_subject!(Vec<LifecycleItem>).with_name("std::vec::Vec");
    let config = HarnessConfig::default();
    let mut instruments = Instruments::acquire().unwrap();
    let mut reporter = Reporter::new(Vec::new(), ColorMode::Never);
    let summary = TestRunner::new(&mut instruments, &config)
        .run(&subject, &mut reporter, None)
        .unwrap();

    let text = String::from_utf8(reporter.into_inner()).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some(""));
    assert_eq!(lines.next(), Some("std::vec::Vec"));
    assert!(lines.next().unwrap().starts_with("---"));
    let body: Vec<&str> = lines.filter(|l| !l.is_empty()).collect();
    assert_eq!(body.len(), array::SPECS.len());
    for (line, spec) in body.iter().zip(array::SPECS) {
        assert_eq!(*line, format!("  {}: pass", spec.name));
    }
    assert_eq!(summary.executed(), array::SPECS.len());
    assert!(summary.all_passed());
}

#[test]
fn structured_log_validates() {
    let subject = array_subject!(Vec<LifecycleItem>);
    let config = HarnessConfig::default();
    let mut instruments = Instruments::acquire().unwrap();
    let mut reporter = Reporter::new(std::io::sink(), ColorMode::Never);
    let mut log = LogEmitter::to_buffer("vec-baseline");
    TestRunner::new(&mut instruments, &config)
        .run(&subject, &mut reporter, Some(&mut log))
        .unwrap();

    let text = log.buffered().unwrap();
    let (count, errors) = structured_log::validate_log_text(text);
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(count, array::SPECS.len() + 2);

    let first: serde_json::Value = serde_json::from_str(text.lines().next().unwrap()).unwrap();
    assert_eq!(first["event"], "subject_start");
    assert_eq!(first["trace_id"], "vec-baseline::array::001");
}

#[test]
fn counters_are_clean_after_a_run() {
    let subject = array_subject!(Vec<LifecycleItem>);
    let config = HarnessConfig::default();
    let mut instruments = Instruments::acquire().unwrap();
    let mut reporter = Reporter::new(std::io::sink(), ColorMode::Never);
    TestRunner::new(&mut instruments, &config)
        .run(&subject, &mut reporter, None)
        .unwrap();
    assert!(instruments.lifecycle().is_zero());
}
