//! Integration test: full driver runs over each subject set.
//!
//! Validates that:
//! 1. Every reference implementation passes every test in its table.
//! 2. Each defective implementation trips the classification it was built for.
//! 3. Stubs produce only skip notices and absence checks.
//! 4. The JSONL log of a run validates and ends with the run totals.
//!
//! Run: cargo test -p vesselcheck-conformance --test driver_test

use vesselcheck_conformance::{SubjectSet, run_all, subjects};
use vesselcheck_harness::structured_log::{self, LogEmitter};
use vesselcheck_harness::{ColorMode, HarnessConfig, Outcome, Reporter, SuiteSummary, TestResult};

fn run(set: SubjectSet) -> (String, Vec<SuiteSummary>) {
    let config = HarnessConfig::new().with_color(ColorMode::Never);
    let mut reporter = Reporter::new(Vec::new(), config.color);
    let summaries = run_all(&subjects(set), &config, &mut reporter, None).unwrap();
    (String::from_utf8(reporter.into_inner()).unwrap(), summaries)
}

fn summary<'a>(summaries: &'a [SuiteSummary], subject: &str) -> &'a SuiteSummary {
    summaries
        .iter()
        .find(|s| s.subject == subject)
        .unwrap_or_else(|| panic!("no summary for {subject}"))
}

fn result_of(summaries: &[SuiteSummary], subject: &str, test: &str) -> Option<TestResult> {
    summary(summaries, subject)
        .outcome_of(test)
        .and_then(Outcome::result)
}

#[test]
fn reference_implementations_pass_everything() {
    let (text, summaries) = run(SubjectSet::Reference);
    assert_eq!(summaries.len(), 3);
    for s in &summaries {
        assert_eq!(s.executed(), s.total, "{} skipped tests", s.subject);
        for record in &s.records {
            assert_eq!(
                record.outcome,
                Outcome::Ran(TestResult::Pass),
                "{}: {}",
                s.subject,
                record.test
            );
        }
    }
    assert!(!text.contains("not implemented"));
    assert!(text.contains("\nGrowVec\n"));
    assert!(text.contains("\nSoloPtr\n-------------------------------\nClass methods:\n"));
    let grow = text.find("GrowVec").unwrap();
    let solo = text.find("SoloPtr").unwrap();
    let shared = text.find("SharedPtr").unwrap();
    assert!(grow < solo && solo < shared);
}

#[test]
fn defective_implementations_are_classified() {
    let (_, summaries) = run(SubjectSet::Defective);
    assert_eq!(
        result_of(&summaries, "CopyingVec", "push_back (amortized growth)"),
        Some(TestResult::SuboptimalObjectHandling)
    );
    assert_eq!(
        result_of(&summaries, "CopyingVec", "reserve"),
        Some(TestResult::SuboptimalObjectHandling)
    );
    assert!(summary(&summaries, "CopyingVec").all_passed());

    assert_eq!(
        result_of(&summaries, "LeakyVec", "push_back (amortized growth)"),
        Some(TestResult::LeaksMemory)
    );
    assert_eq!(
        result_of(&summaries, "LeakyVec", "clean up (growth)"),
        Some(TestResult::LeaksMemory)
    );
    assert_eq!(
        result_of(&summaries, "LeakyVec", "clean up"),
        Some(TestResult::Pass)
    );

    assert_eq!(
        result_of(&summaries, "ForgetfulVec", "clear"),
        Some(TestResult::IncorrectObjectHandling)
    );
    assert_eq!(
        result_of(&summaries, "UncheckedAtVec", "at"),
        Some(TestResult::IncorrectResults)
    );
    assert_eq!(
        result_of(&summaries, "CloningPtr", "copy constructor"),
        Some(TestResult::IncorrectResults)
    );
    assert_eq!(
        result_of(&summaries, "CloningPtr", "take"),
        Some(TestResult::Pass)
    );
    assert_eq!(
        result_of(&summaries, "DeepCopyPtr", "copy constructor"),
        Some(TestResult::IncorrectObjectHandling)
    );
    assert_eq!(
        result_of(&summaries, "DeepCopyPtr", "use_count"),
        Some(TestResult::IncorrectResults)
    );
}

#[test]
fn stubs_only_skip() {
    let (text, summaries) = run(SubjectSet::Stub);
    for s in &summaries {
        for record in &s.records {
            match &record.outcome {
                Outcome::Ran(result) => assert_eq!(*result, TestResult::Pass, "{}", record.test),
                Outcome::NotImplemented | Outcome::MissingRequirements(_) => {}
                Outcome::Partial(_) => panic!("stub partially implements {}", record.test),
            }
        }
    }
    assert!(text.contains("  constructor (default): not implemented\n"));
    assert!(text.contains(
        "  move constructor: can't test, missing requirements: constructor (default), push_back, size\n"
    ));
    assert!(text.contains("  destructor: can't test, missing requirements: constructor (pointer)\n"));
    assert!(text.contains("  copy constructor: pass\n"));
}

#[test]
fn log_validates_and_ends_with_totals() {
    let config = HarnessConfig::new().with_color(ColorMode::Never);
    let mut reporter = Reporter::new(std::io::sink(), config.color);
    let mut log = LogEmitter::to_buffer("driver");
    let subjects = subjects(SubjectSet::Reference);
    run_all(&subjects, &config, &mut reporter, Some(&mut log)).unwrap();

    let text = log.buffered().unwrap();
    let (count, errors) = structured_log::validate_log_text(text);
    assert!(errors.is_empty(), "{errors:?}");
    let tests: usize = subjects.iter().map(|s| s.specs().len()).sum();
    assert_eq!(count, tests + 2 * subjects.len() + 1);

    let last: serde_json::Value = serde_json::from_str(text.lines().last().unwrap()).unwrap();
    assert_eq!(last["event"], "run_end");
    assert_eq!(last["details"]["subjects"], 3);
    assert_eq!(last["details"]["executed"], tests);
    assert!(last["details"]["failing"].as_array().unwrap().is_empty());
}
