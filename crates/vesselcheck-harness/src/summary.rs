//! Per-subject tallies of test outcomes.

use serde::{Deserialize, Serialize};

use crate::capability::Family;
use crate::runner::Outcome;
use crate::suite::TestResult;

/// Outcome of one table entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestRecord {
    pub test: &'static str,
    pub outcome: Outcome,
}

impl TestRecord {
    #[must_use]
    pub fn new(test: &'static str, outcome: Outcome) -> Self {
        Self { test, outcome }
    }
}

/// Counts per classification and per skip kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub pass: usize,
    pub suboptimal: usize,
    pub incorrect_object_handling: usize,
    pub leaks_memory: usize,
    pub fail: usize,
    pub not_implemented: usize,
    pub partial: usize,
    pub missing_requirements: usize,
}

impl OutcomeCounts {
    fn add(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Ran(TestResult::Pass) => self.pass += 1,
            Outcome::Ran(TestResult::SuboptimalObjectHandling) => self.suboptimal += 1,
            Outcome::Ran(TestResult::IncorrectObjectHandling) => {
                self.incorrect_object_handling += 1;
            }
            Outcome::Ran(TestResult::LeaksMemory) => self.leaks_memory += 1,
            Outcome::Ran(TestResult::IncorrectResults) => self.fail += 1,
            Outcome::NotImplemented => self.not_implemented += 1,
            Outcome::Partial(_) => self.partial += 1,
            Outcome::MissingRequirements(_) => self.missing_requirements += 1,
        }
    }
}

/// Everything one subject's run produced.
#[derive(Debug, Clone)]
pub struct SuiteSummary {
    pub subject: String,
    pub family: Family,
    pub total: usize,
    pub records: Vec<TestRecord>,
    counts: OutcomeCounts,
}

impl SuiteSummary {
    /// Build a summary from the records of one run.
    #[must_use]
    pub fn from_records(subject: String, family: Family, records: Vec<TestRecord>) -> Self {
        let mut counts = OutcomeCounts::default();
        for record in &records {
            counts.add(&record.outcome);
        }
        Self {
            subject,
            family,
            total: records.len(),
            records,
            counts,
        }
    }

    #[must_use]
    pub fn counts(&self) -> OutcomeCounts {
        self.counts
    }

    /// Tests whose body ran or whose absence check was evaluated.
    #[must_use]
    pub fn executed(&self) -> usize {
        let c = &self.counts;
        c.pass + c.suboptimal + c.incorrect_object_handling + c.leaks_memory + c.fail
    }

    /// Returns true if every executed test passed (suboptimal included).
    #[must_use]
    pub fn all_passed(&self) -> bool {
        let c = &self.counts;
        c.incorrect_object_handling + c.leaks_memory + c.fail == 0
    }

    /// Outcome recorded for `test`, if it is in the table.
    #[must_use]
    pub fn outcome_of(&self, test: &str) -> Option<&Outcome> {
        self.records
            .iter()
            .find(|record| record.test == test)
            .map(|record| &record.outcome)
    }

    /// One-line tally for progress output.
    #[must_use]
    pub fn one_line(&self) -> String {
        let c = &self.counts;
        format!(
            "{}: {} tests, {} pass, {} suboptimal, {} object handling, {} leaks, {} fail, {} skipped",
            self.subject,
            self.total,
            c.pass,
            c.suboptimal,
            c.incorrect_object_handling,
            c.leaks_memory,
            c.fail,
            c.not_implemented + c.partial + c.missing_requirements,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::Operation;

    #[test]
    fn tallies_by_kind() {
        let records = vec![
            TestRecord::new("a", Outcome::Ran(TestResult::Pass)),
            TestRecord::new("b", Outcome::Ran(TestResult::SuboptimalObjectHandling)),
            TestRecord::new("c", Outcome::Ran(TestResult::LeaksMemory)),
            TestRecord::new("d", Outcome::NotImplemented),
            TestRecord::new("e", Outcome::Partial(vec![Operation::ResetEmpty])),
        ];
        let summary = SuiteSummary::from_records("X".to_string(), Family::Array, records);
        assert_eq!(summary.total, 5);
        assert_eq!(summary.executed(), 3);
        assert!(!summary.all_passed());
        assert_eq!(summary.counts().partial, 1);
        assert_eq!(summary.outcome_of("d"), Some(&Outcome::NotImplemented));
        assert!(summary.one_line().starts_with("X: 5 tests, 1 pass, 1 suboptimal"));
    }

    #[test]
    fn suboptimal_still_counts_as_passing() {
        let records = vec![TestRecord::new(
            "a",
            Outcome::Ran(TestResult::SuboptimalObjectHandling),
        )];
        let summary = SuiteSummary::from_records("Y".to_string(), Family::SharedPointer, records);
        assert!(summary.all_passed());
    }
}
