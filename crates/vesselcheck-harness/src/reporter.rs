//! Text report: one header per subject, one line per test.

use std::io::Write;

use crate::config::ColorMode;
use crate::runner::Outcome;
use crate::suite::{Subject, TestResult};

const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

const RULE: &str = "-------------------------------";

fn color_of(outcome: &Outcome) -> &'static str {
    match outcome {
        Outcome::Ran(TestResult::Pass | TestResult::SuboptimalObjectHandling) => GREEN,
        Outcome::Ran(TestResult::IncorrectObjectHandling | TestResult::LeaksMemory) => YELLOW,
        Outcome::Ran(TestResult::IncorrectResults) => RED,
        _ => YELLOW,
    }
}

/// Renders outcomes as text lines on any writer.
pub struct Reporter<W: Write> {
    out: W,
    color: ColorMode,
}

impl<W: Write> Reporter<W> {
    #[must_use]
    pub fn new(out: W, color: ColorMode) -> Self {
        Self { out, color }
    }

    /// Blank line, subject name and rule; pointer families add "Class methods:".
    pub fn header(&mut self, subject: &Subject) -> std::io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{}", subject.name)?;
        writeln!(self.out, "{RULE}")?;
        if subject.family.is_pointer() {
            writeln!(self.out, "Class methods:")?;
        }
        Ok(())
    }

    /// `  <test>: <text>`, colored per outcome.
    pub fn line(&mut self, test: &str, outcome: &Outcome) -> std::io::Result<()> {
        let text = outcome.text();
        if self.color.enabled() {
            writeln!(self.out, "  {test}: {}{text}{RESET}", color_of(outcome))
        } else {
            writeln!(self.out, "  {test}: {text}")
        }
    }

    /// Free-form warning line, styled like a skip notice.
    pub fn warning(&mut self, name: &str, text: &str) -> std::io::Result<()> {
        if self.color.enabled() {
            writeln!(self.out, "  {name}: {YELLOW}{text}{RESET}")
        } else {
            writeln!(self.out, "  {name}: {text}")
        }
    }

    /// Trailing blank line after a subject.
    pub fn footer(&mut self) -> std::io::Result<()> {
        writeln!(self.out)?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{CapabilitySet, Family, Operation};

    fn render(color: ColorMode, outcome: Outcome) -> String {
        let mut reporter = Reporter::new(Vec::new(), color);
        reporter.line("size", &outcome).unwrap();
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn plain_lines() {
        assert_eq!(
            render(ColorMode::Never, Outcome::Ran(TestResult::Pass)),
            "  size: pass\n"
        );
        assert_eq!(
            render(ColorMode::Never, Outcome::NotImplemented),
            "  size: not implemented\n"
        );
        assert_eq!(
            render(
                ColorMode::Never,
                Outcome::MissingRequirements(vec![Operation::PushBack, Operation::Capacity])
            ),
            "  size: can't test, missing requirements: push_back, capacity\n"
        );
    }

    #[test]
    fn colored_lines() {
        assert_eq!(
            render(ColorMode::Always, Outcome::Ran(TestResult::IncorrectResults)),
            "  size: \x1b[31mfail\x1b[0m\n"
        );
        assert_eq!(
            render(ColorMode::Always, Outcome::Ran(TestResult::SuboptimalObjectHandling)),
            "  size: \x1b[32mpass, suboptimal copies/moves\x1b[0m\n"
        );
        assert_eq!(
            render(ColorMode::Always, Outcome::Ran(TestResult::LeaksMemory)),
            "  size: \x1b[33mleaks memory\x1b[0m\n"
        );
    }

    #[test]
    fn pointer_header_lists_class_methods() {
        let subject = Subject::new("SoloPtr", Family::UniquePointer, CapabilitySet::language());
        let mut reporter = Reporter::new(Vec::new(), ColorMode::Never);
        reporter.header(&subject).unwrap();
        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(text, format!("\nSoloPtr\n{RULE}\nClass methods:\n"));
    }
}
