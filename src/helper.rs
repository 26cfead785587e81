//! Test doubles for exercising the engine itself.
//!
//! [`TestSpy`] replaces the host test runner so a test of the library can
//! observe whether Verify signaled a failure and what the report said,
//! without actually failing.

use crate::engine::Failable;

/// Recording [`Failable`] double. Panics nowhere; inspect it afterwards.
pub struct TestSpy {
    name: String,
    failed: bool,
    reports: Vec<String>,
}

impl TestSpy {
    pub fn new(name: impl Into<String>) -> Self {
        TestSpy {
            name: name.into(),
            failed: false,
            reports: Vec::new(),
        }
    }

    pub fn failed(&self) -> bool {
        self.failed
    }

    /// All recorded failure reports, newline-joined.
    pub fn report(&self) -> String {
        self.reports.join("\n")
    }

    /// Clears recorded failures, for multi-step approval scenarios.
    pub fn reset(&mut self) {
        self.failed = false;
        self.reports.clear();
    }

    pub fn assert_failed(&self) {
        assert!(self.failed, "Test passed and it shouldn't");
    }

    pub fn assert_passed(&self) {
        assert!(
            !self.failed,
            "Test failed and it shouldn't:\n{}",
            self.report()
        );
    }

    pub fn assert_report_contains(&self, needle: &str) {
        assert!(
            self.report().contains(needle),
            "Diff report doesn't contain expected '{needle}':\n{}",
            self.report()
        );
    }
}

impl Failable for TestSpy {
    fn errorf(&mut self, report: &str) {
        self.failed = true;
        self.reports.push(report.to_string());
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spy_records_failures() {
        let mut spy = TestSpy::new("TestSomething/case");
        assert!(!spy.failed());

        spy.errorf("first report");
        spy.errorf("second report");
        assert!(spy.failed());
        assert!(spy.report().contains("first report"));
        assert!(spy.report().contains("second report"));
    }

    #[test]
    fn spy_resets_cleanly() {
        let mut spy = TestSpy::new("TestSomething/case");
        spy.errorf("a report");
        spy.reset();
        assert!(!spy.failed());
        assert!(spy.report().is_empty());
    }

    #[test]
    fn spy_exposes_its_test_name() {
        let spy = TestSpy::new("TestSomething/case");
        assert_eq!(spy.name(), "TestSomething/case");
    }
}
