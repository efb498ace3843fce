//! Runs a suite of self-checks

use std::time::Instant;

use tracing::debug;

use super::check::{CheckResult, CheckStatus, SystemCheck};

/// Collected results of a check suite
#[derive(Debug, Default)]
pub struct HealthCheckReport {
    /// (check name, result) in run order
    pub results: Vec<(String, CheckResult)>,
    pub total: usize,
    pub passed: usize,
    pub warned: usize,
    pub failed: usize,
}

impl HealthCheckReport {
    fn record(&mut self, name: String, result: CheckResult) {
        match result.status {
            CheckStatus::Pass => self.passed += 1,
            CheckStatus::Warn => self.warned += 1,
            CheckStatus::Fail => self.failed += 1,
        }
        self.total += 1;
        self.results.push((name, result));
    }

    /// No failures
    pub fn is_healthy(&self) -> bool {
        self.failed == 0
    }

    pub fn has_warnings(&self) -> bool {
        self.warned > 0
    }

    /// Worst status in the report
    pub fn worst(&self) -> CheckStatus {
        self.results
            .iter()
            .map(|(_, result)| result.status)
            .max()
            .unwrap_or(CheckStatus::Pass)
    }

    /// Process exit code: 0 all pass, 1 any failure, 2 warnings only
    pub fn exit_code(&self) -> i32 {
        match self.worst() {
            CheckStatus::Pass => 0,
            CheckStatus::Fail => 1,
            CheckStatus::Warn => 2,
        }
    }

    pub fn result(&self, name: &str) -> Option<&CheckResult> {
        self.results
            .iter()
            .find(|(check, _)| check == name)
            .map(|(_, result)| result)
    }
}

/// Builder-style check suite
#[derive(Default)]
pub struct HealthCheckRunner {
    checks: Vec<Box<dyn SystemCheck>>,
}

impl HealthCheckRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_check<C: SystemCheck + 'static>(mut self, check: C) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    /// Runs every check in order, timing each one
    pub fn run(self) -> HealthCheckReport {
        let mut report = HealthCheckReport::default();

        for check in self.checks {
            let start = Instant::now();
            let result = check.check().with_duration(start.elapsed());
            debug!(check = check.name(), status = ?result.status, "self-check finished");
            report.record(check.name().to_string(), result);
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str, CheckStatus);

    impl SystemCheck for Fixed {
        fn name(&self) -> &'static str {
            self.0
        }

        fn check(&self) -> CheckResult {
            match self.1 {
                CheckStatus::Pass => CheckResult::pass("ok"),
                CheckStatus::Warn => CheckResult::warn("meh"),
                CheckStatus::Fail => CheckResult::fail("broken"),
            }
        }
    }

    #[test]
    fn test_counts_and_exit_codes() {
        let report = HealthCheckRunner::new()
            .add_check(Fixed("a", CheckStatus::Pass))
            .add_check(Fixed("b", CheckStatus::Warn))
            .run();
        assert_eq!((report.total, report.passed, report.warned), (2, 1, 1));
        assert!(report.is_healthy());
        assert_eq!(report.exit_code(), 2);

        let report = HealthCheckRunner::new()
            .add_check(Fixed("a", CheckStatus::Fail))
            .add_check(Fixed("b", CheckStatus::Warn))
            .run();
        assert!(!report.is_healthy());
        assert_eq!(report.exit_code(), 1);
        assert_eq!(report.result("a").map(|r| r.status), Some(CheckStatus::Fail));
    }

    #[test]
    fn test_empty_suite_is_healthy() {
        let report = HealthCheckRunner::new().run();
        assert_eq!(report.exit_code(), 0);
        assert_eq!(report.total, 0);
    }
}
