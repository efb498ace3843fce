//! Self-check trait and result types

use std::time::Duration;

use colored::Colorize;

/// Outcome of a single self-check
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CheckStatus {
    Pass,
    /// Usable, but something looked off
    Warn,
    Fail,
}

impl CheckStatus {
    /// Pass or Warn
    pub fn is_ok(&self) -> bool {
        !self.is_fail()
    }

    pub fn is_fail(&self) -> bool {
        *self == CheckStatus::Fail
    }

    /// Status label for terminal output
    pub fn as_colored_str(&self) -> String {
        match self {
            CheckStatus::Pass => "PASS".green().to_string(),
            CheckStatus::Warn => "WARN".yellow().to_string(),
            CheckStatus::Fail => "FAIL".red().to_string(),
        }
    }
}

/// Result of running a [`SystemCheck`]
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub status: CheckStatus,
    /// One-line summary
    pub message: String,
    /// Multi-line findings, shown below the table
    pub details: Option<String>,
    /// Filled in by the runner
    pub duration: Duration,
}

impl CheckResult {
    fn with_status(status: CheckStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
            duration: Duration::ZERO,
        }
    }

    pub fn pass(message: impl Into<String>) -> Self {
        Self::with_status(CheckStatus::Pass, message)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::with_status(CheckStatus::Warn, message)
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self::with_status(CheckStatus::Fail, message)
    }

    /// Builds a result from a list of failed expectations
    ///
    /// Passes with `ok_message` when `failures` is empty, otherwise fails and
    /// lists every failure in the details.
    pub fn from_failures(ok_message: impl Into<String>, failures: Vec<String>) -> Self {
        if failures.is_empty() {
            return Self::pass(ok_message);
        }
        let count = failures.len();
        let details = failures
            .into_iter()
            .map(|failure| format!("  ✗ {failure}"))
            .collect::<Vec<_>>()
            .join("\n");
        Self::fail(format!("{count} expectation(s) not met")).with_details(details)
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// A subsystem that can validate itself without a window or GPU
pub trait SystemCheck {
    /// Name shown in the report
    fn name(&self) -> &'static str;

    fn check(&self) -> CheckResult;

    /// What the check validates
    fn description(&self) -> Option<&'static str> {
        None
    }
}
