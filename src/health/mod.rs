//! Self-checks that run without a window or GPU
//!
//! Useful for:
//! - Validating configuration files in CI
//! - Smoke-testing the input engine against the headless desktop
//! - Debugging a broken profile from the command line
//!
//! # Example
//!
//! ```no_run
//! use pointer_router::health::{HealthCheckRunner, checks::*};
//!
//! let report = HealthCheckRunner::new()
//!     .add_check(ConfigCheck::new())
//!     .add_check(QueueCheck::new())
//!     .add_check(EngineCheck::new())
//!     .run();
//!
//! std::process::exit(report.exit_code());
//! ```

pub mod check;
pub mod checks;
pub mod reporter;
pub mod runner;

pub use check::{CheckResult, CheckStatus, SystemCheck};
pub use reporter::{format_report, print_report};
pub use runner::{HealthCheckReport, HealthCheckRunner};

/// Runs the built-in checks
pub fn run_all_checks() -> HealthCheckReport {
    HealthCheckRunner::new()
        .add_check(checks::ConfigCheck::new())
        .add_check(checks::QueueCheck::new())
        .add_check(checks::EngineCheck::new())
        .run()
}
