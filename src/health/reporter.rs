//! Table output for self-check reports

use colored::Colorize;
use tabled::{
    builder::Builder,
    settings::{Alignment, Modify, Style, object::Rows},
};

use super::runner::HealthCheckReport;

/// Renders the report as a table followed by a summary
pub fn format_report(report: &HealthCheckReport) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Check", "Status", "Time", "Result"]);

    for (name, result) in &report.results {
        builder.push_record([
            name.clone(),
            result.status.as_colored_str(),
            format!("{:.2?}", result.duration),
            result.message.clone(),
        ]);
    }

    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    format!("{table}\n{}", format_summary(report))
}

fn format_summary(report: &HealthCheckReport) -> String {
    let mut lines = vec![
        String::new(),
        "Summary".bold().underline().to_string(),
        format!("  {} checks, {} {} passed", report.total, "✓".green(), report.passed),
    ];
    if report.warned > 0 {
        lines.push(format!("  {} {} warned", "⚠".yellow(), report.warned));
    }
    if report.failed > 0 {
        lines.push(format!("  {} {} failed", "✗".red(), report.failed));
    }

    let overall = match (report.is_healthy(), report.has_warnings()) {
        (false, _) => "UNHEALTHY".red().bold(),
        (true, true) => "HEALTHY (with warnings)".yellow().bold(),
        (true, false) => "HEALTHY".green().bold(),
    };
    lines.push(format!("  Overall: {overall}"));
    lines.join("\n") + "\n"
}

/// Prints the table and then the details of every check that has some
pub fn print_report(report: &HealthCheckReport) {
    println!("{}", format_report(report));

    for (name, details) in report
        .results
        .iter()
        .filter_map(|(name, result)| result.details.as_ref().map(|d| (name, d)))
    {
        println!("\n{}:\n{details}", name.bold());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::{CheckResult, HealthCheckRunner, SystemCheck};

    struct Broken;

    impl SystemCheck for Broken {
        fn name(&self) -> &'static str {
            "Broken"
        }

        fn check(&self) -> CheckResult {
            CheckResult::fail("queue lost events")
        }
    }

    #[test]
    fn test_report_lists_checks_and_verdict() {
        colored::control::set_override(false);
        let report = HealthCheckRunner::new().add_check(Broken).run();
        let text = format_report(&report);

        assert!(text.contains("Broken"));
        assert!(text.contains("queue lost events"));
        assert!(text.contains("FAIL"));
        assert!(text.contains("Overall: UNHEALTHY"));
    }
}
