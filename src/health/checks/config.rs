//! Configuration self-check

use crate::config::AppConfig;
use crate::health::check::{CheckResult, SystemCheck};

/// Loads and validates every configured profile
pub struct ConfigCheck {
    profiles: Vec<&'static str>,
}

impl ConfigCheck {
    pub fn new() -> Self {
        Self::with_profiles(vec!["debug", "release"])
    }

    pub fn with_profiles(profiles: Vec<&'static str>) -> Self {
        Self { profiles }
    }
}

impl Default for ConfigCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemCheck for ConfigCheck {
    fn name(&self) -> &'static str {
        "Configuration"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Profiles load from files and environment and pass validation")
    }

    fn check(&self) -> CheckResult {
        let mut details = Vec::new();
        let mut failed = false;

        for profile in &self.profiles {
            match AppConfig::load(profile) {
                Ok(config) => details.push(format!(
                    "  ✓ '{profile}': repeat {}/{} ticks, tooltip delay {} ticks",
                    config.input.repeat_initial_delay,
                    config.input.repeat_period,
                    config.input.tooltip_delay,
                )),
                Err(err) => {
                    details.push(format!("  ✗ '{profile}': {err}"));
                    failed = true;
                }
            }
        }

        // APP_PROFILE may name a profile without a file; that is only a warning
        let env_warning = match AppConfig::load_from_env() {
            Ok(config) => {
                details.push(format!("  ✓ environment: profile '{}'", config.profile));
                false
            }
            Err(err) => {
                details.push(format!("  ⚠ environment: {err}"));
                true
            }
        };

        let details = details.join("\n");
        if failed {
            CheckResult::fail("A profile failed to load").with_details(details)
        } else if env_warning {
            CheckResult::warn("Profiles load, environment override rejected").with_details(details)
        } else {
            CheckResult::pass(format!("{} profiles validated", self.profiles.len()))
                .with_details(details)
        }
    }
}
