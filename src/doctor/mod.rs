//! Doctor command for setup diagnostics
//!
//! Checks credential presence, configuration, endpoint reachability and the
//! history location. Nothing here runs before ordinary gateway calls.

use crate::config::Config;
use crate::gateway::GeminiClient;
use colored::*;
use std::path::Path;

/// Health check result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Pass,
    Warn(String),
    Fail(String),
}

/// Individual health check
#[derive(Debug)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
}

impl HealthCheck {
    fn new(name: &str, status: HealthStatus) -> Self {
        Self {
            name: name.to_string(),
            status,
        }
    }
}

pub struct Doctor<'a> {
    config: &'a Config,
    client: &'a GeminiClient,
}

impl<'a> Doctor<'a> {
    pub fn new(config: &'a Config, client: &'a GeminiClient) -> Self {
        Self { config, client }
    }

    /// Run all health checks
    pub async fn run_diagnostics(&self) -> Vec<HealthCheck> {
        vec![
            self.check_config(),
            self.check_credential(),
            self.check_endpoint().await,
            self.check_history_path(),
        ]
    }

    fn check_config(&self) -> HealthCheck {
        match self.config.validate() {
            Ok(()) => HealthCheck::new("Configuration", HealthStatus::Pass),
            Err(e) => HealthCheck::new("Configuration", HealthStatus::Fail(e.to_string())),
        }
    }

    /// An absent key is not fatal for startup, every call will just fail
    fn check_credential(&self) -> HealthCheck {
        if self.client.has_api_key() {
            HealthCheck::new("API Key", HealthStatus::Pass)
        } else {
            HealthCheck::new(
                "API Key",
                HealthStatus::Fail(format!("${} is not set", self.config.gemini.api_key_env)),
            )
        }
    }

    async fn check_endpoint(&self) -> HealthCheck {
        match self.client.health_check().await {
            Ok(true) => HealthCheck::new("Model Endpoint", HealthStatus::Pass),
            Ok(false) => HealthCheck::new(
                "Model Endpoint",
                HealthStatus::Fail(format!(
                    "{} did not accept model {}",
                    self.client.endpoint(),
                    self.config.gemini.model
                )),
            ),
            Err(e) => HealthCheck::new("Model Endpoint", HealthStatus::Fail(e.to_string())),
        }
    }

    fn check_history_path(&self) -> HealthCheck {
        let path = self.config.history_path();
        if writable_parent(&path) {
            HealthCheck::new("History File", HealthStatus::Pass)
        } else {
            HealthCheck::new(
                "History File",
                HealthStatus::Warn(format!("{} is not writable; history won't persist", path.display())),
            )
        }
    }

    /// Display diagnostics results
    pub fn display_results(checks: &[HealthCheck]) {
        println!("\n{}\n", "SCHOA Diagnostics".bold().cyan());
        println!("{:<20} {}", "Check", "Status");
        println!("{}", "=".repeat(50));

        for check in checks {
            let message = match &check.status {
                HealthStatus::Pass => "PASS".green().to_string(),
                HealthStatus::Warn(msg) => format!("WARN: {}", msg).yellow().to_string(),
                HealthStatus::Fail(msg) => format!("FAIL: {}", msg).red().to_string(),
            };
            println!("{:<20} {}", check.name, message);
        }

        println!();
    }

    /// Get overall health status
    pub fn overall_status(checks: &[HealthCheck]) -> bool {
        !checks.iter().any(|c| matches!(c.status, HealthStatus::Fail(_)))
    }
}

/// The nearest existing ancestor of `path` accepts new files
fn writable_parent(path: &Path) -> bool {
    let mut dir = path.parent();
    while let Some(candidate) = dir {
        if candidate.exists() {
            return std::fs::metadata(candidate)
                .map(|m| m.is_dir() && !m.permissions().readonly())
                .unwrap_or(false);
        }
        dir = candidate.parent();
    }
    false
}
