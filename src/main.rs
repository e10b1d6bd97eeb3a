//! SCHOA - CLI entry point

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use schoa::{
    cli::{Args, Commands},
    config::Config,
    doctor::Doctor,
    gateway::{GeminiClient, ModelGateway},
    image::ImagePayload,
    records,
    repl::{DisplayManager, ReplConfig, ReplSession},
    telemetry::{self, TelemetryCollector},
    views::{SubmitPolicy, Workspace},
    SchoaError,
};
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Err(msg) = args.validate() {
        eprintln!("{} {}", "Error:".red().bold(), msg);
        std::process::exit(2);
    }

    let mut config = Config::load(args.config.clone()).context("Failed to load configuration")?;
    args.apply_overrides(&mut config);
    config.validate().context("Invalid configuration")?;

    if !config.display.color_output {
        colored::control::set_override(false);
    }
    let verbosity = args.verbosity();
    telemetry::init_logging(verbosity.log_directive(), config.display.color_output);

    // Credential is read once; an empty key surfaces as an auth failure per call
    let client = Arc::new(GeminiClient::with_config(
        &config.gemini.endpoint,
        &config.gemini.model,
        config.api_key(),
        config.timeout(),
    )?);
    let telemetry = TelemetryCollector::new();
    let gateway = ModelGateway::new(client.clone())
        .with_temperature(config.gemini.temperature)
        .with_telemetry(telemetry.clone());
    let workspace = Workspace::new(gateway, config.default_view(), SubmitPolicy::default());

    let quiet = !verbosity.show_progress();
    let mut display = DisplayManager::new(!quiet && config.display.show_spinner);

    tracing::debug!(
        model = %config.gemini.model,
        endpoint = %client.endpoint(),
        command = ?args.command(),
        "starting"
    );

    match args.command() {
        Commands::Start { .. } => {
            if !client.has_api_key() {
                display.show_warning(&format!(
                    "${} is not set; model requests will fail",
                    config.gemini.api_key_env
                ));
            }
            run_shell(&config, workspace, telemetry, !quiet && config.display.show_spinner).await?;
        }
        Commands::Summarize { notes, file } => {
            let notes = match file {
                Some(path) => read_text(&path)?,
                None => notes.unwrap_or_default(),
            };
            let view = workspace.clinical.clone();
            view.set_notes(notes.trim());
            run_once(&mut display, quiet, "After Visit Summary", view.summarize()).await?;
        }
        Commands::Diagnose { symptoms } => {
            let view = workspace.clinical.clone();
            view.set_symptoms(symptoms.trim());
            run_once(&mut display, quiet, "Differential Diagnosis (draft)", view.analyze_symptoms()).await?;
        }
        Commands::Image { path } => {
            let image = ImagePayload::from_path(&path)?;
            let view = workspace.clinical.clone();
            view.select_image(image);
            run_once(&mut display, quiet, "Radiology Preview", view.analyze_image()).await?;
        }
        Commands::Finance { data } => {
            if data {
                println!("{}", records::financial_json()?);
                return Ok(());
            }
            let view = workspace.operations.clone();
            if !quiet {
                display.show_section("Revenue Cycle");
                display.show_financial_table(view.financials(), &view.totals());
            }
            run_once(&mut display, quiet, "AI Financial Insight", view.analyze_finances()).await?;
        }
        Commands::Payroll { process } => {
            let view = &workspace.operations;
            display.show_payroll_table(view.payroll());
            if process {
                let pending = view.process_pending_batch();
                display.show_info(&format!(
                    "{} pending entr{} listed; batch submission is not connected",
                    pending.len(),
                    if pending.len() == 1 { "y" } else { "ies" }
                ));
            }
        }
        Commands::Search { query } => {
            let view = workspace.search.clone();
            view.set_query(query);
            run_once(&mut display, quiet, "Search Results", view.search()).await?;
        }
        Commands::Patients { json } => {
            if json {
                println!("{}", records::patients_json()?);
            } else {
                display.show_patients(workspace.search.patients());
            }
        }
        Commands::Doctor => {
            let doctor = Doctor::new(&config, &client);
            let checks = doctor.run_diagnostics().await;
            Doctor::display_results(&checks);
            if !Doctor::overall_status(&checks) {
                std::process::exit(1);
            }
        }
        Commands::Config => show_config(&config)?,
    }

    Ok(())
}

async fn run_shell(
    config: &Config,
    workspace: Workspace,
    telemetry: TelemetryCollector,
    show_spinner: bool,
) -> Result<()> {
    let repl_config = ReplConfig {
        history_file: Some(config.history_path()),
        show_spinner,
    };
    let mut session = ReplSession::new(workspace, telemetry, repl_config)?;
    session.show_welcome(VERSION, &config.gemini.model);
    session.run().await
}

/// Await a single view action and print its text
async fn run_once<F>(display: &mut DisplayManager, quiet: bool, heading: &str, call: F) -> Result<()>
where
    F: Future<Output = schoa::Result<String>>,
{
    let started = Instant::now();
    display.start_spinner(&format!("{}...", heading));
    let result = call.await;
    display.finish_spinner();

    match result {
        Ok(text) if quiet => println!("{}", text),
        Ok(text) => display.show_result(heading, &text, started.elapsed().as_millis() as u64),
        Err(SchoaError::Rejected(reason)) => anyhow::bail!("{}", reason),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn show_config(config: &Config) -> Result<()> {
    println!("\n{}\n", "SCHOA Configuration".bold().cyan());
    match Config::default_path() {
        Some(path) if path.exists() => println!("Config file: {}", path.display()),
        Some(path) => println!("Config file: {} (not present, using defaults)", path.display()),
        None => println!("Config file: (no home directory, using defaults)"),
    }
    println!(
        "API key:     ${} ({})",
        config.gemini.api_key_env,
        if config.api_key().is_empty() { "unset" } else { "set" }
    );
    println!();
    println!("{}", toml::to_string_pretty(config).context("Failed to render configuration")?);
    Ok(())
}
