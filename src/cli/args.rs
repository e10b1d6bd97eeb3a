//! Command-line argument parsing for SCHOA
//!
//! Provides clap-based CLI with one subcommand per module action.

use crate::config::Config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// SCHOA - AI assistant for hospital documentation, finance and records
#[derive(Parser, Debug)]
#[command(name = "schoa")]
#[command(version)]
#[command(about = "Clinical notes, financial insight and patient search over a hosted language model", long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Model to use (overrides config)
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// API endpoint (overrides config)
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress everything but results)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand (interactive shell when omitted)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start the interactive shell
    Start {
        /// View to open on: clinical, operations or search
        #[arg(long)]
        view: Option<String>,
    },

    /// Summarize raw clinical notes into an After Visit Summary
    Summarize {
        /// Notes text
        #[arg(value_name = "NOTES")]
        notes: Option<String>,

        /// Read notes from a file instead
        #[arg(long, conflicts_with = "notes")]
        file: Option<PathBuf>,
    },

    /// Draft a differential diagnosis from a symptom description
    Diagnose {
        #[arg(value_name = "SYMPTOMS")]
        symptoms: String,
    },

    /// Describe a medical image for preliminary review
    Image {
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },

    /// Show the half-year financials and request an AI insight
    Finance {
        /// Print the dataset JSON sent to the model and exit
        #[arg(long)]
        data: bool,
    },

    /// Show the payroll table
    Payroll {
        /// List the pending batch (no state change is applied)
        #[arg(long)]
        process: bool,
    },

    /// Natural-language search over the patient records
    Search {
        #[arg(value_name = "QUERY")]
        query: String,
    },

    /// List the patient records
    Patients {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check configuration, credential and endpoint reachability
    Doctor,

    /// Display current configuration
    Config,
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }

    /// Subcommand to run, the shell by default
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Start { view: None })
    }

    /// Check argument combinations clap cannot express
    pub fn validate(&self) -> Result<(), String> {
        if let Some(Commands::Summarize { notes: None, file: None }) = &self.command {
            return Err("Notes required. Use 'schoa summarize <NOTES>' or '--file <PATH>'.".to_string());
        }

        if self.quiet && self.verbose > 0 {
            return Err("Cannot combine --quiet with --verbose.".to_string());
        }

        Ok(())
    }

    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(model) = &self.model {
            config.gemini.model = model.clone();
        }
        if let Some(endpoint) = &self.endpoint {
            config.gemini.endpoint = endpoint.clone();
        }
        if self.no_color {
            config.display.color_output = false;
        }
        if let Some(Commands::Start { view: Some(view) }) = &self.command {
            config.display.default_view = view.clone();
        }
    }
}

impl Verbosity {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "quiet",
            Verbosity::Normal => "normal",
            Verbosity::Verbose => "verbose",
            Verbosity::VeryVerbose => "very_verbose",
        }
    }

    /// Default `tracing` filter for this level
    pub fn log_directive(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "info",
            Verbosity::VeryVerbose => "debug",
        }
    }

    /// Check if should show progress spinners
    pub fn show_progress(&self) -> bool {
        !matches!(self, Verbosity::Quiet)
    }
}
