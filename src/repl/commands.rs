//! Built-in shell commands
//!
//! Parsing is pure; execution lives in [`ReplSession`](crate::repl::ReplSession)
//! because most commands touch the views.

use crate::views::{ClinicalTab, ViewKind};
use colored::*;
use std::path::PathBuf;

/// Shell command types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Exit,
    Navigate(ViewKind),
    Tab(ClinicalTab),
    /// Select an image for the clinical image tab
    Image { path: PathBuf },
    /// Remove the selected image
    Remove,
    /// Load form text for the active tab from a file
    Load { path: PathBuf },
    /// Re-submit the active form
    Run,
    /// Financial AI insight
    Insight,
    Payroll,
    /// "Process Pending Batch"
    Process,
    Patients,
    /// Re-render the active view
    Show,
    Status,
    History { limit: Option<usize> },
    Clear,
    Unknown { input: String },
}

/// Parse input string into a command
pub fn parse(input: &str) -> Command {
    let trimmed = input.trim();

    let Some(body) = trimmed.strip_prefix('/') else {
        return Command::Unknown {
            input: input.to_string(),
        };
    };

    let (name, rest) = match body.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (body, ""),
    };

    match name.to_lowercase().as_str() {
        "help" | "h" | "?" => Command::Help,
        "exit" | "quit" | "q" => Command::Exit,
        "clinical" => Command::Navigate(ViewKind::Clinical),
        "operations" | "ops" => Command::Navigate(ViewKind::Operations),
        "search" => Command::Navigate(ViewKind::Search),
        "view" | "go" => match ViewKind::parse(rest) {
            Some(kind) => Command::Navigate(kind),
            None => Command::Unknown {
                input: input.to_string(),
            },
        },
        "tab" => match ClinicalTab::parse(rest) {
            Some(tab) => Command::Tab(tab),
            None => Command::Unknown {
                input: input.to_string(),
            },
        },
        "notes" => Command::Tab(ClinicalTab::Notes),
        "symptoms" => Command::Tab(ClinicalTab::Symptoms),
        "image" if rest.is_empty() => Command::Tab(ClinicalTab::Image),
        "image" => Command::Image {
            path: PathBuf::from(rest),
        },
        "remove" => Command::Remove,
        "load" if !rest.is_empty() => Command::Load {
            path: PathBuf::from(rest),
        },
        "run" | "submit" => Command::Run,
        "insight" => Command::Insight,
        "payroll" => Command::Payroll,
        "process" => Command::Process,
        "patients" => Command::Patients,
        "show" => Command::Show,
        "status" => Command::Status,
        "history" => Command::History {
            limit: rest.parse().ok(),
        },
        "clear" | "cls" => Command::Clear,
        _ => Command::Unknown {
            input: input.to_string(),
        },
    }
}

/// Check if input is a command (starts with /)
pub fn is_command(input: &str) -> bool {
    input.trim().starts_with('/')
}

/// Display help information
pub fn show_help() {
    println!("\n{}", "Available Commands:".bold().cyan());
    println!("{}", "=".repeat(60).cyan());

    let commands = [
        ("/clinical, /ops, /search", "Switch view (cancels the current view's request)"),
        ("/tab notes|symptoms|image", "Switch clinical tab"),
        ("/image <path>", "Select an image for analysis"),
        ("/remove", "Remove the selected image"),
        ("/load <path>", "Load notes or symptoms from a file"),
        ("/run", "Submit the active form again"),
        ("/insight", "AI financial insight (operations)"),
        ("/payroll", "Show payroll table"),
        ("/process", "Process pending payroll batch"),
        ("/patients", "List patient records"),
        ("/show", "Redraw the current view"),
        ("/status", "Show session status"),
        ("/history [n]", "Show last n actions (default: 10)"),
        ("/clear, /cls", "Clear screen"),
        ("/exit, /quit, /q", "Exit"),
    ];

    for (cmd, desc) in commands {
        println!("  {:<28} {}", cmd.green(), desc);
    }

    println!("\n{}", "Usage:".bold());
    println!("  - Type notes, symptoms or a search query directly (no / prefix)");
    println!("  - Press {} while waiting to cancel a request", "Ctrl-C".cyan());
    println!("  - Press {} or {} to exit", "Ctrl-D".cyan(), "/exit".cyan());
    println!();
}
