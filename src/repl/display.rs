//! Display manager for the SCHOA terminal UI
//!
//! Renders the three views, the data tables and a spinner while a model call
//! is in flight.

use crate::records::finance::FinancialTotals;
use crate::records::{FinancialRecord, Patient, PayrollEntry, PayrollStatus};
use crate::views::{ClinicalState, ClinicalTab, SearchState, ViewKind};
use colored::*;
use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::time::Duration;

const RULE_WIDTH: usize = 64;

/// Display manager for the shell
pub struct DisplayManager {
    spinner: Option<ProgressBar>,
    show_spinner: bool,
    tick_interval: Duration,
}

impl DisplayManager {
    pub fn new(show_spinner: bool) -> Self {
        DisplayManager {
            spinner: None,
            show_spinner,
            tick_interval: Duration::from_millis(100),
        }
    }

    /// Show welcome banner
    pub fn show_banner(&self, version: &str, model: &str) {
        let rule = "=".repeat(RULE_WIDTH);
        println!("\n{}", rule.cyan());
        println!("{}", format!("  SCHOA {} - Hospital Information Assistant", version).bold().cyan());
        println!("{}", format!("  Model: {} | Views: clinical, operations, search", model).dimmed());
        println!("{}\n", rule.cyan());
        println!(
            "Type into the active form (or {} for commands, {} to quit)\n",
            "/help".green(),
            "/exit".green()
        );
    }

    /// AI governance warning shown above the clinical view
    pub fn show_disclaimer(&self) {
        println!("{} {}", "!".yellow().bold(), "AI Governance & Safety Warning".yellow().bold());
        println!(
            "  {}",
            "This system uses Artificial Intelligence (Gemini) to assist with documentation and analysis.".yellow()
        );
        println!(
            "  {} {}",
            "Outputs are NOT medical diagnoses.".yellow().bold(),
            "All clinical suggestions must be verified by a licensed healthcare professional.".yellow()
        );
        println!(
            "  {}",
            "Do not input real Patient Health Information (PHI) in this demo environment.".yellow()
        );
        println!();
    }

    pub fn show_view_header(&self, view: ViewKind) {
        self.show_section(view.title());
    }

    pub fn render_clinical(&self, state: &ClinicalState) {
        self.show_disclaimer();

        let tabs: Vec<String> = [ClinicalTab::Notes, ClinicalTab::Symptoms, ClinicalTab::Image]
            .iter()
            .map(|tab| {
                if *tab == state.tab {
                    format!("[{}]", tab.label()).bold().cyan().to_string()
                } else {
                    tab.label().dimmed().to_string()
                }
            })
            .collect();
        println!("  {}\n", tabs.join("  "));

        match state.tab {
            ClinicalTab::Notes => {
                self.show_field("Raw clinical notes", &state.notes);
                self.show_field("After Visit Summary", &state.summary);
            }
            ClinicalTab::Symptoms => {
                self.show_field("Symptoms", &state.symptoms);
                self.show_field("Differential diagnosis (draft)", &state.diagnosis_draft);
            }
            ClinicalTab::Image => {
                match &state.image {
                    Some(image) => {
                        let size = image
                            .decoded_len()
                            .map(|n| format!("{} bytes", n))
                            .unwrap_or_else(|| "unknown size".to_string());
                        println!("  {} {} ({})", "Image:".bold(), image.media_type, size);
                    }
                    None => println!("  {} {}", "Image:".bold(), "none selected, use /image <path>".dimmed()),
                }
                println!();
                self.show_field("Radiology preview", &state.image_analysis);
            }
        }
    }

    pub fn render_operations(&self, records: &[FinancialRecord], totals: &FinancialTotals, insight: &str) {
        println!("{}", "Revenue Cycle".bold());
        self.show_financial_table(records, totals);
        println!();
        self.show_field("AI financial insight", insight);
        println!(
            "  {} for insight, {} for the payroll table",
            "/insight".green(),
            "/payroll".green()
        );
    }

    pub fn render_search(&self, state: &SearchState, patient_count: usize) {
        println!("  {} {} patient records loaded\n", "Dataset:".bold(), patient_count);
        self.show_field("Query", &state.query);
        self.show_field("Results", &state.results);
    }

    pub fn show_financial_table(&self, records: &[FinancialRecord], totals: &FinancialTotals) {
        println!(
            "  {:<8} {:>12} {:>12} {:>12} {:>12}",
            "Month".bold(),
            "Revenue".bold(),
            "Expenses".bold(),
            "Payroll".bold(),
            "Profit".bold()
        );
        for record in records {
            println!(
                "  {:<8} {:>12} {:>12} {:>12} {:>12}",
                record.month,
                format_amount(record.revenue),
                format_amount(record.expenses),
                format_amount(record.payroll),
                format_amount(record.profit).green()
            );
        }
        println!("  {}", "-".repeat(60).dimmed());
        println!(
            "  {:<8} {:>12} {:>12} {:>12} {:>12}",
            "Total".bold(),
            format_amount(totals.revenue),
            format_amount(totals.expenses),
            format_amount(totals.payroll),
            format_amount(totals.profit).green().bold()
        );
    }

    pub fn show_payroll_table(&self, entries: &[PayrollEntry]) {
        self.show_section("Payroll Management");
        println!(
            "  {:<18} {:<14} {:>12} {:>12}  {}",
            "Employee".bold(),
            "Role".bold(),
            "Base".bold(),
            "Net Pay".bold(),
            "Status".bold()
        );
        for entry in entries {
            let status = match entry.status {
                PayrollStatus::Processed => entry.status.to_string().green(),
                PayrollStatus::Pending => entry.status.to_string().yellow(),
            };
            println!(
                "  {:<18} {:<14} {:>12} {:>12}  {}",
                entry.name,
                entry.role,
                format_amount(entry.base_salary),
                format_amount(entry.net_pay),
                status
            );
        }
        println!();
    }

    pub fn show_patients(&self, patients: &[Patient]) {
        self.show_section("Patient Records");
        for patient in patients {
            println!(
                "  {} {} ({}, born {})",
                patient.id.cyan(),
                patient.name.bold(),
                patient.gender,
                patient.dob
            );
            println!("      conditions:  {}", patient.condition.join(", "));
            println!("      medications: {}", patient.medications.join(", "));
            println!("      last visit:  {}", patient.last_visit);
        }
        println!();
    }

    fn show_field(&self, label: &str, value: &str) {
        println!("  {}", format!("{}:", label).bold());
        if value.is_empty() {
            println!("    {}", "(empty)".dimmed());
        } else {
            for line in value.lines() {
                println!("    {}", line);
            }
        }
        println!();
    }

    /// Start the waiting indicator for a model call
    pub fn start_spinner(&mut self, message: &str) {
        self.finish_spinner();
        if !self.show_spinner {
            return;
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg} ({elapsed})") {
            pb.set_style(style);
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(self.tick_interval);
        self.spinner = Some(pb);
    }

    pub fn finish_spinner(&mut self) {
        if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }
    }

    pub fn is_spinning(&self) -> bool {
        self.spinner.is_some()
    }

    /// Display a model result under a heading
    pub fn show_result(&self, heading: &str, text: &str, duration_ms: u64) {
        println!(
            "\n{} {} {}",
            "✓".green().bold(),
            heading.green().bold(),
            format!("({})", format_duration(duration_ms)).dimmed()
        );
        println!("\n{}\n", text);
    }

    pub fn show_error(&self, error: &str) {
        println!("{} {}", "Error:".red().bold(), error.red());
    }

    pub fn show_warning(&self, warning: &str) {
        println!("{} {}", "Warning:".yellow().bold(), warning.yellow());
    }

    pub fn show_info(&self, info: &str) {
        println!("{} {}", "Info:".cyan(), info);
    }

    pub fn clear_screen(&self) -> io::Result<()> {
        execute!(io::stdout(), Clear(ClearType::All), cursor::MoveTo(0, 0))
    }

    /// Show section header
    pub fn show_section(&self, title: &str) {
        println!("\n{}", title.bold().cyan());
        println!("{}", "-".repeat(60).cyan());
    }

    pub fn show_bullet(&self, text: &str) {
        println!("  {} {}", "•".cyan(), text);
    }
}

impl Default for DisplayManager {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Dollar amount with thousands separators
pub fn format_amount(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    out.push('$');
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn format_duration(duration_ms: u64) -> String {
    if duration_ms > 1000 {
        format!("{:.1}s", duration_ms as f64 / 1000.0)
    } else {
        format!("{}ms", duration_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{mock_financial_data, mock_patients, mock_payroll};

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0), "$0");
        assert_eq!(format_amount(999), "$999");
        assert_eq!(format_amount(1000), "$1,000");
        assert_eq!(format_amount(13000), "$13,000");
        assert_eq!(format_amount(2_900_000), "$2,900,000");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(450), "450ms");
        assert_eq!(format_duration(2500), "2.5s");
    }

    #[test]
    fn test_spinner_lifecycle() {
        let mut manager = DisplayManager::new(true);
        manager.start_spinner("Analyzing");
        assert!(manager.is_spinning());
        manager.finish_spinner();
        assert!(!manager.is_spinning());
    }

    #[test]
    fn test_spinner_disabled() {
        let mut manager = DisplayManager::new(false);
        manager.start_spinner("Analyzing");
        assert!(!manager.is_spinning());
    }

    #[test]
    fn test_render_views() {
        let manager = DisplayManager::default();
        let records = mock_financial_data();
        let totals = FinancialTotals::from_records(&records);
        manager.render_clinical(&ClinicalState::default());
        manager.render_operations(&records, &totals, "");
        manager.render_search(&SearchState::default(), 4);
        manager.show_payroll_table(&mock_payroll());
        manager.show_patients(&mock_patients());
    }
}
