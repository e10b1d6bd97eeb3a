//! Interactive shell for SCHOA
//!
//! A read-eval-print loop over the three views. Free text goes to the active
//! form; `/commands` navigate and trigger the non-text actions. While a model
//! call is outstanding Ctrl-C cancels it, and navigating away from a view
//! cancels whatever that view still has in flight.

pub mod commands;
pub mod display;
pub mod input;
pub mod session;

use anyhow::Result;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::errors::SchoaError;
use crate::image::ImagePayload;
use crate::repl::commands::{is_command, Command};
pub use crate::repl::display::DisplayManager;
use crate::repl::input::{InputEvent, InputHandler};
pub use crate::repl::session::{ActionRecord, ActionStatus, ActivityLog};
use crate::telemetry::{TelemetryCollector, TelemetryEvent};
use crate::views::{ClinicalTab, ViewKind, Workspace};

/// Number of actions `/history` shows without an argument
const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Gateway events listed by `/status`
const STATUS_EVENT_LIMIT: usize = 5;

/// Configuration for the shell
#[derive(Debug, Clone)]
pub struct ReplConfig {
    pub history_file: Option<PathBuf>,
    pub show_spinner: bool,
}

impl Default for ReplConfig {
    fn default() -> Self {
        ReplConfig {
            history_file: None,
            show_spinner: true,
        }
    }
}

/// Shell session coordinator
pub struct ReplSession {
    input_handler: InputHandler,
    display_manager: DisplayManager,
    workspace: Workspace,
    telemetry: TelemetryCollector,
    activity: ActivityLog,
}

impl ReplSession {
    pub fn new(workspace: Workspace, telemetry: TelemetryCollector, config: ReplConfig) -> Result<Self> {
        let mut input_handler = match config.history_file {
            Some(path) => InputHandler::with_history(path)?,
            None => InputHandler::new()?,
        };
        input_handler.set_view(workspace.active());

        Ok(ReplSession {
            input_handler,
            display_manager: DisplayManager::new(config.show_spinner),
            workspace,
            telemetry,
            activity: ActivityLog::new(),
        })
    }

    pub fn show_welcome(&self, version: &str, model: &str) {
        self.display_manager.show_banner(version, model);
        self.render_active();
    }

    /// Main loop; returns when the user exits
    pub async fn run(&mut self) -> Result<()> {
        loop {
            match self.input_handler.read_line()? {
                InputEvent::Line(input) => {
                    if input.is_empty() {
                        continue;
                    }
                    match self.handle_input(&input).await {
                        Ok(true) => {}
                        Ok(false) => break,
                        Err(e) => self.display_manager.show_error(&e.to_string()),
                    }
                }
                InputEvent::Interrupted => {
                    println!("Use /exit to quit");
                }
                InputEvent::Eof => break,
            }
        }

        self.save()?;
        Ok(())
    }

    /// Handle one line of input.
    ///
    /// Returns false when the session should end. Free text reaches the form
    /// exactly as typed.
    pub async fn handle_input(&mut self, input: &str) -> Result<bool> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(true);
        }

        if is_command(trimmed) {
            return self.execute(commands::parse(trimmed)).await;
        }

        self.submit_text(input.to_string()).await;
        Ok(true)
    }

    async fn execute(&mut self, command: Command) -> Result<bool> {
        match command {
            Command::Help => commands::show_help(),
            Command::Exit => {
                self.workspace.cancel_active();
                return Ok(false);
            }
            Command::Navigate(view) => {
                self.navigate(view);
                self.render_active();
            }
            Command::Tab(tab) => {
                self.navigate(ViewKind::Clinical);
                self.workspace.clinical.set_tab(tab);
                self.render_active();
            }
            Command::Image { path } => self.select_image(&path).await,
            Command::Remove => {
                self.workspace.clinical.remove_image();
                self.display_manager.show_info("Image removed");
            }
            Command::Load { path } => match std::fs::read_to_string(&path) {
                Ok(text) => self.submit_text(text.trim().to_string()).await,
                Err(e) => self
                    .display_manager
                    .show_error(&format!("Cannot read {}: {}", path.display(), e)),
            },
            Command::Run => self.submit_active().await,
            Command::Insight => {
                self.navigate(ViewKind::Operations);
                self.run_insight().await;
            }
            Command::Payroll => self
                .display_manager
                .show_payroll_table(self.workspace.operations.payroll()),
            Command::Process => self.process_batch(),
            Command::Patients => self.display_manager.show_patients(self.workspace.search.patients()),
            Command::Show => self.render_active(),
            Command::Status => self.show_status(),
            Command::History { limit } => self.show_history(limit.unwrap_or(DEFAULT_HISTORY_LIMIT)),
            Command::Clear => self.display_manager.clear_screen()?,
            Command::Unknown { input } => {
                self.display_manager.show_error(&format!("Unknown command: {}", input));
                self.display_manager.show_info("Type /help for available commands");
            }
        }
        Ok(true)
    }

    /// Put free text into the active form and submit it
    async fn submit_text(&mut self, text: String) {
        match self.workspace.active() {
            ViewKind::Clinical => {
                if let Err(e) = self.workspace.clinical.input_for_active(&text) {
                    self.report_rejected(ViewKind::Clinical, "input", &text, &e);
                    return;
                }
                self.submit_active().await;
            }
            ViewKind::Operations => self
                .display_manager
                .show_warning("The operations view has no text form; use /insight, /payroll or /process"),
            ViewKind::Search => {
                self.workspace.search.set_query(text);
                self.submit_active().await;
            }
        }
    }

    /// Run the primary action of the active view
    async fn submit_active(&mut self) {
        match self.workspace.active() {
            ViewKind::Clinical => {
                let view = self.workspace.clinical.clone();
                let state = view.snapshot();
                let (action, input) = match state.tab {
                    ClinicalTab::Notes => ("summarize", state.notes),
                    ClinicalTab::Symptoms => ("diagnose", state.symptoms),
                    ClinicalTab::Image => (
                        "analyze image",
                        state.image.map(|i| i.media_type).unwrap_or_default(),
                    ),
                };
                let heading = state.tab.label();
                self.run_action(ViewKind::Clinical, action, &input, heading, async move {
                    view.submit_active().await
                })
                .await;
            }
            ViewKind::Operations => self.run_insight().await,
            ViewKind::Search => {
                let view = self.workspace.search.clone();
                let query = view.snapshot().query;
                self.run_action(ViewKind::Search, "search", &query, "Search Results", async move {
                    view.search().await
                })
                .await;
            }
        }
    }

    async fn run_insight(&mut self) {
        let view = self.workspace.operations.clone();
        self.run_action(
            ViewKind::Operations,
            "financial insight",
            "half-year financials",
            "AI Financial Insight",
            async move { view.analyze_finances().await },
        )
        .await;
    }

    async fn select_image(&mut self, path: &Path) {
        match ImagePayload::from_path(path) {
            Ok(image) => {
                self.navigate(ViewKind::Clinical);
                self.workspace.clinical.set_tab(ClinicalTab::Image);
                self.workspace.clinical.select_image(image);
                self.display_manager
                    .show_info(&format!("Selected {}", path.display()));
                self.submit_active().await;
            }
            Err(e) => self.display_manager.show_error(&e.to_string()),
        }
    }

    /// Await a view action with a spinner, racing it against Ctrl-C
    async fn run_action<F>(&mut self, view: ViewKind, action: &str, input: &str, heading: &str, call: F)
    where
        F: Future<Output = crate::errors::Result<String>>,
    {
        let started = Instant::now();
        self.display_manager.start_spinner(&format!("{}...", heading));

        let result = tokio::select! {
            result = call => Some(result),
            _ = tokio::signal::ctrl_c() => None,
        };

        self.display_manager.finish_spinner();
        let duration_ms = started.elapsed().as_millis() as u64;

        match result {
            Some(Ok(text)) => {
                self.display_manager.show_result(heading, &text, duration_ms);
                self.activity
                    .record(ActionRecord::new(view, action, input, ActionStatus::Completed, duration_ms));
            }
            Some(Err(SchoaError::Cancelled)) => {
                self.display_manager.show_warning("Request superseded; result discarded");
                self.activity
                    .record(ActionRecord::new(view, action, input, ActionStatus::Cancelled, duration_ms));
            }
            Some(Err(e)) => self.report_rejected(view, action, input, &e),
            None => {
                self.workspace.cancel(view);
                self.telemetry.record_cancelled();
                self.display_manager.show_warning("Request cancelled");
                self.activity
                    .record(ActionRecord::new(view, action, input, ActionStatus::Cancelled, duration_ms));
            }
        }
    }

    fn report_rejected(&mut self, view: ViewKind, action: &str, input: &str, error: &SchoaError) {
        match error {
            SchoaError::Rejected(reason) => self.display_manager.show_warning(reason),
            other => self.display_manager.show_error(&other.to_string()),
        }
        self.activity
            .record(ActionRecord::new(view, action, input, ActionStatus::Rejected, 0));
    }

    fn navigate(&mut self, view: ViewKind) {
        let from = self.workspace.active();
        if self.workspace.navigate(view) {
            self.telemetry.record_cancelled();
            self.activity
                .record(ActionRecord::new(from, "navigate away", view.as_str(), ActionStatus::Cancelled, 0));
            self.display_manager
                .show_info(&format!("Cancelled pending request in {}", from));
        }
        self.input_handler.set_view(view);
    }

    fn process_batch(&mut self) {
        let pending = self.workspace.operations.process_pending_batch();
        if pending.is_empty() {
            self.display_manager.show_info("No pending payroll entries");
            return;
        }

        self.display_manager.show_section("Pending Batch");
        for entry in &pending {
            self.display_manager.show_bullet(&format!(
                "{} ({}) net {}",
                entry.name,
                entry.role,
                display::format_amount(entry.net_pay)
            ));
        }
        self.display_manager
            .show_info("Batch submission is not connected; entries remain pending");
    }

    fn render_active(&self) {
        let view = self.workspace.active();
        self.display_manager.show_view_header(view);
        match view {
            ViewKind::Clinical => self
                .display_manager
                .render_clinical(&self.workspace.clinical.snapshot()),
            ViewKind::Operations => {
                let ops = &self.workspace.operations;
                self.display_manager
                    .render_operations(ops.financials(), &ops.totals(), &ops.insight());
            }
            ViewKind::Search => self.display_manager.render_search(
                &self.workspace.search.snapshot(),
                self.workspace.search.patients().len(),
            ),
        }
    }

    fn show_status(&self) {
        let stats = self.telemetry.get_stats();
        self.display_manager.show_section("Session Status");
        println!("  Active view:     {}", self.workspace.active().title());
        for view in ViewKind::ALL {
            let state = if self.workspace.is_busy(view) { "busy" } else { "idle" };
            println!("  {:<16} {}", format!("{}:", view), state);
        }
        println!("  Model calls:     {}", stats.calls);
        println!("  Succeeded:       {}", stats.succeeded);
        println!("  Empty:           {}", stats.empty);
        println!("  Failed:          {} ({} auth)", stats.failed, stats.auth_failures);
        println!("  Cancelled:       {}", stats.cancelled);
        if stats.calls > 0 {
            println!("  Success rate:    {:.0}%", self.telemetry.success_rate() * 100.0);
        }
        if let Some(avg) = self.telemetry.average_latency_ms() {
            println!("  Avg latency:     {}", display::format_duration(avg));
        }
        println!("  Actions logged:  {}", self.activity.total());
        println!("  Session time:    {}s", self.activity.session_duration_secs());

        let events = self.telemetry.recent_events(STATUS_EVENT_LIMIT);
        if !events.is_empty() {
            println!("  Recent calls:");
            for event in &events {
                match event {
                    TelemetryEvent::CallCompleted {
                        operation,
                        outcome,
                        duration_ms,
                    } => println!(
                        "    {} {} ({})",
                        operation,
                        outcome,
                        display::format_duration(*duration_ms)
                    ),
                    TelemetryEvent::CallCancelled => println!("    cancelled"),
                }
            }
        }
        println!();
    }

    fn show_history(&self, limit: usize) {
        if self.activity.is_empty() {
            self.display_manager.show_info("No actions yet");
            return;
        }

        self.display_manager.show_section("Recent Actions");
        for (index, record) in self.activity.recent(limit).iter().enumerate() {
            println!(
                "  {}. [{}] {} {} ({}, {})",
                index + 1,
                record.view,
                record.action,
                record.input_preview,
                record.status,
                display::format_duration(record.duration_ms)
            );
        }
        println!();
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn activity(&self) -> &ActivityLog {
        &self.activity
    }

    /// Persist line history
    pub fn save(&mut self) -> Result<()> {
        self.input_handler.save_history()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Result as SchoaResult;
    use crate::gateway::{GenerateContentRequest, GenerateContentResponse, ModelGateway, ModelTransport};
    use crate::views::SubmitPolicy;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct FixedTransport;

    #[async_trait]
    impl ModelTransport for FixedTransport {
        async fn generate_content(&self, _request: &GenerateContentRequest) -> SchoaResult<GenerateContentResponse> {
            Ok(GenerateContentResponse::from_text("model says hi"))
        }

        fn model(&self) -> &str {
            "fixed"
        }
    }

    fn session() -> ReplSession {
        let telemetry = TelemetryCollector::new();
        let gateway = ModelGateway::new(Arc::new(FixedTransport)).with_telemetry(telemetry.clone());
        let workspace = Workspace::new(gateway, ViewKind::Clinical, SubmitPolicy::default());
        let config = ReplConfig {
            history_file: None,
            show_spinner: false,
        };
        ReplSession::new(workspace, telemetry, config).unwrap()
    }

    #[tokio::test]
    async fn test_exit_and_empty_input() {
        let mut session = session();
        assert!(session.handle_input("   ").await.unwrap());
        assert!(session.handle_input("/help").await.unwrap());
        assert!(!session.handle_input("/exit").await.unwrap());
    }

    #[tokio::test]
    async fn test_free_text_summarizes_notes() {
        let mut session = session();
        session.handle_input("Pt c/o chest pain, BP 150/95").await.unwrap();

        let state = session.workspace().clinical.snapshot();
        assert_eq!(state.notes, "Pt c/o chest pain, BP 150/95");
        assert_eq!(state.summary, "model says hi");
        assert_eq!(session.activity().count_with(ActionStatus::Completed), 1);
    }

    #[tokio::test]
    async fn test_symptoms_tab_routes_to_diagnosis() {
        let mut session = session();
        session.handle_input("/tab symptoms").await.unwrap();
        session.handle_input("fever, stiff neck").await.unwrap();

        let state = session.workspace().clinical.snapshot();
        assert_eq!(state.symptoms, "fever, stiff neck");
        assert_eq!(state.diagnosis_draft, "model says hi");
        assert!(state.summary.is_empty());
    }

    #[tokio::test]
    async fn test_image_tab_rejects_text() {
        let mut session = session();
        session.handle_input("/image").await.unwrap();
        session.handle_input("describe this").await.unwrap();
        assert_eq!(session.activity().count_with(ActionStatus::Rejected), 1);
    }

    #[tokio::test]
    async fn test_navigation_and_search() {
        let mut session = session();
        session.handle_input("/search").await.unwrap();
        assert_eq!(session.workspace().active(), ViewKind::Search);

        session.handle_input("patients with hypertension").await.unwrap();
        let state = session.workspace().search.snapshot();
        assert_eq!(state.query, "patients with hypertension");
        assert_eq!(state.results, "model says hi");
    }

    #[tokio::test]
    async fn test_search_query_keeps_surrounding_whitespace() {
        let mut session = session();
        session.handle_input("/search").await.unwrap();
        session.handle_input("  asthma patients ").await.unwrap();
        assert_eq!(session.workspace().search.snapshot().query, "  asthma patients ");
    }

    #[tokio::test]
    async fn test_calls_reach_status_event_log() {
        let mut session = session();
        session.handle_input("BP 150/95").await.unwrap();
        session.handle_input("/search").await.unwrap();
        session.handle_input("asthma").await.unwrap();
        assert!(session.handle_input("/status").await.unwrap());

        let events = session.telemetry.recent_events(STATUS_EVENT_LIMIT);
        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[1],
            TelemetryEvent::CallCompleted {
                operation: crate::gateway::Operation::SearchRecords,
                ..
            }
        ));
        assert_eq!(session.telemetry.success_rate(), 1.0);
    }

    #[tokio::test]
    async fn test_insight_switches_to_operations() {
        let mut session = session();
        session.handle_input("/insight").await.unwrap();
        assert_eq!(session.workspace().active(), ViewKind::Operations);
        assert_eq!(session.workspace().operations.insight(), "model says hi");
    }

    #[tokio::test]
    async fn test_operations_free_text_is_not_submitted() {
        let mut session = session();
        session.handle_input("/ops").await.unwrap();
        session.handle_input("how are we doing").await.unwrap();
        assert!(session.workspace().operations.insight().is_empty());
        assert!(session.activity().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_command_continues() {
        let mut session = session();
        assert!(session.handle_input("/frobnicate").await.unwrap());
        assert!(session.handle_input("/process").await.unwrap());
        assert!(session.handle_input("/status").await.unwrap());
        assert!(session.handle_input("/history 3").await.unwrap());
    }
}
